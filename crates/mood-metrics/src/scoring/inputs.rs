use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce;

/// Legacy spelling still sent by older clients.
const LEGACY_EXERCISE_KEY: &str = "excerciseHours";

/// Daily inputs for one check-in. Every field is optional and independently coerced.
///
/// Ranges are not validated: a mood of 14 is accepted and simply clamps once normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCheckIn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hrs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_outside_min: Option<i64>,
    #[serde(
        rename = "connectwithfamily",
        skip_serializing_if = "Option::is_none"
    )]
    pub connect_with_family: Option<bool>,
    /// Free text from the user; never scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RawCheckIn {
    /// Builds inputs from an untrusted JSON object. Fields that fail to coerce become `None`.
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let float = |key: &str| payload.get(key).and_then(coerce::as_f64);
        let int = |key: &str| payload.get(key).and_then(coerce::as_i64);

        let exercise_hours = payload
            .get("exerciseHours")
            .filter(|value| !value.is_null())
            .or_else(|| payload.get(LEGACY_EXERCISE_KEY))
            .and_then(coerce::as_f64);

        Self {
            sleep_hours: float("sleepHours"),
            exercise_hours,
            working_hrs: float("workingHrs"),
            sleep_quality: int("sleepQuality"),
            mood: int("mood"),
            energy: int("energy"),
            stress: int("stress"),
            time_outside_min: int("timeOutsideMin"),
            connect_with_family: payload.get("connectwithfamily").and_then(coerce::as_bool),
            notes: payload
                .get("notes")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    /// Stored column values for the fields that are present.
    pub fn to_columns(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(columns)) => columns,
            _ => Map::new(),
        }
    }
}
