use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::inputs::RawCheckIn;
use super::normalizer::Normalizer;
use crate::coerce;
use crate::store::Row;

/// Scorable dimension of a daily check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Mood,
    Energy,
    Stress,
    SleepQuality,
    SleepHours,
    Exercise,
    Outside,
    WorkBalance,
    Connect,
}

impl Component {
    pub const ALL: [Component; 9] = [
        Component::Mood,
        Component::Energy,
        Component::Stress,
        Component::SleepQuality,
        Component::SleepHours,
        Component::Exercise,
        Component::Outside,
        Component::WorkBalance,
        Component::Connect,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Component::Mood => "mood",
            Component::Energy => "energy",
            Component::Stress => "stress",
            Component::SleepQuality => "sleep_quality",
            Component::SleepHours => "sleep_hours",
            Component::Exercise => "exercise",
            Component::Outside => "outside",
            Component::WorkBalance => "work_balance",
            Component::Connect => "connect",
        }
    }

    /// Exact match only: `"Mood "` or `"MOOD"` is an unknown key.
    pub fn from_key(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|component| component.key() == raw)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Anything other than the literal `negative` is positive.
    pub fn from_label(raw: &str) -> Self {
        match raw {
            "negative" => Self::Negative,
            _ => Self::Positive,
        }
    }
}

/// Named transform from a weight rule. Only `inverse_scale10` changes scoring, and only for mood;
/// the other shapes are fixed per component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    Scale10,
    InverseScale10,
    Peak,
    Saturate,
    Boolean,
    Other(String),
}

impl Transform {
    pub fn from_label(raw: &str) -> Self {
        match raw {
            "scale10" => Self::Scale10,
            "inverse_scale10" => Self::InverseScale10,
            "peak" => Self::Peak,
            "saturate" => Self::Saturate,
            "boolean" => Self::Boolean,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Transform::Scale10 => "scale10",
            Transform::InverseScale10 => "inverse_scale10",
            Transform::Peak => "peak",
            Transform::Saturate => "saturate",
            Transform::Boolean => "boolean",
            Transform::Other(label) => label,
        }
    }
}

impl Serialize for Transform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Configuration row controlling how one component contributes to the score.
///
/// Shape parameters hidden in `notes` are parsed once, when the rule is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightRule {
    #[serde(rename = "component_key")]
    pub component: Component,
    pub weight: f64,
    pub direction: Direction,
    pub transform: Transform,
    pub notes: String,
    #[serde(skip)]
    normalizer: Normalizer,
}

impl WeightRule {
    pub fn new(
        component: Component,
        weight: f64,
        direction: Direction,
        transform: Transform,
        notes: impl Into<String>,
    ) -> Self {
        let notes = notes.into();
        let normalizer = Normalizer::compile(component, direction, &transform, &notes);
        Self {
            component,
            weight,
            direction,
            transform,
            notes,
            normalizer,
        }
    }

    /// Reads a stored weight row.
    pub fn from_row(row: &Row) -> Result<Self, RuleRowError> {
        let key = row
            .get("component_key")
            .and_then(Value::as_str)
            .ok_or(RuleRowError::MissingComponent)?;
        let component =
            Component::from_key(key).ok_or_else(|| RuleRowError::UnknownComponent(key.into()))?;
        let weight = row
            .get("weight")
            .and_then(coerce::as_f64)
            .ok_or(RuleRowError::InvalidWeight(component))?;

        let text = |column: &str| {
            row.get(column)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Ok(Self::new(
            component,
            weight,
            Direction::from_label(&text("direction")),
            Transform::from_label(&text("transform")),
            text("notes"),
        ))
    }

    /// Rules with a non-positive weight never take part in aggregation.
    pub fn is_active(&self) -> bool {
        self.weight > 0.0
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn normalize(&self, inputs: &RawCheckIn) -> Option<f64> {
        self.normalizer.apply(inputs)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleRowError {
    #[error("weight row has no component_key")]
    MissingComponent,
    #[error("unknown component key '{0}'")]
    UnknownComponent(String),
    #[error("weight for {0} is not a number")]
    InvalidWeight(Component),
}

const DEFAULT_WEIGHT_TABLE: [(Component, f64, Direction, &str, &str); 9] = [
    (Component::Mood, 0.25, Direction::Positive, "scale10", ""),
    (Component::Energy, 0.15, Direction::Positive, "scale10", ""),
    (Component::Stress, 0.15, Direction::Negative, "inverse_scale10", ""),
    (Component::SleepQuality, 0.10, Direction::Positive, "scale10", ""),
    (Component::SleepHours, 0.10, Direction::Positive, "peak", "8;4"),
    (Component::Exercise, 0.10, Direction::Positive, "saturate", "45"),
    (Component::Outside, 0.05, Direction::Positive, "saturate", "30"),
    (Component::WorkBalance, 0.07, Direction::Positive, "peak", "8;4"),
    (Component::Connect, 0.03, Direction::Positive, "boolean", ""),
];

static DEFAULT_WEIGHT_RULES: LazyLock<Vec<WeightRule>> = LazyLock::new(|| {
    DEFAULT_WEIGHT_TABLE
        .iter()
        .map(|(component, weight, direction, transform, notes)| {
            WeightRule::new(
                *component,
                *weight,
                *direction,
                Transform::from_label(transform),
                *notes,
            )
        })
        .collect()
});

/// Built-in weights used whenever the configuration store is unreachable or empty.
pub fn default_weight_rules() -> &'static [WeightRule] {
    &DEFAULT_WEIGHT_RULES
}
