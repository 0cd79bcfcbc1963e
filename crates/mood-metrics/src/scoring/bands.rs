use serde::Serialize;
use serde_json::Value;

use crate::coerce;
use crate::store::Row;

/// Labeled score interval with user-facing messaging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBand {
    pub band_key: String,
    pub label: String,
    pub min_score: f64,
    pub max_score: f64,
    pub inclusive_min: bool,
    pub inclusive_max: bool,
    pub message: Option<String>,
    pub crisis_note: Option<String>,
    pub display_order: i64,
    pub tips: Vec<String>,
}

impl ScoreBand {
    /// Reads a stored band row. Rows whose bounds do not coerce to numbers are unusable.
    pub fn from_row(row: &Row) -> Result<Self, BandRowError> {
        let band_key = row
            .get("band_key")
            .and_then(coerce::as_text)
            .unwrap_or_default();
        let bound = |column: &'static str| {
            row.get(column)
                .and_then(coerce::as_f64)
                .ok_or_else(|| BandRowError::InvalidBound {
                    band_key: band_key.clone(),
                    column,
                })
        };
        let min_score = bound("min_score")?;
        let max_score = bound("max_score")?;

        let flag = |column: &str| row.get(column).and_then(coerce::as_bool).unwrap_or(true);
        let text = |column: &str| {
            row.get(column)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Ok(Self {
            label: text("label").unwrap_or_default(),
            min_score,
            max_score,
            inclusive_min: flag("inclusive_min"),
            inclusive_max: flag("inclusive_max"),
            message: text("message"),
            crisis_note: text("crisis_note"),
            display_order: row
                .get("display_order")
                .and_then(coerce::as_i64)
                .unwrap_or_default(),
            tips: row.get("tips").map(parse_tips).unwrap_or_default(),
            band_key,
        })
    }

    pub fn contains(&self, score: f64) -> bool {
        let lo_ok = if self.inclusive_min {
            score >= self.min_score
        } else {
            score > self.min_score
        };
        let hi_ok = if self.inclusive_max {
            score <= self.max_score
        } else {
            score < self.max_score
        };
        lo_ok && hi_ok
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BandRowError {
    #[error("band '{band_key}' has a non-numeric {column}")]
    InvalidBound {
        band_key: String,
        column: &'static str,
    },
}

/// Reads tips stored either as a native list or as a JSON-encoded string.
///
/// A non-empty string that is not a JSON list is kept whole as a single tip.
pub fn parse_tips(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(tip_text).collect(),
        Value::String(raw) if raw.trim().is_empty() => Vec::new(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items.iter().filter_map(tip_text).collect(),
            _ => vec![raw.clone()],
        },
        _ => Vec::new(),
    }
}

fn tip_text(item: &Value) -> Option<String> {
    match item {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// First band, in the order given, whose interval contains `score`.
///
/// The caller supplies bands already sorted by `display_order`; overlaps resolve to the
/// earlier band.
pub fn classify(score: Option<f64>, bands: &[ScoreBand]) -> Option<&ScoreBand> {
    let score = score?;
    bands.iter().find(|band| band.contains(score))
}
