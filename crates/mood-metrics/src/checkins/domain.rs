use serde::Serialize;

use crate::scoring::ScoreBand;
use crate::store::Row;

/// Stored column names shared by the check-in service and its queries.
pub mod columns {
    pub const ID: &str = "id";
    pub const USER_ID: &str = "userId";
    pub const CREATED_AT: &str = "created_timestamp";
    pub const FINAL_SCORE: &str = "finalMoodScores";
    pub const SCORE_BAND: &str = "scoreBand";
    /// On the users table: when that user last checked in.
    pub const LAST_CHECKIN: &str = "lastCheckinAt";
}

/// Response for a newly created check-in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCheckIn {
    pub message: &'static str,
    pub row: Row,
    pub final_score: Option<f64>,
    pub score_band: Option<ScoreBand>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatedCheckIn {
    pub message: &'static str,
    pub row: Row,
}

/// Result of a same-day lookup. `row` carries an attached `scoreBand` when present.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SameDayCheckIn {
    pub user_id: i64,
    pub reference_timestamp: Option<String>,
    pub row: Option<Row>,
}

/// Effective scoring configuration as the engine sees it right now.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringSnapshot {
    pub weights: Vec<crate::scoring::WeightRule>,
    pub bands: Vec<ScoreBand>,
}
