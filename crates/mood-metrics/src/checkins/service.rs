use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::domain::columns::{CREATED_AT, FINAL_SCORE, ID, LAST_CHECKIN, SCORE_BAND, USER_ID};
use super::domain::{CreatedCheckIn, SameDayCheckIn, ScoringSnapshot, UpdatedCheckIn};
use crate::coerce;
use crate::config::TableNames;
use crate::scoring::{
    aggregate, classify, parse_instant, sg_day_bounds, RawCheckIn, ScoringConfigProvider,
};
use crate::store::{Filter, Order, Row, RowStore, StoreError};

/// Service composing the row store and the scoring engine for daily check-ins.
pub struct CheckInService<S> {
    store: Arc<S>,
    scoring: ScoringConfigProvider<S>,
    tables: TableNames,
}

impl<S> CheckInService<S>
where
    S: RowStore + 'static,
{
    pub fn new(store: Arc<S>, tables: TableNames) -> Self {
        let scoring =
            ScoringConfigProvider::new(store.clone(), tables.weights.clone(), tables.bands.clone());
        Self {
            store,
            scoring,
            tables,
        }
    }

    /// Score, classify, and persist a new check-in.
    ///
    /// The user's last check-in marker is updated afterwards on a best-effort basis.
    pub fn create(&self, payload: &Map<String, Value>) -> Result<CreatedCheckIn, CheckInServiceError> {
        let user_id = required_id(payload, USER_ID)?;
        let created_at = match optional_timestamp(payload)? {
            Some(timestamp) => timestamp,
            None => Utc::now().to_rfc3339(),
        };

        let inputs = RawCheckIn::from_payload(payload);
        let weights = self.scoring.get_weights();
        let final_score = aggregate(&inputs, &weights);
        let bands = self.scoring.get_bands();
        let score_band = classify(final_score, &bands).cloned();

        let mut fields = Row::new();
        fields.insert(USER_ID.to_string(), Value::from(user_id));
        fields.extend(inputs.to_columns());
        if let Some(score) = final_score {
            fields.insert(FINAL_SCORE.to_string(), Value::from(score));
        }
        fields.insert(CREATED_AT.to_string(), Value::from(created_at.clone()));

        let row = self.store.insert_row(&self.tables.mood, fields)?;
        info!(
            user_id,
            score = ?final_score,
            band = score_band.as_ref().map(|band| band.band_key.as_str()),
            "check-in recorded"
        );

        self.touch_last_checkin(user_id, &created_at);

        Ok(CreatedCheckIn {
            message: "Created",
            row,
            final_score,
            score_band,
        })
    }

    /// Apply a partial update. A client-supplied score is stored verbatim, never recomputed.
    pub fn update(&self, payload: &Map<String, Value>) -> Result<UpdatedCheckIn, CheckInServiceError> {
        let row_id = required_id(payload, ID)?;

        let mut fields = Row::new();
        if let Some(user_id) = payload.get(USER_ID).and_then(coerce::as_i64) {
            fields.insert(USER_ID.to_string(), Value::from(user_id));
        }
        fields.extend(RawCheckIn::from_payload(payload).to_columns());
        if let Some(score) = payload.get(FINAL_SCORE).filter(|value| !value.is_null()) {
            fields.insert(FINAL_SCORE.to_string(), score.clone());
        }
        if let Some(timestamp) = optional_timestamp(payload)? {
            fields.insert(CREATED_AT.to_string(), Value::from(timestamp));
        }

        if fields.is_empty() {
            return Err(CheckInServiceError::EmptyUpdate);
        }

        let row = self
            .store
            .update_row(&self.tables.mood, &[Filter::eq(ID, row_id)], fields)?
            .ok_or(CheckInServiceError::NotFound("Row"))?;

        Ok(UpdatedCheckIn {
            message: "Updated",
            row,
        })
    }

    pub fn get(&self, row_id: i64) -> Result<Row, CheckInServiceError> {
        self.store
            .read_rows(&self.tables.mood, &[Filter::eq(ID, row_id)], None, Some(1))?
            .into_iter()
            .next()
            .ok_or(CheckInServiceError::NotFound("Row"))
    }

    pub fn list(&self, user_id: Option<i64>) -> Result<Vec<Row>, CheckInServiceError> {
        let filters: Vec<Filter> = user_id
            .map(|id| Filter::eq(USER_ID, id))
            .into_iter()
            .collect();
        Ok(self.store.read_rows(&self.tables.mood, &filters, None, None)?)
    }

    /// Find the user's check-in for the UTC+8 day containing the reference timestamp.
    ///
    /// Without an explicit reference, the user's stored last check-in time is used. An
    /// unparsable reference skips the lookup and yields no row.
    pub fn same_day(
        &self,
        user_id: i64,
        reference: Option<String>,
    ) -> Result<SameDayCheckIn, CheckInServiceError> {
        let reference = match reference.filter(|value| !value.trim().is_empty()) {
            Some(reference) => reference,
            None => self.stored_reference(user_id)?,
        };

        let Some(bounds) = sg_day_bounds(&reference) else {
            debug!(user_id, %reference, "reference timestamp unparsable, skipping lookup");
            return Ok(SameDayCheckIn {
                user_id,
                reference_timestamp: Some(reference),
                row: None,
            });
        };

        let filters = [
            Filter::eq(USER_ID, user_id),
            Filter::gte(CREATED_AT, bounds.start_iso()),
            Filter::lt(CREATED_AT, bounds.end_iso()),
        ];
        let order = Order::desc(CREATED_AT);
        let row = self
            .store
            .read_rows(&self.tables.mood, &filters, Some(&order), Some(1))?
            .into_iter()
            .next()
            .map(|row| self.attach_band(row));

        Ok(SameDayCheckIn {
            user_id,
            reference_timestamp: Some(reference),
            row,
        })
    }

    pub fn snapshot(&self) -> ScoringSnapshot {
        ScoringSnapshot {
            weights: self.scoring.get_weights(),
            bands: self.scoring.get_bands(),
        }
    }

    fn stored_reference(&self, user_id: i64) -> Result<String, CheckInServiceError> {
        let user = self
            .store
            .read_rows(
                &self.tables.users,
                &[Filter::eq(USER_ID, user_id)],
                None,
                Some(1),
            )?
            .into_iter()
            .next()
            .ok_or(CheckInServiceError::NotFound("User"))?;

        user.get(LAST_CHECKIN)
            .and_then(coerce::as_text)
            .ok_or(CheckInServiceError::NotFound("Reference timestamp"))
    }

    fn attach_band(&self, mut row: Row) -> Row {
        let score = row.get(FINAL_SCORE).and_then(coerce::as_f64);
        let band = match score {
            Some(_) => {
                let bands = self.scoring.get_bands();
                classify(score, &bands).and_then(|band| serde_json::to_value(band).ok())
            }
            None => None,
        };
        row.insert(SCORE_BAND.to_string(), band.unwrap_or(Value::Null));
        row
    }

    fn touch_last_checkin(&self, user_id: i64, created_at: &str) {
        let mut fields = Row::new();
        fields.insert(LAST_CHECKIN.to_string(), Value::from(created_at));
        match self
            .store
            .update_row(&self.tables.users, &[Filter::eq(USER_ID, user_id)], fields)
        {
            Ok(Some(_)) => {}
            Ok(None) => debug!(user_id, "no user row to mark with last check-in"),
            Err(error) => warn!(%error, user_id, "failed to update last check-in marker"),
        }
    }
}

fn required_id(payload: &Map<String, Value>, column: &'static str) -> Result<i64, CheckInServiceError> {
    payload
        .get(column)
        .and_then(coerce::as_i64)
        .ok_or(CheckInServiceError::MissingField(column))
}

/// Normalizes a supplied `created_timestamp` to RFC 3339 UTC.
fn optional_timestamp(payload: &Map<String, Value>) -> Result<Option<String>, CheckInServiceError> {
    match payload.get(CREATED_AT).and_then(coerce::as_text) {
        Some(raw) => parse_instant(&raw)
            .map(|instant| Some(instant.to_rfc3339()))
            .ok_or(CheckInServiceError::InvalidField(CREATED_AT)),
        None => Ok(None),
    }
}

/// Error raised by the check-in service.
#[derive(Debug, thiserror::Error)]
pub enum CheckInServiceError {
    #[error("Missing {0}")]
    MissingField(&'static str),
    #[error("Invalid {0}")]
    InvalidField(&'static str),
    #[error("No fields to update")]
    EmptyUpdate,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CheckInServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckInServiceError::MissingField(_)
            | CheckInServiceError::InvalidField(_)
            | CheckInServiceError::EmptyUpdate => StatusCode::BAD_REQUEST,
            CheckInServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            CheckInServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
