use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::domain::columns::{ID, USER_ID};
use super::domain::ScoringSnapshot;
use super::service::{CheckInService, CheckInServiceError};
use crate::coerce;
use crate::error::AppError;
use crate::store::RowStore;

/// Router builder exposing the check-in and scoring endpoints.
///
/// Bodies are read leniently: a missing content type or malformed JSON reaches the service as
/// an empty object, so clients always get a JSON `{ "error" }` back.
pub fn checkin_router<S>(service: Arc<CheckInService<S>>) -> Router
where
    S: RowStore + 'static,
{
    Router::new()
        .route(
            "/moodMetric",
            get(list_handler::<S>)
                .post(create_handler::<S>)
                .put(update_handler::<S>),
        )
        .route("/moodMetric/sameDay", get(same_day_handler::<S>))
        .route("/moodScore/config", get(config_handler::<S>))
        .with_state(service)
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<CheckInService<S>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError>
where
    S: RowStore + 'static,
{
    if let Some(row_id) = int_param(&params, ID) {
        let row = service.get(row_id)?;
        return Ok(Json(json!({ "row": row })).into_response());
    }

    let rows = service.list(int_param(&params, USER_ID))?;
    Ok(Json(json!({ "rows": rows })).into_response())
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<CheckInService<S>>>,
    body: Bytes,
) -> Result<Response, AppError>
where
    S: RowStore + 'static,
{
    let created = service.create(&coerce::object_from_body(&body))?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub(crate) async fn update_handler<S>(
    State(service): State<Arc<CheckInService<S>>>,
    body: Bytes,
) -> Result<Response, AppError>
where
    S: RowStore + 'static,
{
    let updated = service.update(&coerce::object_from_body(&body))?;
    Ok(Json(updated).into_response())
}

pub(crate) async fn same_day_handler<S>(
    State(service): State<Arc<CheckInService<S>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError>
where
    S: RowStore + 'static,
{
    let user_id =
        int_param(&params, USER_ID).ok_or(CheckInServiceError::MissingField(USER_ID))?;
    let found = service.same_day(user_id, params.get("timestamp").cloned())?;
    Ok(Json(found).into_response())
}

pub(crate) async fn config_handler<S>(
    State(service): State<Arc<CheckInService<S>>>,
) -> Json<ScoringSnapshot>
where
    S: RowStore + 'static,
{
    Json(service.snapshot())
}

fn int_param(params: &HashMap<String, String>, key: &str) -> Option<i64> {
    params.get(key).and_then(|raw| raw.trim().parse::<i64>().ok())
}
