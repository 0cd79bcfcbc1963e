use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use super::service::{ProfileError, ProfileService, PublicUser};
use crate::coerce;
use crate::error::AppError;
use crate::store::RowStore;

pub fn profile_router<S>(service: Arc<ProfileService<S>>) -> Router
where
    S: RowStore + 'static,
{
    Router::new()
        .route(
            "/userProfile",
            get(get_profile_handler::<S>).put(update_profile_handler::<S>),
        )
        .route("/users", get(list_users_handler::<S>))
        .with_state(service)
}

pub(crate) async fn get_profile_handler<S>(
    State(service): State<Arc<ProfileService<S>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PublicUser>, AppError>
where
    S: RowStore + 'static,
{
    let user_id = params
        .get("userId")
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .ok_or(ProfileError::MissingUserId)?;
    Ok(Json(service.get(user_id)?))
}

pub(crate) async fn update_profile_handler<S>(
    State(service): State<Arc<ProfileService<S>>>,
    body: Bytes,
) -> Result<Json<PublicUser>, AppError>
where
    S: RowStore + 'static,
{
    let updated = service.update(&coerce::object_from_body(&body))?;
    Ok(Json(updated))
}

pub(crate) async fn list_users_handler<S>(
    State(service): State<Arc<ProfileService<S>>>,
) -> Result<Json<Value>, AppError>
where
    S: RowStore + 'static,
{
    let users = service.list()?;
    Ok(Json(json!({ "count": users.len(), "rows": users })))
}
