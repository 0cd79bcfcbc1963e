use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use super::service::{CatalogRows, CatalogService, EncouragementWords};
use crate::error::AppError;
use crate::store::RowStore;

pub fn catalog_router<S>(service: Arc<CatalogService<S>>) -> Router
where
    S: RowStore + 'static,
{
    Router::new()
        .route("/rangeConfig", get(range_config_handler::<S>))
        .route("/labelOptions", get(label_options_handler::<S>))
        .route("/mascotWords", get(mascot_words_handler::<S>))
        .route("/encouragementAll", get(all_encouragement_handler::<S>))
        .with_state(service)
}

pub(crate) async fn range_config_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<CatalogRows>, AppError>
where
    S: RowStore + 'static,
{
    let rows = service.range_config(params.get("field_name").map(String::as_str))?;
    Ok(Json(rows))
}

pub(crate) async fn label_options_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<CatalogRows>, AppError>
where
    S: RowStore + 'static,
{
    let rows = service.label_options(params.get("field_name").map(String::as_str))?;
    Ok(Json(rows))
}

pub(crate) async fn mascot_words_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<EncouragementWords>, AppError>
where
    S: RowStore + 'static,
{
    let words = service.mascot_words(params.get("feeling").map(String::as_str))?;
    Ok(Json(words))
}

pub(crate) async fn all_encouragement_handler<S>(
    State(service): State<Arc<CatalogService<S>>>,
) -> Result<Json<CatalogRows>, AppError>
where
    S: RowStore + 'static,
{
    Ok(Json(service.all_encouragement()?))
}
