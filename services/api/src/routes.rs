use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use mood_metrics::catalog::{catalog_router, CatalogService};
use mood_metrics::checkins::{checkin_router, CheckInService};
use mood_metrics::config::TableNames;
use mood_metrics::profiles::{profile_router, ProfileService};
use mood_metrics::store::RowStore;
use serde_json::json;
use std::sync::Arc;

/// Mounts every workflow over one shared store, plus the operational endpoints.
pub(crate) fn with_service_routes<S>(store: Arc<S>, tables: &TableNames) -> Router
where
    S: RowStore + 'static,
{
    let checkins = Arc::new(CheckInService::new(store.clone(), tables.clone()));
    let catalog = Arc::new(CatalogService::new(store.clone(), tables.clone()));
    let profiles = Arc::new(ProfileService::new(store, tables.users.clone()));

    checkin_router(checkins)
        .merge(catalog_router(catalog))
        .merge(profile_router(profiles))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    if ready {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryRowStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn test_app(ready: bool) -> Router {
        let store = Arc::new(InMemoryRowStore::default());
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_service_routes(store, &TableNames::default()).layer(Extension(state))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("valid json")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = test_app(false)
            .oneshot(get_request("/health"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let pending = test_app(false)
            .oneshot(get_request("/ready"))
            .await
            .expect("response");
        assert_eq!(pending.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(pending).await["status"], "initializing");

        let ready = test_app(true)
            .oneshot(get_request("/ready"))
            .await
            .expect("response");
        assert_eq!(ready.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_render_as_prometheus_text() {
        let response = test_app(true)
            .oneshot(get_request("/metrics"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn check_in_routes_are_mounted() {
        let request = Request::builder()
            .method("POST")
            .uri("/moodMetric")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "userId": 3, "mood": 8, "stress": 2 }).to_string(),
            ))
            .expect("request");

        let response = test_app(true).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["finalScore"], json!(8.0));
        assert_eq!(body["scoreBand"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn reference_and_profile_routes_are_mounted() {
        let response = test_app(true)
            .oneshot(get_request("/encouragementAll"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["count"], 0);

        let response = test_app(true)
            .oneshot(get_request("/userProfile?userId=1"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "User not found" })
        );
    }
}
