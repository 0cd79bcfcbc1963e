use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRowStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mood_metrics::config::AppConfig;
use mood_metrics::error::AppError;
use mood_metrics::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = match &config.store.seed_path {
        Some(path) => {
            let store = InMemoryRowStore::from_seed_file(path)?;
            info!(path = %path.display(), rows = store.row_count(), "row store seeded");
            store
        }
        None => InMemoryRowStore::default(),
    };
    let app = with_service_routes(Arc::new(store), &config.store.tables)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mood metrics service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
