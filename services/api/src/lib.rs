mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use mood_metrics::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
