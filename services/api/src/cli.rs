use crate::commands::{run_day_bounds, run_score, DayBoundsArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mood_metrics::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Mood Metrics",
    about = "Serve daily check-ins or score them from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single check-in against the default weights
    Score(ScoreArgs),
    /// Print the UTC+8 day containing a timestamp
    DayBounds(DayBoundsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::DayBounds(args) => run_day_bounds(args),
    }
}
