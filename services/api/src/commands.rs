use clap::Args;
use mood_metrics::error::AppError;
use mood_metrics::scoring::{
    breakdown, classify, default_weight_rules, sg_day_bounds, RawCheckIn, ScoreBand,
};
use mood_metrics::store::Row;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Mood on a 1-10 scale
    #[arg(long)]
    pub(crate) mood: Option<i64>,
    /// Energy on a 1-10 scale
    #[arg(long)]
    pub(crate) energy: Option<i64>,
    /// Stress on a 1-10 scale (higher is worse)
    #[arg(long)]
    pub(crate) stress: Option<i64>,
    /// Sleep quality on a 1-10 scale
    #[arg(long)]
    pub(crate) sleep_quality: Option<i64>,
    /// Hours slept
    #[arg(long)]
    pub(crate) sleep_hours: Option<f64>,
    /// Hours of exercise
    #[arg(long)]
    pub(crate) exercise_hours: Option<f64>,
    /// Minutes spent outside
    #[arg(long)]
    pub(crate) outside_minutes: Option<i64>,
    /// Hours worked
    #[arg(long)]
    pub(crate) working_hours: Option<f64>,
    /// Whether the user connected with family (bare flag means yes)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub(crate) connect_with_family: Option<bool>,
    /// JSON file holding an array of band rows used for classification
    #[arg(long)]
    pub(crate) bands: Option<PathBuf>,
}

impl ScoreArgs {
    fn inputs(&self) -> RawCheckIn {
        RawCheckIn {
            sleep_hours: self.sleep_hours,
            exercise_hours: self.exercise_hours,
            working_hrs: self.working_hours,
            sleep_quality: self.sleep_quality,
            mood: self.mood,
            energy: self.energy,
            stress: self.stress,
            time_outside_min: self.outside_minutes,
            connect_with_family: self.connect_with_family,
            notes: None,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct DayBoundsArgs {
    /// ISO-8601 timestamp; offset-less values are read as UTC
    pub(crate) timestamp: String,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let bands = match &args.bands {
        Some(path) => load_bands(path)?,
        None => Vec::new(),
    };
    let detail = breakdown(&args.inputs(), default_weight_rules());

    println!("Component contributions");
    if detail.contributions.is_empty() {
        println!("- none (no inputs supplied)");
    }
    for entry in &detail.contributions {
        println!(
            "- {:<13} weight {:.2} -> {:.3}",
            entry.component, entry.weight, entry.normalized
        );
    }

    match detail.score {
        Some(score) => println!("\nFinal score: {score:.1}"),
        None => println!("\nFinal score: n/a"),
    }

    match classify(detail.score, &bands) {
        Some(band) => {
            println!("Band: {} ({})", band.label, band.band_key);
            if let Some(message) = &band.message {
                println!("  {message}");
            }
            for tip in &band.tips {
                println!("  * {tip}");
            }
        }
        None if bands.is_empty() => println!("Band: n/a (no bands loaded)"),
        None => println!("Band: none matched"),
    }

    Ok(())
}

pub(crate) fn run_day_bounds(args: DayBoundsArgs) -> Result<(), AppError> {
    match sg_day_bounds(&args.timestamp) {
        Some(bounds) => {
            println!("Local date (UTC+8): {}", bounds.local_date);
            println!("Start (UTC): {}", bounds.start_iso());
            println!("End (UTC):   {}", bounds.end_iso());
        }
        None => println!("Unparsable timestamp '{}': no day range", args.timestamp),
    }
    Ok(())
}

/// Reads band rows from disk, dropping the ones whose bounds do not parse.
pub(crate) fn load_bands(path: &Path) -> Result<Vec<ScoreBand>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let rows: Vec<Row> = serde_json::from_str(&raw)?;
    let mut bands: Vec<ScoreBand> = rows
        .iter()
        .filter_map(|row| ScoreBand::from_row(row).ok())
        .collect();
    bands.sort_by_key(|band| band.display_order);
    Ok(bands)
}
