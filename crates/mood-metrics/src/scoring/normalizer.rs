use std::sync::LazyLock;

use regex::Regex;

use super::inputs::RawCheckIn;
use super::rules::{Component, Direction, Transform};

static NOTE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+(?:\.\d+)?").expect("note number pattern compiles"));

const DEFAULT_PEAK_CENTER: f64 = 8.0;
const DEFAULT_PEAK_WIDTH: f64 = 4.0;
const DEFAULT_EXERCISE_CAP_MINUTES: f64 = 45.0;
const DEFAULT_OUTSIDE_CAP_MINUTES: f64 = 30.0;

/// Every signed decimal number in a rule's free-text notes, in order.
pub fn note_numbers(notes: &str) -> Vec<f64> {
    NOTE_NUMBER
        .find_iter(notes)
        .filter_map(|found| found.as_str().parse::<f64>().ok())
        .collect()
}

/// Highest at `center`, falling linearly to zero `width` away from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub center: f64,
    pub width: f64,
}

impl Peak {
    fn from_notes(notes: &str) -> Self {
        let numbers = note_numbers(notes);
        let center = numbers.first().copied().unwrap_or(DEFAULT_PEAK_CENTER);
        let width = numbers
            .get(1)
            .copied()
            .filter(|width| *width > 0.0)
            .unwrap_or(DEFAULT_PEAK_WIDTH);
        Self { center, width }
    }

    fn score(&self, value: f64) -> f64 {
        1.0 - (value - self.center).abs() / self.width
    }
}

/// Rises linearly to 1 at `cap`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saturate {
    pub cap: f64,
}

impl Saturate {
    fn from_notes(notes: &str, default_cap: f64) -> Self {
        let cap = note_numbers(notes)
            .first()
            .copied()
            .filter(|cap| *cap > 0.0)
            .unwrap_or(default_cap);
        Self { cap }
    }

    fn score(&self, value: f64) -> f64 {
        value / self.cap
    }
}

/// Per-component normalization, compiled from a weight rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalizer {
    Mood { invert: bool },
    Energy,
    /// Always inverted, whatever the rule's direction or transform says.
    Stress,
    SleepQuality,
    SleepHours(Peak),
    Exercise(Saturate),
    Outside(Saturate),
    WorkBalance(Peak),
    Connect,
}

impl Normalizer {
    pub fn compile(
        component: Component,
        direction: Direction,
        transform: &Transform,
        notes: &str,
    ) -> Self {
        match component {
            Component::Mood => Self::Mood {
                invert: *transform == Transform::InverseScale10 || direction == Direction::Negative,
            },
            Component::Energy => Self::Energy,
            Component::Stress => Self::Stress,
            Component::SleepQuality => Self::SleepQuality,
            Component::SleepHours => Self::SleepHours(Peak::from_notes(notes)),
            Component::Exercise => {
                Self::Exercise(Saturate::from_notes(notes, DEFAULT_EXERCISE_CAP_MINUTES))
            }
            Component::Outside => {
                Self::Outside(Saturate::from_notes(notes, DEFAULT_OUTSIDE_CAP_MINUTES))
            }
            Component::WorkBalance => Self::WorkBalance(Peak::from_notes(notes)),
            Component::Connect => Self::Connect,
        }
    }

    /// Maps the matching input into `[0, 1]`, or `None` when that input is absent.
    pub fn apply(&self, inputs: &RawCheckIn) -> Option<f64> {
        let raw = match self {
            Normalizer::Mood { invert } => {
                let x = scale10(inputs.mood?);
                if *invert {
                    1.0 - x
                } else {
                    x
                }
            }
            Normalizer::Energy => scale10(inputs.energy?),
            Normalizer::Stress => 1.0 - scale10(inputs.stress?),
            Normalizer::SleepQuality => scale10(inputs.sleep_quality?),
            Normalizer::SleepHours(peak) => peak.score(inputs.sleep_hours?),
            Normalizer::Exercise(saturate) => saturate.score(inputs.exercise_hours? * 60.0),
            Normalizer::Outside(saturate) => saturate.score(inputs.time_outside_min? as f64),
            Normalizer::WorkBalance(peak) => peak.score(inputs.working_hrs?),
            Normalizer::Connect => {
                if inputs.connect_with_family? {
                    1.0
                } else {
                    0.0
                }
            }
        };
        Some(raw.clamp(0.0, 1.0))
    }
}

fn scale10(value: i64) -> f64 {
    value as f64 / 10.0
}

/// One-shot normalization straight from rule fields.
pub fn normalize(
    component: Component,
    transform: &Transform,
    direction: Direction,
    notes: &str,
    inputs: &RawCheckIn,
) -> Option<f64> {
    Normalizer::compile(component, direction, transform, notes).apply(inputs)
}
