//! Mood scoring engine.
//!
//! Raw check-in inputs are normalized per component, combined into a weighted 0-10 score,
//! and classified into a descriptive band. Weights and bands come from the row store through
//! [`ScoringConfigProvider`]; the day-boundary helpers resolve which UTC+8 calendar day a
//! timestamp belongs to for same-day lookups.

pub mod aggregator;
pub mod bands;
pub mod day_bounds;
pub mod inputs;
pub mod normalizer;
pub mod provider;
pub mod rules;

pub use aggregator::{aggregate, breakdown, ComponentContribution, ScoreBreakdown};
pub use bands::{classify, parse_tips, BandRowError, ScoreBand};
pub use day_bounds::{parse_instant, sg_day_bounds, DayBounds};
pub use inputs::RawCheckIn;
pub use normalizer::{normalize, Normalizer, Peak, Saturate};
pub use provider::ScoringConfigProvider;
pub use rules::{default_weight_rules, Component, Direction, RuleRowError, Transform, WeightRule};
