use serde::Serialize;

use super::inputs::RawCheckIn;
use super::rules::{Component, WeightRule};

/// What a single rule added to the weighted average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentContribution {
    pub component: Component,
    pub weight: f64,
    pub normalized: f64,
}

/// Full trail of an aggregation, kept for CLI output and audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub contributions: Vec<ComponentContribution>,
    pub score: Option<f64>,
}

/// Weighted 0-10 score over every component that could be normalized.
///
/// Returns `None` when no active rule had an input to work with.
pub fn aggregate(inputs: &RawCheckIn, weights: &[WeightRule]) -> Option<f64> {
    breakdown(inputs, weights).score
}

pub fn breakdown(inputs: &RawCheckIn, weights: &[WeightRule]) -> ScoreBreakdown {
    let mut contributions = Vec::new();
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for rule in weights.iter().filter(|rule| rule.is_active()) {
        let Some(normalized) = rule.normalize(inputs) else {
            continue;
        };
        numerator += rule.weight * normalized;
        denominator += rule.weight;
        contributions.push(ComponentContribution {
            component: rule.component,
            weight: rule.weight,
            normalized,
        });
    }

    let score = if denominator > 0.0 {
        Some(round_one_decimal(numerator / denominator * 10.0))
    } else {
        None
    };

    ScoreBreakdown {
        contributions,
        score,
    }
}

/// Banker's rounding to one decimal: an exact half goes to the even digit (7.25 -> 7.2).
///
/// The tie test runs on the binary value of `value * 10`, so a decimal literal that is not
/// exactly representable (7.35) rounds by whichever side of the half its product lands on.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rules::{default_weight_rules, Direction, Transform};

    fn reference_inputs() -> RawCheckIn {
        RawCheckIn {
            mood: Some(7),
            energy: Some(6),
            stress: Some(3),
            sleep_quality: Some(6),
            sleep_hours: Some(7.5),
            exercise_hours: Some(0.5),
            time_outside_min: Some(25),
            working_hrs: Some(8.0),
            connect_with_family: Some(true),
            notes: Some("long day".to_string()),
        }
    }

    #[test]
    fn reference_check_in_scores_seven_point_three() {
        let score = aggregate(&reference_inputs(), default_weight_rules());
        assert_eq!(score, Some(7.3));
    }

    #[test]
    fn exact_halves_round_to_even() {
        assert_eq!(round_one_decimal(7.25), 7.2);
        assert_eq!(round_one_decimal(7.75), 7.8);
        assert_eq!(round_one_decimal(7.26), 7.3);
        assert_eq!(round_one_decimal(7.258333), 7.3);
    }

    #[test]
    fn no_inputs_means_no_score() {
        assert_eq!(aggregate(&RawCheckIn::default(), default_weight_rules()), None);

        let notes_only = RawCheckIn {
            notes: Some("skipped everything".to_string()),
            ..RawCheckIn::default()
        };
        assert_eq!(aggregate(&notes_only, default_weight_rules()), None);
    }

    #[test]
    fn missing_components_renormalize_instead_of_scoring_zero() {
        let inputs = RawCheckIn {
            mood: Some(8),
            ..RawCheckIn::default()
        };
        let result = breakdown(&inputs, default_weight_rules());
        assert_eq!(result.score, Some(8.0));
        assert_eq!(result.contributions.len(), 1);
        assert_eq!(result.contributions[0].component, Component::Mood);
    }

    #[test]
    fn non_positive_weights_are_skipped() {
        let rules = vec![
            WeightRule::new(Component::Mood, 0.0, Direction::Positive, Transform::Scale10, ""),
            WeightRule::new(
                Component::Energy,
                -1.0,
                Direction::Positive,
                Transform::Scale10,
                "",
            ),
            WeightRule::new(Component::Stress, 0.5, Direction::Negative, Transform::Scale10, ""),
        ];
        let inputs = reference_inputs();
        assert_eq!(aggregate(&inputs, &rules), Some(7.0));

        let inactive_only = &rules[..2];
        assert_eq!(aggregate(&inputs, inactive_only), None);
    }

    #[test]
    fn same_inputs_and_weights_give_same_score() {
        let first = aggregate(&reference_inputs(), default_weight_rules());
        let second = aggregate(&reference_inputs(), default_weight_rules());
        assert_eq!(first, second);
    }
}
