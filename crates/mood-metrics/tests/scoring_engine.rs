use mood_metrics::scoring::{
    aggregate, breakdown, classify, default_weight_rules, normalize, parse_tips, sg_day_bounds,
    Component, Direction, RawCheckIn, ScoreBand, Transform,
};
use serde_json::{json, Map, Value};

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
        notes: Some("not scored".to_string()),
    }
}

fn band(key: &str, min: f64, max: f64, inclusive_min: bool, inclusive_max: bool) -> ScoreBand {
    let mut row = Map::new();
    row.insert("band_key".into(), json!(key));
    row.insert("label".into(), json!(key.to_uppercase()));
    row.insert("min_score".into(), json!(min));
    row.insert("max_score".into(), json!(max));
    row.insert("inclusive_min".into(), json!(inclusive_min));
    row.insert("inclusive_max".into(), json!(inclusive_max));
    ScoreBand::from_row(&row).expect("band row parses")
}

#[test]
fn default_configuration_pins_reference_score() {
    let weights = default_weight_rules();
    assert_eq!(aggregate(&reference_inputs(), weights), Some(7.3));

    let detail = breakdown(&reference_inputs(), weights);
    assert_eq!(detail.contributions.len(), 9);
    assert_eq!(detail.score, Some(7.3));
    let exercise = detail
        .contributions
        .iter()
        .find(|entry| entry.component == Component::Exercise)
        .expect("exercise contribution");
    assert!((exercise.normalized - 30.0 / 45.0).abs() < 1e-9);
}

#[test]
fn absent_inputs_produce_no_score() {
    assert_eq!(aggregate(&RawCheckIn::default(), default_weight_rules()), None);

    let only_mood = RawCheckIn {
        mood: Some(4),
        ..RawCheckIn::default()
    };
    assert_eq!(aggregate(&only_mood, default_weight_rules()), Some(4.0));
}

#[test]
fn stress_and_energy_ignore_configured_direction() {
    for (transform, direction) in [
        (Transform::Scale10, Direction::Positive),
        (Transform::InverseScale10, Direction::Negative),
        (Transform::Other("custom".into()), Direction::Negative),
    ] {
        let high = RawCheckIn {
            stress: Some(10),
            energy: Some(10),
            ..RawCheckIn::default()
        };
        assert_eq!(
            normalize(Component::Stress, &transform, direction, "", &high),
            Some(0.0)
        );
        assert_eq!(
            normalize(Component::Energy, &transform, direction, "", &high),
            Some(1.0)
        );
    }
}

#[test]
fn band_edges_follow_inclusivity_flags() {
    let closed = vec![band("low", 0.0, 5.0, true, true), band("high", 5.0, 10.0, true, true)];
    let open = vec![band("low", 0.0, 5.0, true, false), band("high", 5.0, 10.0, true, true)];

    assert_eq!(classify(Some(5.0), &closed).map(|b| b.band_key.as_str()), Some("low"));
    assert_eq!(classify(Some(5.0), &open).map(|b| b.band_key.as_str()), Some("high"));
    assert_eq!(classify(Some(5.0), &open), classify(Some(5.0), &open));
    assert!(classify(Some(11.0), &closed).is_none());
    assert!(classify(None, &closed).is_none());
}

#[test]
fn tips_parse_from_json_or_plain_text() {
    assert_eq!(
        parse_tips(&Value::from("[\"breathe\", \"walk\"]")),
        vec!["breathe", "walk"]
    );
    assert_eq!(parse_tips(&Value::from("Call a friend")), vec!["Call a friend"]);
    assert!(parse_tips(&Value::from("")).is_empty());
}

#[test]
fn day_bounds_resolve_in_utc_plus_eight() {
    let bounds = sg_day_bounds("2025-09-06T18:00:00Z").expect("parses");
    assert_eq!(bounds.local_date.to_string(), "2025-09-07");
    assert_eq!(bounds.start_iso(), "2025-09-06T16:00:00+00:00");
    assert_eq!(bounds.end_iso(), "2025-09-07T16:00:00+00:00");

    let naive = sg_day_bounds("2025-09-06T15:59:59").expect("naive treated as UTC");
    assert_eq!(naive.local_date.to_string(), "2025-09-06");

    assert!(sg_day_bounds("06/09/2025 6pm").is_none());
}
