use serde_json::json;

use spotstats_terminal::scoring::{INSUFFICIENT_DATA_CONFIDENCE, confidence, score, tier_for};
use spotstats_terminal::stat_normalizer::normalize;
use spotstats_terminal::state::{CanonicalPlayerRecord, Tier};

fn record(raw: serde_json::Value) -> CanonicalPlayerRecord {
    normalize(&raw, "Test Player")
}

#[test]
fn heavy_minutes_usage_and_top_defense_is_green() {
    let scored = score(&record(json!({"pts": 25, "usage": 24, "min": 30, "def_rank": 8})));
    assert_eq!(scored.confidence, 0.8);
    assert_eq!(scored.tier, Tier::Green);
    assert_eq!(scored.factors.len(), 3);
    assert!(scored.factors.iter().all(|f| f.delta > 0.0));
}

#[test]
fn weak_defense_alone_drops_to_red() {
    let scored = score(&record(json!({"pts": 12, "usage": 18, "min": 22, "def_rank": 25})));
    assert_eq!(scored.confidence, 0.4);
    assert_eq!(scored.tier, Tier::Red);
    assert_eq!(scored.factors.len(), 1);
    assert!(scored.factors[0].delta < 0.0);
}

#[test]
fn no_scoring_average_is_insufficient_data() {
    let scored = score(&record(json!({"pts": 0})));
    assert_eq!(scored.confidence, INSUFFICIENT_DATA_CONFIDENCE);
    assert_eq!(scored.tier, Tier::Red);
    assert!(scored.factors[0].label.to_lowercase().contains("insufficient"));
}

#[test]
fn insufficient_data_ignores_every_other_field() {
    let loaded = record(json!({
        "pts": 0, "usage": 40, "min": 40, "def_rank": 1, "games": 60, "reb": 12
    }));
    assert_eq!(confidence(&loaded), 0.45);
    let empty = record(json!({}));
    assert_eq!(confidence(&empty), 0.45);
    let garbage = normalize(&json!("not an object"), "X");
    assert_eq!(confidence(&garbage), 0.45);
}

#[test]
fn thresholds_are_strict() {
    let at_thresholds = record(json!({"pts": 10, "usage": 22, "min": 28}));
    assert_eq!(confidence(&at_thresholds), 0.5);
    assert_eq!(score(&at_thresholds).tier, Tier::Red);

    let rank_ten = record(json!({"pts": 10, "def_rank": 10}));
    assert_eq!(confidence(&rank_ten), 0.6);
    let rank_eleven = record(json!({"pts": 10, "def_rank": 11}));
    assert_eq!(confidence(&rank_eleven), 0.5);
    let rank_twenty = record(json!({"pts": 10, "def_rank": 20}));
    assert_eq!(confidence(&rank_twenty), 0.4);
}

#[test]
fn confidence_stays_in_unit_range() {
    let samples = [
        json!({"pts": 30, "usage": 35, "min": 38, "def_rank": 1}),
        json!({"pts": 5, "def_rank": 30}),
        json!({"pts": 0.1}),
        json!({"pts": "1e308", "usage": "1e308", "min": "1e308"}),
        json!({"pts": -5, "usage": -5}),
    ];
    for raw in samples {
        let c = confidence(&record(raw));
        assert!((0.0..=1.0).contains(&c), "confidence {c} out of range");
    }
}

#[test]
fn tiers_are_monotonic_in_confidence() {
    let rank = |tier: Tier| match tier {
        Tier::Red => 0,
        Tier::Yellow => 1,
        Tier::Green => 2,
    };
    let mut previous = rank(tier_for(0.0));
    for step in 1..=100 {
        let current = rank(tier_for(step as f64 / 100.0));
        assert!(current >= previous, "tier dropped at {step}%");
        previous = current;
    }
}

#[test]
fn scoring_is_idempotent() {
    let r = record(json!({"pts": 18, "usage": 23.5, "min": "31:00", "def_rank": 14}));
    assert_eq!(score(&r), score(&r));
}
