use serde_json::json;

use spotstats_terminal::stat_normalizer::normalize;
use spotstats_terminal::state::{StatKind, TrendDirection};
use spotstats_terminal::trend::{
    aggregate_all, aggregate_trend, direction_symbol, rollup, sparkline_points,
};

#[test]
fn missing_recent_average_falls_back_to_season() {
    let record = normalize(&json!({"pts": 20}), "A");
    let bundle = aggregate_trend(&record, StatKind::Pts);
    assert_eq!(bundle.recent_value, 20.0);
    assert_eq!(bundle.direction, TrendDirection::Flat);
    assert_eq!(bundle.fill_ratio, 0.5);
}

#[test]
fn direction_follows_values_not_hints() {
    let record = normalize(
        &json!({"pts": 20, "last5_pts": 18, "trend_pts": "up", "reb": 5, "l5_reb": 7}),
        "A",
    );
    let set = aggregate_all(&record);
    assert_eq!(set.pts.direction, TrendDirection::Down);
    assert_eq!(set.reb.direction, TrendDirection::Up);
    assert_eq!(set.ast.direction, TrendDirection::Flat);
}

#[test]
fn up_only_when_recent_exceeds_season() {
    let cases = [(10.0, 10.0), (10.0, 9.9), (10.0, 10.1), (0.0, 0.0), (0.0, 3.0)];
    for (season, recent) in cases {
        let record = normalize(&json!({"ast": season, "last5_ast": recent}), "A");
        let bundle = aggregate_trend(&record, StatKind::Ast);
        assert_eq!(
            bundle.direction == TrendDirection::Up,
            bundle.recent_value > bundle.season_value,
            "season {season} recent {recent}"
        );
    }
}

#[test]
fn fill_ratio_uses_fixed_ceilings() {
    let record = normalize(
        &json!({"last5_pts": 50, "last5_reb": 7.5, "last5_ast": 3}),
        "A",
    );
    let set = aggregate_all(&record);
    assert_eq!(set.pts.fill_ratio, 1.0);
    assert_eq!(set.reb.fill_ratio, 0.5);
    assert_eq!(set.ast.fill_ratio, 0.25);
}

#[test]
fn rollup_compares_both_windows_to_season() {
    let record = normalize(
        &json!({"pts": 20, "last5_pts": 24, "last10_pts": 18}),
        "A",
    );
    let r = rollup(&record, StatKind::Pts);
    assert_eq!((r.season, r.last5, r.last10), (20.0, 24.0, 18.0));
    assert_eq!(r.last5_direction, TrendDirection::Up);
    assert_eq!(r.last10_direction, TrendDirection::Down);
    assert_eq!(sparkline_points(&r), [50, 45, 60]);
}

#[test]
fn last10_falls_back_per_component() {
    let record = normalize(&json!({"reb": 6, "last10_pts": 12, "pts": 10}), "A");
    let reb = rollup(&record, StatKind::Reb);
    assert_eq!(reb.last10, 6.0);
    assert_eq!(reb.last10_direction, TrendDirection::Flat);
    assert_eq!(rollup(&record, StatKind::Pts).last10, 12.0);
}

#[test]
fn symbols_match_directions() {
    assert_eq!(direction_symbol(TrendDirection::Up), "▲");
    assert_eq!(direction_symbol(TrendDirection::Down), "▼");
    assert_eq!(direction_symbol(TrendDirection::Flat), "▬");
}
