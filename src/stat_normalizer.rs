//! Turns loosely shaped per-player JSON into [`CanonicalPlayerRecord`]s.
//!
//! Every logical field has one ordered alias list below. The first alias that
//! is present with a usable value wins; later aliases are not consulted.

use std::collections::HashMap;

use serde_json::Value;

use crate::state::{CanonicalPlayerRecord, Consistency, SecondaryStats, StatLine};

pub const PTS_KEYS: &[&str] = &["pts", "points", "ppg", "Points"];
pub const REB_KEYS: &[&str] = &["reb", "rebounds", "rpg", "trb", "Rebounds"];
pub const AST_KEYS: &[&str] = &["ast", "assists", "apg", "Assists"];

pub const LAST5_PTS_KEYS: &[&str] = &["last5_pts", "l5_pts", "last_5_pts", "pts_l5"];
pub const LAST5_REB_KEYS: &[&str] = &["last5_reb", "l5_reb", "last_5_reb", "reb_l5"];
pub const LAST5_AST_KEYS: &[&str] = &["last5_ast", "l5_ast", "last_5_ast", "ast_l5"];

pub const LAST10_PTS_KEYS: &[&str] = &["last10_pts", "l10_pts", "last_10_pts", "pts_l10"];
pub const LAST10_REB_KEYS: &[&str] = &["last10_reb", "l10_reb", "last_10_reb", "reb_l10"];
pub const LAST10_AST_KEYS: &[&str] = &["last10_ast", "l10_ast", "last_10_ast", "ast_l10"];

pub const USAGE_KEYS: &[&str] = &["usage", "usage_pct", "usg_pct", "usg"];
pub const MINUTES_KEYS: &[&str] = &["min", "minutes", "mpg", "Minutes"];
pub const GAMES_KEYS: &[&str] = &["games", "games_played", "gp", "Games"];
pub const PACE_KEYS: &[&str] = &["pace", "team_pace"];
pub const DEF_RANK_KEYS: &[&str] = &["def_rank", "opp_def_rank", "defense_rank"];

pub const TEAM_KEYS: &[&str] = &["team", "team_abbr", "Team"];
pub const OPPONENT_KEYS: &[&str] = &["opponent", "opp", "Opponent"];
pub const TEAM_RECORD_KEYS: &[&str] = &["team_record", "record"];
pub const OPP_RECORD_KEYS: &[&str] = &["opp_record", "opponent_record"];
pub const OPP_STREAK_KEYS: &[&str] = &["opp_streak", "opponent_streak"];

pub const CONS_PTS_KEYS: &[&str] = &["cons_pts", "consistency_pts"];
pub const CONS_REB_KEYS: &[&str] = &["cons_reb", "consistency_reb"];
pub const CONS_AST_KEYS: &[&str] = &["cons_ast", "consistency_ast"];

pub const STL_KEYS: &[&str] = &["stl", "steals"];
pub const BLK_KEYS: &[&str] = &["blk", "blocks"];
pub const TOV_KEYS: &[&str] = &["tov", "turnover", "turnovers"];
pub const FG_PCT_KEYS: &[&str] = &["fg_pct", "fg%"];
pub const FG3_PCT_KEYS: &[&str] = &["fg3_pct", "3p_pct", "fg3%"];
pub const FT_PCT_KEYS: &[&str] = &["ft_pct", "ft%"];

/// Never fails: unknown or unusable fields fall back to defaults, and a
/// non-object blob yields an all-default record.
pub fn normalize(raw: &Value, name: &str) -> CanonicalPlayerRecord {
    let season = StatLine {
        pts: pick_stat(raw, PTS_KEYS).unwrap_or(0.0),
        reb: pick_stat(raw, REB_KEYS).unwrap_or(0.0),
        ast: pick_stat(raw, AST_KEYS).unwrap_or(0.0),
    };
    let recent = StatLine {
        pts: pick_stat(raw, LAST5_PTS_KEYS).unwrap_or(season.pts),
        reb: pick_stat(raw, LAST5_REB_KEYS).unwrap_or(season.reb),
        ast: pick_stat(raw, LAST5_AST_KEYS).unwrap_or(season.ast),
    };
    let last10 = StatLine {
        pts: pick_stat(raw, LAST10_PTS_KEYS).unwrap_or(season.pts),
        reb: pick_stat(raw, LAST10_REB_KEYS).unwrap_or(season.reb),
        ast: pick_stat(raw, LAST10_AST_KEYS).unwrap_or(season.ast),
    };

    CanonicalPlayerRecord {
        name: name.trim().to_string(),
        team: pick_text(raw, TEAM_KEYS),
        opponent: pick_text(raw, OPPONENT_KEYS),
        season_averages: season,
        recent_averages: recent,
        last10_averages: last10,
        usage_pct: pick_stat(raw, USAGE_KEYS).unwrap_or(0.0),
        minutes: pick_stat(raw, MINUTES_KEYS).unwrap_or(0.0),
        games_played: pick_stat(raw, GAMES_KEYS)
            .map(|games| games.round() as u32)
            .unwrap_or(0),
        pace: pick_stat(raw, PACE_KEYS),
        def_rank: pick_rank(raw, DEF_RANK_KEYS),
        team_record: pick_text(raw, TEAM_RECORD_KEYS),
        opp_record: pick_text(raw, OPP_RECORD_KEYS),
        opp_streak: pick_text(raw, OPP_STREAK_KEYS),
        consistency: Consistency {
            pts: pick_fraction(raw, CONS_PTS_KEYS),
            reb: pick_fraction(raw, CONS_REB_KEYS),
            ast: pick_fraction(raw, CONS_AST_KEYS),
        },
        secondary: SecondaryStats {
            stl: pick_stat(raw, STL_KEYS).unwrap_or(0.0),
            blk: pick_stat(raw, BLK_KEYS).unwrap_or(0.0),
            tov: pick_stat(raw, TOV_KEYS).unwrap_or(0.0),
            fg_pct: pick_stat(raw, FG_PCT_KEYS),
            fg3_pct: pick_stat(raw, FG3_PCT_KEYS),
            ft_pct: pick_stat(raw, FT_PCT_KEYS),
        },
    }
}

/// Normalizes a `{ name: blob }` map. Blank names are skipped.
pub fn normalize_all(raw: &Value) -> HashMap<String, CanonicalPlayerRecord> {
    let Some(obj) = raw.as_object() else {
        return HashMap::new();
    };
    obj.iter()
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, blob)| {
            let record = normalize(blob, name);
            (record.name.clone(), record)
        })
        .collect()
}

/// Record used for roster names that have no stats entry at all.
pub fn placeholder_record(name: &str, team: &str) -> CanonicalPlayerRecord {
    let mut record = normalize(&Value::Null, name);
    record.team = Some(team.to_string());
    record
}

/// Accepts JSON numbers, numeric strings ("24.5", "31%") and clock minutes
/// ("34:12"). NaN, infinities and everything else are absent.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let num = match value {
        Value::Number(num) => num.as_f64(),
        Value::String(text) => parse_numeric_text(text),
        _ => None,
    }?;
    num.is_finite().then_some(num)
}

/// "34:12" → 34.2, rounded to one decimal.
pub fn parse_clock_minutes(raw: &str) -> Option<f64> {
    let (mins, secs) = raw.trim().split_once(':')?;
    let mins = mins.trim().parse::<f64>().ok()?;
    let secs = secs.trim().parse::<f64>().ok()?;
    if !mins.is_finite() || !secs.is_finite() {
        return None;
    }
    Some(((mins + secs / 60.0) * 10.0).round() / 10.0)
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.contains(':') {
        return parse_clock_minutes(text);
    }
    let text = text.strip_suffix('%').unwrap_or(text).trim_end();
    text.parse::<f64>().ok()
}

fn pick_number(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(coerce_number)
}

fn pick_stat(value: &Value, keys: &[&str]) -> Option<f64> {
    pick_number(value, keys).map(|num| num.max(0.0))
}

fn pick_fraction(value: &Value, keys: &[&str]) -> Option<f64> {
    pick_number(value, keys).map(|num| num.clamp(0.0, 1.0))
}

fn pick_rank(value: &Value, keys: &[&str]) -> Option<u32> {
    let rank = pick_number(value, keys)?.round();
    (rank >= 1.0).then_some(rank as u32)
}

fn pick_text(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        let text = match value.get(*key) {
            Some(Value::String(text)) => text.trim().to_string(),
            Some(Value::Number(num)) => num.to_string(),
            _ => continue,
        };
        if text.is_empty() || text.eq_ignore_ascii_case("n/a") {
            continue;
        }
        return Some(text);
    }
    None
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{coerce_number, normalize, parse_clock_minutes};

    #[test]
    fn clock_minutes_round_to_one_decimal() {
        assert_eq!(parse_clock_minutes("34:12"), Some(34.2));
        assert_eq!(parse_clock_minutes("0:30"), Some(0.5));
        assert_eq!(parse_clock_minutes("abc"), None);
        assert_eq!(parse_clock_minutes("12:xx"), None);
    }

    #[test]
    fn coercion_accepts_numbers_and_numeric_text() {
        assert_eq!(coerce_number(&json!(24.5)), Some(24.5));
        assert_eq!(coerce_number(&json!("24.5")), Some(24.5));
        assert_eq!(coerce_number(&json!("31%")), Some(31.0));
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!("inf")), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!(null)), None);
    }

    #[test]
    fn first_usable_alias_wins() {
        let raw = json!({"pts": "junk", "points": 18.0, "ppg": 30.0});
        assert_eq!(normalize(&raw, "A").season_averages.pts, 18.0);
    }

    #[test]
    fn na_strings_are_absent() {
        let raw = json!({"opp_streak": "N/A", "team_record": " 30-12 "});
        let record = normalize(&raw, "A");
        assert_eq!(record.opp_streak, None);
        assert_eq!(record.team_record.as_deref(), Some("30-12"));
    }
}
