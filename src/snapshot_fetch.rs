use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{DataSource, parse_date};
use crate::error::LoadError;
use crate::http_cache;
use crate::http_client::http_client;
use crate::stat_normalizer;
use crate::state::{CanonicalPlayerRecord, Dataset, GameDescriptor};

pub const ROSTERS_FILE: &str = "rosters.json";
pub const SCHEDULE_FILE: &str = "schedule.json";
pub const PLAYER_STATS_FILE: &str = "player_stats.json";

pub type Rosters = BTreeMap<String, Vec<String>>;
pub type Schedule = BTreeMap<NaiveDate, Vec<GameDescriptor>>;

/// Fetches all three snapshots concurrently. Any failure fails the whole load.
pub fn load_dataset(source: &DataSource, generation: u64) -> Result<Dataset, LoadError> {
    let started = Instant::now();
    let (rosters, (schedule, players)) = rayon::join(
        || read_snapshot(source, ROSTERS_FILE).and_then(|raw| parse_rosters_json(&raw)),
        || {
            rayon::join(
                || read_snapshot(source, SCHEDULE_FILE).and_then(|raw| parse_schedule_json(&raw)),
                || {
                    read_snapshot(source, PLAYER_STATS_FILE)
                        .and_then(|raw| parse_player_stats_json(&raw))
                },
            )
        },
    );
    let dataset = build_dataset(generation, rosters?, schedule?, players?);
    info!(
        generation,
        source = %source.describe(),
        players = dataset.players.len(),
        teams = dataset.rosters.len(),
        days = dataset.schedule.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dataset loaded"
    );
    Ok(dataset)
}

pub fn read_snapshot(source: &DataSource, file: &str) -> Result<String, LoadError> {
    match source {
        DataSource::Directory(dir) => {
            let path = dir.join(file);
            fs::read_to_string(&path).map_err(|source| LoadError::Io { path, source })
        }
        DataSource::Remote(base) => {
            let url = format!("{base}/{file}");
            let client = http_client().map_err(|err| LoadError::Client(err.to_string()))?;
            http_cache::fetch_text_cached(client, &url, &[])
        }
    }
}

/// Roster names missing a team get the roster's code.
pub fn build_dataset(
    generation: u64,
    rosters: Rosters,
    schedule: Schedule,
    mut players: HashMap<String, CanonicalPlayerRecord>,
) -> Dataset {
    for (team, names) in &rosters {
        for name in names {
            if let Some(record) = players.get_mut(name)
                && record.team.is_none()
            {
                record.team = Some(team.clone());
            }
        }
    }
    Dataset {
        generation,
        loaded_at: Utc::now(),
        players,
        rosters,
        schedule,
    }
}

/// `{ "BOS": ["Jayson Tatum", ...] }`. Codes are upper-cased; order is kept.
pub fn parse_rosters_json(raw: &str) -> Result<Rosters, LoadError> {
    let Some(value) = parse_value(raw, "rosters snapshot")? else {
        return Ok(Rosters::new());
    };
    let Some(obj) = value.as_object() else {
        return Err(LoadError::Shape {
            what: "rosters snapshot",
            expected: "an object of team code to player names",
        });
    };
    let mut rosters = Rosters::new();
    for (team, names) in obj {
        let team = team.trim().to_ascii_uppercase();
        if team.is_empty() {
            continue;
        }
        let names = names
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        rosters.entry(team).or_default().extend(names);
    }
    Ok(rosters)
}

/// Accepts either `{ "YYYY-MM-DD": [game, ...] }` or a flat list of games that
/// each carry their own date.
pub fn parse_schedule_json(raw: &str) -> Result<Schedule, LoadError> {
    let Some(value) = parse_value(raw, "schedule snapshot")? else {
        return Ok(Schedule::new());
    };
    let mut schedule = Schedule::new();
    match value {
        Value::Object(days) => {
            for (date, games) in &days {
                let Some(date) = parse_date(date) else {
                    warn!(key = %date, "skipping schedule entry with bad date");
                    continue;
                };
                let games = games.as_array().map(Vec::as_slice).unwrap_or(&[]);
                let day = schedule.entry(date).or_default();
                day.extend(games.iter().filter_map(parse_game));
            }
        }
        Value::Array(games) => {
            for entry in &games {
                let date = pick_str(entry, GAME_DATE_KEYS).and_then(|raw| parse_date(&raw));
                let (Some(date), Some(game)) = (date, parse_game(entry)) else {
                    continue;
                };
                schedule.entry(date).or_default().push(game);
            }
        }
        _ => {
            return Err(LoadError::Shape {
                what: "schedule snapshot",
                expected: "an object keyed by date or a list of games",
            });
        }
    }
    schedule.retain(|_, games| !games.is_empty());
    Ok(schedule)
}

/// `{ "Player Name": { ...raw stats... } }`.
pub fn parse_player_stats_json(raw: &str) -> Result<HashMap<String, CanonicalPlayerRecord>, LoadError> {
    let Some(value) = parse_value(raw, "player stats snapshot")? else {
        return Ok(HashMap::new());
    };
    if !value.is_object() {
        return Err(LoadError::Shape {
            what: "player stats snapshot",
            expected: "an object of player name to stats",
        });
    }
    Ok(stat_normalizer::normalize_all(&value))
}

const GAME_DATE_KEYS: &[&str] = &["game_date", "date"];
const HOME_KEYS: &[&str] = &["home_team", "home_team_abbr", "home"];
const AWAY_KEYS: &[&str] = &["away_team", "away_team_abbr", "visitor_team", "away"];
const TIME_KEYS: &[&str] = &["time", "time_et", "start_time"];
const HOME_SCORE_KEYS: &[&str] = &["home_score", "home_team_score"];
const AWAY_SCORE_KEYS: &[&str] = &["away_score", "visitor_team_score"];

fn parse_game(entry: &Value) -> Option<GameDescriptor> {
    let home_team = pick_team(entry, HOME_KEYS)?;
    let away_team = pick_team(entry, AWAY_KEYS)?;
    Some(GameDescriptor {
        game_id: pick_str(entry, &["game_id", "id"]),
        home_team,
        away_team,
        time: pick_str(entry, TIME_KEYS).unwrap_or_else(|| "TBD".to_string()),
        status: pick_str(entry, &["status"]),
        home_score: pick_u32(entry, HOME_SCORE_KEYS),
        away_score: pick_u32(entry, AWAY_SCORE_KEYS),
    })
}

/// Empty bodies and a literal `null` mean "no data", not an error.
fn parse_value(raw: &str, what: &'static str) -> Result<Option<Value>, LoadError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| LoadError::Parse { what, source })
}

fn pick_team(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        let code = match value.get(*key) {
            Some(Value::String(code)) => code.trim().to_ascii_uppercase(),
            Some(nested @ Value::Object(_)) => match nested.get("abbreviation") {
                Some(Value::String(code)) => code.trim().to_ascii_uppercase(),
                _ => continue,
            },
            _ => continue,
        };
        if !code.is_empty() {
            return Some(code);
        }
    }
    None
}

fn pick_str(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match value.get(*key) {
            Some(Value::String(text)) if !text.trim().is_empty() => {
                return Some(text.trim().to_string());
            }
            Some(Value::Number(num)) => return Some(num.to_string()),
            _ => {}
        }
    }
    None
}

fn pick_u32(value: &Value, keys: &[&str]) -> Option<u32> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_u64() {
                return u32::try_from(num).ok();
            }
            if let Some(s) = v.as_str()
                && let Ok(num) = s.trim().parse::<u32>()
            {
                return Some(num);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{parse_rosters_json, parse_schedule_json};

    #[test]
    fn null_and_empty_bodies_are_empty() {
        assert!(parse_rosters_json("").unwrap().is_empty());
        assert!(parse_rosters_json("null").unwrap().is_empty());
        assert!(parse_schedule_json("  ").unwrap().is_empty());
    }

    #[test]
    fn wrong_top_level_shape_is_an_error() {
        assert!(parse_rosters_json("[1, 2]").is_err());
        assert!(parse_schedule_json("42").is_err());
    }

    #[test]
    fn nested_team_objects_use_abbreviation() {
        let raw = r#"[{"date": "2025-01-15T00:00:00Z",
            "home_team": {"abbreviation": "bos"},
            "visitor_team": {"abbreviation": "NYK"},
            "status": "Final", "home_team_score": 110, "visitor_team_score": 101}]"#;
        let schedule = parse_schedule_json(raw).unwrap();
        let games = schedule.values().next().unwrap();
        assert_eq!(games[0].home_team, "BOS");
        assert_eq!(games[0].away_team, "NYK");
        assert_eq!(games[0].home_score, Some(110));
        assert_eq!(games[0].time, "TBD");
    }
}
