//! BallDontLie ingestion: pulls players, games, season averages and recent box
//! scores, and folds them into the three snapshot files the dashboard reads.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};
use rayon::prelude::*;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::config::{BdlConfig, parse_date};
use crate::http_cache;
use crate::http_client::http_client;
use crate::stat_normalizer::coerce_number;
use crate::state::StatLine;

pub const NBA_TEAMS: [&str; 30] = [
    "ATL", "BOS", "BKN", "CHA", "CHI", "CLE", "DAL", "DEN", "DET", "GSW", "HOU", "IND", "LAC",
    "LAL", "MEM", "MIA", "MIL", "MIN", "NOP", "NYK", "OKC", "ORL", "PHI", "PHX", "POR", "SAC",
    "SAS", "TOR", "UTA", "WAS",
];

const PER_PAGE: u32 = 100;
const MAX_IDS_PER_REQUEST: usize = 100;
pub const MAX_PAGES: u32 = 500;
/// How far back box scores are pulled for the rolling windows.
const RECENT_LOOKBACK_DAYS: i64 = 45;

#[derive(Debug, Clone, Deserialize)]
pub struct BdlTeam {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub abbreviation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BdlPlayer {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub team: Option<BdlTeam>,
}

impl BdlPlayer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn team_code(&self) -> Option<&str> {
        let code = self.team.as_ref()?.abbreviation.as_str();
        NBA_TEAMS.contains(&code).then_some(code)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BdlGame {
    pub id: u64,
    pub date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub time: Option<String>,
    pub home_team: BdlTeam,
    pub visitor_team: BdlTeam,
    #[serde(default)]
    pub home_team_score: u32,
    #[serde(default)]
    pub visitor_team_score: u32,
}

impl BdlGame {
    pub fn game_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn is_final(&self) -> bool {
        self.status.eq_ignore_ascii_case("final")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BdlSeasonAverage {
    pub player_id: u64,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub min: Option<String>,
    #[serde(default)]
    pub pts: Option<f64>,
    #[serde(default)]
    pub reb: Option<f64>,
    #[serde(default)]
    pub ast: Option<f64>,
    #[serde(default)]
    pub stl: Option<f64>,
    #[serde(default)]
    pub blk: Option<f64>,
    #[serde(default)]
    pub turnover: Option<f64>,
    #[serde(default)]
    pub fg_pct: Option<f64>,
    #[serde(default)]
    pub fg3_pct: Option<f64>,
    #[serde(default)]
    pub ft_pct: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BdlRef {
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BdlGameRef {
    pub id: u64,
    #[serde(default)]
    pub date: String,
}

/// One player's box score line for one game.
#[derive(Debug, Clone, Deserialize)]
pub struct BdlBoxScore {
    pub player: BdlRef,
    pub game: BdlGameRef,
    #[serde(default)]
    pub min: Option<String>,
    #[serde(default)]
    pub pts: Option<f64>,
    #[serde(default)]
    pub reb: Option<f64>,
    #[serde(default)]
    pub ast: Option<f64>,
}

impl BdlBoxScore {
    /// DNP lines come back with no minutes or "00".
    pub fn played(&self) -> bool {
        self.min
            .as_deref()
            .and_then(parse_minutes)
            .is_some_and(|mins| mins > 0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub next_cursor: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    Cursor(u64),
    Number(u32),
}

/// Cursor pagination wins when the API offers it; page numbers otherwise.
pub fn next_page(meta: &PageMeta, current_page: u32) -> Option<NextPage> {
    if let Some(cursor) = meta.next_cursor {
        return Some(NextPage::Cursor(cursor));
    }
    match meta.total_pages {
        Some(total) if current_page < total => Some(NextPage::Number(current_page + 1)),
        _ => None,
    }
}

pub fn parse_page_json<T: DeserializeOwned>(raw: &str) -> Result<Page<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Page {
            data: Vec::new(),
            meta: PageMeta::default(),
        });
    }
    serde_json::from_str(trimmed).context("invalid balldontlie page json")
}

pub struct BdlClient {
    base_url: String,
    api_key: String,
}

impl BdlClient {
    pub fn new(config: &BdlConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn get(&self, path: &str, query: &[(String, String)]) -> Result<String> {
        let url = Url::parse_with_params(&format!("{}/{path}", self.base_url), query)
            .with_context(|| format!("bad url for {path}"))?;
        let client = http_client()?;
        debug!(%url, "balldontlie request");
        let body = http_cache::fetch_text_cached(
            client,
            url.as_str(),
            &[("Authorization", self.api_key.as_str())],
        )?;
        Ok(body)
    }

    fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Vec<T>> {
        let mut out = Vec::new();
        let mut request = NextPage::Number(1);
        for _ in 0..MAX_PAGES {
            let mut query = params.to_vec();
            query.push(("per_page".to_string(), PER_PAGE.to_string()));
            let current_page = match request {
                NextPage::Cursor(cursor) => {
                    query.push(("cursor".to_string(), cursor.to_string()));
                    0
                }
                NextPage::Number(page) => {
                    query.push(("page".to_string(), page.to_string()));
                    page
                }
            };
            let raw = self.get(path, &query)?;
            let page: Page<T> =
                parse_page_json(&raw).with_context(|| format!("{path} page parse failed"))?;
            let empty = page.data.is_empty();
            out.extend(page.data);
            match next_page(&page.meta, current_page) {
                Some(next) if !empty => request = next,
                _ => return Ok(out),
            }
        }
        warn!(
            path,
            pages = MAX_PAGES,
            rows = out.len(),
            "page cap reached, results truncated"
        );
        Ok(out)
    }

    /// Active players only; the unfiltered index still tags retired players
    /// with their last team.
    pub fn fetch_players(&self) -> Result<Vec<BdlPlayer>> {
        let players = self.fetch_all("players", &player_index_params())?;
        info!(count = players.len(), "fetched player index");
        Ok(players)
    }

    pub fn fetch_games(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<BdlGame>> {
        let params = vec![
            ("start_date".to_string(), start.to_string()),
            ("end_date".to_string(), end.to_string()),
        ];
        self.fetch_all("games", &params)
    }

    pub fn fetch_season_games(&self, season: i32) -> Result<Vec<BdlGame>> {
        let params = vec![("seasons[]".to_string(), season.to_string())];
        self.fetch_all("games", &params)
    }

    /// Batches of at most 100 ids, fetched in parallel.
    pub fn fetch_season_averages(
        &self,
        season: i32,
        player_ids: &[u64],
    ) -> Result<Vec<BdlSeasonAverage>> {
        let batches: Vec<Vec<BdlSeasonAverage>> = player_ids
            .par_chunks(MAX_IDS_PER_REQUEST)
            .map(|chunk| {
                let mut params = vec![("season".to_string(), season.to_string())];
                params.extend(id_params(chunk));
                let raw = self.get("season_averages", &params)?;
                let page: Page<BdlSeasonAverage> = parse_page_json(&raw)
                    .context("season averages parse failed")?;
                Ok(page.data)
            })
            .collect::<Result<_>>()?;
        Ok(batches.into_iter().flatten().collect())
    }

    pub fn fetch_recent_box_scores(
        &self,
        season: i32,
        player_ids: &[u64],
        until: NaiveDate,
    ) -> Result<Vec<BdlBoxScore>> {
        let start = until - ChronoDuration::days(RECENT_LOOKBACK_DAYS);
        let batches: Vec<Vec<BdlBoxScore>> = player_ids
            .par_chunks(MAX_IDS_PER_REQUEST)
            .map(|chunk| {
                let mut params = vec![
                    ("seasons[]".to_string(), season.to_string()),
                    ("start_date".to_string(), start.to_string()),
                    ("end_date".to_string(), until.to_string()),
                ];
                params.extend(id_params(chunk));
                self.fetch_all("stats", &params)
            })
            .collect::<Result<_>>()?;
        Ok(batches.into_iter().flatten().collect())
    }
}

pub fn player_index_params() -> Vec<(String, String)> {
    vec![("active".to_string(), "true".to_string())]
}

fn id_params(ids: &[u64]) -> impl Iterator<Item = (String, String)> + '_ {
    ids.iter()
        .map(|id| ("player_ids[]".to_string(), id.to_string()))
}

/// Lowercase, drop `.` and `'`, hyphens become spaces, whitespace collapsed.
pub fn norm_name(name: &str) -> String {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| *c != '.' && *c != '\'')
        .map(|c| if c == '-' { ' ' } else { c })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "34:12" → 34.2; plain numbers pass through.
pub fn parse_minutes(raw: &str) -> Option<f64> {
    coerce_number(&Value::String(raw.to_string()))
}

/// Seasons are named for the year they start in October.
pub fn season_for(date: NaiveDate) -> i32 {
    if date.month() >= 10 {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Team code → player names, sorted, restricted to the 30 franchises.
pub fn build_rosters(players: &[BdlPlayer]) -> BTreeMap<String, Vec<String>> {
    let mut rosters: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for player in players {
        let Some(team) = player.team_code() else {
            continue;
        };
        let name = player.full_name();
        if name.is_empty() {
            continue;
        }
        rosters.entry(team.to_string()).or_default().push(name);
    }
    for names in rosters.values_mut() {
        names.sort_by_key(|name| norm_name(name));
        names.dedup_by(|a, b| norm_name(a) == norm_name(b));
    }
    rosters
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStanding {
    pub wins: u32,
    pub losses: u32,
    pub points_against: u32,
    pub games: u32,
    /// Newest last.
    pub results: Vec<bool>,
}

impl TeamStanding {
    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }

    /// "W3", "L1", or None before any final game.
    pub fn streak(&self) -> Option<String> {
        let last = *self.results.last()?;
        let len = self
            .results
            .iter()
            .rev()
            .take_while(|won| **won == last)
            .count();
        Some(format!("{}{len}", if last { 'W' } else { 'L' }))
    }

    pub fn points_against_per_game(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.points_against as f64 / self.games as f64
        }
    }
}

/// Standings from final games, processed in date order.
pub fn build_standings(games: &[BdlGame]) -> HashMap<String, TeamStanding> {
    let mut finals: Vec<&BdlGame> = games.iter().filter(|g| g.is_final()).collect();
    finals.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

    let mut standings: HashMap<String, TeamStanding> = HashMap::new();
    for game in finals {
        let home_won = game.home_team_score > game.visitor_team_score;
        let sides = [
            (&game.home_team.abbreviation, home_won, game.visitor_team_score),
            (&game.visitor_team.abbreviation, !home_won, game.home_team_score),
        ];
        for (team, won, allowed) in sides {
            let entry = standings.entry(team.clone()).or_default();
            if won {
                entry.wins += 1;
            } else {
                entry.losses += 1;
            }
            entry.points_against += allowed;
            entry.games += 1;
            entry.results.push(won);
        }
    }
    standings
}

/// 1 = fewest points allowed per game. Ties break on team code.
pub fn defensive_ranks(standings: &HashMap<String, TeamStanding>) -> HashMap<String, u32> {
    let mut teams: Vec<(&String, f64)> = standings
        .iter()
        .filter(|(_, s)| s.games > 0)
        .map(|(team, s)| (team, s.points_against_per_game()))
        .collect();
    teams.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    teams
        .into_iter()
        .enumerate()
        .map(|(idx, (team, _))| (team.clone(), idx as u32 + 1))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RollingWindows {
    pub last5: Option<StatLine>,
    pub last10: Option<StatLine>,
}

/// Last-5 and last-10 averages per player over games actually played,
/// newest first, rounded to one decimal.
pub fn rolling_averages(box_scores: &[BdlBoxScore]) -> HashMap<u64, RollingWindows> {
    let mut by_player: HashMap<u64, Vec<&BdlBoxScore>> = HashMap::new();
    for line in box_scores.iter().filter(|line| line.played()) {
        by_player.entry(line.player.id).or_default().push(line);
    }
    by_player
        .into_iter()
        .map(|(id, mut lines)| {
            lines.sort_by(|a, b| b.game.date.cmp(&a.game.date).then(b.game.id.cmp(&a.game.id)));
            let windows = RollingWindows {
                last5: window_average(&lines, 5),
                last10: window_average(&lines, 10),
            };
            (id, windows)
        })
        .collect()
}

fn window_average(lines: &[&BdlBoxScore], window: usize) -> Option<StatLine> {
    let taken = &lines[..lines.len().min(window)];
    if taken.is_empty() {
        return None;
    }
    let n = taken.len() as f64;
    let sum = |pick: fn(&BdlBoxScore) -> Option<f64>| {
        taken.iter().map(|line| pick(line).unwrap_or(0.0)).sum::<f64>()
    };
    Some(StatLine {
        pts: round1(sum(|l| l.pts) / n),
        reb: round1(sum(|l| l.reb) / n),
        ast: round1(sum(|l| l.ast) / n),
    })
}

/// Team → opponent for games on `date`.
pub fn opponents_on(games: &[BdlGame], date: NaiveDate) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for game in games.iter().filter(|g| g.game_date() == Some(date)) {
        let home = game.home_team.abbreviation.clone();
        let away = game.visitor_team.abbreviation.clone();
        out.insert(home.clone(), away.clone());
        out.insert(away, home);
    }
    out
}

/// Flat schedule rows, ordered by date then game id.
pub fn schedule_rows(games: &[BdlGame]) -> Vec<Value> {
    let mut sorted: Vec<&BdlGame> = games.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    sorted
        .into_iter()
        .filter_map(|game| {
            let date = game.game_date()?;
            let played = game.is_final() || game.home_team_score + game.visitor_team_score > 0;
            Some(json!({
                "game_id": game.id,
                "game_date": date.to_string(),
                "time_et": game.time.clone().filter(|t| !t.trim().is_empty()).unwrap_or_else(|| "TBD".to_string()),
                "status": game.status,
                "home_team_abbr": game.home_team.abbreviation,
                "away_team_abbr": game.visitor_team.abbreviation,
                "home_score": played.then_some(game.home_team_score),
                "away_score": played.then_some(game.visitor_team_score),
            }))
        })
        .collect()
}

/// Inputs for one `player_stats.json` build.
pub struct PlayerStatsInputs<'a> {
    pub season: i32,
    pub players: &'a [BdlPlayer],
    pub averages: &'a [BdlSeasonAverage],
    pub rolling: &'a HashMap<u64, RollingWindows>,
    pub opponents: &'a HashMap<String, String>,
    pub standings: &'a HashMap<String, TeamStanding>,
    pub def_ranks: &'a HashMap<String, u32>,
}

/// Players without season averages are left out; the dashboard scores them
/// from defaults via the roster.
pub fn build_player_stats(inputs: &PlayerStatsInputs<'_>) -> Map<String, Value> {
    let averages: HashMap<u64, &BdlSeasonAverage> =
        inputs.averages.iter().map(|avg| (avg.player_id, avg)).collect();

    let mut out = Map::new();
    for player in inputs.players {
        let (Some(team), Some(avg)) = (player.team_code(), averages.get(&player.id)) else {
            continue;
        };
        let name = player.full_name();
        if name.is_empty() {
            continue;
        }
        let opponent = inputs.opponents.get(team);
        let opp_standing = opponent.and_then(|opp| inputs.standings.get(opp));

        let mut entry = Map::new();
        entry.insert("team".into(), json!(team));
        entry.insert("season".into(), json!(inputs.season));
        entry.insert("games".into(), json!(avg.games_played));
        entry.insert(
            "min".into(),
            json!(avg.min.as_deref().and_then(parse_minutes).unwrap_or(0.0)),
        );
        entry.insert("pts".into(), json!(avg.pts.unwrap_or(0.0)));
        entry.insert("reb".into(), json!(avg.reb.unwrap_or(0.0)));
        entry.insert("ast".into(), json!(avg.ast.unwrap_or(0.0)));
        entry.insert("stl".into(), json!(avg.stl.unwrap_or(0.0)));
        entry.insert("blk".into(), json!(avg.blk.unwrap_or(0.0)));
        entry.insert("tov".into(), json!(avg.turnover.unwrap_or(0.0)));
        entry.insert("fg_pct".into(), json!(avg.fg_pct));
        entry.insert("fg3_pct".into(), json!(avg.fg3_pct));
        entry.insert("ft_pct".into(), json!(avg.ft_pct));

        if let Some(windows) = inputs.rolling.get(&player.id) {
            insert_window(&mut entry, "last5", windows.last5);
            insert_window(&mut entry, "last10", windows.last10);
        }

        entry.insert("opponent".into(), json!(opponent));
        entry.insert(
            "def_rank".into(),
            json!(opponent.and_then(|opp| inputs.def_ranks.get(opp))),
        );
        entry.insert(
            "team_record".into(),
            json!(inputs.standings.get(team).map(TeamStanding::record)),
        );
        entry.insert("opp_record".into(), json!(opp_standing.map(TeamStanding::record)));
        entry.insert(
            "opp_streak".into(),
            json!(opp_standing.and_then(TeamStanding::streak)),
        );
        entry.insert("usage".into(), json!(0.0));
        entry.insert("pace".into(), Value::Null);

        out.insert(name, Value::Object(entry));
    }
    out
}

fn insert_window(entry: &mut Map<String, Value>, prefix: &str, line: Option<StatLine>) {
    let Some(line) = line else {
        return;
    };
    entry.insert(format!("{prefix}_pts"), json!(line.pts));
    entry.insert(format!("{prefix}_reb"), json!(line.reb));
    entry.insert(format!("{prefix}_ast"), json!(line.ast));
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{NextPage, PageMeta, next_page, norm_name, parse_minutes, season_for};

    #[test]
    fn names_normalize_for_matching() {
        assert_eq!(norm_name("Shai Gilgeous-Alexander"), "shai gilgeous alexander");
        assert_eq!(norm_name("D'Angelo  Russell"), "dangelo russell");
        assert_eq!(norm_name("P.J. Washington"), "pj washington");
    }

    #[test]
    fn minutes_accept_clock_and_plain() {
        assert_eq!(parse_minutes("34:12"), Some(34.2));
        assert_eq!(parse_minutes("28"), Some(28.0));
        assert_eq!(parse_minutes(""), None);
    }

    #[test]
    fn season_starts_in_october() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(season_for(date(2024, 10, 22)), 2024);
        assert_eq!(season_for(date(2025, 3, 1)), 2024);
        assert_eq!(season_for(date(2025, 9, 30)), 2024);
    }

    #[test]
    fn pagination_prefers_cursor() {
        let meta = PageMeta {
            next_cursor: Some(77),
            total_pages: Some(3),
        };
        assert_eq!(next_page(&meta, 1), Some(NextPage::Cursor(77)));

        let meta = PageMeta {
            next_cursor: None,
            total_pages: Some(3),
        };
        assert_eq!(next_page(&meta, 2), Some(NextPage::Number(3)));
        assert_eq!(next_page(&meta, 3), None);
        assert_eq!(next_page(&PageMeta::default(), 1), None);
    }
}
