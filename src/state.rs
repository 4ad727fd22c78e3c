use std::collections::{BTreeMap, HashMap, VecDeque};

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Pts,
    Reb,
    Ast,
}

impl StatKind {
    pub const ALL: [StatKind; 3] = [StatKind::Pts, StatKind::Reb, StatKind::Ast];
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatLine {
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
}

impl StatLine {
    pub fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Pts => self.pts,
            StatKind::Reb => self.reb,
            StatKind::Ast => self.ast,
        }
    }
}

/// Share of recent games a player cleared their line, per stat, in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Consistency {
    pub pts: Option<f64>,
    pub reb: Option<f64>,
    pub ast: Option<f64>,
}

impl Consistency {
    pub fn get(&self, stat: StatKind) -> Option<f64> {
        match stat {
            StatKind::Pts => self.pts,
            StatKind::Reb => self.reb,
            StatKind::Ast => self.ast,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SecondaryStats {
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
    pub fg_pct: Option<f64>,
    pub fg3_pct: Option<f64>,
    pub ft_pct: Option<f64>,
}

/// One player's statistics for a refresh cycle. Produced by the normalizer and
/// never mutated afterwards; averages are finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPlayerRecord {
    pub name: String,
    pub team: Option<String>,
    pub opponent: Option<String>,
    pub season_averages: StatLine,
    /// Last-5 rolling averages.
    pub recent_averages: StatLine,
    pub last10_averages: StatLine,
    pub usage_pct: f64,
    pub minutes: f64,
    pub games_played: u32,
    pub pace: Option<f64>,
    /// 1 is the best defense in the league.
    pub def_rank: Option<u32>,
    pub team_record: Option<String>,
    pub opp_record: Option<String>,
    pub opp_streak: Option<String>,
    pub consistency: Consistency,
    pub secondary: SecondaryStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierFilter {
    All,
    Only(Tier),
}

impl TierFilter {
    pub fn matches(self, tier: Tier) -> bool {
        match self {
            TierFilter::All => true,
            TierFilter::Only(wanted) => wanted == tier,
        }
    }

    pub fn next(self) -> Self {
        match self {
            TierFilter::All => TierFilter::Only(Tier::Green),
            TierFilter::Only(Tier::Green) => TierFilter::Only(Tier::Yellow),
            TierFilter::Only(Tier::Yellow) => TierFilter::Only(Tier::Red),
            TierFilter::Only(Tier::Red) => TierFilter::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub label: String,
    pub delta: f64,
}

impl ScoreFactor {
    pub fn new(label: impl Into<String>, delta: f64) -> Self {
        Self {
            label: label.into(),
            delta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPlayer {
    pub record: CanonicalPlayerRecord,
    pub confidence: f64,
    pub tier: Tier,
    pub factors: Vec<ScoreFactor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBundle {
    pub season_value: f64,
    pub recent_value: f64,
    #[serde(rename = "directionSymbol")]
    pub direction: TrendDirection,
    pub fill_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSet {
    pub pts: TrendBundle,
    pub reb: TrendBundle,
    pub ast: TrendBundle,
}

impl TrendSet {
    pub fn get(&self, stat: StatKind) -> &TrendBundle {
        match stat {
            StatKind::Pts => &self.pts,
            StatKind::Reb => &self.reb,
            StatKind::Ast => &self.ast,
        }
    }
}

/// Season against the last-5 and last-10 windows for one stat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatRollup {
    pub stat: StatKind,
    pub season: f64,
    pub last5: f64,
    pub last10: f64,
    pub last5_direction: TrendDirection,
    pub last10_direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDescriptor {
    #[serde(default)]
    pub game_id: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub time: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
}

impl GameDescriptor {
    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }
}

/// Everything one successful refresh produced. Replaced as a whole, never patched.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    pub players: HashMap<String, CanonicalPlayerRecord>,
    pub rosters: BTreeMap<String, Vec<String>>,
    pub schedule: BTreeMap<NaiveDate, Vec<GameDescriptor>>,
}

impl Dataset {
    pub fn roster(&self, team: &str) -> &[String] {
        self.rosters.get(team).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn games_on(&self, date: NaiveDate) -> &[GameDescriptor] {
        self.schedule.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn team_codes(&self) -> Vec<&str> {
        self.rosters.keys().map(String::as_str).collect()
    }

    /// W-L text for a team, taken from any of its players' records.
    pub fn team_record(&self, team: &str) -> Option<&str> {
        self.roster(team)
            .iter()
            .filter_map(|name| self.players.get(name))
            .find_map(|record| record.team_record.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Team(String),
    Game { home: String, away: String },
}

impl Selection {
    pub fn teams(&self) -> Vec<&str> {
        match self {
            Selection::Team(team) => vec![team.as_str()],
            Selection::Game { home, away } => vec![home.as_str(), away.as_str()],
        }
    }

    pub fn label(&self) -> String {
        match self {
            Selection::Team(team) => team.clone(),
            Selection::Game { home, away } => format!("{away} @ {home}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Games,
    Teams,
    Players,
    PlayerDetail,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub dataset: Option<Dataset>,
    pub next_generation: u64,
    pub applied_generation: u64,
    pub pending_generation: Option<u64>,
    pub last_error: Option<String>,
    pub schedule_date: NaiveDate,
    pub games_selected: usize,
    pub teams_selected: usize,
    pub players_selected: usize,
    pub selection: Option<Selection>,
    /// Last scored list for `selection`, kept so filter changes do not rescore.
    pub scored: Vec<ScoredPlayer>,
    pub tier_filter: TierFilter,
    pub search: String,
    pub search_active: bool,
    pub detail_player: Option<String>,
    pub detail_back: Screen,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(schedule_date: NaiveDate) -> Self {
        Self {
            screen: Screen::Games,
            dataset: None,
            next_generation: 0,
            applied_generation: 0,
            pending_generation: None,
            last_error: None,
            schedule_date,
            games_selected: 0,
            teams_selected: 0,
            players_selected: 0,
            selection: None,
            scored: Vec::new(),
            tier_filter: TierFilter::All,
            search: String::new(),
            search_active: false,
            detail_player: None,
            detail_back: Screen::Players,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    /// Reserves the generation number for a new load.
    pub fn begin_refresh(&mut self) -> u64 {
        self.next_generation += 1;
        self.pending_generation = Some(self.next_generation);
        self.next_generation
    }

    pub fn is_loading(&self) -> bool {
        self.pending_generation.is_some()
    }

    pub fn games_for_date(&self) -> &[GameDescriptor] {
        match &self.dataset {
            Some(dataset) => dataset.games_on(self.schedule_date),
            None => &[],
        }
    }

    pub fn team_codes(&self) -> Vec<&str> {
        self.dataset
            .as_ref()
            .map(Dataset::team_codes)
            .unwrap_or_default()
    }

    pub fn selected_game(&self) -> Option<&GameDescriptor> {
        self.games_for_date().get(self.games_selected)
    }

    pub fn selected_team(&self) -> Option<&str> {
        self.team_codes().get(self.teams_selected).copied()
    }

    pub fn visible_players(&self) -> Vec<&ScoredPlayer> {
        selection::visible_players(&self.scored, self.tier_filter, &self.search)
    }

    pub fn selected_player(&self) -> Option<&ScoredPlayer> {
        self.visible_players().get(self.players_selected).copied()
    }

    pub fn detail_scored(&self) -> Option<&ScoredPlayer> {
        let name = self.detail_player.as_deref()?;
        self.scored.iter().find(|p| p.record.name == name)
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
        self.players_selected = 0;
        self.rescore();
        self.screen = Screen::Players;
    }

    pub fn select_current_game(&mut self) {
        let Some(game) = self.selected_game() else {
            self.push_log("[INFO] No game selected");
            return;
        };
        let selection = Selection::Game {
            home: game.home_team.clone(),
            away: game.away_team.clone(),
        };
        self.select(selection);
    }

    pub fn select_current_team(&mut self) {
        let Some(team) = self.selected_team() else {
            self.push_log("[INFO] No team selected");
            return;
        };
        let selection = Selection::Team(team.to_string());
        self.select(selection);
    }

    pub fn open_player_detail(&mut self) {
        let Some(player) = self.selected_player() else {
            return;
        };
        self.detail_player = Some(player.record.name.clone());
        self.detail_back = self.screen;
        self.screen = Screen::PlayerDetail;
    }

    pub fn back(&mut self) {
        self.screen = match self.screen {
            Screen::PlayerDetail => self.detail_back,
            Screen::Players => match &self.selection {
                Some(Selection::Team(_)) => Screen::Teams,
                _ => Screen::Games,
            },
            Screen::Games | Screen::Teams => self.screen,
        };
    }

    /// Rebuilds the scored list from the current dataset and selection.
    pub fn rescore(&mut self) {
        self.scored = match (&self.dataset, &self.selection) {
            (Some(dataset), Some(sel)) => selection::select_players(dataset, sel),
            _ => Vec::new(),
        };
        self.clamp_selection();
    }

    pub fn cycle_tier_filter(&mut self) {
        self.tier_filter = self.tier_filter.next();
        self.players_selected = 0;
    }

    pub fn shift_date(&mut self, days: i64) {
        if let Some(date) = self
            .schedule_date
            .checked_add_signed(ChronoDuration::days(days))
        {
            self.schedule_date = date;
        }
        self.games_selected = 0;
    }

    pub fn select_next(&mut self) {
        let total = self.current_list_len();
        let cursor = self.cursor_mut();
        if total == 0 {
            *cursor = 0;
            return;
        }
        *cursor = (*cursor + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.current_list_len();
        let cursor = self.cursor_mut();
        if total == 0 {
            *cursor = 0;
            return;
        }
        if *cursor == 0 {
            *cursor = total - 1;
        } else {
            *cursor -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let games = self.games_for_date().len();
        let teams = self.team_codes().len();
        let players = self.visible_players().len();
        self.games_selected = clamp_index(self.games_selected, games);
        self.teams_selected = clamp_index(self.teams_selected, teams);
        self.players_selected = clamp_index(self.players_selected, players);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn current_list_len(&self) -> usize {
        match self.screen {
            Screen::Games => self.games_for_date().len(),
            Screen::Teams => self.team_codes().len(),
            Screen::Players | Screen::PlayerDetail => self.visible_players().len(),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.screen {
            Screen::Games => &mut self.games_selected,
            Screen::Teams => &mut self.teams_selected,
            Screen::Players | Screen::PlayerDetail => &mut self.players_selected,
        }
    }
}

fn clamp_index(idx: usize, total: usize) -> usize {
    if total == 0 { 0 } else { idx.min(total - 1) }
}

#[derive(Debug, Clone)]
pub enum Delta {
    DatasetLoaded(Box<Dataset>),
    LoadFailed { generation: u64, error: String },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Refresh { generation: u64 },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::DatasetLoaded(dataset) => {
            let generation = dataset.generation;
            settle_pending(state, generation);
            if generation <= state.applied_generation {
                state.push_log(format!(
                    "[INFO] Discarded stale load #{generation} (showing #{})",
                    state.applied_generation
                ));
                return;
            }
            state.push_log(format!(
                "[INFO] Loaded #{generation}: {} players, {} teams, {} game days",
                dataset.players.len(),
                dataset.rosters.len(),
                dataset.schedule.len()
            ));
            state.applied_generation = generation;
            state.last_error = None;
            state.dataset = Some(*dataset);

            // Drop a selection whose teams vanished from the new rosters.
            let still_valid = match (&state.dataset, &state.selection) {
                (Some(ds), Some(sel)) => sel.teams().iter().all(|t| ds.rosters.contains_key(*t)),
                _ => true,
            };
            if !still_valid {
                state.selection = None;
                state.detail_player = None;
                if matches!(state.screen, Screen::Players | Screen::PlayerDetail) {
                    state.screen = Screen::Games;
                }
            }
            state.rescore();
        }
        Delta::LoadFailed { generation, error } => {
            settle_pending(state, generation);
            if generation <= state.applied_generation {
                state.push_log(format!(
                    "[INFO] Ignored failure of superseded load #{generation}"
                ));
                return;
            }
            let keeping = if state.dataset.is_some() {
                format!("keeping #{}", state.applied_generation)
            } else {
                "no data yet".to_string()
            };
            state.push_log(format!("[WARN] Load #{generation} failed: {error} ({keeping})"));
            state.last_error = Some(error);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

fn settle_pending(state: &mut AppState, generation: u64) {
    if state
        .pending_generation
        .is_some_and(|pending| generation >= pending)
    {
        state.pending_generation = None;
    }
}

pub fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Green => "GREEN",
        Tier::Yellow => "YELLOW",
        Tier::Red => "RED",
    }
}

pub fn tier_filter_label(filter: TierFilter) -> &'static str {
    match filter {
        TierFilter::All => "ALL",
        TierFilter::Only(tier) => tier_label(tier),
    }
}

pub fn stat_label(stat: StatKind) -> &'static str {
    match stat {
        StatKind::Pts => "PTS",
        StatKind::Reb => "REB",
        StatKind::Ast => "AST",
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Games => "GAMES",
        Screen::Teams => "TEAMS",
        Screen::Players => "PLAYERS",
        Screen::PlayerDetail => "PLAYER",
    }
}
