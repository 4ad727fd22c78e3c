use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{Duration as ChronoDuration, Utc};
use serde::Serialize;
use tracing::info;

use spotstats_terminal::bdl_fetch::{self, BdlClient, PlayerStatsInputs};
use spotstats_terminal::config::{self, BdlConfig};
use spotstats_terminal::logging;
use spotstats_terminal::snapshot_fetch::{PLAYER_STATS_FILE, ROSTERS_FILE, SCHEDULE_FILE};

const DEFAULT_DAYS_BACK: i64 = 3;
const DEFAULT_DAYS_FORWARD: i64 = 14;

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init_stderr();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let out_dir = arg_value(&args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    let target_date = match arg_value(&args, "--date") {
        Some(raw) => config::parse_date(&raw).ok_or_else(|| anyhow!("bad --date {raw}"))?,
        None => Utc::now().date_naive(),
    };
    let days_back = arg_days(&args, "--days-back", DEFAULT_DAYS_BACK)?;
    let days_forward = arg_days(&args, "--days-forward", DEFAULT_DAYS_FORWARD)?;

    let bdl = BdlConfig::from_env()?;
    let client = BdlClient::new(&bdl);
    let season = bdl_fetch::season_for(target_date);
    info!(%target_date, season, out = %out_dir.display(), "building snapshots");

    let players = client.fetch_players().context("player index")?;
    let rosters = bdl_fetch::build_rosters(&players);
    let rostered: Vec<_> = players.iter().filter(|p| p.team_code().is_some()).collect();
    let ids: Vec<u64> = rostered.iter().map(|p| p.id).collect();
    info!(teams = rosters.len(), players = ids.len(), "rosters built");

    let window_start = target_date - ChronoDuration::days(days_back);
    let window_end = target_date + ChronoDuration::days(days_forward);
    let window_games = client
        .fetch_games(window_start, window_end)
        .context("schedule window")?;
    let season_games = client
        .fetch_season_games(season)
        .context("season games")?;
    let averages = client
        .fetch_season_averages(season, &ids)
        .context("season averages")?;
    let box_scores = client
        .fetch_recent_box_scores(season, &ids, target_date)
        .context("recent box scores")?;

    let standings = bdl_fetch::build_standings(&season_games);
    let def_ranks = bdl_fetch::defensive_ranks(&standings);
    let rolling = bdl_fetch::rolling_averages(&box_scores);
    let opponents = bdl_fetch::opponents_on(&window_games, target_date);
    let stats = bdl_fetch::build_player_stats(&PlayerStatsInputs {
        season,
        players: &players,
        averages: &averages,
        rolling: &rolling,
        opponents: &opponents,
        standings: &standings,
        def_ranks: &def_ranks,
    });
    let schedule = bdl_fetch::schedule_rows(&window_games);

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("create {}", out_dir.display()))?;
    write_json_atomic(&out_dir.join(ROSTERS_FILE), &rosters)?;
    write_json_atomic(&out_dir.join(SCHEDULE_FILE), &schedule)?;
    write_json_atomic(&out_dir.join(PLAYER_STATS_FILE), &stats)?;

    println!("Snapshot build complete");
    println!("Out: {}", out_dir.display());
    println!("Season: {season} (target {target_date})");
    println!("Teams: {}", rosters.len());
    println!("Players with stats: {}/{}", stats.len(), ids.len());
    println!("Games in window: {}", schedule.len());
    println!("Opponents on target date: {}", opponents.len() / 2);
    Ok(())
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize {}", path.display()))?;
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn arg_days(args: &[String], flag: &str, default: i64) -> Result<i64> {
    match arg_value(args, flag) {
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|days| (0..=60).contains(days))
            .ok_or_else(|| anyhow!("{flag} expects 0..=60 days, got {raw}")),
        None => Ok(default),
    }
}
