use anyhow::{Context, Result, anyhow, bail};

use spotstats_terminal::config::{self, AppConfig};
use spotstats_terminal::http_client;
use spotstats_terminal::logging;
use spotstats_terminal::presentation::{self, PlayerCard};
use spotstats_terminal::selection::{select_players, visible_players};
use spotstats_terminal::snapshot_fetch;
use spotstats_terminal::state::{Selection, StatKind, Tier, TierFilter, stat_label, tier_label};
use spotstats_terminal::trend;

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init_stderr();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let selection = parse_selection(&args)?;
    let filter = match arg_value(&args, "--tier") {
        Some(raw) => TierFilter::Only(parse_tier(&raw)?),
        None => TierFilter::All,
    };
    let as_json = args.iter().any(|arg| arg == "--json");

    let config = AppConfig::from_env();
    http_client::configure_timeout(config.http_timeout);
    let dataset = snapshot_fetch::load_dataset(&config.source, 1)
        .with_context(|| format!("loading snapshots from {}", config.source.describe()))?;
    for team in selection.teams() {
        if !dataset.rosters.contains_key(team) {
            bail!("unknown team {team}");
        }
    }

    let scored = select_players(&dataset, &selection);
    let visible = visible_players(&scored, filter, "");

    if as_json {
        let cards = presentation::cards_for(visible.iter().copied());
        println!(
            "{}",
            serde_json::to_string_pretty(&cards).context("serialize player cards")?
        );
        return Ok(());
    }

    println!("{} ({} players)", selection.label(), visible.len());
    println!(
        "{:<26} {:<4} {:<4} {:>6} {:<7} {:>14} {:>14} {:>14}",
        "PLAYER", "TEAM", "OPP", "CONF", "TIER",
        stat_label(StatKind::Pts), stat_label(StatKind::Reb), stat_label(StatKind::Ast)
    );
    for player in visible {
        let card = PlayerCard::from_scored(player);
        let trend_cell = |stat: StatKind| {
            let bundle = card.trend.get(stat);
            format!(
                "{:>5.1} {} {:>5.1}",
                bundle.season_value,
                trend::direction_symbol(bundle.direction),
                bundle.recent_value
            )
        };
        println!(
            "{:<26} {:<4} {:<4} {:>6} {:<7} {:>14} {:>14} {:>14}",
            truncate(&card.name, 26),
            card.team.as_deref().unwrap_or("-"),
            card.opponent.as_deref().unwrap_or("-"),
            presentation::format_confidence(card.confidence),
            tier_label(card.tier),
            trend_cell(StatKind::Pts),
            trend_cell(StatKind::Reb),
            trend_cell(StatKind::Ast),
        );
    }
    Ok(())
}

fn parse_selection(args: &[String]) -> Result<Selection> {
    if let Some(team) = arg_value(args, "--team") {
        return Ok(Selection::Team(team.to_ascii_uppercase()));
    }
    if let Some(game) = arg_value(args, "--game") {
        let (away, home) = game
            .split_once('@')
            .ok_or_else(|| anyhow!("--game expects AWAY@HOME, got {game}"))?;
        let (away, home) = (away.trim(), home.trim());
        if away.is_empty() || home.is_empty() {
            bail!("--game expects AWAY@HOME, got {game}");
        }
        return Ok(Selection::Game {
            home: home.to_ascii_uppercase(),
            away: away.to_ascii_uppercase(),
        });
    }
    bail!("usage: score_players (--team CODE | --game AWAY@HOME) [--tier green|yellow|red] [--json]")
}

fn parse_tier(raw: &str) -> Result<Tier> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "green" => Ok(Tier::Green),
        "yellow" => Ok(Tier::Yellow),
        "red" => Ok(Tier::Red),
        other => Err(anyhow!("unknown tier {other}")),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
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
