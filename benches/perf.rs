use std::collections::BTreeMap;

use chrono::Utc;
use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Map, Value, json};
use std::hint::black_box;

use spotstats_terminal::bdl_fetch::NBA_TEAMS;
use spotstats_terminal::presentation::cards_for;
use spotstats_terminal::scoring;
use spotstats_terminal::selection::{select_players, visible_players};
use spotstats_terminal::snapshot_fetch::parse_player_stats_json;
use spotstats_terminal::stat_normalizer::normalize_all;
use spotstats_terminal::state::{Dataset, Selection, TierFilter};
use spotstats_terminal::trend::aggregate_all;

const PLAYERS_PER_TEAM: usize = 15;

fn synthetic_stats() -> Value {
    let mut out = Map::new();
    for (t, team) in NBA_TEAMS.iter().enumerate() {
        for p in 0..PLAYERS_PER_TEAM {
            let seed = (t * PLAYERS_PER_TEAM + p) as f64;
            out.insert(
                format!("{team} Player {p}"),
                json!({
                    "team": team,
                    "pts": (seed * 7.3) % 32.0,
                    "reb": (seed * 3.1) % 13.0,
                    "ast": (seed * 1.7) % 10.0,
                    "l5_pts": format!("{:.1}", (seed * 5.9) % 35.0),
                    "last10_reb": (seed * 2.3) % 14.0,
                    "usage_pct": format!("{}%", 15 + (p % 15)),
                    "minutes": format!("{}:{:02}", 12 + p * 2, (p * 7) % 60),
                    "def_rank": 1 + (t + p) % 30,
                    "games": 40,
                }),
            );
        }
    }
    Value::Object(out)
}

fn synthetic_dataset() -> Dataset {
    let raw = synthetic_stats();
    let players = normalize_all(&raw);
    let mut rosters = BTreeMap::new();
    for team in NBA_TEAMS {
        let names: Vec<String> = (0..PLAYERS_PER_TEAM)
            .map(|p| format!("{team} Player {p}"))
            .collect();
        rosters.insert(team.to_string(), names);
    }
    Dataset {
        generation: 1,
        loaded_at: Utc::now(),
        players,
        rosters,
        schedule: BTreeMap::new(),
    }
}

fn bench_player_stats_parse(c: &mut Criterion) {
    let raw = synthetic_stats().to_string();
    c.bench_function("player_stats_parse", |b| {
        b.iter(|| {
            let players = parse_player_stats_json(black_box(&raw)).unwrap();
            black_box(players.len());
        })
    });
}

fn bench_score_league(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    c.bench_function("score_league", |b| {
        b.iter(|| {
            let scored: Vec<_> = dataset.players.values().map(scoring::score).collect();
            black_box(scored.len());
        })
    });
}

fn bench_game_selection(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    let selection = Selection::Game {
        home: "BOS".to_string(),
        away: "NYK".to_string(),
    };
    c.bench_function("game_selection_filtered", |b| {
        b.iter(|| {
            let scored = select_players(black_box(&dataset), black_box(&selection));
            let visible = visible_players(&scored, TierFilter::All, "player 1");
            black_box(visible.len());
        })
    });
}

fn bench_trends(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    c.bench_function("trend_aggregate_league", |b| {
        b.iter(|| {
            let trends: Vec<_> = dataset.players.values().map(aggregate_all).collect();
            black_box(trends.len());
        })
    });
}

fn bench_cards(c: &mut Criterion) {
    let dataset = synthetic_dataset();
    let scored = select_players(&dataset, &Selection::Team("LAL".to_string()));

    c.bench_function("player_cards", |b| {
        b.iter(|| {
            let cards = cards_for(black_box(&scored).iter());
            black_box(cards.len());
        })
    });
}

criterion_group!(
    perf,
    bench_player_stats_parse,
    bench_score_league,
    bench_game_selection,
    bench_trends,
    bench_cards
);
criterion_main!(perf);
