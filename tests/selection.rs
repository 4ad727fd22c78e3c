use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde_json::json;

use spotstats_terminal::scoring;
use spotstats_terminal::selection::{select_players, visible_players};
use spotstats_terminal::stat_normalizer::normalize;
use spotstats_terminal::state::{Dataset, ScoredPlayer, Selection, Tier, TierFilter};

fn dataset() -> Dataset {
    let mut players = HashMap::new();
    for (name, raw) in [
        ("Star", json!({"team": "BOS", "pts": 25, "usage": 24, "min": 30, "def_rank": 8})),
        ("Role", json!({"team": "BOS", "pts": 9, "min": 29})),
        ("Guard", json!({"team": "NYK", "pts": 21, "usage": 26, "min": 34})),
        ("Wing", json!({"team": "NYK", "pts": 11, "def_rank": 22})),
    ] {
        players.insert(name.to_string(), normalize(&raw, name));
    }
    let mut rosters = BTreeMap::new();
    rosters.insert(
        "BOS".to_string(),
        vec!["Role".to_string(), "Star".to_string(), "Ghost".to_string()],
    );
    rosters.insert(
        "NYK".to_string(),
        vec!["Wing".to_string(), "Guard".to_string(), "Star".to_string()],
    );
    Dataset {
        generation: 1,
        loaded_at: Utc::now(),
        players,
        rosters,
        schedule: BTreeMap::new(),
    }
}

fn names(players: &[&ScoredPlayer]) -> Vec<String> {
    players.iter().map(|p| p.record.name.clone()).collect()
}

#[test]
fn game_selection_lists_home_roster_first_without_duplicates() {
    let ds = dataset();
    let selection = Selection::Game {
        home: "NYK".to_string(),
        away: "BOS".to_string(),
    };
    let scored = select_players(&ds, &selection);
    let order: Vec<&str> = scored.iter().map(|p| p.record.name.as_str()).collect();
    assert_eq!(order, ["Wing", "Guard", "Star", "Role", "Ghost"]);
}

#[test]
fn roster_names_without_stats_score_from_defaults() {
    let ds = dataset();
    let scored = select_players(&ds, &Selection::Team("BOS".to_string()));
    let ghost = scored
        .iter()
        .find(|p| p.record.name == "Ghost")
        .expect("ghost should be listed");
    assert_eq!(ghost.record.team.as_deref(), Some("BOS"));
    assert_eq!(ghost.confidence, 0.45);
    assert_eq!(ghost.tier, Tier::Red);
}

#[test]
fn unknown_team_selects_nobody() {
    let ds = dataset();
    assert!(select_players(&ds, &Selection::Team("XXX".to_string())).is_empty());
}

#[test]
fn visible_players_sort_by_confidence_keeping_ties_in_roster_order() {
    let ds = dataset();
    let selection = Selection::Game {
        home: "BOS".to_string(),
        away: "NYK".to_string(),
    };
    let scored = select_players(&ds, &selection);
    // Star 0.8, Guard 0.7, Role 0.6, Ghost 0.45, Wing 0.4
    let visible = visible_players(&scored, TierFilter::All, "");
    assert_eq!(names(&visible), ["Star", "Guard", "Role", "Ghost", "Wing"]);
}

#[test]
fn equal_confidence_keeps_input_order() {
    let players: Vec<ScoredPlayer> = ["E", "D", "C", "B", "A"]
        .iter()
        .map(|name| scoring::score(&normalize(&json!({"pts": 10, "min": 30}), name)))
        .collect();
    let visible = visible_players(&players, TierFilter::Only(Tier::Yellow), "");
    assert_eq!(names(&visible), ["E", "D", "C", "B", "A"]);
}

#[test]
fn tier_filter_and_search_combine() {
    let ds = dataset();
    let scored = select_players(
        &ds,
        &Selection::Game {
            home: "BOS".to_string(),
            away: "NYK".to_string(),
        },
    );
    let reds = visible_players(&scored, TierFilter::Only(Tier::Red), "");
    assert_eq!(names(&reds), ["Ghost", "Wing"]);

    let search = visible_players(&scored, TierFilter::All, "  sTa ");
    assert_eq!(names(&search), ["Star"]);

    let none = visible_players(&scored, TierFilter::Only(Tier::Green), "guard");
    assert!(none.is_empty());
}
