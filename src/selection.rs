use std::cmp::Ordering;
use std::collections::HashSet;

use crate::scoring;
use crate::stat_normalizer::placeholder_record;
use crate::state::{Dataset, ScoredPlayer, Selection, TierFilter};

/// Scores everyone on the selected roster(s). For a game the home roster comes
/// first; roster order is kept and a name appearing twice is scored once.
pub fn select_players(dataset: &Dataset, selection: &Selection) -> Vec<ScoredPlayer> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for team in selection.teams() {
        for name in dataset.roster(team) {
            if !seen.insert(name.as_str()) {
                continue;
            }
            let scored = match dataset.players.get(name) {
                Some(record) => scoring::score(record),
                None => scoring::score(&placeholder_record(name, team)),
            };
            out.push(scored);
        }
    }
    out
}

/// Filtered view ordered by confidence, highest first. Ties keep their
/// roster order.
pub fn visible_players<'a>(
    scored: &'a [ScoredPlayer],
    filter: TierFilter,
    search: &str,
) -> Vec<&'a ScoredPlayer> {
    let needle = search.trim();
    let mut out: Vec<&ScoredPlayer> = scored
        .iter()
        .filter(|player| filter.matches(player.tier))
        .filter(|player| needle.is_empty() || contains_ascii_ci(&player.record.name, needle))
        .collect();
    out.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    out
}

fn contains_ascii_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::contains_ascii_ci;

    #[test]
    fn search_ignores_ascii_case() {
        assert!(contains_ascii_ci("Jayson Tatum", "tatum"));
        assert!(contains_ascii_ci("Jayson Tatum", "SON T"));
        assert!(!contains_ascii_ci("Jayson Tatum", "brown"));
        assert!(!contains_ascii_ci("Al", "Alpha"));
    }
}
