use std::fmt::Display;

use serde::Serialize;

use crate::state::{ScoredPlayer, StatLine, Tier, TrendSet};
use crate::trend;

/// Per-player record handed to renderers and the JSON export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCard {
    pub name: String,
    pub team: Option<String>,
    pub opponent: Option<String>,
    pub tier: Tier,
    pub confidence: f64,
    pub season_averages: StatLine,
    pub recent_averages: StatLine,
    pub usage_pct: f64,
    pub pace_or_null: Option<f64>,
    pub def_rank_or_null: Option<u32>,
    pub team_record: Option<String>,
    pub opp_record: Option<String>,
    pub opp_streak: Option<String>,
    pub trend: TrendSet,
}

impl PlayerCard {
    pub fn from_scored(player: &ScoredPlayer) -> Self {
        let record = &player.record;
        Self {
            name: record.name.clone(),
            team: record.team.clone(),
            opponent: record.opponent.clone(),
            tier: player.tier,
            confidence: player.confidence,
            season_averages: record.season_averages,
            recent_averages: record.recent_averages,
            usage_pct: record.usage_pct,
            pace_or_null: record.pace,
            def_rank_or_null: record.def_rank,
            team_record: record.team_record.clone(),
            opp_record: record.opp_record.clone(),
            opp_streak: record.opp_streak.clone(),
            trend: trend::aggregate_all(record),
        }
    }
}

pub fn cards_for<'a>(players: impl IntoIterator<Item = &'a ScoredPlayer>) -> Vec<PlayerCard> {
    players.into_iter().map(PlayerCard::from_scored).collect()
}

pub fn display_or_na<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

#[cfg(test)]
mod tests {
    use super::{display_or_na, format_confidence};

    #[test]
    fn missing_values_render_as_na() {
        assert_eq!(display_or_na(None::<u32>), "N/A");
        assert_eq!(display_or_na(Some(7)), "7");
        assert_eq!(display_or_na(Some("W3")), "W3");
    }

    #[test]
    fn confidence_renders_as_percent() {
        assert_eq!(format_confidence(0.8), "80%");
        assert_eq!(format_confidence(0.45), "45%");
    }
}
