use crate::state::{CanonicalPlayerRecord, ScoreFactor, ScoredPlayer, Tier};

pub const BASE_CONFIDENCE: f64 = 0.5;
/// Confidence reported when a player has no scoring average at all.
pub const INSUFFICIENT_DATA_CONFIDENCE: f64 = 0.45;
pub const GREEN_MIN: f64 = 0.75;
pub const YELLOW_MIN: f64 = 0.55;

const ADJUSTMENT: f64 = 0.10;
const USAGE_THRESHOLD: f64 = 22.0;
const MINUTES_THRESHOLD: f64 = 28.0;
const TOP_DEFENSE_MAX_RANK: u32 = 10;
const WEAK_DEFENSE_MIN_RANK: u32 = 20;

pub fn score(record: &CanonicalPlayerRecord) -> ScoredPlayer {
    let (confidence, factors) = evaluate(record);
    ScoredPlayer {
        record: record.clone(),
        confidence,
        tier: tier_for(confidence),
        factors,
    }
}

pub fn confidence(record: &CanonicalPlayerRecord) -> f64 {
    evaluate(record).0
}

pub fn tier_for(confidence: f64) -> Tier {
    if confidence >= GREEN_MIN {
        Tier::Green
    } else if confidence >= YELLOW_MIN {
        Tier::Yellow
    } else {
        Tier::Red
    }
}

fn evaluate(record: &CanonicalPlayerRecord) -> (f64, Vec<ScoreFactor>) {
    if record.season_averages.pts == 0.0 {
        let factor = ScoreFactor::new(
            "Insufficient data (no scoring average)",
            INSUFFICIENT_DATA_CONFIDENCE - BASE_CONFIDENCE,
        );
        return (INSUFFICIENT_DATA_CONFIDENCE, vec![factor]);
    }

    let mut factors = Vec::new();
    if record.usage_pct > USAGE_THRESHOLD {
        factors.push(ScoreFactor::new(
            format!("Usage {:.1}% above {USAGE_THRESHOLD}", record.usage_pct),
            ADJUSTMENT,
        ));
    }
    if record.minutes > MINUTES_THRESHOLD {
        factors.push(ScoreFactor::new(
            format!("{:.1} min above {MINUTES_THRESHOLD}", record.minutes),
            ADJUSTMENT,
        ));
    }
    if let Some(rank) = record.def_rank {
        if rank <= TOP_DEFENSE_MAX_RANK {
            factors.push(ScoreFactor::new(
                format!("Opponent defense #{rank} (top {TOP_DEFENSE_MAX_RANK})"),
                ADJUSTMENT,
            ));
        } else if rank >= WEAK_DEFENSE_MIN_RANK {
            factors.push(ScoreFactor::new(
                format!("Opponent defense #{rank} (bottom tier)"),
                -ADJUSTMENT,
            ));
        }
    }

    let raw = BASE_CONFIDENCE + factors.iter().map(|f| f.delta).sum::<f64>();
    (round_hundredths(raw.clamp(0.0, 1.0)), factors)
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use crate::state::Tier;

    use super::tier_for;

    #[test]
    fn tier_bounds_are_inclusive() {
        assert_eq!(tier_for(0.75), Tier::Green);
        assert_eq!(tier_for(0.7499), Tier::Yellow);
        assert_eq!(tier_for(0.55), Tier::Yellow);
        assert_eq!(tier_for(0.5499), Tier::Red);
        assert_eq!(tier_for(0.0), Tier::Red);
        assert_eq!(tier_for(1.0), Tier::Green);
    }
}
