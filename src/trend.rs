use crate::state::{
    CanonicalPlayerRecord, StatKind, StatRollup, TrendBundle, TrendDirection, TrendSet,
};

pub const PTS_CEILING: f64 = 40.0;
pub const REB_CEILING: f64 = 15.0;
pub const AST_CEILING: f64 = 12.0;

/// Value that fills a bar completely.
pub fn ceiling(stat: StatKind) -> f64 {
    match stat {
        StatKind::Pts => PTS_CEILING,
        StatKind::Reb => REB_CEILING,
        StatKind::Ast => AST_CEILING,
    }
}

pub fn direction_between(season: f64, window: f64) -> TrendDirection {
    if window > season {
        TrendDirection::Up
    } else if window < season {
        TrendDirection::Down
    } else {
        TrendDirection::Flat
    }
}

pub fn fill_ratio(value: f64, stat: StatKind) -> f64 {
    let ratio = value / ceiling(stat);
    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn aggregate_trend(record: &CanonicalPlayerRecord, stat: StatKind) -> TrendBundle {
    let season_value = record.season_averages.get(stat);
    let recent_value = record.recent_averages.get(stat);
    TrendBundle {
        season_value,
        recent_value,
        direction: direction_between(season_value, recent_value),
        fill_ratio: fill_ratio(recent_value, stat),
    }
}

pub fn aggregate_all(record: &CanonicalPlayerRecord) -> TrendSet {
    TrendSet {
        pts: aggregate_trend(record, StatKind::Pts),
        reb: aggregate_trend(record, StatKind::Reb),
        ast: aggregate_trend(record, StatKind::Ast),
    }
}

pub fn rollup(record: &CanonicalPlayerRecord, stat: StatKind) -> StatRollup {
    let season = record.season_averages.get(stat);
    let last5 = record.recent_averages.get(stat);
    let last10 = record.last10_averages.get(stat);
    StatRollup {
        stat,
        season,
        last5,
        last10,
        last5_direction: direction_between(season, last5),
        last10_direction: direction_between(season, last10),
    }
}

/// Season, L10, L5 in chronological order, scaled to 0..=100 of the ceiling.
pub fn sparkline_points(rollup: &StatRollup) -> [u64; 3] {
    let scale = |value: f64| (fill_ratio(value, rollup.stat) * 100.0).round() as u64;
    [scale(rollup.season), scale(rollup.last10), scale(rollup.last5)]
}

pub fn fill_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat_n('█', filled));
    bar.extend(std::iter::repeat_n('░', width - filled));
    bar
}

pub fn direction_symbol(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Up => "▲",
        TrendDirection::Down => "▼",
        TrendDirection::Flat => "▬",
    }
}

#[cfg(test)]
mod tests {
    use super::{fill_bar, fill_ratio};
    use crate::state::StatKind;

    #[test]
    fn fill_bar_is_proportional() {
        assert_eq!(fill_bar(0.5, 4), "██░░");
        assert_eq!(fill_bar(0.0, 3), "░░░");
        assert_eq!(fill_bar(2.0, 2), "██");
        assert_eq!(fill_bar(f64::NAN, 2), "░░");
    }

    #[test]
    fn fill_ratio_saturates_at_ceiling() {
        assert_eq!(fill_ratio(20.0, StatKind::Pts), 0.5);
        assert_eq!(fill_ratio(30.0, StatKind::Reb), 1.0);
        assert_eq!(fill_ratio(6.0, StatKind::Ast), 0.5);
    }
}
