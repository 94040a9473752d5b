use chrono::{Duration, NaiveDate};

use crate::key::{derive_key, RangeKey};
use crate::models::{CycleRecord, CycleStat, CycleStatsResponse, CycleSummary};

const TYPICAL_CYCLE_DAYS: i64 = 28;
const FERTILE_WINDOW_START: i64 = 12;
const FERTILE_WINDOW_END: i64 = 16;

/// Resolvable ranges in start order. A range that ends before it starts is
/// left out like an unreadable one.
fn dated_ranges(records: &[CycleRecord]) -> Vec<RangeKey> {
    let mut ranges: Vec<RangeKey> = records
        .iter()
        .filter_map(|r| derive_key(r))
        .filter(|range| range.end >= range.start)
        .collect();
    ranges.sort();
    ranges
}

/// Where `today` falls in the most recently started cycle.
pub fn cycle_summary(records: &[CycleRecord], today: NaiveDate) -> Option<CycleSummary> {
    let start_date = dated_ranges(records).last()?.start;
    let cycle_day = (today - start_date).num_days();

    // A window past the last representable date can't contain today.
    let in_fertile_window = match (
        start_date.checked_add_signed(Duration::days(FERTILE_WINDOW_START)),
        start_date.checked_add_signed(Duration::days(FERTILE_WINDOW_END)),
    ) {
        (Some(first), Some(last)) => (first..=last).contains(&today),
        _ => false,
    };

    Some(CycleSummary {
        cycle_day,
        in_fertile_window,
        period_expected_in_days: TYPICAL_CYCLE_DAYS - cycle_day,
        start_date,
    })
}

pub fn cycle_stats(records: &[CycleRecord]) -> CycleStatsResponse {
    let ranges = dated_ranges(records);

    let mut total_period = 0;
    let mut total_cycle = 0;
    let mut stats = Vec::new();

    for (i, range) in ranges.iter().enumerate() {
        let period = (range.end - range.start).num_days() + 1;
        let cycle_len = ranges
            .get(i + 1)
            .map(|next| (next.start - range.start).num_days())
            .unwrap_or(0); // 0 for ongoing cycle

        total_period += period;
        total_cycle += cycle_len;

        stats.push(CycleStat {
            cycle_number: (i + 1) as i32,
            start_date: range.start,
            period_length: period as i32,
            cycle_length: cycle_len as i32,
        });
    }

    let count = stats.len() as f64;

    CycleStatsResponse {
        average_period_length: if count > 0.0 { total_period as f64 / count } else { 0.0 },
        average_cycle_length: if count > 0.0 { total_cycle as f64 / count } else { 0.0 },
        cycle_stats: stats,
    }
}
