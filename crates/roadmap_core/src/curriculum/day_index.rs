//! Flattened day sequence per month.
//!
//! # Responsibility
//! - Concatenate a month's weeks into one ordered day sequence.
//! - Resolve positional lookups and real week extents.
//!
//! # Invariants
//! - Flattening is pure and idempotent; nothing is cached.
//! - Offsets beyond the sequence resolve to `None`, never panic.

use crate::model::curriculum::{Curriculum, Day, Month};
use std::ops::Range;

/// Days of `month` in week-key order, then within-week order.
pub fn flatten(month: &Month) -> Vec<&Day> {
    month.weeks.values().flat_map(|week| week.days.iter()).collect()
}

/// Number of days in `month`.
pub fn month_len(month: &Month) -> usize {
    month.weeks.values().map(|week| week.days.len()).sum()
}

/// Number of days in the month named `month`; 0 when absent.
pub fn days_in(curriculum: &Curriculum, month: &str) -> usize {
    curriculum.month(month).map_or(0, month_len)
}

/// Day at `offset` in the flattened sequence of `month`.
pub fn day_at<'a>(curriculum: &'a Curriculum, month: &str, offset: usize) -> Option<&'a Day> {
    let month = curriculum.month(month)?;
    month
        .weeks
        .values()
        .flat_map(|week| week.days.iter())
        .nth(offset)
}

/// Offset range covered by each week, in week-key order.
pub fn week_ranges(month: &Month) -> Vec<Range<usize>> {
    let mut start = 0;
    month
        .weeks
        .values()
        .map(|week| {
            let range = start..start + week.days.len();
            start = range.end;
            range
        })
        .collect()
}
