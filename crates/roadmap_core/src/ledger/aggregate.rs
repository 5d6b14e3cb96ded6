//! Pure rollups over ledger entries and the hierarchy.

use crate::curriculum::day_index::{days_in, week_ranges};
use crate::ledger::progress::LedgerEntries;
use crate::model::curriculum::Curriculum;
use crate::model::position::Position;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Positional week width used by `WeekBoundary::FixedSeven`.
pub const FIXED_WEEK_DAYS: usize = 7;

/// How week extents are derived for weekly rollups and week clears.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekBoundary {
    /// The month's own week grouping.
    #[default]
    Hierarchy,
    /// Seven-day windows counted from offset 0, regardless of real weeks.
    FixedSeven,
}

/// `round(100 * completed / total)` with half-up rounding; 0 when `total == 0`.
pub fn round_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    ((200 * completed + total) / (2 * total)) as u8
}

/// Index of the week containing `day_offset`.
pub fn week_index_of(
    curriculum: &Curriculum,
    month: &str,
    day_offset: usize,
    boundary: WeekBoundary,
) -> usize {
    match boundary {
        WeekBoundary::FixedSeven => day_offset / FIXED_WEEK_DAYS,
        WeekBoundary::Hierarchy => curriculum
            .month(month)
            .map(week_ranges)
            .and_then(|ranges| ranges.iter().position(|range| range.contains(&day_offset)))
            .unwrap_or(usize::MAX),
    }
}

/// Offsets covered by week `week_index`, clamped to the month length.
pub fn week_window(
    curriculum: &Curriculum,
    month: &str,
    week_index: usize,
    boundary: WeekBoundary,
) -> Range<usize> {
    match boundary {
        WeekBoundary::FixedSeven => {
            let len = days_in(curriculum, month);
            let start = week_index.saturating_mul(FIXED_WEEK_DAYS).min(len);
            start..start.saturating_add(FIXED_WEEK_DAYS).min(len)
        }
        WeekBoundary::Hierarchy => curriculum
            .month(month)
            .and_then(|month| week_ranges(month).into_iter().nth(week_index))
            .unwrap_or(0..0),
    }
}

pub fn daily_percent(entries: &LedgerEntries, position: &Position) -> u8 {
    entries.get(position)
}

pub fn weekly_percent(
    entries: &LedgerEntries,
    curriculum: &Curriculum,
    month: &str,
    week_index: usize,
    boundary: WeekBoundary,
) -> u8 {
    let window = week_window(curriculum, month, week_index, boundary);
    let size = window.len();
    let completed = window
        .filter(|offset| entries.is_complete(month, *offset))
        .count();
    round_percent(completed, size)
}

fn completed_in_month(entries: &LedgerEntries, curriculum: &Curriculum, month: &str) -> usize {
    (0..days_in(curriculum, month))
        .filter(|offset| entries.is_complete(month, *offset))
        .count()
}

pub fn monthly_percent(entries: &LedgerEntries, curriculum: &Curriculum, month: &str) -> u8 {
    round_percent(
        completed_in_month(entries, curriculum, month),
        days_in(curriculum, month),
    )
}

/// Rollup over the given months.
pub fn yearly_percent<'a, I>(entries: &LedgerEntries, curriculum: &Curriculum, months: I) -> u8
where
    I: IntoIterator<Item = &'a str>,
{
    let (completed, total) = months.into_iter().fold((0, 0), |(completed, total), month| {
        (
            completed + completed_in_month(entries, curriculum, month),
            total + days_in(curriculum, month),
        )
    });
    round_percent(completed, total)
}

/// Per-month rollup row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthProgress {
    pub month: String,
    pub percent: u8,
}

/// All rollups for the active position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub daily: u8,
    pub weekly: u8,
    pub monthly: u8,
    pub yearly: u8,
    pub months: Vec<MonthProgress>,
}

impl ProgressSnapshot {
    /// Recomputes every rollup; the yearly figure spans all months.
    ///
    /// With no active day, daily and weekly are 0 and monthly covers
    /// `active_month` when given.
    pub fn compute(
        entries: &LedgerEntries,
        curriculum: &Curriculum,
        active_month: Option<&str>,
        position: Option<&Position>,
        boundary: WeekBoundary,
    ) -> Self {
        let (daily, weekly) = match position {
            Some(position) => {
                let week_index =
                    week_index_of(curriculum, &position.month, position.day_offset, boundary);
                (
                    daily_percent(entries, position),
                    weekly_percent(entries, curriculum, &position.month, week_index, boundary),
                )
            }
            None => (0, 0),
        };
        let monthly = active_month.map_or(0, |month| monthly_percent(entries, curriculum, month));
        let months = curriculum
            .month_names()
            .map(|month| MonthProgress {
                month: month.to_string(),
                percent: monthly_percent(entries, curriculum, month),
            })
            .collect();

        Self {
            daily,
            weekly,
            monthly,
            yearly: yearly_percent(entries, curriculum, curriculum.month_names()),
            months,
        }
    }
}
