//! Day/month navigation state machine.
//!
//! # Responsibility
//! - Hold the active `(month, day offset)` and compute transitions.
//! - Cross month boundaries in hierarchy order.
//!
//! # Invariants
//! - The offset is always inside the active month's flattened sequence;
//!   a month without days has no offset.
//! - Moving past the first day of the first month or the last day of the
//!   last month leaves the state unchanged.

use crate::curriculum::day_index::days_in;
use crate::model::curriculum::Curriculum;
use crate::model::position::Position;
use chrono::{Datelike, NaiveDate};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Direction of a single-day step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}

/// Outcome of a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State was set (possibly to the same position).
    Moved,
    /// The request was absorbed as a no-op.
    Unchanged,
}

impl Transition {
    pub fn moved(self) -> bool {
        matches!(self, Self::Moved)
    }
}

/// Active navigation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    month: Option<String>,
    day_offset: Option<usize>,
}

impl Navigator {
    /// State for `today`: the month with today's name, clamped to its days.
    ///
    /// Falls back to the first month at offset 0 when no month matches, and
    /// to an empty state when the hierarchy has no months.
    pub fn initial(curriculum: &Curriculum, today: NaiveDate) -> Self {
        let today_name = MONTH_NAMES[today.month0() as usize];
        let mut navigator = Self::default();
        if curriculum.month(today_name).is_some() {
            navigator.goto(curriculum, today_name, today.day0() as usize);
        } else if let Some(first) = curriculum.first_month() {
            navigator.goto(curriculum, first, 0);
        }
        navigator
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    pub fn day_offset(&self) -> Option<usize> {
        self.day_offset
    }

    /// Active position; `None` when the active month has no days.
    pub fn position(&self) -> Option<Position> {
        match (self.month.as_ref(), self.day_offset) {
            (Some(month), Some(offset)) => Some(Position::new(month.clone(), offset)),
            _ => None,
        }
    }

    /// Sets the position directly, clamping `offset` into the month.
    ///
    /// Unknown months are absorbed as `Unchanged`.
    pub fn goto(&mut self, curriculum: &Curriculum, month: &str, offset: usize) -> Transition {
        if curriculum.month(month).is_none() {
            return Transition::Unchanged;
        }
        let len = days_in(curriculum, month);
        self.month = Some(month.to_string());
        self.day_offset = if len == 0 {
            None
        } else {
            Some(offset.min(len - 1))
        };
        Transition::Moved
    }

    /// Moves one day, crossing into the neighbouring month when needed.
    pub fn step(&mut self, curriculum: &Curriculum, direction: StepDirection) -> Transition {
        let Some(month) = self.month.clone() else {
            return Transition::Unchanged;
        };
        let Some(month_index) = curriculum.month_index(&month) else {
            return Transition::Unchanged;
        };
        let len = days_in(curriculum, &month);

        match (direction, self.day_offset) {
            (StepDirection::Forward, Some(offset)) if offset + 1 < len => {
                self.day_offset = Some(offset + 1);
                Transition::Moved
            }
            (StepDirection::Backward, Some(offset)) if offset > 0 => {
                self.day_offset = Some(offset - 1);
                Transition::Moved
            }
            (StepDirection::Forward, _) => match curriculum.month_at(month_index + 1) {
                Some((next, _)) => self.goto(curriculum, next, 0),
                None => Transition::Unchanged,
            },
            (StepDirection::Backward, _) => {
                let Some(previous_index) = month_index.checked_sub(1) else {
                    return Transition::Unchanged;
                };
                match curriculum.month_at(previous_index) {
                    Some((previous, _)) => {
                        let last = days_in(curriculum, previous).saturating_sub(1);
                        self.goto(curriculum, previous, last)
                    }
                    None => Transition::Unchanged,
                }
            }
        }
    }
}
