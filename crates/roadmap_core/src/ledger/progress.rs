//! Persisted completion ledger.

use crate::curriculum::day_index::days_in;
use crate::ledger::aggregate::{week_index_of, week_window, WeekBoundary};
use crate::model::curriculum::Curriculum;
use crate::model::position::Position;
use crate::repo::state_repo::{RepoError, StateRepository, PROGRESS_LEDGER_KEY};
use log::{info, warn};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Completed-day percentage.
pub const COMPLETE_PERCENT: u8 = 100;

/// Ledger persistence error.
#[derive(Debug)]
pub enum LedgerError {
    Repo(RepoError),
    Encode(serde_json::Error),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "ledger encoding failed: {err}"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<RepoError> for LedgerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Range of days affected by a clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    Day,
    Week,
    Month,
    Year,
}

impl ClearScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl FromStr for ClearScope {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(format!(
                "unsupported clear scope `{other}`; expected day|week|month|year"
            )),
        }
    }
}

/// In-memory ledger contents keyed by `PositionKey`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerEntries(BTreeMap<String, u8>);

impl LedgerEntries {
    /// Percentage for `month` at `day_offset`; 0 when absent.
    pub fn percent(&self, month: &str, day_offset: usize) -> u8 {
        self.get(&Position::new(month, day_offset))
    }

    pub fn get(&self, position: &Position) -> u8 {
        self.0.get(position.key().as_str()).copied().unwrap_or(0)
    }

    pub fn is_complete(&self, month: &str, day_offset: usize) -> bool {
        self.percent(month, day_offset) == COMPLETE_PERCENT
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    /// JSON object form used for persistence and export.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }

    /// Parses a persisted object, keeping integer values clamped to 100.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let parsed: BTreeMap<String, Value> = serde_json::from_str(raw)?;
        let entries = parsed
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_u64()
                    .map(|percent| (key, percent.min(u64::from(COMPLETE_PERCENT)) as u8))
            })
            .collect();
        Ok(Self(entries))
    }
}

/// Completion ledger bound to its persistence repository.
pub struct ProgressLedger<R: StateRepository> {
    repo: R,
    entries: LedgerEntries,
}

impl<R: StateRepository> ProgressLedger<R> {
    /// Reads the full ledger; a missing or corrupt object starts empty.
    pub fn load(repo: R) -> Result<Self, LedgerError> {
        let entries = match repo.get_value(PROGRESS_LEDGER_KEY)? {
            Some(raw) => match LedgerEntries::from_json(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(
                        "event=ledger_load module=ledger status=error error_code=corrupt_ledger error={}",
                        err
                    );
                    LedgerEntries::default()
                }
            },
            None => LedgerEntries::default(),
        };
        info!(
            "event=ledger_load module=ledger status=ok entries={}",
            entries.len()
        );
        Ok(Self { repo, entries })
    }

    pub fn entries(&self) -> &LedgerEntries {
        &self.entries
    }

    pub fn get(&self, position: &Position) -> u8 {
        self.entries.get(position)
    }

    /// Overwrites one percentage (clamped to 100) and persists.
    pub fn set(&mut self, position: &Position, percent: u8) -> Result<(), LedgerError> {
        let mut next = self.entries.0.clone();
        next.insert(
            position.key().as_str().to_string(),
            percent.min(COMPLETE_PERCENT),
        );
        self.commit(next)
    }

    /// Removes every key in `scope` around `position`, then persists.
    ///
    /// Returns the number of keys removed. Week extents follow `boundary`.
    pub fn clear(
        &mut self,
        scope: ClearScope,
        position: &Position,
        curriculum: &Curriculum,
        boundary: WeekBoundary,
    ) -> Result<usize, LedgerError> {
        let mut next = self.entries.0.clone();
        let offsets = match scope {
            ClearScope::Day => position.day_offset..position.day_offset + 1,
            ClearScope::Week => {
                let week_index =
                    week_index_of(curriculum, &position.month, position.day_offset, boundary);
                week_window(curriculum, &position.month, week_index, boundary)
            }
            ClearScope::Month => 0..days_in(curriculum, &position.month),
            ClearScope::Year => {
                next.clear();
                0..0
            }
        };
        for offset in offsets {
            next.remove(Position::new(position.month.as_str(), offset).key().as_str());
        }

        let removed = self.entries.len() - next.len();
        self.commit(next)?;
        info!(
            "event=ledger_clear module=ledger status=ok scope={} removed={}",
            scope.as_str(),
            removed
        );
        Ok(removed)
    }

    fn commit(&mut self, next: BTreeMap<String, u8>) -> Result<(), LedgerError> {
        let next = LedgerEntries(next);
        let raw = next.to_json()?;
        self.repo.put_value(PROGRESS_LEDGER_KEY, &raw)?;
        self.entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ClearScope, LedgerEntries};

    #[test]
    fn parses_scopes() {
        assert_eq!("Week".parse::<ClearScope>(), Ok(ClearScope::Week));
        assert!("decade".parse::<ClearScope>().is_err());
    }

    #[test]
    fn from_json_clamps_and_skips_non_integers() {
        let raw = r#"{"May-0":100,"May-1":250,"May-2":"x","May-3":40}"#;
        let entries = LedgerEntries::from_json(raw).expect("valid object");
        assert_eq!(entries.percent("May", 0), 100);
        assert_eq!(entries.percent("May", 1), 100);
        assert_eq!(entries.percent("May", 2), 0);
        assert_eq!(entries.percent("May", 3), 40);
        assert_eq!(entries.len(), 3);
    }
}
