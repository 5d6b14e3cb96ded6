//! Selected theme and last visited position.
//!
//! Both values live under their own state key and are read and written
//! independently of the ledger.

use crate::model::position::Position;
use crate::model::theme::{theme_at, theme_index, Theme, DEFAULT_THEME_INDEX};
use crate::repo::state_repo::{RepoError, StateRepository, LAST_POSITION_KEY, SELECTED_THEME_KEY};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum PreferencesError {
    Repo(RepoError),
    Encode(serde_json::Error),
}

impl Display for PreferencesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode preference: {err}"),
        }
    }
}

impl Error for PreferencesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<RepoError> for PreferencesError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for PreferencesError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

pub struct Preferences<R: StateRepository> {
    repo: R,
}

impl<R: StateRepository> Preferences<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Index of the stored theme; unknown or unreadable values fall back
    /// to the default theme.
    pub fn theme_index(&self) -> usize {
        match self.repo.get_value(SELECTED_THEME_KEY) {
            Ok(Some(id)) => theme_index(&id).unwrap_or(DEFAULT_THEME_INDEX),
            Ok(None) => DEFAULT_THEME_INDEX,
            Err(err) => {
                warn!("event=theme_load module=preferences status=error error={err}");
                DEFAULT_THEME_INDEX
            }
        }
    }

    pub fn theme(&self) -> Theme {
        theme_at(self.theme_index())
    }

    /// Persists the theme at `index` (wrapping) and returns it.
    pub fn select_theme(&self, index: usize) -> Result<Theme, PreferencesError> {
        let theme = theme_at(index);
        self.repo.put_value(SELECTED_THEME_KEY, theme.id)?;
        info!(
            "event=theme_select module=preferences status=ok theme={}",
            theme.id
        );
        Ok(theme)
    }

    /// Persists the theme after the current one.
    pub fn cycle_theme(&self) -> Result<Theme, PreferencesError> {
        self.select_theme(self.theme_index() + 1)
    }

    /// Last stored `{month, day}` pair; corrupt values read as `None`.
    pub fn last_position(&self) -> Option<Position> {
        let raw = match self.repo.get_value(LAST_POSITION_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!("event=last_position_load module=preferences status=error error={err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(position) => Some(position),
            Err(err) => {
                warn!(
                    "event=last_position_load module=preferences status=error error_code=corrupt_value error={err}"
                );
                None
            }
        }
    }

    pub fn save_last_position(&self, position: &Position) -> Result<(), PreferencesError> {
        let raw = serde_json::to_string(position)?;
        self.repo.put_value(LAST_POSITION_KEY, &raw)?;
        Ok(())
    }
}
