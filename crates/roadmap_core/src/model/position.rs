//! Curriculum positions and ledger keys.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A day within a month, addressed by its 0-based flattened offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub month: String,
    #[serde(rename = "day")]
    pub day_offset: usize,
}

impl Position {
    pub fn new(month: impl Into<String>, day_offset: usize) -> Self {
        Self {
            month: month.into(),
            day_offset,
        }
    }

    /// Ledger key for this position.
    pub fn key(&self) -> PositionKey {
        PositionKey::new(&self.month, self.day_offset)
    }

    /// 1-based day number.
    pub fn day_number(&self) -> usize {
        self.day_offset + 1
    }

    /// Zero-padded 1-based day number as used in note identifiers.
    pub fn padded_day(&self) -> String {
        format!("{:02}", self.day_number())
    }
}

/// Ledger key: month name joined with the day offset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionKey(String);

impl PositionKey {
    pub fn new(month: &str, day_offset: usize) -> Self {
        Self(format!("{month}-{day_offset}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PositionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
