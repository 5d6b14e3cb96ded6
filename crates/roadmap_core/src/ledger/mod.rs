//! Progress ledger, hierarchical aggregation and export.
//!
//! # Responsibility
//! - Persist per-day completion percentages as one serialized object.
//! - Derive day/week/month/year rollups as pure functions.
//!
//! # Invariants
//! - The ledger is read fully at load and rewritten fully on every mutation.
//! - An absent key means 0%.
//! - All rollups are integers; zero denominators yield 0.

pub mod aggregate;
pub mod export;
pub mod progress;

pub use aggregate::{ProgressSnapshot, WeekBoundary};
pub use progress::{ClearScope, LedgerEntries, LedgerError, ProgressLedger};
