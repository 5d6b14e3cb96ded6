//! Domain model for the calendar-shaped curriculum.
//!
//! # Responsibility
//! - Define the read-only month → week → day hierarchy.
//! - Define positions and the ledger key derived from them.
//! - Provide total lookups for topic text and themes.
//!
//! # Invariants
//! - Month and week iteration follow source (insertion) order.
//! - Lookups never fail; absent entries resolve to fixed defaults.

pub mod curriculum;
pub mod lookup;
pub mod position;
pub mod theme;
