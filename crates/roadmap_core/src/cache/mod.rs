//! Offline resource cache.
//!
//! # Responsibility
//! - Persist raw responses per cache generation (`storage`).
//! - Install, activate and serve a generation as a `Transport` decorator
//!   (`offline`).
//!
//! # Invariants
//! - At most one generation survives activation.
//! - A failed install never leaves a partially populated store behind.

pub mod offline;
pub mod storage;

pub use offline::{ActivationReport, CachePolicy, GenerationState, InstallReport, OfflineCache};
pub use storage::{CacheError, CacheResult, CacheStorage, SqliteCacheStorage};
