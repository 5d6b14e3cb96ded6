//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented access contracts for local persisted state.
//! - Isolate SQLite query details from ledger/preference orchestration.
//!
//! # Invariants
//! - Every well-known key is read and written independently; there is no
//!   transaction coupling between keys.

pub mod state_repo;
