//! Note synchronization with the remote note store.
//!
//! # Responsibility
//! - Buffer a per-day draft and push it remotely (explicit and debounced).
//! - Reconcile the displayed draft with the store's latest record on every
//!   navigation.
//!
//! # Invariants
//! - A draft belonging to one position is never shown for another.
//! - A load result is applied only if its position is still active.
//! - Remote writes go through a single in-flight slot, in initiation order.

pub mod debounce;
pub mod identifier;
pub mod store;
pub mod synchronizer;

pub use store::{AutosaveRequest, NoteStore, SaveNoteRequest};
pub use synchronizer::{
    fetch_latest_note, LoadOutcome, LoadTicket, NoteSettings, NoteStatus, NoteSynchronizer,
    NoteTarget,
};
