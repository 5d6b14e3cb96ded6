//! Remote note store contract.

use crate::transport::TransportResult;
use async_trait::async_trait;
use serde::Serialize;

/// Explicit save payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveNoteRequest {
    pub month: String,
    /// Zero-padded 1-based day number.
    pub day: String,
    pub title: String,
    pub content: String,
}

/// Background autosave payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutosaveRequest {
    pub month: String,
    pub title: String,
    pub content: String,
}

/// Canonical remote persistence for notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn save(&self, request: &SaveNoteRequest) -> TransportResult<()>;
    async fn autosave(&self, request: &AutosaveRequest) -> TransportResult<()>;
    /// Identifiers of every record stored for `month`.
    async fn list(&self, month: &str) -> TransportResult<Vec<String>>;
    /// Full record content, header metadata included.
    async fn read(&self, month: &str, identifier: &str) -> TransportResult<String>;
}
