//! HTTP adapters for the roadmap backend.
//!
//! # Responsibility
//! - Build backend URLs and payloads for curriculum, notes and assistant calls.
//! - Decode the JSON envelopes each endpoint answers with.
//!
//! # Invariants
//! - Every call goes through the injected `Transport`, so the offline cache
//!   can decorate it.
//! - Non-2xx statuses surface as `TransportError::Status`.

use crate::assistant::AssistantApi;
use crate::curriculum::provider::CurriculumProvider;
use crate::model::curriculum::Curriculum;
use crate::notes::store::{AutosaveRequest, NoteStore, SaveNoteRequest};
use crate::transport::{Request, Response, Transport, TransportError, TransportResult};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

#[derive(Debug, Deserialize)]
struct NoteList {
    #[serde(default)]
    notes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NoteContent {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ReflectionQuestion {
    question: String,
}

#[derive(Debug, Deserialize)]
struct Answer {
    answer: String,
}

/// Backend client over any transport.
pub struct ApiClient<T> {
    transport: T,
    base: String,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { transport, base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> TransportResult<String> {
        let raw = format!("{}{}", self.base, path);
        let url = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };
        url.map(String::from)
            .map_err(|err| TransportError::InvalidUrl(format!("{raw}: {err}")))
    }

    async fn send(&self, request: Request) -> TransportResult<Response> {
        let url = request.url.clone();
        self.transport.fetch(&request).await?.require_success(&url)
    }

    async fn get_json<D>(&self, path: &str, query: &[(&str, &str)]) -> TransportResult<D>
    where
        D: for<'de> Deserialize<'de>,
    {
        let request = Request::get(self.url(path, query)?);
        self.send(request).await?.json()
    }
}

#[async_trait]
impl<T: Transport> CurriculumProvider for ApiClient<T> {
    async fn fetch_curriculum(&self) -> TransportResult<Curriculum> {
        self.get_json("/api/roadmap", &[]).await
    }
}

#[async_trait]
impl<T: Transport> NoteStore for ApiClient<T> {
    async fn save(&self, request: &SaveNoteRequest) -> TransportResult<()> {
        let request = Request::post_json(self.url("/api/notes/save", &[])?, request)?;
        self.send(request).await.map(|_| ())
    }

    async fn autosave(&self, request: &AutosaveRequest) -> TransportResult<()> {
        let request = Request::post_json(self.url("/api/notes/autosave", &[])?, request)?;
        self.send(request).await.map(|_| ())
    }

    async fn list(&self, month: &str) -> TransportResult<Vec<String>> {
        let list: NoteList = self
            .get_json("/api/notes/list", &[("month", month)])
            .await?;
        Ok(list.notes)
    }

    async fn read(&self, month: &str, identifier: &str) -> TransportResult<String> {
        let note: NoteContent = self
            .get_json(
                "/api/notes/read",
                &[("month", month), ("filename", identifier)],
            )
            .await?;
        Ok(note.content)
    }
}

#[async_trait]
impl<T: Transport> AssistantApi for ApiClient<T> {
    async fn ask(&self, question: &str, topic: &str) -> TransportResult<String> {
        let answer: Answer = self
            .get_json("/api/ask", &[("question", question), ("topic", topic)])
            .await?;
        Ok(answer.answer)
    }

    async fn reflection_question(&self, topic: &str) -> TransportResult<String> {
        let reflection: ReflectionQuestion = self
            .get_json("/api/notes/reflection", &[("topic", topic)])
            .await?;
        Ok(reflection.question)
    }
}
