#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use roadmap_core::assistant::AssistantApi;
use roadmap_core::curriculum::provider::CurriculumProvider;
use roadmap_core::notes::{AutosaveRequest, NoteStore, SaveNoteRequest};
use roadmap_core::transport::{Request, Response, Transport, TransportError, TransportResult};
use roadmap_core::{Curriculum, Day, Month, Week};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Hierarchy where each month lists its week sizes; day titles are
/// `"<month> w<week> d<day>"` and every topic is `Networking`.
pub fn curriculum(months: &[(&str, &[usize])]) -> Curriculum {
    let mut curriculum = Curriculum::default();
    for (name, weeks) in months {
        let mut month = Month {
            theme: format!("{name} theme"),
            ..Month::default()
        };
        for (week_index, size) in weeks.iter().enumerate() {
            let days = (0..*size)
                .map(|day| {
                    Day::new(
                        format!("{name} w{} d{}", week_index + 1, day + 1),
                        "Networking",
                        "study",
                    )
                })
                .collect();
            month.weeks.insert(
                format!("Week {}", week_index + 1),
                Week {
                    focus: String::new(),
                    days,
                },
            );
        }
        curriculum.months.insert(name.to_string(), month);
    }
    curriculum
}

pub fn record(month: &str, day: usize, title: &str, body: &str) -> String {
    format!("Date: 2026-01-01\nMonth: {month}\nDay: {day:02}\nTitle: {title}\n\n{body}")
}

/// In-memory note store recording every call.
#[derive(Default)]
pub struct FakeNoteStore {
    records: Mutex<HashMap<String, Vec<(String, String)>>>,
    pub saves: Mutex<Vec<SaveNoteRequest>>,
    pub autosaves: Mutex<Vec<AutosaveRequest>>,
    pub reads: Mutex<Vec<String>>,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
    /// Delays for successive writes in call order; later writes are instant.
    write_delays: Mutex<VecDeque<Duration>>,
    /// Written contents in the order the writes finished.
    pub completed: Mutex<Vec<String>>,
}

impl FakeNoteStore {
    pub fn with_record(self, month: &str, identifier: &str, content: &str) -> Self {
        self.records
            .lock()
            .entry(month.to_string())
            .or_default()
            .push((identifier.to_string(), content.to_string()));
        self
    }

    pub fn with_write_delays(self, delays: &[Duration]) -> Self {
        self.write_delays.lock().extend(delays.iter().copied());
        self
    }

    async fn finish_write(&self, content: &str) -> TransportResult<()> {
        let delay = self.write_delays.lock().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.lock().push(content.to_string());
        self.write_result()
    }

    fn write_result(&self) -> TransportResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(TransportError::Network("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn read_guard(&self) -> TransportResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(TransportError::Network("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NoteStore for FakeNoteStore {
    async fn save(&self, request: &SaveNoteRequest) -> TransportResult<()> {
        self.saves.lock().push(request.clone());
        self.finish_write(&request.content).await
    }

    async fn autosave(&self, request: &AutosaveRequest) -> TransportResult<()> {
        self.autosaves.lock().push(request.clone());
        self.finish_write(&request.content).await
    }

    async fn list(&self, month: &str) -> TransportResult<Vec<String>> {
        self.read_guard()?;
        Ok(self
            .records
            .lock()
            .get(month)
            .map(|records| records.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default())
    }

    async fn read(&self, month: &str, identifier: &str) -> TransportResult<String> {
        self.read_guard()?;
        self.reads.lock().push(identifier.to_string());
        self.records
            .lock()
            .get(month)
            .and_then(|records| records.iter().find(|(id, _)| id == identifier))
            .map(|(_, content)| content.clone())
            .ok_or_else(|| TransportError::Status {
                url: identifier.to_string(),
                status: 404,
            })
    }
}

/// Assistant answering every call with the same reply.
pub struct FakeAssistant {
    pub reply: TransportResult<String>,
    pub topics: Mutex<Vec<String>>,
}

impl FakeAssistant {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            topics: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AssistantApi for FakeAssistant {
    async fn ask(&self, _question: &str, topic: &str) -> TransportResult<String> {
        self.topics.lock().push(topic.to_string());
        self.reply.clone()
    }

    async fn reflection_question(&self, topic: &str) -> TransportResult<String> {
        self.topics.lock().push(topic.to_string());
        self.reply.clone()
    }
}

/// Curriculum provider returning a fixed result.
pub struct StaticProvider(pub TransportResult<Curriculum>);

#[async_trait]
impl CurriculumProvider for StaticProvider {
    async fn fetch_curriculum(&self) -> TransportResult<Curriculum> {
        self.0.clone()
    }
}

/// Network double keyed by URL, recording every fetched URL.
#[derive(Default)]
pub struct FakeNetwork {
    routes: Mutex<HashMap<String, TransportResult<Response>>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeNetwork {
    pub fn route(self, url: &str, result: TransportResult<Response>) -> Self {
        self.routes.lock().insert(url.to_string(), result);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Transport for FakeNetwork {
    async fn fetch(&self, request: &Request) -> TransportResult<Response> {
        self.calls.lock().push(request.url.clone());
        self.routes
            .lock()
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| Ok(Response::new(404, b"not found".to_vec())))
    }
}
