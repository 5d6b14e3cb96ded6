//! Application state for one roadmap session.
//!
//! # Responsibility
//! - Own the hierarchy, navigation state, ledger, preferences and notes.
//! - Run the per-transition pipeline after every move.
//!
//! # Invariants
//! - After every transition, in order: ledger read for display, note
//!   reconciliation, aggregate recompute.
//! - Boundary moves and moves with no active day are `Unchanged`, never
//!   errors.

use crate::assistant::{ask_opportunistic, compose_reflection, reflection_prompt, AssistantApi};
use crate::curriculum::day_index::day_at;
use crate::curriculum::provider::CurriculumSource;
use crate::curriculum::search::{search_days, SearchHit};
use crate::ledger::export::{export_ledger, ExportDocument};
use crate::ledger::progress::COMPLETE_PERCENT;
use crate::ledger::{
    ClearScope, LedgerEntries, LedgerError, ProgressLedger, ProgressSnapshot, WeekBoundary,
};
use crate::model::curriculum::{Curriculum, Day};
use crate::model::lookup::{daily_tip, motivational_quote};
use crate::model::position::Position;
use crate::model::theme::Theme;
use crate::navigation::{Navigator, StepDirection, Transition};
use crate::notes::{NoteSettings, NoteStatus, NoteStore, NoteSynchronizer, NoteTarget};
use crate::preferences::{Preferences, PreferencesError};
use crate::repo::state_repo::StateRepository;
use chrono::NaiveDate;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug)]
pub enum SessionError {
    Ledger(LedgerError),
    Preferences(PreferencesError),
    Export(serde_json::Error),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ledger(err) => write!(f, "{err}"),
            Self::Preferences(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "failed to serialize export: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ledger(err) => Some(err),
            Self::Preferences(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<LedgerError> for SessionError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<PreferencesError> for SessionError {
    fn from(value: PreferencesError) -> Self {
        Self::Preferences(value)
    }
}

/// Session behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSettings {
    pub week_boundary: WeekBoundary,
    /// Start at the stored last position instead of today's.
    pub resume_last_position: bool,
}

/// Everything shown for the active day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub position: Option<Position>,
    /// Active day, or the placeholder day when none exists.
    pub day: Day,
    pub quote: &'static str,
    pub tip: &'static str,
    /// Completion percentage of the active day.
    pub completion: u8,
    pub progress: ProgressSnapshot,
    pub note_draft: String,
    pub note_status: NoteStatus,
    /// Degraded-source notice for the hierarchy.
    pub notice: Option<&'static str>,
}

/// External collaborators a session is built from.
pub struct SessionServices<R> {
    pub repo: R,
    pub notes: Arc<dyn NoteStore>,
    pub assistant: Arc<dyn AssistantApi>,
}

pub struct RoadmapSession<R: StateRepository + Clone> {
    curriculum: Curriculum,
    notice: Option<&'static str>,
    navigator: Navigator,
    ledger: ProgressLedger<R>,
    preferences: Preferences<R>,
    notes: NoteSynchronizer,
    assistant: Arc<dyn AssistantApi>,
    settings: SessionSettings,
    completion: u8,
    snapshot: ProgressSnapshot,
}

impl<R: StateRepository + Clone> RoadmapSession<R> {
    /// Builds the session and runs the transition pipeline once for the
    /// starting position.
    pub async fn open(
        source: CurriculumSource,
        services: SessionServices<R>,
        settings: SessionSettings,
        note_settings: NoteSettings,
        today: NaiveDate,
    ) -> Result<Self, SessionError> {
        let notice = source.notice();
        let curriculum = source.into_curriculum();
        let ledger = ProgressLedger::load(services.repo.clone())?;
        let preferences = Preferences::new(services.repo);

        let mut navigator = Navigator::initial(&curriculum, today);
        if settings.resume_last_position {
            if let Some(last) = preferences.last_position() {
                let mut resumed = Navigator::default();
                if resumed
                    .goto(&curriculum, &last.month, last.day_offset)
                    .moved()
                {
                    navigator = resumed;
                }
            }
        }

        let mut session = Self {
            curriculum,
            notice,
            navigator,
            ledger,
            preferences,
            notes: NoteSynchronizer::new(services.notes, note_settings),
            assistant: services.assistant,
            settings,
            completion: 0,
            snapshot: ProgressSnapshot::default(),
        };
        session.after_transition().await;
        Ok(session)
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn position(&self) -> Option<Position> {
        self.navigator.position()
    }

    pub fn entries(&self) -> &LedgerEntries {
        self.ledger.entries()
    }

    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    pub fn notes(&self) -> &NoteSynchronizer {
        &self.notes
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    /// Active day, if the active month has days.
    pub fn active_day(&self) -> Option<&Day> {
        let month = self.navigator.month()?;
        day_at(&self.curriculum, month, self.navigator.day_offset()?)
    }

    pub async fn goto(&mut self, month: &str, day_offset: usize) -> Transition {
        let transition = self.navigator.goto(&self.curriculum, month, day_offset);
        self.finish(transition).await
    }

    pub async fn step(&mut self, direction: StepDirection) -> Transition {
        let transition = self.navigator.step(&self.curriculum, direction);
        self.finish(transition).await
    }

    /// Marks the active day 100% and steps forward.
    pub async fn complete(&mut self) -> Result<Transition, SessionError> {
        let Some(position) = self.navigator.position() else {
            return Ok(Transition::Unchanged);
        };
        self.ledger.set(&position, COMPLETE_PERCENT)?;
        let transition = self.navigator.step(&self.curriculum, StepDirection::Forward);
        if !transition.moved() {
            self.read_completion();
            self.recompute();
        }
        Ok(self.finish(transition).await)
    }

    /// Clears `scope` around the active position; returns removed keys.
    pub fn clear_progress(&mut self, scope: ClearScope) -> Result<usize, SessionError> {
        let position = self.navigator.position().unwrap_or_else(|| {
            Position::new(self.navigator.month().unwrap_or_default(), 0)
        });
        let removed = self.ledger.clear(
            scope,
            &position,
            &self.curriculum,
            self.settings.week_boundary,
        )?;
        self.read_completion();
        self.recompute();
        Ok(removed)
    }

    /// Replaces the draft and schedules its autosave.
    pub fn edit_note(&mut self, content: &str) -> bool {
        self.notes.edit(content)
    }

    pub async fn save_note(&mut self, content: &str) -> NoteStatus {
        self.notes.save_now(content).await
    }

    /// Asks about the active day's topic; `None` for blank questions.
    pub async fn ask(&self, question: &str) -> Option<String> {
        let topic = self.active_topic();
        ask_opportunistic(self.assistant.as_ref(), question, &topic).await
    }

    pub async fn reflection_question(&self) -> String {
        let topic = self.active_topic();
        reflection_prompt(self.assistant.as_ref(), &topic).await
    }

    /// Appends a reflection to the draft and saves it; `None` when the
    /// answer is blank.
    pub async fn save_reflection(&mut self, question: &str, answer: &str) -> Option<NoteStatus> {
        let content = compose_reflection(self.notes.draft(), question, answer)?;
        Some(self.notes.save_now(&content).await)
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        search_days(&self.curriculum, query)
    }

    pub async fn select_search_hit(&mut self, hit: &SearchHit) -> Transition {
        let position = hit.position();
        self.goto(&position.month, position.day_offset).await
    }

    pub fn export(&self, today: NaiveDate) -> Result<ExportDocument, SessionError> {
        export_ledger(self.ledger.entries(), today).map_err(SessionError::Export)
    }

    pub fn theme(&self) -> Theme {
        self.preferences.theme()
    }

    pub fn select_theme(&self, index: usize) -> Result<Theme, SessionError> {
        Ok(self.preferences.select_theme(index)?)
    }

    pub fn cycle_theme(&self) -> Result<Theme, SessionError> {
        Ok(self.preferences.cycle_theme()?)
    }

    pub fn view(&self) -> DayView {
        let day = self.active_day().cloned().unwrap_or_else(Day::placeholder);
        DayView {
            position: self.navigator.position(),
            quote: motivational_quote(&day.topic).as_str(),
            tip: daily_tip(&day.topic).as_str(),
            day,
            completion: self.completion,
            progress: self.snapshot.clone(),
            note_draft: self.notes.draft().to_string(),
            note_status: self.notes.status(),
            notice: self.notice,
        }
    }

    fn active_topic(&self) -> String {
        self.active_day()
            .map(|day| day.topic.clone())
            .unwrap_or_default()
    }

    async fn finish(&mut self, transition: Transition) -> Transition {
        if transition.moved() {
            self.after_transition().await;
        }
        transition
    }

    async fn after_transition(&mut self) {
        self.read_completion();
        self.reconcile_note().await;
        self.recompute();
        self.remember_position();
    }

    fn read_completion(&mut self) {
        self.completion = self
            .navigator
            .position()
            .map_or(0, |position| self.ledger.get(&position));
    }

    async fn reconcile_note(&mut self) {
        let target = self.navigator.position().and_then(|position| {
            day_at(&self.curriculum, &position.month, position.day_offset).map(|day| NoteTarget {
                day: day.clone(),
                position,
            })
        });
        match target {
            Some(target) => {
                let status = self.notes.load_for_active_position(target).await;
                debug!(
                    "event=note_reconcile module=session status=ok note_status={}",
                    status.label()
                );
            }
            None => self.notes.deactivate(),
        }
    }

    fn recompute(&mut self) {
        let position = self.navigator.position();
        self.snapshot = ProgressSnapshot::compute(
            self.ledger.entries(),
            &self.curriculum,
            self.navigator.month(),
            position.as_ref(),
            self.settings.week_boundary,
        );
    }

    fn remember_position(&self) {
        let Some(position) = self.navigator.position() else {
            return;
        };
        if let Err(err) = self.preferences.save_last_position(&position) {
            warn!("event=last_position_save module=session status=error error={err}");
        }
    }
}
