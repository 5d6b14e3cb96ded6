//! Draft buffering, write-through and reconciliation for day notes.

use crate::model::curriculum::Day;
use crate::model::position::Position;
use crate::notes::debounce::Debouncer;
use crate::notes::identifier::{save_title, select_latest, strip_record_header};
use crate::notes::store::{AutosaveRequest, NoteStore, SaveNoteRequest};
use crate::text::{is_blank, truncate_chars};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Note state shown next to the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteStatus {
    /// No remote record for the active day (or its load failed).
    NotSaved,
    /// Draft reflects the latest remote record.
    Loaded,
    /// Explicit save succeeded.
    Saved,
    /// Explicit save failed; no retry is scheduled.
    Failed,
    /// Explicit save was requested with nothing to save.
    Empty,
}

impl NoteStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::NotSaved => "Not saved",
            Self::Loaded => "Loaded",
            Self::Saved => "Saved",
            Self::Failed => "Failed",
            Self::Empty => "Empty.",
        }
    }
}

/// Budgets and timing for note handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSettings {
    /// Maximum characters kept in the draft and sent remotely.
    pub char_budget: usize,
    /// Maximum characters of a loaded record shown as the draft.
    pub display_budget: usize,
    /// Idle window before an edit is autosaved.
    pub autosave_delay: Duration,
}

impl Default for NoteSettings {
    fn default() -> Self {
        Self {
            char_budget: 100,
            display_budget: 100,
            autosave_delay: Duration::from_millis(500),
        }
    }
}

/// Day a note belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTarget {
    pub position: Position,
    pub day: Day,
}

/// Identity of one reconciliation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    position: Position,
}

impl LoadTicket {
    pub fn position(&self) -> &Position {
        &self.position
    }
}

/// Result of looking up the latest remote record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Author content of the latest record, header stripped and truncated.
    Found(String),
    /// No record matches the day.
    Missing,
    /// Listing or reading failed.
    Failed(String),
}

/// Owner of the draft for the active day.
pub struct NoteSynchronizer {
    store: Arc<dyn NoteStore>,
    settings: NoteSettings,
    active: Option<NoteTarget>,
    draft: String,
    status: NoteStatus,
    generation: u64,
    debouncer: Debouncer,
    write_slot: Arc<Mutex<()>>,
}

impl NoteSynchronizer {
    pub fn new(store: Arc<dyn NoteStore>, settings: NoteSettings) -> Self {
        let debouncer = Debouncer::new(settings.autosave_delay);
        Self {
            store,
            settings,
            active: None,
            draft: String::new(),
            status: NoteStatus::NotSaved,
            generation: 0,
            debouncer,
            write_slot: Arc::new(Mutex::new(())),
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn status(&self) -> NoteStatus {
        self.status
    }

    pub fn active(&self) -> Option<&NoteTarget> {
        self.active.as_ref()
    }

    pub fn settings(&self) -> &NoteSettings {
        &self.settings
    }

    /// Store handle for running `fetch_latest_note` outside `&mut self`.
    pub fn store(&self) -> Arc<dyn NoteStore> {
        Arc::clone(&self.store)
    }

    pub fn has_pending_autosave(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Makes `target` active and clears the draft until its load applies.
    pub fn begin_load(&mut self, target: NoteTarget) -> LoadTicket {
        self.generation += 1;
        self.draft.clear();
        self.status = NoteStatus::NotSaved;
        let ticket = LoadTicket {
            generation: self.generation,
            position: target.position.clone(),
        };
        self.active = Some(target);
        ticket
    }

    /// Drops the active day (the active month has no days).
    pub fn deactivate(&mut self) {
        self.generation += 1;
        self.active = None;
        self.draft.clear();
        self.status = NoteStatus::NotSaved;
    }

    /// Applies `outcome` if `ticket` still names the active load.
    ///
    /// Returns `false` for stale results, which are discarded.
    pub fn apply_load(&mut self, ticket: &LoadTicket, outcome: LoadOutcome) -> bool {
        let is_current = ticket.generation == self.generation
            && self
                .active
                .as_ref()
                .is_some_and(|target| target.position == ticket.position);
        if !is_current {
            debug!(
                "event=note_load module=notes status=skipped reason=stale_position month={} day={}",
                ticket.position.month,
                ticket.position.day_number()
            );
            return false;
        }

        match outcome {
            LoadOutcome::Found(content) => {
                self.draft = content;
                self.status = NoteStatus::Loaded;
            }
            LoadOutcome::Missing => {
                self.draft.clear();
                self.status = NoteStatus::NotSaved;
            }
            LoadOutcome::Failed(error) => {
                warn!(
                    "event=note_load module=notes status=error month={} day={} error={}",
                    ticket.position.month,
                    ticket.position.day_number(),
                    error
                );
                self.draft.clear();
                self.status = NoteStatus::NotSaved;
            }
        }
        true
    }

    /// Loads the latest remote record for `target` and makes it the draft.
    pub async fn load_for_active_position(&mut self, target: NoteTarget) -> NoteStatus {
        let ticket = self.begin_load(target);
        let outcome = fetch_latest_note(
            self.store.as_ref(),
            ticket.position(),
            self.settings.display_budget,
        )
        .await;
        self.apply_load(&ticket, outcome);
        self.status
    }

    /// Replaces the draft and reschedules the debounced autosave.
    ///
    /// Returns whether an autosave was scheduled. Blank drafts and drafts
    /// without an active day are not autosaved.
    pub fn edit(&mut self, content: &str) -> bool {
        self.draft = truncate_chars(content, self.settings.char_budget);
        let Some(target) = self.active.as_ref() else {
            return false;
        };
        if is_blank(&self.draft) {
            self.debouncer.cancel();
            return false;
        }

        let request = AutosaveRequest {
            month: target.position.month.clone(),
            title: target.day.title.clone(),
            content: self.draft.clone(),
        };
        let store = Arc::clone(&self.store);
        let slot = Arc::clone(&self.write_slot);
        self.debouncer.schedule(async move {
            let _slot = slot.lock().await;
            match store.autosave(&request).await {
                Ok(()) => debug!(
                    "event=note_autosave module=notes status=ok month={} chars={}",
                    request.month,
                    request.content.chars().count()
                ),
                Err(err) => warn!(
                    "event=note_autosave module=notes status=error month={} error={}",
                    request.month, err
                ),
            }
        })
    }

    /// Saves `content` for the active day immediately.
    pub async fn save_now(&mut self, content: &str) -> NoteStatus {
        self.draft = truncate_chars(content, self.settings.char_budget);
        let payload = truncate_chars(content.trim(), self.settings.char_budget);
        let target = match self.active.as_ref() {
            Some(target) if !payload.is_empty() => target,
            _ => {
                self.status = NoteStatus::Empty;
                return self.status;
            }
        };

        let request = SaveNoteRequest {
            month: target.position.month.clone(),
            day: target.position.padded_day(),
            title: save_title(&target.day),
            content: payload,
        };
        let result = {
            let _slot = self.write_slot.lock().await;
            self.store.save(&request).await
        };
        self.status = match result {
            Ok(()) => {
                info!(
                    "event=note_save module=notes status=ok month={} day={} chars={}",
                    request.month,
                    request.day,
                    request.content.chars().count()
                );
                NoteStatus::Saved
            }
            Err(err) => {
                warn!(
                    "event=note_save module=notes status=error month={} day={} error={}",
                    request.month, request.day, err
                );
                NoteStatus::Failed
            }
        };
        self.status
    }
}

/// Lists `position`'s month, picks the latest matching record and reads it.
pub async fn fetch_latest_note(
    store: &dyn NoteStore,
    position: &Position,
    display_budget: usize,
) -> LoadOutcome {
    let identifiers = match store.list(&position.month).await {
        Ok(identifiers) => identifiers,
        Err(err) => return LoadOutcome::Failed(err.to_string()),
    };
    let Some(latest) = select_latest(&identifiers, position) else {
        return LoadOutcome::Missing;
    };
    match store.read(&position.month, latest).await {
        Ok(content) => LoadOutcome::Found(truncate_chars(
            strip_record_header(&content),
            display_budget,
        )),
        Err(err) => LoadOutcome::Failed(err.to_string()),
    }
}
