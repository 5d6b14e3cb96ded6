//! Core domain logic for the curriculum roadmap tracker.
//! This crate is the single source of truth for navigation, progress and
//! note-sync invariants.

pub mod api;
pub mod assistant;
pub mod cache;
pub mod config;
pub mod curriculum;
pub mod db;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod notes;
pub mod preferences;
pub mod repo;
pub mod session;
pub mod text;
pub mod transport;

pub use api::ApiClient;
pub use cache::{OfflineCache, SqliteCacheStorage};
pub use config::{ConfigError, CoreConfig};
pub use curriculum::provider::{load_curriculum, CurriculumSource};
pub use ledger::{ClearScope, ProgressLedger, ProgressSnapshot, WeekBoundary};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::curriculum::{Curriculum, Day, Month, Week};
pub use model::position::Position;
pub use navigation::{Navigator, StepDirection, Transition};
pub use notes::{NoteStatus, NoteSynchronizer};
pub use repo::state_repo::{RepoError, RepoResult, SqliteStateRepository, StateRepository};
pub use session::{DayView, RoadmapSession, SessionError, SessionServices, SessionSettings};
pub use transport::{HttpTransport, Transport};
