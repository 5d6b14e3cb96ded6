//! Runtime configuration loaded from TOML.
//!
//! # Invariants
//! - Every field has a default; an empty document is a valid config.
//! - `CoreConfig::validate` runs before any component is built from it.

use crate::api::DEFAULT_API_BASE;
use crate::cache::CachePolicy;
use crate::ledger::WeekBoundary;
use crate::notes::NoteSettings;
use crate::session::SessionSettings;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CACHE_GENERATION: &str = "cyber-roadmap-v1";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub api_base: String,
    /// SQLite file; an in-memory database is used when absent.
    pub database_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute log directory; file logging is off when absent.
    pub log_dir: Option<String>,
    pub notes: NotesConfig,
    pub progress: ProgressConfig,
    pub cache: CacheConfig,
    pub http: HttpConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            database_path: None,
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            notes: NotesConfig::default(),
            progress: ProgressConfig::default(),
            cache: CacheConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotesConfig {
    pub char_budget: usize,
    pub display_budget: usize,
    pub autosave_debounce_ms: u64,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            char_budget: 100,
            display_budget: 100,
            autosave_debounce_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressConfig {
    pub week_boundary: WeekBoundary,
    /// Start at the last visited position instead of today's.
    pub resume_last_position: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub generation: String,
    pub manifest: Vec<String>,
    pub network_only_prefixes: Vec<String>,
    /// Origin for relative manifest entries; `api_base` when absent.
    pub asset_origin: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            generation: DEFAULT_CACHE_GENERATION.to_string(),
            manifest: [
                "/",
                "/index.html",
                "/style.css",
                "/script.js",
                "https://www.x.ai/favicon.ico",
            ]
            .iter()
            .map(|entry| entry.to_string())
            .collect(),
            network_only_prefixes: vec!["/api/notes/".to_string(), "/api/ask".to_string()],
            asset_origin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl CoreConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base cannot be empty".to_string()));
        }
        if self.notes.char_budget == 0 || self.notes.display_budget == 0 {
            return Err(ConfigError::Invalid(
                "note budgets must be greater than zero".to_string(),
            ));
        }
        if self.cache.generation.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "cache.generation cannot be empty".to_string(),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "http.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(dir) = self.log_dir.as_deref() {
            if !Path::new(dir.trim()).is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{dir}`"
                )));
            }
        }
        Ok(())
    }

    pub fn note_settings(&self) -> NoteSettings {
        NoteSettings {
            char_budget: self.notes.char_budget,
            display_budget: self.notes.display_budget,
            autosave_delay: Duration::from_millis(self.notes.autosave_debounce_ms),
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            week_boundary: self.progress.week_boundary,
            resume_last_position: self.progress.resume_last_position,
        }
    }

    pub fn cache_policy(&self) -> CachePolicy {
        let origin = self.cache.asset_origin.as_deref().unwrap_or(&self.api_base);
        CachePolicy::new(
            self.cache.generation.clone(),
            origin,
            &self.cache.manifest,
            self.cache.network_only_prefixes.clone(),
        )
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}
