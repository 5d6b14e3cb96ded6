//! Curriculum fetch with last-known-good fallback.
//!
//! # Responsibility
//! - Fetch the hierarchy from the remote provider.
//! - Keep the last successful hierarchy in local state.
//! - Degrade to the cached copy, then to an empty hierarchy.
//!
//! # Invariants
//! - Loading never fails; every failure maps to a `CurriculumSource` variant.

use crate::model::curriculum::Curriculum;
use crate::repo::state_repo::{StateRepository, CACHED_CURRICULUM_KEY};
use crate::transport::TransportResult;
use async_trait::async_trait;
use log::{info, warn};

/// Message shown when no hierarchy is available at all.
pub const CONTENT_UNAVAILABLE_MESSAGE: &str = "Error loading data.";

/// Read-only remote supplier of the hierarchy.
#[async_trait]
pub trait CurriculumProvider: Send + Sync {
    async fn fetch_curriculum(&self) -> TransportResult<Curriculum>;
}

/// Where the hierarchy in use came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurriculumSource {
    /// Fetched from the provider in this run.
    Fresh(Curriculum),
    /// Provider failed; last cached copy in use.
    Cached(Curriculum),
    /// Provider failed and no usable cache exists.
    Unavailable(String),
}

impl CurriculumSource {
    /// Hierarchy to drive the session with; empty when unavailable.
    pub fn into_curriculum(self) -> Curriculum {
        match self {
            Self::Fresh(curriculum) | Self::Cached(curriculum) => curriculum,
            Self::Unavailable(_) => Curriculum::default(),
        }
    }

    /// Visible notice for degraded sources.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Fresh(_) => None,
            Self::Cached(_) => Some("Using cached roadmap data"),
            Self::Unavailable(_) => Some(CONTENT_UNAVAILABLE_MESSAGE),
        }
    }
}

/// Fetches the hierarchy, caching it on success and falling back on failure.
pub async fn load_curriculum<P, R>(provider: &P, repo: &R) -> CurriculumSource
where
    P: CurriculumProvider + ?Sized,
    R: StateRepository + ?Sized,
{
    match provider.fetch_curriculum().await {
        Ok(curriculum) => {
            match curriculum.to_json() {
                Ok(raw) => {
                    if let Err(err) = repo.put_value(CACHED_CURRICULUM_KEY, &raw) {
                        warn!(
                            "event=curriculum_cache_write module=curriculum status=error error={}",
                            err
                        );
                    }
                }
                Err(err) => warn!(
                    "event=curriculum_cache_write module=curriculum status=error error={}",
                    err
                ),
            }
            info!(
                "event=curriculum_load module=curriculum status=ok source=remote months={}",
                curriculum.months.len()
            );
            CurriculumSource::Fresh(curriculum)
        }
        Err(fetch_err) => {
            warn!(
                "event=curriculum_load module=curriculum status=error source=remote error={}",
                fetch_err
            );
            match read_cached(repo) {
                Some(curriculum) => {
                    info!(
                        "event=curriculum_load module=curriculum status=ok source=cache months={}",
                        curriculum.months.len()
                    );
                    CurriculumSource::Cached(curriculum)
                }
                None => CurriculumSource::Unavailable(fetch_err.to_string()),
            }
        }
    }
}

fn read_cached<R: StateRepository + ?Sized>(repo: &R) -> Option<Curriculum> {
    let raw = match repo.get_value(CACHED_CURRICULUM_KEY) {
        Ok(value) => value?,
        Err(err) => {
            warn!(
                "event=curriculum_cache_read module=curriculum status=error error={}",
                err
            );
            return None;
        }
    };
    match Curriculum::from_json(&raw) {
        Ok(curriculum) => Some(curriculum),
        Err(err) => {
            warn!(
                "event=curriculum_cache_read module=curriculum status=error error_code=corrupt_cache error={}",
                err
            );
            None
        }
    }
}
