//! Generation lifecycle and cache-first fetch interception.
//!
//! # Responsibility
//! - Install a manifest into a generation-named store in one commit.
//! - Activate the generation by purging every other store, either
//!   explicitly or at startup once it is installed.
//! - Decorate a `Transport` with cache-first lookups once active.
//!
//! # Invariants
//! - Only `GET` responses with status 200 are stored.
//! - Network failures propagate unmodified when nothing is cached.
//! - Storage failures during interception never fail the request.

use super::storage::{CacheError, CacheResult, CacheStorage};
use crate::transport::{Method, Request, Response, Transport, TransportError, TransportResult};
use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, info, warn};
use parking_lot::Mutex;

/// What a generation caches and which requests it never touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    pub generation: String,
    /// Absolute URLs fetched during install.
    pub manifest: Vec<String>,
    /// Path prefixes that always go to the network.
    pub network_only_prefixes: Vec<String>,
}

impl CachePolicy {
    /// Resolves relative manifest entries against `origin`.
    pub fn new(
        generation: impl Into<String>,
        origin: &str,
        manifest: &[String],
        network_only_prefixes: Vec<String>,
    ) -> Self {
        let origin = origin.trim_end_matches('/');
        let manifest = manifest
            .iter()
            .map(|entry| {
                if entry.contains("://") {
                    entry.clone()
                } else {
                    format!("{origin}/{}", entry.trim_start_matches('/'))
                }
            })
            .collect();
        Self {
            generation: generation.into(),
            manifest,
            network_only_prefixes,
        }
    }

    /// Whether `request` bypasses the cache entirely.
    pub fn bypasses_cache(&self, request: &Request) -> bool {
        if request.method != Method::Get {
            return true;
        }
        let path = request.path();
        self.network_only_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Lifecycle state of the configured generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    /// No store exists for the generation.
    New,
    /// Store populated; older generations may still exist.
    Installed,
    /// Sole surviving store; serves intercepted requests.
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub generation: String,
    pub stored: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    pub generation: String,
    pub purged: Vec<String>,
}

/// Cache-first decorator over a network transport.
pub struct OfflineCache<N, S> {
    network: N,
    storage: S,
    policy: CachePolicy,
    state: Mutex<GenerationState>,
}

impl<N, S> OfflineCache<N, S>
where
    N: Transport,
    S: CacheStorage,
{
    /// Wraps `network`, deriving the starting state from existing stores.
    pub fn new(network: N, storage: S, policy: CachePolicy) -> CacheResult<Self> {
        let names = storage.store_names()?;
        let state = if !names.iter().any(|name| *name == policy.generation) {
            GenerationState::New
        } else if names.len() == 1 {
            GenerationState::Active
        } else {
            GenerationState::Installed
        };
        debug!(
            "event=cache_open module=cache status=ok generation={} state={:?} stores={}",
            policy.generation,
            state,
            names.len()
        );
        Ok(Self {
            network,
            storage,
            policy,
            state: Mutex::new(state),
        })
    }

    pub fn state(&self) -> GenerationState {
        *self.state.lock()
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Fetches every manifest entry and stores them in one commit.
    ///
    /// Any failed or non-200 entry aborts the install without writing.
    pub async fn install(&self) -> CacheResult<InstallReport> {
        info!(
            "event=cache_install module=cache status=start generation={} entries={}",
            self.policy.generation,
            self.policy.manifest.len()
        );
        let requests: Vec<Request> = self.policy.manifest.iter().map(Request::get).collect();
        let results = join_all(requests.iter().map(|request| self.network.fetch(request))).await;

        let mut entries = Vec::with_capacity(requests.len());
        for (request, result) in requests.iter().zip(results) {
            let fetched = result.and_then(|response| {
                if response.is_ok() {
                    Ok(response)
                } else {
                    Err(TransportError::Status {
                        url: request.url.clone(),
                        status: response.status,
                    })
                }
            });
            match fetched {
                Ok(response) => entries.push((request.cache_key(), response)),
                Err(source) => {
                    warn!(
                        "event=cache_install module=cache status=error generation={} url={} error={}",
                        self.policy.generation, request.url, source
                    );
                    return Err(CacheError::Fetch {
                        url: request.url.clone(),
                        source,
                    });
                }
            }
        }

        self.storage.put_all(&self.policy.generation, &entries)?;
        let mut state = self.state.lock();
        if *state == GenerationState::New {
            *state = GenerationState::Installed;
        }
        info!(
            "event=cache_install module=cache status=ok generation={} stored={}",
            self.policy.generation,
            entries.len()
        );
        Ok(InstallReport {
            generation: self.policy.generation.clone(),
            stored: entries.len(),
        })
    }

    /// Activates an installed generation that is not active yet.
    ///
    /// `None` when the generation is missing or already active.
    pub fn activate_if_installed(&self) -> CacheResult<Option<ActivationReport>> {
        if self.state() != GenerationState::Installed {
            return Ok(None);
        }
        self.activate().map(Some)
    }

    /// Deletes every store other than the configured generation.
    pub fn activate(&self) -> CacheResult<ActivationReport> {
        if self.state() == GenerationState::New {
            return Err(CacheError::NotInstalled(self.policy.generation.clone()));
        }
        let mut purged = Vec::new();
        for name in self.storage.store_names()? {
            if name != self.policy.generation && self.storage.delete_store(&name)? {
                purged.push(name);
            }
        }
        *self.state.lock() = GenerationState::Active;
        info!(
            "event=cache_activate module=cache status=ok generation={} purged={}",
            self.policy.generation,
            purged.len()
        );
        Ok(ActivationReport {
            generation: self.policy.generation.clone(),
            purged,
        })
    }

    fn cached(&self, request_key: &str) -> Option<Response> {
        match self.storage.lookup(&self.policy.generation, request_key) {
            Ok(found) => found,
            Err(err) => {
                warn!(
                    "event=cache_lookup module=cache status=error generation={} error={}",
                    self.policy.generation, err
                );
                None
            }
        }
    }

    fn populate(&self, request_key: &str, response: &Response) {
        if let Err(err) = self
            .storage
            .put(&self.policy.generation, request_key, response)
        {
            warn!(
                "event=cache_populate module=cache status=error generation={} error={}",
                self.policy.generation, err
            );
        }
    }
}

#[async_trait]
impl<N, S> Transport for OfflineCache<N, S>
where
    N: Transport,
    S: CacheStorage,
{
    async fn fetch(&self, request: &Request) -> TransportResult<Response> {
        if self.state() != GenerationState::Active || self.policy.bypasses_cache(request) {
            return self.network.fetch(request).await;
        }

        let request_key = request.cache_key();
        if let Some(response) = self.cached(&request_key) {
            debug!(
                "event=cache_lookup module=cache status=ok outcome=hit generation={}",
                self.policy.generation
            );
            return Ok(response);
        }

        let response = self.network.fetch(request).await?;
        if response.is_ok() {
            self.populate(&request_key, &response);
        }
        Ok(response)
    }
}
