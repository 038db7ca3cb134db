//! Generation lifecycle and the fetch policy.
//!
//! A generation is installed by fetching every essential asset into memory
//! first; only a complete set is written to its static bucket. The first
//! generation becomes active right away, later ones wait for `skip_waiting`.

use super::generation::{GenerationState, runtime_bucket, static_bucket, whitelist};
use super::manifest::{DEFINITION_PATH, Definition, ENTRY_POINT, is_static_asset};
use super::network::Network;
use super::request::{Destination, Request, Response};
use super::storage::CacheStorage;
use super::{CacheError, CacheResult};
use crate::ui::messages;
use std::sync::mpsc::Sender;

/// Lifecycle notifications broadcast to every connected client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    InstallStarted { version: String },
    /// A new generation is waiting for `skip-waiting`.
    UpdateAvailable { version: String },
    /// Sent only once the new generation is active and old buckets are gone.
    UpdateInstalled { version: String },
    InstallFailed { version: String, reason: String },
    /// The first generation is active: the app now works offline.
    OfflineReady { version: String },
}

impl ControllerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ControllerEvent::InstallStarted { .. } => "install-started",
            ControllerEvent::UpdateAvailable { .. } => "update-available",
            ControllerEvent::UpdateInstalled { .. } => "update-installed",
            ControllerEvent::InstallFailed { .. } => "install-failed",
            ControllerEvent::OfflineReady { .. } => "offline-ready",
        }
    }

    pub fn version(&self) -> &str {
        match self {
            ControllerEvent::InstallStarted { version }
            | ControllerEvent::UpdateAvailable { version }
            | ControllerEvent::UpdateInstalled { version }
            | ControllerEvent::InstallFailed { version, .. }
            | ControllerEvent::OfflineReady { version } => version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not intercepted: the caller performs a normal network request.
    Passthrough,
    Respond(Response),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    UpToDate,
    Waiting(String),
    Activated(String),
    Failed(String),
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketInfo {
    pub name: String,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerStatus {
    pub origin: String,
    pub active: Option<String>,
    pub waiting: Option<String>,
    pub installing: Option<String>,
    pub buckets: Vec<BucketInfo>,
}

impl ControllerStatus {
    pub fn state_of(&self, version: &str) -> GenerationState {
        if self.installing.as_deref() == Some(version) {
            GenerationState::Installing
        } else if self.waiting.as_deref() == Some(version) {
            GenerationState::Waiting
        } else if self.active.as_deref() == Some(version) {
            GenerationState::Active
        } else {
            GenerationState::Redundant
        }
    }
}

pub struct CacheController {
    storage: CacheStorage,
    network: Box<dyn Network>,
    prefix: String,
    installing: Option<String>,
    clients: Vec<Sender<ControllerEvent>>,
}

impl CacheController {
    pub fn new(storage: CacheStorage, network: Box<dyn Network>, prefix: &str) -> Self {
        Self {
            storage,
            network,
            prefix: prefix.to_string(),
            installing: None,
            clients: Vec::new(),
        }
    }

    pub fn connect(&mut self, client: Sender<ControllerEvent>) {
        self.clients.push(client);
    }

    /// Sends to every client; disconnected ones are dropped.
    fn emit(&mut self, event: ControllerEvent) {
        self.clients.retain(|c| c.send(event.clone()).is_ok());
    }

    pub fn active_version(&self) -> CacheResult<Option<String>> {
        self.storage.active_version()
    }

    pub fn waiting_version(&self) -> CacheResult<Option<String>> {
        self.storage.waiting_version()
    }

    /// Installs `def` as a new generation.
    ///
    /// Any failed or non-200 essential fetch aborts the attempt and nothing
    /// is published. Returns the state the generation reached.
    pub fn install(&mut self, def: &Definition) -> CacheResult<GenerationState> {
        let version = def.version.clone();
        self.installing = Some(version.clone());
        self.emit(ControllerEvent::InstallStarted {
            version: version.clone(),
        });

        match self.populate(def) {
            Ok(()) => {}
            Err(reason) => {
                self.installing = None;
                self.emit(ControllerEvent::InstallFailed {
                    version: version.clone(),
                    reason: reason.clone(),
                });
                return Err(CacheError::InstallFailed { version, reason });
            }
        }
        self.installing = None;

        if self.storage.active_version()?.is_none() {
            self.activate(&version)?;
            self.emit(ControllerEvent::OfflineReady { version });
            return Ok(GenerationState::Active);
        }

        // A newer install replaces a generation that was still waiting.
        if let Some(old) = self.storage.waiting_version()?
            && old != version
        {
            self.storage.delete_bucket(&static_bucket(&self.prefix, &old))?;
            self.storage.delete_bucket(&runtime_bucket(&self.prefix, &old))?;
        }
        self.storage.set_waiting(Some(&version))?;
        self.emit(ControllerEvent::UpdateAvailable { version });
        Ok(GenerationState::Waiting)
    }

    fn populate(&mut self, def: &Definition) -> Result<(), String> {
        let mut fetched = Vec::new();
        for asset in def.essential_assets() {
            match self.network.fetch(&Request::get(&asset)) {
                Ok(resp) if resp.is_ok() => fetched.push((asset, resp)),
                Ok(resp) => return Err(format!("{} answered {}", asset, resp.status)),
                Err(e) => return Err(format!("{}: {}", asset, e)),
            }
        }

        let bucket = static_bucket(&self.prefix, &def.version);
        if let Err(e) = self.storage.put_all(&bucket, &fetched) {
            return Err(format!("could not store assets: {}", e));
        }
        Ok(())
    }

    /// Makes `version` the active generation and deletes every bucket outside
    /// its whitelist. Returns the deleted bucket names.
    fn activate(&mut self, version: &str) -> CacheResult<Vec<String>> {
        self.storage.promote(version)?;
        self.storage.retain_buckets(&whitelist(&self.prefix, version))
    }

    /// Promotes the waiting generation. `None` when nothing is waiting.
    pub fn skip_waiting(&mut self) -> CacheResult<Option<String>> {
        let Some(version) = self.storage.waiting_version()? else {
            return Ok(None);
        };
        self.activate(&version)?;
        self.emit(ControllerEvent::UpdateInstalled {
            version: version.clone(),
        });
        Ok(Some(version))
    }

    /// Re-fetches the definition file and installs it if its tag is new.
    pub fn check_for_update(&mut self) -> CacheResult<UpdateCheck> {
        let resp = match self.network.fetch(&Request::get(DEFINITION_PATH)) {
            Ok(r) if r.is_ok() => r,
            Ok(r) => {
                return Ok(UpdateCheck::Unreachable(format!(
                    "{} answered {}",
                    DEFINITION_PATH, r.status
                )));
            }
            Err(e) => return Ok(UpdateCheck::Unreachable(e.to_string())),
        };

        let def = match Definition::parse(&resp.body) {
            Ok(d) => d,
            Err(e) => return Ok(UpdateCheck::Failed(e.to_string())),
        };

        if self.storage.active_version()?.as_deref() == Some(def.version.as_str()) {
            return Ok(UpdateCheck::UpToDate);
        }
        if self.storage.waiting_version()?.as_deref() == Some(def.version.as_str()) {
            return Ok(UpdateCheck::Waiting(def.version));
        }

        match self.install(&def) {
            Ok(GenerationState::Active) => Ok(UpdateCheck::Activated(def.version)),
            Ok(_) => Ok(UpdateCheck::Waiting(def.version)),
            Err(CacheError::InstallFailed { reason, .. }) => Ok(UpdateCheck::Failed(reason)),
            Err(e) => Err(e),
        }
    }

    /// Cache-first with network fallback.
    pub fn handle_fetch(&mut self, req: &Request) -> FetchOutcome {
        if !req.is_get() {
            return FetchOutcome::Passthrough;
        }
        let Some(path) = req.same_origin_path(self.network.origin()) else {
            return FetchOutcome::Passthrough;
        };
        // No active generation means no page is controlled yet.
        let Ok(Some(active)) = self.storage.active_version() else {
            return FetchOutcome::Passthrough;
        };
        let key = path.split('#').next().unwrap_or("/").to_string();
        let buckets = whitelist(&self.prefix, &active);

        // A failed cache read falls through to the network.
        if let Ok(Some(hit)) = self.storage.match_any(&buckets, &key) {
            return FetchOutcome::Respond(hit);
        }

        match self.network.fetch(req) {
            Ok(resp) => {
                if resp.is_cacheable() {
                    let bucket = if is_static_asset(&key) {
                        static_bucket(&self.prefix, &active)
                    } else {
                        runtime_bucket(&self.prefix, &active)
                    };
                    if let Err(e) = self.storage.put(&bucket, &key, &resp) {
                        messages::warning(format!("Could not cache {}: {}", key, e));
                    }
                }
                FetchOutcome::Respond(resp)
            }
            Err(_) if req.destination == Destination::Document => {
                match self.storage.match_any(&buckets, ENTRY_POINT) {
                    Ok(Some(shell)) => FetchOutcome::Respond(shell),
                    _ => FetchOutcome::Respond(Response::offline()),
                }
            }
            Err(_) => FetchOutcome::Respond(Response::offline()),
        }
    }

    pub fn status(&self) -> CacheResult<ControllerStatus> {
        let mut buckets = Vec::new();
        for name in self.storage.bucket_names()? {
            let entries = self.storage.keys(&name)?.len();
            buckets.push(BucketInfo { name, entries });
        }
        Ok(ControllerStatus {
            origin: self.network.origin().to_string(),
            active: self.storage.active_version()?,
            waiting: self.storage.waiting_version()?,
            installing: self.installing.clone(),
            buckets,
        })
    }
}
