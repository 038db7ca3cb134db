//! Offline cache and update controller.
//!
//! The controller runs on its own thread ([`worker`]) and owns the cache
//! storage. Application clients ([`shell::AppShell`]) reach it only through
//! channels: commands in, lifecycle events out.

pub mod controller;
pub mod generation;
pub mod manifest;
pub mod network;
pub mod request;
pub mod shell;
pub mod storage;
pub mod worker;

pub use controller::{CacheController, ControllerEvent, ControllerStatus, FetchOutcome, UpdateCheck};
pub use generation::GenerationState;
pub use manifest::Definition;
pub use network::{DirOrigin, HttpOrigin, Network, OfflineNetwork};
pub use request::{Destination, Request, Response, ResponseKind};
pub use shell::AppShell;
pub use storage::CacheStorage;
pub use worker::{CacheWorker, WorkerHandle};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("install of generation '{version}' failed: {reason}")]
    InstallFailed { version: String, reason: String },

    #[error("invalid definition file: {0}")]
    Definition(String),

    #[error("cache controller is not running")]
    Disconnected,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;
