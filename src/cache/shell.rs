//! Application-side client of the cache controller.

use super::controller::{ControllerEvent, ControllerStatus, FetchOutcome, UpdateCheck};
use super::manifest::ENTRY_POINT;
use super::network::Network;
use super::request::{Request, Response};
use super::worker::WorkerHandle;
use super::{CacheError, CacheResult};
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

/// One open instance of the application.
///
/// Requests the controller does not intercept go to the shell's own network,
/// just as a page would fetch them directly.
pub struct AppShell {
    worker: WorkerHandle,
    events: Receiver<ControllerEvent>,
    /// Events already applied to the shell state but not yet handed out.
    backlog: VecDeque<ControllerEvent>,
    network: Box<dyn Network>,
    update_available: Option<String>,
    needs_reload: bool,
    page: Option<Response>,
}

impl AppShell {
    pub fn connect(worker: WorkerHandle, network: Box<dyn Network>) -> CacheResult<Self> {
        let events = worker.connect()?;
        Ok(Self {
            worker,
            events,
            backlog: VecDeque::new(),
            network,
            update_available: None,
            needs_reload: false,
            page: None,
        })
    }

    fn track(&mut self, event: &ControllerEvent) {
        match event {
            ControllerEvent::UpdateAvailable { version } => {
                self.update_available = Some(version.clone());
            }
            ControllerEvent::UpdateInstalled { .. } => {
                self.update_available = None;
                self.needs_reload = true;
            }
            _ => {}
        }
    }

    /// Applies every event already delivered, keeping them for the caller.
    fn absorb(&mut self) {
        while let Ok(e) = self.events.try_recv() {
            self.track(&e);
            self.backlog.push_back(e);
        }
    }

    /// Drains pending controller events without blocking.
    pub fn poll_events(&mut self) -> Vec<ControllerEvent> {
        self.absorb();
        self.backlog.drain(..).collect()
    }

    /// Blocks up to `timeout` for the next event.
    pub fn wait_event(&mut self, timeout: Duration) -> CacheResult<Option<ControllerEvent>> {
        if let Some(e) = self.backlog.pop_front() {
            return Ok(Some(e));
        }
        match self.events.recv_timeout(timeout) {
            Ok(e) => {
                self.track(&e);
                Ok(Some(e))
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(CacheError::Disconnected),
        }
    }

    pub fn fetch(&self, request: Request) -> CacheResult<Response> {
        match self.worker.fetch(request.clone())? {
            FetchOutcome::Respond(resp) => Ok(resp),
            FetchOutcome::Passthrough => self.network.fetch(&request),
        }
    }

    pub fn check_for_update(&mut self) -> CacheResult<UpdateCheck> {
        let check = self.worker.check_for_update()?;
        self.absorb();
        Ok(check)
    }

    /// Asks the controller to promote the waiting generation. The shell then
    /// needs a reload to be served by it.
    pub fn apply_update(&mut self) -> CacheResult<Option<String>> {
        let promoted = self.worker.skip_waiting()?;
        self.absorb();
        Ok(promoted)
    }

    /// Loads the entry page again, through the controller.
    pub fn reload(&mut self) -> CacheResult<&Response> {
        let page = self.fetch(Request::navigate(ENTRY_POINT))?;
        self.needs_reload = false;
        Ok(self.page.insert(page))
    }

    pub fn status(&self) -> CacheResult<ControllerStatus> {
        self.worker.status()
    }

    pub fn update_available(&self) -> Option<&str> {
        self.update_available.as_deref()
    }

    pub fn needs_reload(&self) -> bool {
        self.needs_reload
    }

    pub fn page(&self) -> Option<&Response> {
        self.page.as_ref()
    }
}
