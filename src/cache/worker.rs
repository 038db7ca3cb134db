//! The controller's own thread.
//!
//! Clients never touch the controller directly: they hold a [`WorkerHandle`]
//! and exchange commands and replies over channels.

use super::controller::{CacheController, ControllerEvent, ControllerStatus, FetchOutcome, UpdateCheck};
use super::request::Request;
use super::{CacheError, CacheResult};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

pub enum Command {
    Connect {
        events: Sender<ControllerEvent>,
        ack: Sender<()>,
    },
    Fetch {
        request: Request,
        reply: Sender<FetchOutcome>,
    },
    CheckForUpdate {
        reply: Sender<CacheResult<UpdateCheck>>,
    },
    SkipWaiting {
        reply: Sender<CacheResult<Option<String>>>,
    },
    Status {
        reply: Sender<CacheResult<ControllerStatus>>,
    },
    Shutdown,
}

/// Cloneable entry point to a running controller.
#[derive(Clone)]
pub struct WorkerHandle {
    tx: Sender<Command>,
}

impl WorkerHandle {
    fn call<T>(&self, make: impl FnOnce(Sender<T>) -> Command) -> CacheResult<T> {
        let (reply, rx) = mpsc::channel();
        self.tx.send(make(reply)).map_err(|_| CacheError::Disconnected)?;
        rx.recv().map_err(|_| CacheError::Disconnected)
    }

    /// Registers a new client and returns its event stream. Events sent after
    /// this returns are guaranteed to reach the receiver.
    pub fn connect(&self) -> CacheResult<Receiver<ControllerEvent>> {
        let (events, rx) = mpsc::channel();
        self.call(|ack| Command::Connect { events, ack })?;
        Ok(rx)
    }

    pub fn fetch(&self, request: Request) -> CacheResult<FetchOutcome> {
        self.call(|reply| Command::Fetch { request, reply })
    }

    pub fn check_for_update(&self) -> CacheResult<UpdateCheck> {
        self.call(|reply| Command::CheckForUpdate { reply })?
    }

    pub fn skip_waiting(&self) -> CacheResult<Option<String>> {
        self.call(|reply| Command::SkipWaiting { reply })?
    }

    pub fn status(&self) -> CacheResult<ControllerStatus> {
        self.call(|reply| Command::Status { reply })?
    }
}

pub struct CacheWorker {
    handle: WorkerHandle,
    thread: Option<JoinHandle<()>>,
}

impl CacheWorker {
    /// Moves `controller` onto a new thread that serves commands until
    /// `Shutdown` or until every handle is dropped.
    pub fn spawn(mut controller: CacheController) -> Self {
        let (tx, rx) = mpsc::channel::<Command>();

        let thread = thread::spawn(move || {
            while let Ok(cmd) = rx.recv() {
                match cmd {
                    Command::Connect { events, ack } => {
                        controller.connect(events);
                        let _ = ack.send(());
                    }
                    Command::Fetch { request, reply } => {
                        let _ = reply.send(controller.handle_fetch(&request));
                    }
                    Command::CheckForUpdate { reply } => {
                        let _ = reply.send(controller.check_for_update());
                    }
                    Command::SkipWaiting { reply } => {
                        let _ = reply.send(controller.skip_waiting());
                    }
                    Command::Status { reply } => {
                        let _ = reply.send(controller.status());
                    }
                    Command::Shutdown => break,
                }
            }
        });

        Self {
            handle: WorkerHandle { tx },
            thread: Some(thread),
        }
    }

    pub fn handle(&self) -> WorkerHandle {
        self.handle.clone()
    }
}

impl Drop for CacheWorker {
    fn drop(&mut self) {
        let _ = self.handle.tx.send(Command::Shutdown);
        if let Some(t) = self.thread.take() {
            let _ = t.join();
        }
    }
}
