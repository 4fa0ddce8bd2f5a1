//! Lock-guarded engine handle for multi-threaded hosts.
//!
//! When answers arrive on request threads and the round timer is driven by
//! a background thread, `SharedEngine` is the single serialising boundary:
//! every entry point takes the engine mutex, so a last-instant answer and
//! the expiry tick are applied one after the other, never interleaved.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::engine::events::MatchEvent;
use crate::engine::machine::{MatchEngine, MatchState, Submission};
use crate::error::Result;
use crate::types::{Answer, MatchResults};

#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<MatchEngine>>,
}

impl SharedEngine {
    pub fn new(engine: MatchEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    // Poison is ignored: engine mutations are validated before they apply.
    fn lock(&self) -> MutexGuard<'_, MatchEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start(&self) -> Result<()> {
        self.lock().start()
    }

    pub fn submit_answer(&self, participant_id: &str, answer: Answer) -> Result<Submission> {
        self.lock().submit_answer(participant_id, answer)
    }

    pub fn tick(&self) -> Result<bool> {
        self.lock().tick()
    }

    pub fn state(&self) -> MatchState {
        self.lock().state()
    }

    pub fn drain_events(&self) -> Vec<MatchEvent> {
        self.lock().drain_events()
    }

    /// Snapshot of the final results.
    pub fn results(&self) -> Result<MatchResults> {
        self.lock().results().cloned()
    }

    /// Run a read-only closure against the engine.
    pub fn with<R>(&self, f: impl FnOnce(&MatchEngine) -> R) -> R {
        f(&self.lock())
    }

    /// Tick the engine every `interval` on a background thread and forward
    /// all queued events to `sink`.
    ///
    /// The thread exits when the match completes, when `sink` is closed, or
    /// when the returned [`Ticker`] is stopped or dropped. While a ticker is
    /// attached it is the consumer of the event queue.
    pub fn spawn_ticker(&self, interval: Duration, sink: Sender<MatchEvent>) -> Ticker {
        let stop = Arc::new(AtomicBool::new(false));
        let engine = self.clone();
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::Acquire) {
                let finished = {
                    let mut guard = engine.lock();
                    if let Err(e) = guard.tick() {
                        warn!("tick failed: {e}");
                    }
                    for event in guard.drain_events() {
                        if sink.send(event).is_err() {
                            debug!("event sink closed, ticker exiting");
                            return;
                        }
                    }
                    guard.state() == MatchState::Completed
                };
                if finished {
                    return;
                }
                thread::sleep(interval);
            }
        });

        Ticker {
            stop,
            handle: Some(handle),
        }
    }
}

/// Handle to a background ticker; stops and joins on drop.
#[derive(Debug)]
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn stop(mut self) {
        self.shutdown();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
