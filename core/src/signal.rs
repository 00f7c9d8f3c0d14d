//! Lifecycle signaling between the host UI thread and the pump thread

use std::sync::{Arc, Condvar, Mutex};

use thiserror::Error;

/// Failure to observe a signal this tick.
///
/// Always transient: the pump treats any error as "nothing happened" and
/// retries on its next invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("signal not set")]
    WouldBlock,
    #[error("signal state poisoned")]
    Poisoned,
}

/// Counting semaphore.
///
/// Posted by the host UI thread, consumed by the pump thread. Counts are
/// only ever decremented by a successful wait.
#[derive(Debug, Default)]
pub struct Semaphore {
    count: Mutex<usize>,
    cond: Condvar,
}

impl Semaphore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal once. Safe to call from any thread.
    pub fn post(&self) {
        if let Ok(mut count) = self.count.lock() {
            *count += 1;
            self.cond.notify_one();
        }
    }

    /// Block until signaled, then consume one signal.
    pub fn wait(&self) -> Result<(), SignalError> {
        let mut count = self.count.lock().map_err(|_| SignalError::Poisoned)?;
        while *count == 0 {
            count = self.cond.wait(count).map_err(|_| SignalError::Poisoned)?;
        }
        *count -= 1;
        Ok(())
    }

    /// Consume one signal if available, without blocking.
    pub fn try_wait(&self) -> Result<(), SignalError> {
        let mut count = self.count.lock().map_err(|_| SignalError::Poisoned)?;
        if *count == 0 {
            return Err(SignalError::WouldBlock);
        }
        *count -= 1;
        Ok(())
    }

    /// Current signal count, without consuming.
    pub fn value(&self) -> usize {
        self.count.lock().map(|count| *count).unwrap_or(0)
    }
}

/// The pause/resume signal pair.
///
/// Clone this and hand it to the host lifecycle thread; the pump keeps the
/// consumer side. Only the host thread may post, only the pump thread may
/// wait.
#[derive(Debug, Clone, Default)]
pub struct LifecycleSignals {
    pub pause: Arc<Semaphore>,
    pub resume: Arc<Semaphore>,
}

impl LifecycleSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host-side: request that the application thread pause.
    pub fn request_pause(&self) {
        self.pause.post();
    }

    /// Host-side: allow the application thread to resume.
    pub fn request_resume(&self) {
        self.resume.post();
    }
}
