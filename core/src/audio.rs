//! Audio backend suspension fan-out and stuck-playback recovery
//!
//! A build may compile in zero, one, or several audio backends. The
//! coordinator gives the pump a single suspend/resume surface over whatever
//! set is registered; an absent backend is simply never registered.

use smallvec::SmallVec;

/// One independently compiled audio output backend.
///
/// `pause_devices`/`resume_devices` must be idempotent and safe to call in
/// any order relative to other backends: the coordinator may re-issue a
/// suspend on an already-suspended backend, and backends are independent of
/// each other.
pub trait AudioBackend {
    fn pause_devices(&mut self);
    fn resume_devices(&mut self);

    /// Whether the backend is stuck reporting an active play state while
    /// producing no output. Only backends that can enter that state
    /// override this.
    fn detect_broken_play_state(&mut self) -> bool {
        false
    }
}

/// Uniform pause/resume facade over the registered backends.
///
/// Registering zero backends is valid; every operation degrades to a no-op.
#[derive(Default)]
pub struct AudioCoordinator {
    backends: SmallVec<[Box<dyn AudioBackend>; 3]>,
    watched: Option<usize>,
}

impl AudioCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend. Fan-out order carries no meaning.
    pub fn register(&mut self, backend: Box<dyn AudioBackend>) {
        self.backends.push(backend);
    }

    /// Register the backend the playback watchdog monitors.
    pub fn register_watched(&mut self, backend: Box<dyn AudioBackend>) {
        self.backends.push(backend);
        self.watched = Some(self.backends.len() - 1);
    }

    pub fn suspend_all(&mut self) {
        for backend in &mut self.backends {
            backend.pause_devices();
        }
    }

    pub fn resume_all(&mut self) {
        for backend in &mut self.backends {
            backend.resume_devices();
        }
    }

    /// Cycle the watched backend if it is stuck actively playing.
    ///
    /// Runs once per pump tick, in every lifecycle phase: the stuck
    /// condition is unrelated to foreground/background transitions.
    pub fn check_and_recover(&mut self) {
        let Some(index) = self.watched else {
            return;
        };
        let backend = &mut self.backends[index];
        if backend.detect_broken_play_state() {
            tracing::warn!("audio backend stuck in play state, cycling it");
            backend.pause_devices();
            backend.resume_devices();
        }
    }
}
