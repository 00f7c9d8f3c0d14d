//! Graphics context backup across background/foreground transitions
//!
//! The host OS requires the rendering context to be released the moment the
//! application is backgrounded, and usually invalidates it while the
//! application is away. [`ContextGuardian`] stashes the handle before the
//! thread idles and reactivates or rebuilds it on resume, emitting a
//! [`AppEvent::RenderDeviceReset`] whenever the application must
//! reinitialize GPU resources.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::events::{AppEvent, EventSink};
use crate::surface::{DisplayTopology, NativeSurface, ScreenGeometryReconciler};

/// Graphics API call failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphicsError {
    #[error("context is no longer valid")]
    InvalidContext,
    #[error("graphics call rejected")]
    Rejected,
}

/// Latent API error left behind by the most recent graphics call.
///
/// Either value means a context that nominally reactivated is alive but
/// unusable, so correctness cannot be assumed from a non-error return
/// alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextFault {
    OutOfMemory,
    InvalidOperation,
}

/// Contract for the GPU context layer, bound to the process's window.
pub trait GraphicsApi {
    type Context: Copy + PartialEq;

    /// Make `context` current on the calling thread; `None` detaches the
    /// current context so the backing surface can be freed.
    fn make_current(&mut self, context: Option<Self::Context>) -> Result<(), GraphicsError>;
    /// Create a fresh context for the window.
    fn create_context(&mut self) -> Result<Self::Context, GraphicsError>;
    /// The context current on the calling thread, if any.
    fn current_context(&self) -> Option<Self::Context>;
    fn set_swap_interval(&mut self, interval: i32) -> Result<(), GraphicsError>;
    fn swap_interval(&self) -> i32;
    /// Most recent latent API error; the query clears it.
    fn last_error(&mut self) -> Option<ContextFault>;
}

/// Per-window context backup slot.
///
/// `backed_up` is true only between a successful backup and its matching
/// restore; at most one backup is outstanding per window.
#[derive(Debug, Clone, Copy)]
pub struct ContextBackup<C> {
    pub context: Option<C>,
    pub backed_up: bool,
}

impl<C> Default for ContextBackup<C> {
    fn default() -> Self {
        Self {
            context: None,
            backed_up: false,
        }
    }
}

/// Per-window data guarded by the activity mutex.
#[derive(Debug)]
pub struct WindowSlot<C> {
    pub backup: ContextBackup<C>,
    /// Last known logical size, the fallback when the native surface query
    /// is unavailable.
    pub logical_size: (u32, u32),
}

impl<C> WindowSlot<C> {
    pub fn new(logical_size: (u32, u32)) -> Self {
        Self {
            backup: ContextBackup::default(),
            logical_size,
        }
    }
}

/// The activity mutex: serializes context backup/restore against any other
/// thread that creates or destroys the window. Locked only around a single
/// backup or restore call, never across a blocking wait.
pub type SharedWindow<C> = Arc<Mutex<Option<WindowSlot<C>>>>;

/// Create an empty shared window slot.
pub fn shared_window<C>() -> SharedWindow<C> {
    Arc::new(Mutex::new(None))
}

/// Backs up the rendering context before suspension and restores or
/// rebuilds it after resumption.
#[derive(Default)]
pub struct ContextGuardian {
    /// Swap interval captured at the start of the current pause cycle.
    saved_swap_interval: i32,
    reconciler: ScreenGeometryReconciler,
}

impl ContextGuardian {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the vsync setting at the start of a pause cycle.
    pub fn capture_swap_interval<G: GraphicsApi>(&mut self, graphics: &G) {
        self.saved_swap_interval = graphics.swap_interval();
    }

    /// Stash the current context and detach it so the backing surface can
    /// be freed while backgrounded. Caller must hold the activity lock.
    pub fn backup<G: GraphicsApi>(&mut self, graphics: &mut G, slot: &mut WindowSlot<G::Context>) {
        slot.backup.context = graphics.current_context();
        if graphics.make_current(None).is_err() {
            tracing::warn!("failed to detach context for backup");
        }
        slot.backup.backed_up = true;
    }

    /// Reactivate the backed-up context, rebuilding it when the OS has
    /// invalidated it, then reconcile surface geometry and reapply vsync.
    ///
    /// Caller must hold the activity lock and own GPU operations on this
    /// thread. Emits at most one `RenderDeviceReset` per call.
    pub fn restore<G, S, D, E>(
        &mut self,
        graphics: &mut G,
        surface: &S,
        display: &D,
        events: &mut E,
        slot: &mut WindowSlot<G::Context>,
    ) where
        G: GraphicsApi,
        S: NativeSurface,
        D: DisplayTopology,
        E: EventSink,
    {
        let mut reset_needed = false;

        if graphics.make_current(slot.backup.context).is_err() {
            // The context was invalidated while backgrounded, the common
            // case. Build a new one and make it current.
            match graphics.create_context() {
                Ok(context) => {
                    slot.backup.context = Some(context);
                    if graphics.make_current(Some(context)).is_err() {
                        tracing::warn!("fresh context could not be made current");
                    }
                }
                Err(err) => tracing::warn!("context recreation failed: {err}"),
            }
            reset_needed = true;
        }

        // A context can reactivate without a hard error yet be unusable;
        // the latent API error is the only evidence.
        if let Some(fault) = graphics.last_error() {
            tracing::warn!(?fault, "graphics error latched across restore");
            reset_needed = true;
        }

        if reset_needed {
            events.push_app_event(AppEvent::RenderDeviceReset);
        }

        slot.logical_size =
            self.reconciler
                .reconcile(surface, display, slot.logical_size, events);

        // Reapply vsync, falling back to disabled rather than leaving an
        // unknown value.
        if self.saved_swap_interval != 0 {
            if graphics.set_swap_interval(self.saved_swap_interval).is_err() {
                tracing::warn!(
                    interval = self.saved_swap_interval,
                    "swap interval reapply failed, disabling vsync"
                );
                let _ = graphics.set_swap_interval(0);
            }
        } else {
            let _ = graphics.set_swap_interval(0);
        }

        slot.backup.backed_up = false;
    }
}
