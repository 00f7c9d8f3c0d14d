//! Greenroom Core - application lifecycle pump
//!
//! Reconciles a host OS's foreground/background lifecycle, delivered
//! asynchronously on the host's UI thread, with the single application
//! thread that owns the rendering context and drives the event queue. The
//! host requires GPU resources to be released immediately on backgrounding
//! and guarantees the application logic observes the background
//! notification before the thread suspends.
//!
//! # Architecture
//!
//! - [`LifecyclePump`] - the per-tick state machine, blocking or polling
//! - [`ContextGuardian`] - context backup/restore around suspension
//! - [`ScreenGeometryReconciler`] - change-suppressed geometry updates
//! - [`AudioCoordinator`] - uniform suspend/resume over audio backends
//! - [`LifecycleSignals`] - pause/resume semaphores posted by the host
//!
//! Windowing, event-queue storage, display enumeration, text input and the
//! audio backends themselves stay behind the traits in [`events`],
//! [`graphics`], [`surface`], [`input`] and [`audio`].

pub mod audio;
pub mod events;
pub mod graphics;
pub mod input;
pub mod pump;
pub mod signal;
pub mod surface;
#[cfg(test)]
pub mod test_utils;

pub use audio::{AudioBackend, AudioCoordinator};
pub use events::{AppEvent, EventSink, WindowEvent};
pub use graphics::{
    ContextBackup, ContextFault, ContextGuardian, GraphicsApi, GraphicsError, SharedWindow,
    WindowSlot, shared_window,
};
pub use input::TextInput;
pub use pump::{LifecyclePhase, LifecyclePump, Platform, PumpConfig, WaitMode};
pub use signal::{LifecycleSignals, Semaphore, SignalError};
pub use surface::{DisplayTopology, GeometryCache, NativeSurface, ScreenGeometryReconciler};
