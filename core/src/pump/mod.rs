//! Lifecycle pump: pause/resume orchestration for the application thread
//!
//! The host OS delivers pause/resume notifications on its own UI thread
//! through [`LifecycleSignals`]. The application thread runs the pump once
//! per event-loop tick (or parks inside it, in blocking mode); the pump
//! drives audio suspension, context backup/restore and lifecycle event
//! delivery in the order the host requires:
//!
//! 1. pause signaled → background app/window events emitted
//! 2. background notification observed by the application
//! 3. audio suspended, context backed up
//! 4. thread parks (blocking) or keeps polling (non-blocking)
//! 5. resume signaled → foreground events, audio resumed, context restored
//!
//! Step 2 is the reason for the intermediate [`LifecyclePhase::Pausing`]
//! state: the host may signal pause several times before the application
//! has drained the background notification generated on the first signal,
//! and suspending resources before the application learns it went to
//! background would break anything that reacts to that event.


use crate::audio::AudioCoordinator;
use crate::events::{AppEvent, EventSink, WindowEvent};
use crate::graphics::{ContextGuardian, GraphicsApi, SharedWindow};
use crate::input::TextInput;
use crate::signal::LifecycleSignals;
use crate::surface::{DisplayTopology, NativeSurface};

/// Collaborator bundle for a host platform.
///
/// Groups the external interfaces the pump consumes, in the same way a
/// console bundles its graphics/audio/input types.
pub trait Platform {
    type Events: EventSink;
    type Graphics: GraphicsApi;
    type Surface: NativeSurface;
    type Display: DisplayTopology;
    type TextInput: TextInput;
}

/// Where the pump sits in the pause/resume cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecyclePhase {
    #[default]
    Running,
    /// Pause observed; waiting for the background notification of the
    /// first pause in this cycle to be drained by the application.
    Pausing,
    /// Audio suspended and context backed up (or pending, in polling
    /// mode); the thread may park or keep polling for resume.
    Paused,
}

/// How the pump waits while paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Park on the resume signal; the thread does no other work until
    /// foregrounded.
    Blocking,
    /// Poll both signals; every call returns promptly.
    NonBlocking,
}

/// Pump behavior knobs.
#[derive(Debug, Clone)]
pub struct PumpConfig {
    /// Whether the polling pump suspends audio on backgrounding. The
    /// blocking pump always suspends audio.
    pub pause_audio_on_background: bool,
    /// The rendering context is owned outside this core; skip context
    /// backup and restore entirely.
    pub external_context: bool,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            pause_audio_on_background: true,
            external_context: false,
        }
    }
}

/// Mutable pump-owned state. The per-process statics of older pump
/// implementations live here as explicit fields.
#[derive(Debug, Default)]
struct PumpState {
    phase: LifecyclePhase,
    /// Polling mode: context backup and audio suspension are deferred to
    /// the first tick after entering `Paused` and executed exactly once.
    backup_pending: bool,
}

/// The orchestrating state machine. One instance per application thread;
/// only that thread may invoke it.
pub struct LifecyclePump<P: Platform> {
    events: P::Events,
    graphics: P::Graphics,
    surface: P::Surface,
    display: P::Display,
    text_input: P::TextInput,
    audio: AudioCoordinator,
    signals: LifecycleSignals,
    guardian: ContextGuardian,
    window: SharedWindow<<P::Graphics as GraphicsApi>::Context>,
    config: PumpConfig,
    state: PumpState,
}

impl<P: Platform> LifecyclePump<P> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        events: P::Events,
        graphics: P::Graphics,
        surface: P::Surface,
        display: P::Display,
        text_input: P::TextInput,
        audio: AudioCoordinator,
        signals: LifecycleSignals,
        window: SharedWindow<<P::Graphics as GraphicsApi>::Context>,
        config: PumpConfig,
    ) -> Self {
        Self {
            events,
            graphics,
            surface,
            display,
            text_input,
            audio,
            signals,
            guardian: ContextGuardian::new(),
            window,
            config,
            state: PumpState::default(),
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.state.phase
    }

    /// Signal pair for the host lifecycle thread to clone.
    pub fn signals(&self) -> &LifecycleSignals {
        &self.signals
    }

    /// Run one blocking pump pass.
    ///
    /// While paused this parks the thread on the resume signal and returns
    /// only once foregrounded; otherwise it returns after one non-blocking
    /// check of the pause signal.
    pub fn pump_blocking(&mut self) {
        self.tick(WaitMode::Blocking);
    }

    /// Run one polling pump pass; always returns promptly.
    pub fn pump_nonblocking(&mut self) {
        self.tick(WaitMode::NonBlocking);
    }

    fn tick(&mut self, mode: WaitMode) {
        if self.state.phase == LifecyclePhase::Paused {
            self.paused_tick(mode);
        } else {
            self.running_tick();
        }

        // Every tick, in every phase: a stuck play state has nothing to do
        // with lifecycle transitions.
        self.audio.check_and_recover();
    }

    /// `Running`/`Pausing` handling: observe a pause request and hold in
    /// `Pausing` until the application has seen the background
    /// notification.
    fn running_tick(&mut self) {
        if self.state.phase != LifecyclePhase::Pausing {
            // Consume at most one pause signal per cycle; further posts
            // stay in the semaphore so the drain guard can count them.
            if self.signals.pause.try_wait().is_err() {
                return;
            }
            self.guardian.capture_swap_interval(&self.graphics);
            self.events.push_window_event(WindowEvent::Minimized, 0, 0);
            self.events.push_app_event(AppEvent::WillEnterBackground);
            self.events.push_app_event(AppEvent::DidEnterBackground);
            tracing::debug!("pause requested, notifying application");
        }

        if self.pending_background_confirmations() {
            self.state.phase = LifecyclePhase::Pausing;
        } else {
            self.state.phase = LifecyclePhase::Paused;
            self.state.backup_pending = true;
            tracing::debug!("background notification drained, pausing");
        }
    }

    /// Whether the background notification from this cycle's first pause is
    /// still queued.
    ///
    /// The host may have signaled pause again while we drain; each
    /// unconsumed signal accounts for one notification that has not been
    /// emitted yet, so the first cycle's event has been observed exactly
    /// when the queued count no longer exceeds the signal count.
    fn pending_background_confirmations(&self) -> bool {
        self.events.queued_count(AppEvent::DidEnterBackground) > self.signals.pause.value()
    }

    fn paused_tick(&mut self, mode: WaitMode) {
        match mode {
            WaitMode::Blocking => {
                // Last thing before parking: free GPU state and silence
                // audio. Re-run on every pass in case the previous wait
                // failed.
                self.backup_context();
                self.audio.suspend_all();
                self.state.backup_pending = false;

                if self.signals.resume.wait().is_ok() {
                    self.resume(mode);
                }
            }
            WaitMode::NonBlocking => {
                if self.state.backup_pending {
                    self.backup_context();
                    if self.config.pause_audio_on_background {
                        self.audio.suspend_all();
                    }
                    self.state.backup_pending = false;
                }

                if self.signals.resume.try_wait().is_ok() {
                    self.resume(mode);
                }
            }
        }
    }

    fn resume(&mut self, mode: WaitMode) {
        self.state.phase = LifecyclePhase::Running;
        self.state.backup_pending = false;

        self.events.push_app_event(AppEvent::WillEnterForeground);
        self.events.push_app_event(AppEvent::DidEnterForeground);
        self.events.push_window_event(WindowEvent::Restored, 0, 0);

        match mode {
            WaitMode::Blocking => self.audio.resume_all(),
            WaitMode::NonBlocking => {
                if self.config.pause_audio_on_background {
                    self.audio.resume_all();
                }
            }
        }

        // Restore the context unless a quit is already pending.
        if !self.events.has_event(AppEvent::Quit) {
            self.restore_context();
        }

        // The software keyboard is dismissed by backgrounding; bring it
        // back if the application still wants input.
        if self.text_input.is_active() {
            self.text_input.start();
        }

        tracing::debug!("resumed to foreground");
    }

    fn backup_context(&mut self) {
        if self.config.external_context {
            return;
        }
        let Ok(mut window) = self.window.lock() else {
            return;
        };
        if let Some(slot) = window.as_mut() {
            self.guardian.backup(&mut self.graphics, slot);
        }
    }

    fn restore_context(&mut self) {
        if self.config.external_context {
            return;
        }
        let Ok(mut window) = self.window.lock() else {
            return;
        };
        if let Some(slot) = window.as_mut() {
            self.guardian.restore(
                &mut self.graphics,
                &self.surface,
                &self.display,
                &mut self.events,
                slot,
            );
        }
    }
}
