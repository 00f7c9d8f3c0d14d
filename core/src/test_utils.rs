//! Shared test utilities for pump and component tests
//!
//! Every mock is a cloneable handle around shared interior state, so a test
//! can hand one clone to the pump and keep another for inspection.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::audio::AudioBackend;
use crate::events::{AppEvent, EventSink, WindowEvent};
use crate::graphics::{ContextFault, GraphicsApi, GraphicsError};
use crate::input::TextInput;
use crate::pump::Platform;
use crate::surface::{DisplayTopology, NativeSurface};

// ============================================================================
// Test Platform
// ============================================================================

/// Platform bundle wiring all the test collaborators together.
pub struct TestPlatform;

impl Platform for TestPlatform {
    type Events = TestSink;
    type Graphics = TestGraphics;
    type Surface = TestSurface;
    type Display = TestDisplay;
    type TextInput = TestTextInput;
}

// ============================================================================
// Event Sink
// ============================================================================

#[derive(Default)]
struct SinkInner {
    /// Every app event ever pushed, in order.
    app_events: Vec<AppEvent>,
    /// Every window event ever pushed, in order.
    window_events: Vec<(WindowEvent, i32, i32)>,
    /// Events pushed (or injected) and not yet consumed by the "application".
    queued: Vec<AppEvent>,
}

/// Recording event sink with an explicit consume step, so tests control
/// when the simulated application drains its queue.
#[derive(Clone, Default)]
pub struct TestSink {
    inner: Arc<Mutex<SinkInner>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_events(&self) -> Vec<AppEvent> {
        self.inner.lock().unwrap().app_events.clone()
    }

    pub fn window_events(&self) -> Vec<(WindowEvent, i32, i32)> {
        self.inner.lock().unwrap().window_events.clone()
    }

    pub fn count(&self, kind: AppEvent) -> usize {
        self.inner
            .lock()
            .unwrap()
            .app_events
            .iter()
            .filter(|e| **e == kind)
            .count()
    }

    /// Simulate the application dequeuing the oldest event of `kind`.
    pub fn consume(&self, kind: AppEvent) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(pos) = inner.queued.iter().position(|e| *e == kind) {
            inner.queued.remove(pos);
        }
    }

    /// Queue an event as if some other producer pushed it (e.g. a pending
    /// quit request).
    pub fn inject(&self, kind: AppEvent) {
        self.inner.lock().unwrap().queued.push(kind);
    }
}

impl EventSink for TestSink {
    fn push_app_event(&mut self, event: AppEvent) {
        let mut inner = self.inner.lock().unwrap();
        inner.app_events.push(event);
        inner.queued.push(event);
    }

    fn push_window_event(&mut self, event: WindowEvent, data1: i32, data2: i32) {
        self.inner
            .lock()
            .unwrap()
            .window_events
            .push((event, data1, data2));
    }

    fn queued_count(&self, kind: AppEvent) -> usize {
        self.inner
            .lock()
            .unwrap()
            .queued
            .iter()
            .filter(|e| **e == kind)
            .count()
    }

    fn has_event(&self, kind: AppEvent) -> bool {
        self.queued_count(kind) > 0
    }
}

// ============================================================================
// Graphics API
// ============================================================================

#[derive(Default)]
struct GraphicsInner {
    current: Option<u32>,
    valid: HashSet<u32>,
    next_context: u32,
    swap_interval: i32,
    rejected_swap_interval: Option<i32>,
    pending_fault: Option<ContextFault>,
    make_current_calls: Vec<Option<u32>>,
    contexts_created: u32,
}

/// Graphics layer mock: contexts are small integers, validity is a set so
/// tests can invalidate a handle behind the pump's back.
#[derive(Clone, Default)]
pub struct TestGraphics {
    inner: Arc<Mutex<GraphicsInner>>,
}

impl TestGraphics {
    /// Graphics layer with context `1` created and current, as after
    /// window initialization.
    pub fn with_live_context() -> Self {
        let graphics = Self::default();
        {
            let mut inner = graphics.inner.lock().unwrap();
            inner.valid.insert(1);
            inner.current = Some(1);
            inner.next_context = 2;
        }
        graphics
    }

    pub fn current(&self) -> Option<u32> {
        self.inner.lock().unwrap().current
    }

    /// Invalidate every context, as the OS does while backgrounded.
    pub fn invalidate_all(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.valid.clear();
        inner.current = None;
    }

    pub fn set_fault(&self, fault: Option<ContextFault>) {
        self.inner.lock().unwrap().pending_fault = fault;
    }

    /// Set the swap interval directly, bypassing failure injection.
    pub fn set_swap_interval_raw(&self, interval: i32) {
        self.inner.lock().unwrap().swap_interval = interval;
    }

    /// Make `set_swap_interval(interval)` fail for exactly this value.
    pub fn reject_swap_interval(&self, interval: i32) {
        self.inner.lock().unwrap().rejected_swap_interval = Some(interval);
    }

    pub fn make_current_calls(&self) -> Vec<Option<u32>> {
        self.inner.lock().unwrap().make_current_calls.clone()
    }

    pub fn contexts_created(&self) -> u32 {
        self.inner.lock().unwrap().contexts_created
    }
}

impl GraphicsApi for TestGraphics {
    type Context = u32;

    fn make_current(&mut self, context: Option<u32>) -> Result<(), GraphicsError> {
        let mut inner = self.inner.lock().unwrap();
        inner.make_current_calls.push(context);
        match context {
            None => {
                inner.current = None;
                Ok(())
            }
            Some(ctx) if inner.valid.contains(&ctx) => {
                inner.current = Some(ctx);
                Ok(())
            }
            Some(_) => Err(GraphicsError::InvalidContext),
        }
    }

    fn create_context(&mut self) -> Result<u32, GraphicsError> {
        let mut inner = self.inner.lock().unwrap();
        let ctx = inner.next_context.max(1);
        inner.next_context = ctx + 1;
        inner.valid.insert(ctx);
        inner.contexts_created += 1;
        Ok(ctx)
    }

    fn current_context(&self) -> Option<u32> {
        self.inner.lock().unwrap().current
    }

    fn set_swap_interval(&mut self, interval: i32) -> Result<(), GraphicsError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.rejected_swap_interval == Some(interval) {
            return Err(GraphicsError::Rejected);
        }
        inner.swap_interval = interval;
        Ok(())
    }

    fn swap_interval(&self) -> i32 {
        self.inner.lock().unwrap().swap_interval
    }

    fn last_error(&mut self) -> Option<ContextFault> {
        self.inner.lock().unwrap().pending_fault.take()
    }
}

// ============================================================================
// Surface and Display
// ============================================================================

#[derive(Default)]
struct SurfaceInner {
    width: Option<u32>,
    height: Option<u32>,
    pixel_format: Option<u32>,
}

#[derive(Clone, Default)]
pub struct TestSurface {
    inner: Arc<Mutex<SurfaceInner>>,
}

impl TestSurface {
    pub fn new(width: Option<u32>, height: Option<u32>, pixel_format: Option<u32>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SurfaceInner {
                width,
                height,
                pixel_format,
            })),
        }
    }

    pub fn set_size(&self, width: Option<u32>, height: Option<u32>) {
        let mut inner = self.inner.lock().unwrap();
        inner.width = width;
        inner.height = height;
    }

    pub fn set_pixel_format(&self, pixel_format: Option<u32>) {
        self.inner.lock().unwrap().pixel_format = pixel_format;
    }
}

impl NativeSurface for TestSurface {
    fn width(&self) -> Option<u32> {
        self.inner.lock().unwrap().width
    }

    fn height(&self) -> Option<u32> {
        self.inner.lock().unwrap().height
    }

    fn pixel_format(&self) -> Option<u32> {
        self.inner.lock().unwrap().pixel_format
    }
}

#[derive(Default)]
struct DisplayInner {
    desktop_refresh_rate: Option<u32>,
    mode_refresh_rates: Vec<u32>,
}

#[derive(Clone, Default)]
pub struct TestDisplay {
    inner: Arc<Mutex<DisplayInner>>,
}

impl TestDisplay {
    pub fn new(desktop_refresh_rate: Option<u32>, mode_refresh_rates: Vec<u32>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DisplayInner {
                desktop_refresh_rate,
                mode_refresh_rates,
            })),
        }
    }

    pub fn set_desktop_refresh_rate(&self, rate: Option<u32>) {
        self.inner.lock().unwrap().desktop_refresh_rate = rate;
    }
}

impl DisplayTopology for TestDisplay {
    fn desktop_refresh_rate(&self) -> Option<u32> {
        self.inner.lock().unwrap().desktop_refresh_rate
    }

    fn mode_refresh_rates(&self) -> Vec<u32> {
        self.inner.lock().unwrap().mode_refresh_rates.clone()
    }
}

// ============================================================================
// Audio Backend
// ============================================================================

/// One pause or resume call, for order assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    Pause,
    Resume,
}

#[derive(Default)]
struct AudioInner {
    calls: Vec<AudioCall>,
    broken: bool,
}

/// Counting audio backend; cycling it clears a broken play state.
#[derive(Clone, Default)]
pub struct TestAudioBackend {
    inner: Arc<Mutex<AudioInner>>,
}

impl TestAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn pause_calls(&self) -> usize {
        self.calls().iter().filter(|c| **c == AudioCall::Pause).count()
    }

    pub fn resume_calls(&self) -> usize {
        self.calls().iter().filter(|c| **c == AudioCall::Resume).count()
    }

    pub fn set_broken(&self, broken: bool) {
        self.inner.lock().unwrap().broken = broken;
    }
}

impl AudioBackend for TestAudioBackend {
    fn pause_devices(&mut self) {
        self.inner.lock().unwrap().calls.push(AudioCall::Pause);
    }

    fn resume_devices(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(AudioCall::Resume);
        // A full cycle unsticks playback.
        inner.broken = false;
    }

    fn detect_broken_play_state(&mut self) -> bool {
        self.inner.lock().unwrap().broken
    }
}

// ============================================================================
// Text Input
// ============================================================================

#[derive(Default)]
struct TextInputInner {
    active: bool,
    start_calls: usize,
}

#[derive(Clone, Default)]
pub struct TestTextInput {
    inner: Arc<Mutex<TextInputInner>>,
}

impl TestTextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&self, active: bool) {
        self.inner.lock().unwrap().active = active;
    }

    pub fn start_calls(&self) -> usize {
        self.inner.lock().unwrap().start_calls
    }
}

impl TextInput for TestTextInput {
    fn is_active(&self) -> bool {
        self.inner.lock().unwrap().active
    }

    fn start(&mut self) {
        self.inner.lock().unwrap().start_calls += 1;
    }
}
