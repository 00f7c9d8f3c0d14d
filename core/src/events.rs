//! Event sink contract and lifecycle event kinds
//!
//! The pump does not own an event queue. It pushes into whatever queue the
//! host runtime drives and inspects pending counts through the [`EventSink`]
//! trait, so the queue implementation (ring buffer, channel, winit proxy)
//! stays out of this crate.

/// Application-level events the pump emits or inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppEvent {
    /// The application is about to lose the foreground.
    WillEnterBackground,
    /// The application has lost the foreground. Delivery of this event is
    /// what the pump waits on before suspending resources.
    DidEnterBackground,
    /// The application is about to regain the foreground.
    WillEnterForeground,
    /// The application has regained the foreground.
    DidEnterForeground,
    /// The rendering context was lost and rebuilt; the application must
    /// reinitialize its GPU resources.
    RenderDeviceReset,
    /// Process termination was requested.
    Quit,
}

/// Window-level events emitted around lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    Minimized,
    Restored,
    /// `data1`/`data2` carry the new surface width/height.
    Resized,
    /// `data1` carries the new native pixel format.
    PixelFormatChanged,
}

/// Contract for the host event queue.
pub trait EventSink {
    fn push_app_event(&mut self, event: AppEvent);
    fn push_window_event(&mut self, event: WindowEvent, data1: i32, data2: i32);

    /// Number of events of `kind` pushed but not yet consumed by the
    /// application.
    ///
    /// The pump compares this count against the unconsumed pause-signal
    /// count to decide when the background notification from the first
    /// pause of a cycle has been drained. Implementations must therefore
    /// count an event as queued from push until the application dequeues
    /// it, in FIFO order.
    fn queued_count(&self, kind: AppEvent) -> usize;

    /// Whether at least one event of `kind` is pending.
    fn has_event(&self, kind: AppEvent) -> bool;
}
