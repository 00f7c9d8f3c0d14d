//! Native surface/display queries and change-suppressed geometry pushes
//!
//! While backgrounded the OS may rotate the device, change the display mode
//! or recreate the native surface with a different pixel format. On restore
//! the reconciler re-reads the native geometry and pushes updates downstream
//! only when something actually changed, so an uneventful resume does no
//! redundant work.

use crate::events::{EventSink, WindowEvent};

/// Native window surface queries.
///
/// `None` means the query is unavailable right now (surface not yet
/// recreated); the reconciler then falls back to the window's last known
/// logical size and keeps the cached pixel format.
pub trait NativeSurface {
    fn width(&self) -> Option<u32>;
    fn height(&self) -> Option<u32>;
    fn pixel_format(&self) -> Option<u32>;
}

/// Refresh-rate topology of the display hosting the window.
pub trait DisplayTopology {
    /// Refresh rate of the current desktop mode, if known.
    fn desktop_refresh_rate(&self) -> Option<u32>;
    /// Refresh rates of every enumerated mode for the display.
    fn mode_refresh_rates(&self) -> Vec<u32>;
}

/// Ceiling used when no display mode is known.
const DEFAULT_REFRESH_RATE: u32 = 60;

/// The geometry triple last pushed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryCache {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: u32,
}

/// Re-reads surface geometry on restore and pushes updates only on change.
#[derive(Debug, Default)]
pub struct ScreenGeometryReconciler {
    pushed: Option<GeometryCache>,
    pixel_format: Option<u32>,
}

impl ScreenGeometryReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum refresh rate across the desktop mode and all enumerated
    /// modes, defaulting to 60 Hz when none are known.
    fn refresh_ceiling<D: DisplayTopology>(display: &D) -> u32 {
        let mut ceiling = display.desktop_refresh_rate().unwrap_or(0);
        for rate in display.mode_refresh_rates() {
            ceiling = ceiling.max(rate);
        }
        if ceiling == 0 { DEFAULT_REFRESH_RATE } else { ceiling }
    }

    /// Reconcile native geometry against the last pushed values.
    ///
    /// Returns the effective surface size so the caller can refresh its
    /// logical-size fallback.
    pub fn reconcile<S, D, E>(
        &mut self,
        surface: &S,
        display: &D,
        fallback_size: (u32, u32),
        events: &mut E,
    ) -> (u32, u32)
    where
        S: NativeSurface,
        D: DisplayTopology,
        E: EventSink,
    {
        let width = surface.width().filter(|w| *w > 0).unwrap_or(fallback_size.0);
        let height = surface.height().filter(|h| *h > 0).unwrap_or(fallback_size.1);
        let refresh_rate = Self::refresh_ceiling(display);

        if let Some(format) = surface.pixel_format().filter(|f| *f > 0)
            && self.pixel_format != Some(format)
        {
            events.push_window_event(WindowEvent::PixelFormatChanged, format as i32, 0);
            self.pixel_format = Some(format);
        }

        let next = GeometryCache {
            width,
            height,
            refresh_rate,
        };
        if self.pushed != Some(next) {
            tracing::debug!(width, height, refresh_rate, "surface geometry changed");
            events.push_window_event(WindowEvent::Resized, width as i32, height as i32);
            self.pushed = Some(next);
        }

        (width, height)
    }
}
