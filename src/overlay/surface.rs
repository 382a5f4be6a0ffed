//! Host integration traits for the selection overlay.
//!
//! The engine never touches a DOM or compositor surface directly: the host
//! implements [`OverlaySurface`] to mount and update the visual artifacts
//! and [`ViewportMetrics`] to report page geometry. Both can be mocked in
//! tests.

/// Visual surface operations the overlay drives on its host.
///
/// All operations must be tolerant of redundant calls: the overlay's
/// teardown is idempotent, so `clear`, `unlock_scroll` and the removal
/// methods may run when nothing is mounted and must be no-ops then.
/// Coordinates passed to `update_selection` and `update_label` are page
/// coordinates (scroll offset included), matching absolute positioning.
pub trait OverlaySurface {
    /// Mounts the transparent full-viewport capture surface (topmost
    /// z-order, crosshair cursor).
    fn mount_overlay(&mut self);

    /// Shows the instructional hint with the given text.
    fn show_hint(&mut self, text: &str);

    /// Moves the hint to a viewport-relative position.
    fn move_hint(&mut self, x: f64, y: f64);

    /// Removes the hint if present.
    fn remove_hint(&mut self);

    /// Rendered size of the hint, used for edge flipping.
    ///
    /// Hosts that cannot measure may keep the default; the hint then stays
    /// on the cursor's trailing side.
    fn hint_size(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    /// Mounts the visible selection rectangle and the dimension readout.
    fn mount_selection(&mut self);

    /// Updates the selection rectangle geometry.
    fn update_selection(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Updates the dimension readout position and text.
    fn update_label(&mut self, x: f64, y: f64, text: &str);

    /// Disables page scrolling for the duration of a gesture.
    fn lock_scroll(&mut self);

    /// Re-enables page scrolling.
    fn unlock_scroll(&mut self);

    /// Removes every mounted artifact (overlay, selection box, label,
    /// hint). Must be safe to call repeatedly and before anything was
    /// mounted.
    fn clear(&mut self);
}

/// Page geometry reported by the host.
pub trait ViewportMetrics {
    /// Visible viewport size in CSS pixels.
    fn viewport_size(&self) -> (f64, f64);

    /// Current scroll offset in CSS pixels.
    fn scroll_offset(&self) -> (f64, f64);

    /// Device pixel ratio, or a non-positive value when the host cannot
    /// report one.
    fn device_pixel_ratio(&self) -> f64;
}

/// Viewport geometry frozen at one instant.
///
/// Read exactly once when a selection is finalized and used consistently
/// for both origin conversion and ratio computation, so a page that
/// scrolled mid-gesture cannot skew the crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSnapshot {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub device_pixel_ratio: f64,
}

impl ViewportSnapshot {
    /// Freezes the current metrics.
    pub fn capture<M: ViewportMetrics>(metrics: &M) -> Self {
        let (width, height) = metrics.viewport_size();
        let (scroll_x, scroll_y) = metrics.scroll_offset();
        Self {
            width,
            height,
            scroll_x,
            scroll_y,
            device_pixel_ratio: metrics.device_pixel_ratio(),
        }
    }

    /// Upsampling scale factor for this capture.
    ///
    /// The device pixel ratio when the host reports a usable one,
    /// otherwise the configured fallback (minimum resolution floor).
    pub fn scale_factor(&self, fallback: f64) -> f64 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            fallback
        }
    }
}
