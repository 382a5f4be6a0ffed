//! Selection state for a single capture gesture.

/// A selection rectangle in page coordinates (scroll offset included).
///
/// Width and height are always non-negative: the rectangle is normalized
/// from the gesture anchor and the current pointer position regardless of
/// drag direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    /// Builds a normalized rectangle from two drag corners.
    pub fn from_drag(anchor_x: f64, anchor_y: f64, current_x: f64, current_y: f64) -> Self {
        Self {
            origin_x: anchor_x.min(current_x),
            origin_y: anchor_y.min(current_y),
            width: (current_x - anchor_x).abs(),
            height: (current_y - anchor_y).abs(),
        }
    }

    /// Whether the rectangle covers no area (click without drag).
    ///
    /// Degenerate selections are still valid pipeline input; only the
    /// cropped artifact is omitted downstream.
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// Transient state bundle for one active capture gesture.
///
/// Owned exclusively by [`super::SelectionOverlay`] as an `Option`: absence
/// is the "no active session" state, so stale handles cannot outlive a
/// gesture. Created on pointer-down, dropped on finalize or cancellation.
#[derive(Debug)]
pub struct CaptureSession {
    anchor_x: f64,
    anchor_y: f64,
    selection: SelectionRect,
}

impl CaptureSession {
    /// Starts a session anchored at the pointer-down position.
    pub fn begin(anchor_x: f64, anchor_y: f64) -> Self {
        Self {
            anchor_x,
            anchor_y,
            selection: SelectionRect::from_drag(anchor_x, anchor_y, anchor_x, anchor_y),
        }
    }

    /// Updates the selection for a new pointer position and returns it.
    pub fn drag_to(&mut self, x: f64, y: f64) -> SelectionRect {
        self.selection = SelectionRect::from_drag(self.anchor_x, self.anchor_y, x, y);
        self.selection
    }

    /// The current selection rectangle.
    pub fn selection(&self) -> SelectionRect {
        self.selection
    }
}
