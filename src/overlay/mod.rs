//! Interactive region-selection overlay.
//!
//! The overlay is a small state machine driven by normalized input events:
//! armed (capture surface and hint mounted, waiting for pointer-down),
//! selecting (one [`CaptureSession`] active), or idle. It owns the session
//! exclusively; downstream stages only ever see the finalized rectangle and
//! the viewport snapshot taken at finalize time.
//!
//! Teardown is idempotent and synchronous: by the time a finalized
//! selection is handed to the caller, every visual artifact is removed and
//! scrolling is unlocked, so a slow acquisition can never hold the page in
//! a locked state.

mod session;
mod surface;

pub use session::{CaptureSession, SelectionRect};
pub use surface::{OverlaySurface, ViewportMetrics, ViewportSnapshot};

use thiserror::Error;

use crate::input::{Key, PointerInput};

/// Errors starting a selection overlay.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("a capture gesture is already in progress")]
    SessionActive,
}

/// Presentation options for the overlay, usually sourced from
/// [`crate::config::OverlayConfig`].
#[derive(Debug, Clone)]
pub struct OverlayOptions {
    /// Instructional hint shown until the gesture starts.
    pub hint_text: String,
    /// Offset between the cursor and the hint, in CSS pixels.
    pub hint_margin: f64,
    /// Distance the dimension readout sits above the selection top edge.
    pub label_offset: f64,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            hint_text: "Click or drag to select area for screenshot".to_string(),
            hint_margin: 15.0,
            label_offset: 35.0,
        }
    }
}

/// Outcome of a key press handled by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// An active capture was cancelled and torn down.
    CancelledCapture,
    /// The key did not affect the overlay.
    Ignored,
}

/// A selection handed to the capture pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalizedSelection {
    /// Selection rectangle in page coordinates.
    pub selection: SelectionRect,
    /// Viewport geometry frozen at finalize time.
    pub viewport: ViewportSnapshot,
}

/// Pointer-driven selection overlay controller.
pub struct SelectionOverlay<S: OverlaySurface, M: ViewportMetrics> {
    surface: S,
    metrics: M,
    options: OverlayOptions,
    armed: bool,
    session: Option<CaptureSession>,
}

impl<S: OverlaySurface, M: ViewportMetrics> SelectionOverlay<S, M> {
    pub fn new(surface: S, metrics: M, options: OverlayOptions) -> Self {
        Self {
            surface,
            metrics,
            options,
            armed: false,
            session: None,
        }
    }

    /// Mounts the capture surface and hint, arming the overlay.
    ///
    /// Rejected while a previous overlay is still armed or selecting; the
    /// caller decides whether to surface that to the user.
    pub fn start(&mut self) -> Result<(), OverlayError> {
        if self.armed || self.session.is_some() {
            return Err(OverlayError::SessionActive);
        }

        self.surface.mount_overlay();
        self.surface.show_hint(&self.options.hint_text);
        self.armed = true;
        log::debug!("selection overlay armed");
        Ok(())
    }

    /// Whether the overlay is armed or tracking a gesture.
    pub fn is_active(&self) -> bool {
        self.armed || self.session.is_some()
    }

    /// Handles pointer-down: begins a session on the primary button.
    pub fn on_pointer_down(&mut self, input: PointerInput) {
        if !self.armed {
            return;
        }
        if self.session.is_some() {
            log::warn!("ignoring pointer-down while a selection is already active");
            return;
        }
        if !input.is_primary() {
            return;
        }

        self.surface.lock_scroll();
        self.surface.mount_selection();
        self.surface.remove_hint();

        let session = CaptureSession::begin(input.page_x, input.page_y);
        let rect = session.selection();
        self.apply_selection(rect);
        self.session = Some(session);
        log::debug!(
            "selection started at page ({:.0}, {:.0})",
            input.page_x,
            input.page_y
        );
    }

    /// Handles pointer motion: grows the selection or moves the hint.
    pub fn on_pointer_move(&mut self, input: PointerInput) {
        if let Some(session) = &mut self.session {
            let rect = session.drag_to(input.page_x, input.page_y);
            self.apply_selection(rect);
        } else if self.armed {
            let (scroll_x, scroll_y) = self.metrics.scroll_offset();
            let (viewport_width, _) = self.metrics.viewport_size();
            let (x, y) = hint_position(
                input.page_x - scroll_x,
                input.page_y - scroll_y,
                self.surface.hint_size(),
                viewport_width,
                self.options.hint_margin,
            );
            self.surface.move_hint(x, y);
        }
    }

    /// Handles pointer-up: finalizes the selection and tears down.
    ///
    /// Returns the finalized rectangle together with the viewport snapshot
    /// read at this instant. A click without drag yields a zero-area
    /// rectangle, which is valid pipeline input.
    pub fn on_pointer_up(&mut self, input: PointerInput) -> Option<FinalizedSelection> {
        let session = self.session.as_mut()?;
        let selection = session.drag_to(input.page_x, input.page_y);
        let viewport = ViewportSnapshot::capture(&self.metrics);

        self.teardown();
        log::debug!(
            "selection finalized: {:.0}x{:.0} at page ({:.0}, {:.0})",
            selection.width,
            selection.height,
            selection.origin_x,
            selection.origin_y
        );
        Some(FinalizedSelection {
            selection,
            viewport,
        })
    }

    /// Handles a key press; Escape cancels an active capture.
    pub fn on_key_press(&mut self, key: Key) -> KeyOutcome {
        if key == Key::Escape && self.is_active() {
            self.teardown();
            log::debug!("capture cancelled via Escape");
            return KeyOutcome::CancelledCapture;
        }
        KeyOutcome::Ignored
    }

    /// Removes every overlay artifact and unlocks scrolling.
    ///
    /// Safe to call in any state and any number of times; after the first
    /// call further input events are ignored until the next `start`.
    pub fn teardown(&mut self) {
        self.surface.clear();
        self.surface.unlock_scroll();
        self.session = None;
        self.armed = false;
    }

    fn apply_selection(&mut self, rect: SelectionRect) {
        self.surface
            .update_selection(rect.origin_x, rect.origin_y, rect.width, rect.height);
        self.surface.update_label(
            rect.origin_x,
            rect.origin_y - self.options.label_offset,
            &format!("W: {:.0}px, H: {:.0}px", rect.width, rect.height),
        );
    }

    /// Borrow of the host surface, for hosts that multiplex it.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Borrow of the host metrics.
    pub fn metrics(&self) -> &M {
        &self.metrics
    }
}

/// Positions the hint next to the cursor, flipping to the left side when it
/// would overflow the right viewport edge.
fn hint_position(
    client_x: f64,
    client_y: f64,
    hint_size: (f64, f64),
    viewport_width: f64,
    margin: f64,
) -> (f64, f64) {
    let (hint_width, _) = hint_size;
    let x = if client_x + hint_width + margin > viewport_width {
        client_x - hint_width - margin
    } else {
        client_x + margin
    };
    (x, client_y + margin)
}
