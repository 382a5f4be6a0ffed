//! Capture controller: wires the overlay to the capture pipeline.
//!
//! The controller is the single owner of the gesture-to-artifact flow. It
//! forwards normalized input to the overlay, and on finalize submits the
//! selection (with its finalize-time viewport snapshot) to the capture
//! manager. Overlay teardown always completes inside the pointer-up call,
//! strictly before the request reaches the manager, so acquisition can
//! never observe a locked page.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::capture::{CaptureDependencies, CaptureManager, CaptureRequest, Rasterizer};
use crate::channel::{ChannelNotice, PrivilegedChannel};
use crate::config::Config;
use crate::delivery::ScreenshotEvent;
use crate::input::{Key, PointerInput};
use crate::overlay::{KeyOutcome, OverlayError, OverlaySurface, SelectionOverlay, ViewportMetrics};

/// Errors starting a capture gesture.
#[derive(Debug, Error)]
pub enum BeginError {
    /// The previous capture is still being processed; new gestures are
    /// rejected until it completes.
    #[error("previous capture is still processing")]
    Busy,

    #[error(transparent)]
    Overlay(#[from] OverlayError),
}

/// Owns the overlay and the pipeline handle for one page context.
pub struct CaptureController<S: OverlaySurface, M: ViewportMetrics> {
    overlay: SelectionOverlay<S, M>,
    channel: Arc<dyn PrivilegedChannel>,
    manager: CaptureManager,
    fallback_scale: f64,
}

impl<S: OverlaySurface, M: ViewportMetrics> CaptureController<S, M> {
    /// Builds the controller and spawns the capture manager on the given
    /// runtime.
    pub fn new(
        surface: S,
        metrics: M,
        channel: Arc<dyn PrivilegedChannel>,
        rasterizer: Arc<dyn Rasterizer>,
        ui: mpsc::UnboundedSender<ScreenshotEvent>,
        runtime_handle: &tokio::runtime::Handle,
        config: &Config,
    ) -> Self {
        let overlay = SelectionOverlay::new(surface, metrics, config.overlay.options());
        let dependencies = CaptureDependencies {
            channel: Arc::clone(&channel),
            rasterizer,
            ui,
            render: config.capture.render_options(),
        };
        let manager = CaptureManager::new(runtime_handle, dependencies);
        Self {
            overlay,
            channel,
            manager,
            fallback_scale: config.capture.fallback_scale,
        }
    }

    /// Arms the selection overlay for a new capture gesture.
    ///
    /// Rejected while the previous capture is still processing or while an
    /// overlay is already active.
    pub fn begin_capture(&mut self) -> Result<(), BeginError> {
        if self.manager.is_busy() {
            log::warn!("rejecting capture request: previous capture still processing");
            return Err(BeginError::Busy);
        }
        self.overlay.start()?;
        Ok(())
    }

    pub fn on_pointer_down(&mut self, input: PointerInput) {
        self.overlay.on_pointer_down(input);
    }

    pub fn on_pointer_move(&mut self, input: PointerInput) {
        self.overlay.on_pointer_move(input);
    }

    /// Finalizes the gesture and queues the capture.
    pub fn on_pointer_up(&mut self, input: PointerInput) {
        let Some(finalized) = self.overlay.on_pointer_up(input) else {
            return;
        };

        let scale_factor = finalized.viewport.scale_factor(self.fallback_scale);
        let request = CaptureRequest {
            selection: finalized.selection,
            viewport: finalized.viewport,
            scale_factor,
        };
        if let Err(err) = self.manager.submit(request) {
            log::error!("failed to queue capture: {err}");
        }
    }

    /// Forwards a key press; Escape cancels and notifies the privileged
    /// context exactly once.
    pub fn on_key_press(&mut self, key: Key) {
        if self.overlay.on_key_press(key) == KeyOutcome::CancelledCapture {
            self.channel.notify(ChannelNotice::ExitCapture);
        }
    }

    /// Whether the overlay is armed or tracking a gesture.
    pub fn is_selecting(&self) -> bool {
        self.overlay.is_active()
    }

    /// Handle to the pipeline status, for host status indicators.
    pub fn manager(&self) -> &CaptureManager {
        &self.manager
    }
}
