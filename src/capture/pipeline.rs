//! Capture pipeline: acquisition, reconciliation, delivery.

use std::{fmt, sync::Arc};

use tokio::sync::mpsc;

use crate::channel::PrivilegedChannel;
use crate::delivery::{self, ScreenshotEvent};
use crate::overlay::{SelectionRect, ViewportSnapshot};

use super::acquire::{self, Rasterizer};
use super::reconcile;
use super::types::{CaptureError, RasterRequest, RenderOptions};

/// One finalized selection queued for processing.
#[derive(Clone)]
pub(crate) struct CaptureRequest {
    pub(crate) selection: SelectionRect,
    pub(crate) viewport: ViewportSnapshot,
    pub(crate) scale_factor: f64,
}

impl fmt::Debug for CaptureRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureRequest")
            .field("selection", &self.selection)
            .field("scroll", &(self.viewport.scroll_x, self.viewport.scroll_y))
            .field("scale_factor", &self.scale_factor)
            .finish()
    }
}

/// Bundle of collaborators used by the capture pipeline. Each component can
/// be mocked in tests.
#[derive(Clone)]
pub struct CaptureDependencies {
    /// Channel to the privileged background context.
    pub channel: Arc<dyn PrivilegedChannel>,
    /// Client-side fallback rasterizer.
    pub rasterizer: Arc<dyn Rasterizer>,
    /// UI layer sink for finished artifacts; fire-and-forget.
    pub ui: mpsc::UnboundedSender<ScreenshotEvent>,
    /// Artifact rendering options.
    pub render: RenderOptions,
}

/// Runs one capture end to end.
///
/// The overlay is already torn down by the time this runs; nothing here may
/// touch page state. Any error aborts the capture without delivering a
/// partial artifact.
pub(crate) async fn perform_capture(
    request: CaptureRequest,
    dependencies: Arc<CaptureDependencies>,
) -> Result<(), CaptureError> {
    log::info!("starting capture: {:?}", request);

    let raster_request = RasterRequest {
        scroll_x: request.viewport.scroll_x,
        scroll_y: request.viewport.scroll_y,
        width: request.viewport.width,
        height: request.viewport.height,
        scale: request.scale_factor,
        allow_cross_origin: true,
    };

    let raster = acquire::acquire_raster(
        dependencies.channel.as_ref(),
        dependencies.rasterizer.as_ref(),
        raster_request,
    )
    .await?;

    log::info!("obtained {}x{} raster", raster.width(), raster.height());

    let artifacts = reconcile::compose_artifacts(
        &raster,
        &request.selection,
        &request.viewport,
        request.scale_factor,
        &dependencies.render,
    )?;

    delivery::dispatch(&dependencies.ui, artifacts);
    Ok(())
}
