//! Image acquisition: native tab capture with a rasterization fallback.
//!
//! Two interchangeable strategies produce a full-viewport [`RasterImage`]:
//! the privileged context's native capture (already pixel-accurate for the
//! visible tab), or a client-side rasterization of the live page through
//! the host's [`Rasterizer`]. The selector is a pure routing decision —
//! no retries, a single failure aborts the capture.

use async_trait::async_trait;

use crate::channel::{ChannelError, ChannelRequest, ChannelResponse, PrivilegedChannel};

use super::encode;
use super::types::{CaptureError, RasterImage, RasterRequest};

/// Client-side viewport rasterization, implemented by the host.
///
/// The request bounds rendering to the visible viewport at the given scroll
/// position; implementations may internally await resource loads.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, request: RasterRequest) -> Result<RasterImage, CaptureError>;
}

/// Asks the privileged context whether native capture is available.
///
/// Every failure mode — transport error, malformed answer — degrades to
/// "unavailable" so the fallback keeps working when the background context
/// cannot be reached. Nothing is surfaced to the user here.
pub(crate) async fn native_capture_available(channel: &dyn PrivilegedChannel) -> bool {
    match channel.request(ChannelRequest::CheckNativeCapture).await {
        Ok(ChannelResponse::Availability { is_available }) => is_available,
        Ok(other) => {
            log::debug!("unexpected availability response {other:?}, assuming unavailable");
            false
        }
        Err(err) => {
            log::debug!("native capture availability check failed ({err}), using fallback");
            false
        }
    }
}

/// Requests a native whole-tab capture and decodes the returned image.
pub(crate) async fn acquire_native(
    channel: &dyn PrivilegedChannel,
    device_pixel_ratio: f64,
) -> Result<RasterImage, CaptureError> {
    match channel.request(ChannelRequest::CaptureVisibleTab).await? {
        ChannelResponse::Capture {
            success: true,
            data_url: Some(data_url),
            ..
        } => {
            let pixels = encode::decode_data_url(&data_url)?;
            Ok(RasterImage {
                pixels,
                device_pixel_ratio,
            })
        }
        ChannelResponse::Capture {
            success: true,
            data_url: None,
            ..
        } => Err(CaptureError::EmptyCapture),
        ChannelResponse::Capture {
            success: false,
            message,
            ..
        } => Err(CaptureError::Refused(
            message.unwrap_or_else(|| "no reason given".to_string()),
        )),
        other => Err(CaptureError::Channel(ChannelError::InvalidResponse(
            format!("expected a capture payload, got {other:?}"),
        ))),
    }
}

/// Acquires the full-viewport raster via the preferred strategy.
pub(crate) async fn acquire_raster(
    channel: &dyn PrivilegedChannel,
    rasterizer: &dyn Rasterizer,
    request: RasterRequest,
) -> Result<RasterImage, CaptureError> {
    if native_capture_available(channel).await {
        log::debug!("acquiring raster via native tab capture");
        acquire_native(channel, request.scale).await
    } else {
        log::debug!(
            "rasterizing {}x{} viewport at scale {:.2}",
            request.width,
            request.height,
            request.scale
        );
        rasterizer.rasterize(request).await
    }
}
