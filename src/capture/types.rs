//! Data types for the screenshot capture pipeline.

use std::fmt;

use image::{DynamicImage, Rgba};
use thiserror::Error;

use crate::channel::ChannelError;

/// A full-viewport raster obtained from either acquisition strategy.
///
/// The pixel dimensions carry the real scaling of the capture; downstream
/// mapping always derives its ratios from them rather than trusting
/// `device_pixel_ratio`, which is informational.
pub struct RasterImage {
    /// Decoded pixel data.
    pub pixels: DynamicImage,
    /// Device pixel ratio the raster was produced at.
    pub device_pixel_ratio: f64,
}

impl RasterImage {
    /// Raster width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Raster height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("device_pixel_ratio", &self.device_pixel_ratio)
            .finish()
    }
}

/// Parameters for a fallback viewport rasterization.
///
/// Rendering is bounded to the visible viewport at the current scroll
/// position, never the full page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterRequest {
    /// Horizontal scroll offset to render from, in CSS pixels.
    pub scroll_x: f64,
    /// Vertical scroll offset to render from, in CSS pixels.
    pub scroll_y: f64,
    /// Viewport width in CSS pixels.
    pub width: f64,
    /// Viewport height in CSS pixels.
    pub height: f64,
    /// Requested output scale (raster pixels per CSS pixel).
    pub scale: f64,
    /// Let cross-origin resources render without blocking on taint
    /// restrictions; the result stays a private local artifact.
    pub allow_cross_origin: bool,
}

/// Rendering options for the produced artifacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// JPEG quality for both artifacts (1-100).
    pub jpeg_quality: u8,
    /// Stroke width of the boundary annotation in raster pixels.
    pub boundary_thickness: u32,
    /// Stroke color of the boundary annotation.
    pub boundary_color: Rgba<u8>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 100,
            boundary_thickness: 4,
            boundary_color: Rgba([255, 0, 0, 255]),
        }
    }
}

/// Status of the capture pipeline, exposed for host status indicators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStatus {
    /// No capture running.
    Idle,
    /// Acquisition or processing in flight.
    InProgress,
    /// Last capture delivered its artifacts.
    Success,
    /// Last capture failed; the message is user-presentable and generic,
    /// the underlying cause lives in the log.
    Failed(String),
}

/// Errors that can occur during screenshot capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("privileged channel request failed: {0}")]
    Channel(#[from] ChannelError),

    #[error("native capture refused: {0}")]
    Refused(String),

    #[error("capture returned an empty image")]
    EmptyCapture,

    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("capture manager not running")]
    ManagerStopped,
}
