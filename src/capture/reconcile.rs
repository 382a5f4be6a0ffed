//! Coordinate reconciliation between page space and raster pixel space.
//!
//! The selection rectangle is expressed in page coordinates (scroll offset
//! included); the acquired raster is a device-pixel bitmap of the visible
//! viewport. Mapping between the two subtracts the finalize-time scroll
//! offset and applies per-axis ratios derived from the actual raster
//! dimensions — never from the device pixel ratio, which a fallback
//! rasterizer is free to miss by a few pixels.

use image::{DynamicImage, Rgba, RgbaImage, imageops::FilterType};

use crate::overlay::{SelectionRect, ViewportSnapshot};

use super::encode;
use super::types::{CaptureError, RasterImage, RenderOptions};

/// A rectangle in raster pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Everything needed to convert a page-space selection into raster pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleContext {
    pub device_pixel_ratio: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub raster_width: u32,
    pub raster_height: u32,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl ScaleContext {
    /// Builds the context from the finalize-time viewport snapshot and the
    /// acquired raster.
    pub fn new(viewport: &ViewportSnapshot, raster: &RasterImage) -> Self {
        Self {
            device_pixel_ratio: raster.device_pixel_ratio,
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            raster_width: raster.width(),
            raster_height: raster.height(),
            scroll_x: viewport.scroll_x,
            scroll_y: viewport.scroll_y,
        }
    }

    /// Horizontal raster pixels per CSS pixel.
    pub fn ratio_x(&self) -> f64 {
        self.raster_width as f64 / self.viewport_width
    }

    /// Vertical raster pixels per CSS pixel.
    pub fn ratio_y(&self) -> f64 {
        self.raster_height as f64 / self.viewport_height
    }

    /// Maps a page-space selection into raster pixel space.
    ///
    /// Returns `None` when the mapped rectangle rounds to zero on either
    /// axis or lies entirely outside the raster — the degenerate case where
    /// only the annotated full frame is delivered.
    pub fn map_selection(&self, selection: &SelectionRect) -> Option<RasterRect> {
        let ratio_x = self.ratio_x();
        let ratio_y = self.ratio_y();
        if !ratio_x.is_finite() || !ratio_y.is_finite() || ratio_x <= 0.0 || ratio_y <= 0.0 {
            return None;
        }

        let left = (selection.origin_x - self.scroll_x) * ratio_x;
        let top = (selection.origin_y - self.scroll_y) * ratio_y;
        let width = selection.width * ratio_x;
        let height = selection.height * ratio_y;

        if width.round() < 1.0 || height.round() < 1.0 {
            return None;
        }

        // Clamp to the raster; a selection can overhang the viewport edge.
        let raster_width = self.raster_width as f64;
        let raster_height = self.raster_height as f64;
        let x0 = left.round().clamp(0.0, raster_width);
        let y0 = top.round().clamp(0.0, raster_height);
        let x1 = (left + width).round().clamp(0.0, raster_width);
        let y1 = (top + height).round().clamp(0.0, raster_height);

        let clamped_width = x1 - x0;
        let clamped_height = y1 - y0;
        if clamped_width < 1.0 || clamped_height < 1.0 {
            return None;
        }

        Some(RasterRect {
            x: x0 as u32,
            y: y0 as u32,
            width: clamped_width as u32,
            height: clamped_height as u32,
        })
    }

    /// Maps the selection origin to a zero-size marker inside the raster.
    ///
    /// Used to annotate the full frame when the selection itself maps to
    /// nothing.
    fn point_marker(&self, selection: &SelectionRect) -> RasterRect {
        let x = ((selection.origin_x - self.scroll_x) * self.ratio_x())
            .round()
            .clamp(0.0, self.raster_width as f64);
        let y = ((selection.origin_y - self.scroll_y) * self.ratio_y())
            .round()
            .clamp(0.0, self.raster_height as f64);
        RasterRect {
            x: x as u32,
            y: y as u32,
            width: 0,
            height: 0,
        }
    }
}

/// Destination size of the cropped artifact: the page-space selection
/// upsampled by the capture's scale factor.
pub fn destination_size(selection: &SelectionRect, scale_factor: f64) -> (u32, u32) {
    let width = (selection.width * scale_factor).round().max(1.0) as u32;
    let height = (selection.height * scale_factor).round().max(1.0) as u32;
    (width, height)
}

/// Crops the mapped source rectangle out of the raster and scales it to the
/// destination size in one step, like a canvas `drawImage` with distinct
/// source and destination rectangles.
pub fn crop_selection(
    raster: &RasterImage,
    source: &RasterRect,
    dest_width: u32,
    dest_height: u32,
) -> DynamicImage {
    let cropped = raster
        .pixels
        .crop_imm(source.x, source.y, source.width, source.height);
    if cropped.width() == dest_width && cropped.height() == dest_height {
        cropped
    } else {
        cropped.resize_exact(dest_width, dest_height, FilterType::Triangle)
    }
}

/// Draws the boundary annotation onto a copy of the full raster.
pub fn annotate_boundary(
    pixels: &DynamicImage,
    rect: &RasterRect,
    thickness: u32,
    color: Rgba<u8>,
) -> RgbaImage {
    let mut canvas = pixels.to_rgba8();
    stroke_rect(&mut canvas, rect, thickness, color);
    canvas
}

/// Strokes a rectangle centered on its path, clamped to the canvas.
fn stroke_rect(canvas: &mut RgbaImage, rect: &RasterRect, thickness: u32, color: Rgba<u8>) {
    let thickness = thickness.max(1) as i64;
    let inner = thickness / 2;
    let outer = thickness - inner;

    let left = rect.x as i64;
    let top = rect.y as i64;
    let right = left + rect.width as i64;
    let bottom = top + rect.height as i64;

    // Top and bottom bands span the corners.
    fill_band(canvas, left - inner, top - inner, right + outer, top + outer, color);
    fill_band(
        canvas,
        left - inner,
        bottom - inner,
        right + outer,
        bottom + outer,
        color,
    );
    // Side bands.
    fill_band(canvas, left - inner, top - inner, left + outer, bottom + outer, color);
    fill_band(
        canvas,
        right - inner,
        top - inner,
        right + outer,
        bottom + outer,
        color,
    );
}

fn fill_band(canvas: &mut RgbaImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();
    let x0 = x0.clamp(0, width as i64);
    let x1 = x1.clamp(0, width as i64);
    let y0 = y0.clamp(0, height as i64);
    let y1 = y1.clamp(0, height as i64);

    for y in y0..y1 {
        for x in x0..x1 {
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Cropped + annotated artifacts for one capture, already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    /// Cropped selection, absent for degenerate selections.
    pub primary: Option<String>,
    /// Full frame with the boundary annotation.
    pub secondary: String,
}

/// Runs reconciliation, cropping, annotation, and encoding over an acquired
/// raster.
pub fn compose_artifacts(
    raster: &RasterImage,
    selection: &SelectionRect,
    viewport: &ViewportSnapshot,
    scale_factor: f64,
    options: &RenderOptions,
) -> Result<ArtifactSet, CaptureError> {
    let context = ScaleContext::new(viewport, raster);
    let mapped = context.map_selection(selection);

    let primary = match &mapped {
        Some(source) => {
            let (dest_width, dest_height) = destination_size(selection, scale_factor);
            log::debug!(
                "cropping raster region {:?} into {}x{} artifact",
                source,
                dest_width,
                dest_height
            );
            let cropped = crop_selection(raster, source, dest_width, dest_height);
            Some(encode::encode_jpeg_data_url(&cropped, options.jpeg_quality)?)
        }
        None => {
            log::debug!("selection maps to an empty raster region, omitting cropped artifact");
            None
        }
    };

    // The full frame is annotated even for point selections.
    let marker = mapped.unwrap_or_else(|| context.point_marker(selection));
    let annotated = annotate_boundary(
        &raster.pixels,
        &marker,
        options.boundary_thickness,
        options.boundary_color,
    );
    let secondary =
        encode::encode_jpeg_data_url(&DynamicImage::ImageRgba8(annotated), options.jpeg_quality)?;

    Ok(ArtifactSet { primary, secondary })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(width: f64, height: f64, scroll_x: f64, scroll_y: f64) -> ViewportSnapshot {
        ViewportSnapshot {
            width,
            height,
            scroll_x,
            scroll_y,
            device_pixel_ratio: 2.0,
        }
    }

    fn raster(width: u32, height: u32) -> RasterImage {
        RasterImage {
            pixels: DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                width,
                height,
                Rgba([10, 20, 30, 255]),
            )),
            device_pixel_ratio: 2.0,
        }
    }

    fn selection(x: f64, y: f64, width: f64, height: f64) -> SelectionRect {
        SelectionRect {
            origin_x: x,
            origin_y: y,
            width,
            height,
        }
    }

    #[test]
    fn maps_the_reference_viewport_example() {
        // Viewport 1000x800 at dpr 2, raster 2000x1600: a 200x150 page rect
        // at (100, 50) lands at (200, 100) sized 400x300.
        let context = ScaleContext::new(&snapshot(1000.0, 800.0, 0.0, 0.0), &raster(2000, 1600));
        let mapped = context
            .map_selection(&selection(100.0, 50.0, 200.0, 150.0))
            .unwrap();
        assert_eq!(
            mapped,
            RasterRect {
                x: 200,
                y: 100,
                width: 400,
                height: 300
            }
        );

        let (dest_width, dest_height) =
            destination_size(&selection(100.0, 50.0, 200.0, 150.0), 2.0);
        assert_eq!((dest_width, dest_height), (800, 600));
    }

    #[test]
    fn ratios_are_computed_per_axis() {
        // A rasterizer that lands on 1500x1600 for a 1000x800 viewport must
        // map with 1.5 horizontally and 2.0 vertically.
        let context = ScaleContext::new(&snapshot(1000.0, 800.0, 0.0, 0.0), &raster(1500, 1600));
        assert!((context.ratio_x() - 1.5).abs() < f64::EPSILON);
        assert!((context.ratio_y() - 2.0).abs() < f64::EPSILON);

        let mapped = context
            .map_selection(&selection(100.0, 100.0, 200.0, 200.0))
            .unwrap();
        assert_eq!(
            mapped,
            RasterRect {
                x: 150,
                y: 200,
                width: 300,
                height: 400
            }
        );
    }

    #[test]
    fn scroll_offset_is_subtracted_before_scaling() {
        let context = ScaleContext::new(&snapshot(1000.0, 800.0, 40.0, 500.0), &raster(2000, 1600));
        let mapped = context
            .map_selection(&selection(140.0, 550.0, 100.0, 100.0))
            .unwrap();
        assert_eq!(mapped.x, 200);
        assert_eq!(mapped.y, 100);
    }

    #[test]
    fn mapping_is_scale_invariant_within_rounding() {
        let sel = selection(37.0, 91.0, 211.0, 97.0);
        for (raster_width, raster_height) in [(1000, 800), (1337, 901), (2500, 2400), (500, 400)] {
            let context = ScaleContext::new(
                &snapshot(1000.0, 800.0, 0.0, 0.0),
                &raster(raster_width, raster_height),
            );
            let mapped = context.map_selection(&sel).unwrap();
            let expected_width = sel.width * context.ratio_x();
            let expected_height = sel.height * context.ratio_y();
            assert!(
                (mapped.width as f64 - expected_width).abs() <= 1.0,
                "width off for raster {raster_width}x{raster_height}"
            );
            assert!(
                (mapped.height as f64 - expected_height).abs() <= 1.0,
                "height off for raster {raster_width}x{raster_height}"
            );
        }
    }

    #[test]
    fn zero_area_selection_maps_to_none() {
        let context = ScaleContext::new(&snapshot(1000.0, 800.0, 0.0, 0.0), &raster(2000, 1600));
        assert!(context.map_selection(&selection(100.0, 100.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn subpixel_selection_rounds_away_to_none() {
        let context = ScaleContext::new(&snapshot(1000.0, 800.0, 0.0, 0.0), &raster(1000, 800));
        assert!(context.map_selection(&selection(10.0, 10.0, 0.2, 5.0)).is_none());
    }

    #[test]
    fn selection_outside_the_raster_maps_to_none() {
        let context = ScaleContext::new(&snapshot(1000.0, 800.0, 0.0, 0.0), &raster(1000, 800));
        assert!(
            context
                .map_selection(&selection(2000.0, 100.0, 50.0, 50.0))
                .is_none()
        );
    }

    #[test]
    fn overhanging_selection_is_clamped() {
        let context = ScaleContext::new(&snapshot(1000.0, 800.0, 0.0, 0.0), &raster(1000, 800));
        let mapped = context
            .map_selection(&selection(950.0, 750.0, 200.0, 200.0))
            .unwrap();
        assert_eq!(
            mapped,
            RasterRect {
                x: 950,
                y: 750,
                width: 50,
                height: 50
            }
        );
    }

    #[test]
    fn boundary_stroke_marks_edges_not_interior() {
        let pixels = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            100,
            100,
            Rgba([0, 0, 0, 255]),
        ));
        let rect = RasterRect {
            x: 20,
            y: 20,
            width: 40,
            height: 40,
        };
        let red = Rgba([255, 0, 0, 255]);
        let annotated = annotate_boundary(&pixels, &rect, 4, red);

        // On the path, inside the band, well inside, and well outside.
        assert_eq!(*annotated.get_pixel(20, 40), red);
        assert_eq!(*annotated.get_pixel(40, 21), red);
        assert_eq!(*annotated.get_pixel(40, 40), Rgba([0, 0, 0, 255]));
        assert_eq!(*annotated.get_pixel(5, 5), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn boundary_stroke_clamps_at_canvas_edges() {
        let pixels = DynamicImage::ImageRgba8(RgbaImage::new(30, 30));
        let rect = RasterRect {
            x: 0,
            y: 0,
            width: 60,
            height: 60,
        };
        // Must not panic with a rectangle overhanging the canvas.
        let annotated = annotate_boundary(&pixels, &rect, 4, Rgba([255, 0, 0, 255]));
        assert_eq!(annotated.dimensions(), (30, 30));
    }

    #[test]
    fn crop_upsamples_to_destination_size() {
        let context_raster = raster(1000, 800);
        let source = RasterRect {
            x: 100,
            y: 100,
            width: 200,
            height: 150,
        };
        let cropped = crop_selection(&context_raster, &source, 400, 300);
        assert_eq!((cropped.width(), cropped.height()), (400, 300));
    }

    #[test]
    fn compose_produces_both_artifacts() {
        let artifacts = compose_artifacts(
            &raster(2000, 1600),
            &selection(100.0, 50.0, 200.0, 150.0),
            &snapshot(1000.0, 800.0, 0.0, 0.0),
            2.0,
            &RenderOptions::default(),
        )
        .unwrap();

        let primary = artifacts.primary.expect("cropped artifact expected");
        assert!(primary.starts_with("data:image/jpeg;base64,"));
        assert!(artifacts.secondary.starts_with("data:image/jpeg;base64,"));

        let cropped = encode::decode_data_url(&primary).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (800, 600));
        let annotated = encode::decode_data_url(&artifacts.secondary).unwrap();
        assert_eq!((annotated.width(), annotated.height()), (2000, 1600));
    }

    #[test]
    fn compose_omits_primary_for_degenerate_selection() {
        let artifacts = compose_artifacts(
            &raster(2000, 1600),
            &selection(100.0, 50.0, 0.0, 0.0),
            &snapshot(1000.0, 800.0, 0.0, 0.0),
            2.0,
            &RenderOptions::default(),
        )
        .unwrap();
        assert!(artifacts.primary.is_none());
        assert!(artifacts.secondary.starts_with("data:image/jpeg;base64,"));
    }
}
