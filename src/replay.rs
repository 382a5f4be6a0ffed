//! Headless replay harness.
//!
//! Runs the reconciliation, cropping, annotation, and encoding stages
//! against a stored viewport raster, so capture geometry can be verified
//! without a live host. Used by the `pagesnip` binary.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use crate::capture::{RasterImage, compose_artifacts, encode};
use crate::config::Config;
use crate::overlay::{SelectionRect, ViewportSnapshot};

/// Inputs for one replayed capture.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Stored viewport raster (PNG or JPEG).
    pub raster_path: PathBuf,
    /// Viewport size in CSS pixels.
    pub viewport: (f64, f64),
    /// Scroll offset at finalize time.
    pub scroll: (f64, f64),
    /// Device pixel ratio of the raster; non-positive means unreported.
    pub device_pixel_ratio: f64,
    /// Selection rectangle in page coordinates.
    pub selection: SelectionRect,
    /// Directory the artifacts are written to.
    pub out_dir: PathBuf,
}

/// Where the replayed artifacts landed.
#[derive(Debug, Clone)]
pub struct ReplaySummary {
    /// Cropped artifact path; absent for degenerate selections.
    pub primary_path: Option<PathBuf>,
    /// Annotated full-frame artifact path.
    pub secondary_path: PathBuf,
    /// Scale factor the replay ran with.
    pub scale_factor: f64,
}

/// Replays one capture over the stored raster and writes the artifacts.
pub fn run_replay(options: &ReplayOptions, config: &Config) -> Result<ReplaySummary> {
    let pixels = image::open(&options.raster_path).with_context(|| {
        format!(
            "failed to load raster from {}",
            options.raster_path.display()
        )
    })?;

    let viewport = ViewportSnapshot {
        width: options.viewport.0,
        height: options.viewport.1,
        scroll_x: options.scroll.0,
        scroll_y: options.scroll.1,
        device_pixel_ratio: options.device_pixel_ratio,
    };
    let scale_factor = viewport.scale_factor(config.capture.fallback_scale);
    let raster = RasterImage {
        pixels,
        device_pixel_ratio: scale_factor,
    };

    log::info!(
        "replaying {:.0}x{:.0} selection over {}x{} raster (scale {:.2})",
        options.selection.width,
        options.selection.height,
        raster.width(),
        raster.height(),
        scale_factor
    );

    let artifacts = compose_artifacts(
        &raster,
        &options.selection,
        &viewport,
        scale_factor,
        &config.capture.render_options(),
    )?;

    if !options.out_dir.exists() {
        log::info!("creating output directory {}", options.out_dir.display());
        fs::create_dir_all(&options.out_dir)?;
    }

    let stamp = Local::now().format("capture_%Y-%m-%d_%H%M%S").to_string();

    let primary_path = match &artifacts.primary {
        Some(data_url) => {
            let path = options.out_dir.join(format!("{stamp}_primary.jpg"));
            fs::write(&path, encode::data_url_bytes(data_url)?)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Some(path)
        }
        None => {
            log::warn!("selection maps to an empty region; only the annotated frame is written");
            None
        }
    };

    let secondary_path = options.out_dir.join(format!("{stamp}_secondary.jpg"));
    fs::write(&secondary_path, encode::data_url_bytes(&artifacts.secondary)?)
        .with_context(|| format!("failed to write {}", secondary_path.display()))?;

    Ok(ReplaySummary {
        primary_path,
        secondary_path,
        scale_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_raster(dir: &TempDir, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join("viewport.png");
        RgbaImage::from_pixel(width, height, Rgba([120, 130, 140, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn replay_writes_both_artifacts() {
        let dir = TempDir::new().unwrap();
        let options = ReplayOptions {
            raster_path: write_raster(&dir, 2000, 1600),
            viewport: (1000.0, 800.0),
            scroll: (0.0, 0.0),
            device_pixel_ratio: 2.0,
            selection: SelectionRect {
                origin_x: 100.0,
                origin_y: 50.0,
                width: 200.0,
                height: 150.0,
            },
            out_dir: dir.path().join("out"),
        };

        let summary = run_replay(&options, &Config::default()).unwrap();
        assert_eq!(summary.scale_factor, 2.0);

        let primary = image::open(summary.primary_path.unwrap()).unwrap();
        assert_eq!((primary.width(), primary.height()), (800, 600));
        let secondary = image::open(summary.secondary_path).unwrap();
        assert_eq!((secondary.width(), secondary.height()), (2000, 1600));
    }

    #[test]
    fn degenerate_replay_writes_only_the_annotated_frame() {
        let dir = TempDir::new().unwrap();
        let options = ReplayOptions {
            raster_path: write_raster(&dir, 1000, 800),
            viewport: (1000.0, 800.0),
            scroll: (0.0, 0.0),
            device_pixel_ratio: 0.0,
            selection: SelectionRect {
                origin_x: 10.0,
                origin_y: 10.0,
                width: 0.0,
                height: 0.0,
            },
            out_dir: dir.path().join("out"),
        };

        let summary = run_replay(&options, &Config::default()).unwrap();
        assert!(summary.primary_path.is_none());
        assert!(summary.secondary_path.exists());
        // Unreported ratio falls back to the configured scale.
        assert_eq!(summary.scale_factor, 2.0);
    }

    #[test]
    fn missing_raster_is_a_readable_error() {
        let dir = TempDir::new().unwrap();
        let options = ReplayOptions {
            raster_path: dir.path().join("nope.png"),
            viewport: (1000.0, 800.0),
            scroll: (0.0, 0.0),
            device_pixel_ratio: 2.0,
            selection: SelectionRect {
                origin_x: 0.0,
                origin_y: 0.0,
                width: 10.0,
                height: 10.0,
            },
            out_dir: dir.path().join("out"),
        };

        let err = run_replay(&options, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("failed to load raster"));
    }
}
