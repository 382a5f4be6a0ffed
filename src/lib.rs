//! Region screenshot capture engine for embedded page views.
//!
//! pagesnip owns the full gesture-to-artifact flow of a page-activity
//! recorder: an interactive selection overlay, a two-path image acquisition
//! strategy (native tab capture with a client-side rasterization fallback),
//! coordinate reconciliation between page space and device-pixel raster
//! space, cropping and boundary annotation, and fire-and-forget delivery of
//! the finished artifacts to a UI layer.
//!
//! Hosts integrate by implementing four traits and wiring them into a
//! [`CaptureController`]:
//! - [`overlay::OverlaySurface`] mounts the visual overlay artifacts
//! - [`overlay::ViewportMetrics`] reports page geometry
//! - [`channel::PrivilegedChannel`] reaches the privileged background
//!   context
//! - [`capture::Rasterizer`] renders the viewport when native capture is
//!   unavailable

pub mod capture;
pub mod channel;
pub mod config;
pub mod controller;
pub mod delivery;
pub mod input;
pub mod overlay;
pub mod record;
pub mod replay;
pub mod util;

pub use config::Config;
pub use controller::{BeginError, CaptureController};
