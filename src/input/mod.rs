//! Normalized input events shared by the overlay and its hosts.

pub mod events;

pub use events::{Key, MouseButton, PointerInput, PointerSource};
