//! Normalized input event types for cross-host compatibility.

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (primary selection button)
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Which input device produced a pointer event.
///
/// Hosts map their native mouse and touch events onto this type so that the
/// overlay never has to shape-check raw events. A touch contact is always
/// treated as the primary pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerSource {
    /// A mouse event carrying the pressed/released button.
    Mouse { button: MouseButton },
    /// The first contact of a touch gesture.
    Touch,
}

/// A normalized pointer event in page coordinates.
///
/// `page_x`/`page_y` include the current scroll offset, matching how the
/// selection rectangle is tracked. Hosts convert their native coordinates
/// before forwarding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub source: PointerSource,
    pub page_x: f64,
    pub page_y: f64,
}

impl PointerInput {
    /// Convenience constructor for a mouse event.
    pub fn mouse(button: MouseButton, page_x: f64, page_y: f64) -> Self {
        Self {
            source: PointerSource::Mouse { button },
            page_x,
            page_y,
        }
    }

    /// Convenience constructor for a touch contact.
    pub fn touch(page_x: f64, page_y: f64) -> Self {
        Self {
            source: PointerSource::Touch,
            page_x,
            page_y,
        }
    }

    /// Whether this event may start a selection.
    ///
    /// Only the primary mouse button and touch contacts qualify; secondary
    /// buttons are ignored by the overlay.
    pub fn is_primary(&self) -> bool {
        matches!(
            self.source,
            PointerSource::Mouse {
                button: MouseButton::Left
            } | PointerSource::Touch
        )
    }
}

/// Generic key representation for cross-host compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (unused by the overlay, forwarded by hosts)
    Char(char),
    /// Escape key (cancels an active capture)
    Escape,
    /// Unmapped or unrecognized key
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_detection_covers_mouse_and_touch() {
        assert!(PointerInput::mouse(MouseButton::Left, 0.0, 0.0).is_primary());
        assert!(PointerInput::touch(0.0, 0.0).is_primary());
        assert!(!PointerInput::mouse(MouseButton::Right, 0.0, 0.0).is_primary());
        assert!(!PointerInput::mouse(MouseButton::Middle, 0.0, 0.0).is_primary());
    }
}
