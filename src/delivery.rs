//! Result delivery to the consuming UI layer.
//!
//! The pipeline emits a single event per capture carrying an ordered list
//! of named artifacts: the cropped selection first (when one exists), then
//! the annotated full frame. Delivery is fire-and-forget — an absent or
//! closed UI listener is indistinguishable from successful delivery and
//! never fails the pipeline.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::capture::ArtifactSet;

/// Role of an artifact within a capture event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactName {
    /// The cropped selection.
    Primary,
    /// The annotated full frame.
    Secondary,
}

/// One encoded artifact with its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedArtifact {
    pub name: ArtifactName,
    /// Encoded image as a data URL.
    pub image: String,
}

/// Notification event dispatched to whatever UI layer is listening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenshotEvent {
    pub screenshots: Vec<NamedArtifact>,
}

impl ScreenshotEvent {
    /// Orders the artifacts: primary first when present, secondary always.
    pub fn from_artifacts(artifacts: ArtifactSet) -> Self {
        let mut screenshots = Vec::with_capacity(2);
        if let Some(primary) = artifacts.primary {
            screenshots.push(NamedArtifact {
                name: ArtifactName::Primary,
                image: primary,
            });
        }
        screenshots.push(NamedArtifact {
            name: ArtifactName::Secondary,
            image: artifacts.secondary,
        });
        Self { screenshots }
    }
}

/// Sends the event to the UI layer without awaiting acknowledgment.
pub(crate) fn dispatch(ui: &mpsc::UnboundedSender<ScreenshotEvent>, artifacts: ArtifactSet) {
    let event = ScreenshotEvent::from_artifacts(artifacts);
    log::info!("delivering {} screenshot artifact(s)", event.screenshots.len());
    if ui.send(event).is_err() {
        log::debug!("no UI listener for screenshot event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_precedes_secondary_when_present() {
        let event = ScreenshotEvent::from_artifacts(ArtifactSet {
            primary: Some("data:p".to_string()),
            secondary: "data:s".to_string(),
        });
        assert_eq!(event.screenshots.len(), 2);
        assert_eq!(event.screenshots[0].name, ArtifactName::Primary);
        assert_eq!(event.screenshots[1].name, ArtifactName::Secondary);
    }

    #[test]
    fn degenerate_capture_carries_only_the_secondary() {
        let event = ScreenshotEvent::from_artifacts(ArtifactSet {
            primary: None,
            secondary: "data:s".to_string(),
        });
        assert_eq!(event.screenshots.len(), 1);
        assert_eq!(event.screenshots[0].name, ArtifactName::Secondary);
    }

    #[test]
    fn event_serializes_to_the_ui_wire_shape() {
        let event = ScreenshotEvent::from_artifacts(ArtifactSet {
            primary: Some("data:p".to_string()),
            secondary: "data:s".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({
                "screenshots": [
                    { "name": "primary", "image": "data:p" },
                    { "name": "secondary", "image": "data:s" },
                ]
            })
        );
    }

    #[test]
    fn dispatch_tolerates_a_missing_listener() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        // Must not panic or error.
        dispatch(
            &tx,
            ArtifactSet {
                primary: None,
                secondary: "data:s".to_string(),
            },
        );
    }
}
