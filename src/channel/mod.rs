//! Messaging channel to the privileged background context.
//!
//! The capture engine runs inside an unprivileged page context; whole-tab
//! capture and capability checks live behind an asynchronous
//! request/response channel to the extension's background context. Hosts
//! implement [`PrivilegedChannel`] over their actual transport; the serde
//! shapes below pin the JSON wire format end to end.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors crossing the privileged channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The transport itself failed (context gone, port closed).
    #[error("channel transport failed: {0}")]
    Transport(String),

    /// The peer answered with something the engine cannot interpret.
    #[error("malformed channel response: {0}")]
    InvalidResponse(String),
}

/// Request messages, tagged with an `action` discriminator on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ChannelRequest {
    /// Is a native whole-tab capture capability available?
    CheckNativeCapture,
    /// Capture the visible tab, returning an encoded image.
    CaptureVisibleTab,
}

/// Response payloads. Untagged on the wire: each variant is identified by
/// its required fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelResponse {
    /// Answer to [`ChannelRequest::CheckNativeCapture`].
    #[serde(rename_all = "camelCase")]
    Availability { is_available: bool },

    /// Answer to [`ChannelRequest::CaptureVisibleTab`].
    #[serde(rename_all = "camelCase")]
    Capture {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

/// Fire-and-forget notifications, tagged with a `type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelNotice {
    /// The user exited capture mode without completing a selection.
    ExitCapture,
}

/// Asynchronous channel to the privileged background context.
///
/// Requests are one-shot: at most one response per request, no streaming.
/// `notify` never waits for acknowledgment.
#[async_trait]
pub trait PrivilegedChannel: Send + Sync {
    async fn request(&self, request: ChannelRequest) -> Result<ChannelResponse, ChannelError>;

    fn notify(&self, notice: ChannelNotice);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_serialize_to_action_tags() {
        assert_eq!(
            serde_json::to_value(ChannelRequest::CheckNativeCapture).unwrap(),
            serde_json::json!({ "action": "checkNativeCapture" })
        );
        assert_eq!(
            serde_json::to_value(ChannelRequest::CaptureVisibleTab).unwrap(),
            serde_json::json!({ "action": "captureVisibleTab" })
        );
    }

    #[test]
    fn availability_response_round_trips() {
        let parsed: ChannelResponse =
            serde_json::from_str(r#"{ "isAvailable": true }"#).unwrap();
        assert_eq!(parsed, ChannelResponse::Availability { is_available: true });
    }

    #[test]
    fn capture_response_round_trips_with_optional_fields() {
        let parsed: ChannelResponse = serde_json::from_str(
            r#"{ "success": true, "dataUrl": "data:image/png;base64,AAAA" }"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            ChannelResponse::Capture {
                success: true,
                data_url: Some("data:image/png;base64,AAAA".to_string()),
                message: None,
            }
        );

        let refused: ChannelResponse =
            serde_json::from_str(r#"{ "success": false, "message": "tab not visible" }"#).unwrap();
        assert_eq!(
            refused,
            ChannelResponse::Capture {
                success: false,
                data_url: None,
                message: Some("tab not visible".to_string()),
            }
        );
    }

    #[test]
    fn exit_notice_uses_screaming_type_tag() {
        assert_eq!(
            serde_json::to_value(ChannelNotice::ExitCapture).unwrap(),
            serde_json::json!({ "type": "EXIT_CAPTURE" })
        );
    }
}
