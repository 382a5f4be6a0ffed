//! Encoded-image helpers: data URLs in, JPEG data URLs out.

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{DynamicImage, codecs::jpeg::JpegEncoder};

use super::types::CaptureError;

/// Extracts the raw bytes from a base64 data URL.
pub(crate) fn data_url_bytes(data_url: &str) -> Result<Vec<u8>, CaptureError> {
    let payload = data_url
        .split_once("base64,")
        .map(|(_, payload)| payload)
        .ok_or_else(|| CaptureError::InvalidDataUrl("missing base64 payload".to_string()))?;

    BASE64
        .decode(payload.trim())
        .map_err(|e| CaptureError::InvalidDataUrl(format!("bad base64 payload: {e}")))
}

/// Decodes a data URL into pixels.
pub(crate) fn decode_data_url(data_url: &str) -> Result<DynamicImage, CaptureError> {
    let bytes = data_url_bytes(data_url)?;
    if bytes.is_empty() {
        return Err(CaptureError::EmptyCapture);
    }
    Ok(image::load_from_memory(&bytes)?)
}

/// Encodes pixels as a `data:image/jpeg;base64,…` string.
pub(crate) fn encode_jpeg_data_url(
    image: &DynamicImage,
    quality: u8,
) -> Result<String, CaptureError> {
    // JPEG carries no alpha channel.
    let rgb = image.to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(Cursor::new(&mut bytes), quality).encode_image(&rgb)?;
    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&bytes)))
}
