//! Exported signature images and their data-URI form.

use crate::error::{SignatureError, SignatureResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Sentinel handed to the listener when no signature is captured.
pub const NO_SIGNATURE: &str = "";

/// Data URI prefix for PNG payloads.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// An encoded snapshot of the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureArtifact {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl SignatureArtifact {
    /// Wrap PNG bytes after decoding them in full.
    ///
    /// Truncated or corrupt images are rejected, not only bad headers.
    pub fn from_png(png: Vec<u8>) -> SignatureResult<Self> {
        let (width, height) = decode_dimensions(&png)?;
        Ok(Self { png, width, height })
    }

    /// Decode a `data:image/png;base64,` URI.
    pub fn from_data_uri(uri: &str) -> SignatureResult<Self> {
        let payload = uri.trim().strip_prefix(PNG_DATA_URI_PREFIX).ok_or_else(|| {
            SignatureError::InvalidDataUri("expected a base64 PNG data URI".to_string())
        })?;
        let png = STANDARD
            .decode(payload)
            .map_err(|e| SignatureError::InvalidDataUri(e.to_string()))?;
        Self::from_png(png)
    }

    /// Encode as a data URI, the form handed to the form state.
    pub fn to_data_uri(&self) -> String {
        let mut uri = String::with_capacity(PNG_DATA_URI_PREFIX.len() + self.png.len() * 4 / 3 + 4);
        uri.push_str(PNG_DATA_URI_PREFIX);
        STANDARD.encode_string(&self.png, &mut uri);
        uri
    }

    /// Raw PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Take the PNG bytes.
    pub fn into_png(self) -> Vec<u8> {
        self.png
    }

    /// Width in physical pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in physical pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Storage object path for an uploaded signature.
pub fn signature_object_path(delivery_id: &str, timestamp_ms: u128) -> String {
    let safe_id: String = delivery_id
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("signatures/{}-signature-{}.png", safe_id, timestamp_ms)
}

/// Decode a PNG through to its end chunk and return its dimensions.
fn decode_dimensions(png: &[u8]) -> SignatureResult<(u32, u32)> {
    let invalid = |e: png::DecodingError| SignatureError::InvalidDataUri(format!("invalid PNG: {}", e));

    let mut reader = png::Decoder::new(png).read_info().map_err(invalid)?;
    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    if width == 0 || height == 0 {
        return Err(SignatureError::InvalidDataUri("zero-sized image".to_string()));
    }

    let mut buf = vec![0; reader.output_buffer_size()];
    reader.next_frame(&mut buf).map_err(invalid)?;
    reader.finish().map_err(invalid)?;
    Ok((width, height))
}
