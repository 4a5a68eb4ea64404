//! PNG encoding.

use signpad_core::{SignatureError, SignatureResult};

/// Encode straight (non-premultiplied) RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> SignatureResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(SignatureError::EmptySurface);
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| SignatureError::Encode(format!("Failed to write PNG header: {}", e)))?;
        writer
            .write_image_data(rgba_data)
            .map_err(|e| SignatureError::Encode(format!("Failed to write PNG data: {}", e)))?;
        writer
            .finish()
            .map_err(|e| SignatureError::Encode(e.to_string()))?;
    }

    Ok(png_data)
}
