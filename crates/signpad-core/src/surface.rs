//! Raster surface abstraction.
//!
//! The pad owns exactly one [`Surface`]. Implementations hold a pixel
//! buffer at physical resolution and address it in CSS pixels through a
//! uniform scale transform.

use crate::config::SurfaceStyle;
use crate::error::SignatureResult;
use kurbo::{Affine, Line, Size};

/// Displayed size and pixel density of the drawing region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    /// Layout size in CSS pixels.
    pub css_size: Size,
    /// Device pixel ratio.
    pub scale_factor: f64,
}

impl SurfaceGeometry {
    /// Create a geometry from a CSS size and device pixel ratio.
    pub fn new(css_size: Size, scale_factor: f64) -> Self {
        Self {
            css_size,
            scale_factor,
        }
    }

    /// Backing store resolution: CSS size times scale, truncated.
    ///
    /// Negative, NaN or infinite inputs collapse to zero.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            to_pixels(self.css_size.width * self.scale_factor),
            to_pixels(self.css_size.height * self.scale_factor),
        )
    }

    /// CSS-pixel to physical-pixel transform.
    pub fn transform(&self) -> Affine {
        if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            Affine::scale(self.scale_factor)
        } else {
            Affine::IDENTITY
        }
    }
}

fn to_pixels(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Trait for raster backends the pad draws onto.
pub trait Surface {
    /// Reallocate the backing store for `geometry`, reset the transform to
    /// its scale, apply `style` and fill with the background.
    fn configure(&mut self, geometry: SurfaceGeometry, style: &SurfaceStyle);

    /// Repaint the whole backing store with the background color.
    fn fill_background(&mut self);

    /// Stroke one straight segment in CSS pixels.
    ///
    /// Returns `false` when nothing could be drawn (no backing store).
    fn stroke_segment(&mut self, segment: Line) -> bool;

    /// Backing store resolution in physical pixels.
    fn physical_size(&self) -> (u32, u32);

    /// Encode the current pixels as PNG.
    fn encode_png(&self) -> SignatureResult<Vec<u8>>;
}
