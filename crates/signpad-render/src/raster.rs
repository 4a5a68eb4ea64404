//! tiny-skia backed raster surface.

use crate::encode::encode_png;
use kurbo::Line;
use signpad_core::{SignatureError, SignatureResult, Surface, SurfaceGeometry, SurfaceStyle};
use tiny_skia::{
    Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

/// CPU raster surface.
///
/// Holds a pixmap at physical resolution. Drawing happens in CSS pixels
/// through a uniform scale transform that is rebuilt on every
/// [`Surface::configure`].
#[derive(Debug, Clone)]
pub struct RasterSurface {
    /// `None` until configured, and for zero-area geometry.
    pixmap: Option<Pixmap>,
    transform: Transform,
    style: SurfaceStyle,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterSurface {
    /// Create an unconfigured surface with no pixels.
    pub fn new() -> Self {
        Self {
            pixmap: None,
            transform: Transform::identity(),
            style: SurfaceStyle::default(),
        }
    }

    /// The backing pixmap, if any.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Straight RGBA of the physical pixel at `(x, y)`.
    pub fn pixel_rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let pixel = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()])
    }

    /// Whether every pixel equals the background color.
    pub fn is_blank(&self) -> bool {
        let background = self.style.background_rgba8();
        self.pixmap.as_ref().is_none_or(|pixmap| {
            pixmap.pixels().iter().all(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()] == background
            })
        })
    }

    /// Count of pixels that differ from the background.
    pub fn ink_pixel_count(&self) -> usize {
        let background = self.style.background_rgba8();
        self.pixmap.as_ref().map_or(0, |pixmap| {
            pixmap
                .pixels()
                .iter()
                .filter(|p| {
                    let c = p.demultiply();
                    [c.red(), c.green(), c.blue(), c.alpha()] != background
                })
                .count()
        })
    }

    /// Straight RGBA bytes of the whole backing store, row-major.
    pub fn rgba_data(&self) -> Vec<u8> {
        let Some(pixmap) = &self.pixmap else {
            return Vec::new();
        };
        let mut data = Vec::with_capacity(pixmap.data().len());
        for p in pixmap.pixels() {
            let c = p.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        data
    }

    fn stroke_paint(&self) -> Paint<'static> {
        let [r, g, b, a] = self.style.stroke_rgba8();
        let mut paint = Paint {
            anti_alias: true,
            ..Default::default()
        };
        paint.set_color_rgba8(r, g, b, a);
        paint
    }

    fn stroke(&self) -> Stroke {
        Stroke {
            width: self.style.stroke_width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        }
    }
}

impl Surface for RasterSurface {
    fn configure(&mut self, geometry: SurfaceGeometry, style: &SurfaceStyle) {
        let (width, height) = geometry.physical_size();
        self.pixmap = Pixmap::new(width, height);
        if self.pixmap.is_none() {
            log::debug!("surface has no pixels at {}x{}", width, height);
        }

        // Scale must follow every reallocation or ink lands mis-scaled.
        let [sx, _, _, sy, _, _] = geometry.transform().as_coeffs();
        self.transform = Transform::from_scale(sx as f32, sy as f32);
        self.style = *style;
        self.fill_background();
    }

    fn fill_background(&mut self) {
        let [r, g, b, a] = self.style.background_rgba8();
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.fill(Color::from_rgba8(r, g, b, a));
        }
    }

    fn stroke_segment(&mut self, segment: Line) -> bool {
        if self.pixmap.is_none() {
            return false;
        }
        // Zero-length segments leave no mark, like a canvas stroke.
        if segment.p0 == segment.p1 {
            return true;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(segment.p0.x as f32, segment.p0.y as f32);
        builder.line_to(segment.p1.x as f32, segment.p1.y as f32);
        let Some(path) = builder.finish() else {
            return true;
        };

        let paint = self.stroke_paint();
        let stroke = self.stroke();
        let transform = self.transform;
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }
        true
    }

    fn physical_size(&self) -> (u32, u32) {
        self.pixmap
            .as_ref()
            .map_or((0, 0), |pixmap| (pixmap.width(), pixmap.height()))
    }

    fn encode_png(&self) -> SignatureResult<Vec<u8>> {
        let (width, height) = self.physical_size();
        if width == 0 || height == 0 {
            return Err(SignatureError::EmptySurface);
        }
        encode_png(&self.rgba_data(), width, height)
    }
}
