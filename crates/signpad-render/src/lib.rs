//! Signpad Render Library
//!
//! CPU raster [`Surface`](signpad_core::Surface) implementation for the
//! signature pad, built on tiny-skia, with PNG export.

mod encode;
mod raster;

pub use encode::encode_png;
pub use raster::RasterSurface;
