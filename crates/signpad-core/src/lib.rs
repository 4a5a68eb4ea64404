//! Signpad Core Library
//!
//! Platform-agnostic signature capture engine: pointer normalization,
//! coordinate mapping, the capture session state machine and the
//! signature pad widget that drives a raster [`Surface`].

pub mod artifact;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod pad;
pub mod session;
pub mod surface;

pub use artifact::{NO_SIGNATURE, PNG_DATA_URI_PREFIX, SignatureArtifact, signature_object_path};
pub use config::{PadConfig, ResizePolicy, SurfaceStyle, parse_color};
pub use error::{SignatureError, SignatureResult};
pub use input::{PointerEvent, PointerPhase, PointerSource, client_to_surface, map_event};
pub use pad::{SignatureListener, SignaturePad};
pub use session::{CaptureSession, SessionState, StrokeEnd};
pub use surface::{Surface, SurfaceGeometry};
