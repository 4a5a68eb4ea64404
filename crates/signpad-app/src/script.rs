//! Recorded pointer scripts.
//!
//! A script describes a mount geometry and an ordered list of host
//! interactions (pointer events, resizes, clears). Replaying it drives a
//! real [`SignaturePad`] exactly like a host UI would.

use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use signpad_core::{
    NO_SIGNATURE, PadConfig, PointerEvent, SignatureArtifact, SignatureError, SignaturePad,
    SurfaceGeometry,
};
use signpad_render::RasterSurface;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Script errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Io(String),
    #[error("Invalid script: {0}")]
    Parse(String),
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// Result type for script operations.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// One host interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Deliver a pointer event.
    Event(PointerEvent),
    /// The layout changed size or density.
    Resize {
        width: f64,
        height: f64,
        scale_factor: f64,
    },
    /// The user pressed the clear button.
    Clear,
}

/// A recorded capture session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// CSS width of the drawing region.
    pub width: f64,
    /// CSS height of the drawing region.
    pub height: f64,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    /// Client-space bounds of the region; defaults to the origin.
    #[serde(default)]
    pub bounds: Option<Rect>,
    #[serde(default)]
    pub config: PadConfig,
    pub steps: Vec<ScriptStep>,
}

fn default_scale_factor() -> f64 {
    1.0
}

impl Script {
    /// Parse a script from JSON.
    pub fn from_json(json: &str) -> ScriptResult<Self> {
        serde_json::from_str(json).map_err(|e| ScriptError::Parse(e.to_string()))
    }

    /// Load a script file.
    pub fn load(path: &Path) -> ScriptResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ScriptError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    fn geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry::new(Size::new(self.width, self.height), self.scale_factor)
    }

    fn client_bounds(&self, css_size: Size) -> Rect {
        match self.bounds {
            Some(bounds) => bounds,
            None => Rect::from_origin_size((0.0, 0.0), css_size),
        }
    }
}

/// What a replay produced.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    /// Every value handed to the change listener, in order.
    pub notifications: Vec<String>,
    /// Whether ink remained on the surface at the end.
    pub has_ink: bool,
    /// The surface as it stood after the last step.
    pub final_surface: SignatureArtifact,
}

impl ReplayOutcome {
    /// The signature the form would hold: the last notification, if it
    /// was not a clear.
    pub fn current_signature(&self) -> Option<&str> {
        self.notifications
            .last()
            .map(String::as_str)
            .filter(|s| *s != NO_SIGNATURE)
    }
}

/// Replay `script` through a freshly mounted pad.
pub fn replay(script: &Script) -> ScriptResult<ReplayOutcome> {
    let notifications: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = notifications.clone();

    let mut geometry = script.geometry();
    let mut pad = SignaturePad::mount(
        RasterSurface::new(),
        geometry,
        &script.config,
        move |signature| sink.borrow_mut().push(signature),
    )?;

    for step in &script.steps {
        match step {
            ScriptStep::Event(event) => {
                let bounds = script.client_bounds(geometry.css_size);
                pad.handle_event(event, Some(bounds));
            }
            ScriptStep::Resize {
                width,
                height,
                scale_factor,
            } => {
                geometry = SurfaceGeometry::new(Size::new(*width, *height), *scale_factor);
                pad.resize(geometry);
            }
            ScriptStep::Clear => pad.clear(),
        }
    }

    let final_surface = pad.export()?;
    let has_ink = pad.has_ink();
    drop(pad.unmount());

    let notifications = notifications.take();
    Ok(ReplayOutcome {
        notifications,
        has_ink,
        final_surface,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGN_AND_RELEASE: &str = r#"{
        "width": 300,
        "height": 150,
        "scale_factor": 2,
        "steps": [
            {"event": {"phase": "down", "contacts": [{"x": 10, "y": 10}]}},
            {"event": {"phase": "move", "contacts": [{"x": 50, "y": 10}]}},
            {"event": {"phase": "move", "contacts": [{"x": 50, "y": 40}]}},
            {"event": {"phase": "up", "contacts": [{"x": 50, "y": 40}]}}
        ]
    }"#;

    #[test]
    fn test_replay_signature() {
        let script = Script::from_json(SIGN_AND_RELEASE).unwrap();
        let outcome = replay(&script).unwrap();

        assert!(outcome.has_ink);
        assert_eq!(outcome.notifications.len(), 1);
        let signature = outcome.current_signature().unwrap();
        let artifact = SignatureArtifact::from_data_uri(signature).unwrap();
        assert_eq!((artifact.width(), artifact.height()), (600, 300));
        assert_eq!(
            (outcome.final_surface.width(), outcome.final_surface.height()),
            (600, 300)
        );
    }

    #[test]
    fn test_replay_with_clear_and_resize() {
        let mut script = Script::from_json(SIGN_AND_RELEASE).unwrap();
        script.steps.push(ScriptStep::Clear);
        script.steps.push(ScriptStep::Resize {
            width: 200.0,
            height: 100.0,
            scale_factor: 1.0,
        });
        let outcome = replay(&script).unwrap();

        assert!(!outcome.has_ink);
        assert_eq!(outcome.notifications.len(), 2);
        assert!(outcome.current_signature().is_none());
        assert_eq!(outcome.final_surface.width(), 200);
    }

    #[test]
    fn test_touch_script_with_offset_bounds() {
        let script = Script::from_json(
            r#"{
                "width": 100,
                "height": 50,
                "bounds": {"x0": 40, "y0": 60, "x1": 140, "y1": 110},
                "steps": [
                    {"event": {"phase": "down", "source": "touch", "contacts": [{"x": 45, "y": 67}]}},
                    {"event": {"phase": "move", "source": "touch", "contacts": [{"x": 90, "y": 67}]}},
                    {"event": {"phase": "up", "source": "touch"}}
                ]
            }"#,
        )
        .unwrap();
        let outcome = replay(&script).unwrap();
        assert!(outcome.has_ink);
        assert_eq!(outcome.notifications.len(), 1);
    }

    #[test]
    fn test_invalid_script() {
        assert!(matches!(
            Script::from_json(r#"{"width": 10}"#),
            Err(ScriptError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_size_script_fails_export() {
        let script = Script::from_json(r#"{"width": 0, "height": 0, "steps": []}"#).unwrap();
        assert!(matches!(
            replay(&script),
            Err(ScriptError::Signature(SignatureError::EmptySurface))
        ));
    }

    #[test]
    fn test_load_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        std::fs::write(&path, SIGN_AND_RELEASE).unwrap();

        let script = Script::load(&path).unwrap();
        assert_eq!(script.steps.len(), 4);
        assert!(matches!(
            Script::load(&dir.path().join("missing.json")),
            Err(ScriptError::Io(_))
        ));
    }
}
