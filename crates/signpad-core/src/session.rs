//! Capture session state machine.
//!
//! Tracks whether a stroke is in progress and whether any ink has been
//! deposited since the last clear. The session never touches pixels; it
//! tells the caller which segment to draw and whether a finished stroke
//! should be exported.

use kurbo::{Line, Point};

/// State of the capture session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SessionState {
    /// Waiting for a pointer down.
    #[default]
    Idle,
    /// A stroke is in progress.
    Drawing {
        /// Last sampled point of the current stroke.
        last_point: Point,
    },
}

/// Outcome of ending a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeEnd {
    /// No stroke was active; nothing happened.
    Ignored,
    /// The stroke ended with no ink on the surface; nothing to export.
    Discard,
    /// The stroke ended with ink on the surface; export and notify.
    Commit,
}

/// Per-widget capture session.
#[derive(Debug, Clone, Default)]
pub struct CaptureSession {
    state: SessionState,
    has_ink: bool,
}

impl CaptureSession {
    /// Create an idle session with no ink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stroke is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Drawing { .. })
    }

    /// Whether any ink has been deposited since the last clear.
    pub fn has_ink(&self) -> bool {
        self.has_ink
    }

    /// `Idle -> Drawing`. Records the start point without depositing ink.
    ///
    /// A down while already drawing restarts the stroke at `point`.
    pub fn begin(&mut self, point: Point) {
        log::debug!("stroke begin at ({:.1}, {:.1})", point.x, point.y);
        self.state = SessionState::Drawing { last_point: point };
    }

    /// `Drawing -> Drawing`. Returns the segment to draw, or `None` when idle.
    ///
    /// The caller reports back with [`CaptureSession::record_ink`] once the
    /// segment actually landed on the surface.
    pub fn extend(&mut self, point: Point) -> Option<Line> {
        match &mut self.state {
            SessionState::Drawing { last_point } => {
                let segment = Line::new(*last_point, point);
                *last_point = point;
                Some(segment)
            }
            SessionState::Idle => None,
        }
    }

    /// Mark that ink has been deposited.
    pub fn record_ink(&mut self) {
        self.has_ink = true;
    }

    /// `Drawing -> Idle`. Decides whether the finished stroke is exported.
    pub fn end(&mut self) -> StrokeEnd {
        match self.state {
            SessionState::Idle => StrokeEnd::Ignored,
            SessionState::Drawing { .. } => {
                self.state = SessionState::Idle;
                if self.has_ink {
                    StrokeEnd::Commit
                } else {
                    StrokeEnd::Discard
                }
            }
        }
    }

    /// Forget deposited ink without touching the stroke state.
    ///
    /// Used when the surface is reallocated under an in-progress stroke.
    pub fn reset_ink(&mut self) {
        self.has_ink = false;
    }

    /// Force `Idle` with no ink, from any state.
    pub fn clear(&mut self) {
        self.state = SessionState::Idle;
        self.has_ink = false;
    }
}
