//! Pointer input normalization for mouse and touch events.
//!
//! Host input systems deliver mouse and touch events separately. Both are
//! folded into a single [`PointerEvent`] tagged with its [`PointerSource`],
//! so the capture session only ever sees one kind of event.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Input device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    /// Mouse button pressed or first finger touched down.
    Down,
    /// Pointer moved.
    Move,
    /// Mouse button released or touch ended.
    Up,
    /// Pointer left the drawing region.
    Leave,
}

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are in client (viewport) coordinates, as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    #[serde(default)]
    pub source: PointerSource,
    /// Active contact points. A mouse has exactly one; a touch end
    /// usually reports none.
    #[serde(default)]
    pub contacts: Vec<Point>,
}

impl PointerEvent {
    /// Create a mouse event at the given client position.
    pub fn mouse(phase: PointerPhase, client: Point) -> Self {
        Self {
            phase,
            source: PointerSource::Mouse,
            contacts: vec![client],
        }
    }

    /// Create a touch event from the currently active touches.
    pub fn touch(phase: PointerPhase, touches: impl IntoIterator<Item = Point>) -> Self {
        Self {
            phase,
            source: PointerSource::Touch,
            contacts: touches.into_iter().collect(),
        }
    }

    /// The contact that drives drawing.
    ///
    /// Only the first touch counts; extra fingers are ignored.
    pub fn primary_contact(&self) -> Option<Point> {
        self.contacts.first().copied()
    }
}

/// Map a client position into canvas-local CSS pixels.
///
/// `bounds` is the drawing surface's bounding rectangle in client
/// coordinates. Without geometry (surface not attached) the origin is
/// returned.
pub fn client_to_surface(client: Point, bounds: Option<Rect>) -> Point {
    match bounds {
        Some(rect) => Point::new(client.x - rect.x0, client.y - rect.y0),
        None => Point::ZERO,
    }
}

/// Map the primary contact of an event into canvas-local CSS pixels.
///
/// Returns `None` when the event carries no contact at all.
pub fn map_event(event: &PointerEvent, bounds: Option<Rect>) -> Option<Point> {
    event
        .primary_contact()
        .map(|client| client_to_surface(client, bounds))
}
