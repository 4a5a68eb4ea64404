//! Retained stroke history for replaying ink onto a resized surface.

use kurbo::{Line, Point};

/// One continuous run of deposited segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stroke {
    /// Points in canvas-local CSS pixels.
    pub points: Vec<Point>,
}

impl Stroke {
    /// Straight segments between consecutive samples.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|w| Line::new(w[0], w[1]))
    }
}

/// Ink actually deposited since the last clear.
///
/// Only segments the surface accepted are recorded, so a replay never
/// produces ink the listener has not seen.
#[derive(Debug, Clone, Default)]
pub struct StrokeHistory {
    strokes: Vec<Stroke>,
}

impl StrokeHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deposited segment.
    ///
    /// Continues the last stroke when the segment starts where it ended,
    /// otherwise starts a new one.
    pub fn record(&mut self, segment: Line) {
        match self.strokes.last_mut() {
            Some(stroke) if stroke.points.last() == Some(&segment.p0) => {
                stroke.points.push(segment.p1);
            }
            _ => self.strokes.push(Stroke {
                points: vec![segment.p0, segment.p1],
            }),
        }
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Every segment of every stroke, in drawing order.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.strokes.iter().flat_map(Stroke::segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connected_segments_share_a_stroke() {
        let mut history = StrokeHistory::new();
        history.record(Line::new((10.0, 10.0), (50.0, 10.0)));
        history.record(Line::new((50.0, 10.0), (50.0, 40.0)));

        assert_eq!(history.strokes.len(), 1);
        assert_eq!(history.strokes[0].points.len(), 3);
        assert_eq!(history.segments().count(), 2);
    }

    #[test]
    fn test_gap_starts_new_stroke() {
        let mut history = StrokeHistory::new();
        history.record(Line::new((0.0, 0.0), (1.0, 0.0)));
        history.record(Line::new((1.0, 0.0), (2.0, 0.0)));
        history.record(Line::new((5.0, 5.0), (6.0, 6.0)));

        let segments: Vec<Line> = history.segments().collect();
        assert_eq!(history.strokes.len(), 2);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].p0, Point::new(5.0, 5.0));

        history.clear();
        assert_eq!(history.segments().count(), 0);
    }

    #[test]
    fn test_empty_stroke() {
        let stroke = Stroke::default();
        assert_eq!(stroke.segments().count(), 0);
    }
}
