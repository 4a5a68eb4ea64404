//! The signature pad widget.
//!
//! [`SignaturePad`] ties the pieces together: pointer events are mapped to
//! surface coordinates, fed through the [`CaptureSession`] and drawn onto
//! the owned [`Surface`]. Finished strokes with ink are exported and handed
//! to the listener as a PNG data URI; clearing hands over the empty string.

use crate::artifact::{NO_SIGNATURE, SignatureArtifact};
use crate::config::{PadConfig, ResizePolicy, SurfaceStyle};
use crate::error::SignatureResult;
use crate::history::StrokeHistory;
use crate::input::{PointerEvent, PointerPhase, map_event};
use crate::session::{CaptureSession, StrokeEnd};
use crate::surface::{Surface, SurfaceGeometry};
use kurbo::{Point, Rect};

/// Change listener: receives `""` on clear, otherwise a PNG data URI.
pub type SignatureListener = Box<dyn FnMut(String)>;

/// A mounted signature capture widget.
///
/// Construct with [`SignaturePad::mount`]; dropping it (or calling
/// [`SignaturePad::unmount`]) ends its lifetime.
pub struct SignaturePad<S: Surface> {
    surface: S,
    style: SurfaceStyle,
    resize_policy: ResizePolicy,
    session: CaptureSession,
    history: StrokeHistory,
    listener: SignatureListener,
}

impl<S: Surface> SignaturePad<S> {
    /// Mount the pad onto `surface` and prepare it for drawing.
    pub fn mount(
        mut surface: S,
        geometry: SurfaceGeometry,
        config: &PadConfig,
        listener: impl FnMut(String) + 'static,
    ) -> SignatureResult<Self> {
        let style = config.style()?;
        surface.configure(geometry, &style);

        let (width, height) = surface.physical_size();
        log::info!(
            "Signature pad mounted: {}x{} CSS px at {}x -> {}x{}",
            geometry.css_size.width,
            geometry.css_size.height,
            geometry.scale_factor,
            width,
            height
        );

        Ok(Self {
            surface,
            style,
            resize_policy: config.resize_policy,
            session: CaptureSession::new(),
            history: StrokeHistory::new(),
            listener: Box::new(listener),
        })
    }

    /// Tear the pad down and hand back its surface.
    pub fn unmount(self) -> S {
        log::info!("Signature pad unmounted");
        self.surface
    }

    /// Process one normalized pointer event.
    ///
    /// `bounds` is the surface's bounding rectangle in client coordinates
    /// at the time of the event.
    pub fn handle_event(&mut self, event: &PointerEvent, bounds: Option<Rect>) {
        match event.phase {
            PointerPhase::Down => match map_event(event, bounds) {
                Some(point) => self.begin_stroke(point),
                None => log::debug!("{:?} down without contact ignored", event.source),
            },
            PointerPhase::Move => {
                if let Some(point) = map_event(event, bounds) {
                    self.extend_stroke(point);
                }
            }
            PointerPhase::Up | PointerPhase::Leave => self.end_stroke(),
        }
    }

    /// Start a stroke at `point`. Deposits no ink.
    pub fn begin_stroke(&mut self, point: Point) {
        self.session.begin(point);
    }

    /// Draw a segment from the last point to `point`. No-op while idle.
    pub fn extend_stroke(&mut self, point: Point) {
        let Some(segment) = self.session.extend(point) else {
            return;
        };
        if !self.surface.stroke_segment(segment) {
            return;
        }
        self.session.record_ink();
        if self.resize_policy == ResizePolicy::Replay {
            self.history.record(segment);
        }
    }

    /// Finish the stroke; exports and notifies when the surface has ink.
    pub fn end_stroke(&mut self) {
        match self.session.end() {
            StrokeEnd::Ignored => {}
            StrokeEnd::Discard => log::debug!("stroke ended without ink"),
            StrokeEnd::Commit => self.notify_export(),
        }
    }

    /// Wipe the surface and tell the listener there is no signature.
    ///
    /// Valid from any state and always notifies.
    pub fn clear(&mut self) {
        self.session.clear();
        self.history.clear();
        self.surface.fill_background();
        log::info!("Signature cleared");
        (self.listener)(NO_SIGNATURE.to_string());
    }

    /// Reconfigure the surface for a new layout size or pixel density.
    ///
    /// Under [`ResizePolicy::Discard`] ink is lost and `has_ink` resets.
    /// Under [`ResizePolicy::Replay`] the deposited segments are redrawn.
    /// Neither notifies the listener.
    pub fn resize(&mut self, geometry: SurfaceGeometry) {
        self.surface.configure(geometry, &self.style);
        self.session.reset_ink();

        match self.resize_policy {
            ResizePolicy::Discard => {
                self.history.clear();
            }
            ResizePolicy::Replay => {
                for segment in self.history.segments() {
                    if self.surface.stroke_segment(segment) {
                        self.session.record_ink();
                    }
                }
            }
        }

        let (width, height) = self.surface.physical_size();
        log::debug!(
            "surface resized to {}x{} (ink retained: {})",
            width,
            height,
            self.session.has_ink()
        );
    }

    /// Encode the live surface. Never cached.
    pub fn export(&self) -> SignatureResult<SignatureArtifact> {
        let png = self.surface.encode_png()?;
        SignatureArtifact::from_png(png)
    }

    fn notify_export(&mut self) {
        match self.export() {
            Ok(artifact) => {
                log::info!(
                    "Signature exported: {}x{}, {} bytes",
                    artifact.width(),
                    artifact.height(),
                    artifact.png().len()
                );
                (self.listener)(artifact.to_data_uri());
            }
            Err(e) => log::warn!("Skipping signature notification: {}", e),
        }
    }

    /// Whether any ink is on the surface.
    pub fn has_ink(&self) -> bool {
        self.session.has_ink()
    }

    /// Whether a stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        self.session.is_active()
    }

    /// The owned surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::tests::white_png;
    use crate::error::SignatureError;
    use kurbo::{Line, Size};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Surface that records draw calls instead of rasterizing.
    #[derive(Default)]
    struct RecordingSurface {
        size: (u32, u32),
        segments: Vec<Line>,
        configure_count: usize,
    }

    impl Surface for RecordingSurface {
        fn configure(&mut self, geometry: SurfaceGeometry, _style: &SurfaceStyle) {
            self.size = geometry.physical_size();
            self.segments.clear();
            self.configure_count += 1;
        }

        fn fill_background(&mut self) {
            self.segments.clear();
        }

        fn stroke_segment(&mut self, segment: Line) -> bool {
            if self.size.0 == 0 || self.size.1 == 0 {
                return false;
            }
            self.segments.push(segment);
            true
        }

        fn physical_size(&self) -> (u32, u32) {
            self.size
        }

        fn encode_png(&self) -> SignatureResult<Vec<u8>> {
            let (width, height) = self.size;
            if width == 0 || height == 0 {
                return Err(SignatureError::EmptySurface);
            }
            Ok(white_png(width, height))
        }
    }

    type Notifications = Rc<RefCell<Vec<String>>>;

    fn mount_with(
        geometry: SurfaceGeometry,
        config: &PadConfig,
    ) -> (SignaturePad<RecordingSurface>, Notifications) {
        let notifications: Notifications = Rc::default();
        let sink = notifications.clone();
        let pad = SignaturePad::mount(RecordingSurface::default(), geometry, config, move |s| {
            sink.borrow_mut().push(s)
        })
        .unwrap();
        (pad, notifications)
    }

    fn mount() -> (SignaturePad<RecordingSurface>, Notifications) {
        mount_with(
            SurfaceGeometry::new(Size::new(300.0, 150.0), 2.0),
            &PadConfig::default(),
        )
    }

    fn bounds() -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, 300.0, 150.0))
    }

    fn draw_l_stroke(pad: &mut SignaturePad<RecordingSurface>) {
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Down, Point::new(10.0, 10.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Move, Point::new(50.0, 10.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Move, Point::new(50.0, 40.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Up, Point::new(50.0, 40.0)), bounds());
    }

    #[test]
    fn test_mount_configures_surface() {
        let (pad, notifications) = mount();
        assert_eq!(pad.surface().physical_size(), (600, 300));
        assert_eq!(pad.surface().configure_count, 1);
        assert!(!pad.has_ink());
        assert!(notifications.borrow().is_empty());
    }

    #[test]
    fn test_mount_rejects_bad_config() {
        let config = PadConfig {
            stroke_color: "red".to_string(),
            ..PadConfig::default()
        };
        let result = SignaturePad::mount(
            RecordingSurface::default(),
            SurfaceGeometry::new(Size::new(10.0, 10.0), 1.0),
            &config,
            |_| {},
        );
        assert!(matches!(result, Err(SignatureError::Config(_))));
    }

    #[test]
    fn test_tap_does_not_notify() {
        let (mut pad, notifications) = mount();
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Down, Point::new(20.0, 20.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Up, Point::new(20.0, 20.0)), bounds());

        assert!(!pad.has_ink());
        assert!(pad.surface().segments.is_empty());
        assert!(notifications.borrow().is_empty());
    }

    #[test]
    fn test_stroke_notifies_once() {
        let (mut pad, notifications) = mount();
        draw_l_stroke(&mut pad);

        assert!(pad.has_ink());
        assert!(!pad.is_drawing());
        assert_eq!(pad.surface().segments.len(), 2);
        let notifications = notifications.borrow();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_leave_commits_partial_stroke() {
        let (mut pad, notifications) = mount();
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Down, Point::new(10.0, 10.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Move, Point::new(30.0, 12.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Leave, Point::new(310.0, 12.0)), bounds());

        assert!(pad.has_ink());
        assert_eq!(notifications.borrow().len(), 1);
    }

    #[test]
    fn test_clear_resets_and_notifies_empty() {
        let (mut pad, notifications) = mount();
        draw_l_stroke(&mut pad);
        pad.clear();

        assert!(!pad.has_ink());
        assert!(pad.surface().segments.is_empty());
        assert_eq!(notifications.borrow().last().map(String::as_str), Some(""));
    }

    #[test]
    fn test_clear_twice_matches_once() {
        let (mut pad, notifications) = mount();
        draw_l_stroke(&mut pad);
        pad.clear();
        let after_first = (pad.has_ink(), pad.is_drawing(), pad.surface().segments.len());
        pad.clear();
        let after_second = (pad.has_ink(), pad.is_drawing(), pad.surface().segments.len());

        assert_eq!(after_first, after_second);
        let notifications = notifications.borrow();
        assert_eq!(notifications.len(), 3);
        assert_eq!(notifications[1], notifications[2]);
    }

    #[test]
    fn test_clear_mid_stroke() {
        let (mut pad, notifications) = mount();
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Down, Point::new(10.0, 10.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Move, Point::new(20.0, 20.0)), bounds());
        pad.clear();
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Move, Point::new(30.0, 30.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Up, Point::new(30.0, 30.0)), bounds());

        assert!(!pad.has_ink());
        assert!(pad.surface().segments.is_empty());
        assert_eq!(*notifications.borrow(), vec![String::new()]);
    }

    #[test]
    fn test_stray_events_while_idle() {
        let (mut pad, notifications) = mount();
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Move, Point::new(10.0, 10.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Up, Point::new(10.0, 10.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Leave, Point::new(10.0, 10.0)), bounds());

        assert!(!pad.is_drawing());
        assert!(!pad.has_ink());
        assert!(pad.surface().segments.is_empty());
        assert!(notifications.borrow().is_empty());
    }

    #[test]
    fn test_resize_discards_ink() {
        let (mut pad, notifications) = mount();
        draw_l_stroke(&mut pad);
        pad.resize(SurfaceGeometry::new(Size::new(400.0, 150.0), 2.0));

        assert!(!pad.has_ink());
        assert!(pad.surface().segments.is_empty());
        assert_eq!(pad.surface().physical_size(), (800, 300));
        assert_eq!(notifications.borrow().len(), 1);
    }

    #[test]
    fn test_resize_replays_history() {
        let config = PadConfig {
            resize_policy: ResizePolicy::Replay,
            ..PadConfig::default()
        };
        let (mut pad, notifications) =
            mount_with(SurfaceGeometry::new(Size::new(300.0, 150.0), 2.0), &config);
        draw_l_stroke(&mut pad);
        pad.resize(SurfaceGeometry::new(Size::new(300.0, 150.0), 3.0));

        assert!(pad.has_ink());
        assert_eq!(pad.surface().segments.len(), 2);
        assert_eq!(pad.surface().physical_size(), (900, 450));
        assert_eq!(notifications.borrow().len(), 1);

        pad.clear();
        pad.resize(SurfaceGeometry::new(Size::new(300.0, 150.0), 1.0));
        assert!(!pad.has_ink());
        assert!(pad.surface().segments.is_empty());
    }

    #[test]
    fn test_replay_skips_segments_never_deposited() {
        let config = PadConfig {
            resize_policy: ResizePolicy::Replay,
            ..PadConfig::default()
        };
        let (mut pad, notifications) =
            mount_with(SurfaceGeometry::new(Size::new(0.0, 0.0), 2.0), &config);
        draw_l_stroke(&mut pad);
        assert!(!pad.has_ink());

        pad.resize(SurfaceGeometry::new(Size::new(300.0, 150.0), 2.0));

        assert!(!pad.has_ink());
        assert!(pad.surface().segments.is_empty());
        assert!(notifications.borrow().is_empty());
    }

    #[test]
    fn test_replay_after_stroke_continues_on_new_surface() {
        let config = PadConfig {
            resize_policy: ResizePolicy::Replay,
            ..PadConfig::default()
        };
        let (mut pad, notifications) =
            mount_with(SurfaceGeometry::new(Size::new(0.0, 0.0), 1.0), &config);
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Down, Point::new(10.0, 10.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Move, Point::new(20.0, 10.0)), bounds());
        pad.resize(SurfaceGeometry::new(Size::new(300.0, 150.0), 1.0));
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Move, Point::new(30.0, 10.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Up, Point::new(30.0, 10.0)), bounds());
        assert_eq!(notifications.borrow().len(), 1);

        pad.resize(SurfaceGeometry::new(Size::new(300.0, 150.0), 2.0));
        let segments = &pad.surface().segments;
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].p0, Point::new(20.0, 10.0));
        assert!(pad.has_ink());
    }

    #[test]
    fn test_resize_mid_stroke_keeps_drawing() {
        let (mut pad, notifications) = mount();
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Down, Point::new(10.0, 10.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Move, Point::new(20.0, 10.0)), bounds());
        pad.resize(SurfaceGeometry::new(Size::new(300.0, 150.0), 1.0));

        assert!(pad.is_drawing());
        assert!(!pad.has_ink());

        pad.handle_event(&PointerEvent::mouse(PointerPhase::Move, Point::new(30.0, 10.0)), bounds());
        pad.handle_event(&PointerEvent::mouse(PointerPhase::Up, Point::new(30.0, 10.0)), bounds());
        assert!(pad.has_ink());
        assert_eq!(pad.surface().segments.len(), 1);
        assert_eq!(notifications.borrow().len(), 1);
    }

    #[test]
    fn test_zero_size_surface_deposits_nothing() {
        let (mut pad, notifications) = mount_with(
            SurfaceGeometry::new(Size::new(0.0, 0.0), 2.0),
            &PadConfig::default(),
        );
        draw_l_stroke(&mut pad);

        assert!(!pad.has_ink());
        assert!(notifications.borrow().is_empty());
        assert!(matches!(pad.export(), Err(SignatureError::EmptySurface)));

        pad.resize(SurfaceGeometry::new(Size::new(300.0, 150.0), 2.0));
        draw_l_stroke(&mut pad);
        assert!(pad.has_ink());
        assert_eq!(notifications.borrow().len(), 1);
    }

    #[test]
    fn test_touch_events_share_the_state_machine() {
        let (mut pad, notifications) = mount();
        let origin = Some(Rect::new(100.0, 200.0, 400.0, 350.0));
        pad.handle_event(&PointerEvent::touch(PointerPhase::Down, [Point::new(110.0, 210.0)]), origin);
        pad.handle_event(
            &PointerEvent::touch(
                PointerPhase::Move,
                [Point::new(150.0, 210.0), Point::new(390.0, 340.0)],
            ),
            origin,
        );
        pad.handle_event(&PointerEvent::touch(PointerPhase::Up, []), origin);

        let segments = &pad.surface().segments;
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].p0, Point::new(10.0, 10.0));
        assert_eq!(segments[0].p1, Point::new(50.0, 10.0));
        assert_eq!(notifications.borrow().len(), 1);
    }

    #[test]
    fn test_touch_down_without_contact_ignored() {
        let (mut pad, _notifications) = mount();
        pad.handle_event(&PointerEvent::touch(PointerPhase::Down, []), bounds());
        assert!(!pad.is_drawing());
    }

    #[test]
    fn test_unmount_returns_surface() {
        let (mut pad, _notifications) = mount();
        draw_l_stroke(&mut pad);
        let surface = pad.unmount();
        assert_eq!(surface.segments.len(), 2);
    }
}
