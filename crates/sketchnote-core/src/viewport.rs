//! Viewport scale/translation and pinch-zoom math.
//!
//! The viewport is not part of the document and is never recorded in
//! history.

use crate::geometry;
use kurbo::{Affine, Point, Vec2};

/// Minimum allowed scale.
pub const MIN_SCALE: f64 = 0.5;
/// Maximum allowed scale.
pub const MAX_SCALE: f64 = 3.0;
/// Step for discrete zoom in/out controls.
pub const ZOOM_STEP: f64 = 0.25;

/// Viewport manages the view transform for the canvas.
///
/// The scale only changes through [`Viewport::set_scale`] and the zoom
/// helpers, so it always stays within `[min_scale, max_scale]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scale: f64,
    translation: Vec2,
    min_scale: f64,
    max_scale: f64,
    zoom_step: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: Vec2::ZERO,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl Viewport {
    /// Create a new viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport with custom zoom bounds. Callers validate that
    /// `0 < min_scale <= max_scale`.
    pub fn with_limits(min_scale: f64, max_scale: f64, zoom_step: f64) -> Self {
        Self {
            min_scale,
            max_scale,
            zoom_step,
            ..Self::default()
        }
    }

    /// Current zoom level.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Transform from canvas coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.translation) * Affine::scale(self.scale)
    }

    /// Transform from screen coordinates to canvas coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.translation)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.translation += delta;
    }

    /// Set the scale, clamped to the allowed range.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(self.min_scale, self.max_scale);
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - self.zoom_step);
    }

    /// Reset to scale 1 with no translation.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.translation = Vec2::ZERO;
    }
}

/// Reference state of a two-finger gesture.
///
/// Each frame re-bases on the previous frame rather than the gesture start,
/// so the zoom tracks continuously.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PinchGesture {
    reference: Option<PinchReference>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchReference {
    center: Point,
    distance: f64,
}

impl PinchGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Midpoint of the last processed frame.
    pub fn last_center(&self) -> Option<Point> {
        self.reference.map(|r| r.center)
    }

    /// Finger distance of the last processed frame.
    pub fn last_distance(&self) -> Option<f64> {
        self.reference.map(|r| r.distance)
    }

    /// Process one two-finger frame.
    ///
    /// The first frame only records the reference. Later frames scale the
    /// viewport by `distance / last_distance` and return how far the
    /// midpoint moved since the previous frame. The viewport translation is
    /// left to the host.
    pub fn update(&mut self, viewport: &mut Viewport, a: Point, b: Point) -> Option<Vec2> {
        let center = a.midpoint(b);
        let distance = geometry::distance(a, b);

        let last = self.reference.replace(PinchReference { center, distance })?;

        if last.distance > 0.0 {
            viewport.set_scale(viewport.scale() * (distance / last.distance));
        }
        Some(center - last.center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::new();
        assert_eq!(viewport.translation, Vec2::ZERO);
        assert!((viewport.scale() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_scale_and_translation() {
        let mut viewport = Viewport::new();
        viewport.set_scale(2.0);
        viewport.pan(Vec2::new(50.0, 100.0));
        let world = viewport.screen_to_world(Point::new(150.0, 300.0));
        assert!((world.x - 50.0).abs() < 1e-10);
        assert!((world.y - 100.0).abs() < 1e-10);
        let back = viewport.world_to_screen(world);
        assert!((back.x - 150.0).abs() < 1e-10);
        assert!((back.y - 300.0).abs() < 1e-10);
    }

    #[test]
    fn test_custom_limits() {
        let mut viewport = Viewport::with_limits(0.25, 8.0, 1.0);
        viewport.zoom_in();
        assert_eq!(viewport.scale(), 2.0);
        viewport.set_scale(0.0);
        assert_eq!(viewport.scale(), 0.25);
        assert!(viewport.screen_to_world(Point::new(1.0, 1.0)).x.is_finite());
    }

    #[test]
    fn test_zoom_steps_clamped() {
        let mut viewport = Viewport::new();
        viewport.zoom_in();
        assert!((viewport.scale() - 1.25).abs() < f64::EPSILON);
        for _ in 0..20 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.scale(), MAX_SCALE);
        for _ in 0..20 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.scale(), MIN_SCALE);
    }

    #[test]
    fn test_reset() {
        let mut viewport = Viewport::new();
        viewport.set_scale(2.5);
        viewport.pan(Vec2::new(10.0, 20.0));
        viewport.reset();
        assert_eq!(viewport, Viewport::new());
    }

    #[test]
    fn test_first_pinch_frame_records_reference() {
        let mut viewport = Viewport::new();
        let mut pinch = PinchGesture::new();
        let moved = pinch.update(&mut viewport, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(moved.is_none());
        assert_eq!(viewport.scale(), 1.0);
        assert_eq!(pinch.last_center(), Some(Point::new(50.0, 0.0)));
        assert_eq!(pinch.last_distance(), Some(100.0));
    }

    #[test]
    fn test_pinch_rebases_every_frame() {
        let mut viewport = Viewport::new();
        let mut pinch = PinchGesture::new();
        pinch.update(&mut viewport, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        pinch.update(&mut viewport, Point::new(0.0, 0.0), Point::new(150.0, 0.0));
        assert!((viewport.scale() - 1.5).abs() < 1e-12);
        // Relative to the previous frame, not the gesture start.
        pinch.update(&mut viewport, Point::new(0.0, 0.0), Point::new(180.0, 0.0));
        assert!((viewport.scale() - 1.8).abs() < 1e-12);
        assert_eq!(pinch.last_distance(), Some(180.0));
    }

    #[test]
    fn test_pinch_clamps_exactly() {
        let mut viewport = Viewport::new();
        let mut pinch = PinchGesture::new();
        pinch.update(&mut viewport, Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        pinch.update(&mut viewport, Point::new(0.0, 0.0), Point::new(1000.0, 0.0));
        assert_eq!(viewport.scale(), MAX_SCALE);
        pinch.update(&mut viewport, Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert_eq!(viewport.scale(), MIN_SCALE);
    }

    #[test]
    fn test_pinch_reports_center_delta() {
        let mut viewport = Viewport::new();
        let mut pinch = PinchGesture::new();
        pinch.update(&mut viewport, Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let moved = pinch.update(&mut viewport, Point::new(10.0, 5.0), Point::new(110.0, 5.0));
        assert_eq!(moved, Some(Vec2::new(10.0, 5.0)));
        assert_eq!(viewport.translation, Vec2::ZERO);
    }
}
