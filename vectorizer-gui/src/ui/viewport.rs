//! Pan and zoom state for the preview canvas.
//!
//! Coordinates are local to the canvas: `screen = content * zoom + pan`.

use eframe::egui::{Pos2, Rect, Vec2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;

/// Zoom factor per wheel notch.
pub const WHEEL_ZOOM_STEP: f32 = 1.1;

/// Zoom factor for the toolbar buttons.
pub const BUTTON_ZOOM_STEP: f32 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    /// Set the zoom to `new_zoom` (clamped) keeping the content under
    /// `anchor` in place.
    pub fn zoom_at(&mut self, new_zoom: f32, anchor: Pos2) {
        if !new_zoom.is_finite() {
            return;
        }
        let clamped = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let point = self.to_content(anchor);

        self.pan = anchor.to_vec2() - point.to_vec2() * clamped;
        self.zoom = clamped;
    }

    /// Apply a wheel scroll at `anchor`. Positive `delta` zooms in.
    pub fn scroll_at(&mut self, delta: f32, anchor: Pos2) {
        if delta > 0.0 {
            self.zoom_at(self.zoom * WHEEL_ZOOM_STEP, anchor);
        } else if delta < 0.0 {
            self.zoom_at(self.zoom / WHEEL_ZOOM_STEP, anchor);
        }
    }

    pub fn zoom_in(&mut self, center: Pos2) {
        self.zoom_at(self.zoom * BUTTON_ZOOM_STEP, center);
    }

    pub fn zoom_out(&mut self, center: Pos2) {
        self.zoom_at(self.zoom / BUTTON_ZOOM_STEP, center);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Canvas position of a content-space point.
    pub fn to_screen(&self, content: Pos2) -> Pos2 {
        (content.to_vec2() * self.zoom + self.pan).to_pos2()
    }

    /// Content-space point under a canvas position.
    pub fn to_content(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    pub fn transform_rect(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max))
    }

    /// Zoom as a whole percentage for display.
    pub fn percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn assert_close(a: Pos2, b: Pos2) {
        assert!(
            (a - b).length() < 1e-3,
            "expected {:?} to be close to {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_default_is_identity() {
        let vp = Viewport::default();
        assert_close(vp.to_screen(pos2(12.0, 34.0)), pos2(12.0, 34.0));
        assert_eq!(vp.percent(), 100);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut vp = Viewport {
            zoom: 1.7,
            pan: vec2(-40.0, 25.0),
        };

        for anchor in [pos2(0.0, 0.0), pos2(120.0, 80.0), pos2(333.0, 12.5)] {
            for target in [0.5, 2.0, 3.3, 9.9] {
                let before = vp.to_content(anchor);
                vp.zoom_at(target, anchor);
                let after = vp.to_content(anchor);
                assert_close(before, after);
                assert_close(vp.to_screen(before), anchor);
            }
        }
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = Viewport::default();
        vp.zoom_at(100.0, pos2(50.0, 50.0));
        assert_eq!(vp.zoom, MAX_ZOOM);
        vp.zoom_at(0.001, pos2(50.0, 50.0));
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_clamped_zoom_still_anchors() {
        let mut vp = Viewport::default();
        let anchor = pos2(200.0, 150.0);
        let before = vp.to_content(anchor);
        vp.zoom_at(1000.0, anchor);
        assert_close(vp.to_content(anchor), before);
    }

    #[test]
    fn test_scroll_direction() {
        let mut vp = Viewport::default();
        vp.scroll_at(1.0, pos2(0.0, 0.0));
        assert!((vp.zoom - WHEEL_ZOOM_STEP).abs() < 1e-6);

        vp.scroll_at(-1.0, pos2(0.0, 0.0));
        assert!((vp.zoom - 1.0).abs() < 1e-6);

        vp.scroll_at(0.0, pos2(0.0, 0.0));
        assert!((vp.zoom - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_buttons_zoom_around_center() {
        let mut vp = Viewport::default();
        let center = pos2(300.0, 200.0);
        vp.zoom_in(center);
        assert!((vp.zoom - BUTTON_ZOOM_STEP).abs() < 1e-6);
        assert_close(vp.to_screen(center), pos2(center.x * 1.3, center.y * 1.3));
        assert_close(vp.to_content(center), center);

        vp.zoom_out(center);
        assert!((vp.zoom - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pan_and_reset() {
        let mut vp = Viewport::default();
        vp.pan_by(vec2(10.0, -5.0));
        vp.pan_by(vec2(2.0, 2.0));
        assert_eq!(vp.pan, vec2(12.0, -3.0));

        vp.zoom_at(4.0, pos2(1.0, 1.0));
        vp.reset();
        assert_eq!(vp, Viewport::default());
    }

    #[test]
    fn test_transform_rect_scales_from_origin() {
        let vp = Viewport {
            zoom: 2.0,
            pan: vec2(5.0, 5.0),
        };
        let rect = vp.transform_rect(Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 20.0)));
        assert_eq!(rect.min, pos2(5.0, 5.0));
        assert_eq!(rect.max, pos2(25.0, 45.0));
    }
}
