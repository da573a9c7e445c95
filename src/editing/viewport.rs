// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! View transform between image space and view space.
//!
//! Image space is the canonical, resolution independent coordinate system of
//! the document. View space is the pixel grid of the widget showing it and
//! changes with zoom and scrolling.

use crate::settings;
use kurbo::{Affine, Point, Vec2};

/// Converts positions between image space and view space
pub trait ViewTransform {
    fn image_to_view(&self, image: Point) -> Point;
    fn view_to_image(&self, view: Point) -> Point;
}

/// An affine is interpreted as the image-to-view mapping
impl ViewTransform for Affine {
    fn image_to_view(&self, image: Point) -> Point {
        *self * image
    }

    fn view_to_image(&self, view: Point) -> Point {
        self.inverse() * view
    }
}

/// Zoom and scroll state of the view showing a document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPort {
    /// View-space position of the image origin
    pub offset: Vec2,
    /// View pixels per image unit
    pub zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for ViewPort {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewPort {
    /// Identity view: view coordinates equal image coordinates
    pub fn new() -> Self {
        Self::with_zoom_limits(settings::view::MIN_ZOOM, settings::view::MAX_ZOOM)
    }

    /// Identity view with custom zoom limits
    pub fn with_zoom_limits(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom,
            max_zoom,
        }
    }

    /// The image-to-view affine
    pub fn affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Set the zoom level, clamped to the configured limits
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Zoom while keeping the image position under `anchor` fixed
    pub fn zoom_about(&mut self, anchor: Point, zoom: f64) {
        let image_anchor = self.view_to_image(anchor);
        self.set_zoom(zoom);
        let moved = self.image_to_view(image_anchor);
        self.offset += anchor - moved;
    }

    /// Scroll the view by a view-space delta
    pub fn scroll(&mut self, delta: Vec2) {
        self.offset += delta;
    }
}

impl ViewTransform for ViewPort {
    fn image_to_view(&self, image: Point) -> Point {
        self.affine().image_to_view(image)
    }

    fn view_to_image(&self, view: Point) -> Point {
        self.affine().view_to_image(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_by_default() {
        let vp = ViewPort::new();
        let p = Point::new(12.5, -3.0);
        assert_eq!(vp.image_to_view(p), p);
        assert_eq!(vp.view_to_image(p), p);
    }

    #[test]
    fn zoom_and_offset() {
        let mut vp = ViewPort::new();
        vp.set_zoom(2.0);
        vp.scroll(Vec2::new(10.0, 20.0));
        assert_eq!(vp.image_to_view(Point::new(1.0, 1.0)), Point::new(12.0, 22.0));
        assert_eq!(vp.view_to_image(Point::new(12.0, 22.0)), Point::new(1.0, 1.0));
        assert_eq!(vp.affine() * Point::new(1.0, 1.0), Point::new(12.0, 22.0));
        assert_eq!(vp.affine().inverse() * Point::new(12.0, 22.0), Point::new(1.0, 1.0));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vp = ViewPort::new();
        vp.set_zoom(1000.0);
        assert_eq!(vp.zoom, settings::view::MAX_ZOOM);
        vp.set_zoom(0.0);
        assert_eq!(vp.zoom, settings::view::MIN_ZOOM);
    }

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let mut vp = ViewPort::new();
        let anchor = Point::new(100.0, 50.0);
        let before = vp.view_to_image(anchor);
        vp.zoom_about(anchor, 3.0);
        let after = vp.view_to_image(anchor);
        assert!((before - after).hypot() < 1e-9);
    }

    #[test]
    fn affine_transform_round_trips() {
        let t = Affine::rotate(0.3) * Affine::scale(1.7);
        let p = Point::new(3.0, 4.0);
        let back = t.view_to_image(t.image_to_view(p));
        assert!((back - p).hypot() < 1e-9);
    }
}
