// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Turning an existing shape into an editable path.
//!
//! Quadratic segments are raised to cubics. Anchor types are classified
//! from the resulting geometry since the shape was not built interactively.

use super::{AnchorPoint, DualPoint, Path, SubPath};
use crate::editing::viewport::ViewTransform;
use kurbo::{BezPath, PathEl, Point, QuadBez};

impl Path {
    /// Build an editable path from an image-space shape
    pub fn from_shape(shape: &BezPath, transform: &impl ViewTransform) -> Self {
        let mut path = Path::new();
        let mut current: Option<SubPath> = None;
        let mut last_pos = Point::ZERO;

        for el in shape.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    if let Some(sp) = current.take() {
                        path.push_subpath(sp);
                    }
                    let mut sp = SubPath::new();
                    sp.add_first_point(AnchorPoint::from_image(p, transform));
                    current = Some(sp);
                    last_pos = p;
                }
                PathEl::LineTo(p) => {
                    let sp = current.get_or_insert_with(|| start_at(last_pos, transform));
                    sp.add_point(AnchorPoint::from_image(p, transform));
                    last_pos = p;
                }
                PathEl::QuadTo(c, p) => {
                    let cubic = QuadBez::new(last_pos, c, p).raise();
                    let sp = current.get_or_insert_with(|| start_at(last_pos, transform));
                    push_cubic(sp, cubic.p1, cubic.p2, p, transform);
                    last_pos = p;
                }
                PathEl::CurveTo(c1, c2, p) => {
                    let sp = current.get_or_insert_with(|| start_at(last_pos, transform));
                    push_cubic(sp, c1, c2, p, transform);
                    last_pos = p;
                }
                PathEl::ClosePath => {
                    if let Some(mut sp) = current.take() {
                        if let Some(first) = sp.first() {
                            last_pos = first.pos.image();
                        }
                        sp.close(false);
                        path.push_subpath(sp);
                    }
                }
            }
        }
        if let Some(sp) = current.take() {
            path.push_subpath(sp);
        }

        path.classify_anchors(false);
        tracing::debug!(
            "[Path::from_shape] imported {} subpaths from {} elements",
            path.len(),
            shape.elements().len()
        );
        path
    }
}

/// A subpath implicitly started by a drawing element without a move
fn start_at(p: Point, transform: &impl ViewTransform) -> SubPath {
    let mut sp = SubPath::new();
    sp.add_first_point(AnchorPoint::from_image(p, transform));
    sp
}

fn push_cubic(sp: &mut SubPath, c1: Point, c2: Point, p: Point, transform: &impl ViewTransform) {
    let mut anchor = AnchorPoint::from_image(p, transform);
    anchor.ctrl_in.pos = DualPoint::from_image(c2, transform);
    let Some(last) = sp.last_mut() else {
        sp.add_first_point(anchor);
        return;
    };
    if last.same_position_as(&anchor) {
        tracing::debug!("[Path::from_shape] skipped zero-length cubic at {p:?}");
        return;
    }
    last.ctrl_out.pos = DualPoint::from_image(c1, transform);
    sp.add_point(anchor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::viewport::ViewPort;
    use crate::path::{AnchorType, Space};
    use kurbo::{Circle, Rect, Shape};

    #[test]
    fn rectangle_imports_as_closed_cusps() {
        let rect = Rect::new(0.0, 0.0, 20.0, 10.0).to_path(0.1);
        let path = Path::from_shape(&rect, &ViewPort::new());
        assert_eq!(path.len(), 1);
        let sp = &path.subpaths()[0];
        assert!(sp.is_closed());
        assert_eq!(sp.len(), 4);
        assert!(sp.anchors().iter().all(|ap| ap.typ == AnchorType::Cusp));
    }

    #[test]
    fn circle_imports_as_smooth_anchors() {
        let circle = Circle::new((50.0, 50.0), 20.0).to_path(0.1);
        let path = Path::from_shape(&circle, &ViewPort::new());
        let sp = &path.subpaths()[0];
        assert!(sp.len() >= 4);
        assert!(
            sp.anchors()[1..sp.len() - 1]
                .iter()
                .all(|ap| matches!(ap.typ, AnchorType::Smooth | AnchorType::Symmetric))
        );
    }

    #[test]
    fn quadratics_are_raised_to_cubics() {
        let mut shape = BezPath::new();
        shape.move_to((0.0, 0.0));
        shape.quad_to((10.0, 10.0), (20.0, 0.0));
        let path = Path::from_shape(&shape, &ViewPort::new());
        let bez = path.build_shape(Space::Image);
        let expected = QuadBez::new((0.0, 0.0), (10.0, 10.0), (20.0, 0.0)).raise();
        assert_eq!(
            bez.elements()[1],
            PathEl::CurveTo(expected.p1, expected.p2, expected.p3)
        );
    }

    #[test]
    fn zero_length_cubic_keeps_previous_segment() {
        let mut shape = BezPath::new();
        shape.move_to((0.0, 0.0));
        shape.curve_to((0.0, 10.0), (10.0, 10.0), (10.0, 0.0));
        shape.curve_to((12.0, 0.0), (12.0, 0.0), (10.0, 0.0));
        let path = Path::from_shape(&shape, &ViewPort::new());
        assert_eq!(path.subpaths()[0].len(), 2);
        let bez = path.build_shape(Space::Image);
        assert_eq!(bez.elements().len(), 2);
        assert_eq!(
            bez.elements()[1],
            PathEl::CurveTo(
                Point::new(0.0, 10.0),
                Point::new(10.0, 10.0),
                Point::new(10.0, 0.0)
            )
        );
    }

    #[test]
    fn view_positions_follow_transform() {
        let mut shape = BezPath::new();
        shape.move_to((1.0, 1.0));
        shape.line_to((2.0, 1.0));
        let mut vp = ViewPort::new();
        vp.set_zoom(10.0);
        let path = Path::from_shape(&shape, &vp);
        assert_eq!(path.subpaths()[0].anchors()[1].pos.view(), Point::new(20.0, 10.0));
    }

    #[test]
    fn multiple_moves_give_multiple_subpaths() {
        let mut shape = BezPath::new();
        shape.move_to((0.0, 0.0));
        shape.line_to((5.0, 0.0));
        shape.move_to((10.0, 0.0));
        shape.line_to((15.0, 0.0));
        shape.close_path();
        let path = Path::from_shape(&shape, &ViewPort::new());
        assert_eq!(path.len(), 2);
        assert!(!path.subpaths()[0].is_closed());
        assert!(path.subpaths()[1].is_closed());
        assert_eq!(path.check_wiring(), Ok(()));
    }
}
