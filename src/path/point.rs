// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Anchor and control points.
//!
//! Every point keeps its position twice: in view space, where the pointer
//! lives, and in image space, which is canonical. Dragging writes the view
//! position and derives the image position; a view change derives the view
//! position from the image position. An anchor embeds its two controls by
//! value, and each control records its anchor's id and which side it is on,
//! so the sibling relation can be checked without back-pointers.

use crate::editing::viewport::ViewTransform;
use crate::model::EntityId;
use crate::settings;
use kurbo::{Point, Vec2};
use std::fmt;

/// Coordinate space selector for geometry emission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Space {
    /// Pixels of the view (zoom and scroll dependent)
    View,
    /// Canonical document coordinates
    Image,
}

/// A position tracked in both view and image space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualPoint {
    view: Point,
    image: Point,
}

impl DualPoint {
    /// Create from a view position
    pub fn from_view(view: Point, transform: &impl ViewTransform) -> Self {
        Self {
            view,
            image: transform.view_to_image(view),
        }
    }

    /// Create from an image position
    pub fn from_image(image: Point, transform: &impl ViewTransform) -> Self {
        Self {
            view: transform.image_to_view(image),
            image,
        }
    }

    pub fn view(&self) -> Point {
        self.view
    }

    pub fn image(&self) -> Point {
        self.image
    }

    /// Position in the requested space
    pub fn get(&self, space: Space) -> Point {
        match space {
            Space::View => self.view,
            Space::Image => self.image,
        }
    }

    /// Move to a view position, deriving the image position
    pub fn move_to(&mut self, view: Point, transform: &impl ViewTransform) {
        self.view = view;
        self.image = transform.view_to_image(view);
    }

    /// Move by a view-space delta
    pub fn translate(&mut self, delta: Vec2, transform: &impl ViewTransform) {
        self.move_to(self.view + delta, transform);
    }

    /// Re-derive the view position after the view transform changed
    pub fn recompute_view(&mut self, transform: &impl ViewTransform) {
        self.view = transform.image_to_view(self.image);
    }

    /// Re-derive the image position from the current view position
    pub fn recompute_image(&mut self, transform: &impl ViewTransform) {
        self.image = transform.view_to_image(self.view);
    }

    /// Whether a view position is within `radius` view pixels
    pub fn hit(&self, view: Point, radius: f64) -> bool {
        self.view.distance(view) <= radius
    }

    /// Whether both points are at the same image position
    pub fn same_position_as(&self, other: &DualPoint) -> bool {
        self.image.distance(other.image) <= settings::view::POSITION_EPSILON
    }
}

/// Which side of its anchor a control point sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CtrlSide {
    /// Shapes the segment arriving at the anchor
    In,
    /// Shapes the segment leaving the anchor
    Out,
}

impl CtrlSide {
    /// The side of the sibling control
    pub fn sibling(self) -> Self {
        match self {
            CtrlSide::In => CtrlSide::Out,
            CtrlSide::Out => CtrlSide::In,
        }
    }
}

/// A draggable part of an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Anchor,
    Ctrl(CtrlSide),
}

/// How an anchor's controls react when one of them is dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorType {
    /// The sibling is mirrored through the anchor (same length)
    Symmetric,
    /// The sibling stays collinear but keeps its own length
    Smooth,
    /// The controls move independently
    Cusp,
}

/// A tangent handle of an anchor point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub pos: DualPoint,
    pub(crate) side: CtrlSide,
    pub(crate) anchor: EntityId,
}

impl ControlPoint {
    fn new(pos: DualPoint, side: CtrlSide, anchor: EntityId) -> Self {
        Self { pos, side, anchor }
    }

    pub fn side(&self) -> CtrlSide {
        self.side
    }

    /// Id of the owning anchor
    pub fn anchor(&self) -> EntityId {
        self.anchor
    }

    /// Side of the sibling control on the same anchor
    pub fn sibling_side(&self) -> CtrlSide {
        self.side.sibling()
    }
}

/// An on-curve point with its incoming and outgoing controls
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPoint {
    id: EntityId,
    pub pos: DualPoint,
    pub ctrl_in: ControlPoint,
    pub ctrl_out: ControlPoint,
    pub typ: AnchorType,
}

impl AnchorPoint {
    /// A new anchor with both controls retracted onto it
    pub fn new(pos: DualPoint) -> Self {
        let id = EntityId::next();
        Self {
            id,
            pos,
            ctrl_in: ControlPoint::new(pos, CtrlSide::In, id),
            ctrl_out: ControlPoint::new(pos, CtrlSide::Out, id),
            typ: AnchorType::Symmetric,
        }
    }

    pub fn from_view(view: Point, transform: &impl ViewTransform) -> Self {
        Self::new(DualPoint::from_view(view, transform))
    }

    pub fn from_image(image: Point, transform: &impl ViewTransform) -> Self {
        Self::new(DualPoint::from_image(image, transform))
    }

    /// A fresh anchor at the same position as `other`, controls retracted
    pub fn mirror_of(other: &AnchorPoint) -> Self {
        Self::new(other.pos)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn ctrl(&self, side: CtrlSide) -> &ControlPoint {
        match side {
            CtrlSide::In => &self.ctrl_in,
            CtrlSide::Out => &self.ctrl_out,
        }
    }

    pub fn ctrl_mut(&mut self, side: CtrlSide) -> &mut ControlPoint {
        match side {
            CtrlSide::In => &mut self.ctrl_in,
            CtrlSide::Out => &mut self.ctrl_out,
        }
    }

    /// Position of one of the anchor's handles
    pub fn handle_pos(&self, handle: Handle) -> &DualPoint {
        match handle {
            Handle::Anchor => &self.pos,
            Handle::Ctrl(side) => &self.ctrl(side).pos,
        }
    }

    /// A control is retracted when it sits on its anchor
    pub fn is_retracted(&self, side: CtrlSide) -> bool {
        self.ctrl(side).pos.same_position_as(&self.pos)
    }

    pub fn same_position_as(&self, other: &AnchorPoint) -> bool {
        self.pos.same_position_as(&other.pos)
    }

    /// Move the anchor to a view position, carrying both controls along
    pub fn move_to(&mut self, view: Point, transform: &impl ViewTransform) {
        let delta = view - self.pos.view();
        self.translate(delta, transform);
    }

    /// Translate the anchor and its controls by a view-space delta
    pub fn translate(&mut self, delta: Vec2, transform: &impl ViewTransform) {
        self.pos.translate(delta, transform);
        self.ctrl_in.pos.translate(delta, transform);
        self.ctrl_out.pos.translate(delta, transform);
    }

    /// Move only the anchor, leaving the controls where they are
    pub fn move_anchor_only(&mut self, view: Point, transform: &impl ViewTransform) {
        self.pos.move_to(view, transform);
    }

    /// Move one control to a view position.
    ///
    /// Unless `independent` is set, the sibling follows the anchor type:
    /// mirrored for symmetric anchors, kept collinear for smooth ones.
    pub fn move_ctrl(
        &mut self,
        side: CtrlSide,
        view: Point,
        independent: bool,
        transform: &impl ViewTransform,
    ) {
        self.ctrl_mut(side).pos.move_to(view, transform);
        if independent {
            return;
        }
        match self.typ {
            AnchorType::Symmetric => {
                let mirrored = mirror(view, self.pos.view());
                self.ctrl_mut(side.sibling()).pos.move_to(mirrored, transform);
            }
            AnchorType::Smooth => {
                let anchor = self.pos.view();
                let direction = anchor - view;
                let sibling_len = (self.ctrl(side.sibling()).pos.view() - anchor).hypot();
                if direction.hypot() > settings::view::POSITION_EPSILON
                    && sibling_len > settings::view::POSITION_EPSILON
                {
                    let target = anchor + direction.normalize() * sibling_len;
                    self.ctrl_mut(side.sibling()).pos.move_to(target, transform);
                }
            }
            AnchorType::Cusp => {}
        }
    }

    /// Drag the outgoing control while building: the incoming control is
    /// always mirrored through the anchor, whatever the anchor type.
    pub fn drag_ctrl_out_symmetric(&mut self, view: Point, transform: &impl ViewTransform) {
        self.ctrl_out.pos.move_to(view, transform);
        let mirrored = mirror(view, self.pos.view());
        self.ctrl_in.pos.move_to(mirrored, transform);
    }

    /// Re-derive all view positions after a view change
    pub fn recompute_view(&mut self, transform: &impl ViewTransform) {
        self.pos.recompute_view(transform);
        self.ctrl_in.pos.recompute_view(transform);
        self.ctrl_out.pos.recompute_view(transform);
    }

    /// Re-derive all image positions from the view positions
    pub fn recompute_image(&mut self, transform: &impl ViewTransform) {
        self.pos.recompute_image(transform);
        self.ctrl_in.pos.recompute_image(transform);
        self.ctrl_out.pos.recompute_image(transform);
    }

    /// Copy the positions (not the identity) of another anchor
    pub fn copy_positions_from(&mut self, other: &AnchorPoint) {
        self.pos = other.pos;
        self.ctrl_in.pos = other.ctrl_in.pos;
        self.ctrl_out.pos = other.ctrl_out.pos;
        self.typ = other.typ;
    }

    /// Hit test the anchor and its controls.
    ///
    /// The anchor is tested first unless `prefer_ctrls` is set, in which
    /// case a control under the pointer wins even if it is retracted.
    pub fn hit(&self, view: Point, radius: f64, prefer_ctrls: bool) -> Option<Handle> {
        let ctrl_hit = || {
            [CtrlSide::In, CtrlSide::Out]
                .into_iter()
                .find(|side| self.ctrl(*side).pos.hit(view, radius))
                .map(Handle::Ctrl)
        };
        if prefer_ctrls {
            if let Some(handle) = ctrl_hit() {
                return Some(handle);
            }
            return self.pos.hit(view, radius).then_some(Handle::Anchor);
        }
        if self.pos.hit(view, radius) {
            return Some(Handle::Anchor);
        }
        ctrl_hit()
    }

    /// Pick the anchor type used by edit mode.
    ///
    /// Anchors with a retracted control are cusps. Anchors built
    /// interactively had their controls mirrored, so they stay symmetric.
    /// Imported anchors are classified from their geometry.
    pub fn classify(&mut self, built_interactively: bool) {
        if self.is_retracted(CtrlSide::In) || self.is_retracted(CtrlSide::Out) {
            self.typ = AnchorType::Cusp;
            return;
        }
        if built_interactively {
            self.typ = AnchorType::Symmetric;
            return;
        }
        let anchor = self.pos.image();
        let v_in = self.ctrl_in.pos.image() - anchor;
        let v_out = self.ctrl_out.pos.image() - anchor;
        let scale = v_in.hypot() * v_out.hypot();
        self.typ = if (v_in + v_out).hypot() <= CLASSIFY_TOLERANCE * v_in.hypot().max(1.0) {
            AnchorType::Symmetric
        } else if v_in.cross(v_out).abs() <= CLASSIFY_TOLERANCE * scale && v_in.dot(v_out) < 0.0 {
            AnchorType::Smooth
        } else {
            AnchorType::Cusp
        };
    }
}

/// Relative tolerance for classifying imported anchors
const CLASSIFY_TOLERANCE: f64 = 1e-3;

/// Reflect `p` through `center`
fn mirror(p: Point, center: Point) -> Point {
    center + (center - p)
}

impl fmt::Display for AnchorPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.pos.image();
        let i = self.ctrl_in.pos.image();
        let o = self.ctrl_out.pos.image();
        write!(
            f,
            "{} {:?} at ({:.2}, {:.2}) in ({:.2}, {:.2}) out ({:.2}, {:.2})",
            self.id, self.typ, p.x, p.y, i.x, i.y, o.x, o.y
        )
    }
}
