// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! A single contour: a composite Bezier curve through a sequence of anchors.
//!
//! Anchors are stored in curve order, so `first` and `last` are simply the
//! ends of the vector. While a subpath is being built it may also hold a
//! `moving` anchor that follows the cursor; it is drawn but is not part of
//! the committed sequence until `finalize_moving_point`.

use super::point::{AnchorPoint, CtrlSide, DualPoint, Handle, Space};
use crate::editing::history::PathEdit;
use crate::editing::viewport::ViewTransform;
use crate::error::WiringError;
use crate::model::EntityId;
use kurbo::{BezPath, Point};
use std::fmt;

/// The terminal anchor dropped by `close` because it sat on `first`
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedDuplicate {
    /// The anchor that was removed
    pub anchor: AnchorPoint,
    /// `first`'s incoming control before the duplicate's was merged into it
    pub first_ctrl_in: DualPoint,
}

/// One contour of a path, open or closed
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    id: EntityId,
    anchors: Vec<AnchorPoint>,
    moving: Option<AnchorPoint>,
    closed: bool,
}

impl Default for SubPath {
    fn default() -> Self {
        Self::new()
    }
}

impl SubPath {
    /// Create an empty, open subpath
    pub fn new() -> Self {
        Self::with_id(EntityId::next())
    }

    /// Create an empty subpath reusing a known id (history replay)
    pub(crate) fn with_id(id: EntityId) -> Self {
        Self {
            id,
            anchors: Vec::new(),
            moving: None,
            closed: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Number of committed anchors
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Committed anchors in curve order
    pub fn anchors(&self) -> &[AnchorPoint] {
        &self.anchors
    }

    pub fn first(&self) -> Option<&AnchorPoint> {
        self.anchors.first()
    }

    pub fn last(&self) -> Option<&AnchorPoint> {
        self.anchors.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut AnchorPoint> {
        self.anchors.last_mut()
    }

    /// The uncommitted anchor following the cursor, if any
    pub fn moving(&self) -> Option<&AnchorPoint> {
        self.moving.as_ref()
    }

    pub fn moving_mut(&mut self) -> Option<&mut AnchorPoint> {
        self.moving.as_mut()
    }

    /// Index of the anchor with the given id
    pub fn position_of(&self, anchor: EntityId) -> Option<usize> {
        self.anchors.iter().position(|ap| ap.id() == anchor)
    }

    pub fn anchor(&self, anchor: EntityId) -> Option<&AnchorPoint> {
        self.anchors.iter().find(|ap| ap.id() == anchor)
    }

    pub fn anchor_mut(&mut self, anchor: EntityId) -> Option<&mut AnchorPoint> {
        self.anchors.iter_mut().find(|ap| ap.id() == anchor)
    }

    /// Start the subpath with its first anchor
    pub fn add_first_point(&mut self, p: AnchorPoint) {
        debug_assert!(self.anchors.is_empty(), "add_first_point on non-empty subpath");
        self.anchors.push(p);
        self.debug_check_wiring();
    }

    /// Append an anchor while importing geometry.
    ///
    /// Anchors that land on the current last anchor are skipped; imported
    /// shapes can contain zero-length segments. Returns whether the anchor
    /// was appended.
    pub fn add_point(&mut self, p: AnchorPoint) -> bool {
        if let Some(last) = self.anchors.last()
            && last.same_position_as(&p)
        {
            return false;
        }
        self.anchors.push(p);
        self.debug_check_wiring();
        true
    }

    /// Stage the anchor that follows the cursor
    pub fn set_moving(&mut self, p: AnchorPoint) {
        self.moving = Some(p);
    }

    pub fn clear_moving(&mut self) {
        self.moving = None;
    }

    /// Commit the moving anchor at a view position.
    ///
    /// Returns the history record for the new anchor, or `None` when
    /// nothing was moving. `finishes` marks a commit that also ends the
    /// subpath.
    pub fn finalize_moving_point(
        &mut self,
        view: Point,
        finishes: bool,
        transform: &impl ViewTransform,
    ) -> Option<PathEdit> {
        let mut moving = self.moving.take()?;
        moving.move_to(view, transform);
        let edit = PathEdit::AddAnchor {
            subpath: self.id,
            anchor: moving.clone(),
            finishes_subpath: finishes,
        };
        self.anchors.push(moving);
        self.debug_check_wiring();
        Some(edit)
    }

    /// Re-append an anchor recorded by `finalize_moving_point` (redo).
    ///
    /// The moving preview restarts at the committed position, or is
    /// cleared when the commit ended the subpath. Works on an empty
    /// subpath too, where the anchor becomes `first`.
    pub(crate) fn recommit_anchor(&mut self, anchor: AnchorPoint, finishes: bool) {
        self.moving = (!finishes).then(|| AnchorPoint::mirror_of(&anchor));
        self.anchors.push(anchor);
        self.debug_check_wiring();
    }

    /// Close the subpath.
    ///
    /// If the last anchor sits on the first one it is dropped and its
    /// incoming control becomes the first anchor's incoming control.
    /// Returns a history record when `add_to_history` is set.
    pub fn close(&mut self, add_to_history: bool) -> Option<PathEdit> {
        let mut dropped = None;
        let n = self.anchors.len();
        if n > 1 && self.anchors[n - 1].same_position_as(&self.anchors[0]) {
            if let Some(duplicate) = self.anchors.pop() {
                let first = &mut self.anchors[0];
                let first_ctrl_in = first.ctrl_in.pos;
                first.ctrl_in.pos = duplicate.ctrl_in.pos;
                dropped = Some(DroppedDuplicate {
                    anchor: duplicate,
                    first_ctrl_in,
                });
            }
        }
        self.moving = None;
        self.closed = true;
        self.debug_check_wiring();
        tracing::debug!("Closed subpath {} with {} anchors", self.id, self.anchors.len());

        add_to_history.then(|| PathEdit::CloseSubPath {
            subpath: self.id,
            dropped,
        })
    }

    /// Reverse `close`: reopen, reinstate a dropped duplicate, and put a
    /// moving anchor on `first` so building can continue.
    pub fn undo_closing(&mut self, dropped: Option<&DroppedDuplicate>) {
        self.closed = false;
        if let Some(dropped) = dropped {
            if let Some(first) = self.anchors.first_mut() {
                first.ctrl_in.pos = dropped.first_ctrl_in;
            }
            self.anchors.push(dropped.anchor.clone());
        }
        self.moving = self.anchors.first().map(AnchorPoint::mirror_of);
        self.debug_check_wiring();
    }

    /// Remove an anchor by id, returning its former index and the anchor
    pub fn delete_point(&mut self, anchor: EntityId) -> Option<(usize, AnchorPoint)> {
        let index = self.position_of(anchor)?;
        let removed = self.anchors.remove(index);
        self.debug_check_wiring();
        Some((index, removed))
    }

    /// Put an anchor back at an index (undo of `delete_point`)
    pub(crate) fn insert_point(&mut self, index: usize, anchor: AnchorPoint) {
        let index = index.min(self.anchors.len());
        self.anchors.insert(index, anchor);
        self.debug_check_wiring();
    }

    /// Remove the last committed anchor.
    ///
    /// When nothing is moving (the subpath had been finished), the removed
    /// anchor becomes the moving one so the cursor preview resumes from it.
    /// Returns the id of the removed anchor.
    pub fn delete_last(&mut self) -> Option<EntityId> {
        let removed = self.anchors.pop()?;
        let id = removed.id();
        if self.moving.is_none() {
            self.moving = Some(removed);
        }
        self.debug_check_wiring();
        Some(id)
    }

    /// Hit test committed anchors in order; the first match wins
    pub fn hit(&self, view: Point, radius: f64, prefer_ctrls: bool) -> Option<(EntityId, Handle)> {
        self.anchors.iter().find_map(|ap| {
            ap.hit(view, radius, prefer_ctrls)
                .map(|handle| (ap.id(), handle))
        })
    }

    /// Re-derive view positions of every point after a view change
    pub fn view_changed(&mut self, transform: &impl ViewTransform) {
        for ap in &mut self.anchors {
            ap.recompute_view(transform);
        }
        if let Some(moving) = &mut self.moving {
            moving.recompute_view(transform);
        }
    }

    /// Assign edit-mode anchor types
    pub fn classify_anchors(&mut self, built_interactively: bool) {
        for ap in &mut self.anchors {
            ap.classify(built_interactively);
        }
    }

    /// Build the geometry of this subpath in the given space
    pub fn build_shape(&self, space: Space) -> BezPath {
        let mut bez = BezPath::new();
        self.append_to(&mut bez, space);
        bez
    }

    /// Append this subpath's geometry to a shape.
    ///
    /// Emits a move to `first`, one segment per pair of consecutive anchors,
    /// a provisional segment to the moving anchor, and for closed subpaths a
    /// segment back to `first` followed by a close element.
    pub fn append_to(&self, bez: &mut BezPath, space: Space) {
        let (Some(first), Some(last)) = (self.anchors.first(), self.anchors.last()) else {
            return;
        };
        bez.move_to(first.pos.get(space));
        for pair in self.anchors.windows(2) {
            push_segment(bez, &pair[0], &pair[1], space);
        }
        if let Some(moving) = &self.moving {
            push_segment(bez, last, moving, space);
        }
        if self.closed {
            push_segment(bez, last, first, space);
            bez.close_path();
        }
    }

    /// Check that every anchor and its controls are wired together
    pub fn check_wiring(&self) -> Result<(), WiringError> {
        for (index, ap) in self.anchors.iter().chain(self.moving.iter()).enumerate() {
            if ap.ctrl_in.side == ap.ctrl_out.side {
                return Err(WiringError::SameControls { index });
            }
            if ap.ctrl_in.anchor != ap.id() {
                return Err(WiringError::CtrlInOwner { index });
            }
            if ap.ctrl_in.side != CtrlSide::In || ap.ctrl_in.sibling_side() != ap.ctrl_out.side {
                return Err(WiringError::CtrlInSibling { index });
            }
            if ap.ctrl_out.anchor != ap.id() {
                return Err(WiringError::CtrlOutOwner { index });
            }
            if ap.ctrl_out.side != CtrlSide::Out || ap.ctrl_out.sibling_side() != ap.ctrl_in.side
            {
                return Err(WiringError::CtrlOutSibling { index });
            }
        }
        Ok(())
    }

    fn debug_check_wiring(&self) {
        debug_assert_eq!(self.check_wiring(), Ok(()), "subpath {} is miswired", self.id);
    }
}

/// Line when both facing controls are retracted, cubic otherwise
fn push_segment(bez: &mut BezPath, from: &AnchorPoint, to: &AnchorPoint, space: Space) {
    if from.is_retracted(CtrlSide::Out) && to.is_retracted(CtrlSide::In) {
        bez.line_to(to.pos.get(space));
    } else {
        bez.curve_to(
            from.ctrl_out.pos.get(space),
            to.ctrl_in.pos.get(space),
            to.pos.get(space),
        );
    }
}

impl fmt::Display for SubPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.anchors.is_empty() {
            return writeln!(f, "Empty subpath {}", self.id);
        }
        let state = if self.closed { "closed" } else { "open" };
        writeln!(f, "Subpath {} ({state})", self.id)?;
        let last_index = self.anchors.len() - 1;
        for (i, ap) in self.anchors.iter().enumerate() {
            write!(f, "  point {i}: ")?;
            if i == 0 {
                write!(f, "first ")?;
            }
            if i == last_index {
                write!(f, "last ")?;
            }
            writeln!(f, "{ap}")?;
        }
        if let Some(moving) = &self.moving {
            writeln!(f, "  moving: {moving}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::viewport::ViewPort;
    use kurbo::PathEl;

    fn anchor(x: f64, y: f64) -> AnchorPoint {
        AnchorPoint::from_image(Point::new(x, y), &ViewPort::new())
    }

    fn subpath_of(points: &[(f64, f64)]) -> SubPath {
        let mut sp = SubPath::new();
        for (i, (x, y)) in points.iter().enumerate() {
            if i == 0 {
                sp.add_first_point(anchor(*x, *y));
            } else {
                assert!(sp.add_point(anchor(*x, *y)));
            }
        }
        sp
    }

    fn count_segments(bez: &BezPath) -> (usize, usize, usize) {
        let mut lines = 0;
        let mut curves = 0;
        let mut closes = 0;
        for el in bez.elements() {
            match el {
                PathEl::LineTo(_) => lines += 1,
                PathEl::CurveTo(..) => curves += 1,
                PathEl::ClosePath => closes += 1,
                _ => {}
            }
        }
        (lines, curves, closes)
    }

    #[test]
    fn first_point_sets_first_and_last() {
        let sp = subpath_of(&[(1.0, 2.0)]);
        assert_eq!(sp.len(), 1);
        assert_eq!(sp.first().map(|p| p.id()), sp.last().map(|p| p.id()));
    }

    #[test]
    fn add_point_skips_duplicate_of_last() {
        let mut sp = subpath_of(&[(0.0, 0.0), (5.0, 5.0)]);
        assert!(!sp.add_point(anchor(5.0, 5.0)));
        assert_eq!(sp.len(), 2);
    }

    #[test]
    fn retracted_open_subpath_is_lines() {
        let sp = subpath_of(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let bez = sp.build_shape(Space::Image);
        assert_eq!(count_segments(&bez), (2, 0, 0));
        assert_eq!(bez.elements()[0], PathEl::MoveTo(Point::new(0.0, 0.0)));
    }

    #[test]
    fn closed_subpath_has_closing_segment_and_marker() {
        let mut sp = subpath_of(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let edit = sp.close(true);
        assert!(matches!(edit, Some(PathEdit::CloseSubPath { dropped: None, .. })));
        let bez = sp.build_shape(Space::Image);
        assert_eq!(count_segments(&bez), (3, 0, 1));
        assert_eq!(bez.elements().last(), Some(&PathEl::ClosePath));
        assert_eq!(
            bez.elements()[bez.elements().len() - 2],
            PathEl::LineTo(Point::new(0.0, 0.0))
        );
    }

    #[test]
    fn n_anchors_closed_give_n_segments() {
        for n in 2..8 {
            let points: Vec<_> = (0..n).map(|i| (i as f64 * 3.0, (i * i) as f64)).collect();
            let mut sp = subpath_of(&points);
            sp.close(false);
            let (lines, curves, closes) = count_segments(&sp.build_shape(Space::View));
            assert_eq!(lines + curves, n);
            assert_eq!(closes, 1);
        }
    }

    #[test]
    fn build_shape_is_idempotent() {
        let vp = ViewPort::new();
        let mut sp = subpath_of(&[(0.0, 0.0), (10.0, 0.0)]);
        sp.last_mut().unwrap().drag_ctrl_out_symmetric(Point::new(15.0, 5.0), &vp);
        sp.set_moving(anchor(20.0, 20.0));
        let a = sp.build_shape(Space::Image);
        let b = sp.build_shape(Space::Image);
        assert_eq!(a, b);
    }

    #[test]
    fn extended_control_makes_a_curve() {
        let vp = ViewPort::new();
        let mut sp = subpath_of(&[(0.0, 0.0)]);
        sp.last_mut().unwrap().drag_ctrl_out_symmetric(Point::new(5.0, 5.0), &vp);
        sp.set_moving(anchor(20.0, 0.0));
        let bez = sp.build_shape(Space::Image);
        assert_eq!(
            bez.elements()[1],
            PathEl::CurveTo(Point::new(5.0, 5.0), Point::new(20.0, 0.0), Point::new(20.0, 0.0))
        );
    }

    #[test]
    fn spaces_differ_only_by_transform() {
        let mut vp = ViewPort::new();
        vp.set_zoom(2.0);
        let mut sp = SubPath::new();
        sp.add_first_point(AnchorPoint::from_image(Point::new(1.0, 1.0), &vp));
        sp.add_point(AnchorPoint::from_image(Point::new(3.0, 1.0), &vp));
        let view = sp.build_shape(Space::View);
        let image = sp.build_shape(Space::Image);
        assert_eq!(vp.affine() * image, view);
    }

    #[test]
    fn close_drops_duplicate_and_merges_ctrl_in() {
        let vp = ViewPort::new();
        let mut sp = subpath_of(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let mut dup = anchor(0.0, 0.0);
        dup.drag_ctrl_out_symmetric(Point::new(2.0, 3.0), &vp);
        let dup_in = dup.ctrl_in.pos;
        sp.add_point(dup);
        assert_eq!(sp.len(), 4);

        let edit = sp.close(true);
        assert_eq!(sp.len(), 3);
        assert_eq!(sp.first().unwrap().ctrl_in.pos, dup_in);
        assert_eq!(sp.last().unwrap().pos.image(), Point::new(10.0, 10.0));
        assert!(matches!(edit, Some(PathEdit::CloseSubPath { dropped: Some(_), .. })));
        assert_eq!(sp.check_wiring(), Ok(()));
    }

    #[test]
    fn undo_closing_reopens_with_moving_on_first() {
        let mut sp = subpath_of(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        sp.close(true);
        sp.undo_closing(None);
        assert!(!sp.is_closed());
        let moving = sp.moving().unwrap();
        assert_eq!(moving.pos.image(), sp.first().unwrap().pos.image());
        assert_ne!(moving.id(), sp.first().unwrap().id());
        assert_eq!(sp.check_wiring(), Ok(()));
    }

    #[test]
    fn undo_closing_restores_dropped_duplicate() {
        let mut sp = subpath_of(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)]);
        let before = sp.clone();
        let Some(PathEdit::CloseSubPath { dropped, .. }) = sp.close(true) else {
            panic!("close must produce a record");
        };
        sp.undo_closing(dropped.as_ref());
        assert_eq!(sp.anchors(), before.anchors());
        assert!(sp.moving().is_some());
    }

    #[test]
    fn recommit_restarts_preview_at_anchor() {
        let mut sp = SubPath::new();
        let first = anchor(3.0, 4.0);
        sp.recommit_anchor(first.clone(), false);
        assert_eq!(sp.first(), Some(&first));
        let preview = sp.moving().unwrap();
        assert_ne!(preview.id(), first.id());
        assert_eq!(preview.pos.image(), Point::new(3.0, 4.0));

        sp.recommit_anchor(anchor(9.0, 4.0), false);
        assert_eq!(sp.moving().unwrap().pos.image(), Point::new(9.0, 4.0));

        sp.recommit_anchor(anchor(9.0, 9.0), true);
        assert!(sp.moving().is_none());
        assert_eq!(sp.len(), 3);
    }

    #[test]
    fn delete_last_repurposes_removed_point_as_moving() {
        let mut sp = subpath_of(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let first_id = sp.first().unwrap().id();
        let removed = sp.delete_last().unwrap();
        assert_eq!(sp.len(), 2);
        assert_eq!(sp.moving().unwrap().id(), removed);
        assert_eq!(sp.last().unwrap().pos.image(), Point::new(10.0, 0.0));
        assert_eq!(sp.first().unwrap().id(), first_id);
    }

    #[test]
    fn delete_last_keeps_existing_moving() {
        let mut sp = subpath_of(&[(0.0, 0.0), (10.0, 0.0)]);
        let preview = anchor(30.0, 30.0);
        let preview_id = preview.id();
        sp.set_moving(preview);
        sp.delete_last();
        assert_eq!(sp.moving().unwrap().id(), preview_id);
    }

    #[test]
    fn delete_last_of_single_point_empties() {
        let mut sp = subpath_of(&[(4.0, 4.0)]);
        sp.delete_last();
        assert!(sp.is_empty());
        assert!(sp.first().is_none());
        assert!(sp.moving().is_some());
        assert_eq!(sp.build_shape(Space::Image), BezPath::new());
    }

    #[test]
    fn delete_point_updates_ends() {
        let mut sp = subpath_of(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let first = sp.first().unwrap().id();
        let (index, _) = sp.delete_point(first).unwrap();
        assert_eq!(index, 0);
        assert_eq!(sp.first().unwrap().pos.image(), Point::new(10.0, 0.0));
        let last = sp.last().unwrap().id();
        sp.delete_point(last);
        assert_eq!(sp.last().unwrap().pos.image(), Point::new(10.0, 0.0));
        assert_eq!(sp.len(), 1);
    }

    #[test]
    fn finalize_commits_moving_point() {
        let vp = ViewPort::new();
        let mut sp = subpath_of(&[(0.0, 0.0)]);
        sp.set_moving(anchor(1.0, 1.0));
        let edit = sp.finalize_moving_point(Point::new(20.0, 0.0), false, &vp).unwrap();
        assert!(sp.moving().is_none());
        assert_eq!(sp.len(), 2);
        assert_eq!(sp.last().unwrap().pos.image(), Point::new(20.0, 0.0));
        match edit {
            PathEdit::AddAnchor { anchor, finishes_subpath, .. } => {
                assert_eq!(anchor.id(), sp.last().unwrap().id());
                assert!(!finishes_subpath);
            }
            other => panic!("unexpected record {other:?}"),
        }
        assert!(sp.finalize_moving_point(Point::ZERO, false, &vp).is_none());
    }

    #[test]
    fn wiring_holds_across_mixed_mutations() {
        let vp = ViewPort::new();
        let mut sp = subpath_of(&[(0.0, 0.0), (5.0, 0.0)]);
        for i in 0..20 {
            let x = i as f64 * 2.0;
            match i % 5 {
                0 => {
                    sp.set_moving(anchor(x, 7.0));
                    sp.finalize_moving_point(Point::new(x, 9.0), false, &vp);
                }
                1 => {
                    sp.delete_last();
                }
                2 => {
                    sp.close(true);
                }
                3 => sp.undo_closing(None),
                _ => {
                    if let Some(id) = sp.anchors().get(1).map(|a| a.id()) {
                        sp.delete_point(id);
                    }
                }
            }
            assert_eq!(sp.check_wiring(), Ok(()));
        }
    }

    #[test]
    fn check_wiring_reports_broken_owner() {
        let mut sp = subpath_of(&[(0.0, 0.0), (5.0, 0.0)]);
        sp.anchors[1].ctrl_out.anchor = EntityId::next();
        assert_eq!(sp.check_wiring(), Err(WiringError::CtrlOutOwner { index: 1 }));
    }

    #[test]
    fn check_wiring_reports_same_controls() {
        let mut sp = subpath_of(&[(0.0, 0.0)]);
        sp.anchors[0].ctrl_out.side = CtrlSide::In;
        assert_eq!(sp.check_wiring(), Err(WiringError::SameControls { index: 0 }));
    }

    #[test]
    fn view_change_recomputes_view_positions() {
        let mut sp = subpath_of(&[(1.0, 2.0), (3.0, 4.0)]);
        sp.set_moving(anchor(5.0, 6.0));
        let mut vp = ViewPort::new();
        vp.set_zoom(4.0);
        sp.view_changed(&vp);
        assert_eq!(sp.anchors()[1].pos.view(), Point::new(12.0, 16.0));
        assert_eq!(sp.moving().unwrap().pos.view(), Point::new(20.0, 24.0));
        assert_eq!(sp.anchors()[1].pos.image(), Point::new(3.0, 4.0));
    }

    #[test]
    fn dump_marks_first_last_and_moving() {
        let mut sp = subpath_of(&[(0.0, 0.0), (1.0, 0.0)]);
        sp.set_moving(anchor(2.0, 0.0));
        let text = sp.to_string();
        assert!(text.contains("first"));
        assert!(text.contains("last"));
        assert!(text.contains("moving"));
    }
}
