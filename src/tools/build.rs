// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Build mode: laying down anchors with click and click-drag.
//!
//! A press commits an anchor, dragging pulls its outgoing control out (the
//! incoming one mirrors it), and after the release a moving anchor follows
//! the cursor until the next press. Pressing on the first anchor closes the
//! subpath; Ctrl-press ends it open.

use crate::editing::history::PathEdit;
use crate::editing::mouse::MouseEvent;
use crate::model::Document;
use crate::path::{AnchorPoint, Path};
use crate::settings::PenSettings;

/// Where the builder is in the click/drag cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    /// Waiting for the press that starts a new subpath
    #[default]
    NoMouseDraggedYet,
    /// A moving anchor follows the cursor
    MovingToNextCurvePoint,
    /// The button is down and drags shape the last anchor's controls
    DraggingTheControlOfLast,
}

/// What a release means for the tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Continue,
    /// The subpath was closed; building is over
    SubPathClosed,
}

#[derive(Debug, Clone, Default)]
pub struct BuildMode {
    state: BuildState,
    /// The current press landed on the first anchor
    closing: bool,
}

impl BuildMode {
    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn press(&mut self, event: MouseEvent, doc: &mut Document, settings: &PenSettings) {
        match self.state {
            BuildState::NoMouseDraggedYet => self.start_subpath(event, doc),
            BuildState::MovingToNextCurvePoint => self.commit_moving(event, doc, settings),
            BuildState::DraggingTheControlOfLast => {
                tracing::warn!("[BuildMode::press] press while dragging, ignored");
            }
        }
    }

    fn start_subpath(&mut self, event: MouseEvent, doc: &mut Document) {
        let vp = doc.viewport;
        let anchor = AnchorPoint::from_view(event.pos, &vp);
        let sp = doc.path_or_create().start_subpath();
        let edit = PathEdit::AddAnchor {
            subpath: sp.id(),
            anchor: anchor.clone(),
            finishes_subpath: false,
        };
        sp.add_first_point(anchor);
        tracing::debug!("[BuildMode] started subpath {} at {:?}", sp.id(), event.pos);
        doc.record(edit);
        self.closing = false;
        self.state = BuildState::DraggingTheControlOfLast;
    }

    fn commit_moving(&mut self, event: MouseEvent, doc: &mut Document, settings: &PenSettings) {
        let vp = doc.viewport;
        let in_progress = doc
            .path
            .as_mut()
            .and_then(Path::current_mut)
            .filter(|sp| sp.moving().is_some());
        let Some(sp) = in_progress else {
            tracing::warn!("[BuildMode] no moving anchor to commit, starting a new subpath");
            self.start_subpath(event, doc);
            return;
        };

        let close_target = sp
            .first()
            .filter(|first| first.pos.hit(event.pos, settings.close_radius))
            .map(|first| first.pos.view())
            .filter(|_| sp.len() >= 2);
        let closing = close_target.is_some();
        let finishes = closing || event.mods.ctrl;
        let target = close_target.unwrap_or(event.pos);

        let Some(edit) = sp.finalize_moving_point(target, finishes, &vp) else {
            return;
        };
        if event.mods.ctrl && !closing {
            tracing::info!("Finished open subpath {} with {} anchors", sp.id(), sp.len());
        }
        doc.record(edit);

        self.closing = closing;
        self.state = if finishes && !closing {
            BuildState::NoMouseDraggedYet
        } else {
            BuildState::DraggingTheControlOfLast
        };
    }

    /// Shape the last anchor's controls while the button is down
    pub fn drag(&mut self, event: MouseEvent, doc: &mut Document) {
        if self.state != BuildState::DraggingTheControlOfLast {
            return;
        }
        let vp = doc.viewport;
        if let Some(last) = doc
            .path
            .as_mut()
            .and_then(Path::current_mut)
            .and_then(|sp| sp.last_mut())
        {
            last.drag_ctrl_out_symmetric(event.pos, &vp);
        }
    }

    pub fn release(&mut self, event: MouseEvent, doc: &mut Document) -> BuildOutcome {
        if self.state != BuildState::DraggingTheControlOfLast {
            return BuildOutcome::Continue;
        }
        let vp = doc.viewport;
        let Some(sp) = doc.path.as_mut().and_then(Path::current_mut) else {
            self.reset();
            return BuildOutcome::Continue;
        };
        if let Some(last) = sp.last() {
            doc.history.amend_added_anchor(last);
        }

        if self.closing {
            let edit = sp.close(true);
            tracing::info!("Closed subpath {} with {} anchors", sp.id(), sp.len());
            if let Some(edit) = edit {
                doc.record(edit);
            }
            self.reset();
            return BuildOutcome::SubPathClosed;
        }

        sp.set_moving(AnchorPoint::from_view(event.pos, &vp));
        self.state = BuildState::MovingToNextCurvePoint;
        BuildOutcome::Continue
    }

    /// Let the moving anchor follow the cursor. Returns whether anything
    /// changed.
    pub fn mouse_moved(&mut self, event: MouseEvent, doc: &mut Document) -> bool {
        if self.state != BuildState::MovingToNextCurvePoint {
            return false;
        }
        let vp = doc.viewport;
        match doc
            .path
            .as_mut()
            .and_then(Path::current_mut)
            .and_then(|sp| sp.moving_mut())
        {
            Some(moving) => {
                moving.move_to(event.pos, &vp);
                true
            }
            None => false,
        }
    }

    /// Discard the subpath being built.
    ///
    /// History records referring to it are forgotten; a path left without
    /// subpaths is removed from the document.
    pub fn cancel(&mut self, doc: &mut Document) {
        let building = self.state != BuildState::NoMouseDraggedYet;
        self.reset();
        if !building {
            return;
        }
        let Some(path) = doc.path.as_mut() else {
            return;
        };
        let Some(id) = path.current().filter(|sp| !sp.is_closed()).map(|sp| sp.id()) else {
            return;
        };
        path.remove_subpath(id);
        if path.is_empty() {
            doc.path = None;
        }
        doc.history.forget_subpath(id);
        tracing::info!("Discarded subpath {id}");
    }

    /// Pick up where the document's path left off after undo, redo, or a
    /// document switch
    pub fn sync_with(&mut self, doc: &Document) {
        let resumes = doc
            .path
            .as_ref()
            .and_then(Path::current)
            .is_some_and(|sp| !sp.is_closed() && sp.moving().is_some());
        self.closing = false;
        self.state = if resumes {
            BuildState::MovingToNextCurvePoint
        } else {
            BuildState::NoMouseDraggedYet
        };
    }

    pub fn reset(&mut self) {
        self.state = BuildState::NoMouseDraggedYet;
        self.closing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::mouse::Modifiers;
    use crate::path::{CtrlSide, Space};
    use kurbo::{PathEl, Point, Rect};

    fn doc() -> Document {
        Document::new(Rect::new(0.0, 0.0, 500.0, 500.0))
    }

    fn ev(x: f64, y: f64) -> MouseEvent {
        MouseEvent::new(Point::new(x, y), Modifiers::default())
    }

    fn ctrl_ev(x: f64, y: f64) -> MouseEvent {
        let mods = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        MouseEvent::new(Point::new(x, y), mods)
    }

    /// Press and release at one spot, then move to the next
    fn click(mode: &mut BuildMode, doc: &mut Document, x: f64, y: f64) -> BuildOutcome {
        let settings = PenSettings::default();
        mode.press(ev(x, y), doc, &settings);
        mode.release(ev(x, y), doc)
    }

    #[test]
    fn press_drag_release_move_press() {
        let settings = PenSettings::default();
        let mut mode = BuildMode::default();
        let mut doc = doc();

        mode.press(ev(0.0, 0.0), &mut doc, &settings);
        assert_eq!(mode.state(), BuildState::DraggingTheControlOfLast);
        mode.drag(ev(5.0, 5.0), &mut doc);
        mode.release(ev(5.0, 5.0), &mut doc);
        assert_eq!(mode.state(), BuildState::MovingToNextCurvePoint);
        mode.mouse_moved(ev(20.0, 0.0), &mut doc);
        mode.press(ev(20.0, 0.0), &mut doc, &settings);
        mode.drag(ev(25.0, 3.0), &mut doc);

        let sp = doc.path.as_ref().unwrap().current().unwrap();
        assert_eq!(sp.len(), 2);
        let first = sp.first().unwrap();
        assert_eq!(first.ctrl_out.pos.image(), Point::new(5.0, 5.0));
        assert_eq!(first.ctrl_in.pos.image(), Point::new(-5.0, -5.0));
        let second = sp.last().unwrap();
        assert_eq!(second.pos.image(), Point::new(20.0, 0.0));
        assert_eq!(second.ctrl_out.pos.image(), Point::new(25.0, 3.0));
        assert_eq!(second.ctrl_in.pos.image(), Point::new(15.0, -3.0));
        assert_eq!(doc.history.undo_len(), 2);
    }

    #[test]
    fn three_clicks_make_two_lines() {
        let mut mode = BuildMode::default();
        let mut doc = doc();
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)] {
            mode.mouse_moved(ev(x, y), &mut doc);
            click(&mut mode, &mut doc, x, y);
        }
        let sp = doc.path.as_ref().unwrap().current().unwrap();
        assert_eq!(sp.len(), 3);
        sp.anchors()
            .iter()
            .for_each(|ap| assert!(ap.is_retracted(CtrlSide::In) && ap.is_retracted(CtrlSide::Out)));
    }

    #[test]
    fn click_on_first_closes() {
        let mut mode = BuildMode::default();
        let mut doc = doc();
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)] {
            assert_eq!(click(&mut mode, &mut doc, x, y), BuildOutcome::Continue);
        }
        let outcome = click(&mut mode, &mut doc, 2.0, 1.0);
        assert_eq!(outcome, BuildOutcome::SubPathClosed);
        assert_eq!(mode.state(), BuildState::NoMouseDraggedYet);

        let sp = doc.path.as_ref().unwrap().current().unwrap();
        assert!(sp.is_closed());
        assert_eq!(sp.len(), 3);
        assert!(sp.moving().is_none());
        let bez = sp.build_shape(Space::Image);
        assert_eq!(bez.elements().last(), Some(&PathEl::ClosePath));
        // three anchor commits, one commit on first, one close
        assert_eq!(doc.history.undo_len(), 5);
    }

    #[test]
    fn second_anchor_near_first_does_not_close() {
        let mut mode = BuildMode::default();
        let mut doc = doc();
        click(&mut mode, &mut doc, 0.0, 0.0);
        assert_eq!(click(&mut mode, &mut doc, 2.0, 0.0), BuildOutcome::Continue);
        let sp = doc.path.as_ref().unwrap().current().unwrap();
        assert_eq!(sp.len(), 2);
        assert!(!sp.is_closed());
    }

    #[test]
    fn ctrl_press_finishes_open_subpath() {
        let settings = PenSettings::default();
        let mut mode = BuildMode::default();
        let mut doc = doc();
        click(&mut mode, &mut doc, 0.0, 0.0);
        mode.press(ctrl_ev(30.0, 0.0), &mut doc, &settings);
        assert_eq!(mode.state(), BuildState::NoMouseDraggedYet);
        mode.release(ctrl_ev(30.0, 0.0), &mut doc);

        let path = doc.path.as_ref().unwrap();
        let sp = path.current().unwrap();
        assert_eq!(sp.len(), 2);
        assert!(sp.moving().is_none());
        assert!(!sp.is_closed());

        click(&mut mode, &mut doc, 100.0, 100.0);
        assert_eq!(doc.path.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn escape_discards_subpath_and_its_history() {
        let mut mode = BuildMode::default();
        let mut doc = doc();
        click(&mut mode, &mut doc, 0.0, 0.0);
        click(&mut mode, &mut doc, 10.0, 0.0);
        mode.cancel(&mut doc);
        assert!(doc.path.is_none());
        assert!(!doc.history.can_undo());
        assert_eq!(mode.state(), BuildState::NoMouseDraggedYet);
    }

    #[test]
    fn escape_keeps_finished_subpaths() {
        let settings = PenSettings::default();
        let mut mode = BuildMode::default();
        let mut doc = doc();
        click(&mut mode, &mut doc, 0.0, 0.0);
        mode.press(ctrl_ev(30.0, 0.0), &mut doc, &settings);
        mode.release(ctrl_ev(30.0, 0.0), &mut doc);
        click(&mut mode, &mut doc, 100.0, 100.0);
        mode.cancel(&mut doc);

        let path = doc.path.as_ref().unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(doc.history.undo_len(), 2);
    }

    #[test]
    fn moving_anchor_follows_cursor() {
        let mut mode = BuildMode::default();
        let mut doc = doc();
        assert!(!mode.mouse_moved(ev(1.0, 1.0), &mut doc));
        click(&mut mode, &mut doc, 0.0, 0.0);
        assert!(mode.mouse_moved(ev(40.0, 7.0), &mut doc));
        let moving = doc.path.as_ref().unwrap().current().unwrap().moving().unwrap();
        assert_eq!(moving.pos.image(), Point::new(40.0, 7.0));
        let bez = doc.path.as_ref().unwrap().build_shape(Space::View);
        assert_eq!(bez.elements()[1], PathEl::LineTo(Point::new(40.0, 7.0)));
    }

    #[test]
    fn press_uses_current_zoom() {
        let mut mode = BuildMode::default();
        let mut doc = doc();
        doc.zoom_about(Point::ZERO, 2.0);
        click(&mut mode, &mut doc, 20.0, 40.0);
        let sp = doc.path.as_ref().unwrap().current().unwrap();
        assert_eq!(sp.first().unwrap().pos.image(), Point::new(10.0, 20.0));
    }
}
