// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit mode: dragging anchors and controls of an existing path

use crate::editing::hit_test::{self, HitTarget};
use crate::editing::history::PathEdit;
use crate::editing::mouse::{Drag, MouseEvent};
use crate::model::Document;
use crate::path::{AnchorPoint, Handle};
use crate::settings::PenSettings;
use kurbo::Point;

/// The handle being dragged and its anchor as it was at the press
#[derive(Debug, Clone)]
struct DraggedHandle {
    target: HitTarget,
    before: AnchorPoint,
}

#[derive(Debug, Clone, Default)]
pub struct EditMode {
    dragged: Option<DraggedHandle>,
}

impl EditMode {
    /// The handle under the pointer at the last press, while dragging
    pub fn dragged(&self) -> Option<HitTarget> {
        self.dragged.as_ref().map(|d| d.target)
    }

    /// Pick the handle under the pointer. Alt prefers controls over anchors.
    pub fn press(&mut self, event: MouseEvent, doc: &Document, settings: &PenSettings) {
        self.dragged = doc.path.as_ref().and_then(|path| {
            let target = hit_test::hit_test(path, event.pos, settings.hit_radius, event.mods.alt)?;
            let before = hit_test::target_anchor(path, &target)?.clone();
            tracing::debug!("[EditMode::press] grabbed {:?} of {}", target.handle, target.anchor);
            Some(DraggedHandle { target, before })
        });
    }

    /// Move the grabbed handle by the drag delta.
    ///
    /// Anchors carry their controls along unless Ctrl is held. Controls
    /// follow the anchor type unless Alt is held.
    pub fn drag(&mut self, event: MouseEvent, drag: Drag, doc: &mut Document) {
        let Some(dragged) = &self.dragged else {
            return;
        };
        let vp = doc.viewport;
        let Some(anchor) = anchor_mut(doc, &dragged.target) else {
            return;
        };
        let delta = drag.delta();
        let view = anchor.handle_pos(dragged.target.handle).view() + delta;
        match dragged.target.handle {
            Handle::Anchor if event.mods.ctrl => anchor.move_anchor_only(view, &vp),
            Handle::Anchor => anchor.translate(delta, &vp),
            Handle::Ctrl(side) => anchor.move_ctrl(side, view, event.mods.alt, &vp),
        }
    }

    /// Finish a drag, recording it if anything moved
    pub fn release(&mut self, doc: &mut Document) {
        let Some(dragged) = self.dragged.take() else {
            return;
        };
        let Some(after) = anchor_mut(doc, &dragged.target).cloned() else {
            return;
        };
        if same_positions(&dragged.before, &after) {
            return;
        }
        tracing::debug!("[EditMode::release] moved {}", after.id());
        doc.record(PathEdit::MovePoint {
            subpath: dragged.target.subpath,
            before: dragged.before,
            after,
        });
    }

    /// Abandon a drag, putting the handle back where it was
    pub fn cancel(&mut self, doc: &mut Document) {
        if let Some(dragged) = self.dragged.take()
            && let Some(anchor) = anchor_mut(doc, &dragged.target)
        {
            anchor.copy_positions_from(&dragged.before);
        }
    }

    /// Delete the anchor under a view position.
    ///
    /// Removing the only anchor of a subpath removes the subpath. Pointing
    /// at a control retracts it instead. Returns whether anything changed.
    pub fn delete_at(&mut self, view: Point, doc: &mut Document, settings: &PenSettings) -> bool {
        self.dragged = None;
        let vp = doc.viewport;
        let Some(path) = doc.path.as_mut() else {
            return false;
        };
        let Some(target) = hit_test::hit_test(path, view, settings.hit_radius, false) else {
            return false;
        };
        let edit = match target.handle {
            Handle::Ctrl(side) => {
                let Some(anchor) = path
                    .subpath_mut(target.subpath)
                    .and_then(|sp| sp.anchor_mut(target.anchor))
                else {
                    return false;
                };
                let before = anchor.clone();
                let anchor_view = anchor.pos.view();
                anchor.ctrl_mut(side).pos.move_to(anchor_view, &vp);
                PathEdit::MovePoint {
                    subpath: target.subpath,
                    before,
                    after: anchor.clone(),
                }
            }
            Handle::Anchor => {
                let single = path.subpath(target.subpath).is_some_and(|sp| sp.len() == 1);
                if single {
                    let Some((index, subpath)) = path.remove_subpath(target.subpath) else {
                        return false;
                    };
                    PathEdit::DeleteSubPath { index, subpath }
                } else {
                    let Some((index, anchor)) = path
                        .subpath_mut(target.subpath)
                        .and_then(|sp| sp.delete_point(target.anchor))
                    else {
                        return false;
                    };
                    PathEdit::DeletePoint {
                        subpath: target.subpath,
                        index,
                        anchor,
                    }
                }
            }
        };
        if path.is_empty() {
            doc.path = None;
        }
        tracing::info!("{}", edit.name());
        doc.record(edit);
        true
    }
}

fn anchor_mut<'a>(doc: &'a mut Document, target: &HitTarget) -> Option<&'a mut AnchorPoint> {
    doc.path
        .as_mut()
        .and_then(|path| path.subpath_mut(target.subpath))
        .and_then(|sp| sp.anchor_mut(target.anchor))
}

fn same_positions(a: &AnchorPoint, b: &AnchorPoint) -> bool {
    a.pos == b.pos && a.ctrl_in.pos == b.ctrl_in.pos && a.ctrl_out.pos == b.ctrl_out.pos
}
