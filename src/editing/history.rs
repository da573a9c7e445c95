// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Undo and redo for path edits.
//!
//! Every user-level edit is stored as a `PathEdit` record that knows how to
//! reverse and reapply itself against a `Document`. Records refer to
//! subpaths and anchors by `EntityId`, so they stay valid when other edits
//! shift indices around. A record that no longer matches the document is
//! reported as an `EditError` and dropped.

use super::edit_types::EditKind;
use crate::error::EditError;
use crate::model::{Document, EntityId, SelectionHandle};
use crate::path::{AnchorPoint, DroppedDuplicate, Path, Space, SubPath};
use std::collections::VecDeque;

// ===== Edit Records =====

/// A reversible edit of the active path
#[derive(Debug, Clone, PartialEq)]
pub enum PathEdit {
    /// An anchor was appended to a subpath. The first anchor of a subpath
    /// also creates the subpath.
    AddAnchor {
        subpath: EntityId,
        anchor: AnchorPoint,
        finishes_subpath: bool,
    },
    CloseSubPath {
        subpath: EntityId,
        dropped: Option<DroppedDuplicate>,
    },
    MovePoint {
        subpath: EntityId,
        before: AnchorPoint,
        after: AnchorPoint,
    },
    DeletePoint {
        subpath: EntityId,
        index: usize,
        anchor: AnchorPoint,
    },
    DeleteSubPath {
        index: usize,
        subpath: SubPath,
    },
    /// The path was consumed by a selection; holds the path as it was
    ConvertToSelection {
        path: Path,
        selection: SelectionHandle,
    },
}

impl PathEdit {
    pub fn kind(&self) -> EditKind {
        match self {
            PathEdit::AddAnchor { .. } => EditKind::AddAnchor,
            PathEdit::CloseSubPath { .. } => EditKind::CloseSubPath,
            PathEdit::MovePoint { .. } => EditKind::MovePoint,
            PathEdit::DeletePoint { .. } => EditKind::DeletePoint,
            PathEdit::DeleteSubPath { .. } => EditKind::DeleteSubPath,
            PathEdit::ConvertToSelection { .. } => EditKind::ConvertToSelection,
        }
    }

    /// Name shown to the user
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// The subpath this record acts on, if it acts on a single one
    pub fn subpath(&self) -> Option<EntityId> {
        match self {
            PathEdit::AddAnchor { subpath, .. }
            | PathEdit::CloseSubPath { subpath, .. }
            | PathEdit::MovePoint { subpath, .. }
            | PathEdit::DeletePoint { subpath, .. } => Some(*subpath),
            PathEdit::DeleteSubPath { subpath, .. } => Some(subpath.id()),
            PathEdit::ConvertToSelection { .. } => None,
        }
    }

    /// Reverse this edit
    pub fn undo(&self, doc: &mut Document) -> Result<(), EditError> {
        match self {
            PathEdit::AddAnchor {
                subpath, anchor, ..
            } => {
                let path = doc.path.as_mut().ok_or(EditError::NoPath)?;
                let sp = subpath_mut(path, *subpath)?;
                if sp.last().map(AnchorPoint::id) != Some(anchor.id()) {
                    return Err(EditError::MissingAnchor {
                        subpath: *subpath,
                        anchor: anchor.id(),
                    });
                }
                if sp.len() == 1 {
                    path.remove_subpath(*subpath);
                } else {
                    sp.delete_last();
                }
            }
            PathEdit::CloseSubPath { subpath, dropped } => {
                let sp = subpath_mut(active_path(doc)?, *subpath)?;
                if !sp.is_closed() {
                    return Err(EditError::UnexpectedState(*subpath));
                }
                sp.undo_closing(dropped.as_ref());
            }
            PathEdit::MovePoint {
                subpath, before, ..
            } => {
                anchor_mut(active_path(doc)?, *subpath, before.id())?.copy_positions_from(before);
            }
            PathEdit::DeletePoint {
                subpath,
                index,
                anchor,
            } => {
                let sp = subpath_mut(active_path(doc)?, *subpath)?;
                if sp.anchor(anchor.id()).is_some() {
                    return Err(EditError::UnexpectedState(*subpath));
                }
                sp.insert_point(*index, anchor.clone());
            }
            PathEdit::DeleteSubPath { index, subpath } => {
                let path = doc.path_or_create();
                if path.subpath(subpath.id()).is_some() {
                    return Err(EditError::UnexpectedState(subpath.id()));
                }
                path.insert_subpath(*index, subpath.clone());
            }
            PathEdit::ConvertToSelection { path, selection } => {
                doc.selection.remove_selection(*selection);
                doc.path = Some(path.clone());
            }
        }
        Ok(())
    }

    /// Reapply this edit after it was undone
    pub fn redo(&self, doc: &mut Document) -> Result<(), EditError> {
        match self {
            PathEdit::AddAnchor {
                subpath,
                anchor,
                finishes_subpath,
            } => {
                let path = doc.path_or_create();
                match path.subpath_mut(*subpath) {
                    Some(sp) => sp.recommit_anchor(anchor.clone(), *finishes_subpath),
                    None => {
                        let mut sp = SubPath::with_id(*subpath);
                        sp.recommit_anchor(anchor.clone(), *finishes_subpath);
                        path.push_subpath(sp);
                    }
                }
            }
            PathEdit::CloseSubPath { subpath, .. } => {
                let sp = subpath_mut(active_path(doc)?, *subpath)?;
                if sp.is_closed() {
                    return Err(EditError::UnexpectedState(*subpath));
                }
                sp.close(false);
            }
            PathEdit::MovePoint { subpath, after, .. } => {
                anchor_mut(active_path(doc)?, *subpath, after.id())?.copy_positions_from(after);
            }
            PathEdit::DeletePoint {
                subpath, anchor, ..
            } => {
                subpath_mut(active_path(doc)?, *subpath)?
                    .delete_point(anchor.id())
                    .ok_or(EditError::MissingAnchor {
                        subpath: *subpath,
                        anchor: anchor.id(),
                    })?;
            }
            PathEdit::DeleteSubPath { subpath, .. } => {
                active_path(doc)?
                    .remove_subpath(subpath.id())
                    .ok_or(EditError::MissingSubPath(subpath.id()))?;
            }
            PathEdit::ConvertToSelection { path, selection } => {
                let shape = path.build_shape(Space::Image);
                doc.selection.create_selection(*selection, &shape)?;
                doc.path = None;
            }
        }
        Ok(())
    }
}

fn active_path(doc: &mut Document) -> Result<&mut Path, EditError> {
    doc.path.as_mut().ok_or(EditError::NoPath)
}

fn subpath_mut(path: &mut Path, subpath: EntityId) -> Result<&mut SubPath, EditError> {
    path.subpath_mut(subpath)
        .ok_or(EditError::MissingSubPath(subpath))
}

fn anchor_mut(
    path: &mut Path,
    subpath: EntityId,
    anchor: EntityId,
) -> Result<&mut AnchorPoint, EditError> {
    subpath_mut(path, subpath)?
        .anchor_mut(anchor)
        .ok_or(EditError::MissingAnchor { subpath, anchor })
}

// ===== History =====

/// Undo and redo stacks of one document
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<PathEdit>,
    redo_stack: Vec<PathEdit>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(crate::settings::history::MAX_UNDO_DEPTH)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Add a new edit. Clears the redo stack and drops the oldest record
    /// beyond the depth limit.
    pub fn record(&mut self, edit: PathEdit) {
        tracing::debug!("[History::record] {}", edit.name());
        self.redo_stack.clear();
        self.undo_stack.push_back(edit);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of records that can be undone
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Name of the edit the next undo would reverse
    pub fn undo_name(&self) -> Option<&'static str> {
        self.undo_stack.back().map(PathEdit::name)
    }

    pub fn redo_name(&self) -> Option<&'static str> {
        self.redo_stack.last().map(PathEdit::name)
    }

    /// Refresh the anchor held by the newest record if that record
    /// committed it. Controls dragged out right after the press belong to
    /// the same edit.
    pub(crate) fn amend_added_anchor(&mut self, anchor: &AnchorPoint) {
        if let Some(PathEdit::AddAnchor {
            anchor: recorded, ..
        }) = self.undo_stack.back_mut()
            && recorded.id() == anchor.id()
        {
            *recorded = anchor.clone();
        }
    }

    pub(crate) fn pop_undo(&mut self) -> Option<PathEdit> {
        self.undo_stack.pop_back()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<PathEdit> {
        self.redo_stack.pop()
    }

    /// Keep an undone record so it can be redone
    pub(crate) fn push_redo(&mut self, edit: PathEdit) {
        self.redo_stack.push(edit);
    }

    /// Keep a redone record so it can be undone again
    pub(crate) fn push_undo(&mut self, edit: PathEdit) {
        self.undo_stack.push_back(edit);
    }

    /// Drop every record that acts on a discarded subpath
    pub fn forget_subpath(&mut self, subpath: EntityId) {
        let before = self.undo_stack.len() + self.redo_stack.len();
        self.undo_stack.retain(|edit| edit.subpath() != Some(subpath));
        self.redo_stack.retain(|edit| edit.subpath() != Some(subpath));
        let forgotten = before - self.undo_stack.len() - self.redo_stack.len();
        if forgotten > 0 {
            tracing::debug!("[History::forget_subpath] dropped {forgotten} records for {subpath}");
        }
    }
}
