// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! The pen tool: switches between building and editing, and keeps its mode
//! in step with the document after undo, redo, and document switches.

use super::{BuildMode, BuildOutcome, EditMode, ModeId, PenMode};
use crate::editing::edit_types::EditKind;
use crate::editing::mouse::{Drag, MouseDelegate, MouseEvent};
use crate::error::{EditError, ModeError, SelectionError};
use crate::model::{Document, SelectionHandle};
use crate::path::Path;
use crate::settings::PenSettings;
use kurbo::Point;

#[derive(Debug, Clone, Default)]
pub struct PenTool {
    mode: PenMode,
    settings: PenSettings,
}

impl PenTool {
    pub fn new(settings: PenSettings) -> Self {
        Self {
            mode: PenMode::default(),
            settings,
        }
    }

    pub fn settings(&self) -> &PenSettings {
        &self.settings
    }

    pub fn mode(&self) -> &PenMode {
        &self.mode
    }

    pub fn mode_id(&self) -> ModeId {
        self.mode.id()
    }

    /// Switch to edit mode.
    ///
    /// Fails without changing anything when the document has no path with
    /// anchors. Anchor types are assigned on entry.
    pub fn start_editing(
        &mut self,
        doc: &mut Document,
        built_interactively: bool,
    ) -> Result<(), ModeError> {
        let Some(path) = doc.path.as_mut().filter(|path| path.has_anchors()) else {
            tracing::info!("There is no path to edit");
            return Err(ModeError::NoPath);
        };
        if let Some(sp) = path.current_mut() {
            sp.clear_moving();
        }
        path.classify_anchors(built_interactively);
        self.mode = PenMode::Edit(EditMode::default());
        tracing::debug!("[PenTool] edit mode");
        Ok(())
    }

    /// Switch to build mode; the next press continues or starts a subpath
    pub fn start_building(&mut self, doc: &Document) {
        let mut build = BuildMode::default();
        build.sync_with(doc);
        self.mode = PenMode::Build(build);
        tracing::debug!("[PenTool] build mode");
    }

    /// Escape: abandon the current interaction
    pub fn escape(&mut self, doc: &mut Document) {
        self.mode.cancel(doc);
    }

    pub fn undo(&mut self, doc: &mut Document) -> Result<Option<EditKind>, EditError> {
        let result = doc.undo();
        if let Ok(Some(kind)) = &result {
            tracing::info!("Undo {kind}");
        }
        self.resync(doc, None);
        result
    }

    pub fn redo(&mut self, doc: &mut Document) -> Result<Option<EditKind>, EditError> {
        let result = doc.redo();
        if let Ok(Some(kind)) = &result {
            tracing::info!("Redo {kind}");
        }
        self.resync(doc, result.as_ref().ok().copied().flatten());
        result
    }

    /// Delete the anchor under the pointer (edit mode only)
    pub fn delete_at(&mut self, view: Point, doc: &mut Document) -> bool {
        let deleted = match &mut self.mode {
            PenMode::Edit(mode) => mode.delete_at(view, doc, &self.settings),
            PenMode::Build(_) => {
                tracing::debug!("[PenTool::delete_at] not in edit mode");
                false
            }
        };
        if deleted && doc.path.is_none() {
            self.start_building(doc);
        }
        deleted
    }

    /// Turn the document's path into a selection and start over in build
    /// mode. Nothing changes if no selection could be made.
    pub fn convert_to_selection(
        &mut self,
        doc: &mut Document,
    ) -> Result<SelectionHandle, SelectionError> {
        let handle = doc.convert_path_to_selection().inspect_err(|err| {
            tracing::info!("{err}");
        })?;
        self.mode = PenMode::default();
        Ok(handle)
    }

    /// Another document became active
    pub fn document_activated(&mut self, doc: &Document) {
        let finished = doc
            .path
            .as_ref()
            .is_some_and(|path| path.has_anchors() && !in_progress(path));
        if finished {
            self.mode = PenMode::Edit(EditMode::default());
        } else {
            self.start_building(doc);
        }
        tracing::debug!("[PenTool::document_activated] {:?}", self.mode_id());
    }

    /// Follow the document after its path changed under us
    fn resync(&mut self, doc: &Document, redone: Option<EditKind>) {
        let Some(path) = doc.path.as_ref().filter(|path| path.has_anchors()) else {
            self.start_building(doc);
            return;
        };
        let editing = match self.mode {
            PenMode::Edit(_) => true,
            PenMode::Build(_) => redone == Some(EditKind::CloseSubPath),
        };
        if in_progress(path) || !editing {
            self.start_building(doc);
        } else {
            self.mode = PenMode::Edit(EditMode::default());
        }
    }
}

/// The current subpath is open and has a moving anchor
fn in_progress(path: &Path) -> bool {
    path.current()
        .is_some_and(|sp| !sp.is_closed() && sp.moving().is_some())
}

// ===== MouseDelegate Implementation =====

impl MouseDelegate for PenTool {
    type Data = Document;

    fn left_down(&mut self, event: MouseEvent, doc: &mut Document) {
        self.mode.press(event, doc, &self.settings);
    }

    fn left_drag_changed(&mut self, event: MouseEvent, drag: Drag, doc: &mut Document) {
        self.mode.drag(event, drag, doc);
    }

    fn left_up(&mut self, event: MouseEvent, doc: &mut Document) {
        if self.mode.release(event, doc) == BuildOutcome::SubPathClosed
            && let Err(err) = self.start_editing(doc, true)
        {
            tracing::warn!("Could not enter edit mode after closing: {err}");
        }
    }

    fn mouse_moved(&mut self, event: MouseEvent, doc: &mut Document) {
        self.mode.mouse_moved(event, doc);
    }

    fn cancel(&mut self, doc: &mut Document) {
        self.escape(doc);
    }
}
