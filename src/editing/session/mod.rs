// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit session - the open documents, the pen tool, and the mouse state

mod input;

use super::edit_types::EditKind;
use super::mouse::Mouse;
use crate::error::{EditError, ModeError, SelectionError};
use crate::model::{Document, SelectionHandle};
use crate::settings::PenSettings;
use crate::tools::{ModeId, PenTool};
use kurbo::{Point, Rect, Vec2};

/// Editing session over one or more documents
///
/// Only the active document receives input. Each document keeps its own
/// path and history; the pen tool is shared and re-syncs its mode when the
/// active document changes.
#[derive(Debug)]
pub struct EditSession {
    documents: Vec<Document>,
    active: usize,
    tool: PenTool,
    mouse: Mouse,
    settings: PenSettings,
}

impl EditSession {
    /// A session with one document covering `canvas`
    pub fn new(canvas: Rect, settings: PenSettings) -> Self {
        Self {
            documents: vec![Document::with_settings(canvas, &settings)],
            active: 0,
            tool: PenTool::new(settings.clone()),
            mouse: Mouse::new(settings.drag_threshold),
            settings,
        }
    }

    pub fn settings(&self) -> &PenSettings {
        &self.settings
    }

    pub fn mode_id(&self) -> ModeId {
        self.tool.mode_id()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn document(&self) -> &Document {
        &self.documents[self.active]
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.documents[self.active]
    }

    // ===== Documents =====

    /// Open another document and return its index. The active document
    /// does not change.
    pub fn add_document(&mut self, canvas: Rect) -> usize {
        self.documents
            .push(Document::with_settings(canvas, &self.settings));
        self.documents.len() - 1
    }

    /// Make another document active. Returns false for an unknown index.
    pub fn switch_document(&mut self, index: usize) -> bool {
        if index >= self.documents.len() {
            tracing::warn!("[switch_document] no document at index {index}");
            return false;
        }
        self.mouse.reset();
        self.active = index;
        self.tool.document_activated(&self.documents[index]);
        tracing::info!("Switched to document {index}");
        true
    }

    // ===== Commands =====

    pub fn undo(&mut self) -> Result<Option<EditKind>, EditError> {
        self.mouse.reset();
        self.tool.undo(&mut self.documents[self.active])
    }

    pub fn redo(&mut self) -> Result<Option<EditKind>, EditError> {
        self.mouse.reset();
        self.tool.redo(&mut self.documents[self.active])
    }

    pub fn start_editing(&mut self) -> Result<(), ModeError> {
        self.mouse.reset();
        self.tool.start_editing(&mut self.documents[self.active], true)
    }

    pub fn start_building(&mut self) {
        self.mouse.reset();
        self.tool.start_building(&self.documents[self.active]);
    }

    pub fn delete_at(&mut self, view: Point) -> bool {
        self.tool.delete_at(view, &mut self.documents[self.active])
    }

    pub fn convert_to_selection(&mut self) -> Result<SelectionHandle, SelectionError> {
        self.mouse.reset();
        self.tool
            .convert_to_selection(&mut self.documents[self.active])
    }

    /// Zoom the active document keeping the view position `about` fixed
    pub fn zoom_about(&mut self, about: Point, zoom: f64) {
        self.document_mut().zoom_about(about, zoom);
    }

    pub fn scroll(&mut self, delta: Vec2) {
        self.document_mut().scroll(delta);
    }
}
