// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! A document: its view, active path, history, and selection target

use super::selection::{CanvasSelection, SelectionConsumer, SelectionHandle};
use crate::editing::edit_types::EditKind;
use crate::editing::history::{History, PathEdit};
use crate::editing::viewport::ViewPort;
use crate::error::{EditError, SelectionError};
use crate::path::Path;
use crate::settings::PenSettings;
use kurbo::{Point, Rect, Vec2};
use std::fmt;

/// Everything the pen tool edits belongs to a document
#[derive(Debug)]
pub struct Document {
    pub viewport: ViewPort,
    /// The path being built or edited; `None` until the first press
    pub path: Option<Path>,
    pub history: History,
    pub selection: Box<dyn SelectionConsumer>,
}

impl Document {
    /// A document with a canvas of the given bounds and default settings
    pub fn new(canvas: Rect) -> Self {
        Self::with_settings(canvas, &PenSettings::default())
    }

    pub fn with_settings(canvas: Rect, settings: &PenSettings) -> Self {
        Self::with_consumer(Box::new(CanvasSelection::new(canvas)), settings)
    }

    /// A document feeding selections to a custom consumer
    pub fn with_consumer(selection: Box<dyn SelectionConsumer>, settings: &PenSettings) -> Self {
        Self {
            viewport: ViewPort::with_zoom_limits(settings.min_zoom, settings.max_zoom),
            path: None,
            history: History::new(settings.max_undo_depth),
            selection,
        }
    }

    /// The active path, created empty if there is none
    pub fn path_or_create(&mut self) -> &mut Path {
        self.path.get_or_insert_with(Path::new)
    }

    pub fn record(&mut self, edit: PathEdit) {
        self.history.record(edit);
    }

    /// Undo the most recent edit.
    ///
    /// Returns the kind of edit that was reversed, or `None` when there was
    /// nothing to undo. A record that no longer applies is dropped.
    pub fn undo(&mut self) -> Result<Option<EditKind>, EditError> {
        let Some(edit) = self.history.pop_undo() else {
            return Ok(None);
        };
        if let Err(err) = edit.undo(self) {
            tracing::warn!("Dropping undo record '{}': {err}", edit.name());
            return Err(err);
        }
        tracing::debug!("[Document::undo] {}", edit.name());
        let kind = edit.kind();
        self.history.push_redo(edit);
        self.settle_path();
        Ok(Some(kind))
    }

    /// Redo the most recently undone edit
    pub fn redo(&mut self) -> Result<Option<EditKind>, EditError> {
        let Some(edit) = self.history.pop_redo() else {
            return Ok(None);
        };
        if let Err(err) = edit.redo(self) {
            tracing::warn!("Dropping redo record '{}': {err}", edit.name());
            return Err(err);
        }
        tracing::debug!("[Document::redo] {}", edit.name());
        let kind = edit.kind();
        self.history.push_undo(edit);
        self.settle_path();
        Ok(Some(kind))
    }

    /// Turn the active path into a selection.
    ///
    /// On success the path is consumed and the conversion is recorded. On
    /// failure nothing changes and nothing is recorded.
    pub fn convert_path_to_selection(&mut self) -> Result<SelectionHandle, SelectionError> {
        let path = self.path.as_ref().ok_or(SelectionError::EmptyPath)?;
        let handle = path.to_selection(self.selection.as_mut())?;
        if let Some(path) = self.path.take() {
            tracing::info!("Converted path to selection {handle}");
            self.record(PathEdit::ConvertToSelection {
                path,
                selection: handle,
            });
        }
        Ok(handle)
    }

    /// Zoom keeping the view position `about` fixed
    pub fn zoom_about(&mut self, about: Point, zoom: f64) {
        self.viewport.zoom_about(about, zoom);
        self.view_changed();
    }

    pub fn scroll(&mut self, delta: Vec2) {
        self.viewport.scroll(delta);
        self.view_changed();
    }

    /// Re-derive every view position from the current viewport
    pub fn view_changed(&mut self) {
        if let Some(path) = &mut self.path {
            path.view_changed(&self.viewport);
        }
    }

    /// Drop a path left without subpaths and refresh view positions
    fn settle_path(&mut self) {
        if self.path.as_ref().is_some_and(Path::is_empty) {
            self.path = None;
        }
        self.view_changed();
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path}"),
            None => writeln!(f, "No active path"),
        }
    }
}
