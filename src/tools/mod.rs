// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! The pen tool and its two modes

pub mod build;
pub mod edit;
pub mod pen;

pub use build::{BuildMode, BuildOutcome, BuildState};
pub use edit::EditMode;
pub use pen::PenTool;

use crate::editing::mouse::{Drag, MouseEvent};
use crate::model::Document;
use crate::settings::PenSettings;

// ===== Mode Identifier =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeId {
    /// Lay down new anchors
    Build,
    /// Reshape existing anchors and controls
    Edit,
}

// ===== PenMode Enum =====

/// Enum wrapping the pen tool's modes
#[derive(Debug, Clone)]
pub enum PenMode {
    Build(BuildMode),
    Edit(EditMode),
}

impl Default for PenMode {
    fn default() -> Self {
        PenMode::Build(BuildMode::default())
    }
}

// ===== PenMode Implementation =====

impl PenMode {
    pub fn id(&self) -> ModeId {
        match self {
            PenMode::Build(_) => ModeId::Build,
            PenMode::Edit(_) => ModeId::Edit,
        }
    }

    pub fn press(&mut self, event: MouseEvent, doc: &mut Document, settings: &PenSettings) {
        match self {
            PenMode::Build(mode) => mode.press(event, doc, settings),
            PenMode::Edit(mode) => mode.press(event, doc, settings),
        }
    }

    pub fn drag(&mut self, event: MouseEvent, drag: Drag, doc: &mut Document) {
        match self {
            PenMode::Build(mode) => mode.drag(event, doc),
            PenMode::Edit(mode) => mode.drag(event, drag, doc),
        }
    }

    pub fn release(&mut self, event: MouseEvent, doc: &mut Document) -> BuildOutcome {
        match self {
            PenMode::Build(mode) => mode.release(event, doc),
            PenMode::Edit(mode) => {
                mode.release(doc);
                BuildOutcome::Continue
            }
        }
    }

    /// Returns whether the view needs repainting
    pub fn mouse_moved(&mut self, event: MouseEvent, doc: &mut Document) -> bool {
        match self {
            PenMode::Build(mode) => mode.mouse_moved(event, doc),
            PenMode::Edit(_) => false,
        }
    }

    pub fn cancel(&mut self, doc: &mut Document) {
        match self {
            PenMode::Build(mode) => mode.cancel(doc),
            PenMode::Edit(mode) => mode.cancel(doc),
        }
    }
}
