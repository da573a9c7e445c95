// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Kinds of undoable path edits

use std::fmt;

/// Kind of edit recorded in the history
///
/// Each kind has a user visible name shown in undo/redo menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// An anchor was committed while building
    AddAnchor,

    /// A subpath was closed
    CloseSubPath,

    /// An anchor or one of its controls was dragged in edit mode
    MovePoint,

    /// An anchor was deleted in edit mode
    DeletePoint,

    /// A whole subpath was deleted with its last anchor
    DeleteSubPath,

    /// The path was turned into a selection
    ConvertToSelection,
}

impl EditKind {
    /// Name of the edit as shown to the user
    pub fn name(self) -> &'static str {
        match self {
            EditKind::AddAnchor => "Add Anchor Point",
            EditKind::CloseSubPath => "Close Subpath",
            EditKind::MovePoint => "Move Point",
            EditKind::DeletePoint => "Delete Point",
            EditKind::DeleteSubPath => "Delete Subpath",
            EditKind::ConvertToSelection => "Convert Path to Selection",
        }
    }
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
