// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for path editing

use crate::model::EntityId;
use thiserror::Error;

/// An anchor and its controls are not wired together correctly.
///
/// This never happens in correct code; it is reported by
/// `SubPath::check_wiring` and asserted on in debug builds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WiringError {
    #[error("ctrl_in of point {index} does not belong to its anchor")]
    CtrlInOwner { index: usize },
    #[error("ctrl_out of point {index} does not belong to its anchor")]
    CtrlOutOwner { index: usize },
    #[error("ctrl_in of point {index} is not the sibling of ctrl_out")]
    CtrlInSibling { index: usize },
    #[error("ctrl_out of point {index} is not the sibling of ctrl_in")]
    CtrlOutSibling { index: usize },
    #[error("point {index} uses the same control for both sides")]
    SameControls { index: usize },
}

/// A history record could not be applied to the current document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("there is no active path")]
    NoPath,
    #[error("subpath {0} no longer exists")]
    MissingSubPath(EntityId),
    #[error("anchor {anchor} no longer exists in subpath {subpath}")]
    MissingAnchor { subpath: EntityId, anchor: EntityId },
    #[error("subpath {0} is not in the state this edit expects")]
    UnexpectedState(EntityId),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Converting a path to a selection produced nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no selection was created because the path is empty")]
    EmptyPath,
    #[error("no selection was created because the path is outside the canvas")]
    OutsideCanvas,
}

/// A requested mode switch is not possible right now
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("there is no path to edit")]
    NoPath,
}
