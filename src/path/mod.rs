// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! The editable path: an ordered list of subpaths.
//!
//! A `Path` is what the pen tool builds and edits. It is converted to a
//! `kurbo::BezPath` in view space for drawing and in image space when it
//! becomes a selection.

pub mod import;
pub mod point;
pub mod subpath;

pub use point::{AnchorPoint, AnchorType, ControlPoint, CtrlSide, DualPoint, Handle, Space};
pub use subpath::{DroppedDuplicate, SubPath};

use crate::editing::viewport::ViewTransform;
use crate::error::{SelectionError, WiringError};
use crate::model::{EntityId, SelectionConsumer, SelectionHandle};
use kurbo::BezPath;
use std::fmt;

/// A path made of one or more subpaths
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    subpaths: Vec<SubPath>,
    /// The subpath receiving new anchors while building
    current: Option<EntityId>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    /// Number of subpaths
    pub fn len(&self) -> usize {
        self.subpaths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Whether any subpath has at least one committed anchor
    pub fn has_anchors(&self) -> bool {
        self.subpaths.iter().any(|sp| !sp.is_empty())
    }

    pub fn subpath(&self, id: EntityId) -> Option<&SubPath> {
        self.subpaths.iter().find(|sp| sp.id() == id)
    }

    pub fn subpath_mut(&mut self, id: EntityId) -> Option<&mut SubPath> {
        self.subpaths.iter_mut().find(|sp| sp.id() == id)
    }

    /// The subpath being built, if any
    pub fn current(&self) -> Option<&SubPath> {
        self.current.and_then(|id| self.subpath(id))
    }

    pub fn current_mut(&mut self) -> Option<&mut SubPath> {
        let id = self.current?;
        self.subpath_mut(id)
    }

    /// Begin a new, empty subpath and make it current
    pub fn start_subpath(&mut self) -> &mut SubPath {
        self.push_subpath(SubPath::new())
    }

    /// Append a subpath and make it current
    pub fn push_subpath(&mut self, subpath: SubPath) -> &mut SubPath {
        self.current = Some(subpath.id());
        let index = self.subpaths.len();
        self.subpaths.push(subpath);
        &mut self.subpaths[index]
    }

    /// Put a subpath back at an index
    pub(crate) fn insert_subpath(&mut self, index: usize, subpath: SubPath) {
        let index = index.min(self.subpaths.len());
        if self.current.is_none() {
            self.current = Some(subpath.id());
        }
        self.subpaths.insert(index, subpath);
    }

    /// Remove a subpath, returning its former index and the subpath.
    ///
    /// If it was current, the last remaining subpath becomes current.
    pub fn remove_subpath(&mut self, id: EntityId) -> Option<(usize, SubPath)> {
        let index = self.subpaths.iter().position(|sp| sp.id() == id)?;
        let removed = self.subpaths.remove(index);
        if self.current == Some(id) {
            self.current = self.subpaths.last().map(SubPath::id);
        }
        Some((index, removed))
    }

    /// The whole path as one shape in the given space
    pub fn build_shape(&self, space: Space) -> BezPath {
        let mut bez = BezPath::new();
        for sp in &self.subpaths {
            sp.append_to(&mut bez, space);
        }
        bez
    }

    /// Hand the image-space shape of this path to a selection consumer
    pub fn to_selection(
        &self,
        consumer: &mut dyn SelectionConsumer,
    ) -> Result<SelectionHandle, SelectionError> {
        if !self.has_anchors() {
            return Err(SelectionError::EmptyPath);
        }
        let handle = SelectionHandle::next();
        consumer.create_selection(handle, &self.build_shape(Space::Image))?;
        Ok(handle)
    }

    /// Re-derive view positions after the view transform changed
    pub fn view_changed(&mut self, transform: &impl ViewTransform) {
        for sp in &mut self.subpaths {
            sp.view_changed(transform);
        }
    }

    /// Assign edit-mode anchor types in every subpath
    pub fn classify_anchors(&mut self, built_interactively: bool) {
        for sp in &mut self.subpaths {
            sp.classify_anchors(built_interactively);
        }
    }

    pub fn check_wiring(&self) -> Result<(), WiringError> {
        self.subpaths.iter().try_for_each(SubPath::check_wiring)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Path with {} subpaths", self.subpaths.len())?;
        for sp in &self.subpaths {
            write!(f, "{sp}")?;
        }
        Ok(())
    }
}
