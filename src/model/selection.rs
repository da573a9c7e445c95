// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Consumers of image-space shapes produced by "path to selection"

use super::EntityId;
use crate::error::SelectionError;
use kurbo::{BezPath, Rect, Shape};
use std::fmt;

/// Identifies a selection created from a path
pub type SelectionHandle = EntityId;

/// Something that turns a closed image-space shape into a selection
pub trait SelectionConsumer: fmt::Debug {
    /// Create a selection from `shape` under a caller-chosen handle.
    ///
    /// Replaces any previous selection.
    fn create_selection(
        &mut self,
        handle: SelectionHandle,
        shape: &BezPath,
    ) -> Result<(), SelectionError>;

    /// Remove the selection with this handle, if it still exists
    fn remove_selection(&mut self, handle: SelectionHandle);
}

/// A selection clipped to the bounds of a canvas
#[derive(Debug, Clone)]
pub struct CanvasSelection {
    canvas: Rect,
    current: Option<(SelectionHandle, BezPath)>,
}

impl CanvasSelection {
    pub fn new(canvas: Rect) -> Self {
        Self {
            canvas,
            current: None,
        }
    }

    /// The active selection and its shape
    pub fn current(&self) -> Option<(SelectionHandle, &BezPath)> {
        self.current.as_ref().map(|(handle, shape)| (*handle, shape))
    }
}

impl SelectionConsumer for CanvasSelection {
    fn create_selection(
        &mut self,
        handle: SelectionHandle,
        shape: &BezPath,
    ) -> Result<(), SelectionError> {
        let visible = shape.bounding_box().intersect(self.canvas);
        if visible.area() <= 0.0 {
            tracing::info!("Selection {handle} is outside the canvas");
            return Err(SelectionError::OutsideCanvas);
        }
        self.current = Some((handle, shape.clone()));
        tracing::debug!("[create_selection] {handle} covers {visible:?}");
        Ok(())
    }

    fn remove_selection(&mut self, handle: SelectionHandle) {
        if self.current.as_ref().is_some_and(|(h, _)| *h == handle) {
            self.current = None;
        }
    }
}
