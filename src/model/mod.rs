// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Document model

pub mod document;
pub mod entity_id;
pub mod selection;

pub use document::Document;
pub use entity_id::EntityId;
pub use selection::{CanvasSelection, SelectionConsumer, SelectionHandle};
