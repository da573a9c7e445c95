// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod edit_types;
pub mod history;
pub mod mouse;
pub mod session;
pub mod viewport;

pub use edit_types::EditKind;
pub use hit_test::HitTarget;
pub use history::{History, PathEdit};
pub use mouse::{Drag, Modifiers, Mouse, MouseDelegate, MouseEvent};
pub use session::EditSession;
pub use viewport::{ViewPort, ViewTransform};
