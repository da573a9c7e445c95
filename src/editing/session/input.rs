// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer and keyboard input for EditSession

use super::EditSession;
use crate::editing::mouse::{Modifiers, MouseEvent};
use kurbo::Point;

impl EditSession {
    pub fn pointer_down(&mut self, pos: Point, mods: Modifiers) {
        let event = MouseEvent::new(pos, mods);
        self.mouse
            .mouse_down(event, &mut self.tool, &mut self.documents[self.active]);
    }

    /// Pointer movement with the button held
    pub fn pointer_dragged(&mut self, pos: Point, mods: Modifiers) {
        let event = MouseEvent::new(pos, mods);
        self.mouse
            .mouse_dragged(event, &mut self.tool, &mut self.documents[self.active]);
    }

    /// Pointer movement; treated as a drag while the button is down
    pub fn pointer_moved(&mut self, pos: Point, mods: Modifiers) {
        let event = MouseEvent::new(pos, mods);
        self.mouse
            .mouse_moved(event, &mut self.tool, &mut self.documents[self.active]);
    }

    pub fn pointer_up(&mut self, pos: Point, mods: Modifiers) {
        let event = MouseEvent::new(pos, mods);
        self.mouse
            .mouse_up(event, &mut self.tool, &mut self.documents[self.active]);
    }

    /// Escape key
    pub fn escape(&mut self) {
        self.mouse
            .cancel(&mut self.tool, &mut self.documents[self.active]);
    }
}
