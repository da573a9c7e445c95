// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Mouse state machine.
//!
//! Raw pointer events (press, move, release) are turned into higher level
//! callbacks on a `MouseDelegate`: clicks, drag begin/change/end, and plain
//! moves. A press only becomes a drag once the pointer has travelled past
//! the drag threshold.

use kurbo::{Point, Vec2};
use serde::Deserialize;

/// Keyboard modifiers held during a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

/// A pointer event in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub pos: Point,
    pub mods: Modifiers,
}

impl MouseEvent {
    pub fn new(pos: Point, mods: Modifiers) -> Self {
        Self { pos, mods }
    }
}

/// An in-progress drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    /// Where the button went down
    pub start: Point,
    /// Position of the previous drag event
    pub prev: Point,
    pub current: Point,
}

impl Drag {
    /// Movement since the previous drag event
    pub fn delta(&self) -> Vec2 {
        self.current - self.prev
    }

    /// Movement since the press
    pub fn total(&self) -> Vec2 {
        self.current - self.start
    }
}

/// Receives interpreted mouse input
#[allow(unused_variables)]
pub trait MouseDelegate {
    type Data;

    fn left_down(&mut self, event: MouseEvent, data: &mut Self::Data) {}

    fn left_up(&mut self, event: MouseEvent, data: &mut Self::Data) {}

    /// Button released without a drag
    fn left_click(&mut self, event: MouseEvent, data: &mut Self::Data) {}

    /// Pointer moved with no button down
    fn mouse_moved(&mut self, event: MouseEvent, data: &mut Self::Data) {}

    fn left_drag_began(&mut self, event: MouseEvent, drag: Drag, data: &mut Self::Data) {}

    fn left_drag_changed(&mut self, event: MouseEvent, drag: Drag, data: &mut Self::Data) {}

    fn left_drag_ended(&mut self, event: MouseEvent, drag: Drag, data: &mut Self::Data) {}

    /// Abandon whatever interaction is in progress
    fn cancel(&mut self, data: &mut Self::Data);
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum MouseState {
    #[default]
    Up,
    Down(MouseEvent),
    Drag(Drag),
}

/// Tracks the button state between events
#[derive(Debug, Clone, Default)]
pub struct Mouse {
    state: MouseState,
    drag_threshold: f64,
}

impl Mouse {
    pub fn new(drag_threshold: f64) -> Self {
        Self {
            state: MouseState::Up,
            drag_threshold,
        }
    }

    pub fn is_down(&self) -> bool {
        !matches!(self.state, MouseState::Up)
    }

    pub fn mouse_down<T: MouseDelegate>(
        &mut self,
        event: MouseEvent,
        delegate: &mut T,
        data: &mut T::Data,
    ) {
        if self.is_down() {
            tracing::warn!("[mouse_down] press while the button is already down, ignored");
            return;
        }
        self.state = MouseState::Down(event);
        delegate.left_down(event, data);
    }

    /// Pointer movement, with or without the button held
    pub fn mouse_moved<T: MouseDelegate>(
        &mut self,
        event: MouseEvent,
        delegate: &mut T,
        data: &mut T::Data,
    ) {
        match self.state {
            MouseState::Up => delegate.mouse_moved(event, data),
            MouseState::Down(down) => {
                if down.pos.distance(event.pos) < self.drag_threshold {
                    return;
                }
                let drag = Drag {
                    start: down.pos,
                    prev: down.pos,
                    current: event.pos,
                };
                self.state = MouseState::Drag(drag);
                delegate.left_drag_began(event, drag, data);
                delegate.left_drag_changed(event, drag, data);
            }
            MouseState::Drag(prev) => {
                let drag = Drag {
                    start: prev.start,
                    prev: prev.current,
                    current: event.pos,
                };
                self.state = MouseState::Drag(drag);
                delegate.left_drag_changed(event, drag, data);
            }
        }
    }

    /// Pointer movement that the input source reports as a drag.
    ///
    /// A drag without a preceding press is ignored.
    pub fn mouse_dragged<T: MouseDelegate>(
        &mut self,
        event: MouseEvent,
        delegate: &mut T,
        data: &mut T::Data,
    ) {
        if !self.is_down() {
            tracing::warn!("[mouse_dragged] drag without a press, ignored");
            return;
        }
        self.mouse_moved(event, delegate, data);
    }

    pub fn mouse_up<T: MouseDelegate>(
        &mut self,
        event: MouseEvent,
        delegate: &mut T,
        data: &mut T::Data,
    ) {
        match std::mem::take(&mut self.state) {
            MouseState::Up => {
                tracing::warn!("[mouse_up] release without a press, ignored");
            }
            MouseState::Down(_) => {
                delegate.left_click(event, data);
                delegate.left_up(event, data);
            }
            MouseState::Drag(prev) => {
                let drag = Drag {
                    start: prev.start,
                    prev: prev.current,
                    current: event.pos,
                };
                delegate.left_drag_ended(event, drag, data);
                delegate.left_up(event, data);
            }
        }
    }

    /// Forget the button state and tell the delegate to cancel
    pub fn cancel<T: MouseDelegate>(&mut self, delegate: &mut T, data: &mut T::Data) {
        self.state = MouseState::Up;
        delegate.cancel(data);
    }

    /// Forget the button state without notifying anyone
    pub fn reset(&mut self) {
        self.state = MouseState::Up;
    }
}
