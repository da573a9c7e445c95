// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Scripted input replay
//!
//! A script is a JSON document describing a canvas and a list of input
//! commands. Replaying feeds the commands into an `EditSession` exactly as
//! a host application would forward them.

use crate::editing::{EditSession, Modifiers};
use crate::settings::PenSettings;
use anyhow::{Context, Result};
use kurbo::{Point, Rect, Vec2};
use serde::Deserialize;

const DEFAULT_CANVAS_SIZE: f64 = 1000.0;

fn default_canvas_size() -> f64 {
    DEFAULT_CANVAS_SIZE
}

/// One input command
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Command {
    Press {
        x: f64,
        y: f64,
        #[serde(default)]
        mods: Modifiers,
    },
    Drag {
        x: f64,
        y: f64,
        #[serde(default)]
        mods: Modifiers,
    },
    Release {
        x: f64,
        y: f64,
        #[serde(default)]
        mods: Modifiers,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        mods: Modifiers,
    },
    Escape,
    Undo,
    Redo,
    Zoom {
        zoom: f64,
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    Scroll {
        dx: f64,
        dy: f64,
    },
    EditMode,
    BuildMode,
    Delete {
        x: f64,
        y: f64,
    },
    ToSelection,
    NewDocument,
    SwitchDocument {
        index: usize,
    },
    Dump,
}

/// A canvas and the commands to run against it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default = "default_canvas_size")]
    pub width: f64,
    #[serde(default = "default_canvas_size")]
    pub height: f64,
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Script {
    fn canvas(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

pub fn parse_script(text: &str) -> Result<Script> {
    serde_json::from_str(text).context("Failed to parse input script")
}

/// Run every command of `script` through a fresh session.
///
/// Commands that fail (undo with nothing to undo, converting an empty path,
/// and so on) are logged and skipped.
pub fn replay(script: &Script, settings: PenSettings) -> EditSession {
    let mut session = EditSession::new(script.canvas(), settings);
    for (index, command) in script.commands.iter().enumerate() {
        tracing::debug!("[replay] #{index} {command:?}");
        apply(&mut session, script, command);
    }
    session
}

fn apply(session: &mut EditSession, script: &Script, command: &Command) {
    match *command {
        Command::Press { x, y, mods } => session.pointer_down(Point::new(x, y), mods),
        Command::Drag { x, y, mods } => session.pointer_dragged(Point::new(x, y), mods),
        Command::Release { x, y, mods } => session.pointer_up(Point::new(x, y), mods),
        Command::Move { x, y, mods } => session.pointer_moved(Point::new(x, y), mods),
        Command::Escape => session.escape(),
        Command::Undo => match session.undo() {
            Ok(None) => tracing::warn!("Nothing to undo"),
            Ok(Some(_)) => {}
            Err(err) => tracing::warn!("Undo failed: {err}"),
        },
        Command::Redo => match session.redo() {
            Ok(None) => tracing::warn!("Nothing to redo"),
            Ok(Some(_)) => {}
            Err(err) => tracing::warn!("Redo failed: {err}"),
        },
        Command::Zoom { zoom, x, y } => session.zoom_about(Point::new(x, y), zoom),
        Command::Scroll { dx, dy } => session.scroll(Vec2::new(dx, dy)),
        Command::EditMode => {
            if let Err(err) = session.start_editing() {
                tracing::warn!("Cannot enter edit mode: {err}");
            }
        }
        Command::BuildMode => session.start_building(),
        Command::Delete { x, y } => {
            if !session.delete_at(Point::new(x, y)) {
                tracing::warn!("Nothing deleted at ({x}, {y})");
            }
        }
        Command::ToSelection => match session.convert_to_selection() {
            Ok(handle) => tracing::info!("Created selection {handle:?}"),
            Err(err) => tracing::warn!("Cannot convert to selection: {err}"),
        },
        Command::NewDocument => {
            let index = session.add_document(script.canvas());
            session.switch_document(index);
        }
        Command::SwitchDocument { index } => {
            session.switch_document(index);
        }
        Command::Dump => {
            let history = &session.document().history;
            tracing::info!(
                "Document {} of {}, undo: {}, redo: {}\n{}",
                session.active_index() + 1,
                session.documents().len(),
                history.undo_name().unwrap_or("-"),
                history.redo_name().unwrap_or("-"),
                session.document()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Space;
    use crate::tools::ModeId;

    const TRIANGLE: &str = r#"{
        "width": 200,
        "height": 200,
        "commands": [
            {"event": "press", "x": 10, "y": 10},
            {"event": "release", "x": 10, "y": 10},
            {"event": "press", "x": 100, "y": 10},
            {"event": "release", "x": 100, "y": 10},
            {"event": "press", "x": 100, "y": 100},
            {"event": "release", "x": 100, "y": 100},
            {"event": "press", "x": 11, "y": 10},
            {"event": "release", "x": 11, "y": 10}
        ]
    }"#;

    #[test]
    fn parses_commands() {
        let script = parse_script(
            r#"{"commands": [
                {"event": "press", "x": 1, "y": 2, "mods": {"ctrl": true}},
                {"event": "undo"},
                {"event": "switch_document", "index": 1},
                {"event": "zoom", "zoom": 2.5}
            ]}"#,
        )
        .unwrap();
        assert_eq!(script.width, DEFAULT_CANVAS_SIZE);
        assert_eq!(
            script.commands[0],
            Command::Press {
                x: 1.0,
                y: 2.0,
                mods: Modifiers {
                    ctrl: true,
                    ..Modifiers::default()
                }
            }
        );
        assert_eq!(script.commands[1], Command::Undo);
        assert_eq!(script.commands[2], Command::SwitchDocument { index: 1 });
        assert_eq!(
            script.commands[3],
            Command::Zoom {
                zoom: 2.5,
                x: 0.0,
                y: 0.0
            }
        );
    }

    #[test]
    fn unknown_event_is_an_error() {
        assert!(parse_script(r#"{"commands": [{"event": "explode"}]}"#).is_err());
    }

    #[test]
    fn replays_a_closed_triangle() {
        let script = parse_script(TRIANGLE).unwrap();
        let session = replay(&script, PenSettings::default());
        assert_eq!(session.mode_id(), ModeId::Edit);
        let path = session.document().path.as_ref().unwrap();
        let sp = &path.subpaths()[0];
        assert!(sp.is_closed());
        assert_eq!(sp.len(), 3);
        let bez = path.build_shape(Space::Image);
        assert_eq!(bez.elements().last(), Some(&kurbo::PathEl::ClosePath));
    }

    #[test]
    fn failing_commands_are_skipped() {
        let script = parse_script(
            r#"{"commands": [
                {"event": "undo"},
                {"event": "to_selection"},
                {"event": "edit_mode"},
                {"event": "switch_document", "index": 3},
                {"event": "press", "x": 5, "y": 5},
                {"event": "release", "x": 5, "y": 5}
            ]}"#,
        )
        .unwrap();
        let session = replay(&script, PenSettings::default());
        assert!(session.document().path.is_some());
        assert_eq!(session.document().history.undo_len(), 1);
    }

    #[test]
    fn new_document_becomes_active() {
        let script = parse_script(
            r#"{"commands": [
                {"event": "press", "x": 5, "y": 5},
                {"event": "release", "x": 5, "y": 5},
                {"event": "new_document"},
                {"event": "dump"},
                {"event": "switch_document", "index": 0},
                {"event": "dump"}
            ]}"#,
        )
        .unwrap();
        let session = replay(&script, PenSettings::default());
        assert_eq!(session.documents().len(), 2);
        assert_eq!(session.active_index(), 0);
        assert!(session.document().path.is_some());
        assert!(session.documents()[1].path.is_none());
    }

    #[test]
    fn undo_of_close_returns_to_building() {
        let mut script = parse_script(TRIANGLE).unwrap();
        script.commands.push(Command::Undo);
        let session = replay(&script, PenSettings::default());
        assert_eq!(session.mode_id(), ModeId::Build);
        let sp = &session.document().path.as_ref().unwrap().subpaths()[0];
        assert!(!sp.is_closed());
    }
}
