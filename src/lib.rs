// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Penpath: interactive Bezier path building and editing for raster image
//! editors

use anyhow::{Context, Result, bail};
use std::path::Path as FsPath;

pub mod editing;
pub mod error;
pub mod model;
pub mod path;
pub mod replay;
pub mod settings;
pub mod tools;

pub use editing::{EditSession, Modifiers, ViewPort, ViewTransform};
pub use model::{Document, EntityId};
pub use path::{Path, Space, SubPath};
pub use settings::PenSettings;
pub use tools::{ModeId, PenTool};

/// Entry point for the penpath command line tool
pub fn run() -> Result<()> {
    // Initialize tracing subscriber (can be controlled via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("penpath=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(script_path) = args.get(1) else {
        bail!("Usage: penpath <script.json> [settings.toml]");
    };

    let settings = match args.get(2) {
        Some(settings_path) => PenSettings::load(FsPath::new(settings_path))?,
        None => PenSettings::default(),
    };

    let text = std::fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script {script_path}"))?;
    let script = replay::parse_script(&text)?;
    tracing::info!(
        "Replaying {} commands from {script_path}",
        script.commands.len()
    );

    let session = replay::replay(&script, settings);
    match &session.document().path {
        Some(path) => println!("{}", path.build_shape(Space::Image).to_svg()),
        None => println!("no path"),
    }
    Ok(())
}
