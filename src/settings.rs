// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Pen tool settings and configuration constants.
//!
//! The constants at the top are the defaults. `PenSettings` carries the
//! values the tool actually uses and can be loaded from a TOML file, with
//! every missing field falling back to its default.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// HIT TESTING
// ============================================================================
/// Radius around a point that counts as a hit (view pixels)
const HIT_RADIUS: f64 = 6.0;

/// Radius around the first point that closes a subpath (view pixels)
const CLOSE_RADIUS: f64 = 6.0;

/// Distance the pointer has to travel before a press becomes a drag
const DRAG_THRESHOLD: f64 = 1.0;

// ============================================================================
// HISTORY
// ============================================================================
/// Maximum number of undo records kept per document
const MAX_UNDO_DEPTH: usize = 100;

// ============================================================================
// VIEW
// ============================================================================
/// Minimum zoom level (2% of original size)
const MIN_ZOOM: f64 = 0.02;

/// Maximum zoom level (50x original size)
const MAX_ZOOM: f64 = 50.0;

/// Tolerance used when comparing positions in image space
const POSITION_EPSILON: f64 = 1e-6;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Hit testing defaults
pub mod hit {
    pub const RADIUS: f64 = super::HIT_RADIUS;
    pub const CLOSE_RADIUS: f64 = super::CLOSE_RADIUS;
    pub const DRAG_THRESHOLD: f64 = super::DRAG_THRESHOLD;
}

/// History defaults
pub mod history {
    pub const MAX_UNDO_DEPTH: usize = super::MAX_UNDO_DEPTH;
}

/// View transform limits and geometric tolerance
pub mod view {
    pub const MIN_ZOOM: f64 = super::MIN_ZOOM;
    pub const MAX_ZOOM: f64 = super::MAX_ZOOM;

    /// Two positions closer than this are the same position
    pub const POSITION_EPSILON: f64 = super::POSITION_EPSILON;
}

/// Tunable pen tool settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PenSettings {
    /// Hit radius for anchors and controls (view pixels)
    pub hit_radius: f64,
    /// Radius around the first anchor that closes the subpath
    pub close_radius: f64,
    /// Pointer travel before a press turns into a drag
    pub drag_threshold: f64,
    /// Undo records kept before the oldest are discarded
    pub max_undo_depth: usize,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for PenSettings {
    fn default() -> Self {
        Self {
            hit_radius: hit::RADIUS,
            close_radius: hit::CLOSE_RADIUS,
            drag_threshold: hit::DRAG_THRESHOLD,
            max_undo_depth: history::MAX_UNDO_DEPTH,
            min_zoom: view::MIN_ZOOM,
            max_zoom: view::MAX_ZOOM,
        }
    }
}

impl PenSettings {
    /// Parse settings from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: PenSettings = toml::from_str(text).context("Invalid pen settings")?;
        if settings.min_zoom <= 0.0 || settings.min_zoom > settings.max_zoom {
            anyhow::bail!(
                "Invalid zoom range {}..{}",
                settings.min_zoom,
                settings.max_zoom
            );
        }
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Self::from_toml_str(&text)
    }
}
