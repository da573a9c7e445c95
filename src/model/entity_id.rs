// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Unique identifiers for subpaths, anchor points, and selections.
//!
//! Each `EntityId` is a monotonically increasing `u64` generated from a global
//! atomic counter. History records use them to find the subpath or anchor
//! they act on, so a record survives index shifts caused by other edits.
//! IDs are never reused within a process.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for an entity (subpath, anchor, selection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

static ENTITY_COUNTER: AtomicU64 = AtomicU64::new(1);

impl EntityId {
    /// Create a new unique entity ID
    pub fn next() -> Self {
        Self(ENTITY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::next()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
