// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Deck edit operations and the guard that serializes them against streaming.
//!
//! A reorder addresses slides by their current index, so it must never run
//! while a generation is replacing the slide list underneath it. The guard is
//! checked at the operation boundary; inside, the deck is mutated atomically.

use std::fmt;

use crate::model::SlideDeck;

/// Edit admission state sampled at the operation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditGuard {
    pub generating: bool,
    pub presenting: bool,
}

impl EditGuard {
    pub fn open() -> Self {
        Self::default()
    }

    fn check(&self) -> Result<(), ReorderError> {
        if self.generating {
            return Err(ReorderError::GenerationInProgress);
        }
        if self.presenting {
            return Err(ReorderError::Presenting);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderError {
    /// A generation owns the slide list; indices would race the stream.
    GenerationInProgress,
    /// The deck is being presented; edits are locked out.
    Presenting,
    OutOfBounds { index: usize, len: usize },
}

impl fmt::Display for ReorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenerationInProgress => {
                f.write_str("cannot reorder while a generation is streaming")
            }
            Self::Presenting => f.write_str("cannot reorder while presenting"),
            Self::OutOfBounds { index, len } => {
                write!(f, "slide index {index} out of bounds (deck has {len} slides)")
            }
        }
    }
}

impl std::error::Error for ReorderError {}

/// Moves the slide at `source` so it ends up at `dest`, shifting the slides
/// in between. `dest` addresses the list after the source is removed, so
/// `(0, len - 1)` moves the first slide to the end.
///
/// A no-op move (`source == dest`) still passes the guard and bounds checks
/// but does not bump the deck revision.
pub fn reorder(
    deck: &mut SlideDeck,
    source: usize,
    dest: usize,
    guard: EditGuard,
) -> Result<(), ReorderError> {
    guard.check()?;
    let len = deck.slide_count();
    if source >= len {
        return Err(ReorderError::OutOfBounds { index: source, len });
    }
    if dest >= len {
        return Err(ReorderError::OutOfBounds { index: dest, len });
    }
    if source == dest {
        return Ok(());
    }
    deck.move_slide(source, dest);
    deck.bump_rev();
    Ok(())
}
