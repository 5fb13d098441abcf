// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core document model.
//!
//! A deck is an ordered list of slides; each slide carries a placement layout, an
//! optional root image and a list of typed content nodes.

pub mod deck;
pub mod ids;
pub mod node;
pub mod outline;
pub mod session;
pub mod slide;

pub use deck::{DuplicateSlideId, SlideDeck};
pub use ids::{DeckId, Id, IdError, SlideId};
pub use node::{ChartKind, ChartRow, ContentNode, IconItem, NodeGroup, StepItem};
pub use outline::{Outline, OutlineTopic};
pub use session::{GenerationKind, GenerationSession};
pub use slide::{ImageRef, Slide, SlideLayout};
