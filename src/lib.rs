// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus — streaming slide-deck generation engine.
//!
//! Token deltas from a generating model arrive over a channel, the incremental
//! markup parser turns the cumulative buffer into a typed slide tree after
//! every chunk, and the orchestrator sequences outline and slide generation
//! while guarding the deck against concurrent edits. Decks persist as single
//! JSON files through a debounced, atomically-writing gateway.

pub mod controller;
pub mod format;
pub mod model;
pub mod ops;
pub mod orchestrator;
pub mod store;
