// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for decks on disk.
//!
//! One deck is one JSON file. Saves are debounced through `DebounceSlot` and
//! written atomically by the `FileGateway`; the model stays serde-free, the
//! `snapshot` DTOs are the only on-disk shape.

pub mod debounce;
pub mod deck_file;
pub mod snapshot;

pub use debounce::{DebounceSlot, DEFAULT_SAVE_DEBOUNCE};
pub use deck_file::{
    FileGateway, IdField, PersistenceGateway, SaveAck, StoreError, WriteDurability,
};
pub use snapshot::{capture, restore, DeckSnapshot, NodeSnapshot, SlideSnapshot, TopicSnapshot};
