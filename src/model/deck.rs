// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;
use std::fmt;

use super::ids::{DeckId, SlideId};
use super::slide::Slide;

/// The presentation document the whole pipeline runs against.
///
/// Slide order is display order. Slide ids are unique within a deck; `push_slide`
/// enforces this, and `replace_slides` (the streaming path, which swaps the whole
/// list on every delta) inherits uniqueness from the parser's positional ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideDeck {
    deck_id: DeckId,
    title: String,
    language: String,
    slides: Vec<Slide>,
    rev: u64,
}

impl SlideDeck {
    pub fn new(deck_id: DeckId, title: impl Into<String>) -> Self {
        Self {
            deck_id,
            title: title.into(),
            language: "en".to_owned(),
            slides: Vec::new(),
            rev: 0,
        }
    }

    pub fn deck_id(&self) -> &DeckId {
        &self.deck_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slide_ids(&self) -> BTreeSet<SlideId> {
        self.slides
            .iter()
            .map(|slide| slide.slide_id().clone())
            .collect()
    }

    pub fn slide(&self, slide_id: &SlideId) -> Option<&Slide> {
        self.slides
            .iter()
            .find(|slide| slide.slide_id() == slide_id)
    }

    pub fn slide_mut(&mut self, slide_id: &SlideId) -> Option<&mut Slide> {
        self.slides
            .iter_mut()
            .find(|slide| slide.slide_id() == slide_id)
    }

    pub fn push_slide(&mut self, slide: Slide) -> Result<(), DuplicateSlideId> {
        if self.slide(slide.slide_id()).is_some() {
            return Err(DuplicateSlideId {
                slide_id: slide.slide_id().clone(),
            });
        }
        self.slides.push(slide);
        Ok(())
    }

    /// Swaps the entire slide list. The streaming path uses this on every delta
    /// so a later parse always supersedes an earlier one wholesale and no
    /// partially-merged state is ever observable.
    pub fn replace_slides(&mut self, slides: Vec<Slide>) {
        self.slides = slides;
    }

    /// Moves the slide at `source` so it ends up at `dest` in the resulting
    /// list. `dest` addresses the already-shortened list. Bounds checking is
    /// the caller's job (see `ops::reorder`); indices out of range here are a
    /// programming error and the move is skipped.
    pub fn move_slide(&mut self, source: usize, dest: usize) {
        if source == dest || source >= self.slides.len() || dest >= self.slides.len() {
            return;
        }
        let slide = self.slides.remove(source);
        self.slides.insert(dest, slide);
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSlideId {
    slide_id: SlideId,
}

impl DuplicateSlideId {
    pub fn slide_id(&self) -> &SlideId {
        &self.slide_id
    }
}

impl fmt::Display for DuplicateSlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slide id already present in deck: {}", self.slide_id)
    }
}

impl std::error::Error for DuplicateSlideId {}
