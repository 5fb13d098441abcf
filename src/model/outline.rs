// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// The topic plan a deck is generated from: one entry per future slide.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outline {
    topics: Vec<OutlineTopic>,
}

impl Outline {
    pub fn new(topics: Vec<OutlineTopic>) -> Self {
        Self { topics }
    }

    pub fn topics(&self) -> &[OutlineTopic] {
        &self.topics
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.topics.iter().map(OutlineTopic::title).collect()
    }
}

/// One outline topic: a title plus the bullet lines describing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineTopic {
    title: String,
    bullets: Vec<String>,
}

impl OutlineTopic {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            bullets: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn bullets(&self) -> &[String] {
        &self.bullets
    }

    pub fn push_bullet(&mut self, bullet: impl Into<String>) {
        self.bullets.push(bullet.into());
    }
}
