// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Line-oriented parser for the outline markdown.
//!
//! The outline has no tree structure: a heading line starts a topic, the bullet
//! lines under it are its description. Parsing is permissive — the prompt asks
//! the model for 2-3 bullets per topic, but whatever structurally valid lines
//! arrive are accepted; conformance is a policy concern, not a parser one.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Outline, OutlineTopic};

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#{1,6}\s+(.+)$").expect("valid heading pattern"))
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*]\s+(.+)$").expect("valid bullet pattern"))
}

/// Splits the accumulated outline text into ordered topics.
///
/// Bullets before the first heading have no topic to attach to and are
/// dropped; lines that are neither heading nor bullet are ignored.
pub fn parse_outline(text: &str) -> Outline {
    let mut topics: Vec<OutlineTopic> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = heading_re().captures(line) {
            topics.push(OutlineTopic::new(caps[1].trim()));
        } else if let Some(caps) = bullet_re().captures(line) {
            if let Some(topic) = topics.last_mut() {
                topic.push_bullet(caps[1].trim());
            }
        }
    }

    Outline::new(topics)
}
