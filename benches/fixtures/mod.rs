// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Synthetic markup decks for the parser benchmarks. Deterministic, so runs
//! stay comparable over time.

use std::fmt::Write;

use proteus::model::{ContentNode, Slide};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Small,
    MediumMixed,
    LargeLongText,
}

impl Case {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::MediumMixed => "medium_mixed",
            Self::LargeLongText => "large_long_text",
        }
    }

    fn sections(&self) -> usize {
        match self {
            Self::Small => 4,
            Self::MediumMixed => 24,
            Self::LargeLongText => 64,
        }
    }

    fn filler_words(&self) -> usize {
        match self {
            Self::Small => 6,
            Self::MediumMixed => 12,
            Self::LargeLongText => 60,
        }
    }
}

pub fn markup(case: Case) -> String {
    let filler = "lorem ".repeat(case.filler_words());
    let filler = filler.trim_end();
    let mut doc = String::from("<PRESENTATION>\n");
    for i in 0..case.sections() {
        let layout = ["left", "right", "vertical"][i % 3];
        let _ = write!(doc, "<SECTION layout=\"{layout}\">");
        let _ = write!(doc, "<H1>Section {i}</H1><P>{filler}</P>");
        match i % 4 {
            0 => {
                doc.push_str("<BULLETS>");
                for j in 0..4 {
                    let _ = write!(doc, "<DIV><H3>Point {j}</H3><P>{filler}</P></DIV>");
                }
                doc.push_str("</BULLETS>");
            }
            1 => {
                doc.push_str("<COLUMNS>");
                for j in 0..3 {
                    let _ = write!(doc, "<DIV><H3>Column {j}</H3><P>{filler}</P></DIV>");
                }
                doc.push_str("</COLUMNS>");
            }
            2 => {
                doc.push_str("<CHART charttype=\"bar\">");
                for j in 0..6 {
                    let _ = write!(doc, "<TR><TD>Label {j}</TD><TD>{}</TD></TR>", j * 10);
                }
                doc.push_str("</CHART>");
            }
            _ => {
                doc.push_str("<TIMELINE>");
                for j in 0..5 {
                    let _ = write!(doc, "<DIV><H3>Step {j}</H3><P>{filler}</P></DIV>");
                }
                doc.push_str("</TIMELINE>");
            }
        }
        doc.push_str("</SECTION>\n");
    }
    doc.push_str("</PRESENTATION>\n");
    doc
}

/// Cheap structural digest so the optimizer cannot discard the parse.
pub fn checksum(slides: &[Slide]) -> u64 {
    let mut sum = 0u64;
    for slide in slides {
        sum = sum.wrapping_mul(31).wrapping_add(slide.content().len() as u64);
        for node in slide.content() {
            sum = sum.wrapping_add(match node {
                ContentNode::Heading { level, .. } => u64::from(*level),
                ContentNode::Paragraph(text) => text.len() as u64,
                ContentNode::Chart { rows, .. } => rows.len() as u64,
                _ => 1,
            });
        }
    }
    sum
}
