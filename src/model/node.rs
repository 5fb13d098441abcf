// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Typed slide content nodes.
//!
//! The vocabulary is closed: every structural element the generator may emit maps
//! to exactly one variant here, and unknown markup never reaches this layer.

/// One content element of a slide.
///
/// The "layout family" variants (everything except `Heading`, `Paragraph` and
/// `Image`) are mutually exclusive within a slide; the parser admits at most one
/// of them per slide section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    Heading { level: u8, text: String },
    Paragraph(String),
    Columns(Vec<NodeGroup>),
    Bullets(Vec<NodeGroup>),
    Icons(Vec<IconItem>),
    Cycle(Vec<StepItem>),
    Arrows(Vec<StepItem>),
    Timeline(Vec<StepItem>),
    Pyramid(Vec<StepItem>),
    Staircase(Vec<StepItem>),
    Chart {
        kind: ChartKind,
        rows: Vec<ChartRow>,
    },
    Image(String),
}

impl ContentNode {
    /// Builds a heading, clamping the level into `1..=6`.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level: level.clamp(1, 6),
            text: text.into(),
        }
    }

    /// Whether this node belongs to the mutually-exclusive layout family.
    pub fn is_layout_family(&self) -> bool {
        !matches!(
            self,
            Self::Heading { .. } | Self::Paragraph(_) | Self::Image(_)
        )
    }
}

/// An ordered run of nodes forming one column or one bullet entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeGroup {
    nodes: Vec<ContentNode>,
}

impl NodeGroup {
    pub fn new(nodes: Vec<ContentNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[ContentNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One cell of an icon grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IconItem {
    icon: String,
    heading: String,
    text: String,
}

impl IconItem {
    pub fn new(
        icon: impl Into<String>,
        heading: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            icon: icon.into(),
            heading: heading.into(),
            text: text.into(),
        }
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One step of a cycle, arrow flow, timeline, pyramid or staircase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepItem {
    heading: String,
    text: String,
}

impl StepItem {
    pub fn new(heading: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            text: text.into(),
        }
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Chart rendering style. A closed enum rather than a free string so a typo in
/// the generated attribute can never leak into the document model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    /// Parses the `charttype` attribute. Unknown values degrade to `Bar`.
    pub fn from_attr(value: &str) -> Self {
        if value.eq_ignore_ascii_case("line") {
            Self::Line
        } else if value.eq_ignore_ascii_case("pie") {
            Self::Pie
        } else {
            Self::Bar
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
        }
    }
}

/// One chart data row. Label and value are opaque strings at this layer;
/// numeric coercion is the renderer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartRow {
    label: String,
    value: String,
}

impl ChartRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
