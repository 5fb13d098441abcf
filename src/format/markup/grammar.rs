// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The fixed tag vocabulary and its nesting rules. Pure data, no parsing state.

/// Attribute carrying a section's placement layout (`left`/`right`/`vertical`).
pub const LAYOUT_ATTR: &str = "layout";
/// Attribute carrying an image search query.
pub const QUERY_ATTR: &str = "query";
/// Attribute carrying the chart rendering style.
pub const CHART_TYPE_ATTR: &str = "charttype";
/// Attribute carrying an icon name.
pub const ICON_NAME_ATTR: &str = "name";

/// One tag of the closed vocabulary. Tag names are matched ASCII
/// case-insensitively; anything that does not classify is an unknown tag and
/// is skipped by the stream parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// `PRESENTATION` — the root container of slide sections.
    Presentation,
    /// `SECTION` — one slide; carries the `layout` attribute.
    Section,
    /// `H1`..`H6`.
    Heading(u8),
    /// `P`.
    Paragraph,
    /// `IMG` — image by search query (`query` attribute).
    Image,
    Columns,
    Bullets,
    Icons,
    Cycle,
    Arrows,
    Timeline,
    Pyramid,
    Staircase,
    /// `CHART` — carries the `charttype` attribute, rows as `TR`/`TD`.
    Chart,
    /// `DIV` — one group inside a layout-family container.
    Group,
    /// `ICON` — icon name inside an icon-grid group (`name` attribute).
    Icon,
    /// `TR` — one chart data row.
    Row,
    /// `TD` — one cell of a chart row (label, then value).
    Cell,
}

impl TagKind {
    /// Maps a raw tag name to its kind, ASCII case-insensitively.
    pub fn classify(name: &str) -> Option<Self> {
        if name.len() == 2 {
            let bytes = name.as_bytes();
            if bytes[0].eq_ignore_ascii_case(&b'h') && bytes[1].is_ascii_digit() {
                let level = bytes[1] - b'0';
                if (1..=6).contains(&level) {
                    return Some(Self::Heading(level));
                }
                return None;
            }
        }

        let kind = if name.eq_ignore_ascii_case("PRESENTATION") {
            Self::Presentation
        } else if name.eq_ignore_ascii_case("SECTION") {
            Self::Section
        } else if name.eq_ignore_ascii_case("P") {
            Self::Paragraph
        } else if name.eq_ignore_ascii_case("IMG") {
            Self::Image
        } else if name.eq_ignore_ascii_case("COLUMNS") {
            Self::Columns
        } else if name.eq_ignore_ascii_case("BULLETS") {
            Self::Bullets
        } else if name.eq_ignore_ascii_case("ICONS") {
            Self::Icons
        } else if name.eq_ignore_ascii_case("CYCLE") {
            Self::Cycle
        } else if name.eq_ignore_ascii_case("ARROWS") {
            Self::Arrows
        } else if name.eq_ignore_ascii_case("TIMELINE") {
            Self::Timeline
        } else if name.eq_ignore_ascii_case("PYRAMID") {
            Self::Pyramid
        } else if name.eq_ignore_ascii_case("STAIRCASE") {
            Self::Staircase
        } else if name.eq_ignore_ascii_case("CHART") {
            Self::Chart
        } else if name.eq_ignore_ascii_case("DIV") {
            Self::Group
        } else if name.eq_ignore_ascii_case("ICON") {
            Self::Icon
        } else if name.eq_ignore_ascii_case("TR") {
            Self::Row
        } else if name.eq_ignore_ascii_case("TD") {
            Self::Cell
        } else {
            return None;
        };
        Some(kind)
    }

    /// The canonical (uppercase) tag name.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Presentation => "PRESENTATION",
            Self::Section => "SECTION",
            Self::Heading(1) => "H1",
            Self::Heading(2) => "H2",
            Self::Heading(3) => "H3",
            Self::Heading(4) => "H4",
            Self::Heading(5) => "H5",
            Self::Heading(_) => "H6",
            Self::Paragraph => "P",
            Self::Image => "IMG",
            Self::Columns => "COLUMNS",
            Self::Bullets => "BULLETS",
            Self::Icons => "ICONS",
            Self::Cycle => "CYCLE",
            Self::Arrows => "ARROWS",
            Self::Timeline => "TIMELINE",
            Self::Pyramid => "PYRAMID",
            Self::Staircase => "STAIRCASE",
            Self::Chart => "CHART",
            Self::Group => "DIV",
            Self::Icon => "ICON",
            Self::Row => "TR",
            Self::Cell => "TD",
        }
    }

    /// Whether this tag opens one of the mutually-exclusive layout-family
    /// containers a slide may carry at most one of.
    pub fn is_layout_family(&self) -> bool {
        matches!(
            self,
            Self::Columns
                | Self::Bullets
                | Self::Icons
                | Self::Cycle
                | Self::Arrows
                | Self::Timeline
                | Self::Pyramid
                | Self::Staircase
                | Self::Chart
        )
    }

    /// Whether a family container collects its steps/groups through `DIV`
    /// children (everything except `CHART`, which uses `TR`/`TD`).
    pub fn family_uses_groups(&self) -> bool {
        self.is_layout_family() && !matches!(self, Self::Chart)
    }
}

/// The grammar's nesting relation: may `child` open directly inside `parent`?
///
/// A known tag opened where the grammar does not permit it is treated like an
/// unknown tag by the stream parser: skipped, text absorbed.
pub fn can_nest(parent: TagKind, child: TagKind) -> bool {
    match (parent, child) {
        (TagKind::Presentation, TagKind::Section) => true,
        (TagKind::Section, TagKind::Heading(_) | TagKind::Paragraph | TagKind::Image) => true,
        (TagKind::Section, child) if child.is_layout_family() => true,
        (parent, TagKind::Group) if parent.family_uses_groups() => true,
        (TagKind::Chart, TagKind::Row) => true,
        (TagKind::Row, TagKind::Cell) => true,
        (
            TagKind::Group,
            TagKind::Heading(_) | TagKind::Paragraph | TagKind::Image | TagKind::Icon,
        ) => true,
        _ => false,
    }
}
