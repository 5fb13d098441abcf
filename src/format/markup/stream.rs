// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tolerant tag-stack walk over the cumulative markup buffer.
//!
//! `feed` accepts the full text received so far and rebuilds the slide list
//! from scratch on every call; there is no carry-over state between calls, so
//! a delta boundary can never corrupt the parse. A slide enters the result
//! only when its `SECTION` close tag has been seen — the document model never
//! observes a half-built slide.

use std::fmt;

use smallvec::SmallVec;

use crate::model::{
    ChartKind, ChartRow, ContentNode, IconItem, ImageRef, NodeGroup, Slide, SlideId, SlideLayout,
    StepItem,
};

use super::grammar::{self, TagKind};
use super::lexer::{scan, OpenTag, Scan, Token};

/// The best-effort result of one `feed` call: every fully-closed slide parsed
/// from the buffer, in order, plus where the usable prefix ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialParse {
    slides: Vec<Slide>,
    bytes_consumed: usize,
    open_section: bool,
}

impl PartialParse {
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn into_slides(self) -> Vec<Slide> {
        self.slides
    }

    /// Byte offset up to which the buffer was tokenized; the remainder is an
    /// unterminated tail that will be retried on the next feed.
    pub fn bytes_consumed(&self) -> usize {
        self.bytes_consumed
    }

    /// Whether a slide section is still open at the end of the usable prefix.
    pub fn open_section(&self) -> bool {
        self.open_section
    }
}

/// Why `finalize` considered the buffer malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeErrorKind {
    /// The buffer ends inside a tag or comment at byte offset `at`.
    TruncatedMarkup { at: usize },
    /// An element was never closed by its own tag (either still open at the
    /// end of the buffer, or closed implicitly by an ancestor's close tag).
    UnclosedElement { tag: &'static str },
}

/// A structure error at finalize. Carries the best-effort deck built from the
/// well-formed prefix so the caller can keep partial progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupFinalizeError {
    kind: FinalizeErrorKind,
    partial: Vec<Slide>,
}

impl MarkupFinalizeError {
    pub fn kind(&self) -> FinalizeErrorKind {
        self.kind
    }

    pub fn partial(&self) -> &[Slide] {
        &self.partial
    }

    pub fn into_partial(self) -> Vec<Slide> {
        self.partial
    }
}

impl fmt::Display for MarkupFinalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FinalizeErrorKind::TruncatedMarkup { at } => {
                write!(
                    f,
                    "markup ends inside a tag at byte {at} ({} slide(s) recovered)",
                    self.partial.len()
                )
            }
            FinalizeErrorKind::UnclosedElement { tag } => {
                write!(
                    f,
                    "element <{tag}> was never closed ({} slide(s) recovered)",
                    self.partial.len()
                )
            }
        }
    }
}

impl std::error::Error for MarkupFinalizeError {}

/// Incremental parser for the slide markup stream.
///
/// Stateless between calls apart from bookkeeping: each `feed` receives the
/// cumulative buffer and reparses it, which makes the result independent of
/// how the stream was chunked.
#[derive(Debug, Default)]
pub struct StreamParser {
    fed_bytes: usize,
}

impl StreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes seen by the largest buffer fed so far.
    pub fn fed_bytes(&self) -> usize {
        self.fed_bytes
    }

    /// Parses the cumulative buffer, returning every fully-closed slide.
    /// Never fails: an unterminated tail is simply excluded from the result.
    pub fn feed(&mut self, buffer: &str) -> PartialParse {
        self.fed_bytes = self.fed_bytes.max(buffer.len());
        let walk = Walk::run(buffer);
        let open_section = walk.stack.iter().any(|frame| frame.kind() == TagKind::Section);
        PartialParse {
            slides: walk.slides,
            bytes_consumed: walk.consumed,
            open_section,
        }
    }

    /// Parses the complete buffer once the channel has signalled completion.
    /// A malformed buffer yields an error that still carries the best-effort
    /// slide list, so partial progress survives a bad ending.
    pub fn finalize(&self, buffer: &str) -> Result<Vec<Slide>, MarkupFinalizeError> {
        let walk = Walk::run(buffer);

        if let Some(at) = walk.truncated_at {
            return Err(MarkupFinalizeError {
                kind: FinalizeErrorKind::TruncatedMarkup { at },
                partial: walk.slides,
            });
        }
        if let Some(frame) = walk.stack.last() {
            return Err(MarkupFinalizeError {
                kind: FinalizeErrorKind::UnclosedElement {
                    tag: frame.kind().tag_name(),
                },
                partial: walk.slides,
            });
        }
        if walk.in_presentation {
            return Err(MarkupFinalizeError {
                kind: FinalizeErrorKind::UnclosedElement {
                    tag: TagKind::Presentation.tag_name(),
                },
                partial: walk.slides,
            });
        }
        if let Some(tag) = walk.implicitly_closed {
            return Err(MarkupFinalizeError {
                kind: FinalizeErrorKind::UnclosedElement { tag },
                partial: walk.slides,
            });
        }

        Ok(walk.slides)
    }
}

/// Accumulated pieces of one `DIV` group; shaped into a `NodeGroup`,
/// `StepItem` or `IconItem` when its family container closes it.
#[derive(Debug, Default)]
struct GroupParts {
    nodes: Vec<ContentNode>,
    icon: Option<String>,
}

impl GroupParts {
    fn into_node_group(self) -> NodeGroup {
        NodeGroup::new(self.nodes)
    }

    fn heading_text(&self) -> String {
        self.nodes
            .iter()
            .find_map(|node| match node {
                ContentNode::Heading { text, .. } => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    fn paragraph_text(&self) -> String {
        let paragraphs: Vec<&str> = self
            .nodes
            .iter()
            .filter_map(|node| match node {
                ContentNode::Paragraph(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        paragraphs.join("\n")
    }

    fn into_step(self) -> StepItem {
        StepItem::new(self.heading_text(), self.paragraph_text())
    }

    fn into_icon_item(self) -> IconItem {
        IconItem::new(
            self.icon.clone().unwrap_or_default(),
            self.heading_text(),
            self.paragraph_text(),
        )
    }
}

/// One open element on the walk stack.
#[derive(Debug)]
enum Frame {
    Section {
        layout: SlideLayout,
        root_image: Option<ImageRef>,
        content: Vec<ContentNode>,
        has_family: bool,
    },
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    Image {
        query: Option<String>,
        text: String,
    },
    Family {
        kind: TagKind,
        groups: Vec<GroupParts>,
    },
    Group(GroupParts),
    Chart {
        kind: ChartKind,
        rows: Vec<ChartRow>,
    },
    Row {
        cells: Vec<String>,
    },
    Cell {
        text: String,
    },
    IconTag {
        name: Option<String>,
        text: String,
    },
    /// A duplicate layout-family container being skipped wholesale; `depth`
    /// counts nested opens of the same kind so the matching close is found.
    Skip {
        kind: TagKind,
        depth: usize,
    },
}

impl Frame {
    fn kind(&self) -> TagKind {
        match self {
            Self::Section { .. } => TagKind::Section,
            Self::Heading { level, .. } => TagKind::Heading(*level),
            Self::Paragraph { .. } => TagKind::Paragraph,
            Self::Image { .. } => TagKind::Image,
            Self::Family { kind, .. } => *kind,
            Self::Group(_) => TagKind::Group,
            Self::Chart { .. } => TagKind::Chart,
            Self::Row { .. } => TagKind::Row,
            Self::Cell { .. } => TagKind::Cell,
            Self::IconTag { .. } => TagKind::Icon,
            Self::Skip { kind, .. } => *kind,
        }
    }

    fn textual(&mut self) -> Option<&mut String> {
        match self {
            Self::Heading { text, .. }
            | Self::Paragraph { text }
            | Self::Image { text, .. }
            | Self::Cell { text }
            | Self::IconTag { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Walk {
    slides: Vec<Slide>,
    stack: SmallVec<[Frame; 8]>,
    in_presentation: bool,
    consumed: usize,
    truncated_at: Option<usize>,
    implicitly_closed: Option<&'static str>,
}

impl Walk {
    fn run(buffer: &str) -> Self {
        let mut walk = Self::default();
        let mut pos = 0;
        loop {
            match scan(buffer, pos) {
                Scan::End => {
                    walk.consumed = buffer.len();
                    break;
                }
                Scan::Incomplete { at } => {
                    walk.truncated_at = Some(at);
                    walk.consumed = at;
                    break;
                }
                Scan::Token { token, next } => {
                    walk.apply(token);
                    pos = next;
                }
            }
        }
        walk
    }

    fn apply(&mut self, token: Token) {
        match token {
            Token::Skip => {}
            Token::Text(text) => self.apply_text(&text),
            Token::Open(tag) => self.apply_open(&tag),
            Token::Close(name) => {
                if let Some(kind) = TagKind::classify(&name) {
                    self.apply_close(kind);
                }
                // Unknown close tags are skipped like unknown opens.
            }
        }
    }

    /// Text flows to the innermost open textual element. With a skip frame on
    /// top the text belongs to skipped content and is dropped; with no textual
    /// element open (whitespace between structural tags) it is dropped too.
    fn apply_text(&mut self, text: &str) {
        for frame in self.stack.iter_mut().rev() {
            if matches!(frame, Frame::Skip { .. }) {
                return;
            }
            if let Some(buffer) = frame.textual() {
                buffer.push_str(text);
                return;
            }
        }
    }

    fn apply_open(&mut self, tag: &OpenTag) {
        // Everything inside a skipped container is ignored, but nested opens
        // of the skipped kind must be counted to find the matching close.
        if let Some(Frame::Skip { kind, depth }) = self.stack.last_mut() {
            if TagKind::classify(&tag.name) == Some(*kind) && !tag.self_closing {
                *depth += 1;
            }
            return;
        }

        let Some(kind) = TagKind::classify(&tag.name) else {
            // Unknown tag: skipped, its text absorbed by whatever is open.
            return;
        };

        let Some(parent_kind) = self.stack.last().map(Frame::kind) else {
            match kind {
                TagKind::Presentation => {
                    self.in_presentation = true;
                }
                TagKind::Section => {
                    self.stack.push(Frame::Section {
                        layout: SlideLayout::from_attr(
                            tag.attr(grammar::LAYOUT_ATTR).unwrap_or(""),
                        ),
                        root_image: None,
                        content: Vec::new(),
                        has_family: false,
                    });
                }
                // Any other tag at the top level is out of place; skip it.
                _ => {}
            }
            return;
        };

        if !grammar::can_nest(parent_kind, kind) {
            // Known tag in the wrong place: treated like an unknown one.
            return;
        }

        // One layout-family container per slide: a second one is skipped
        // wholesale, first wins.
        if kind.is_layout_family() {
            let duplicate = matches!(
                self.stack.last(),
                Some(Frame::Section {
                    has_family: true,
                    ..
                })
            );
            if duplicate {
                if !tag.self_closing {
                    self.stack.push(Frame::Skip { kind, depth: 0 });
                }
                return;
            }
            if let Some(Frame::Section { has_family, .. }) = self.stack.last_mut() {
                *has_family = true;
            }
        }

        let frame = match kind {
            TagKind::Heading(level) => Frame::Heading {
                level,
                text: String::new(),
            },
            TagKind::Paragraph => Frame::Paragraph {
                text: String::new(),
            },
            TagKind::Image => Frame::Image {
                query: tag
                    .attr(grammar::QUERY_ATTR)
                    .map(str::trim)
                    .filter(|query| !query.is_empty())
                    .map(str::to_owned),
                text: String::new(),
            },
            TagKind::Icon => Frame::IconTag {
                name: tag
                    .attr(grammar::ICON_NAME_ATTR)
                    .map(str::trim)
                    .filter(|icon| !icon.is_empty())
                    .map(str::to_owned),
                text: String::new(),
            },
            TagKind::Chart => Frame::Chart {
                kind: ChartKind::from_attr(tag.attr(grammar::CHART_TYPE_ATTR).unwrap_or("")),
                rows: Vec::new(),
            },
            TagKind::Group => Frame::Group(GroupParts::default()),
            TagKind::Row => Frame::Row { cells: Vec::new() },
            TagKind::Cell => Frame::Cell {
                text: String::new(),
            },
            family if family.is_layout_family() => Frame::Family {
                kind: family,
                groups: Vec::new(),
            },
            // Presentation/Section cannot nest here per can_nest.
            _ => return,
        };
        self.stack.push(frame);
        if tag.self_closing {
            self.close_top();
        }
    }

    fn apply_close(&mut self, kind: TagKind) {
        if let Some(Frame::Skip {
            kind: skipped,
            depth,
        }) = self.stack.last_mut()
        {
            if kind == *skipped {
                if *depth > 0 {
                    *depth -= 1;
                } else {
                    self.stack.pop();
                }
                return;
            }
            // A close for an ancestor of the skipped container means the
            // generator never closed it; abandon the skip and recover.
            let matches_ancestor = self
                .stack
                .iter()
                .rev()
                .skip(1)
                .any(|frame| frame.kind() == kind);
            if !matches_ancestor {
                return;
            }
            self.stack.pop();
        }

        if kind == TagKind::Presentation {
            // The root close implicitly closes anything still open. The walk
            // recovers (descendants are built and committed), but finalize
            // reports the structure error.
            let open = self.stack.last().map(|frame| frame.kind().tag_name());
            if let Some(tag) = open {
                self.note_implicit_close(tag);
            }
            while !self.stack.is_empty() {
                self.close_top();
            }
            if self.in_presentation {
                self.in_presentation = false;
            }
            return;
        }

        let Some(found) = self
            .stack
            .iter()
            .rposition(|frame| frame.kind() == kind)
        else {
            // A close matching nothing open: skipped.
            return;
        };

        // Frames above the match are closed implicitly (recovered, but
        // reported at finalize).
        if found + 1 < self.stack.len() {
            let open = self.stack.last().map(|frame| frame.kind().tag_name());
            if let Some(tag) = open {
                self.note_implicit_close(tag);
            }
        }
        while self.stack.len() > found {
            self.close_top();
        }
    }

    fn note_implicit_close(&mut self, tag: &'static str) {
        if self.implicitly_closed.is_none() {
            self.implicitly_closed = Some(tag);
        }
    }

    /// Pops the top frame and folds it into its parent (or, for a section,
    /// commits the finished slide).
    fn close_top(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };

        match frame {
            Frame::Section {
                layout,
                root_image,
                content,
                ..
            } => self.commit_slide(layout, root_image, content),
            Frame::Heading { level, text } => {
                let text = text.trim();
                if !text.is_empty() {
                    self.attach_node(ContentNode::heading(level, text));
                }
            }
            Frame::Paragraph { text } => {
                let text = text.trim();
                if !text.is_empty() {
                    self.attach_node(ContentNode::Paragraph(text.to_owned()));
                }
            }
            Frame::Image { query, text } => {
                let query = query.or_else(|| {
                    let text = text.trim();
                    (!text.is_empty()).then(|| text.to_owned())
                });
                if let Some(query) = query {
                    self.attach_image(query);
                }
            }
            Frame::Family { kind, groups } => {
                let node = match kind {
                    TagKind::Columns => ContentNode::Columns(
                        groups.into_iter().map(GroupParts::into_node_group).collect(),
                    ),
                    TagKind::Bullets => ContentNode::Bullets(
                        groups.into_iter().map(GroupParts::into_node_group).collect(),
                    ),
                    TagKind::Icons => ContentNode::Icons(
                        groups.into_iter().map(GroupParts::into_icon_item).collect(),
                    ),
                    TagKind::Cycle => {
                        ContentNode::Cycle(groups.into_iter().map(GroupParts::into_step).collect())
                    }
                    TagKind::Arrows => {
                        ContentNode::Arrows(groups.into_iter().map(GroupParts::into_step).collect())
                    }
                    TagKind::Timeline => ContentNode::Timeline(
                        groups.into_iter().map(GroupParts::into_step).collect(),
                    ),
                    TagKind::Pyramid => ContentNode::Pyramid(
                        groups.into_iter().map(GroupParts::into_step).collect(),
                    ),
                    TagKind::Staircase => ContentNode::Staircase(
                        groups.into_iter().map(GroupParts::into_step).collect(),
                    ),
                    // Family frames are only built for group-collecting kinds.
                    _ => return,
                };
                self.attach_node(node);
            }
            Frame::Group(parts) => {
                if let Some(Frame::Family { groups, .. }) = self.stack.last_mut() {
                    groups.push(parts);
                }
            }
            Frame::Chart { kind, rows } => {
                self.attach_node(ContentNode::Chart { kind, rows });
            }
            Frame::Row { cells } => {
                if let Some(Frame::Chart { rows, .. }) = self.stack.last_mut() {
                    let mut cells = cells.into_iter();
                    let label = cells.next().unwrap_or_default();
                    let value = cells.next().unwrap_or_default();
                    if !label.is_empty() || !value.is_empty() {
                        rows.push(ChartRow::new(label, value));
                    }
                }
            }
            Frame::Cell { text } => {
                if let Some(Frame::Row { cells }) = self.stack.last_mut() {
                    cells.push(text.trim().to_owned());
                }
            }
            Frame::IconTag { name, text } => {
                let icon = name.or_else(|| {
                    let text = text.trim();
                    (!text.is_empty()).then(|| text.to_owned())
                });
                if let (Some(icon), Some(Frame::Group(parts))) = (icon, self.stack.last_mut()) {
                    if parts.icon.is_none() {
                        parts.icon = Some(icon);
                    }
                }
            }
            Frame::Skip { .. } => {}
        }
    }

    /// Attaches a finished textual/family node to the enclosing element.
    fn attach_node(&mut self, node: ContentNode) {
        match self.stack.last_mut() {
            Some(Frame::Section { content, .. }) => content.push(node),
            Some(Frame::Group(parts)) => parts.nodes.push(node),
            _ => {}
        }
    }

    /// An `IMG` at section level becomes the slide's root image (first one
    /// wins); inside a group it is an inline image node.
    fn attach_image(&mut self, query: String) {
        match self.stack.last_mut() {
            Some(Frame::Section { root_image, .. }) => {
                if root_image.is_none() {
                    *root_image = Some(ImageRef::new(query));
                }
            }
            Some(Frame::Group(parts)) => parts.nodes.push(ContentNode::Image(query)),
            _ => {}
        }
    }

    /// A slide exists only once its section closed; ids are positional so a
    /// reparse of a grown buffer mints identical ids for identical prefixes.
    fn commit_slide(
        &mut self,
        layout: SlideLayout,
        root_image: Option<ImageRef>,
        content: Vec<ContentNode>,
    ) {
        let slide_id = slide_id_from_index(self.slides.len());
        let mut slide = Slide::new(slide_id, layout);
        if let Some(image) = root_image {
            slide.set_root_image_if_absent(image);
        }
        for node in content {
            slide.push_content(node);
        }
        self.slides.push(slide);
    }
}

fn slide_id_from_index(index: usize) -> SlideId {
    SlideId::new(format!("s:{:04}", index + 1)).expect("valid slide id")
}
