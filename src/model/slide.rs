// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::SlideId;
use super::node::ContentNode;

/// Where the root image sits relative to the slide body.
///
/// The layout fixes placement, never existence: a slide may carry a root image
/// under any layout, and a layout without one is equally valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlideLayout {
    #[default]
    Left,
    Right,
    Vertical,
}

impl SlideLayout {
    /// Parses the section `layout` attribute. Unknown values degrade to `Left`
    /// rather than failing; the attribute comes from a cooperating generator
    /// but is not guaranteed byte-perfect.
    pub fn from_attr(value: &str) -> Self {
        if value.eq_ignore_ascii_case("right") {
            Self::Right
        } else if value.eq_ignore_ascii_case("vertical") {
            Self::Vertical
        } else {
            Self::Left
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Vertical => "vertical",
        }
    }
}

/// A reference to an image by search query; resolution and storage of the
/// actual asset is an external collaborator's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    query: String,
}

impl ImageRef {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// A single slide: identity, placement layout, optional root image and an
/// ordered list of content nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    slide_id: SlideId,
    layout: SlideLayout,
    root_image: Option<ImageRef>,
    content: Vec<ContentNode>,
}

impl Slide {
    pub fn new(slide_id: SlideId, layout: SlideLayout) -> Self {
        Self {
            slide_id,
            layout,
            root_image: None,
            content: Vec::new(),
        }
    }

    pub fn slide_id(&self) -> &SlideId {
        &self.slide_id
    }

    pub fn layout(&self) -> SlideLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: SlideLayout) {
        self.layout = layout;
    }

    pub fn root_image(&self) -> Option<&ImageRef> {
        self.root_image.as_ref()
    }

    /// Sets the root image if none is present yet; a slide has at most one,
    /// and the first one emitted wins.
    pub fn set_root_image_if_absent(&mut self, image: ImageRef) -> bool {
        if self.root_image.is_some() {
            return false;
        }
        self.root_image = Some(image);
        true
    }

    pub fn clear_root_image(&mut self) {
        self.root_image = None;
    }

    pub fn content(&self) -> &[ContentNode] {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Vec<ContentNode> {
        &mut self.content
    }

    pub fn push_content(&mut self, node: ContentNode) {
        self.content.push(node);
    }

    /// The slide's layout-family node, if it carries one.
    pub fn layout_family(&self) -> Option<&ContentNode> {
        self.content.iter().find(|node| node.is_layout_family())
    }

    /// Number of layout-family nodes; the parser keeps this at most one.
    pub fn layout_family_count(&self) -> usize {
        self.content
            .iter()
            .filter(|node| node.is_layout_family())
            .count()
    }
}
