// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Serialized deck shape. The model itself stays serde-free; these DTOs are
//! the only types that touch disk, so on-disk compatibility is decided here
//! and nowhere else.

use serde::{Deserialize, Serialize};

use crate::model::{
    ChartKind, ChartRow, ContentNode, DeckId, IconItem, ImageRef, NodeGroup, Outline,
    OutlineTopic, Slide, SlideDeck, SlideId, SlideLayout, StepItem,
};

use super::{IdField, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSnapshot {
    pub deck_id: String,
    pub title: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outline: Vec<TopicSnapshot>,
    pub slides: Vec<SlideSnapshot>,
    pub rev: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSnapshot {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSnapshot {
    pub slide_id: String,
    pub layout: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeSnapshot {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    Columns { groups: Vec<GroupSnapshot> },
    Bullets { groups: Vec<GroupSnapshot> },
    Icons { items: Vec<IconSnapshot> },
    Cycle { steps: Vec<StepSnapshot> },
    Arrows { steps: Vec<StepSnapshot> },
    Timeline { steps: Vec<StepSnapshot> },
    Pyramid { steps: Vec<StepSnapshot> },
    Staircase { steps: Vec<StepSnapshot> },
    Chart { kind: String, rows: Vec<RowSnapshot> },
    Image { query: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSnapshot {
    pub icon: String,
    pub heading: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSnapshot {
    pub heading: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSnapshot {
    pub label: String,
    pub value: String,
}

/// Captures the working deck and outline into the persisted shape.
pub fn capture(deck: &SlideDeck, outline: &Outline, theme: &str) -> DeckSnapshot {
    DeckSnapshot {
        deck_id: deck.deck_id().as_str().to_owned(),
        title: deck.title().to_owned(),
        language: deck.language().to_owned(),
        theme: theme.to_owned(),
        outline: outline.topics().iter().map(capture_topic).collect(),
        slides: deck.slides().iter().map(capture_slide).collect(),
        rev: deck.rev(),
    }
}

fn capture_topic(topic: &OutlineTopic) -> TopicSnapshot {
    TopicSnapshot {
        title: topic.title().to_owned(),
        bullets: topic.bullets().to_vec(),
    }
}

fn capture_slide(slide: &Slide) -> SlideSnapshot {
    SlideSnapshot {
        slide_id: slide.slide_id().as_str().to_owned(),
        layout: slide.layout().as_str().to_owned(),
        image: slide.root_image().map(|img| img.query().to_owned()),
        nodes: slide.content().iter().map(capture_node).collect(),
    }
}

fn capture_node(node: &ContentNode) -> NodeSnapshot {
    match node {
        ContentNode::Heading { level, text } => NodeSnapshot::Heading {
            level: *level,
            text: text.clone(),
        },
        ContentNode::Paragraph(text) => NodeSnapshot::Paragraph { text: text.clone() },
        ContentNode::Columns(groups) => NodeSnapshot::Columns {
            groups: groups.iter().map(capture_group).collect(),
        },
        ContentNode::Bullets(groups) => NodeSnapshot::Bullets {
            groups: groups.iter().map(capture_group).collect(),
        },
        ContentNode::Icons(items) => NodeSnapshot::Icons {
            items: items.iter().map(capture_icon).collect(),
        },
        ContentNode::Cycle(steps) => NodeSnapshot::Cycle {
            steps: steps.iter().map(capture_step).collect(),
        },
        ContentNode::Arrows(steps) => NodeSnapshot::Arrows {
            steps: steps.iter().map(capture_step).collect(),
        },
        ContentNode::Timeline(steps) => NodeSnapshot::Timeline {
            steps: steps.iter().map(capture_step).collect(),
        },
        ContentNode::Pyramid(steps) => NodeSnapshot::Pyramid {
            steps: steps.iter().map(capture_step).collect(),
        },
        ContentNode::Staircase(steps) => NodeSnapshot::Staircase {
            steps: steps.iter().map(capture_step).collect(),
        },
        ContentNode::Chart { kind, rows } => NodeSnapshot::Chart {
            kind: kind.as_str().to_owned(),
            rows: rows
                .iter()
                .map(|row| RowSnapshot {
                    label: row.label().to_owned(),
                    value: row.value().to_owned(),
                })
                .collect(),
        },
        ContentNode::Image(query) => NodeSnapshot::Image {
            query: query.clone(),
        },
    }
}

fn capture_group(group: &NodeGroup) -> GroupSnapshot {
    GroupSnapshot {
        nodes: group.nodes().iter().map(capture_node).collect(),
    }
}

fn capture_icon(item: &IconItem) -> IconSnapshot {
    IconSnapshot {
        icon: item.icon().to_owned(),
        heading: item.heading().to_owned(),
        text: item.text().to_owned(),
    }
}

fn capture_step(step: &StepItem) -> StepSnapshot {
    StepSnapshot {
        heading: step.heading().to_owned(),
        text: step.text().to_owned(),
    }
}

/// Rebuilds the working model from a persisted snapshot. Ids are re-validated;
/// layout and chart-kind strings degrade the same way the markup attributes do.
pub fn restore(snapshot: &DeckSnapshot) -> Result<(SlideDeck, Outline), StoreError> {
    let deck_id =
        DeckId::new(snapshot.deck_id.clone()).map_err(|source| StoreError::InvalidId {
            field: IdField::Deck,
            value: snapshot.deck_id.clone(),
            source: Box::new(source),
        })?;
    let mut deck = SlideDeck::new(deck_id, snapshot.title.clone());
    deck.set_language(snapshot.language.clone());

    let mut slides = Vec::with_capacity(snapshot.slides.len());
    for slide in &snapshot.slides {
        slides.push(restore_slide(slide)?);
    }
    deck.replace_slides(slides);
    for _ in 0..snapshot.rev {
        deck.bump_rev();
    }

    let outline = Outline::new(
        snapshot
            .outline
            .iter()
            .map(|topic| {
                let mut restored = OutlineTopic::new(topic.title.clone());
                for bullet in &topic.bullets {
                    restored.push_bullet(bullet.clone());
                }
                restored
            })
            .collect(),
    );

    Ok((deck, outline))
}

fn restore_slide(snapshot: &SlideSnapshot) -> Result<Slide, StoreError> {
    let slide_id =
        SlideId::new(snapshot.slide_id.clone()).map_err(|source| StoreError::InvalidId {
            field: IdField::Slide,
            value: snapshot.slide_id.clone(),
            source: Box::new(source),
        })?;
    let mut slide = Slide::new(slide_id, SlideLayout::from_attr(&snapshot.layout));
    if let Some(query) = &snapshot.image {
        slide.set_root_image_if_absent(ImageRef::new(query.clone()));
    }
    for node in &snapshot.nodes {
        slide.push_content(restore_node(node));
    }
    Ok(slide)
}

fn restore_node(snapshot: &NodeSnapshot) -> ContentNode {
    match snapshot {
        NodeSnapshot::Heading { level, text } => ContentNode::heading(*level, text.clone()),
        NodeSnapshot::Paragraph { text } => ContentNode::Paragraph(text.clone()),
        NodeSnapshot::Columns { groups } => {
            ContentNode::Columns(groups.iter().map(restore_group).collect())
        }
        NodeSnapshot::Bullets { groups } => {
            ContentNode::Bullets(groups.iter().map(restore_group).collect())
        }
        NodeSnapshot::Icons { items } => ContentNode::Icons(
            items
                .iter()
                .map(|item| IconItem::new(item.icon.clone(), item.heading.clone(), item.text.clone()))
                .collect(),
        ),
        NodeSnapshot::Cycle { steps } => ContentNode::Cycle(restore_steps(steps)),
        NodeSnapshot::Arrows { steps } => ContentNode::Arrows(restore_steps(steps)),
        NodeSnapshot::Timeline { steps } => ContentNode::Timeline(restore_steps(steps)),
        NodeSnapshot::Pyramid { steps } => ContentNode::Pyramid(restore_steps(steps)),
        NodeSnapshot::Staircase { steps } => ContentNode::Staircase(restore_steps(steps)),
        NodeSnapshot::Chart { kind, rows } => ContentNode::Chart {
            kind: ChartKind::from_attr(kind),
            rows: rows
                .iter()
                .map(|row| ChartRow::new(row.label.clone(), row.value.clone()))
                .collect(),
        },
        NodeSnapshot::Image { query } => ContentNode::Image(query.clone()),
    }
}

fn restore_group(snapshot: &GroupSnapshot) -> NodeGroup {
    NodeGroup::new(snapshot.nodes.iter().map(restore_node).collect())
}

fn restore_steps(steps: &[StepSnapshot]) -> Vec<StepItem> {
    steps
        .iter()
        .map(|step| StepItem::new(step.heading.clone(), step.text.clone()))
        .collect()
}
