// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus CLI entrypoint.
//!
//! Replays a captured model transcript through the real streaming pipeline:
//! the markup file is fed chunk by chunk as token deltas, the deck builds up
//! incrementally, and the result is persisted to the decks directory.

use std::error::Error;

use proteus::controller::DeckController;
use proteus::model::{DeckId, SlideDeck};
use proteus::orchestrator::{Phase, TokenEvent};
use proteus::store::{FileGateway, WriteDurability};
use tokio::sync::mpsc;

const DEFAULT_CHUNK_BYTES: usize = 64;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <markup-file> [--chunk <bytes>] [--decks-dir <dir>] [--outline <file>] [--deck-id <id>] [--durable-writes]\n\nReplays <markup-file> through the streaming parser in chunks of --chunk bytes\n(default {DEFAULT_CHUNK_BYTES}) and saves the resulting deck under --decks-dir\n(default the current working directory).\n\n--outline <file> replays an outline transcript first.\n--deck-id <id> names the saved deck file (default: the markup file stem).\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    markup_file: Option<String>,
    chunk: Option<usize>,
    decks_dir: Option<String>,
    outline_file: Option<String>,
    deck_id: Option<String>,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--chunk" => {
                if options.chunk.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let chunk: usize = raw.parse().map_err(|_| ())?;
                if chunk == 0 {
                    return Err(());
                }
                options.chunk = Some(chunk);
            }
            "--decks-dir" => {
                if options.decks_dir.is_some() {
                    return Err(());
                }
                options.decks_dir = Some(args.next().ok_or(())?);
            }
            "--outline" => {
                if options.outline_file.is_some() {
                    return Err(());
                }
                options.outline_file = Some(args.next().ok_or(())?);
            }
            "--deck-id" => {
                if options.deck_id.is_some() {
                    return Err(());
                }
                options.deck_id = Some(args.next().ok_or(())?);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.markup_file.is_some() {
                    return Err(());
                }
                options.markup_file = Some(arg);
            }
        }
    }

    if options.markup_file.is_none() {
        return Err(());
    }

    Ok(options)
}

/// Splits on char boundaries at or after the requested byte size.
fn chunks_of(text: &str, size: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let mut end = (start + size).min(text.len());
        while !text.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&text[start..end]);
        start = end;
    }
    chunks
}

fn deck_id_from_options(options: &CliOptions) -> Result<DeckId, Box<dyn Error>> {
    let raw = match &options.deck_id {
        Some(id) => id.clone(),
        None => {
            let file = options.markup_file.as_deref().unwrap_or_default();
            let stem = std::path::Path::new(file)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            stem.split_whitespace().collect::<Vec<_>>().join("-")
        }
    };
    Ok(DeckId::new(raw)?)
}

async fn replay(
    controller: &mut DeckController,
    transcript: &str,
    chunk: usize,
) -> Result<Phase, Box<dyn Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    for piece in chunks_of(transcript, chunk) {
        tx.send(TokenEvent::Delta(piece.to_owned()))?;
    }
    tx.send(TokenEvent::Done)?;
    drop(tx);
    Ok(controller.drive(&mut rx).await)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "proteus".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let markup_file = options.markup_file.clone().unwrap_or_default();
        let markup = std::fs::read_to_string(&markup_file)?;
        let outline = options
            .outline_file
            .as_deref()
            .map(std::fs::read_to_string)
            .transpose()?;
        let chunk = options.chunk.unwrap_or(DEFAULT_CHUNK_BYTES);

        let deck_id = deck_id_from_options(&options)?;
        let title = deck_id.as_str().to_owned();
        let mut controller = DeckController::new(SlideDeck::new(deck_id.clone(), title));

        let decks_dir = options.decks_dir.clone().unwrap_or_else(|| ".".to_owned());
        let gateway = if options.durable_writes {
            FileGateway::new(decks_dir).with_durability(WriteDurability::Durable)
        } else {
            FileGateway::new(decks_dir)
        };

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        runtime.block_on(async {
            if let Some(outline) = &outline {
                controller.start_outline()?;
                let phase = replay(&mut controller, outline, chunk).await?;
                println!(
                    "proteus: outline {} ({} topics)",
                    phase,
                    controller.outline().topics().len()
                );
            }

            controller.start_slides()?;
            let phase = replay(&mut controller, &markup, chunk).await?;
            println!(
                "proteus: slides {} ({} slides, rev {})",
                phase,
                controller.deck().slide_count(),
                controller.deck().rev()
            );
            if let Some(failure) = controller.last_failure() {
                eprintln!("proteus: generation problem: {failure}");
            }
            for slide in controller.deck().slides() {
                let family = slide
                    .layout_family()
                    .map(|node| match node {
                        proteus::model::ContentNode::Columns(_) => "columns",
                        proteus::model::ContentNode::Bullets(_) => "bullets",
                        proteus::model::ContentNode::Icons(_) => "icons",
                        proteus::model::ContentNode::Cycle(_) => "cycle",
                        proteus::model::ContentNode::Arrows(_) => "arrows",
                        proteus::model::ContentNode::Timeline(_) => "timeline",
                        proteus::model::ContentNode::Pyramid(_) => "pyramid",
                        proteus::model::ContentNode::Staircase(_) => "staircase",
                        proteus::model::ContentNode::Chart { .. } => "chart",
                        _ => "plain",
                    })
                    .unwrap_or("plain");
                println!(
                    "  {} [{} / {}] {} nodes",
                    slide.slide_id(),
                    slide.layout().as_str(),
                    family,
                    slide.content().len()
                );
            }

            if let Some(result) = controller.flush(&gateway) {
                let ack = result?;
                println!(
                    "proteus: saved {} (rev {})",
                    gateway.deck_path(&deck_id).display(),
                    ack.rev
                );
            }
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("proteus: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{chunks_of, parse_options, CliOptions};

    #[test]
    fn parses_a_markup_file_alone() {
        let options = parse_options(["deck.pml".to_owned()].into_iter()).expect("parse options");
        assert_eq!(options.markup_file.as_deref(), Some("deck.pml"));
        assert_eq!(options.chunk, None);
        assert!(!options.durable_writes);
    }

    #[test]
    fn parses_flags_in_any_order() {
        let options = parse_options(
            [
                "--chunk".to_owned(),
                "16".to_owned(),
                "deck.pml".to_owned(),
                "--decks-dir".to_owned(),
                "out".to_owned(),
                "--outline".to_owned(),
                "outline.md".to_owned(),
                "--deck-id".to_owned(),
                "d:demo".to_owned(),
                "--durable-writes".to_owned(),
            ]
            .into_iter(),
        )
        .expect("parse options");
        assert_eq!(
            options,
            CliOptions {
                markup_file: Some("deck.pml".to_owned()),
                chunk: Some(16),
                decks_dir: Some("out".to_owned()),
                outline_file: Some("outline.md".to_owned()),
                deck_id: Some("d:demo".to_owned()),
                durable_writes: true,
            }
        );
    }

    #[test]
    fn rejects_missing_markup_file() {
        parse_options(std::iter::empty()).unwrap_err();
        parse_options(["--chunk".to_owned(), "8".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_unknown_and_duplicate_flags() {
        parse_options(["--nope".to_owned(), "deck.pml".to_owned()].into_iter()).unwrap_err();
        parse_options(
            ["deck.pml".to_owned(), "--chunk".to_owned(), "8".to_owned(), "--chunk".to_owned(), "9".to_owned()]
                .into_iter(),
        )
        .unwrap_err();
        parse_options(["one.pml".to_owned(), "two.pml".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_a_zero_chunk() {
        parse_options(["deck.pml".to_owned(), "--chunk".to_owned(), "0".to_owned()].into_iter())
            .unwrap_err();
    }

    #[test]
    fn chunks_respect_char_boundaries() {
        let text = "ab\u{e9}cd";
        let chunks = chunks_of(text, 3);
        assert_eq!(chunks.concat(), text);
        for chunk in chunks {
            assert!(!chunk.is_empty());
        }
    }
}
