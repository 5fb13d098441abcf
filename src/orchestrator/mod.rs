// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Generation sequencing: outline, then slides, one at a time.
//!
//! The orchestrator is a synchronous state machine; `drive` is the thin async
//! pump that feeds it from the token channel. All deck mutation happens inside
//! `apply_event`, between channel suspension points, so other components never
//! observe a half-applied delta. A single generation may be in flight at any
//! time; a second start is rejected, never queued.

use std::fmt;

use tokio::sync::{mpsc, watch};

use crate::format::markup::StreamParser;
use crate::format::outline::parse_outline;
use crate::model::{GenerationKind, GenerationSession, Outline, SlideDeck};

/// Lifecycle phase of the generation pipeline.
///
/// `Cancelled` and `Failed` are terminal for their session and idle-equivalent
/// for admission: a new generation may start from either, and `reset` returns
/// them to `Idle` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    OutlineRequested,
    OutlineStreaming,
    OutlineReady,
    SlidesRequested,
    SlidesStreaming,
    SlidesReady,
    Cancelled,
    Failed,
}

impl Phase {
    /// The single-flight guard: true while a generation owns the deck.
    pub fn is_generating(&self) -> bool {
        matches!(
            self,
            Self::OutlineRequested
                | Self::OutlineStreaming
                | Self::SlidesRequested
                | Self::SlidesStreaming
        )
    }

    fn admits_start(&self) -> bool {
        !self.is_generating()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::OutlineRequested => "outline-requested",
            Self::OutlineStreaming => "outline-streaming",
            Self::OutlineReady => "outline-ready",
            Self::SlidesRequested => "slides-requested",
            Self::SlidesStreaming => "slides-streaming",
            Self::SlidesReady => "slides-ready",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One item from the token channel: an ordered text delta, a completion
/// signal, or a channel error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEvent {
    Delta(String),
    Done,
    Error(String),
}

/// What applying one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    OutlineProgress { buffered_bytes: usize },
    OutlineComplete { topics: usize },
    SlidesProgress { closed_slides: usize },
    SlidesComplete { slides: usize },
    GenerationFailed { reason: String },
    DroppedAfterCancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// A generation is already in flight; the request is rejected, not queued.
    Busy { phase: Phase },
    /// `cancel` outside a generation.
    NotGenerating { phase: Phase },
    /// A token event arrived in a phase that has no session to apply it to.
    UnexpectedEvent { phase: Phase },
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy { phase } => {
                write!(f, "a generation is already in flight (phase {phase})")
            }
            Self::NotGenerating { phase } => {
                write!(f, "no generation to cancel (phase {phase})")
            }
            Self::UnexpectedEvent { phase } => {
                write!(f, "token event outside a generation (phase {phase})")
            }
        }
    }
}

impl std::error::Error for OrchestratorError {}

/// Live progress published to the host UI over a watch channel, so rendering
/// never has to reach into the orchestrator between deltas.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub phase: Phase,
    /// Raw accumulated outline text; the outline has no structural parser, the
    /// UI renders this as-is for live feedback.
    pub outline_text: String,
    pub closed_slides: usize,
}

/// The generation state machine. Owns the ephemeral session; the deck and
/// outline stay with the caller and are only touched inside `apply_event`.
#[derive(Debug)]
pub struct Orchestrator {
    phase: Phase,
    session: Option<GenerationSession>,
    parser: StreamParser,
    last_failure: Option<String>,
    progress: watch::Sender<ProgressSnapshot>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    pub fn new() -> Self {
        let (progress, _) = watch::channel(ProgressSnapshot::default());
        Self {
            phase: Phase::Idle,
            session: None,
            parser: StreamParser::new(),
            last_failure: None,
            progress,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The single boolean other components consult before mutating the deck.
    pub fn is_generating(&self) -> bool {
        self.phase.is_generating()
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.progress.subscribe()
    }

    /// Returns a terminal phase (`Cancelled`/`Failed`) to `Idle`.
    pub fn reset(&mut self) -> Result<(), OrchestratorError> {
        if self.phase.is_generating() {
            return Err(OrchestratorError::Busy { phase: self.phase });
        }
        self.phase = Phase::Idle;
        self.session = None;
        self.publish(0);
        Ok(())
    }

    pub fn start_outline(&mut self) -> Result<(), OrchestratorError> {
        self.start(GenerationKind::Outline)
    }

    pub fn start_slides(&mut self) -> Result<(), OrchestratorError> {
        self.start(GenerationKind::Slides)
    }

    fn start(&mut self, kind: GenerationKind) -> Result<(), OrchestratorError> {
        if !self.phase.admits_start() {
            return Err(OrchestratorError::Busy { phase: self.phase });
        }
        self.session = Some(GenerationSession::new(kind));
        self.parser = StreamParser::new();
        self.last_failure = None;
        self.phase = match kind {
            GenerationKind::Outline => Phase::OutlineRequested,
            GenerationKind::Slides => Phase::SlidesRequested,
        };
        self.publish(0);
        Ok(())
    }

    /// Cooperative cancellation: flags the session so no further event mutates
    /// the deck; the delta currently being applied (if any) already finished,
    /// since application is synchronous.
    pub fn cancel(&mut self) -> Result<(), OrchestratorError> {
        if !self.phase.is_generating() {
            return Err(OrchestratorError::NotGenerating { phase: self.phase });
        }
        if let Some(session) = self.session.as_mut() {
            session.cancel();
        }
        self.phase = Phase::Cancelled;
        self.publish(0);
        Ok(())
    }

    /// Applies one token event. Mutation of `deck`/`outline` happens entirely
    /// within this call.
    pub fn apply_event(
        &mut self,
        deck: &mut SlideDeck,
        outline: &mut Outline,
        event: TokenEvent,
    ) -> Result<Applied, OrchestratorError> {
        // Events still in flight after cancellation are dropped untouched.
        if self.phase == Phase::Cancelled {
            self.session = None;
            return Ok(Applied::DroppedAfterCancel);
        }

        if !self.phase.is_generating() || self.session.is_none() {
            return Err(OrchestratorError::UnexpectedEvent { phase: self.phase });
        }
        let kind = match self.phase {
            Phase::OutlineRequested | Phase::OutlineStreaming => GenerationKind::Outline,
            _ => GenerationKind::Slides,
        };

        match (kind, event) {
            (GenerationKind::Outline, TokenEvent::Delta(delta)) => {
                let Some(session) = self.session.as_mut() else {
                    return Err(OrchestratorError::UnexpectedEvent { phase: self.phase });
                };
                session.append_delta(&delta);
                let buffered_bytes = session.buffer().len();
                self.phase = Phase::OutlineStreaming;
                self.publish(deck.slide_count());
                Ok(Applied::OutlineProgress { buffered_bytes })
            }
            (GenerationKind::Outline, TokenEvent::Done) => {
                if let Some(session) = self.session.take() {
                    *outline = parse_outline(session.buffer());
                }
                self.phase = Phase::OutlineReady;
                self.publish(deck.slide_count());
                Ok(Applied::OutlineComplete {
                    topics: outline.topics().len(),
                })
            }
            (GenerationKind::Slides, TokenEvent::Delta(delta)) => {
                let Some(session) = self.session.as_mut() else {
                    return Err(OrchestratorError::UnexpectedEvent { phase: self.phase });
                };
                session.append_delta(&delta);
                let partial = self.parser.feed(session.buffer());
                let closed_slides = partial.slides().len();
                // Replace-whole-list semantics: a later delta's tree always
                // supersedes an earlier one, never a merge.
                deck.replace_slides(partial.into_slides());
                self.phase = Phase::SlidesStreaming;
                self.publish(closed_slides);
                Ok(Applied::SlidesProgress { closed_slides })
            }
            (GenerationKind::Slides, TokenEvent::Done) => {
                let Some(session) = self.session.take() else {
                    return Err(OrchestratorError::UnexpectedEvent { phase: self.phase });
                };
                match self.parser.finalize(session.buffer()) {
                    Ok(slides) if slides.is_empty() => {
                        // A deck is never empty after a successful generation;
                        // well-formed markup with no sections is a failure.
                        let reason = "markup contained no slides".to_owned();
                        self.fail(reason.clone());
                        self.publish(0);
                        Ok(Applied::GenerationFailed { reason })
                    }
                    Ok(slides) => {
                        let count = slides.len();
                        deck.replace_slides(slides);
                        deck.bump_rev();
                        self.phase = Phase::SlidesReady;
                        self.publish(count);
                        Ok(Applied::SlidesComplete { slides: count })
                    }
                    Err(err) => {
                        // Malformed ending: keep the best-effort slides, report
                        // the failure, leave the deck editable.
                        let reason = err.to_string();
                        let partial = err.into_partial();
                        let count = partial.len();
                        deck.replace_slides(partial);
                        self.fail(reason.clone());
                        self.publish(count);
                        Ok(Applied::GenerationFailed { reason })
                    }
                }
            }
            (_, TokenEvent::Error(message)) => {
                // Channel failure: the deck keeps the last applied delta.
                self.fail(message.clone());
                self.publish(deck.slide_count());
                Ok(Applied::GenerationFailed { reason: message })
            }
        }
    }

    /// Async pump: applies channel events in arrival order until the session
    /// reaches a terminal phase or the channel closes. Cancellation is checked
    /// between deltas, never mid-delta.
    pub async fn drive(
        &mut self,
        deck: &mut SlideDeck,
        outline: &mut Outline,
        events: &mut mpsc::UnboundedReceiver<TokenEvent>,
    ) -> Phase {
        loop {
            if !self.phase.is_generating() {
                return self.phase;
            }
            let Some(event) = events.recv().await else {
                // Channel closed without a completion signal.
                let _ = self.apply_event(
                    deck,
                    outline,
                    TokenEvent::Error("token channel closed before completion".to_owned()),
                );
                return self.phase;
            };
            if self.apply_event(deck, outline, event).is_err() {
                return self.phase;
            }
        }
    }

    fn fail(&mut self, reason: String) {
        self.session = None;
        self.last_failure = Some(reason);
        self.phase = Phase::Failed;
    }

    fn publish(&self, closed_slides: usize) {
        let outline_text = self
            .session
            .as_ref()
            .filter(|session| session.kind() == GenerationKind::Outline)
            .map(|session| session.buffer().to_owned())
            .unwrap_or_default();
        // Receivers may all be gone; publishing is best-effort.
        let _ = self.progress.send(ProgressSnapshot {
            phase: self.phase,
            outline_text,
            closed_slides,
        });
    }
}
