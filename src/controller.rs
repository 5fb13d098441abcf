// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The deck controller owns the working state and wires the pieces together:
//! generation events mutate the deck through the orchestrator, edits go
//! through the guarded ops, and every committed change arms the save slot.
//!
//! Saves never run mid-generation. The deck is replaced wholesale on each
//! streaming delta, so persisting those intermediate lists would churn the
//! disk for states the next delta discards anyway.

use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::model::{Outline, SlideDeck};
use crate::ops::{reorder, EditGuard, ReorderError};
use crate::orchestrator::{
    Applied, Orchestrator, OrchestratorError, Phase, ProgressSnapshot, TokenEvent,
};
use crate::store::{
    capture, restore, DebounceSlot, DeckSnapshot, PersistenceGateway, SaveAck, StoreError,
};

#[derive(Debug)]
pub struct DeckController {
    deck: SlideDeck,
    outline: Outline,
    orchestrator: Orchestrator,
    presenting: bool,
    slot: DebounceSlot,
    theme: String,
}

impl DeckController {
    pub fn new(deck: SlideDeck) -> Self {
        Self {
            deck,
            outline: Outline::default(),
            orchestrator: Orchestrator::new(),
            presenting: false,
            slot: DebounceSlot::default(),
            theme: String::new(),
        }
    }

    /// Rebuilds a controller from a persisted snapshot.
    pub fn from_snapshot(snapshot: &DeckSnapshot) -> Result<Self, StoreError> {
        let (deck, outline) = restore(snapshot)?;
        let mut controller = Self::new(deck);
        controller.outline = outline;
        controller.theme = snapshot.theme.clone();
        Ok(controller)
    }

    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.slot = DebounceSlot::new(delay);
        self
    }

    pub fn deck(&self) -> &SlideDeck {
        &self.deck
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.theme = theme.into();
        self.slot.arm();
    }

    pub fn phase(&self) -> Phase {
        self.orchestrator.phase()
    }

    pub fn last_failure(&self) -> Option<&str> {
        self.orchestrator.last_failure()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<ProgressSnapshot> {
        self.orchestrator.subscribe()
    }

    pub fn presenting(&self) -> bool {
        self.presenting
    }

    pub fn set_presenting(&mut self, presenting: bool) {
        self.presenting = presenting;
    }

    pub fn start_outline(&mut self) -> Result<(), OrchestratorError> {
        self.orchestrator.start_outline()
    }

    pub fn start_slides(&mut self) -> Result<(), OrchestratorError> {
        self.orchestrator.start_slides()
    }

    /// Cancels the in-flight generation. The deck keeps whatever the last
    /// delta produced, so the partial result is scheduled for persistence.
    pub fn cancel(&mut self) -> Result<(), OrchestratorError> {
        self.orchestrator.cancel()?;
        if !self.deck.is_empty() {
            self.slot.arm();
        }
        Ok(())
    }

    /// Applies one token event; completion and failure arm the save slot,
    /// per-delta progress does not.
    pub fn apply_event(&mut self, event: TokenEvent) -> Result<Applied, OrchestratorError> {
        let applied = self
            .orchestrator
            .apply_event(&mut self.deck, &mut self.outline, event)?;
        match applied {
            Applied::OutlineComplete { .. }
            | Applied::SlidesComplete { .. }
            | Applied::GenerationFailed { .. } => self.slot.arm(),
            Applied::OutlineProgress { .. }
            | Applied::SlidesProgress { .. }
            | Applied::DroppedAfterCancel => {}
        }
        Ok(applied)
    }

    /// Pumps a token channel to completion, then schedules a save.
    pub async fn drive(&mut self, events: &mut mpsc::UnboundedReceiver<TokenEvent>) -> Phase {
        let phase = self
            .orchestrator
            .drive(&mut self.deck, &mut self.outline, events)
            .await;
        if phase != Phase::Cancelled || !self.deck.is_empty() {
            self.slot.arm();
        }
        phase
    }

    /// Guarded reorder; a successful move schedules a save.
    pub fn reorder(&mut self, source: usize, dest: usize) -> Result<(), ReorderError> {
        let guard = EditGuard {
            generating: self.orchestrator.is_generating(),
            presenting: self.presenting,
        };
        reorder(&mut self.deck, source, dest, guard)?;
        self.slot.arm();
        Ok(())
    }

    /// Marks an out-of-band edit (title, language) as needing persistence.
    pub fn mark_edited(&mut self) {
        self.slot.arm();
    }

    /// Resolves when a scheduled save becomes due. For `select!` loops; pair
    /// with `poll_save`.
    pub async fn save_due(&self) {
        self.slot.due().await
    }

    /// Runs the save if one is due. Returns `None` while a generation is in
    /// flight or nothing is pending. A failed save re-arms the slot, so the
    /// write is retried after another quiet period.
    pub fn poll_save<G: PersistenceGateway>(
        &mut self,
        gateway: &G,
    ) -> Option<Result<SaveAck, StoreError>> {
        if self.orchestrator.is_generating() {
            return None;
        }
        if !self.slot.take_due() {
            return None;
        }
        let result = gateway.save_deck(&self.snapshot());
        if result.is_err() {
            self.slot.arm();
        }
        Some(result)
    }

    /// Teardown: flushes a pending save immediately instead of dropping it.
    pub fn flush<G: PersistenceGateway>(
        &mut self,
        gateway: &G,
    ) -> Option<Result<SaveAck, StoreError>> {
        if !self.slot.take_any() {
            return None;
        }
        Some(gateway.save_deck(&self.snapshot()))
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        capture(&self.deck, &self.outline, &self.theme)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::io;
    use std::path::PathBuf;
    use std::time::Duration;

    use tokio::time::advance;

    use super::DeckController;
    use crate::model::{DeckId, SlideDeck};
    use crate::ops::ReorderError;
    use crate::orchestrator::{Phase, TokenEvent};
    use crate::store::{DeckSnapshot, PersistenceGateway, SaveAck, StoreError};

    const MARKUP: &str = concat!(
        "<PRESENTATION>",
        "<SECTION layout=\"left\"><H1>One</H1></SECTION>",
        "<SECTION layout=\"left\"><H1>Two</H1></SECTION>",
        "<SECTION layout=\"left\"><H1>Three</H1></SECTION>",
        "</PRESENTATION>",
    );

    #[derive(Default)]
    struct RecordingGateway {
        saves: RefCell<Vec<DeckSnapshot>>,
        fail_next: Cell<bool>,
    }

    impl RecordingGateway {
        fn saved(&self) -> Vec<DeckSnapshot> {
            self.saves.borrow().clone()
        }
    }

    impl PersistenceGateway for RecordingGateway {
        fn save_deck(&self, snapshot: &DeckSnapshot) -> Result<SaveAck, StoreError> {
            if self.fail_next.take() {
                return Err(StoreError::Io {
                    path: PathBuf::from("recording"),
                    source: io::Error::other("disk full"),
                });
            }
            self.saves.borrow_mut().push(snapshot.clone());
            Ok(SaveAck { rev: snapshot.rev })
        }
    }

    fn controller() -> DeckController {
        let deck = SlideDeck::new(DeckId::new("d:ctrl").unwrap(), "Controlled");
        DeckController::new(deck).with_save_delay(Duration::from_millis(100))
    }

    fn stream_deck(controller: &mut DeckController) {
        controller.start_slides().unwrap();
        controller
            .apply_event(TokenEvent::Delta(MARKUP.to_owned()))
            .unwrap();
        controller.apply_event(TokenEvent::Done).unwrap();
        assert_eq!(controller.phase(), Phase::SlidesReady);
    }

    #[tokio::test(start_paused = true)]
    async fn streaming_deltas_do_not_save_until_completion() {
        let mut ctrl = controller();
        let gateway = RecordingGateway::default();

        ctrl.start_slides().unwrap();
        for chunk in ["<PRESENTATION><SECTION layout=\"left\">", "<H1>One</H1>"] {
            ctrl.apply_event(TokenEvent::Delta(chunk.to_owned())).unwrap();
            advance(Duration::from_secs(5)).await;
            assert!(ctrl.poll_save(&gateway).is_none());
        }
        ctrl.apply_event(TokenEvent::Delta(
            "</SECTION></PRESENTATION>".to_owned(),
        ))
        .unwrap();
        ctrl.apply_event(TokenEvent::Done).unwrap();

        advance(Duration::from_millis(110)).await;
        let ack = ctrl.poll_save(&gateway).unwrap().unwrap();
        assert_eq!(ack.rev, 1);
        assert_eq!(gateway.saved().len(), 1);
        assert_eq!(gateway.saved()[0].slides.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_edits_coalesce_into_one_save() {
        let mut ctrl = controller();
        let gateway = RecordingGateway::default();
        stream_deck(&mut ctrl);
        advance(Duration::from_millis(110)).await;
        ctrl.poll_save(&gateway).unwrap().unwrap();

        for (source, dest) in [(0, 2), (0, 1), (1, 0)] {
            ctrl.reorder(source, dest).unwrap();
            advance(Duration::from_millis(50)).await;
            assert!(ctrl.poll_save(&gateway).is_none());
        }
        advance(Duration::from_millis(60)).await;
        ctrl.poll_save(&gateway).unwrap().unwrap();
        // Three reorders, exactly two writes total.
        assert_eq!(gateway.saved().len(), 2);
        assert_eq!(gateway.saved()[1].rev, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn reorder_is_blocked_while_generating_or_presenting() {
        let mut ctrl = controller();
        ctrl.start_slides().unwrap();
        ctrl.apply_event(TokenEvent::Delta(MARKUP.to_owned())).unwrap();
        assert_eq!(
            ctrl.reorder(0, 2),
            Err(ReorderError::GenerationInProgress)
        );
        ctrl.apply_event(TokenEvent::Done).unwrap();

        ctrl.set_presenting(true);
        assert_eq!(ctrl.reorder(0, 2), Err(ReorderError::Presenting));
        ctrl.set_presenting(false);
        ctrl.reorder(0, 2).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_save_is_retried_after_another_quiet_period() {
        let mut ctrl = controller();
        let gateway = RecordingGateway::default();
        stream_deck(&mut ctrl);

        gateway.fail_next.set(true);
        advance(Duration::from_millis(110)).await;
        assert!(ctrl.poll_save(&gateway).unwrap().is_err());
        assert!(gateway.saved().is_empty());

        // The slot re-armed itself; the retry succeeds once quiet again.
        advance(Duration::from_millis(50)).await;
        assert!(ctrl.poll_save(&gateway).is_none());
        advance(Duration::from_millis(60)).await;
        assert!(ctrl.poll_save(&gateway).unwrap().is_ok());
        assert_eq!(gateway.saved().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_writes_an_unexpired_pending_save() {
        let mut ctrl = controller();
        let gateway = RecordingGateway::default();
        stream_deck(&mut ctrl);

        assert!(ctrl.flush(&gateway).unwrap().is_ok());
        assert_eq!(gateway.saved().len(), 1);
        // Nothing left pending after the flush.
        assert!(ctrl.flush(&gateway).is_none());
        advance(Duration::from_secs(5)).await;
        assert!(ctrl.poll_save(&gateway).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_schedules_the_partial_deck_for_persistence() {
        let mut ctrl = controller();
        let gateway = RecordingGateway::default();

        ctrl.start_slides().unwrap();
        let cut = MARKUP.find("<SECTION layout=\"left\"><H1>Two").unwrap();
        ctrl.apply_event(TokenEvent::Delta(MARKUP[..cut].to_owned()))
            .unwrap();
        ctrl.cancel().unwrap();
        assert_eq!(ctrl.phase(), Phase::Cancelled);

        advance(Duration::from_millis(110)).await;
        let saved = ctrl.poll_save(&gateway).unwrap().unwrap();
        assert_eq!(saved.rev, 0);
        assert_eq!(gateway.saved()[0].slides.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn round_trips_through_a_snapshot() {
        let mut ctrl = controller();
        stream_deck(&mut ctrl);
        ctrl.set_theme("dark");

        let snapshot = ctrl.snapshot();
        let restored = DeckController::from_snapshot(&snapshot).unwrap();
        assert_eq!(restored.deck(), ctrl.deck());
        assert_eq!(restored.theme(), "dark");
        assert_eq!(restored.phase(), Phase::Idle);
    }
}
