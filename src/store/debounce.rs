// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Save debouncing. Every change re-arms the slot, so a burst of edits or
//! streaming deltas collapses into one save once the deck goes quiet for the
//! configured delay.

use std::future::pending;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Default quiet period before a dirty deck is written out.
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(1000);

/// A single re-armable deadline. The slot carries no payload; the caller
/// snapshots the deck at save time, so the write always reflects the latest
/// state rather than the state at arm time.
#[derive(Debug, Clone)]
pub struct DebounceSlot {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for DebounceSlot {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DEBOUNCE)
    }
}

impl DebounceSlot {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Arms the slot, pushing any existing deadline further out.
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// Consumes the deadline if it has passed. At most one `true` per arm.
    pub fn take_due(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Consumes the deadline regardless of whether it has passed. Used at
    /// teardown, where pending work is flushed rather than dropped.
    pub fn take_any(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Resolves when the deadline passes; never resolves while disarmed.
    /// Cancellation-safe, intended for `select!` loops.
    pub async fn due(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::{advance, timeout};

    use super::{DebounceSlot, DEFAULT_SAVE_DEBOUNCE};

    #[tokio::test(start_paused = true)]
    async fn rapid_re_arms_collapse_into_one_due() {
        let mut slot = DebounceSlot::new(Duration::from_millis(100));
        slot.arm();
        advance(Duration::from_millis(60)).await;
        assert!(!slot.take_due());

        // The second arm pushes the deadline out past the original one.
        slot.arm();
        advance(Duration::from_millis(60)).await;
        assert!(!slot.take_due());

        advance(Duration::from_millis(40)).await;
        assert!(slot.take_due());
        assert!(!slot.take_due());
        assert!(!slot.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn due_resolves_only_after_the_delay() {
        let mut slot = DebounceSlot::new(Duration::from_millis(100));
        slot.arm();
        assert!(timeout(Duration::from_millis(50), slot.due()).await.is_err());
        assert!(timeout(Duration::from_millis(60), slot.due()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn due_never_resolves_while_disarmed() {
        let slot = DebounceSlot::new(Duration::from_millis(10));
        assert!(timeout(Duration::from_secs(60), slot.due()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn take_any_flushes_an_unexpired_deadline() {
        let mut slot = DebounceSlot::new(Duration::from_millis(100));
        assert!(!slot.take_any());
        slot.arm();
        assert!(slot.take_any());
        assert!(!slot.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_cancels_a_pending_save() {
        let mut slot = DebounceSlot::default();
        slot.arm();
        slot.disarm();
        advance(DEFAULT_SAVE_DEBOUNCE * 2).await;
        assert!(!slot.take_due());
    }
}
