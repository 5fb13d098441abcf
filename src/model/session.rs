// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// What a generation session is producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationKind {
    Outline,
    Slides,
}

/// Ephemeral per-generation state, owned exclusively by the orchestrator and
/// dropped on completion, cancellation or failure. Never persisted.
///
/// The buffer is cumulative: every delta appends, and the slides parser always
/// sees the full text received so far. The partial deck itself lives in the
/// working `SlideDeck` (replaced wholesale on each delta), not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSession {
    kind: GenerationKind,
    buffer: String,
    cancelled: bool,
}

impl GenerationSession {
    pub fn new(kind: GenerationKind) -> Self {
        Self {
            kind,
            buffer: String::new(),
            cancelled: false,
        }
    }

    pub fn kind(&self) -> GenerationKind {
        self.kind
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn append_delta(&mut self, delta: &str) {
        self.buffer.push_str(delta);
    }

    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    /// Cooperative cancellation: marks the session; the orchestrator checks the
    /// flag before applying each subsequent delta.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::{GenerationKind, GenerationSession};

    #[test]
    fn buffer_is_cumulative() {
        let mut session = GenerationSession::new(GenerationKind::Slides);
        session.append_delta("<PRESENT");
        session.append_delta("ATION>");
        assert_eq!(session.buffer(), "<PRESENTATION>");
        assert!(!session.cancelled());

        session.cancel();
        assert!(session.cancelled());
    }
}
