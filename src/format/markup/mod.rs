// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Incremental parser for the tagged slide markup.
//!
//! The grammar is a small fixed vocabulary produced by a cooperating generator,
//! not arbitrary XML; the parser is tolerant by design. Every `feed` call sees
//! the full buffer received so far and returns a valid renderable subset built
//! from fully-closed slide sections only — a buffer ending mid-tag is never an
//! error, its unterminated tail is simply not part of the result yet.

pub mod grammar;
mod lexer;
pub mod stream;

pub use stream::{FinalizeErrorKind, MarkupFinalizeError, PartialParse, StreamParser};

#[cfg(test)]
mod tests;
