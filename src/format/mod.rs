// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Parsers for generator output.
//!
//! Two surfaces: the tagged slide markup (tree-structured, parsed incrementally)
//! and the outline markdown (flat, parsed line by line once complete).

pub mod markup;
pub mod outline;

pub use markup::{FinalizeErrorKind, MarkupFinalizeError, PartialParse, StreamParser};
pub use outline::parse_outline;
