// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits for external services.
//!
//! The agent core never talks to hosted services directly; it goes through
//! these seams so tests can substitute deterministic mocks.

pub mod index;
pub mod provider;

pub use index::KnowledgeIndex;
pub use provider::CompletionProvider;
