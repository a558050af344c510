// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Leadflow lead-qualification agent.
//!
//! Provides the foundational error type, shared conversation types, and the
//! collaborator traits the rest of the workspace implements.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LeadflowError;
pub use traits::{CompletionProvider, KnowledgeIndex};
pub use types::{
    ChatMessage, CompletionRequest, CompletionResponse, Passage, Role, TokenUsage, Turn,
};
