// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait for hosted chat-completion services.

use async_trait::async_trait;

use crate::error::LeadflowError;
use crate::types::{CompletionRequest, CompletionResponse};

/// Adapter for the hosted chat-completion collaborator.
///
/// Implementations are stateless after construction and safely shared
/// across sessions behind an `Arc`.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends a completion request and returns the accumulated response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, LeadflowError>;

    /// Runs a single-token binary classification call.
    ///
    /// The provider is instructed to answer with exactly `Y` or `N`;
    /// returns `true` for `Y`. Callers must treat an `Err` as "heuristic
    /// verdict stands" -- classification degradation is never fatal.
    async fn classify_yes_no(
        &self,
        instructions: &str,
        message: &str,
    ) -> Result<bool, LeadflowError>;
}
