// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Leadflow workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in a session's conversation log.
///
/// Turns are immutable once appended; a user turn is always followed, in the
/// same orchestration pass, by exactly one assistant turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Creates a turn stamped with the current time.
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A knowledge-base passage returned by the similarity index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Passage text.
    pub text: String,
    /// Similarity score reported by the index (higher is closer).
    pub score: f32,
}

/// One message in a completion request, in provider wire order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// A request to the completion collaborator.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Optional system prompt prepended to the conversation.
    pub system: Option<String>,
    /// Ordered conversation messages, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// A response from the completion collaborator.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Accumulated response text.
    pub content: String,
    /// Model that produced the response.
    pub model: String,
    /// Token accounting reported by the provider.
    pub usage: TokenUsage,
}

/// Token usage reported by the completion provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}
