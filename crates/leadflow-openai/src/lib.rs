// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat-completions client for the Leadflow agent.
//!
//! Implements the [`leadflow_core::CompletionProvider`] seam: batched
//! completions for grounded replies and single-token yes/no calls for the
//! model-backed intent checks.

pub mod client;
pub mod types;

pub use client::OpenAiClient;
