// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockProvider` implements `CompletionProvider` with pre-configured
//! responses, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadflow_core::types::{CompletionRequest, CompletionResponse, TokenUsage};
use leadflow_core::{CompletionProvider, LeadflowError};

/// A mock completion provider that returns pre-configured responses.
///
/// Completions are popped from a FIFO queue (default text when empty);
/// yes/no verdicts are popped from a second queue (default `false`).
/// A failure toggle makes every call return a provider error, and a call
/// counter supports "no collaborator was invoked" assertions.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    verdicts: Arc<Mutex<VecDeque<bool>>>,
    last_request: Arc<Mutex<Option<CompletionRequest>>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a new mock provider with empty queues.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            verdicts: Arc::new(Mutex::new(VecDeque::new())),
            last_request: Arc::new(Mutex::new(None)),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock provider pre-loaded with completion texts.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Self::new()
        }
    }

    /// Create a mock provider pre-loaded with yes/no verdicts.
    pub fn with_verdicts(verdicts: Vec<bool>) -> Self {
        Self {
            verdicts: Arc::new(Mutex::new(VecDeque::from(verdicts))),
            ..Self::new()
        }
    }

    /// Add a completion text to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(text.into());
    }

    /// Add a yes/no verdict to the end of the queue.
    pub async fn add_verdict(&self, verdict: bool) {
        self.verdicts.lock().await.push_back(verdict);
    }

    /// Make every subsequent call fail with a provider error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Total calls across `complete` and `classify_yes_no`.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request passed to `complete`, for prompt-assembly
    /// assertions.
    pub async fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().await.clone()
    }

    fn check_failing(&self) -> Result<(), LeadflowError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(LeadflowError::Provider {
                message: "mock provider configured to fail".into(),
                source: None,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, LeadflowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().await = Some(request.clone());
        self.check_failing()?;
        let content = self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string());
        Ok(CompletionResponse {
            content,
            model: request.model,
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 20,
            },
        })
    }

    async fn classify_yes_no(
        &self,
        _instructions: &str,
        _message: &str,
    ) -> Result<bool, LeadflowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        Ok(self.verdicts.lock().await.pop_front().unwrap_or(false))
    }
}
