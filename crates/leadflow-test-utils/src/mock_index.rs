// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock knowledge index for deterministic testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadflow_core::types::Passage;
use leadflow_core::{KnowledgeIndex, LeadflowError};

/// A mock knowledge index that serves canned passages.
///
/// Every query returns the configured passages capped at `k`, in order.
/// A failure toggle makes queries error, and a call counter supports
/// "no collaborator was invoked" assertions.
pub struct MockIndex {
    passages: Arc<Mutex<Vec<Passage>>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockIndex {
    /// Create an index with no passages (queries return empty).
    pub fn new() -> Self {
        Self {
            passages: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create an index serving the given passage texts with descending
    /// synthetic scores.
    pub fn with_passages(texts: Vec<&str>) -> Self {
        let passages = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Passage {
                text: text.to_string(),
                score: 0.9 - i as f32 * 0.1,
            })
            .collect();
        Self {
            passages: Arc::new(Mutex::new(passages)),
            ..Self::new()
        }
    }

    /// Make every subsequent query fail with an index error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Total similarity queries issued.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeIndex for MockIndex {
    async fn similarity_search(
        &self,
        _query: &str,
        k: usize,
    ) -> Result<Vec<Passage>, LeadflowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(LeadflowError::Index {
                message: "mock index configured to fail".into(),
                source: None,
            });
        }
        let passages = self.passages.lock().await;
        Ok(passages.iter().take(k).cloned().collect())
    }
}
