// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge index trait for the hosted similarity-search service.

use async_trait::async_trait;

use crate::error::LeadflowError;
use crate::types::Passage;

/// Adapter for the hosted embedding + vector-similarity collaborator.
///
/// The service owns embedding; callers pass raw text queries. Passages are
/// returned in descending relevance order.
#[async_trait]
pub trait KnowledgeIndex: Send + Sync {
    /// Returns the `k` passages most similar to `query`.
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<Passage>, LeadflowError>;
}
