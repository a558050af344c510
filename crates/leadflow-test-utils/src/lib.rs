// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic mock collaborators for Leadflow tests.
//!
//! These mocks implement the `leadflow-core` collaborator traits with
//! scripted behavior so orchestration tests run without network access.

pub mod mock_index;
pub mod mock_provider;

pub use mock_index::MockIndex;
pub use mock_provider::MockProvider;
