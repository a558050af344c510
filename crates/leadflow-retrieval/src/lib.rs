// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval layer for the Leadflow agent.
//!
//! [`index`] talks to the hosted similarity-search service; [`responder`]
//! turns retrieved passages plus recent history into a grounded reply with
//! a fixed fallback on any collaborator failure.

pub mod index;
pub mod responder;

pub use index::IndexClient;
pub use responder::GroundedResponder;
