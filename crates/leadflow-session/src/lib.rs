// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session layer for the Leadflow agent.
//!
//! [`state`] holds the per-session conversation state machine; [`store`]
//! holds the TTL-bound lookup table of session records. The store hands out
//! `Arc<Mutex<SessionEntry>>` handles; the orchestrator holds the mutex for
//! the full duration of a turn.

pub mod state;
pub mod store;

pub use state::{ConversationState, Phase, Topic};
pub use store::{SessionEntry, SessionStore};
