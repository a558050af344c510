// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn orchestration for the Leadflow agent.
//!
//! [`orchestrator`] sequences intent classification, state transitions, and
//! reply production for every inbound message; [`replies`] holds the fixed
//! reply catalogue.

pub mod orchestrator;
pub mod replies;

pub use orchestrator::{Reply, TurnOrchestrator};
pub use replies::Replies;
