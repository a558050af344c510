// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduling coordination for the Leadflow agent.
//!
//! Turns detected booking intents into confirmed scheduling links with
//! webhook-then-fallback semantics: the static booking link always works.

pub mod coordinator;

pub use coordinator::{SchedulingCoordinator, SchedulingReply};
