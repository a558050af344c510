// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification for the Leadflow agent.
//!
//! [`detectors`] holds the fixed-vocabulary heuristics; [`classifier`]
//! layers model-backed binary checks on top with silent degradation back to
//! the heuristics. Scheduling-request detection is purely lexical and is
//! evaluated before any other routing on every turn.

pub mod classifier;
pub mod detectors;

pub use classifier::{ClassificationResult, IntentClassifier};
