// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session conversation state machine.
//!
//! The state record drives turn routing: it tracks how far the conversation
//! has progressed toward a booked consultation and which service area the
//! visitor last showed interest in. The phase is derived from the flags
//! rather than stored, so the two can never drift apart.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Coarse service topics extracted from visitor messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Strategy,
    Analytics,
    Automation,
    Implementation,
    BusinessInquiry,
    ServiceInterest,
}

impl Topic {
    /// Topics that by themselves justify offering a consultation.
    pub fn warrants_consultation(self) -> bool {
        matches!(
            self,
            Topic::BusinessInquiry | Topic::ServiceInterest | Topic::Implementation
        )
    }
}

/// Conversation phase, derived from the state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No turns yet.
    New,
    /// Turns exist, consultation not yet offered.
    Engaged,
    /// A scheduling link has been produced.
    ConsultationOffered,
    /// The visitor explicitly confirmed booking. Scheduling cues are
    /// absorbed from here on; generic questions are still answered.
    Booked,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::New => write!(f, "new"),
            Phase::Engaged => write!(f, "engaged"),
            Phase::ConsultationOffered => write!(f, "consultation_offered"),
            Phase::Booked => write!(f, "booked"),
        }
    }
}

/// Phrases that signal readiness for a consultation offer.
const CONSULTATION_TRIGGERS: &[&str] = &[
    // Direct interest signals
    "interested in",
    "want to know more",
    // Implementation interests
    "how can i",
    "implement",
    "use ai",
    "integrate",
    // Business needs
    "my business",
    "our company",
    "we need",
    "looking for",
    // Specific inquiries about solutions
    "how does it work",
    "can you help",
    "what would you recommend",
];

/// Mutable per-session conversation state.
///
/// Mutated only by the turn orchestrator while the session's mutex is held;
/// `message_count` increments exactly once per handled turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationState {
    /// Turns handled for this session.
    pub interaction_count: u32,
    /// A scheduling link has been produced for this session.
    pub consultation_suggested: bool,
    /// The visitor explicitly confirmed a booking.
    pub booking_completed: bool,
    /// The visitor has described a business need.
    pub business_context: bool,
    /// The visitor has shown interest in a specific service area.
    pub interest_shown: bool,
    /// Most recent extracted topic.
    pub last_topic: Option<Topic>,
    /// Hard-ceiling counter; tracked separately from `interaction_count`
    /// so the ceiling survives any future counter resets.
    pub message_count: u32,
}

impl ConversationState {
    /// Advances the per-turn counters. Called exactly once per handled turn,
    /// before any routing.
    pub fn begin_turn(&mut self) {
        self.interaction_count += 1;
        self.message_count += 1;
    }

    /// Records an extracted topic and updates the interest flags it implies.
    pub fn note_topic(&mut self, topic: Topic) {
        match topic {
            Topic::BusinessInquiry => self.business_context = true,
            Topic::Strategy
            | Topic::Analytics
            | Topic::Automation
            | Topic::Implementation
            | Topic::ServiceInterest => self.interest_shown = true,
        }
        self.last_topic = Some(topic);
    }

    /// Derives the conversation phase from the state flags.
    pub fn phase(&self) -> Phase {
        if self.message_count == 0 {
            Phase::New
        } else if self.booking_completed {
            Phase::Booked
        } else if self.consultation_suggested {
            Phase::ConsultationOffered
        } else {
            Phase::Engaged
        }
    }

    /// Whether the conversation has matured enough to offer a consultation.
    ///
    /// Requires at least three interactions, then either gathered business
    /// context plus a trigger phrase in the current message, or a last topic
    /// that itself warrants the offer.
    pub fn should_offer_consultation(&self, message: &str) -> bool {
        if self.interaction_count < 3 {
            return false;
        }

        let lower = message.to_lowercase();

        if self.business_context
            && self.interest_shown
            && CONSULTATION_TRIGGERS.iter().any(|t| lower.contains(t))
        {
            return true;
        }

        self.last_topic.is_some_and(Topic::warrants_consultation)
    }
}
