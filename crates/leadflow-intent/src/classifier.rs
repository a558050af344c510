// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classifier combining fixed-vocabulary heuristics with
//! model-backed binary checks.
//!
//! Each model-backed check degrades silently to its heuristic verdict when
//! the provider is unavailable or errors; `classify` never fails. Results
//! are produced fresh per message and never cached across turns.

use std::sync::Arc;

use tracing::warn;

use leadflow_core::CompletionProvider;
use leadflow_session::Topic;

use crate::detectors;

/// Instructions for the model-backed greeting check.
const GREETING_CHECK: &str = "\
Determine if the given message is primarily a greeting/introduction \
(hi, hello, good morning, 'hi there, how are you') rather than a direct \
question or request. Respond with a single character: Y if it is primarily \
a greeting, N if it is a direct question or request.";

/// Instructions for the model-backed acknowledgment check.
const ACKNOWLEDGMENT_CHECK: &str = "\
Determine if the given message is an acknowledgment or affirmative \
response: a simple acknowledgment (ok, thanks, sure), an affirmative \
(yes, yeah, let's do it), a polite agreement (that would be great, sounds \
good), or an enthusiastic acceptance (oh yes please, absolutely). Respond \
with a single character: Y if it is an acknowledgment/affirmative, N if not.";

/// Instructions for the model-backed relevance check.
///
/// The bias is deliberate: ambiguous, generic, or conversational input is
/// relevant. Only a narrow set of clearly personal topics is rejected, so
/// potential leads are never deflected prematurely.
const RELEVANCE_CHECK: &str = "\
You are a relevance filter for an AI consultancy business. Answer Y for \
anything business-related, any acknowledgment or follow-up, any question \
about learning, tools, technology, efficiency, data, automation, or \
professional capabilities, and any general conversation or small talk. \
Answer N ONLY for clearly personal off-topic requests: gambling or betting, \
personal medical advice, personal dating advice, entertainment or movie \
recommendations, restaurant or food recommendations, travel or tourism, \
sports, weather, or personal shopping. When in doubt, ALWAYS answer Y; err \
on the side of inclusion. Respond with a single character: Y or N.";

/// Transient classification of one message. Never persisted or cached.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// Message reads as a greeting. Only computed on a session's first turn.
    pub is_greeting: bool,
    /// Message is a short affirmative. Only computed once an assistant turn
    /// exists to acknowledge.
    pub is_acknowledgment: bool,
    /// Message contains explicit booking vocabulary.
    pub is_scheduling_request: bool,
    /// Message is plausibly business-related (deliberately biased true).
    pub is_relevant: bool,
    /// Coarse service topic, if any.
    pub topic: Option<Topic>,
}

/// Classifies raw messages using heuristics first and the completion
/// provider for ambiguous cases.
pub struct IntentClassifier {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl IntentClassifier {
    /// Classifier with a model-backed provider for ambiguous cases.
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Heuristic-only classifier. Used when no provider is configured and
    /// as the degraded mode under provider outage.
    pub fn heuristic_only() -> Self {
        Self { provider: None }
    }

    /// Classify one message.
    ///
    /// `first_turn` enables the greeting check; `last_assistant` (the
    /// previous assistant turn's text) enables the acknowledgment check.
    pub async fn classify(
        &self,
        message: &str,
        first_turn: bool,
        last_assistant: Option<&str>,
    ) -> ClassificationResult {
        let is_scheduling_request = detectors::requests_scheduling(message);
        let topic = detectors::extract_topic(message);

        let is_greeting = if first_turn {
            self.check_greeting(message).await
        } else {
            false
        };

        let is_acknowledgment = if last_assistant.is_some() {
            self.check_acknowledgment(message).await
        } else {
            false
        };

        let is_relevant = self.check_relevance(message).await;

        ClassificationResult {
            is_greeting,
            is_acknowledgment,
            is_scheduling_request,
            is_relevant,
            topic,
        }
    }

    /// Greeting: allow-list first, model check for the rest of first-turn
    /// messages, fall back to the heuristic verdict on provider failure.
    async fn check_greeting(&self, message: &str) -> bool {
        if detectors::is_greeting(message) {
            return true;
        }
        match &self.provider {
            Some(provider) => match provider.classify_yes_no(GREETING_CHECK, message).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!(error = %e, "greeting check degraded to heuristic");
                    false
                }
            },
            None => false,
        }
    }

    /// Acknowledgment: affirmation vocabulary first, model check when the
    /// message doesn't match common patterns.
    async fn check_acknowledgment(&self, message: &str) -> bool {
        if detectors::is_affirmation(message) {
            return true;
        }
        match &self.provider {
            Some(provider) => {
                match provider
                    .classify_yes_no(ACKNOWLEDGMENT_CHECK, message)
                    .await
                {
                    Ok(verdict) => verdict,
                    Err(e) => {
                        warn!(error = %e, "acknowledgment check degraded to heuristic");
                        false
                    }
                }
            }
            None => false,
        }
    }

    /// Relevance: no deny-list hit means relevant with no model call. A
    /// deny hit gets one model-backed chance to rescue the message; under
    /// provider failure the deny-list verdict stands.
    async fn check_relevance(&self, message: &str) -> bool {
        if !detectors::hits_deny_list(message) {
            return true;
        }
        match &self.provider {
            Some(provider) => match provider.classify_yes_no(RELEVANCE_CHECK, message).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    warn!(error = %e, "relevance check degraded to deny-list verdict");
                    false
                }
            },
            None => false,
        }
    }
}
