// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn orchestrator: the single entry point for inbound messages.
//!
//! Each turn runs the priority ladder exactly once while holding the
//! session's mutex, so turns for one session are strictly sequential while
//! distinct sessions run concurrently. Every path appends the user turn and
//! exactly one assistant turn before returning.

use std::sync::Arc;

use tracing::{debug, info};

use leadflow_config::model::SessionConfig;
use leadflow_core::types::Role;
use leadflow_intent::{IntentClassifier, detectors};
use leadflow_retrieval::GroundedResponder;
use leadflow_scheduling::{SchedulingCoordinator, SchedulingReply};
use leadflow_session::{SessionEntry, SessionStore};

use crate::replies::Replies;

/// Turns sent to the scheduling webhook as conversation context.
const WEBHOOK_CONTEXT_TURNS: usize = 3;

/// The outgoing reply for one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Plain sentence reply.
    Text(String),
    /// Scheduling envelope; serialized as JSON on the wire.
    Scheduling(SchedulingReply),
}

impl Reply {
    /// Wire payload: plain text, or the JSON scheduling envelope.
    pub fn into_payload(self) -> String {
        match self {
            Reply::Text(text) => text,
            Reply::Scheduling(reply) => reply.to_payload(),
        }
    }

    /// Text stored in the session log. For scheduling replies this is the
    /// invitation message plus link, which keeps consultation-invite
    /// detection working on the next turn.
    fn log_text(&self) -> String {
        match self {
            Reply::Text(text) => text.clone(),
            Reply::Scheduling(reply) => format!("{} {}", reply.message, reply.url),
        }
    }
}

/// Sequences classification, state transitions, and reply production for
/// every inbound message.
pub struct TurnOrchestrator {
    store: Arc<SessionStore>,
    classifier: IntentClassifier,
    responder: GroundedResponder,
    scheduler: SchedulingCoordinator,
    replies: Replies,
    message_ceiling: u32,
    prompt_history: usize,
}

impl TurnOrchestrator {
    /// Wires the orchestrator to its components.
    pub fn new(
        store: Arc<SessionStore>,
        classifier: IntentClassifier,
        responder: GroundedResponder,
        scheduler: SchedulingCoordinator,
        replies: Replies,
        session_config: &SessionConfig,
    ) -> Self {
        Self {
            store,
            classifier,
            responder,
            scheduler,
            replies,
            message_ceiling: session_config.message_ceiling,
            prompt_history: session_config.prompt_history,
        }
    }

    /// Handles one inbound message for a session and produces the reply.
    ///
    /// Holds the session mutex for the whole turn; a second message for the
    /// same session waits until this one completes.
    pub async fn handle(&self, session_id: &str, message: &str) -> Reply {
        let entry = self.store.entry(session_id);
        let mut session = entry.lock().await;

        session.state.begin_turn();
        debug!(
            session_id,
            message_count = session.state.message_count,
            phase = %session.state.phase(),
            "handling turn"
        );

        // 1. Hard message-count ceiling: fixed reply, no collaborator calls.
        if session.state.message_count > self.message_ceiling {
            info!(session_id, "message ceiling exceeded");
            let reply = Reply::Text(self.replies.capacity_exceeded());
            return self.finish(&mut session, message, reply);
        }

        let first_turn = session.is_empty();
        let last_assistant = session.last_assistant_text();
        let outcome = self
            .classifier
            .classify(message, first_turn, last_assistant.as_deref())
            .await;

        if let Some(topic) = outcome.topic {
            session.state.note_topic(topic);
        }
        if detectors::mentions_business_context(message) {
            session.state.business_context = true;
        }

        // 2. Past-tense booking confirmation flips the session to booked.
        // Checked before the scheduling vocabulary so "I booked an
        // appointment" confirms instead of producing another link.
        if detectors::confirms_booking(message) {
            session.state.booking_completed = true;
            info!(session_id, "booking confirmed by visitor");
            let reply = Reply::Text(self.replies.booking_confirmed());
            return self.finish(&mut session, message, reply);
        }

        // 3. Explicit booking vocabulary bypasses all other routing.
        if outcome.is_scheduling_request {
            if session.state.booking_completed {
                let reply = Reply::Text(self.replies.already_booked());
                return self.finish(&mut session, message, reply);
            }
            let reply = self.schedule(&mut session, session_id).await;
            return self.finish(&mut session, message, reply);
        }

        // 4. An acknowledgment right after a consultation invite accepts the
        // offer. Once booked, implicit cues are absorbed, not re-triggered.
        if outcome.is_acknowledgment
            && !session.state.booking_completed
            && last_assistant
                .as_deref()
                .is_some_and(detectors::invites_consultation)
        {
            let reply = self.schedule(&mut session, session_id).await;
            return self.finish(&mut session, message, reply);
        }

        // 5. Implementation questions get the fixed consultation offer.
        if detectors::asks_implementation(message) {
            let reply = Reply::Text(self.replies.implementation_offer());
            return self.finish(&mut session, message, reply);
        }

        // 6. Acknowledgment outside a consultation context: topic nudge.
        if outcome.is_acknowledgment {
            let reply = Reply::Text(
                self.replies.acknowledgment_nudge(session.state.last_topic),
            );
            return self.finish(&mut session, message, reply);
        }

        // 7. First message: greeting branch or direct-question branch.
        if first_turn {
            let reply = if outcome.is_greeting {
                Reply::Text(self.replies.greeting())
            } else if detectors::asks_services(message) {
                Reply::Text(self.replies.services_overview())
            } else if detectors::asks_about_site(message) {
                Reply::Text(self.replies.about_site())
            } else {
                Reply::Text(self.responder.respond(message, &[]).await)
            };
            return self.finish(&mut session, message, reply);
        }

        // 8. Fixed informational intents, in any state.
        if detectors::asks_about_site(message) {
            let reply = Reply::Text(self.replies.about_site());
            return self.finish(&mut session, message, reply);
        }
        if detectors::asks_services(message) {
            let reply = Reply::Text(self.replies.services_overview());
            return self.finish(&mut session, message, reply);
        }

        // 9. Consultation offer, gated on services having been explained.
        if !session.state.booking_completed && session.state.should_offer_consultation(message) {
            if !session.log_mentions("services") {
                let reply = Reply::Text(self.replies.services_gate());
                return self.finish(&mut session, message, reply);
            }
            let reply = self.schedule(&mut session, session_id).await;
            return self.finish(&mut session, message, reply);
        }

        // 10. Off-topic deflection.
        if !outcome.is_relevant {
            let reply = Reply::Text(self.replies.off_topic());
            return self.finish(&mut session, message, reply);
        }

        // 11. Default: grounded reply from retrieval + completion.
        let recent = session.recent_turns(self.prompt_history);
        let text = self.responder.respond(message, &recent).await;
        self.finish(&mut session, message, Reply::Text(text))
    }

    /// Runs the scheduling coordinator and marks the consultation as
    /// suggested. `booking_completed` flips only on a later explicit
    /// confirmation from the visitor.
    async fn schedule(&self, session: &mut SessionEntry, session_id: &str) -> Reply {
        let context = session.recent_contents(WEBHOOK_CONTEXT_TURNS);
        let reply = self.scheduler.schedule(session_id, &context).await;
        session.state.consultation_suggested = true;
        Reply::Scheduling(reply)
    }

    /// Appends the user turn and exactly one assistant turn, preserving the
    /// one-user-one-assistant pairing invariant on every path.
    fn finish(&self, session: &mut SessionEntry, user_message: &str, reply: Reply) -> Reply {
        session.append_turn(Role::User, user_message);
        session.append_turn(Role::Assistant, reply.log_text());
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_config::model::{
        IndexConfig, OpenAiConfig, PersonaConfig, SchedulingConfig, SessionConfig,
    };
    use leadflow_retrieval::GroundedResponder;
    use leadflow_session::Topic;
    use leadflow_test_utils::{MockIndex, MockProvider};

    struct Harness {
        orchestrator: TurnOrchestrator,
        store: Arc<SessionStore>,
        provider: Arc<MockProvider>,
        index: Arc<MockIndex>,
    }

    fn harness_with(session_config: SessionConfig, provider: MockProvider) -> Harness {
        let store = Arc::new(SessionStore::new(&session_config));
        let provider = Arc::new(provider);
        let index = Arc::new(MockIndex::with_passages(vec![
            "We help businesses adopt AI.",
        ]));

        let responder = GroundedResponder::new(
            index.clone(),
            provider.clone(),
            PersonaConfig::default(),
            &OpenAiConfig::default(),
            &IndexConfig::default(),
        );
        // No webhook configured: scheduling resolves to the static link
        // without touching the network.
        let scheduler = SchedulingCoordinator::new(&SchedulingConfig::default()).unwrap();
        let orchestrator = TurnOrchestrator::new(
            store.clone(),
            IntentClassifier::new(provider.clone()),
            responder,
            scheduler,
            Replies::new(&PersonaConfig::default()),
            &session_config,
        );

        Harness {
            orchestrator,
            store,
            provider,
            index,
        }
    }

    fn harness() -> Harness {
        harness_with(SessionConfig::default(), MockProvider::new())
    }

    fn text(reply: &Reply) -> &str {
        match reply {
            Reply::Text(t) => t,
            Reply::Scheduling(_) => panic!("expected text reply, got scheduling envelope"),
        }
    }

    #[tokio::test]
    async fn first_greeting_takes_greeting_branch() {
        let h = harness();
        let reply = h.orchestrator.handle("visitor", "hi").await;

        assert!(text(&reply).starts_with("Hello!"));
        // Canned path: no collaborator was invoked.
        assert_eq!(h.provider.call_count(), 0);
        assert_eq!(h.index.call_count(), 0);
    }

    #[tokio::test]
    async fn first_direct_question_goes_to_responder() {
        let provider = MockProvider::with_responses(vec![
            "We can help with that. Shall we set up a chat?".to_string(),
        ]);
        let h = harness_with(SessionConfig::default(), provider);
        // Misses the greeting allow-list; the model verdict queue is empty
        // so the model-backed greeting check answers false.
        let reply = h
            .orchestrator
            .handle("visitor", "can AI improve our margins?")
            .await;

        assert_eq!(text(&reply), "We can help with that. Shall we set up a chat?");
        assert_eq!(h.index.call_count(), 1);
    }

    #[tokio::test]
    async fn services_question_gets_fixed_reply_in_any_state() {
        let h = harness();
        let reply = h
            .orchestrator
            .handle("visitor", "what services do you offer")
            .await;
        assert!(text(&reply).starts_with("We offer:"));

        // Still the fixed reply later in the conversation, even once booked.
        {
            let entry = h.store.entry("visitor");
            entry.lock().await.state.booking_completed = true;
        }
        let reply = h
            .orchestrator
            .handle("visitor", "what services do you offer")
            .await;
        assert!(text(&reply).starts_with("We offer:"));
    }

    #[tokio::test]
    async fn about_site_gets_fixed_reply() {
        let h = harness();
        let reply = h
            .orchestrator
            .handle("visitor", "tell me about this site")
            .await;
        assert!(text(&reply).contains("Atrium AI"));
    }

    #[tokio::test]
    async fn explicit_scheduling_request_returns_envelope() {
        let h = harness();
        let reply = h
            .orchestrator
            .handle("visitor", "I'd like to book a consultation")
            .await;

        let Reply::Scheduling(envelope) = reply else {
            panic!("expected scheduling envelope");
        };
        assert!(!envelope.url.is_empty());
        assert_eq!(envelope.kind, "scheduling");

        let entry = h.store.entry("visitor");
        let session = entry.lock().await;
        assert!(session.state.consultation_suggested);
        assert!(!session.state.booking_completed);
    }

    #[tokio::test]
    async fn acknowledgment_after_invite_accepts_the_offer() {
        let h = harness();
        {
            let entry = h.store.entry("visitor");
            let mut session = entry.lock().await;
            session.append_turn(Role::User, "we might need help");
            session.append_turn(
                Role::Assistant,
                "Would you like to schedule a consultation to discuss this?",
            );
            session.state.begin_turn();
        }

        let reply = h.orchestrator.handle("visitor", "yes").await;
        let Reply::Scheduling(envelope) = reply else {
            panic!("expected scheduling envelope after affirmative");
        };
        assert!(!envelope.url.is_empty());
    }

    #[tokio::test]
    async fn acknowledgment_without_invite_gets_topic_nudge() {
        let h = harness();
        {
            let entry = h.store.entry("visitor");
            let mut session = entry.lock().await;
            session.append_turn(Role::User, "tell me about analytics");
            session.append_turn(Role::Assistant, "We turn raw data into decisions.");
            session.state.begin_turn();
            session.state.note_topic(Topic::Analytics);
        }

        let reply = h.orchestrator.handle("visitor", "ok sure").await;
        assert!(text(&reply).contains("analytics"));
    }

    #[tokio::test]
    async fn implementation_question_offers_consultation() {
        let h = harness();
        let _ = h.orchestrator.handle("visitor", "hi").await;
        let reply = h
            .orchestrator
            .handle("visitor", "how do I integrate this with our stack?")
            .await;
        assert!(text(&reply).contains("consultation"));
    }

    #[tokio::test]
    async fn booking_confirmation_flips_state_and_absorbs_later_cues() {
        let h = harness();
        let _ = h.orchestrator.handle("visitor", "hi").await;

        let reply = h
            .orchestrator
            .handle("visitor", "I just booked an appointment... I mean, I scheduled it")
            .await;
        assert!(text(&reply).starts_with("Excellent!"));

        {
            let entry = h.store.entry("visitor");
            assert!(entry.lock().await.state.booking_completed);
        }

        // Explicit booking words now get the already-booked acknowledgment,
        // never a new link.
        let reply = h.orchestrator.handle("visitor", "can I book again?").await;
        assert!(text(&reply).contains("already booked"));
    }

    #[tokio::test]
    async fn consultation_offer_gated_until_services_explained() {
        let h = harness();
        {
            let entry = h.store.entry("visitor");
            let mut session = entry.lock().await;
            session.append_turn(Role::User, "we're evaluating vendors");
            session.append_turn(Role::Assistant, "What's driving the evaluation?");
            for _ in 0..3 {
                session.state.begin_turn();
            }
        }

        // BusinessInquiry topic warrants an offer, but services were never
        // explained: the gate reply comes first, state unchanged.
        let reply = h
            .orchestrator
            .handle("visitor", "our company is looking for AI help")
            .await;
        assert!(text(&reply).contains("services"));
        {
            let entry = h.store.entry("visitor");
            assert!(!entry.lock().await.state.consultation_suggested);
        }

        // The gate reply mentioned services; the same inquiry now schedules.
        let reply = h
            .orchestrator
            .handle("visitor", "our company is looking for AI help")
            .await;
        assert!(matches!(reply, Reply::Scheduling(_)));
    }

    #[tokio::test]
    async fn off_topic_message_is_deflected() {
        let h = harness();
        let _ = h.orchestrator.handle("visitor", "hi").await;

        // Deny-list hit; the mock's empty verdict queue answers "no rescue".
        let reply = h
            .orchestrator
            .handle("visitor", "what's the weather like?")
            .await;
        assert!(text(&reply).contains("businesses"));
        assert_eq!(h.index.call_count(), 0);
    }

    #[tokio::test]
    async fn ceiling_returns_capacity_reply_with_no_collaborator_calls() {
        let session_config = SessionConfig {
            message_ceiling: 2,
            ..SessionConfig::default()
        };
        let h = harness_with(session_config, MockProvider::new());

        let _ = h.orchestrator.handle("visitor", "hi").await;
        let _ = h.orchestrator.handle("visitor", "what services do you offer").await;
        let calls_before = h.provider.call_count();

        let reply = h.orchestrator.handle("visitor", "and pricing?").await;
        assert_eq!(
            text(&reply),
            Replies::new(&PersonaConfig::default()).capacity_exceeded()
        );
        assert_eq!(h.provider.call_count(), calls_before);
        assert_eq!(h.index.call_count(), 0);

        // Every subsequent turn stays capped.
        let reply = h.orchestrator.handle("visitor", "hello?").await;
        assert!(text(&reply).contains("maximum number of messages"));
    }

    #[tokio::test]
    async fn message_count_tracks_turns_exactly() {
        let h = harness();
        for i in 0..4 {
            let _ = h.orchestrator.handle("visitor", &format!("message {i}")).await;
        }
        let entry = h.store.entry("visitor");
        assert_eq!(entry.lock().await.state.message_count, 4);
    }

    #[tokio::test]
    async fn every_user_turn_is_paired_with_one_assistant_turn() {
        let h = harness();
        let _ = h.orchestrator.handle("visitor", "hi").await;
        let _ = h.orchestrator.handle("visitor", "book a meeting").await;
        let _ = h.orchestrator.handle("visitor", "what services do you offer").await;

        let entry = h.store.entry("visitor");
        let session = entry.lock().await;
        let turns = session.recent_turns(usize::MAX);
        assert_eq!(turns.len(), 6);
        for pair in turns.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
        }
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let h = harness();
        let _ = h.orchestrator.handle("alpha", "hi").await;
        let _ = h.orchestrator.handle("beta", "hi").await;
        let _ = h.orchestrator.handle("alpha", "book a meeting").await;

        let alpha = h.store.entry("alpha");
        let beta = h.store.entry("beta");
        assert_eq!(alpha.lock().await.state.message_count, 2);
        assert_eq!(beta.lock().await.state.message_count, 1);
        assert!(alpha.lock().await.state.consultation_suggested);
        assert!(!beta.lock().await.state.consultation_suggested);
    }

    #[tokio::test]
    async fn default_path_feeds_recent_history_to_responder() {
        let provider = MockProvider::with_responses(vec![
            "Happy to help.".to_string(),
            "Our analytics work starts with your data.".to_string(),
        ]);
        let h = harness_with(SessionConfig::default(), provider);

        let _ = h
            .orchestrator
            .handle("visitor", "can AI improve our reporting?")
            .await;
        let _ = h
            .orchestrator
            .handle("visitor", "what does that look like in practice?")
            .await;

        let request = h.provider.last_request().await.expect("responder called");
        let last = request.messages.last().unwrap();
        assert_eq!(last.content, "what does that look like in practice?");
        // Prior turns travel with the request.
        assert!(request.messages.len() > 1);
    }

    #[tokio::test]
    async fn scheduling_reply_payload_is_json_envelope() {
        let h = harness();
        let reply = h.orchestrator.handle("visitor", "book a meeting").await;
        let payload = reply.into_payload();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["type"], "scheduling");
        assert!(value["url"].as_str().is_some_and(|u| !u.is_empty()));
    }
}
