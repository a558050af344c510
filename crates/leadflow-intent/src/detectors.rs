// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-vocabulary intent detectors.
//!
//! Zero-cost keyword heuristics: no model call, no network, no latency.
//! Single-word cues match on word boundaries; multi-word cues match as
//! substrings. These are both the first line of classification and the
//! fallback when the model-backed checks are unavailable.

use leadflow_session::Topic;

/// Greeting forms checked on the first turn of a session (prefix match).
const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "greetings",
];

/// Affirmation vocabulary for acknowledgment detection.
const AFFIRMATIONS: &[&str] = &[
    "yes",
    "yeah",
    "yah",
    "yep",
    "sure",
    "ok",
    "okay",
    "please",
    "absolutely",
    "definitely",
    "interested",
    "perfect",
    "great",
    "sounds good",
    "that works",
    "good idea",
    "why not",
    "go ahead",
    "let's do it",
    "i would",
];

/// Direct booking vocabulary. Highest routing priority on every turn.
const SCHEDULING_REQUESTS: &[&str] = &[
    "book",
    "booking",
    "schedule",
    "consultation",
    "meet",
    "meeting",
    "appointment",
    "discuss",
    "call",
    "talk to someone",
    "talk with someone",
];

/// Consultation-inviting language scanned in the previous assistant turn.
const CONSULTATION_INVITES: &[&str] = &[
    "consultation",
    "discuss",
    "explore",
    "interested",
    "meeting",
    "schedule",
    "book",
    "would you be interested",
    "talk more",
];

/// Implementation-question cues.
const IMPLEMENTATION_TRIGGERS: &[&str] = &[
    "implement",
    "integrate",
    "setup",
    "configure",
    "install",
    "how can i",
    "how do i",
    "set up",
    "begin with",
];

/// Explicit booking-confirmation vocabulary. Past tense only: imperative
/// forms ("book it") belong to the scheduling-request detector.
const BOOKING_CONFIRMATIONS: &[&str] = &[
    "booked",
    "scheduled",
    "made an appointment",
    "booked it",
];

/// Business-context cues that mark a visitor as describing a real need.
const BUSINESS_CONTEXT: &[&str] = &[
    "my business",
    "our company",
    "my company",
    "our team",
    "my startup",
    "we need",
    "looking for",
];

/// Informational intent: questions about the site/company itself.
const ABOUT_SITE: &[&str] = &[
    "about this site",
    "about your site",
    "what is this site",
    "about your company",
    "tell me about",
];

/// Informational intent: questions about the service catalogue.
const SERVICES_INQUIRY: &[&str] = &[
    "what services",
    "kind of services",
    "which services",
    "services do you offer",
];

/// Narrow deny-list of clearly unrelated personal topics. Everything not
/// matched here is treated as relevant: the filter exists to catch obvious
/// off-topic chatter, not to gatekeep potential leads.
const OFF_TOPIC: &[&str] = &[
    "dating",
    "girlfriend",
    "boyfriend",
    "gambling",
    "betting",
    "casino",
    "diagnosis",
    "prescription",
    "medical advice",
    "netflix",
    "movie",
    "movies",
    "tv show",
    "weather",
    "restaurant",
    "recipe",
    "vacation",
    "tourism",
    "travel recommendation",
    "football",
    "basketball",
    "sports",
];

/// Matches a cue list against a message: word-boundary match for single
/// words, substring match for phrases.
fn matches_any(lower: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| {
        if cue.contains(' ') {
            lower.contains(cue)
        } else {
            lower
                .split(|c: char| !c.is_alphanumeric() && c != '\'')
                .any(|word| word == *cue)
        }
    })
}

/// True when the message opens with a greeting form. The prefix must end
/// at a word boundary: "hi there" matches, "highly recommend" must not.
pub fn is_greeting(message: &str) -> bool {
    let lower = message.trim().to_lowercase();
    GREETINGS.iter().any(|g| {
        lower == *g
            || lower
                .strip_prefix(g)
                .is_some_and(|rest| rest.starts_with([' ', ',', '!', '.', '?']))
    })
}

/// True when the message matches the affirmation vocabulary.
///
/// An acknowledgment is a short utterance; anything longer than a few words
/// is a substantive message and goes to the model-backed check instead.
pub fn is_affirmation(message: &str) -> bool {
    if message.split_whitespace().count() > 6 {
        return false;
    }
    matches_any(&message.to_lowercase(), AFFIRMATIONS)
}

/// True when the message contains explicit booking vocabulary.
pub fn requests_scheduling(message: &str) -> bool {
    matches_any(&message.to_lowercase(), SCHEDULING_REQUESTS)
}

/// True when an assistant turn contains consultation-inviting language.
pub fn invites_consultation(assistant_text: &str) -> bool {
    matches_any(&assistant_text.to_lowercase(), CONSULTATION_INVITES)
}

/// True when the message asks for implementation specifics.
pub fn asks_implementation(message: &str) -> bool {
    matches_any(&message.to_lowercase(), IMPLEMENTATION_TRIGGERS)
}

/// True when the message explicitly confirms a completed booking.
pub fn confirms_booking(message: &str) -> bool {
    matches_any(&message.to_lowercase(), BOOKING_CONFIRMATIONS)
}

/// True when the message describes a business context or need.
pub fn mentions_business_context(message: &str) -> bool {
    matches_any(&message.to_lowercase(), BUSINESS_CONTEXT)
}

/// True when the message asks about the site or company itself.
pub fn asks_about_site(message: &str) -> bool {
    matches_any(&message.to_lowercase(), ABOUT_SITE)
}

/// True when the message asks for the service catalogue.
pub fn asks_services(message: &str) -> bool {
    matches_any(&message.to_lowercase(), SERVICES_INQUIRY)
}

/// True when the message hits the off-topic deny-list.
pub fn hits_deny_list(message: &str) -> bool {
    matches_any(&message.to_lowercase(), OFF_TOPIC)
}

/// Coarse topic extraction over the fixed service-topic set.
pub fn extract_topic(message: &str) -> Option<Topic> {
    let lower = message.to_lowercase();

    if matches_any(&lower, IMPLEMENTATION_TRIGGERS) {
        return Some(Topic::Implementation);
    }
    if matches_any(&lower, &["strategy", "roadmap"]) {
        return Some(Topic::Strategy);
    }
    if matches_any(&lower, &["analytics", "data analysis", "dashboards"]) {
        return Some(Topic::Analytics);
    }
    if matches_any(&lower, &["automation", "automate", "workflow"]) {
        return Some(Topic::Automation);
    }
    if matches_any(&lower, BUSINESS_CONTEXT) {
        return Some(Topic::BusinessInquiry);
    }
    if matches_any(&lower, &["service", "services", "offering", "offerings"]) {
        return Some(Topic::ServiceInterest);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greetings_match_prefixes() {
        assert!(is_greeting("hi"));
        assert!(is_greeting("Hello there, how are you?"));
        assert!(is_greeting("good morning!"));
        assert!(!is_greeting("what do you sell?"));
        // Prefix must end at a word boundary.
        assert!(!is_greeting("highly recommend automation"));
    }

    #[test]
    fn affirmations_match_words_not_fragments() {
        assert!(is_affirmation("yes"));
        assert!(is_affirmation("ok, sounds good"));
        assert!(is_affirmation("let's do it"));
        // "okay" inside another word must not fire.
        assert!(!is_affirmation("I'm skeptical"));
        assert!(!is_affirmation("what does it cost?"));
    }

    #[test]
    fn long_sentences_are_not_affirmations() {
        // "great" appears, but this is a substantive message, not an
        // acknowledgment.
        assert!(!is_affirmation(
            "that's great but I'd first like to understand your analytics offering in detail"
        ));
    }

    #[test]
    fn scheduling_requests_need_word_boundaries() {
        assert!(requests_scheduling("can I book a meeting?"));
        assert!(requests_scheduling("I'd like to schedule a consultation"));
        assert!(requests_scheduling("can I talk to someone?"));
        // "call" must not match inside "technically" or "locally".
        assert!(!requests_scheduling("technically that works locally"));
    }

    #[test]
    fn consultation_invites_detected_in_assistant_text() {
        assert!(invites_consultation(
            "Would you like to schedule a consultation to discuss this?"
        ));
        assert!(invites_consultation("Happy to talk more about your needs."));
        assert!(!invites_consultation("We offer analytics and automation."));
    }

    #[test]
    fn implementation_questions_detected() {
        assert!(asks_implementation("how do I integrate this with our CRM?"));
        assert!(asks_implementation("how can i set up a chatbot?"));
        assert!(!asks_implementation("what results have clients seen?"));
    }

    #[test]
    fn booking_confirmations_detected() {
        assert!(confirms_booking("I just booked it"));
        assert!(confirms_booking("scheduled for Tuesday"));
        assert!(!confirms_booking("can I book next week?"));
        assert!(!confirms_booking("thinking about it"));
    }

    #[test]
    fn deny_list_catches_clearly_off_topic() {
        assert!(hits_deny_list("any good restaurant nearby?"));
        assert!(hits_deny_list("what's the weather today"));
        assert!(hits_deny_list("best netflix movies?"));
        // Ambiguous or generic input stays relevant.
        assert!(!hits_deny_list("how do businesses use this?"));
        assert!(!hits_deny_list("hmm, interesting"));
    }

    #[test]
    fn topic_extraction_is_coarse() {
        assert_eq!(extract_topic("we want an AI strategy"), Some(Topic::Strategy));
        assert_eq!(
            extract_topic("help with data analysis and analytics"),
            Some(Topic::Analytics)
        );
        assert_eq!(
            extract_topic("can you automate our invoicing?"),
            Some(Topic::Automation)
        );
        assert_eq!(
            extract_topic("how do i implement this"),
            Some(Topic::Implementation)
        );
        assert_eq!(
            extract_topic("our company needs help"),
            Some(Topic::BusinessInquiry)
        );
        assert_eq!(
            extract_topic("what services do you have"),
            Some(Topic::ServiceInterest)
        );
        assert_eq!(extract_topic("thanks!"), None);
    }

    #[test]
    fn business_context_detected() {
        assert!(mentions_business_context("my business is growing fast"));
        assert!(mentions_business_context("we need better tooling"));
        assert!(!mentions_business_context("neat demo"));
    }

    #[test]
    fn informational_intents_detected() {
        assert!(asks_about_site("tell me about this site"));
        assert!(asks_about_site("what is this site for?"));
        assert!(asks_services("what services do you offer?"));
        assert!(asks_services("which services are available"));
        assert!(!asks_services("how much does it cost?"));
    }
}
