// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned reply catalogue.
//!
//! Fixed informational and deflection texts, parameterized by the persona
//! config. Canned paths cost nothing and keep the high-traffic intents
//! (services, about, capacity, deflection) deterministic.

use leadflow_config::model::PersonaConfig;
use leadflow_session::Topic;

/// Builds the fixed reply texts from persona configuration.
#[derive(Debug, Clone)]
pub struct Replies {
    company_name: String,
    services_summary: String,
}

impl Replies {
    /// Creates the catalogue from persona configuration.
    pub fn new(persona: &PersonaConfig) -> Self {
        Self {
            company_name: persona.company_name.clone(),
            services_summary: persona.services_summary.clone(),
        }
    }

    /// First-turn greeting reply.
    pub fn greeting(&self) -> String {
        "Hello! What would you like to know about our AI solutions for businesses?".to_string()
    }

    /// Fixed reply once the per-session message ceiling is exceeded.
    pub fn capacity_exceeded(&self) -> String {
        "I apologize, but you've reached the maximum number of messages for this \
         session. Please schedule a consultation to discuss your needs in detail."
            .to_string()
    }

    /// Fixed services-list reply.
    pub fn services_overview(&self) -> String {
        format!(
            "We offer: {}. Which area interests you most?",
            self.services_summary
        )
    }

    /// Fixed about-the-company reply.
    pub fn about_site(&self) -> String {
        format!(
            "{} helps businesses implement AI solutions for growth and efficiency. \
             Which area interests you: Strategy, Analytics, or Automation?",
            self.company_name
        )
    }

    /// Reply to implementation questions: steer into a consultation.
    pub fn implementation_offer(&self) -> String {
        "I'd be happy to discuss implementation details. Would you like to schedule \
         a consultation to explore this further?"
            .to_string()
    }

    /// Reply to booking vocabulary once a booking is already confirmed.
    pub fn already_booked(&self) -> String {
        "I see you've already booked a consultation! Our team will be in touch soon. \
         Is there anything else you'd like to know about our services?"
            .to_string()
    }

    /// Reply to an explicit booking confirmation.
    pub fn booking_confirmed(&self) -> String {
        "Excellent! We look forward to speaking with you. In the meantime, feel free \
         to ask any other questions you might have."
            .to_string()
    }

    /// Gate reply when a consultation is warranted but services haven't
    /// been explained yet.
    pub fn services_gate(&self) -> String {
        "I'd be happy to discuss a consultation, but first let me explain our \
         services. What specific areas of AI interest you?"
            .to_string()
    }

    /// Off-topic deflection.
    pub fn off_topic(&self) -> String {
        "I specialize in AI solutions for businesses. What challenges is your \
         business facing?"
            .to_string()
    }

    /// Context-aware nudge for an acknowledgment outside a consultation
    /// offer, keyed by the last extracted topic.
    pub fn acknowledgment_nudge(&self, topic: Option<Topic>) -> String {
        match topic {
            Some(Topic::Analytics) => {
                "Would you like to discuss how our data analytics solutions can \
                 improve your decision-making process?"
                    .to_string()
            }
            Some(Topic::Strategy) => {
                "Would you like to explore how an AI strategy could benefit your \
                 business?"
                    .to_string()
            }
            Some(Topic::Automation) => {
                "Would you like to discuss which processes in your business we \
                 could help automate?"
                    .to_string()
            }
            Some(Topic::Implementation) => self.implementation_offer(),
            Some(Topic::BusinessInquiry) | Some(Topic::ServiceInterest) | None => {
                "Could you tell me more about your specific business needs?".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replies() -> Replies {
        Replies::new(&PersonaConfig::default())
    }

    #[test]
    fn services_overview_lists_configured_services() {
        let persona = PersonaConfig {
            services_summary: "Forecasting and Tooling".to_string(),
            ..PersonaConfig::default()
        };
        let replies = Replies::new(&persona);
        assert!(replies.services_overview().contains("Forecasting and Tooling"));
    }

    #[test]
    fn about_site_names_the_company() {
        assert!(replies().about_site().contains("Atrium AI"));
    }

    #[test]
    fn nudges_are_topic_specific() {
        let replies = replies();
        assert!(replies
            .acknowledgment_nudge(Some(Topic::Analytics))
            .contains("analytics"));
        assert!(replies
            .acknowledgment_nudge(Some(Topic::Automation))
            .contains("automate"));
        assert!(replies
            .acknowledgment_nudge(Some(Topic::Strategy))
            .contains("strategy"));
        assert!(replies
            .acknowledgment_nudge(None)
            .contains("business needs"));
    }

    #[test]
    fn implementation_nudge_invites_consultation() {
        // The nudge must read as a consultation invite so an affirmative
        // next turn routes into scheduling.
        let text = replies().acknowledgment_nudge(Some(Topic::Implementation));
        assert!(text.contains("consultation"));
    }
}
