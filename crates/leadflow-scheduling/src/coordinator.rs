// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduling coordinator: webhook-then-fallback link production.
//!
//! A detected booking intent becomes a POST to the external workflow
//! webhook with a bounded timeout. Any failure -- non-200, timeout,
//! malformed body, network error -- falls back deterministically to the
//! static booking link, so the scheduling path has no unrecoverable failure
//! mode from the visitor's perspective.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use leadflow_config::model::SchedulingConfig;
use leadflow_core::LeadflowError;

/// Link text shown for every booking link.
const LINK_TEXT: &str = "Book your consultation";

/// Message accompanying a webhook-produced link.
const INVITE_MESSAGE: &str =
    "I understand you're interested in our services. Here's a link to schedule a consultation:";

/// Message accompanying the static fallback link on the happy path.
const FALLBACK_MESSAGE: &str = "Great! Here's the link to schedule your consultation:";

/// Message accompanying the static fallback link when the webhook is down.
const TROUBLE_MESSAGE: &str = "I'm having trouble reaching our scheduling system, \
but you can book directly here:";

/// The scheduling reply envelope sent to the client.
///
/// Serialized as `{"type":"scheduling","message":...,"url":...,"linkText":...}`;
/// the consuming client distinguishes it from plain text by attempting a
/// JSON parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingReply {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub url: String,
    #[serde(rename = "linkText")]
    pub link_text: String,
}

impl SchedulingReply {
    fn new(message: &str, url: String) -> Self {
        Self {
            kind: "scheduling".to_string(),
            message: message.to_string(),
            url,
            link_text: LINK_TEXT.to_string(),
        }
    }

    /// Serializes the envelope for the wire. Falls back to a plain-text
    /// rendering in the (unreachable) event serialization fails.
    pub fn to_payload(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!("{} {}", self.message, self.url))
    }
}

/// Payload POSTed to the workflow webhook.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    session_id: &'a str,
    timestamp: String,
    action: &'static str,
    context: &'a [String],
}

/// Response expected from the workflow webhook.
#[derive(Debug, Deserialize)]
struct WebhookResponse {
    #[serde(default)]
    booking_url: Option<String>,
}

/// Turns booking intents into confirmed scheduling links.
///
/// Stateless after construction; shared across sessions behind an `Arc`.
pub struct SchedulingCoordinator {
    client: reqwest::Client,
    webhook_url: Option<String>,
    fallback_url: String,
}

impl SchedulingCoordinator {
    /// Creates a coordinator from configuration.
    pub fn new(config: &SchedulingConfig) -> Result<Self, LeadflowError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LeadflowError::Webhook {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            webhook_url: config.webhook_url.clone(),
            fallback_url: config.fallback_url.clone(),
        })
    }

    /// Produces a scheduling reply for the session.
    ///
    /// `context` carries the most recent turn contents for the workflow's
    /// benefit. This never fails: the worst case is the static fallback
    /// link. Webhook failures never lock out later attempts.
    pub async fn schedule(&self, session_id: &str, context: &[String]) -> SchedulingReply {
        let Some(webhook_url) = &self.webhook_url else {
            debug!(session_id, "no webhook configured, using fallback link");
            return SchedulingReply::new(FALLBACK_MESSAGE, self.fallback_url.clone());
        };

        match self.post_webhook(webhook_url, session_id, context).await {
            Ok(Some(booking_url)) => {
                debug!(session_id, "webhook produced booking link");
                SchedulingReply::new(INVITE_MESSAGE, booking_url)
            }
            Ok(None) => {
                debug!(session_id, "webhook response had no booking link, using fallback");
                SchedulingReply::new(FALLBACK_MESSAGE, self.fallback_url.clone())
            }
            Err(e) => {
                warn!(session_id, error = %e, "scheduling webhook failed, using fallback link");
                SchedulingReply::new(TROUBLE_MESSAGE, self.fallback_url.clone())
            }
        }
    }

    async fn post_webhook(
        &self,
        webhook_url: &str,
        session_id: &str,
        context: &[String],
    ) -> Result<Option<String>, LeadflowError> {
        let payload = WebhookPayload {
            session_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            action: "create_scheduling_link",
            context,
        };

        let response = self
            .client
            .post(webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LeadflowError::Webhook {
                message: format!("webhook POST failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LeadflowError::Webhook {
                message: format!("webhook returned {status}: {body}"),
                source: None,
            });
        }

        // A 200 with an unparseable or linkless body is not an error; the
        // fallback link covers it.
        let body: WebhookResponse = response.json().await.unwrap_or(WebhookResponse {
            booking_url: None,
        });
        Ok(body.booking_url)
    }
}
