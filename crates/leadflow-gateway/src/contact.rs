// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact-form relay: accepts `{name, email, message}` and forwards it by
//! SMTP. Pure glue, no state; failures are logged and answered with a
//! generic error status, never raw error text.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use leadflow_config::model::ContactConfig;
use leadflow_core::LeadflowError;

use crate::server::GatewayState;

/// Request body for `POST /contact`.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Response body for `POST /contact`.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub status: String,
}

/// SMTP relay for contact-form submissions.
pub struct ContactRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    recipient: Mailbox,
}

impl ContactRelay {
    /// Builds a relay when the config carries complete credentials;
    /// `Ok(None)` means the contact form is disabled.
    pub fn from_config(config: &ContactConfig) -> Result<Option<Self>, LeadflowError> {
        let (Some(username), Some(password), Some(recipient)) =
            (&config.username, &config.password, &config.recipient)
        else {
            return Ok(None);
        };

        let from: Mailbox = username
            .parse()
            .map_err(|e| LeadflowError::Config(format!("contact.username is not an address: {e}")))?;
        let recipient: Mailbox = recipient
            .parse()
            .map_err(|e| LeadflowError::Config(format!("contact.recipient is not an address: {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| LeadflowError::Channel {
                message: format!("failed to build SMTP transport: {e}"),
                source: Some(Box::new(e)),
            })?
            .port(config.smtp_port)
            .credentials(Credentials::new(username.clone(), password.clone()))
            .build();

        Ok(Some(Self {
            transport,
            from,
            recipient,
        }))
    }

    /// Relays one submission.
    pub async fn send(&self, form: &ContactForm) -> Result<(), LeadflowError> {
        let body = format!(
            "New contact form submission:\n\nName: {}\nEmail: {}\nMessage: {}\n",
            form.name, form.email, form.message
        );

        let email = lettre::Message::builder()
            .from(self.from.clone())
            .to(self.recipient.clone())
            .subject(format!("New contact form submission from {}", form.name))
            .body(body)
            .map_err(|e| LeadflowError::Channel {
                message: format!("failed to build contact email: {e}"),
                source: Some(Box::new(e)),
            })?;

        self.transport
            .send(email)
            .await
            .map_err(|e| LeadflowError::Channel {
                message: format!("failed to send contact email: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(())
    }
}

/// POST /contact
///
/// Relays the submission via SMTP. The visitor only ever sees a generic
/// success or error status.
pub async fn post_contact(
    State(state): State<GatewayState>,
    Json(form): Json<ContactForm>,
) -> impl IntoResponse {
    let Some(relay) = &state.contact else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ContactResponse {
                status: "error".to_string(),
            }),
        );
    };

    match relay.send(&form).await {
        Ok(()) => {
            info!(name = %form.name, "contact form relayed");
            (
                StatusCode::OK,
                Json(ContactResponse {
                    status: "success".to_string(),
                }),
            )
        }
        Err(e) => {
            warn!(error = %e, "contact form relay failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ContactResponse {
                    status: "error".to_string(),
                }),
            )
        }
    }
}
