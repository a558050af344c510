// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an OpenAI-compatible chat-completions API.
//!
//! Provides [`OpenAiClient`] which handles request construction, bearer
//! authentication, bounded timeouts, and transient error retry. Implements
//! the [`CompletionProvider`] seam for the rest of the workspace.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use leadflow_config::model::OpenAiConfig;
use leadflow_core::types::{CompletionRequest, CompletionResponse, Role, TokenUsage};
use leadflow_core::{CompletionProvider, LeadflowError};

use crate::types::{ApiErrorResponse, ApiMessage, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for chat-completion API communication.
///
/// Manages authentication headers, connection pooling, and retry logic for
/// transient errors (429, 5xx). Stateless after construction and safely
/// shared across sessions.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    classifier_model: String,
    max_retries: u32,
}

impl OpenAiClient {
    /// Creates a client from configuration.
    ///
    /// The API key comes from config or the `OPENAI_API_KEY` environment
    /// variable; absence of both is a configuration error.
    pub fn new(config: &OpenAiConfig) -> Result<Self, LeadflowError> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                LeadflowError::Config(
                    "OpenAI API key required: set openai.api_key or OPENAI_API_KEY".to_string(),
                )
            })?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| LeadflowError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LeadflowError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            classifier_model: config.classifier_model.clone(),
            max_retries: 1,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Sends a chat-completion request, retrying once on transient errors.
    async fn send_chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LeadflowError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| LeadflowError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| LeadflowError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| LeadflowError::Provider {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(LeadflowError::Provider {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let error_msg = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "API error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(LeadflowError::Provider {
                message: error_msg,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| LeadflowError::Provider {
            message: "completion request failed after retries".into(),
            source: None,
        }))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, LeadflowError> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(ApiMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|m| ApiMessage {
            role: match m.role {
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: m.content.clone(),
        }));

        let api_request = ChatCompletionRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self.send_chat(&api_request).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LeadflowError::Provider {
                message: "API response contained no choices".into(),
                source: None,
            })?;

        Ok(CompletionResponse {
            content: choice.message.content.trim().to_string(),
            model: response.model,
            usage: response
                .usage
                .map(|u| TokenUsage {
                    prompt_tokens: u.prompt_tokens,
                    completion_tokens: u.completion_tokens,
                })
                .unwrap_or_default(),
        })
    }

    /// Single-token binary classification against the cheaper classifier
    /// model: temperature 0, max_tokens 1, `Y` means yes.
    async fn classify_yes_no(
        &self,
        instructions: &str,
        message: &str,
    ) -> Result<bool, LeadflowError> {
        let api_request = ChatCompletionRequest {
            model: self.classifier_model.clone(),
            messages: vec![
                ApiMessage {
                    role: "system".to_string(),
                    content: instructions.to_string(),
                },
                ApiMessage {
                    role: "user".to_string(),
                    content: message.to_string(),
                },
            ],
            max_tokens: 1,
            temperature: 0.0,
        };

        let response = self.send_chat(&api_request).await?;
        let answer = response
            .choices
            .first()
            .map(|c| c.message.content.trim().to_uppercase())
            .unwrap_or_default();
        Ok(answer == "Y")
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth
/// retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_core::types::ChatMessage;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenAiClient {
        let config = OpenAiConfig {
            api_key: Some("test-api-key".into()),
            ..OpenAiConfig::default()
        };
        OpenAiClient::new(&config)
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn test_request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4".into(),
            system: Some("You are a helpful consultant.".into()),
            messages: vec![ChatMessage {
                role: Role::User,
                content: "Hello".into(),
            }],
            max_tokens: 100,
            temperature: 0.7,
        }
    }

    fn success_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "model": "gpt-4",
            "choices": [{
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
        })
    }

    #[tokio::test]
    async fn complete_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Hi there!")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(test_request()).await.unwrap();

        assert_eq!(result.content, "Hi there!");
        assert_eq!(result.usage.prompt_tokens, 12);
        assert_eq!(result.usage.completion_tokens, 7);
    }

    #[tokio::test]
    async fn complete_prepends_system_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "messages": [
                    {"role": "system", "content": "You are a helpful consultant."},
                    {"role": "user", "content": "Hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(test_request()).await;
        assert!(result.is_ok(), "system message should lead: {result:?}");
    }

    #[tokio::test]
    async fn complete_retries_on_429() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"message": "Rate limited", "type": "rate_limit_error"}
        });

        // First request returns 429, second returns 200.
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(&error_body))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("After retry")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(test_request()).await.unwrap();
        assert_eq!(result.content, "After retry");
    }

    #[tokio::test]
    async fn complete_fails_on_400_without_retry() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"message": "Bad model", "type": "invalid_request_error"}
        });

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(&error_body))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete(test_request()).await.unwrap_err();
        assert!(err.to_string().contains("invalid_request_error"), "got: {err}");
    }

    #[tokio::test]
    async fn complete_exhausts_retries_on_503() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"message": "Service overloaded", "type": "server_error"}
        });

        // Both attempts return 503.
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_json(&error_body))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(test_request()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn classify_yes_no_uses_classifier_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 1,
                "temperature": 0.0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-clf",
                "model": "gpt-3.5-turbo",
                "choices": [{"message": {"role": "assistant", "content": "Y"}}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let verdict = client
            .classify_yes_no("Is this a greeting?", "hi there")
            .await
            .unwrap();
        assert!(verdict);
    }

    #[tokio::test]
    async fn classify_yes_no_treats_anything_but_y_as_no() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-clf",
                "model": "gpt-3.5-turbo",
                "choices": [{"message": {"role": "assistant", "content": "n"}}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let verdict = client.classify_yes_no("Is this relevant?", "weather").await.unwrap();
        assert!(!verdict);
    }

    #[tokio::test]
    async fn missing_api_key_is_config_error() {
        // Guard: only meaningful when the ambient variable is absent.
        if std::env::var("OPENAI_API_KEY").is_ok() {
            return;
        }
        let config = OpenAiConfig::default();
        let result = OpenAiClient::new(&config);
        assert!(matches!(result, Err(LeadflowError::Config(_))));
    }

    #[tokio::test]
    async fn empty_choices_is_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-empty",
                "model": "gpt-4",
                "choices": []
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete(test_request()).await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
