// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the hosted similarity-search service.
//!
//! The service owns both embedding and vector search; queries are raw text.
//! The underlying HTTP client is initialized lazily and idempotently on
//! first query, so constructing the index never touches the network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::debug;

use leadflow_config::model::IndexConfig;
use leadflow_core::types::Passage;
use leadflow_core::{KnowledgeIndex, LeadflowError};

/// Request body for `POST {base}/query`.
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    top_k: usize,
    namespace: &'a str,
}

/// Response body for `POST {base}/query`.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}

/// One similarity match.
#[derive(Debug, Deserialize)]
struct IndexMatch {
    text: String,
    #[serde(default)]
    score: f32,
}

/// Client for the hosted knowledge index.
pub struct IndexClient {
    base_url: String,
    api_key: Option<String>,
    namespace: String,
    timeout: Duration,
    http: OnceCell<reqwest::Client>,
}

impl IndexClient {
    /// Creates a client from configuration. Requires `index.url` to be set.
    pub fn new(config: &IndexConfig) -> Result<Self, LeadflowError> {
        let base_url = config
            .url
            .as_deref()
            .ok_or_else(|| LeadflowError::Config("index.url is required".to_string()))?
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            base_url,
            api_key: config.api_key.clone(),
            namespace: config.namespace.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            http: OnceCell::new(),
        })
    }

    /// Lazily builds the HTTP client. Idempotent: concurrent first queries
    /// share one initialization.
    async fn http(&self) -> Result<&reqwest::Client, LeadflowError> {
        self.http
            .get_or_try_init(|| async {
                let mut headers = HeaderMap::new();
                if let Some(key) = &self.api_key {
                    let mut auth = HeaderValue::from_str(&format!("Bearer {key}")).map_err(
                        |e| LeadflowError::Config(format!("invalid index API key: {e}")),
                    )?;
                    auth.set_sensitive(true);
                    headers.insert("authorization", auth);
                }
                reqwest::Client::builder()
                    .default_headers(headers)
                    .timeout(self.timeout)
                    .build()
                    .map_err(|e| LeadflowError::Index {
                        message: format!("failed to build HTTP client: {e}"),
                        source: Some(Box::new(e)),
                    })
            })
            .await
    }
}

#[async_trait]
impl KnowledgeIndex for IndexClient {
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<Passage>, LeadflowError> {
        let client = self.http().await?;
        let url = format!("{}/query", self.base_url);

        let response = client
            .post(&url)
            .json(&QueryRequest {
                query,
                top_k: k,
                namespace: &self.namespace,
            })
            .send()
            .await
            .map_err(|e| LeadflowError::Index {
                message: format!("similarity query failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LeadflowError::Index {
                message: format!("index returned {status}: {body}"),
                source: None,
            });
        }

        let body: QueryResponse =
            response.json().await.map_err(|e| LeadflowError::Index {
                message: format!("failed to parse index response: {e}"),
                source: Some(Box::new(e)),
            })?;

        debug!(count = body.matches.len(), "similarity query returned");

        Ok(body
            .matches
            .into_iter()
            .take(k)
            .map(|m| Passage {
                text: m.text,
                score: m.score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(url: &str) -> IndexConfig {
        IndexConfig {
            url: Some(url.to_string()),
            namespace: "kb".to_string(),
            ..IndexConfig::default()
        }
    }

    #[tokio::test]
    async fn missing_url_is_config_error() {
        let result = IndexClient::new(&IndexConfig::default());
        assert!(matches!(result, Err(LeadflowError::Config(_))));
    }

    #[tokio::test]
    async fn query_returns_passages_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/query"))
            .and(body_partial_json(serde_json::json!({
                "query": "automation help",
                "top_k": 3,
                "namespace": "kb"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "matches": [
                    {"text": "We automate back-office workflows.", "score": 0.91},
                    {"text": "Case study: invoicing automation.", "score": 0.84}
                ]
            })))
            .mount(&server)
            .await;

        let client = IndexClient::new(&test_config(&server.uri())).unwrap();
        let passages = client.similarity_search("automation help", 3).await.unwrap();

        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].text, "We automate back-office workflows.");
        assert!(passages[0].score > passages[1].score);
    }

    #[tokio::test]
    async fn oversized_response_capped_at_k() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "matches": [
                    {"text": "one", "score": 0.9},
                    {"text": "two", "score": 0.8},
                    {"text": "three", "score": 0.7}
                ]
            })))
            .mount(&server)
            .await;

        let client = IndexClient::new(&test_config(&server.uri())).unwrap();
        let passages = client.similarity_search("q", 2).await.unwrap();
        assert_eq!(passages.len(), 2);
    }

    #[tokio::test]
    async fn non_200_is_index_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = IndexClient::new(&test_config(&server.uri())).unwrap();
        let err = client.similarity_search("q", 3).await.unwrap_err();
        assert!(matches!(err, LeadflowError::Index { .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_index_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = IndexClient::new(&test_config(&server.uri())).unwrap();
        let err = client.similarity_search("q", 3).await.unwrap_err();
        assert!(matches!(err, LeadflowError::Index { .. }));
    }

    #[tokio::test]
    async fn empty_matches_field_defaults() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = IndexClient::new(&test_config(&server.uri())).unwrap();
        let passages = client.similarity_search("q", 3).await.unwrap();
        assert!(passages.is_empty());
    }
}
