// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, CORS, and shared state:
//! - `GET /` welcome
//! - `GET /health` status
//! - `GET /ws/{session_id}` chat WebSocket
//! - `POST /contact` contact-form relay

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use leadflow_agent::TurnOrchestrator;
use leadflow_config::model::ServerConfig;
use leadflow_core::LeadflowError;

use crate::contact::{self, ContactRelay};
use crate::handlers;
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Turn orchestrator handling every chat message.
    pub orchestrator: Arc<TurnOrchestrator>,
    /// Contact-form relay; `None` disables `POST /contact`.
    pub contact: Option<Arc<ContactRelay>>,
    /// Company name for the welcome message.
    pub company_name: String,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

/// Builds the gateway router with CORS from the configured allow-list.
///
/// An empty allow-list means permissive CORS (development mode).
pub fn build_router(state: GatewayState, cors_origins: &[String]) -> Result<Router, LeadflowError> {
    let cors = if cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins = cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| {
                    LeadflowError::Config(format!("invalid CORS origin `{origin}`: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Ok(Router::new()
        .route("/", get(handlers::get_root))
        .route("/health", get(handlers::get_health))
        .route("/ws/{session_id}", get(ws::ws_handler))
        .route("/contact", post(contact::post_contact))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Starts the gateway server and serves until the process exits.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
) -> Result<(), LeadflowError> {
    let app = build_router(state, &config.cors_origins)?;

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LeadflowError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| LeadflowError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_agent::Replies;
    use leadflow_config::model::{
        IndexConfig, OpenAiConfig, PersonaConfig, SchedulingConfig, SessionConfig,
    };
    use leadflow_intent::IntentClassifier;
    use leadflow_retrieval::GroundedResponder;
    use leadflow_scheduling::SchedulingCoordinator;
    use leadflow_session::SessionStore;
    use leadflow_test_utils::{MockIndex, MockProvider};

    fn test_state() -> GatewayState {
        let session_config = SessionConfig::default();
        let store = Arc::new(SessionStore::new(&session_config));
        let provider = Arc::new(MockProvider::new());
        let index = Arc::new(MockIndex::new());
        let responder = GroundedResponder::new(
            index,
            provider.clone(),
            PersonaConfig::default(),
            &OpenAiConfig::default(),
            &IndexConfig::default(),
        );
        let scheduler = SchedulingCoordinator::new(&SchedulingConfig::default()).unwrap();
        let orchestrator = Arc::new(TurnOrchestrator::new(
            store,
            IntentClassifier::new(provider),
            responder,
            scheduler,
            Replies::new(&PersonaConfig::default()),
            &session_config,
        ));

        GatewayState {
            orchestrator,
            contact: None,
            company_name: "Atrium AI".to_string(),
            start_time: Instant::now(),
        }
    }

    #[tokio::test]
    async fn router_builds_with_permissive_cors() {
        let router = build_router(test_state(), &[]);
        assert!(router.is_ok());
    }

    #[tokio::test]
    async fn router_builds_with_origin_allow_list() {
        let origins = vec![
            "https://example.com".to_string(),
            "http://localhost:5173".to_string(),
        ];
        let router = build_router(test_state(), &origins);
        assert!(router.is_ok());
    }

    #[tokio::test]
    async fn invalid_cors_origin_is_config_error() {
        let origins = vec!["not a header\nvalue".to_string()];
        let result = build_router(test_state(), &origins);
        assert!(matches!(result, Err(LeadflowError::Config(_))));
    }

    #[test]
    fn gateway_state_is_clone() {
        let state = test_state();
        let _cloned = state.clone();
    }
}
