// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Handles `GET /` (welcome) and `GET /health`.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::server::GatewayState;

/// Response body for `GET /`.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    /// Welcome message naming the API.
    pub message: String,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Process uptime in seconds.
    pub uptime_secs: u64,
}

/// GET /
///
/// Welcome message for uptime checks and the curious.
pub async fn get_root(State(state): State<GatewayState>) -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: format!("Welcome to the {} API", state.company_name),
    })
}

/// GET /health
///
/// Health status of the gateway.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_response_serializes() {
        let resp = WelcomeResponse {
            message: "Welcome to the Atrium AI API".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("Welcome to the Atrium AI API"));
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }
}
