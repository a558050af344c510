// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, positive timeouts, and sane
//! conversation windows.

use crate::diagnostic::ConfigError;
use crate::model::LeadflowConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LeadflowConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate host is not empty and looks like an IP or hostname.
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    // Timeouts must be positive -- a zero timeout would block turns forever
    // or fail every external call immediately.
    for (key, value) in [
        ("openai.timeout_secs", config.openai.timeout_secs),
        ("index.timeout_secs", config.index.timeout_secs),
        ("scheduling.timeout_secs", config.scheduling.timeout_secs),
        ("session.ttl_secs", config.session.ttl_secs),
        ("session.sweep_interval_secs", config.session.sweep_interval_secs),
    ] {
        if value == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be positive, got 0"),
            });
        }
    }

    if config.session.message_ceiling == 0 {
        errors.push(ConfigError::Validation {
            message: "session.message_ceiling must be positive, got 0".to_string(),
        });
    }

    if config.session.history_cap == 0 {
        errors.push(ConfigError::Validation {
            message: "session.history_cap must be positive, got 0".to_string(),
        });
    }

    if config.session.prompt_history > config.session.history_cap {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.prompt_history ({}) must not exceed session.history_cap ({})",
                config.session.prompt_history, config.session.history_cap
            ),
        });
    }

    if config.index.top_k == 0 || config.index.top_k > 10 {
        errors.push(ConfigError::Validation {
            message: format!(
                "index.top_k must be between 1 and 10, got {}",
                config.index.top_k
            ),
        });
    }

    if !(0.0..=2.0).contains(&config.openai.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "openai.temperature must be between 0.0 and 2.0, got {}",
                config.openai.temperature
            ),
        });
    }

    if config.scheduling.fallback_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "scheduling.fallback_url must not be empty".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
