// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Leadflow agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Leadflow configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LeadflowConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP/WebSocket server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat-completion provider settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Knowledge index (hosted similarity search) settings.
    #[serde(default)]
    pub index: IndexConfig,

    /// Session store and conversation window settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Scheduling webhook and fallback link settings.
    #[serde(default)]
    pub scheduling: SchedulingConfig,

    /// Persona text used for canned replies and the system prompt.
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Contact-form SMTP relay settings.
    #[serde(default)]
    pub contact: ContactConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "leadflow".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP/WebSocket server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allow-list. Empty means permissive (development mode).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Chat-completion provider configuration (OpenAI-compatible API).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` requires the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL (up to and excluding `/chat/completions`).
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model used for grounded replies.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Cheaper model used for single-token classification checks.
    #[serde(default = "default_classifier_model")]
    pub classifier_model: String,

    /// Sampling temperature for grounded replies.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per grounded reply. Kept small: replies are capped
    /// at 1-3 sentences by the persona prompt.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            chat_model: default_chat_model(),
            classifier_model: default_classifier_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_completion_timeout(),
        }
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

fn default_classifier_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    100
}

fn default_completion_timeout() -> u64 {
    30
}

/// Knowledge index configuration.
///
/// The index is a hosted service that owns both embedding and similarity
/// search; queries are raw text.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Index service base URL. Required to serve; retrieval has no
    /// local substitute.
    #[serde(default)]
    pub url: Option<String>,

    /// Optional API key sent as a bearer token.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Index namespace.
    #[serde(default)]
    pub namespace: String,

    /// Passages retrieved per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Query timeout in seconds.
    #[serde(default = "default_index_timeout")]
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            namespace: String::new(),
            top_k: default_top_k(),
            timeout_secs: default_index_timeout(),
        }
    }
}

fn default_top_k() -> usize {
    3
}

fn default_index_timeout() -> u64 {
    10
}

/// Session store and conversation window configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Idle time before a session expires from the store, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum turns retained per session.
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,

    /// Turns of history included in completion prompts.
    #[serde(default = "default_prompt_history")]
    pub prompt_history: usize,

    /// Hard per-session message ceiling; beyond it every turn returns the
    /// fixed capacity reply with no collaborator calls.
    #[serde(default = "default_message_ceiling")]
    pub message_ceiling: u32,

    /// Interval between expired-session sweeps, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            history_cap: default_history_cap(),
            prompt_history: default_prompt_history(),
            message_ceiling: default_message_ceiling(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    86_400
}

fn default_history_cap() -> usize {
    50
}

fn default_prompt_history() -> usize {
    3
}

fn default_message_ceiling() -> u32 {
    50
}

fn default_sweep_interval() -> u64 {
    300
}

/// Scheduling webhook and fallback link configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulingConfig {
    /// Outbound workflow webhook URL. `None` goes straight to the fallback
    /// booking link.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Static booking link used whenever the webhook cannot produce one.
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,

    /// Webhook POST timeout in seconds.
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            fallback_url: default_fallback_url(),
            timeout_secs: default_webhook_timeout(),
        }
    }
}

fn default_fallback_url() -> String {
    "https://calendly.com/d/cqvb-cvn-6gc/15-minute-meeting".to_string()
}

fn default_webhook_timeout() -> u64 {
    10
}

/// Persona text configuration.
///
/// These strings feed the canned replies and the grounded-reply system
/// prompt; override them to rebrand the agent without touching code.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PersonaConfig {
    /// Company name woven into replies.
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// One-line services summary used by the services-overview reply.
    #[serde(default = "default_services_summary")]
    pub services_summary: String,

    /// Full override for the grounded-reply system prompt. When set, the
    /// built-in lead-generation persona is replaced wholesale.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            services_summary: default_services_summary(),
            system_prompt: None,
        }
    }
}

fn default_company_name() -> String {
    "Atrium AI".to_string()
}

fn default_services_summary() -> String {
    "AI Strategy, Data Analytics, Process Automation, and Chatbot Development".to_string()
}

/// Contact-form SMTP relay configuration.
///
/// The relay is enabled only when `username`, `password`, and `recipient`
/// are all set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContactConfig {
    /// SMTP server hostname.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP submission port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username (also the From address).
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password.
    #[serde(default)]
    pub password: Option<String>,

    /// Address that receives contact-form submissions.
    #[serde(default)]
    pub recipient: Option<String>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            recipient: None,
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}
