// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadflow serve` command implementation.
//!
//! Wires the collaborator clients, session store, intent classifier,
//! responder, and scheduling coordinator into the turn orchestrator, then
//! starts the gateway and the session-store sweep task.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use leadflow_agent::{Replies, TurnOrchestrator};
use leadflow_config::LeadflowConfig;
use leadflow_core::{CompletionProvider, KnowledgeIndex, LeadflowError};
use leadflow_gateway::{ContactRelay, GatewayState};
use leadflow_intent::IntentClassifier;
use leadflow_openai::OpenAiClient;
use leadflow_retrieval::{GroundedResponder, IndexClient};
use leadflow_scheduling::SchedulingCoordinator;
use leadflow_session::SessionStore;

/// Runs the `leadflow serve` command.
///
/// Initializes collaborator clients, builds the orchestrator, spawns the
/// session TTL sweeper, and serves the gateway until the process exits.
pub async fn run_serve(config: LeadflowConfig) -> Result<(), LeadflowError> {
    init_tracing(&config.agent.log_level);

    info!(agent = %config.agent.name, "starting leadflow serve");

    // Session store.
    let store = Arc::new(SessionStore::new(&config.session));

    // Completion provider.
    let provider: Arc<dyn CompletionProvider> = {
        let client = OpenAiClient::new(&config.openai).map_err(|e| {
            error!(error = %e, "failed to initialize completion provider");
            eprintln!(
                "error: OpenAI API key required. Set openai.api_key in leadflow.toml \
                 or the OPENAI_API_KEY environment variable."
            );
            e
        })?;
        Arc::new(client)
    };

    // Knowledge index.
    let index: Arc<dyn KnowledgeIndex> = {
        let client = IndexClient::new(&config.index).map_err(|e| {
            error!(error = %e, "failed to initialize knowledge index");
            eprintln!("error: index.url is required in leadflow.toml.");
            e
        })?;
        Arc::new(client)
    };

    if config.scheduling.webhook_url.is_none() {
        info!("no scheduling webhook configured; the static booking link will be used");
    }

    let classifier = IntentClassifier::new(provider.clone());
    let responder = GroundedResponder::new(
        index,
        provider,
        config.persona.clone(),
        &config.openai,
        &config.index,
    );
    let scheduler = SchedulingCoordinator::new(&config.scheduling)?;
    let replies = Replies::new(&config.persona);

    let orchestrator = Arc::new(TurnOrchestrator::new(
        store.clone(),
        classifier,
        responder,
        scheduler,
        replies,
        &config.session,
    ));

    // Contact relay (optional).
    let contact = match ContactRelay::from_config(&config.contact)? {
        Some(relay) => {
            info!("contact relay enabled");
            Some(Arc::new(relay))
        }
        None => {
            info!("contact relay disabled (no SMTP credentials configured)");
            None
        }
    };

    // Periodic sweep of expired sessions.
    let sweep_store = store.clone();
    let sweep_interval = Duration::from_secs(config.session.sweep_interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        interval.tick().await; // the first tick completes immediately
        loop {
            interval.tick().await;
            let purged = sweep_store.purge_expired();
            if purged > 0 {
                debug!(purged, "expired sessions swept");
            }
        }
    });

    let state = GatewayState {
        orchestrator,
        contact,
        company_name: config.persona.company_name.clone(),
        start_time: Instant::now(),
    };

    leadflow_gateway::start_server(&config.server, state).await
}

/// Initializes the tracing subscriber from the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
