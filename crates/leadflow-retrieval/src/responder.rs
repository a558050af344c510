// SPDX-FileCopyrightText: 2026 Leadflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval-augmented responder.
//!
//! Combines retrieved knowledge-base passages, recent session history, and
//! the lead-generation persona into one completion request. Infallible by
//! contract: any collaborator failure is logged and mapped to a fixed
//! apologetic fallback; turn persistence stays with the orchestrator.

use std::sync::Arc;

use tracing::warn;

use leadflow_config::model::{IndexConfig, OpenAiConfig, PersonaConfig};
use leadflow_core::types::{ChatMessage, CompletionRequest, Passage, Turn};
use leadflow_core::{CompletionProvider, KnowledgeIndex};

/// Fallback reply when retrieval or completion fails.
const FALLBACK: &str = "I apologize, but I'm having trouble right now. \
Could you tell me more about what you're looking to achieve?";

/// Produces grounded replies from the knowledge index and the completion
/// provider.
pub struct GroundedResponder {
    index: Arc<dyn KnowledgeIndex>,
    provider: Arc<dyn CompletionProvider>,
    persona: PersonaConfig,
    model: String,
    max_tokens: u32,
    temperature: f32,
    top_k: usize,
}

impl GroundedResponder {
    /// Creates a responder wired to the given collaborators.
    pub fn new(
        index: Arc<dyn KnowledgeIndex>,
        provider: Arc<dyn CompletionProvider>,
        persona: PersonaConfig,
        openai: &OpenAiConfig,
        index_config: &IndexConfig,
    ) -> Self {
        Self {
            index,
            provider,
            persona,
            model: openai.chat_model.clone(),
            max_tokens: openai.max_tokens,
            temperature: openai.temperature,
            top_k: index_config.top_k,
        }
    }

    /// Produces a grounded reply for `message` given the most recent
    /// session turns (oldest first).
    pub async fn respond(&self, message: &str, recent: &[Turn]) -> String {
        let passages = match self.index.similarity_search(message, self.top_k).await {
            Ok(passages) => passages,
            Err(e) => {
                warn!(error = %e, "similarity search failed, using fallback reply");
                return FALLBACK.to_string();
            }
        };

        let system = self.build_system_prompt(&passages);

        let mut messages: Vec<ChatMessage> = recent
            .iter()
            .map(|t| ChatMessage {
                role: t.role,
                content: t.content.clone(),
            })
            .collect();
        messages.push(ChatMessage {
            role: leadflow_core::types::Role::User,
            content: message.to_string(),
        });

        let request = CompletionRequest {
            model: self.model.clone(),
            system: Some(system),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        match self.provider.complete(request).await {
            Ok(response) => response.content,
            Err(e) => {
                warn!(error = %e, "completion failed, using fallback reply");
                FALLBACK.to_string()
            }
        }
    }

    /// Assembles the persona system prompt with retrieved context.
    ///
    /// The persona keeps replies short and steers every exchange toward a
    /// consultation without giving implementation detail.
    fn build_system_prompt(&self, passages: &[Passage]) -> String {
        let company = &self.persona.company_name;

        let mut prompt = match &self.persona.system_prompt {
            Some(custom) => custom.clone(),
            None => format!(
                "You are an AI assistant for {company}, an AI consultancy. Your primary \
                 goal is to qualify leads and guide them toward scheduling a consultation.\n\
                 \n\
                 Rules:\n\
                 - Identify the visitor's business challenge first, then hint at possible \
                 solutions without giving specifics.\n\
                 - Never provide implementation detail or technical advice; suggest a \
                 consultation instead.\n\
                 - Never recommend third-party products or services.\n\
                 - Keep responses focused on {company}'s services and business value.\n\
                 - Suggest a consultation once the visitor's needs are clear, when they \
                 ask about implementation, costs, or timelines, or when they mention an \
                 urgent challenge.\n\
                 - Keep responses brief but persuasive: 1-3 sentences, direct and \
                 conversational, never pushy."
            ),
        };

        if !passages.is_empty() {
            prompt.push_str("\n\nContext:\n");
            for passage in passages {
                prompt.push_str(&passage.text);
                prompt.push('\n');
            }
        }

        prompt
    }
}
