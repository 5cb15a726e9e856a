// AI implementations of BaseAI
//
// This is the infrastructure side of metadata synthesis.
// What to prompt for lives in domains/links/activities/synthesize_metadata.rs.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};
use tracing::info;

use super::{BaseAI, GeminiClient};
use crate::config::{AiProvider, Config};

pub const OPENAI_MODEL: &str = "gpt-4o";
const OPENAI_TEMPERATURE: f32 = 0.3;

/// OpenAI chat completions as an LLM backend.
pub struct OpenAiProvider {
    client: OpenAIClient,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
            model: OPENAI_MODEL.to_string(),
        }
    }
}

#[async_trait]
impl BaseAI for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(system_prompt))
            .message(Message::user(user_prompt))
            .temperature(OPENAI_TEMPERATURE);

        let response = self
            .client
            .chat_completion(request)
            .await
            .context("OpenAI completion failed")?;

        Ok(response.content.trim().to_string())
    }
}

/// Ordered provider list: the configured primary first, then the other one.
/// Providers without an API key are skipped, so the list may be empty.
pub fn provider_chain(config: &Config) -> Vec<Arc<dyn BaseAI>> {
    let openai = config
        .openai_api_key
        .clone()
        .map(|key| Arc::new(OpenAiProvider::new(key)) as Arc<dyn BaseAI>);
    let gemini = config
        .gemini_api_key
        .clone()
        .map(|key| Arc::new(GeminiClient::new(key)) as Arc<dyn BaseAI>);

    let ordered = match config.ai_provider {
        AiProvider::OpenAi => [openai, gemini],
        AiProvider::Gemini => [gemini, openai],
    };

    let chain: Vec<Arc<dyn BaseAI>> = ordered.into_iter().flatten().collect();
    info!(
        primary = %config.ai_provider,
        providers = ?chain.iter().map(|p| p.name().to_string()).collect::<Vec<_>>(),
        "AI provider chain configured"
    );
    chain
}
