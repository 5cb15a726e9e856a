//! Turn scraped text into a title, summary, category and tags.
//!
//! Providers are tried in order. Any failure, including unparseable output,
//! moves on to the next one. When the list runs out the fixed fallback result
//! is returned, so synthesis never fails.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::common::text::{strip_code_fences, truncate_chars};
use crate::config::Config;
use crate::domains::links::models::{AIResult, Category};
use crate::kernel::{provider_chain, BaseAI};

/// Cap on content forwarded to a provider.
pub const MAX_PROVIDER_INPUT_CHARS: usize = 4000;

pub const SYSTEM_PROMPT: &str = r#"You are a content curator AI. Given raw text from a web page, blog, social media post, or URL, extract structured metadata.

Return ONLY valid JSON with this exact schema:
{
  "title": "concise, engaging title (max 80 chars)",
  "summary": "2-3 sentence summary of the content",
  "category": "one of: Coding, Design, Fitness, Food, Travel, Finance, Science, Entertainment, News, Other",
  "tags": ["tag1", "tag2", "tag3"]
}

Rules:
- title must be a proper English title, not a URL
- summary must be informative and specific
- category must be EXACTLY one of the listed options
- tags: 3-7 relevant tags, lowercase, 1-3 words each
- Return ONLY the JSON object, no markdown code blocks, no extra text"#;

#[derive(Debug, Deserialize)]
struct RawAiResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Parse a provider reply. Code fences are tolerated; anything that is not a
/// JSON object with the expected fields is an error.
pub fn parse_ai_response(text: &str) -> Result<AIResult> {
    let raw: RawAiResult =
        serde_json::from_str(strip_code_fences(text)).context("AI response is not valid JSON")?;

    let title = raw
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Untitled".to_string());
    let category = raw
        .category
        .as_deref()
        .map(Category::coerce)
        .unwrap_or(Category::Other);

    Ok(AIResult::new(
        title,
        raw.summary.unwrap_or_default(),
        category,
        raw.tags,
    ))
}

pub fn build_user_prompt(raw_text: &str, url: &str) -> String {
    format!(
        "URL: {}\n\nContent:\n{}",
        url,
        truncate_chars(raw_text, MAX_PROVIDER_INPUT_CHARS)
    )
}

pub struct MetadataSynthesizer {
    providers: Vec<Arc<dyn BaseAI>>,
}

impl MetadataSynthesizer {
    pub fn new(providers: Vec<Arc<dyn BaseAI>>) -> Self {
        Self { providers }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(provider_chain(config))
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn synthesize(&self, raw_text: &str, url: &str) -> AIResult {
        let user_prompt = build_user_prompt(raw_text, url);

        for provider in &self.providers {
            let attempt = provider
                .generate(SYSTEM_PROMPT, &user_prompt)
                .await
                .and_then(|text| parse_ai_response(&text));

            match attempt {
                Ok(result) => {
                    debug!(provider = provider.name(), url, category = %result.category, "Synthesized metadata");
                    return result;
                }
                Err(e) => {
                    warn!(provider = provider.name(), url, error = %e, "AI provider failed, trying next");
                }
            }
        }

        info!(url, "No AI provider succeeded, using fallback metadata");
        AIResult::fallback()
    }
}
