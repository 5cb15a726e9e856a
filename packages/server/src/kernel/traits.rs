// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Pipeline logic lives in domains/links/activities and talks to the outside
// world through these seams.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseLinkStore)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::LinkId;
use crate::domains::links::models::{Category, FetchedContent, Link, LinkSource, LinkUpdate};

// =============================================================================
// AI Trait (Infrastructure - one LLM backend)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Short provider name for logs ("openai", "gemini").
    fn name(&self) -> &str;

    /// Run one completion and return the raw text the model produced.
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

// =============================================================================
// Web Scraper Trait (Infrastructure - HTML page reading)
// =============================================================================

/// Text and metadata read from a single HTML page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeResult {
    pub url: String,
    pub text: String,
    pub title: Option<String>,
    pub image: Option<String>,
    pub author: Option<String>,
}

#[async_trait]
pub trait BaseWebScraper: Send + Sync {
    /// Fetch one page and extract readable text plus title/image/author.
    async fn scrape(&self, url: &str) -> Result<ScrapeResult>;
}

// =============================================================================
// Content Fetcher Trait (Infrastructure - per-source scraping)
// =============================================================================

#[async_trait]
pub trait BaseContentFetcher: Send + Sync {
    /// Read whatever can be read about `url`.
    ///
    /// Production implementations absorb scraping failures into
    /// `FetchedContent::error`. An `Err` here means the fetcher itself is
    /// unusable and fails the pipeline run.
    async fn fetch(&self, url: &str, source: LinkSource) -> Result<FetchedContent>;
}

// =============================================================================
// Link Store Trait (Infrastructure - persistence)
// =============================================================================

#[async_trait]
pub trait BaseLinkStore: Send + Sync {
    async fn insert(&self, link: &Link) -> Result<Link>;

    async fn get(&self, id: LinkId) -> Result<Option<Link>>;

    /// Apply a partial update. Errors when the id does not exist.
    async fn update(&self, id: LinkId, update: &LinkUpdate) -> Result<Link>;

    /// Returns false when nothing was deleted.
    async fn delete(&self, id: LinkId) -> Result<bool>;

    /// Newest first.
    async fn list(&self, limit: i64, offset: i64, category: Option<Category>) -> Result<Vec<Link>>;

    /// Processed links created before `cutoff`.
    async fn list_older_than(&self, cutoff: DateTime<Utc>) -> Result<Vec<Link>>;

    /// Short backend name for health output.
    fn backend(&self) -> &'static str;
}

// =============================================================================
// Messaging Trait (Infrastructure - outbound chat gateway)
// =============================================================================

#[async_trait]
pub trait BaseMessenger: Send + Sync {
    /// Deliver `body` to an already-normalized recipient address.
    async fn send_message(&self, recipient: &str, body: &str) -> Result<()>;
}
