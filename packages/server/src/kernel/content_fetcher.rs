//! Per-source content fetching.
//!
//! Instagram goes through the RapidAPI post-info endpoint, Twitter/X gets a
//! best-effort preview request, everything else is scraped as a web page.
//! Every branch produces a usable [`FetchedContent`]; failures are recorded on
//! the value instead of being returned.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use instagram_client::InstagramClient;
use tracing::{debug, warn};

use super::{BaseContentFetcher, BaseWebScraper, SimpleScraper};
use crate::domains::links::models::{FetchedContent, LinkSource};

const SOCIAL_USER_AGENT: &str = "Twitterbot/1.0";
const SOCIAL_TIMEOUT: Duration = Duration::from_secs(15);

pub struct ContentFetcher {
    instagram: Option<InstagramClient>,
    web: Arc<dyn BaseWebScraper>,
    social_client: reqwest::Client,
}

impl ContentFetcher {
    /// `rapidapi_key` of `None` disables Instagram lookups.
    pub fn new(rapidapi_key: Option<String>, rapidapi_host: Option<String>) -> Result<Self> {
        Self::with_web_scraper(rapidapi_key, rapidapi_host, Arc::new(SimpleScraper::new()?))
    }

    pub fn with_web_scraper(
        rapidapi_key: Option<String>,
        rapidapi_host: Option<String>,
        web: Arc<dyn BaseWebScraper>,
    ) -> Result<Self> {
        let social_client = reqwest::Client::builder()
            .timeout(SOCIAL_TIMEOUT)
            .user_agent(SOCIAL_USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create social HTTP client")?;

        Ok(Self {
            instagram: rapidapi_key.map(|key| InstagramClient::new(key, rapidapi_host)),
            web,
            social_client,
        })
    }

    async fn fetch_instagram(&self, url: &str) -> FetchedContent {
        let Some(client) = &self.instagram else {
            debug!(url, "No RapidAPI key, skipping Instagram lookup");
            return FetchedContent::degraded(url, "No RapidAPI key configured");
        };

        match client.post_info(url).await {
            Ok(post) => FetchedContent::new(
                post.caption_text().unwrap_or(url),
                "Instagram Post",
                post.image_url().unwrap_or_default(),
                post.owner_username().unwrap_or_default(),
            ),
            Err(e) => {
                warn!(url, error = %e, "Instagram lookup failed");
                FetchedContent::degraded(url, e.to_string())
            }
        }
    }

    /// Twitter/X serves no useful HTML without auth. The request only checks
    /// reachability; content is placeholder metadata either way.
    async fn fetch_twitter(&self, url: &str) -> FetchedContent {
        let error = match self.social_client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => None,
            Ok(resp) => Some(format!("HTTP {}", resp.status())),
            Err(e) => Some(e.to_string()),
        };
        if let Some(error) = &error {
            debug!(url, error = %error, "Twitter preview request failed");
        }

        let mut content =
            FetchedContent::new(&format!("Twitter/X link: {}", url), "Twitter Post", "", "");
        content.error = error;
        content
    }

    async fn fetch_web(&self, url: &str) -> FetchedContent {
        match self.web.scrape(url).await {
            Ok(page) => FetchedContent::new(
                if page.text.trim().is_empty() { url } else { &page.text },
                page.title.unwrap_or_default(),
                page.image.unwrap_or_default(),
                page.author.unwrap_or_default(),
            ),
            Err(e) => {
                warn!(url, error = %e, "Web scrape failed");
                FetchedContent::degraded(url, e.to_string())
            }
        }
    }
}

#[async_trait]
impl BaseContentFetcher for ContentFetcher {
    async fn fetch(&self, url: &str, source: LinkSource) -> Result<FetchedContent> {
        let content = match source {
            LinkSource::Instagram => self.fetch_instagram(url).await,
            LinkSource::Twitter => self.fetch_twitter(url).await,
            LinkSource::Web | LinkSource::Unknown => self.fetch_web(url).await,
        };

        debug!(
            url,
            source = %source,
            chars = content.raw_text.chars().count(),
            degraded = content.is_degraded(),
            "Fetched content"
        );
        Ok(content)
    }
}
