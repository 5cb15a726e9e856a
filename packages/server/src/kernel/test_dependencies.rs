// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{
    BaseAI, BaseContentFetcher, BaseLinkStore, BaseMessenger, BaseWebScraper, BroadcastHub,
    EventSink, InMemoryLinkStore, Notifier, ScrapeResult, ServerDeps,
};
use crate::common::LinkId;
use crate::config::MessagingProvider;
use crate::domains::links::activities::MetadataSynthesizer;
use crate::domains::links::models::{Category, FetchedContent, Link, LinkSource, LinkUpdate};

// =============================================================================
// Mock Web Scraper
// =============================================================================

pub struct MockWebScraper {
    responses: Arc<Mutex<VecDeque<ScrapeResult>>>,
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockWebScraper {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub fn with_result(self, result: ScrapeResult) -> Self {
        self.responses.lock().unwrap().push_back(result);
        self
    }

    /// Every scrape returns an error
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockWebScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseWebScraper for MockWebScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapeResult> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.fail {
            anyhow::bail!("mock scrape failure for {}", url);
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ScrapeResult {
                url: url.to_string(),
                text: "Mock page text".to_string(),
                title: Some("Mock Page".to_string()),
                ..Default::default()
            }))
    }
}

// =============================================================================
// Mock AI
// =============================================================================

/// Replays queued responses in order; the last one repeats.
pub struct MockAI {
    name: String,
    responses: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockAI {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(response.into());
        self
    }

    /// Add a JSON response to the queue (will be serialized)
    pub fn with_json_response<T: serde::Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.with_response(json)
    }

    /// Every call returns an error
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Get all user prompts that were sent to the AI
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a prompt containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|p| p.contains(text))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, _system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.calls.lock().unwrap().push(user_prompt.to_string());
        if self.fail {
            anyhow::bail!("mock provider {} unavailable", self.name);
        }

        let mut responses = self.responses.lock().unwrap();
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        response.ok_or_else(|| anyhow::anyhow!("no mock response queued"))
    }
}

// =============================================================================
// Mock Content Fetcher
// =============================================================================

pub struct MockContentFetcher {
    responses: Arc<Mutex<HashMap<String, FetchedContent>>>,
    failing_urls: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<(String, LinkSource)>>>,
    delay: Option<Duration>,
}

impl MockContentFetcher {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            failing_urls: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    pub fn with_content(self, url: &str, content: FetchedContent) -> Self {
        self.responses.lock().unwrap().insert(url.to_string(), content);
        self
    }

    /// `fetch` returns `Err` for this URL
    pub fn failing_for(self, url: &str) -> Self {
        self.failing_urls.lock().unwrap().push(url.to_string());
        self
    }

    /// Sleep before answering, to exercise concurrent runs
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<(String, LinkSource)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockContentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseContentFetcher for MockContentFetcher {
    async fn fetch(&self, url: &str, source: LinkSource) -> Result<FetchedContent> {
        self.calls.lock().unwrap().push((url.to_string(), source));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_urls.lock().unwrap().iter().any(|u| u == url) {
            anyhow::bail!("mock fetch failure for {}", url);
        }

        let content = self.responses.lock().unwrap().get(url).cloned();
        Ok(content.unwrap_or_else(|| FetchedContent::new(&format!("Content of {}", url), "Mock", "", "")))
    }
}

// =============================================================================
// Mock Messenger
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: String,
    pub body: String,
}

pub struct MockMessenger {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    fail: bool,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.recipient == recipient)
            .map(|m| m.body.clone())
            .collect()
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMessenger for MockMessenger {
    async fn send_message(&self, recipient: &str, body: &str) -> Result<()> {
        if self.fail {
            anyhow::bail!("mock gateway down");
        }
        self.sent.lock().unwrap().push(SentMessage {
            recipient: recipient.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Event sinks
// =============================================================================

/// Records every payload it receives.
#[derive(Default)]
pub struct RecordingSink {
    received: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Received payloads parsed as JSON
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.received()
            .iter()
            .filter_map(|p| serde_json::from_str(p).ok())
            .collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn send(&self, payload: &str) -> Result<()> {
        self.received.lock().unwrap().push(payload.to_string());
        Ok(())
    }
}

/// Fails every send, like a dropped websocket.
#[derive(Default)]
pub struct FailingSink;

#[async_trait]
impl EventSink for FailingSink {
    async fn send(&self, _payload: &str) -> Result<()> {
        anyhow::bail!("connection reset")
    }
}

// =============================================================================
// Mock Link Store
// =============================================================================

/// In-memory store whose writes can be switched to fail, like a lost
/// database connection.
#[derive(Default)]
pub struct MockLinkStore {
    inner: InMemoryLinkStore,
    fail_inserts: bool,
    fail_updates: bool,
}

impl MockLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_inserts(mut self) -> Self {
        self.fail_inserts = true;
        self
    }

    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }
}

#[async_trait]
impl BaseLinkStore for MockLinkStore {
    async fn insert(&self, link: &Link) -> Result<Link> {
        if self.fail_inserts {
            anyhow::bail!("connection refused");
        }
        self.inner.insert(link).await
    }

    async fn get(&self, id: LinkId) -> Result<Option<Link>> {
        self.inner.get(id).await
    }

    async fn update(&self, id: LinkId, update: &LinkUpdate) -> Result<Link> {
        if self.fail_updates {
            anyhow::bail!("connection refused");
        }
        self.inner.update(id, update).await
    }

    async fn delete(&self, id: LinkId) -> Result<bool> {
        self.inner.delete(id).await
    }

    async fn list(&self, limit: i64, offset: i64, category: Option<Category>) -> Result<Vec<Link>> {
        self.inner.list(limit, offset, category).await
    }

    async fn list_older_than(&self, cutoff: DateTime<Utc>) -> Result<Vec<Link>> {
        self.inner.list_older_than(cutoff).await
    }

    fn backend(&self) -> &'static str {
        self.inner.backend()
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub store: Arc<MockLinkStore>,
    pub fetcher: Arc<MockContentFetcher>,
    pub ai: Arc<MockAI>,
    pub messenger: Arc<MockMessenger>,
    pub provider: MessagingProvider,
    pub broadcast_hub: BroadcastHub,
}

impl TestDependencies {
    /// Mock AI with no queued responses (every call fails over to fallback)
    pub fn new() -> Self {
        Self {
            store: Arc::new(MockLinkStore::new()),
            fetcher: Arc::new(MockContentFetcher::new()),
            ai: Arc::new(MockAI::new("mock")),
            messenger: Arc::new(MockMessenger::new()),
            provider: MessagingProvider::Twilio,
            broadcast_hub: BroadcastHub::new(),
        }
    }

    pub fn mock_store(mut self, store: MockLinkStore) -> Self {
        self.store = Arc::new(store);
        self
    }

    pub fn mock_fetcher(mut self, fetcher: MockContentFetcher) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    pub fn mock_messenger(mut self, messenger: MockMessenger) -> Self {
        self.messenger = Arc::new(messenger);
        self
    }

    pub fn messaging_provider(mut self, provider: MessagingProvider) -> Self {
        self.provider = provider;
        self
    }

    /// Convert into ServerDeps for testing
    pub fn server_deps(&self) -> Arc<ServerDeps> {
        Arc::new(ServerDeps::new(
            self.store.clone() as Arc<dyn BaseLinkStore>,
            self.fetcher.clone() as Arc<dyn BaseContentFetcher>,
            Arc::new(MetadataSynthesizer::new(vec![self.ai.clone() as Arc<dyn BaseAI>])),
            Arc::new(Notifier::new(
                self.provider,
                self.messenger.clone() as Arc<dyn BaseMessenger>,
            )),
            self.broadcast_hub.clone(),
        ))
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
