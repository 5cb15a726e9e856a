//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod broadcast_hub;
pub mod content_fetcher;
pub mod deps;
pub mod gemini_client;
pub mod link_store;
pub mod notifier;
pub mod simple_scraper;
pub mod test_dependencies;
pub mod traits;

pub use ai::{provider_chain, OpenAiProvider};
pub use broadcast_hub::{BroadcastHub, ChannelSink, EventSink};
pub use content_fetcher::ContentFetcher;
pub use deps::ServerDeps;
pub use gemini_client::GeminiClient;
pub use link_store::{InMemoryLinkStore, PgLinkStore};
pub use notifier::{MetaMessenger, Notifier, TwilioMessenger};
pub use simple_scraper::SimpleScraper;
pub use test_dependencies::{
    FailingSink, MockAI, MockContentFetcher, MockLinkStore, MockMessenger, MockWebScraper,
    RecordingSink, SentMessage, TestDependencies,
};
pub use traits::*;
