//! Server dependencies for pipeline activities (using traits for testability)
//!
//! This module provides the central dependency container used by the link
//! pipeline and the HTTP handlers. All external services sit behind traits so
//! tests can swap in the mocks from `test_dependencies`.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::domains::links::activities::MetadataSynthesizer;
use crate::kernel::{
    BaseContentFetcher, BaseLinkStore, BroadcastHub, ContentFetcher, InMemoryLinkStore,
    Notifier, PgLinkStore,
};

/// Server dependencies accessible to activities
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseLinkStore>,
    pub fetcher: Arc<dyn BaseContentFetcher>,
    pub synthesizer: Arc<MetadataSynthesizer>,
    pub notifier: Arc<Notifier>,
    /// Live dashboard fan-out
    pub broadcast_hub: BroadcastHub,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseLinkStore>,
        fetcher: Arc<dyn BaseContentFetcher>,
        synthesizer: Arc<MetadataSynthesizer>,
        notifier: Arc<Notifier>,
        broadcast_hub: BroadcastHub,
    ) -> Self {
        Self {
            store,
            fetcher,
            synthesizer,
            notifier,
            broadcast_hub,
        }
    }

    /// Wire up production implementations from configuration.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = connect_store(config).await?;
        let fetcher = ContentFetcher::new(config.rapidapi_key.clone(), config.rapidapi_host.clone())?;

        Ok(Self::new(
            store,
            Arc::new(fetcher),
            Arc::new(MetadataSynthesizer::from_config(config)),
            Arc::new(Notifier::from_config(config)?),
            BroadcastHub::new(),
        ))
    }
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-local store.
async fn connect_store(config: &Config) -> Result<Arc<dyn BaseLinkStore>> {
    let Some(database_url) = &config.database_url else {
        warn!("DATABASE_URL not set, running in demo mode with in-memory storage");
        return Ok(Arc::new(InMemoryLinkStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    info!("Connected to Postgres, migrations applied");
    Ok(Arc::new(PgLinkStore::new(pool)))
}
