//! Link persistence backends.
//!
//! `PgLinkStore` delegates to the SQL in `domains/links/models/link.rs`.
//! `InMemoryLinkStore` backs demo mode (no `DATABASE_URL`) and tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::RwLock;

use super::BaseLinkStore;
use crate::common::LinkId;
use crate::domains::links::models::{Category, Link, LinkUpdate};

/// Postgres-backed store
#[derive(Clone)]
pub struct PgLinkStore {
    pool: PgPool,
}

impl PgLinkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseLinkStore for PgLinkStore {
    async fn insert(&self, link: &Link) -> Result<Link> {
        link.insert(&self.pool).await
    }

    async fn get(&self, id: LinkId) -> Result<Option<Link>> {
        Link::find_by_id(id, &self.pool).await
    }

    async fn update(&self, id: LinkId, update: &LinkUpdate) -> Result<Link> {
        Link::update(id, update, &self.pool).await
    }

    async fn delete(&self, id: LinkId) -> Result<bool> {
        Link::delete(id, &self.pool).await
    }

    async fn list(&self, limit: i64, offset: i64, category: Option<Category>) -> Result<Vec<Link>> {
        Link::find_recent(limit, offset, category, &self.pool).await
    }

    async fn list_older_than(&self, cutoff: DateTime<Utc>) -> Result<Vec<Link>> {
        Link::find_processed_before(cutoff, &self.pool).await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Process-local store. Contents vanish on restart.
#[derive(Default)]
pub struct InMemoryLinkStore {
    links: RwLock<Vec<Link>>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(links: &[Link]) -> Vec<&Link> {
    let mut sorted: Vec<&Link> = links.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

#[async_trait]
impl BaseLinkStore for InMemoryLinkStore {
    async fn insert(&self, link: &Link) -> Result<Link> {
        let mut links = self.links.write().await;
        if links.iter().any(|l| l.id == link.id) {
            anyhow::bail!("Link already exists: {}", link.id);
        }
        links.push(link.clone());
        Ok(link.clone())
    }

    async fn get(&self, id: LinkId) -> Result<Option<Link>> {
        Ok(self.links.read().await.iter().find(|l| l.id == id).cloned())
    }

    async fn update(&self, id: LinkId, update: &LinkUpdate) -> Result<Link> {
        let mut links = self.links.write().await;
        let link = links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| anyhow::anyhow!("Link not found: {}", id))?;
        link.apply(update);
        Ok(link.clone())
    }

    async fn delete(&self, id: LinkId) -> Result<bool> {
        let mut links = self.links.write().await;
        let before = links.len();
        links.retain(|l| l.id != id);
        Ok(links.len() < before)
    }

    async fn list(&self, limit: i64, offset: i64, category: Option<Category>) -> Result<Vec<Link>> {
        let links = self.links.read().await;
        Ok(newest_first(&links)
            .into_iter()
            .filter(|l| category.is_none() || l.category == category)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_older_than(&self, cutoff: DateTime<Utc>) -> Result<Vec<Link>> {
        let links = self.links.read().await;
        Ok(newest_first(&links)
            .into_iter()
            .filter(|l| l.processed && l.created_at < cutoff)
            .cloned()
            .collect())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
