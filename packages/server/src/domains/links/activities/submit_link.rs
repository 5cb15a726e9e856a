use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::debug;

use super::process_link::{spawn_link_pipeline, LinkJob, PipelineState};
use crate::domains::links::extraction::{normalize, ExtractedUrl};
use crate::domains::links::models::{Link, LinkEvent};
use crate::kernel::ServerDeps;

/// A link whose placeholder is stored and whose enrichment run is underway.
pub struct SubmittedLink {
    pub link: Link,
    pub run: JoinHandle<PipelineState>,
}

/// A stored and announced placeholder whose enrichment run has not started.
pub struct PendingLink {
    pub link: Link,
    job: LinkJob,
}

impl PendingLink {
    /// Spawn the enrichment run.
    pub fn start(self, deps: &Arc<ServerDeps>) -> SubmittedLink {
        let run = spawn_link_pipeline(self.job, Arc::clone(deps));
        SubmittedLink {
            link: self.link,
            run,
        }
    }
}

/// Persist a placeholder for `extracted` and broadcast `link_added`. Nothing
/// runs in the background until [`PendingLink::start`].
pub async fn store_placeholder(
    extracted: &ExtractedUrl,
    sender: Option<&str>,
    reply_to: Option<&str>,
    deps: &ServerDeps,
) -> Result<PendingLink> {
    let url = normalize(&extracted.url, extracted.source);
    debug!(url = %url, source = %extracted.source, state = ?PipelineState::Received, "Link submitted");

    let placeholder = Link::placeholder(url, extracted.source, sender.map(str::to_string));
    let link = deps
        .store
        .insert(&placeholder)
        .await
        .context("Failed to store link placeholder")?;
    debug!(link_id = %link.id, state = ?PipelineState::PlaceholderPersisted, "Placeholder stored");

    deps.broadcast_hub.broadcast(&LinkEvent::added(&link)).await;

    let job = LinkJob::for_link(&link, reply_to.map(str::to_string));
    Ok(PendingLink { link, job })
}

/// Store the placeholder and start enrichment right away.
pub async fn submit_link(
    extracted: &ExtractedUrl,
    sender: Option<&str>,
    reply_to: Option<&str>,
    deps: &Arc<ServerDeps>,
) -> Result<SubmittedLink> {
    let pending = store_placeholder(extracted, sender, reply_to, deps).await?;
    Ok(pending.start(deps))
}
