//! Enrichment run for a single saved link.
//!
//! A run starts after the placeholder row exists and its `link_added` event
//! went out. It fetches content, synthesizes metadata and finalizes the row.
//! This is the only place pipeline errors are caught: a failed run resets the
//! row to unprocessed with a failure marker and never propagates.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::common::text::truncate_chars;
use crate::common::LinkId;
use crate::domains::links::models::{AIResult, Link, LinkEvent, LinkSource, LinkUpdate};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Received,
    PlaceholderPersisted,
    Enriching,
    Finalized,
    Failed,
}

/// Everything a run needs to know about its link.
#[derive(Debug, Clone)]
pub struct LinkJob {
    pub link_id: LinkId,
    pub url: String,
    pub source: LinkSource,
    /// Where to send the completion reply, if anywhere.
    pub reply_to: Option<String>,
}

impl LinkJob {
    pub fn for_link(link: &Link, reply_to: Option<String>) -> Self {
        Self {
            link_id: link.id,
            url: link.raw_url.clone(),
            source: link.source,
            reply_to,
        }
    }
}

/// Start a run in the background. The caller may drop the handle.
pub fn spawn_link_pipeline(job: LinkJob, deps: Arc<ServerDeps>) -> JoinHandle<PipelineState> {
    tokio::spawn(async move { process_link(job, &deps).await })
}

/// Run the pipeline to completion and report the terminal state.
pub async fn process_link(job: LinkJob, deps: &ServerDeps) -> PipelineState {
    debug!(link_id = %job.link_id, url = %job.url, state = ?PipelineState::Enriching, "Pipeline run started");

    match enrich(&job, deps).await {
        Ok((link, ai)) => {
            deps.broadcast_hub.broadcast(&LinkEvent::updated(link)).await;

            if let Some(reply_to) = &job.reply_to {
                deps.notifier.notify(reply_to, &completion_message(&ai)).await;
            }

            info!(link_id = %job.link_id, category = %ai.category, "Link processed");
            PipelineState::Finalized
        }
        Err(e) => {
            error!(link_id = %job.link_id, url = %job.url, error = %format!("{:#}", e), "Pipeline run failed");

            if let Err(reset_err) = deps
                .store
                .update(job.link_id, &LinkUpdate::failed(format!("{:#}", e)))
                .await
            {
                error!(link_id = %job.link_id, error = %reset_err, "Failed to record pipeline failure");
            }
            PipelineState::Failed
        }
    }
}

async fn enrich(job: &LinkJob, deps: &ServerDeps) -> Result<(Link, AIResult)> {
    let content = deps
        .fetcher
        .fetch(&job.url, job.source)
        .await
        .context("Content fetch failed")?;

    let ai = deps.synthesizer.synthesize(&content.raw_text, &job.url).await;

    let link = deps
        .store
        .update(job.link_id, &LinkUpdate::finalize(&ai, &content))
        .await
        .context("Failed to finalize link")?;

    Ok((link, ai))
}

/// Chat reply sent once a link is processed.
pub fn completion_message(ai: &AIResult) -> String {
    let tags: Vec<&str> = ai.tags.iter().take(3).map(String::as_str).collect();
    format!(
        "✅ *{}*\n📂 {} | 🏷️ {}\n_{}..._",
        ai.title,
        ai.category,
        tags.join(", "),
        truncate_chars(&ai.summary, 120)
    )
}
