use std::sync::Arc;

use tracing::{error, info};

use super::submit_link::{store_placeholder, SubmittedLink};
use crate::domains::links::extraction::extract_urls;
use crate::kernel::ServerDeps;

pub const NO_LINK_REPLY: &str = "🤔 Hmm, I couldn't find a link in that message. Try sending a URL!";
pub const ACK_REPLY: &str = "🔗 Link received! Analyzing the vibe... ✨";

/// A chat message received through a messaging webhook.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Sender identifier stored on each link.
    pub sender: String,
    /// Address replies go to.
    pub reply_to: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStatus {
    /// No URL in the message; the sender was told so.
    NoUrl,
    /// At least one URL was accepted.
    Accepted,
    /// URLs were found but none could be stored.
    Failed,
}

pub struct IngestOutcome {
    pub status: IngestStatus,
    pub submitted: Vec<SubmittedLink>,
}

/// Save every link in a chat message.
///
/// Each URL gets its own placeholder and independent enrichment run. One
/// acknowledgment goes out after all placeholders are stored and before any
/// run starts, so it always precedes completion replies.
pub async fn ingest_message(message: &InboundMessage, deps: &Arc<ServerDeps>) -> IngestOutcome {
    let urls = extract_urls(&message.body);

    if urls.is_empty() {
        info!(sender = %message.sender, "Message contained no link");
        deps.notifier.notify(&message.reply_to, NO_LINK_REPLY).await;
        return IngestOutcome {
            status: IngestStatus::NoUrl,
            submitted: Vec::new(),
        };
    }

    let mut pending = Vec::with_capacity(urls.len());
    for extracted in &urls {
        match store_placeholder(extracted, Some(&message.sender), Some(&message.reply_to), deps).await {
            Ok(link) => pending.push(link),
            Err(e) => error!(url = %extracted.url, error = %format!("{:#}", e), "Failed to submit link"),
        }
    }

    if pending.is_empty() {
        return IngestOutcome {
            status: IngestStatus::Failed,
            submitted: Vec::new(),
        };
    }

    deps.notifier.notify(&message.reply_to, ACK_REPLY).await;
    info!(sender = %message.sender, links = pending.len(), "Links accepted from message");

    let submitted = pending.into_iter().map(|link| link.start(deps)).collect();

    IngestOutcome {
        status: IngestStatus::Accepted,
        submitted,
    }
}
