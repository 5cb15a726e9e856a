//! Link pipeline activities.

pub mod ingest_message;
pub mod process_link;
pub mod resurface;
pub mod submit_link;
pub mod synthesize_metadata;

pub use ingest_message::{
    ingest_message, InboundMessage, IngestOutcome, IngestStatus, ACK_REPLY, NO_LINK_REPLY,
};
pub use process_link::{
    completion_message, process_link, spawn_link_pipeline, LinkJob, PipelineState,
};
pub use resurface::{forgotten_cutoff, pick_forgotten_link, DEFAULT_ROULETTE_DAYS};
pub use submit_link::{store_placeholder, submit_link, PendingLink, SubmittedLink};
pub use synthesize_metadata::{parse_ai_response, MetadataSynthesizer};
