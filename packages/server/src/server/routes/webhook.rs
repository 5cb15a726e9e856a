//! Inbound WhatsApp webhooks (Twilio form posts and Meta Graph JSON).

use std::collections::HashMap;

use axum::{
    extract::{Extension, Form, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::domains::links::activities::{ingest_message, InboundMessage, IngestStatus};
use crate::server::app::AxumAppState;
use crate::server::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct TwilioWebhookForm {
    /// e.g. `whatsapp:+919876543210`
    #[serde(rename = "From")]
    from: String,
    #[serde(rename = "Body")]
    body: String,
}

#[derive(Serialize)]
pub struct MetaWebhookResponse {
    status: &'static str,
}

impl MetaWebhookResponse {
    fn new(status: &'static str) -> Json<Self> {
        Json(Self { status })
    }
}

pub async fn twilio_webhook_handler(
    Extension(state): Extension<AxumAppState>,
    Form(form): Form<TwilioWebhookForm>,
) -> &'static str {
    info!(from = %form.from, "Twilio message received");

    let message = InboundMessage {
        sender: form.from.clone(),
        reply_to: form.from,
        body: form.body,
    };
    ingest_message(&message, &state.deps).await;

    "ok"
}

/// Meta subscription handshake: echo `hub.challenge` when the token matches.
pub async fn meta_verify_handler(
    Extension(state): Extension<AxumAppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<String> {
    match params.get("hub.verify_token") {
        Some(token) if *token == state.meta_verify_token => Ok(params
            .get("hub.challenge")
            .cloned()
            .unwrap_or_default()),
        _ => {
            warn!("Meta webhook verification rejected");
            Err(ApiError::Forbidden("Invalid verify token".into()))
        }
    }
}

pub async fn meta_webhook_handler(
    Extension(state): Extension<AxumAppState>,
    Json(payload): Json<Value>,
) -> Json<MetaWebhookResponse> {
    let message = match parse_meta_message(&payload) {
        Ok(Some(message)) => message,
        Ok(None) => return MetaWebhookResponse::new("no messages"),
        Err(reason) => {
            // Still a 200; Meta redelivers anything else.
            warn!(reason, "Unparseable Meta webhook payload");
            return MetaWebhookResponse::new("ok");
        }
    };

    info!(from = %message.sender, "Meta message received");
    let outcome = ingest_message(&message, &state.deps).await;

    match outcome.status {
        IngestStatus::NoUrl => MetaWebhookResponse::new("no url"),
        IngestStatus::Accepted | IngestStatus::Failed => MetaWebhookResponse::new("ok"),
    }
}

/// Pull the first message out of `entry[0].changes[0].value.messages`.
///
/// `Ok(None)` is a delivery without messages (status updates and the like).
fn parse_meta_message(payload: &Value) -> Result<Option<InboundMessage>, &'static str> {
    let value = payload
        .pointer("/entry/0/changes/0/value")
        .ok_or("missing entry[0].changes[0].value")?;

    let Some(message) = value
        .get("messages")
        .and_then(Value::as_array)
        .and_then(|messages| messages.first())
    else {
        return Ok(None);
    };

    let from = message
        .get("from")
        .and_then(Value::as_str)
        .ok_or("message without sender")?;
    let body = message
        .pointer("/text/body")
        .and_then(Value::as_str)
        .unwrap_or_default();

    Ok(Some(InboundMessage {
        sender: from.to_string(),
        reply_to: format!("+{}", from),
        body: body.to_string(),
    }))
}
