//! Outbound chat replies to the person who submitted a link.
//!
//! The backend is picked once from `WEBHOOK_PROVIDER`. Without credentials the
//! notifier runs in demo mode: messages are logged and reported as sent.
//! Delivery is best effort; callers only learn success or failure.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};
use twilio::{TwilioOptions, TwilioService};

use super::BaseMessenger;
use crate::config::{Config, MessagingProvider};

const META_GRAPH_URL: &str = "https://graph.facebook.com/v19.0";
const META_TIMEOUT: Duration = Duration::from_secs(10);

impl MessagingProvider {
    /// Address format each gateway expects.
    pub fn normalize_recipient(&self, recipient: &str) -> String {
        let recipient = recipient.trim();
        match self {
            MessagingProvider::Twilio => TwilioService::whatsapp_address(recipient),
            MessagingProvider::Meta => recipient
                .trim_start_matches(twilio::WHATSAPP_PREFIX)
                .replace('+', ""),
        }
    }
}

// =============================================================================
// Gateways
// =============================================================================

/// Twilio WhatsApp messaging.
pub struct TwilioMessenger {
    service: TwilioService,
}

impl TwilioMessenger {
    pub fn new(service: TwilioService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl BaseMessenger for TwilioMessenger {
    async fn send_message(&self, recipient: &str, body: &str) -> Result<()> {
        let response = self
            .service
            .send_message(recipient, body)
            .await
            .context("Twilio send failed")?;
        info!(sid = %response.sid, status = %response.status, "Twilio message queued");
        Ok(())
    }
}

/// Meta WhatsApp Cloud API messaging.
pub struct MetaMessenger {
    access_token: String,
    phone_number_id: String,
    client: reqwest::Client,
}

impl MetaMessenger {
    pub fn new(access_token: String, phone_number_id: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(META_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            access_token,
            phone_number_id,
            client,
        })
    }
}

#[async_trait]
impl BaseMessenger for MetaMessenger {
    async fn send_message(&self, recipient: &str, body: &str) -> Result<()> {
        let payload = json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": recipient,
            "type": "text",
            "text": {"preview_url": false, "body": body},
        });

        let response = self
            .client
            .post(format!("{}/{}/messages", META_GRAPH_URL, self.phone_number_id))
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .context("Meta send request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Meta API error ({}): {}", status, body);
        }
        Ok(())
    }
}

// =============================================================================
// Notifier
// =============================================================================

pub struct Notifier {
    provider: MessagingProvider,
    /// `None` means demo mode.
    gateway: Option<Arc<dyn BaseMessenger>>,
}

impl Notifier {
    pub fn new(provider: MessagingProvider, gateway: Arc<dyn BaseMessenger>) -> Self {
        Self {
            provider,
            gateway: Some(gateway),
        }
    }

    pub fn demo(provider: MessagingProvider) -> Self {
        Self {
            provider,
            gateway: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let gateway: Option<Arc<dyn BaseMessenger>> = match config.webhook_provider {
            MessagingProvider::Twilio => match (&config.twilio_account_sid, &config.twilio_auth_token) {
                (Some(sid), Some(token)) => Some(Arc::new(TwilioMessenger::new(TwilioService::new(
                    TwilioOptions {
                        account_sid: sid.clone(),
                        auth_token: token.clone(),
                        from_number: config.twilio_whatsapp_number.clone(),
                    },
                )))),
                _ => None,
            },
            MessagingProvider::Meta => match (&config.meta_access_token, &config.meta_phone_number_id) {
                (Some(token), Some(phone_id)) => {
                    Some(Arc::new(MetaMessenger::new(token.clone(), phone_id.clone())?))
                }
                _ => None,
            },
        };

        if gateway.is_none() {
            warn!(provider = %config.webhook_provider, "Messaging credentials missing, replies will only be logged");
        }

        Ok(Self {
            provider: config.webhook_provider,
            gateway,
        })
    }

    pub fn provider(&self) -> MessagingProvider {
        self.provider
    }

    pub fn is_demo(&self) -> bool {
        self.gateway.is_none()
    }

    /// Send `message` to `recipient`. Never fails; returns whether the
    /// gateway accepted the message.
    pub async fn notify(&self, recipient: &str, message: &str) -> bool {
        let recipient = self.provider.normalize_recipient(recipient);

        let Some(gateway) = &self.gateway else {
            info!(provider = %self.provider, to = %recipient, message, "Demo mode: would send reply");
            return true;
        };

        match gateway.send_message(&recipient, message).await {
            Ok(()) => true,
            Err(e) => {
                warn!(provider = %self.provider, to = %recipient, error = %e, "Failed to send reply");
                false
            }
        }
    }
}
