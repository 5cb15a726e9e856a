// Minimal client for the Twilio Programmable Messaging API (WhatsApp channel).

use std::collections::HashMap;
use std::time::Duration;

pub mod models;
use reqwest::{header, Client};

pub use crate::models::{MessageResponse, TwilioError};

/// Prefix Twilio uses to route a message over WhatsApp instead of SMS.
pub const WHATSAPP_PREFIX: &str = "whatsapp:";

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender address, e.g. `whatsapp:+14155238886` (the sandbox number).
    pub from_number: String,
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    client: Client,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { options, client }
    }

    pub fn account_sid(&self) -> &str {
        &self.options.account_sid
    }

    /// Address a recipient on the WhatsApp channel, adding the `whatsapp:`
    /// prefix when the caller passed a bare phone number.
    pub fn whatsapp_address(recipient: &str) -> String {
        if recipient.starts_with(WHATSAPP_PREFIX) {
            recipient.to_string()
        } else {
            format!("{}{}", WHATSAPP_PREFIX, recipient)
        }
    }

    /// Send a message body to `recipient`. The recipient must already be in
    /// Twilio addressing format (see [`TwilioService::whatsapp_address`]).
    pub async fn send_message(
        &self,
        recipient: &str,
        body: &str,
    ) -> Result<MessageResponse, TwilioError> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{sid}/Messages.json",
            sid = self.options.account_sid
        );

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", recipient);
        form_body.insert("From", &self.options.from_number);
        form_body.insert("Body", body);

        let response = self
            .client
            .post(url)
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .headers(headers)
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<MessageResponse>()
            .await
            .map_err(|e| TwilioError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whatsapp_address_adds_prefix() {
        assert_eq!(
            TwilioService::whatsapp_address("+919876543210"),
            "whatsapp:+919876543210"
        );
    }

    #[test]
    fn whatsapp_address_keeps_existing_prefix() {
        assert_eq!(
            TwilioService::whatsapp_address("whatsapp:+919876543210"),
            "whatsapp:+919876543210"
        );
    }

    #[test]
    fn service_exposes_account_sid() {
        let service = TwilioService::new(TwilioOptions {
            account_sid: "AC123".into(),
            auth_token: "token".into(),
            from_number: "whatsapp:+14155238886".into(),
        });
        assert_eq!(service.account_sid(), "AC123");
    }
}
