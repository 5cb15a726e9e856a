use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Which LLM backend is tried first when synthesizing metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Gemini,
}

impl FromStr for AiProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            other => anyhow::bail!("Unknown AI_PROVIDER: {}", other),
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// Outbound messaging gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagingProvider {
    Twilio,
    Meta,
}

impl FromStr for MessagingProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twilio" => Ok(Self::Twilio),
            "meta" => Ok(Self::Meta),
            other => anyhow::bail!("Unknown WEBHOOK_PROVIDER: {}", other),
        }
    }
}

impl fmt::Display for MessagingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Twilio => write!(f, "twilio"),
            Self::Meta => write!(f, "meta"),
        }
    }
}

pub const DEFAULT_META_VERIFY_TOKEN: &str = "social_saver_token";
pub const DEFAULT_TWILIO_WHATSAPP_NUMBER: &str = "whatsapp:+14155238886";

/// Application configuration loaded from environment variables.
///
/// Every external credential is optional. Missing credentials switch the
/// matching component into its degraded mode (in-memory storage, no AI
/// providers, demo notifications) instead of failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub ai_provider: AiProvider,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub rapidapi_key: Option<String>,
    pub rapidapi_host: Option<String>,
    pub webhook_provider: MessagingProvider,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_whatsapp_number: String,
    pub meta_access_token: Option<String>,
    pub meta_phone_number_id: Option<String>,
    pub meta_verify_token: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            database_url: credential("DATABASE_URL"),
            ai_provider: env::var("AI_PROVIDER")
                .unwrap_or_else(|_| "gemini".to_string())
                .parse()
                .context("AI_PROVIDER must be 'openai' or 'gemini'")?,
            openai_api_key: credential("OPENAI_API_KEY"),
            gemini_api_key: credential("GEMINI_API_KEY"),
            rapidapi_key: credential("RAPIDAPI_KEY"),
            rapidapi_host: credential("RAPIDAPI_HOST"),
            webhook_provider: env::var("WEBHOOK_PROVIDER")
                .unwrap_or_else(|_| "twilio".to_string())
                .parse()
                .context("WEBHOOK_PROVIDER must be 'twilio' or 'meta'")?,
            twilio_account_sid: credential("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: credential("TWILIO_AUTH_TOKEN"),
            twilio_whatsapp_number: env::var("TWILIO_WHATSAPP_NUMBER")
                .unwrap_or_else(|_| DEFAULT_TWILIO_WHATSAPP_NUMBER.to_string()),
            meta_access_token: credential("META_ACCESS_TOKEN"),
            meta_phone_number_id: credential("META_PHONE_NUMBER_ID"),
            meta_verify_token: env::var("META_VERIFY_TOKEN")
                .unwrap_or_else(|_| DEFAULT_META_VERIFY_TOKEN.to_string()),
        })
    }

    /// Configuration with every credential absent. Useful for local demos
    /// and tests.
    pub fn demo() -> Self {
        Self {
            port: 8000,
            database_url: None,
            ai_provider: AiProvider::Gemini,
            openai_api_key: None,
            gemini_api_key: None,
            rapidapi_key: None,
            rapidapi_host: None,
            webhook_provider: MessagingProvider::Twilio,
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_whatsapp_number: DEFAULT_TWILIO_WHATSAPP_NUMBER.to_string(),
            meta_access_token: None,
            meta_phone_number_id: None,
            meta_verify_token: DEFAULT_META_VERIFY_TOKEN.to_string(),
        }
    }
}

/// Read an optional credential. Empty values and `.env.example` placeholders
/// count as unset.
fn credential(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| is_real_credential(v))
}

pub(crate) fn is_real_credential(value: &str) -> bool {
    !value.is_empty() && !value.contains("placeholder")
}
