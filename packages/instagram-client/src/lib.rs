//! Instagram post metadata client.
//!
//! Wraps the RapidAPI "instagram scraper" `post_info` endpoint. Given a post or
//! reel URL it returns caption, preview image, and owner.
//!
//! # Example
//!
//! ```rust,ignore
//! use instagram_client::InstagramClient;
//!
//! let client = InstagramClient::new("rapidapi-key".into(), None);
//! let post = client.post_info("https://www.instagram.com/reel/ABC123/").await?;
//! println!("{}", post.caption_text().unwrap_or("(no caption)"));
//! ```

pub mod error;
pub mod types;

pub use error::{InstagramError, Result};
pub use types::{PostInfo, PostOwner};

use std::time::Duration;

use types::ApiResponse;

pub const DEFAULT_HOST: &str = "instagram-scraper-api2.p.rapidapi.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct InstagramClient {
    client: reqwest::Client,
    api_key: String,
    host: String,
}

impl InstagramClient {
    pub fn new(api_key: String, host: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key,
            host: host
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Fetch metadata for a single post or reel.
    pub async fn post_info(&self, post_url: &str) -> Result<PostInfo> {
        let url = format!("https://{}/v1/post_info", self.host);

        tracing::debug!(post_url, host = %self.host, "Fetching Instagram post info");

        let resp = self
            .client
            .get(&url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
            .query(&[("url", post_url)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InstagramError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<PostInfo> = resp.json().await?;
        api_resp.data.ok_or(InstagramError::MissingData)
    }
}
