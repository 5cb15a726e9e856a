use serde::Deserialize;
use serde_json::Value;

/// Wrapper for RapidAPI responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
}

/// A single post (image, carousel, or reel) from `/v1/post_info`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInfo {
    /// Either a plain string or an object with a `text` field, depending on
    /// the upstream API version.
    #[serde(default)]
    pub caption: Option<Value>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub display_url: Option<String>,
    #[serde(default)]
    pub owner: Option<PostOwner>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostOwner {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl PostInfo {
    /// Caption text, whichever shape the API used.
    pub fn caption_text(&self) -> Option<&str> {
        match self.caption.as_ref()? {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("text").and_then(Value::as_str),
            _ => None,
        }
        .filter(|s| !s.trim().is_empty())
    }

    /// Preview image, preferring the dedicated thumbnail.
    pub fn image_url(&self) -> Option<&str> {
        self.thumbnail_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.display_url.as_deref().filter(|s| !s.is_empty()))
    }

    pub fn owner_username(&self) -> Option<&str> {
        self.owner.as_ref()?.username.as_deref()
    }
}
