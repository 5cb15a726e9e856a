use thiserror::Error;

pub type Result<T> = std::result::Result<T, InstagramError>;

#[derive(Debug, Error)]
pub enum InstagramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RapidAPI error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response contained no post data")]
    MissingData,
}
