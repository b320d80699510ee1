/// Errors raised while fetching from the catalogue API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalogue API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unreadable catalogue response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
