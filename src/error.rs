use thiserror::Error;

/// Failures of the listing sources around the query core.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("eBay authentication failed with status {status}: {body}")]
    Auth { status: u16, body: String },

    #[error("upstream search failed with status {0}")]
    Upstream(u16),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
