use thiserror::Error;

/// Why a fetch failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchCause {
    #[error("http status {0}")]
    Status(u16),
    #[error("transport: {0}")]
    Transport(String),
    #[error("malformed body: {0}")]
    Body(String),
}

/// A failed GET against the archive API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to fetch {url}: {cause}")]
pub struct FetchError {
    pub url: String,
    #[source]
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(url: impl Into<String>, cause: FetchCause) -> Self {
        Self {
            url: url.into(),
            cause,
        }
    }

    pub fn body(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(url, FetchCause::Body(message.into()))
    }
}
