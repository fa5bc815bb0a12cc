//! Remote collection fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FetchCause, FetchError};
use crate::model::{ArchiveIndex, ArchivePage};

/// GET a JSON document. Errors are returned, never raised past this boundary.
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// Typed reads over [`ArchiveFetcher::fetch_json`]; a wrong shape is a `FetchError`.
#[async_trait]
pub trait ArchiveFetcherExt: ArchiveFetcher {
    async fn fetch_as<T>(&self, url: &str) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Send,
    {
        let value = self.fetch_json(url).await?;
        serde_json::from_value(value).map_err(|err| FetchError::body(url, err.to_string()))
    }

    async fn fetch_index(&self, url: &str) -> Result<ArchiveIndex, FetchError> {
        self.fetch_as(url).await
    }

    async fn fetch_page(&self, url: &str) -> Result<ArchivePage, FetchError> {
        self.fetch_as(url).await
    }
}

impl<T: ArchiveFetcher + ?Sized> ArchiveFetcherExt for T {}

/// `reqwest`-backed fetcher.
#[derive(Clone, Debug)]
pub struct HttpArchiveFetcher {
    client: Client,
}

impl HttpArchiveFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("game-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| {
                FetchError::new("", FetchCause::Transport(format!("failed to build HTTP client: {err}")))
            })?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArchiveFetcher for HttpArchiveFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!(url, "fetching archive document");
        let response = self.client.get(url).send().await.map_err(|err| {
            warn!(url, %err, "archive request failed");
            FetchError::new(url, FetchCause::Transport(err.to_string()))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "archive request rejected");
            return Err(FetchError::new(url, FetchCause::Status(status.as_u16())));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| FetchError::body(url, err.to_string()))
    }
}
