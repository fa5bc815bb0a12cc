//! The command channel contract and its typed convenience layer.

use async_trait::async_trait;
use relay_core_types::{ContextStatus, TabId};

use crate::commands::{Snippet, SnippetResult};
use crate::error::ChannelError;

/// A tab known to the channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabInfo {
    pub id: TabId,
    pub url: Option<String>,
}

/// The only gateway for reading or mutating remote-context state.
///
/// Each call carries exactly one snippet; a failed call means the step did not happen.
#[async_trait]
pub trait CommandChannel: Send + Sync {
    async fn execute(&self, tab: &TabId, snippet: &Snippet)
        -> Result<SnippetResult, ChannelError>;

    /// Opens a new tab on `url` and returns its handle.
    async fn open_tab(&self, url: &str) -> Result<TabId, ChannelError>;

    /// Points an existing tab at `url`.
    async fn navigate(&self, tab: &TabId, url: &str) -> Result<(), ChannelError>;

    async fn list_tabs(&self) -> Result<Vec<TabInfo>, ChannelError>;
}

/// Typed helpers over [`CommandChannel::execute`].
#[async_trait]
pub trait ChannelExt: CommandChannel {
    async fn flag(&self, tab: &TabId, snippet: &Snippet) -> Result<bool, ChannelError> {
        let result = self.execute(tab, snippet).await?;
        result.flag().ok_or(ChannelError::UnexpectedShape {
            kind: snippet.kind(),
            value: format!("{result:?}"),
        })
    }

    async fn text(&self, tab: &TabId, snippet: &Snippet) -> Result<Option<String>, ChannelError> {
        match self.execute(tab, snippet).await? {
            SnippetResult::Text(text) => Ok(text),
            other => Err(ChannelError::UnexpectedShape {
                kind: snippet.kind(),
                value: format!("{other:?}"),
            }),
        }
    }

    async fn exists(&self, tab: &TabId, selector: &str) -> Result<bool, ChannelError> {
        self.flag(tab, &Snippet::exists(selector)).await
    }

    async fn location(&self, tab: &TabId) -> Result<String, ChannelError> {
        self.text(tab, &Snippet::Location)
            .await?
            .ok_or_else(|| ChannelError::remote("tab has no location"))
    }

    /// Reads the tab's load status. An unreadable tab is reported as `Unknown`.
    async fn status(&self, tab: &TabId) -> ContextStatus {
        match self.text(tab, &Snippet::ReadyState).await {
            Ok(Some(state)) => ContextStatus::from_ready_state(&state),
            Ok(None) | Err(_) => ContextStatus::Unknown,
        }
    }
}

impl<T: CommandChannel + ?Sized> ChannelExt for T {}
