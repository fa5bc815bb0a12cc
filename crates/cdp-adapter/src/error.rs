//! Error surfaced by the command channel.

use relay_core_types::TabId;
use thiserror::Error;

/// A failed remote step. Callers treat the step as not performed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The tab is not (or no longer) attached to the channel.
    #[error("tab {0} is not attached")]
    UnknownTab(TabId),

    /// The remote context rejected or failed the evaluation (navigated away, unloaded,
    /// script exception).
    #[error("remote execution failed: {0}")]
    Remote(String),

    /// The evaluation succeeded but returned a value of the wrong shape.
    #[error("unexpected result for {kind}: {value}")]
    UnexpectedShape { kind: &'static str, value: String },

    /// The DevTools connection itself could not be established or used.
    #[error("devtools connection failed: {0}")]
    Connection(String),
}

impl ChannelError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }
}
