//! Error types for action primitives

use cdp_adapter::ChannelError;
use relay_core_types::TabId;
use thiserror::Error;

/// Failures of a required UI step
#[derive(Debug, Error, Clone)]
pub enum ActionError {
    /// A required element never appeared within its wait budget
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// The tab kept loading past the settle timeout
    #[error("Tab {tab} still loading after {waited_ms}ms")]
    NotSettled { tab: TabId, waited_ms: u64 },

    /// Refused to navigate to a non-web location
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The remote context could not perform the step
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

impl ActionError {
    /// Whether the failure came from the remote context rather than from page content
    pub fn is_channel(&self) -> bool {
        matches!(self, ActionError::Channel(_))
    }
}
