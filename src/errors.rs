//! Error taxonomy of a relay run

use action_primitives::ActionError;
use archive_client::FetchError;
use cdp_adapter::ChannelError;
use relay_core_types::TabId;
use thiserror::Error;

use crate::orchestrator::RunState;

#[derive(Debug, Error)]
pub enum RelayError {
    /// A required element never appeared within its wait budget
    #[error("Cannot find `{0}` element")]
    ElementNotFound(String),

    /// Neither the archive nor the page itself yielded a move record
    #[error("Game not found")]
    GameNotFound,

    #[error("Tab {tab} still loading after {waited_ms}ms")]
    NotSettled { tab: TabId, waited_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Illegal run transition {from} -> {to}")]
    InvalidTransition { from: RunState, to: RunState },

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl From<ActionError> for RelayError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::ElementNotFound(selector) => RelayError::ElementNotFound(selector),
            ActionError::NotSettled { tab, waited_ms } => RelayError::NotSettled { tab, waited_ms },
            ActionError::InvalidUrl(url) => RelayError::InvalidUrl(url),
            ActionError::Channel(err) => RelayError::Channel(err),
        }
    }
}

pub type RelayResult<T> = Result<T, RelayError>;
