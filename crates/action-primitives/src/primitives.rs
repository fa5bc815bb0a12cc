//! Action primitives implementation
//!
//! The UI steps every page script is assembled from:
//! 1. require - wait for an element that must exist, or fail
//! 2. wait_and_click - click an element once it exists, skip when it never shows up
//! 3. wait_until_settled - block while a tab's document is still loading
//! 4. navigate - point a tab at a new location

mod click;
mod navigate;

pub use click::*;
pub use navigate::*;

use crate::{errors::ActionError, types::Predicate, waiting::ReadinessPoller};
use cdp_adapter::{ChannelError, CommandChannel, Snippet, SnippetResult};
use relay_core_types::TabId;
use std::sync::Arc;
use tracing::debug;

/// Default implementation of the UI step primitives
#[derive(Clone)]
pub struct DefaultActionPrimitives {
    poller: ReadinessPoller,
}

impl DefaultActionPrimitives {
    pub fn new(poller: ReadinessPoller) -> Self {
        Self { poller }
    }

    pub fn poller(&self) -> &ReadinessPoller {
        &self.poller
    }

    pub fn channel(&self) -> &Arc<dyn CommandChannel> {
        self.poller.channel()
    }

    /// Runs one snippet; the step counts as not performed on error
    pub async fn run(&self, tab: &TabId, snippet: &Snippet) -> Result<SnippetResult, ChannelError> {
        debug!(%tab, kind = snippet.kind(), selector = ?snippet.selector(), "running snippet");
        self.channel().execute(tab, snippet).await
    }

    /// Waits for an optional element; `false` means the branch should be skipped
    pub async fn appears(&self, tab: &TabId, selector: &str) -> bool {
        self.poller.wait_for(tab, &Predicate::element(selector)).await
    }

    /// Waits for an element the current step cannot proceed without
    pub async fn require(&self, tab: &TabId, selector: &str) -> Result<(), ActionError> {
        if self.appears(tab, selector).await {
            Ok(())
        } else {
            Err(ActionError::ElementNotFound(selector.to_string()))
        }
    }
}
