use std::sync::Arc;

use cdp_adapter::{CommandChannel, Snippet};
use relay_core_types::TabId;
use tracing::trace;

use crate::selectors::source::LOADING;

/// The source page's loading overlay. It may be absent, so every failure is swallowed.
#[derive(Clone)]
pub struct LoadingIndicator {
    channel: Arc<dyn CommandChannel>,
}

impl LoadingIndicator {
    pub fn new(channel: Arc<dyn CommandChannel>) -> Self {
        Self { channel }
    }

    pub async fn show(&self, tab: &TabId) {
        self.set(tab, "flex").await;
    }

    pub async fn hide(&self, tab: &TabId) {
        self.set(tab, "none").await;
    }

    async fn set(&self, tab: &TabId, mode: &str) {
        if let Err(err) = self
            .channel
            .execute(tab, &Snippet::set_display(LOADING, mode))
            .await
        {
            trace!(%tab, %err, display = mode, "loading indicator unavailable");
        }
    }
}
