//! Navigation primitives - settle waits and location changes

use crate::{errors::ActionError, primitives::DefaultActionPrimitives};
use cdp_adapter::ChannelExt;
use relay_core_types::{ContextStatus, TabId};
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, info};

impl DefaultActionPrimitives {
    /// Blocks until the tab's document is no longer loading.
    ///
    /// Polls at the poller's interval. Only a `loading` document keeps the wait going; an
    /// unreadable or unrecognised ready state counts as settled. A status read still
    /// pending at the deadline counts as loading.
    pub async fn wait_until_settled(
        &self,
        tab: &TabId,
        timeout: Duration,
    ) -> Result<ContextStatus, ActionError> {
        let started = Instant::now();
        let deadline = started + timeout;
        let interval = self.poller().options().interval();

        loop {
            let status = timeout_at(deadline, self.channel().status(tab))
                .await
                .unwrap_or(ContextStatus::Loading);
            if !status.is_loading() {
                debug!(
                    %tab,
                    ?status,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "tab settled"
                );
                return Ok(status);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(ActionError::NotSettled {
                    tab: tab.clone(),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }
            sleep(interval.min(deadline - now)).await;
        }
    }

    /// Points the tab at `url`
    pub async fn navigate(&self, tab: &TabId, url: &str) -> Result<(), ActionError> {
        if !is_navigable(url) {
            return Err(ActionError::InvalidUrl(url.to_string()));
        }
        self.channel().navigate(tab, url).await?;
        info!(%tab, url, "Navigate completed");
        Ok(())
    }
}

fn is_navigable(url: &str) -> bool {
    ["http://", "https://", "about:", "data:"]
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::is_navigable;

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(is_navigable("https://lichess.org/abcd1234/black"));
        assert!(is_navigable("http://localhost:8080/paste"));
        assert!(is_navigable("about:blank"));

        // Invalid URLs
        assert!(!is_navigable(""));
        assert!(!is_navigable("lichess.org"));
        assert!(!is_navigable("javascript:alert(1)"));
    }
}
