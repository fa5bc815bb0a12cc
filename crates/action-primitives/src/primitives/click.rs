//! Click primitive - click an element once it has rendered

use crate::{errors::ActionError, primitives::DefaultActionPrimitives};
use cdp_adapter::Snippet;
use relay_core_types::TabId;
use std::time::Instant;
use tracing::{debug, info};

impl DefaultActionPrimitives {
    /// Waits for `selector` and clicks it.
    ///
    /// Returns `Ok(false)` when the element never appeared (the click was skipped and a
    /// diagnostic was written); a channel failure during the click is an error.
    pub async fn wait_and_click(&self, tab: &TabId, selector: &str) -> Result<bool, ActionError> {
        let start = Instant::now();

        if !self.appears(tab, selector).await {
            debug!(%tab, selector, "click skipped; element never appeared");
            return Ok(false);
        }

        self.run(tab, &Snippet::click(selector)).await?;

        info!(
            %tab,
            selector,
            latency_ms = start.elapsed().as_millis() as u64,
            "Click completed"
        );
        Ok(true)
    }

    /// Like [`wait_and_click`](Self::wait_and_click) but the element is mandatory
    pub async fn require_and_click(&self, tab: &TabId, selector: &str) -> Result<(), ActionError> {
        if self.wait_and_click(tab, selector).await? {
            Ok(())
        } else {
            Err(ActionError::ElementNotFound(selector.to_string()))
        }
    }
}
