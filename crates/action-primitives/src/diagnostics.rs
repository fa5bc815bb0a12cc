//! Diagnostics written to the acting tab's console

use cdp_adapter::{CommandChannel, Snippet};
use relay_core_types::TabId;
use std::sync::Arc;
use tracing::{debug, info};

/// Prefix of every console line
pub const CONSOLE_PREFIX: &str = "[game-relay]";

/// Best-effort console sink scoped to a tab
#[derive(Clone)]
pub struct Diagnostics {
    channel: Arc<dyn CommandChannel>,
}

impl Diagnostics {
    pub fn new(channel: Arc<dyn CommandChannel>) -> Self {
        Self { channel }
    }

    /// Writes `message` to the tab's console. Never fails.
    pub async fn report(&self, tab: &TabId, message: &str) {
        info!(%tab, message, "diagnostic");
        let line = format!("{CONSOLE_PREFIX}: {message}");
        if let Err(err) = self
            .channel
            .execute(tab, &Snippet::console_log(line))
            .await
        {
            debug!(%tab, %err, "could not write diagnostic to tab console");
        }
    }
}
