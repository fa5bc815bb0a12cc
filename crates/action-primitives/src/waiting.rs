//! Readiness polling against a remote tab

use crate::{diagnostics::Diagnostics, types::PollOptions, types::Predicate};
use cdp_adapter::{CommandChannel, SnippetResult};
use relay_core_types::TabId;
use std::sync::Arc;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, warn};

/// Repeatedly evaluates a predicate until it holds or the wait budget runs out
///
/// Non-appearance is an ordinary outcome: the poller returns `false`, names the
/// predicate in a diagnostic and leaves the decision to the caller. Channel errors
/// during a wait count as "not yet", since the tab may be mid-navigation. Evaluations
/// are cut off at the deadline and the closing diagnostic gets half an interval, so a
/// hung tab cannot hold the wait past `timeout + interval`.
#[derive(Clone)]
pub struct ReadinessPoller {
    channel: Arc<dyn CommandChannel>,
    diagnostics: Diagnostics,
    options: PollOptions,
}

impl ReadinessPoller {
    pub fn new(channel: Arc<dyn CommandChannel>, options: PollOptions) -> Self {
        Self {
            diagnostics: Diagnostics::new(channel.clone()),
            channel,
            options,
        }
    }

    pub fn options(&self) -> PollOptions {
        self.options
    }

    pub fn channel(&self) -> &Arc<dyn CommandChannel> {
        &self.channel
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Waits with the poller's default budget
    pub async fn wait_for(&self, tab: &TabId, predicate: &Predicate) -> bool {
        self.wait_for_with(tab, predicate, self.options).await
    }

    /// Waits with an explicit budget
    pub async fn wait_for_with(
        &self,
        tab: &TabId,
        predicate: &Predicate,
        options: PollOptions,
    ) -> bool {
        let started = Instant::now();
        let deadline = started + options.timeout();
        let interval = options.interval();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match timeout_at(deadline, self.channel.execute(tab, predicate.snippet())).await {
                Ok(Ok(SnippetResult::Flag(true))) => {
                    debug!(
                        %tab,
                        %predicate,
                        attempts,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "predicate satisfied"
                    );
                    return true;
                }
                Ok(Ok(_)) => {}
                Ok(Err(err)) => {
                    debug!(%tab, %predicate, %err, "predicate evaluation failed; retrying");
                }
                Err(_) => {
                    debug!(%tab, %predicate, "predicate evaluation still pending at deadline");
                }
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            sleep(interval.min(deadline - now)).await;
        }

        warn!(
            %tab,
            %predicate,
            attempts,
            timeout_ms = options.timeout_ms,
            "predicate not satisfied before timeout"
        );
        let message = format!("Cannot find `{}` element!", predicate);
        if timeout_at(deadline + interval / 2, self.diagnostics.report(tab, &message))
            .await
            .is_err()
        {
            debug!(%tab, %predicate, "timeout diagnostic abandoned");
        }
        false
    }
}
