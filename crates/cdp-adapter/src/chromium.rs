//! Command channel backed by a running Chromium reached over DevTools.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use relay_core_types::TabId;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::channel::{CommandChannel, TabInfo};
use crate::commands::{Snippet, SnippetResult};
use crate::error::ChannelError;
use crate::metrics;
use crate::registry::TabRegistry;

/// Attachment to an existing browser; the browser outlives the channel.
pub struct ChromiumChannel {
    browser: Mutex<Browser>,
    registry: TabRegistry<Page>,
    handler: JoinHandle<()>,
}

impl ChromiumChannel {
    /// Connects to the DevTools endpoint (`ws://` or `http://host:port`) and attaches to
    /// the tabs that are already open.
    pub async fn connect(endpoint: &str) -> Result<Self, ChannelError> {
        let (browser, mut handler) = Browser::connect(endpoint)
            .await
            .map_err(|err| ChannelError::Connection(err.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!(?err, "devtools handler reported an error");
                }
            }
        });

        let channel = Self {
            browser: Mutex::new(browser),
            registry: TabRegistry::new(),
            handler,
        };

        {
            let mut browser = channel.browser.lock().await;
            if let Err(err) = browser.fetch_targets().await {
                warn!(?err, "failed to discover existing targets");
            }
        }
        // attachment to discovered targets completes asynchronously on the handler
        sleep(Duration::from_millis(250)).await;

        let tabs = channel.refresh().await?;
        info!(endpoint, tabs = tabs.len(), "attached to browser");
        Ok(channel)
    }

    /// Re-reads the browser's page list into the registry.
    pub async fn refresh(&self) -> Result<Vec<TabInfo>, ChannelError> {
        let pages = {
            let browser = self.browser.lock().await;
            browser
                .pages()
                .await
                .map_err(|err| ChannelError::Connection(err.to_string()))?
        };

        let mut tabs = Vec::with_capacity(pages.len());
        for page in pages {
            let id = tab_id(&page);
            let url = page.url().await.ok().flatten();
            self.registry.insert(id.clone(), page);
            tabs.push(TabInfo { id, url });
        }

        let live: Vec<TabId> = tabs.iter().map(|info| info.id.clone()).collect();
        let closed = self.registry.retain_live(&live);
        if closed > 0 {
            debug!(closed, "forgot closed tabs");
        }
        Ok(tabs)
    }

    fn page(&self, tab: &TabId) -> Result<Page, ChannelError> {
        self.registry
            .get(tab)
            .ok_or_else(|| ChannelError::UnknownTab(tab.clone()))
    }

    async fn evaluate(&self, page: &Page, expression: String) -> Result<Value, ChannelError> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(ChannelError::Remote)?;

        let result = page
            .evaluate_expression(params)
            .await
            .map_err(|err| ChannelError::remote(err.to_string()))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl CommandChannel for ChromiumChannel {
    async fn execute(
        &self,
        tab: &TabId,
        snippet: &Snippet,
    ) -> Result<SnippetResult, ChannelError> {
        let kind = snippet.kind();
        let page = self.page(tab)?;
        let start = Instant::now();

        let outcome = match self.evaluate(&page, snippet.to_expression()).await {
            Ok(value) => snippet.decode(value),
            Err(err) => Err(err),
        };

        metrics::observe_command(kind, start.elapsed(), outcome.is_ok());
        if let Err(err) = &outcome {
            debug!(%tab, kind, selector = ?snippet.selector(), %err, "snippet failed");
        }
        outcome
    }

    async fn open_tab(&self, url: &str) -> Result<TabId, ChannelError> {
        let page = {
            let browser = self.browser.lock().await;
            browser
                .new_page(url)
                .await
                .map_err(|err| ChannelError::remote(err.to_string()))?
        };
        let id = tab_id(&page);
        self.registry.insert(id.clone(), page);
        info!(tab = %id, url, "opened tab");
        Ok(id)
    }

    async fn navigate(&self, tab: &TabId, url: &str) -> Result<(), ChannelError> {
        let page = self.page(tab)?;
        page.goto(url)
            .await
            .map_err(|err| ChannelError::remote(err.to_string()))?;
        Ok(())
    }

    async fn list_tabs(&self) -> Result<Vec<TabInfo>, ChannelError> {
        self.refresh().await
    }
}

impl Drop for ChromiumChannel {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

fn tab_id(page: &Page) -> TabId {
    TabId::new(page.target_id().inner().clone())
}
