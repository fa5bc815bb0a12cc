use action_primitives::{ActionError, DefaultActionPrimitives, PollOptions, ReadinessPoller};
use async_trait::async_trait;
use cdp_adapter::{
    ChannelError, CommandChannel, ContextStatus, Snippet, SnippetResult, TabId, TabInfo,
};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A page whose element set and ready-state sequence are fixed up front.
#[derive(Default)]
struct StaticPage {
    present: HashSet<String>,
    ready_states: Mutex<VecDeque<&'static str>>,
    clicks: Mutex<Vec<String>>,
    broken_clicks: bool,
    unreadable_ready_state: bool,
    ready_state_latency: Duration,
}

impl StaticPage {
    fn with_elements(selectors: &[&str]) -> Self {
        Self {
            present: selectors.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl CommandChannel for StaticPage {
    async fn execute(&self, _tab: &TabId, snippet: &Snippet) -> Result<SnippetResult, ChannelError> {
        match snippet {
            Snippet::Exists { selector } => Ok(SnippetResult::Flag(self.present.contains(selector))),
            Snippet::Click { selector } => {
                if self.broken_clicks {
                    return Err(ChannelError::remote("tab closed"));
                }
                self.clicks.lock().unwrap().push(selector.clone());
                Ok(SnippetResult::Unit)
            }
            Snippet::ReadyState => {
                tokio::time::sleep(self.ready_state_latency).await;
                if self.unreadable_ready_state {
                    return Err(ChannelError::remote("cannot find context with specified id"));
                }
                let mut states = self.ready_states.lock().unwrap();
                let state = if states.len() > 1 {
                    states.pop_front()
                } else {
                    states.front().copied()
                };
                Ok(SnippetResult::Text(state.map(str::to_string)))
            }
            _ => Ok(SnippetResult::Unit),
        }
    }

    async fn open_tab(&self, _url: &str) -> Result<TabId, ChannelError> {
        Ok(TabId::new("opened"))
    }

    async fn navigate(&self, _tab: &TabId, _url: &str) -> Result<(), ChannelError> {
        Ok(())
    }

    async fn list_tabs(&self) -> Result<Vec<TabInfo>, ChannelError> {
        Ok(Vec::new())
    }
}

fn primitives(page: Arc<StaticPage>) -> DefaultActionPrimitives {
    DefaultActionPrimitives::new(ReadinessPoller::new(page, PollOptions::new(60, 10)))
}

#[tokio::test]
async fn wait_and_click_clicks_present_elements() {
    let page = Arc::new(StaticPage::with_elements(&[".submit"]));
    let actions = primitives(page.clone());

    assert!(actions.wait_and_click(&TabId::new("t"), ".submit").await.unwrap());
    assert_eq!(*page.clicks.lock().unwrap(), vec![".submit".to_string()]);
}

#[tokio::test]
async fn wait_and_click_skips_missing_elements() {
    let page = Arc::new(StaticPage::with_elements(&[]));
    let actions = primitives(page.clone());

    assert!(!actions.wait_and_click(&TabId::new("t"), ".share").await.unwrap());
    assert!(page.clicks.lock().unwrap().is_empty());

    let err = actions
        .require_and_click(&TabId::new("t"), ".share")
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::ElementNotFound(ref s) if s == ".share"));
}

#[tokio::test]
async fn click_failures_surface_as_channel_errors() {
    let page = Arc::new(StaticPage {
        broken_clicks: true,
        ..StaticPage::with_elements(&[".submit"])
    });
    let actions = primitives(page);

    let err = actions
        .wait_and_click(&TabId::new("t"), ".submit")
        .await
        .unwrap_err();
    assert!(err.is_channel());
}

#[tokio::test]
async fn settle_waits_out_loading_states() {
    let page = Arc::new(StaticPage::default());
    *page.ready_states.lock().unwrap() = VecDeque::from(vec!["loading", "loading", "complete"]);
    let actions = primitives(page);

    let status = actions
        .wait_until_settled(&TabId::new("t"), Duration::from_secs(1))
        .await
        .unwrap();
    assert!(!status.is_loading());
}

#[tokio::test]
async fn settle_gives_up_after_timeout() {
    let page = Arc::new(StaticPage::default());
    *page.ready_states.lock().unwrap() = VecDeque::from(vec!["loading"]);
    let actions = primitives(page);

    let err = actions
        .wait_until_settled(&TabId::new("t"), Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::NotSettled { .. }));
}

#[tokio::test]
async fn settle_accepts_an_unreadable_ready_state() {
    let page = Arc::new(StaticPage {
        unreadable_ready_state: true,
        ..StaticPage::default()
    });
    let actions = primitives(page);

    let status = actions
        .wait_until_settled(&TabId::new("t"), Duration::from_millis(200))
        .await
        .unwrap();
    assert_eq!(status, ContextStatus::Unknown);
}

#[tokio::test]
async fn settle_accepts_an_unrecognised_ready_state() {
    let page = Arc::new(StaticPage::default());
    *page.ready_states.lock().unwrap() = VecDeque::from(vec!["prerendering"]);
    let actions = primitives(page);

    let status = actions
        .wait_until_settled(&TabId::new("t"), Duration::from_millis(200))
        .await
        .unwrap();
    assert_eq!(status, ContextStatus::Unknown);
}

#[tokio::test]
async fn settle_does_not_outlast_a_hung_status_read() {
    let page = Arc::new(StaticPage {
        ready_state_latency: Duration::from_secs(1),
        ..StaticPage::default()
    });
    let actions = primitives(page);

    let start = std::time::Instant::now();
    let err = actions
        .wait_until_settled(&TabId::new("t"), Duration::from_millis(100))
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, ActionError::NotSettled { .. }));
    assert!(elapsed < Duration::from_millis(140), "overshot: {elapsed:?}");
}
