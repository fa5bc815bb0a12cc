use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use archive_client::HttpArchiveFetcher;
use cdp_adapter::{ChromiumChannel, CommandChannel, TabInfo};
use clap::Args;
use game_relay::{metrics, RelayConfig, SessionOrchestrator, TriggerOutcome};
use relay_core_types::{GameId, TabId};
use tracing::info;

#[derive(Args, Clone, Debug)]
pub struct AnalyseArgs {
    /// DevTools target id of the source tab (default: first tab showing a game)
    #[arg(long)]
    pub tab: Option<String>,

    /// DevTools endpoint, overriding the configuration
    #[arg(long)]
    pub debugger_url: Option<String>,

    /// Print Prometheus metrics after the run
    #[arg(long)]
    pub print_metrics: bool,
}

pub async fn cmd_analyse(args: AnalyseArgs, mut config: RelayConfig) -> Result<bool> {
    if let Some(url) = args.debugger_url {
        config.browser.debugger_url = url;
    }
    metrics::register_metrics();

    let endpoint = config.browser.debugger_url.clone();
    let channel = ChromiumChannel::connect(&endpoint)
        .await
        .with_context(|| format!("Failed to connect to browser at {endpoint}"))?;
    let channel: Arc<dyn CommandChannel> = Arc::new(channel);

    let tabs = channel.list_tabs().await.context("Failed to list tabs")?;
    let tab = pick_source_tab(&tabs, args.tab.as_deref()).ok_or_else(|| match &args.tab {
        Some(id) => anyhow!("Tab {id} is not open"),
        None => anyhow!("No open tab shows a game"),
    })?;
    info!(%tab, "source tab selected");

    let fetcher = Arc::new(HttpArchiveFetcher::new(config.http_timeout())?);
    let orchestrator = SessionOrchestrator::new(channel, fetcher, config);

    let outcome = orchestrator.trigger(&tab).await;
    match &outcome {
        TriggerOutcome::Completed(report) => println!(
            "game {} relayed to tab {} ({} record{})",
            report.game_id.as_ref().map_or("without id", GameId::as_str),
            report.target_tab,
            report.origin.as_str(),
            if report.flipped { ", flipped" } else { "" }
        ),
        TriggerOutcome::AlreadyRunning => println!("a relay for tab {tab} is already running"),
        TriggerOutcome::Failed { state, error, .. } => {
            eprintln!("relay failed while {state}: {error}")
        }
    }

    if args.print_metrics {
        print!("{}", metrics::gather_text()?);
    }
    Ok(outcome.is_success())
}

/// The requested tab if it is open, else the first tab whose url carries a game id.
fn pick_source_tab(tabs: &[TabInfo], requested: Option<&str>) -> Option<TabId> {
    match requested {
        Some(id) => tabs
            .iter()
            .find(|tab| tab.id.as_str() == id)
            .map(|tab| tab.id.clone()),
        None => tabs
            .iter()
            .find(|tab| tab.url.as_deref().and_then(GameId::from_url).is_some())
            .map(|tab| tab.id.clone()),
    }
}
