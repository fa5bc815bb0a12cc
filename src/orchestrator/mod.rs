//! Session orchestrator.
//!
//! One run relays the game shown in a source tab to a freshly opened analysis tab:
//!
//! ```text
//! Idle -> Retrieving -> Submitting -> Configuring -> Done
//!   ^________________________|_____________|__________|  (error or completion)
//! ```
//!
//! Runs are keyed by source tab; triggering a tab that already has a run in flight
//! does nothing.

mod session;
mod state;
mod target;

pub use session::{SessionEntry, SessionGuard, SessionRegistry};
pub use state::{RecordOrigin, RunMachine, RunReport, RunState, TriggerOutcome};
pub use target::{should_flip, TargetPage};

use std::sync::Arc;

use action_primitives::{DefaultActionPrimitives, Diagnostics, ReadinessPoller};
use archive_client::{index_url, ArchiveFetcher, SearchOutcome, TimedSearch};
use cdp_adapter::CommandChannel;
use relay_core_types::{GameId, GameRecord, TabId};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::errors::{RelayError, RelayResult};
use crate::extraction::ManualExtraction;
use crate::indicator::LoadingIndicator;
use crate::metrics;
use crate::source::SourcePage;

/// What the source tab told us before any record was looked up.
struct SourceReading {
    game_id: Option<GameId>,
    logged_in: Option<String>,
    record: Option<GameRecord>,
}

struct Retrieved {
    game_id: Option<GameId>,
    record: GameRecord,
    origin: RecordOrigin,
    logged_in: Option<String>,
}

pub struct SessionOrchestrator {
    channel: Arc<dyn CommandChannel>,
    config: RelayConfig,
    sessions: SessionRegistry,
    search: TimedSearch,
    source: SourcePage,
    extraction: ManualExtraction,
    target: TargetPage,
    indicator: LoadingIndicator,
    diagnostics: Diagnostics,
}

impl SessionOrchestrator {
    pub fn new(
        channel: Arc<dyn CommandChannel>,
        fetcher: Arc<dyn ArchiveFetcher>,
        config: RelayConfig,
    ) -> Self {
        let poller = ReadinessPoller::new(channel.clone(), config.poll_options());
        let diagnostics = poller.diagnostics().clone();
        let primitives = DefaultActionPrimitives::new(poller);

        Self {
            search: TimedSearch::new(fetcher),
            source: SourcePage::new(channel.clone()),
            extraction: ManualExtraction::new(primitives.clone()),
            target: TargetPage::new(
                primitives,
                config.settle_timeout(),
                config.target.orientation_suffix.clone(),
            ),
            indicator: LoadingIndicator::new(channel.clone()),
            sessions: SessionRegistry::new(),
            diagnostics,
            channel,
            config,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Runs the relay for `tab` unless a run for it is already in flight.
    pub async fn trigger(&self, tab: &TabId) -> TriggerOutcome {
        let run_id = Uuid::new_v4();
        let Some(_guard) = self.sessions.try_begin(tab, run_id) else {
            info!(%tab, "run already in flight; trigger ignored");
            metrics::record_run("already_running");
            return TriggerOutcome::AlreadyRunning;
        };

        let span = info_span!("relay_run", %run_id, %tab);
        let mut machine = RunMachine::new();
        let result = self.run(run_id, tab, &mut machine).instrument(span).await;

        let outcome = match result {
            Ok(report) => {
                info!(%run_id, %tab, flipped = report.flipped, "run completed");
                machine.reset();
                TriggerOutcome::Completed(report)
            }
            Err(err) => {
                let state = machine.reset();
                error!(%run_id, %tab, %state, error = %err, "run failed");
                self.diagnostics.report(tab, &err.to_string()).await;
                TriggerOutcome::Failed {
                    run_id,
                    state,
                    error: err,
                }
            }
        };
        metrics::record_run(outcome.label());
        outcome
    }

    async fn run(&self, run_id: Uuid, tab: &TabId, machine: &mut RunMachine) -> RelayResult<RunReport> {
        machine.advance(RunState::Retrieving)?;
        let Retrieved {
            game_id,
            record,
            origin,
            logged_in,
        } = self.retrieve(tab).await?;
        metrics::record_origin(origin.as_str());

        machine.advance(RunState::Submitting)?;
        let target_tab = self.channel.open_tab(&self.config.target.paste_url).await?;
        debug!(%target_tab, "target tab opened");
        self.target.submit(&target_tab, &record).await?;

        machine.advance(RunState::Configuring)?;
        self.target.configure(&target_tab).await?;

        let flipped = should_flip(&record, logged_in.as_deref());
        if flipped {
            let url = self.target.flip(&target_tab).await?;
            info!(%target_tab, %url, "board flipped to black");
        }
        machine.advance(RunState::Done)?;

        Ok(RunReport {
            run_id,
            source_tab: tab.clone(),
            target_tab,
            game_id,
            origin,
            flipped,
            states: machine.history().to_vec(),
        })
    }

    /// Archive first, page second. The loading indicator covers the archive phase.
    async fn retrieve(&self, tab: &TabId) -> RelayResult<Retrieved> {
        self.indicator.show(tab).await;
        let reading = self.read_source(tab).await;
        self.indicator.hide(tab).await;
        let SourceReading {
            game_id,
            logged_in,
            record,
        } = reading?;

        if let Some(record) = record {
            return Ok(Retrieved {
                game_id,
                record,
                origin: RecordOrigin::Archive,
                logged_in,
            });
        }

        let label = game_id.as_ref().map(GameId::as_str).unwrap_or("unknown");
        self.diagnostics
            .report(
                tab,
                &format!("Game with id {label} not found! Performing manual fetching."),
            )
            .await;

        match self.extraction.extract(tab, game_id.as_ref()).await? {
            Some(record) => Ok(Retrieved {
                game_id,
                record,
                origin: RecordOrigin::Manual,
                logged_in,
            }),
            None => Err(RelayError::GameNotFound),
        }
    }

    async fn read_source(&self, tab: &TabId) -> RelayResult<SourceReading> {
        let game_id = self.source.game_id(tab).await?;
        let player = self.source.player_name(tab).await?;
        let logged_in = self.source.logged_in_identity(tab).await;
        debug!(?player, ?logged_in, "source identities read");

        let record = match (&game_id, &player) {
            (Some(id), Some(player)) => self.search_archive(tab, player, id).await,
            _ => {
                debug!("no game id or player on source page; skipping archive");
                None
            }
        };

        Ok(SourceReading {
            game_id,
            logged_in,
            record,
        })
    }

    /// Archive failures never end the run; they only route it to manual extraction.
    async fn search_archive(&self, tab: &TabId, player: &str, id: &GameId) -> Option<GameRecord> {
        let index = match index_url(&self.config.source.archive_api_base, player) {
            Ok(url) => url,
            Err(err) => {
                warn!(%err, base = %self.config.source.archive_api_base, "bad archive base url");
                return None;
            }
        };

        match self.search.find(&index, id, self.config.search_budget()).await {
            Ok(SearchOutcome::Found(record)) => Some(record),
            Ok(SearchOutcome::NotFound) => None,
            Ok(SearchOutcome::TimeExceeded) => {
                self.diagnostics.report(tab, "Exceeded time limit!").await;
                None
            }
            Err(err) => {
                self.diagnostics.report(tab, &err.to_string()).await;
                None
            }
        }
    }
}
