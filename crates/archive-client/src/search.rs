//! Deadline-bounded search over a paginated game archive.

use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use relay_core_types::{GameId, GameRecord};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::FetchError;
use crate::fetch::{ArchiveFetcher, ArchiveFetcherExt};
use crate::model::ArchivePage;

/// Builds `<base>/<player>/games/archives`, percent-encoding the player name.
pub fn index_url(api_base: &str, player: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(api_base)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push(player)
        .push("games")
        .push("archives");
    Ok(url.into())
}

/// Wall-clock limit plus how many of the newest pages are fetched eagerly.
#[derive(Clone, Copy, Debug)]
pub struct SearchBudget {
    pub deadline: Instant,
    pub recency_window: usize,
}

impl SearchBudget {
    pub fn starting_now(time_limit: Duration, recency_window: usize) -> Self {
        Self {
            deadline: Instant::now() + time_limit,
            recency_window,
        }
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(GameRecord),
    NotFound,
    TimeExceeded,
}

impl SearchOutcome {
    pub fn into_record(self) -> Option<GameRecord> {
        match self {
            SearchOutcome::Found(record) => Some(record),
            _ => None,
        }
    }
}

enum PageScan {
    Hit(GameRecord),
    /// The id matched but the entry carries no move text.
    Unusable,
    Miss,
}

/// Finds one game in a player's archive, newest pages first.
#[derive(Clone)]
pub struct TimedSearch {
    fetcher: Arc<dyn ArchiveFetcher>,
}

impl TimedSearch {
    pub fn new(fetcher: Arc<dyn ArchiveFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetches the index at `index_url`, then the newest `recency_window` pages concurrently.
    /// Older pages are only fetched while the deadline has not passed, and the deadline is
    /// checked again before each older page is scanned.
    #[instrument(skip(self, key, budget), fields(game = %key))]
    pub async fn find(
        &self,
        index_url: &str,
        key: &GameId,
        budget: SearchBudget,
    ) -> Result<SearchOutcome, FetchError> {
        let index = self.fetcher.fetch_index(index_url).await?;
        let split = index.archives.len().saturating_sub(budget.recency_window);
        let (older, recent) = index.archives.split_at(split);
        debug!(
            recent = recent.len(),
            older = older.len(),
            "archive index loaded"
        );

        let pages = self.fetch_pages(recent).await?;
        for page in pages.iter().rev() {
            match scan(page, key) {
                PageScan::Hit(record) => {
                    info!("game found in recent archives");
                    return Ok(SearchOutcome::Found(record));
                }
                PageScan::Unusable => return Ok(SearchOutcome::NotFound),
                PageScan::Miss => {}
            }
        }

        if older.is_empty() {
            return Ok(SearchOutcome::NotFound);
        }
        if budget.expired() {
            warn!("time limit reached before older archives");
            return Ok(SearchOutcome::TimeExceeded);
        }

        let pages = match timeout_at(budget.deadline, self.fetch_pages(older)).await {
            Ok(pages) => pages?,
            Err(_) => {
                warn!("time limit reached while fetching older archives");
                return Ok(SearchOutcome::TimeExceeded);
            }
        };
        for page in pages.iter().rev() {
            if budget.expired() {
                warn!("time limit reached while scanning older archives");
                return Ok(SearchOutcome::TimeExceeded);
            }
            match scan(page, key) {
                PageScan::Hit(record) => {
                    info!("game found in older archives");
                    return Ok(SearchOutcome::Found(record));
                }
                PageScan::Unusable => return Ok(SearchOutcome::NotFound),
                PageScan::Miss => {}
            }
        }

        Ok(SearchOutcome::NotFound)
    }

    async fn fetch_pages(&self, urls: &[String]) -> Result<Vec<ArchivePage>, FetchError> {
        try_join_all(urls.iter().map(|url| self.fetcher.fetch_page(url))).await
    }
}

/// Newest entry first; the first entry whose id matches decides.
fn scan(page: &ArchivePage, key: &GameId) -> PageScan {
    let Some(entry) = page
        .games
        .iter()
        .rev()
        .find(|entry| entry.game_id().as_ref() == Some(key))
    else {
        return PageScan::Miss;
    };

    match &entry.pgn {
        Some(pgn) => PageScan::Hit(GameRecord::new(key.as_str(), pgn.clone())),
        None => {
            warn!(url = %entry.url, "matching archive entry has no move text");
            PageScan::Unusable
        }
    }
}
