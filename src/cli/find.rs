use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use archive_client::{index_url, HttpArchiveFetcher, SearchOutcome, TimedSearch};
use clap::Args;
use game_relay::RelayConfig;
use relay_core_types::GameId;
use tracing::info;

#[derive(Args, Clone, Debug)]
pub struct FindArgs {
    /// Player whose archive is searched
    #[arg(long)]
    pub player: String,

    /// Game id or game url
    #[arg(long)]
    pub game: String,

    /// Search budget in milliseconds
    #[arg(long)]
    pub time_limit_ms: Option<u64>,

    /// Number of newest archive pages fetched up front
    #[arg(long)]
    pub recent: Option<usize>,
}

pub async fn cmd_find(args: FindArgs, config: &RelayConfig) -> Result<bool> {
    let game = GameId::parse(&args.game).context("Invalid game id")?;
    let mut config = config.clone();
    if let Some(limit) = args.time_limit_ms {
        config.search.time_limit_ms = limit;
    }
    if let Some(recent) = args.recent {
        config.search.recent_pages = recent;
    }

    let index = index_url(&config.source.archive_api_base, &args.player)
        .context("Invalid archive API base url")?;
    let fetcher = Arc::new(HttpArchiveFetcher::new(config.http_timeout())?);
    let search = TimedSearch::new(fetcher);

    let started = Instant::now();
    let outcome = search
        .find(&index, &game, config.search_budget())
        .await
        .context("Archive lookup failed")?;
    let latency_ms = started.elapsed().as_millis() as u64;

    match outcome {
        SearchOutcome::Found(record) => {
            info!(game = %game, latency_ms, black = ?record.black_player(), "game found");
            println!("{}", record.move_text);
            Ok(true)
        }
        SearchOutcome::NotFound => {
            eprintln!("game {game} not found in {}'s archive", args.player);
            Ok(false)
        }
        SearchOutcome::TimeExceeded => {
            eprintln!(
                "time limit of {}ms exceeded before game {game} was found",
                config.search.time_limit_ms
            );
            Ok(false)
        }
    }
}
