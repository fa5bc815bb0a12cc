//! Drives the analysis page: submission, then view configuration.

use std::time::Duration;

use action_primitives::DefaultActionPrimitives;
use cdp_adapter::{ChannelExt, Snippet};
use relay_core_types::{GameRecord, TabId};
use tracing::{debug, info};

use crate::errors::RelayResult;
use crate::selectors::target as sel;

#[derive(Clone)]
pub struct TargetPage {
    primitives: DefaultActionPrimitives,
    settle_timeout: Duration,
    orientation_suffix: String,
}

impl TargetPage {
    pub fn new(
        primitives: DefaultActionPrimitives,
        settle_timeout: Duration,
        orientation_suffix: impl Into<String>,
    ) -> Self {
        Self {
            primitives,
            settle_timeout,
            orientation_suffix: orientation_suffix.into(),
        }
    }

    /// Fills the paste form with the move record and submits it.
    pub async fn submit(&self, tab: &TabId, record: &GameRecord) -> RelayResult<()> {
        let p = &self.primitives;

        p.require(tab, sel::USE_ACCOUNT).await?;
        let logged_in = !p
            .channel()
            .flag(tab, &Snippet::is_disabled(sel::USE_ACCOUNT))
            .await?;
        if logged_in {
            p.require_and_click(tab, sel::USE_ACCOUNT).await?;
        } else {
            debug!(%tab, "no account on target; submitting anonymously");
        }

        p.require(tab, sel::PGN_INPUT).await?;
        // The value travels as a JSON literal inside the snippet, never as page source.
        p.run(tab, &Snippet::set_value(sel::PGN_INPUT, record.move_text.as_str()))
            .await?;
        p.require_and_click(tab, sel::SUBMIT).await?;

        info!(%tab, game = %record.id, logged_in, "move record submitted");
        Ok(())
    }

    /// Waits for the analysis view to finish loading and turns local evaluation on.
    pub async fn configure(&self, tab: &TabId) -> RelayResult<()> {
        let p = &self.primitives;

        p.wait_until_settled(tab, self.settle_timeout).await?;

        if !p.appears(tab, sel::EVAL_TOGGLE).await {
            return Ok(());
        }
        let enabled = p
            .channel()
            .flag(tab, &Snippet::is_checked(sel::EVAL_TOGGLE))
            .await?;
        if !enabled {
            p.wait_and_click(tab, sel::EVAL_TOGGLE_LABEL).await?;
        }
        Ok(())
    }

    /// Reloads the analysis view from black's side.
    pub async fn flip(&self, tab: &TabId) -> RelayResult<String> {
        let location = self.primitives.channel().location(tab).await?;
        let flipped = format!("{}{}", location, self.orientation_suffix);
        self.primitives.navigate(tab, &flipped).await?;
        Ok(flipped)
    }
}

/// The board is flipped only when the logged-in viewer played black.
pub fn should_flip(record: &GameRecord, logged_in: Option<&str>) -> bool {
    matches!(
        (record.black_player(), logged_in),
        (Some(black), Some(viewer)) if black == viewer
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PGN: &str = "[White \"alice\"]\n[Black \"Bob\"]\n\n1. e4 e5";

    #[test]
    fn flips_only_for_exact_black_match() {
        let record = GameRecord::new("1", PGN);
        assert!(should_flip(&record, Some("Bob")));
        assert!(!should_flip(&record, Some("bob")));
        assert!(!should_flip(&record, Some("alice")));
        assert!(!should_flip(&record, None));
    }

    #[test]
    fn unknown_black_never_flips() {
        let record = GameRecord::new("1", "1. e4 e5");
        assert!(!should_flip(&record, Some("Bob")));
    }
}
