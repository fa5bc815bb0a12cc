//! Manual extraction: reads the move record out of the source page's share panel.

use action_primitives::DefaultActionPrimitives;
use cdp_adapter::{ChannelExt, Snippet};
use relay_core_types::{GameId, GameRecord, TabId};
use tracing::{info, warn};

use crate::errors::RelayResult;
use crate::selectors::source as sel;

/// Slower UI-driven path used when the archive lookup yields nothing.
#[derive(Clone)]
pub struct ManualExtraction {
    primitives: DefaultActionPrimitives,
}

impl ManualExtraction {
    pub fn new(primitives: DefaultActionPrimitives) -> Self {
        Self { primitives }
    }

    /// Opens the share panel, switches it to the move-record tab and reads the field.
    ///
    /// `Ok(None)` when the field never shows up or is empty. Each step is a separate
    /// channel call; a channel failure aborts the extraction.
    pub async fn extract(&self, tab: &TabId, id: Option<&GameId>) -> RelayResult<Option<GameRecord>> {
        let p = &self.primitives;

        p.wait_and_click(tab, sel::SHARE).await?;
        p.wait_and_click(tab, sel::SHARE_PGN_TAB).await?;

        if p.appears(tab, sel::SHARE_PGN_TOGGLE).await {
            p.run(tab, &Snippet::set_checked(sel::SHARE_PGN_TOGGLE_INPUT, true))
                .await?;
        }

        if !p.appears(tab, sel::PGN_FIELD).await {
            warn!(%tab, "move record field never appeared");
            return Ok(None);
        }

        let text = p
            .channel()
            .text(tab, &Snippet::read_value(sel::PGN_FIELD))
            .await?;
        p.wait_and_click(tab, sel::SHARE_CLOSE).await?;

        let Some(move_text) = text.filter(|t| !t.trim().is_empty()) else {
            warn!(%tab, "move record field was empty");
            return Ok(None);
        };

        info!(%tab, bytes = move_text.len(), "move record read from page");
        let id = id.map(GameId::as_str).unwrap_or_default();
        Ok(Some(GameRecord::new(id, move_text)))
    }
}
