//! Reads from the source page: which game, whose archive, who is watching.

use std::sync::Arc;

use cdp_adapter::{ChannelError, ChannelExt, CommandChannel, Snippet};
use relay_core_types::{GameId, TabId};
use tracing::debug;

use crate::selectors::source as sel;

#[derive(Clone)]
pub struct SourcePage {
    channel: Arc<dyn CommandChannel>,
}

impl SourcePage {
    pub fn new(channel: Arc<dyn CommandChannel>) -> Self {
        Self { channel }
    }

    /// Game id embedded in the tab's current location.
    pub async fn game_id(&self, tab: &TabId) -> Result<Option<GameId>, ChannelError> {
        let location = self.channel.location(tab).await?;
        let id = GameId::from_url(&location);
        debug!(%tab, %location, game = ?id.as_ref().map(GameId::as_str), "source location read");
        Ok(id)
    }

    /// Name of the player whose game is displayed, from the first identity element present.
    pub async fn player_name(&self, tab: &TabId) -> Result<Option<String>, ChannelError> {
        for selector in sel::PLAYER_NAME {
            if !self.channel.exists(tab, selector).await? {
                continue;
            }
            let text = self.channel.text(tab, &Snippet::read_text(selector)).await?;
            if let Some(name) = non_empty(text) {
                return Ok(Some(name));
            }
        }
        Ok(None)
    }

    /// Account logged in on the source site; unreadable means unknown.
    pub async fn logged_in_identity(&self, tab: &TabId) -> Option<String> {
        let snippet = Snippet::read_attribute(sel::IDENTITY, sel::IDENTITY_ATTRIBUTE);
        match self.channel.text(tab, &snippet).await {
            Ok(text) => non_empty(text),
            Err(err) => {
                debug!(%tab, %err, "logged-in identity unreadable");
                None
            }
        }
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}
