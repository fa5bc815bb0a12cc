use std::fmt;

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use thiserror::Error;

/// Errors raised while interpreting identifiers handed over by the browser or the archive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("no game id in url '{0}'")]
    NoGameId(String),
    #[error("invalid game id '{0}'")]
    InvalidGameId(String),
}

static GAME_URL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"https?://(?:[^./?#]+\.)*chess\.com/(?:[^./?#]+/)*(\d+)").ok());

static BLACK_TAG: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#"\[Black\s+"([^"]+)"\]"#).ok());

/// Opaque handle for a rendering surface (a browser tab).
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TabId(pub String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Navigation/load status of a remote context.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContextStatus {
    Loading,
    Ready,
    Unknown,
}

impl ContextStatus {
    /// Maps a `document.readyState` value onto a status.
    pub fn from_ready_state(state: &str) -> Self {
        match state {
            "loading" => ContextStatus::Loading,
            "interactive" | "complete" => ContextStatus::Ready,
            _ => ContextStatus::Unknown,
        }
    }

    pub fn is_loading(self) -> bool {
        matches!(self, ContextStatus::Loading)
    }
}

/// Numeric identifier of a game on the source site.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct GameId(String);

impl GameId {
    /// Accepts either a bare numeric id or a game url.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Ok(Self(trimmed.to_string()));
        }
        if trimmed.contains("://") {
            return Self::from_url(trimmed).ok_or_else(|| CoreError::NoGameId(trimmed.into()));
        }
        Err(CoreError::InvalidGameId(trimmed.into()))
    }

    /// Extracts the id from a game url, ignoring its query string.
    pub fn from_url(url: &str) -> Option<Self> {
        let without_query = url.split('?').next().unwrap_or(url);
        GAME_URL
            .as_ref()?
            .captures(without_query)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A game's serialized move record.
///
/// The black-side player is parsed from the `[Black "..."]` tag the first time it is
/// asked for; a record without the tag has an unknown black player.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct GameRecord {
    pub id: String,
    pub move_text: String,
    #[cfg_attr(feature = "serde-full", serde(skip))]
    black_player: OnceCell<Option<String>>,
}

impl GameRecord {
    pub fn new(id: impl Into<String>, move_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            move_text: move_text.into(),
            black_player: OnceCell::new(),
        }
    }

    pub fn black_player(&self) -> Option<&str> {
        self.black_player
            .get_or_init(|| {
                BLACK_TAG
                    .as_ref()?
                    .captures(&self.move_text)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
            })
            .as_deref()
    }
}

impl PartialEq for GameRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.move_text == other.move_text
    }
}

impl Eq for GameRecord {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_live_and_daily_urls() {
        let live = GameId::from_url("https://www.chess.com/game/live/123456789?tab=review");
        assert_eq!(live.map(|id| id.0), Some("123456789".to_string()));

        let daily = GameId::from_url("https://chess.com/game/daily/42");
        assert_eq!(daily.map(|id| id.0), Some("42".to_string()));
    }

    #[test]
    fn rejects_foreign_hosts_and_missing_ids() {
        assert!(GameId::from_url("https://lichess.org/game/123").is_none());
        assert!(GameId::from_url("https://www.chess.com/home").is_none());
        assert!(GameId::from_url("https://www.chess.com/?id=12").is_none());
    }

    #[test]
    fn parse_accepts_bare_ids_and_urls() {
        assert_eq!(GameId::parse(" 55 ").unwrap().as_str(), "55");
        assert_eq!(
            GameId::parse("https://www.chess.com/game/live/55").unwrap().as_str(),
            "55"
        );
        assert_eq!(
            GameId::parse("abc"),
            Err(CoreError::InvalidGameId("abc".into()))
        );
        assert!(matches!(
            GameId::parse("https://www.chess.com/member/bob"),
            Err(CoreError::NoGameId(_))
        ));
    }

    #[test]
    fn black_player_is_parsed_from_tag() {
        let record = GameRecord::new("55", "[White \"alice\"]\n[Black \"bob\"]\n\n1. e4 e5");
        assert_eq!(record.black_player(), Some("bob"));
        // second call hits the cached value
        assert_eq!(record.black_player(), Some("bob"));
    }

    #[test]
    fn missing_black_tag_is_unknown() {
        let record = GameRecord::new("1", "1. d4 d5 2. c4");
        assert_eq!(record.black_player(), None);
    }

    #[test]
    fn ready_state_mapping() {
        assert_eq!(ContextStatus::from_ready_state("loading"), ContextStatus::Loading);
        assert_eq!(ContextStatus::from_ready_state("interactive"), ContextStatus::Ready);
        assert_eq!(ContextStatus::from_ready_state("complete"), ContextStatus::Ready);
        assert_eq!(ContextStatus::from_ready_state(""), ContextStatus::Unknown);
    }
}
