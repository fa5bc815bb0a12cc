//! Shapes read from the archive API. Unknown fields are ignored.

use relay_core_types::GameId;
use serde::{Deserialize, Serialize};

/// `GET .../games/archives`: page urls, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveIndex {
    pub archives: Vec<String>,
}

/// `GET <archive-url>`: the games of one page, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivePage {
    pub games: Vec<ArchiveEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub url: String,
    #[serde(default)]
    pub pgn: Option<String>,
}

impl ArchiveEntry {
    pub fn game_id(&self) -> Option<GameId> {
        GameId::from_url(&self.url)
    }
}
