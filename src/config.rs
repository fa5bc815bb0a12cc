//! Relay configuration.
//!
//! Every field has a default, so an empty or missing YAML file is a valid configuration.

use std::env;
use std::time::Duration;

use action_primitives::PollOptions;
use archive_client::SearchBudget;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const ENV_DEBUGGER_URL: &str = "GAME_RELAY_DEBUGGER_URL";
pub const ENV_TIME_LIMIT_MS: &str = "GAME_RELAY_TIME_LIMIT_MS";
pub const ENV_RECENT_PAGES: &str = "GAME_RELAY_RECENT_PAGES";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub browser: BrowserSection,
    pub source: SourceSection,
    pub target: TargetSection,
    pub search: SearchSection,
    pub polling: PollingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSection {
    /// DevTools HTTP endpoint of a running Chromium
    pub debugger_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub archive_api_base: String,
    pub http_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSection {
    pub paste_url: String,
    /// Appended to the analysis url to view the board from black's side
    pub orientation_suffix: String,
    pub settle_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub time_limit_ms: u64,
    pub recent_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSection {
    pub timeout_ms: u64,
    pub interval_ms: u64,
}

impl Default for BrowserSection {
    fn default() -> Self {
        Self {
            debugger_url: "http://127.0.0.1:9222".to_string(),
        }
    }
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            archive_api_base: "https://api.chess.com/pub/player".to_string(),
            http_timeout_ms: 10_000,
        }
    }
}

impl Default for TargetSection {
    fn default() -> Self {
        Self {
            paste_url: "https://lichess.org/paste".to_string(),
            orientation_suffix: "/black".to_string(),
            settle_timeout_ms: 10_000,
        }
    }
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            time_limit_ms: 3_000,
            recent_pages: 3,
        }
    }
}

impl Default for PollingSection {
    fn default() -> Self {
        let defaults = PollOptions::default();
        Self {
            timeout_ms: defaults.timeout_ms,
            interval_ms: defaults.interval_ms,
        }
    }
}

impl RelayConfig {
    pub fn poll_options(&self) -> PollOptions {
        PollOptions::new(self.polling.timeout_ms, self.polling.interval_ms)
    }

    /// A fresh budget whose deadline starts counting now.
    pub fn search_budget(&self) -> SearchBudget {
        SearchBudget::starting_now(
            Duration::from_millis(self.search.time_limit_ms),
            self.search.recent_pages,
        )
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.source.http_timeout_ms)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.target.settle_timeout_ms)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    /// Applies overrides from `lookup`; unparsable values are ignored with a warning.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DEBUGGER_URL).filter(|value| !value.trim().is_empty()) {
            info!(url = %url, "debugger url overridden from environment");
            self.browser.debugger_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_TIME_LIMIT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(value) => self.search.time_limit_ms = value,
                Err(err) => warn!(key = ENV_TIME_LIMIT_MS, %raw, %err, "ignoring override"),
            }
        }

        if let Some(raw) = lookup(ENV_RECENT_PAGES) {
            match raw.trim().parse::<usize>() {
                Ok(value) => self.search.recent_pages = value,
                Err(err) => warn!(key = ENV_RECENT_PAGES, %raw, %err, "ignoring override"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: RelayConfig = serde_yaml::from_str(
            "search:\n  recent_pages: 5\ntarget:\n  paste_url: http://localhost:8080/paste\n",
        )
        .unwrap();

        assert_eq!(config.search.recent_pages, 5);
        assert_eq!(config.search.time_limit_ms, 3_000);
        assert_eq!(config.target.paste_url, "http://localhost:8080/paste");
        assert_eq!(config.target.orientation_suffix, "/black");
        assert_eq!(config.polling.interval_ms, 100);
    }

    #[test]
    fn empty_document_is_default() {
        let config: RelayConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, RelayConfig::default());
    }

    #[test]
    fn env_overrides_apply_and_bad_values_are_ignored() {
        let vars: HashMap<&str, &str> = [
            (ENV_DEBUGGER_URL, "http://10.0.0.2:9222"),
            (ENV_TIME_LIMIT_MS, "not-a-number"),
            (ENV_RECENT_PAGES, "1"),
        ]
        .into_iter()
        .collect();

        let mut config = RelayConfig::default();
        config.apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.browser.debugger_url, "http://10.0.0.2:9222");
        assert_eq!(config.search.time_limit_ms, 3_000);
        assert_eq!(config.search.recent_pages, 1);
    }
}
