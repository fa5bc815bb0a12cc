//! Core data types for action primitives

use cdp_adapter::Snippet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Cadence and budget of a readiness wait
///
/// Defaults: 5000ms timeout, 100ms interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOptions {
    /// Total wait budget (milliseconds)
    pub timeout_ms: u64,

    /// Delay between predicate evaluations (milliseconds)
    pub interval_ms: u64,
}

impl PollOptions {
    pub fn new(timeout_ms: u64, interval_ms: u64) -> Self {
        Self {
            timeout_ms,
            interval_ms: interval_ms.max(1),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            interval_ms: 100,
        }
    }
}

/// A boolean question asked of a remote document
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    snippet: Snippet,
}

impl Predicate {
    /// Holds once an element matching `selector` exists
    pub fn element(selector: impl Into<String>) -> Self {
        Self {
            snippet: Snippet::exists(selector),
        }
    }

    pub fn snippet(&self) -> &Snippet {
        &self.snippet
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.snippet.selector() {
            Some(selector) => write!(f, "{}:{}", self.snippet.kind(), selector),
            None => f.write_str(self.snippet.kind()),
        }
    }
}
