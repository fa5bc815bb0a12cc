//! Game relay library
//!
//! Moves a chess game from the page it is shown on to an analysis board. The move record
//! is looked up in the player's public archive under a time budget, or read out of the
//! page itself when that fails, then pasted into the analysis site.

pub mod config;
pub mod errors;
pub mod extraction;
pub mod indicator;
pub mod metrics;
pub mod orchestrator;
pub mod selectors;
pub mod source;

pub use config::RelayConfig;
pub use errors::{RelayError, RelayResult};
pub use orchestrator::{RunReport, RunState, SessionOrchestrator, TriggerOutcome};
