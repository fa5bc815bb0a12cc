//! UI step primitives for remote tabs
//!
//! This crate provides the synchronization layer between page mutations and page rendering:
//! - A readiness poller that evaluates a predicate until it holds or a timeout elapses
//! - Wait-then-act helpers (`wait_and_click`, `require`) built on the poller
//! - A settle wait that blocks while a tab is still loading
//! - A best-effort diagnostics sink writing to the tab's own console

pub mod diagnostics;
pub mod errors;
mod primitives;
pub mod types;
mod waiting;

pub use diagnostics::*;
pub use errors::*;
pub use primitives::*;
pub use types::*;
pub use waiting::*;
