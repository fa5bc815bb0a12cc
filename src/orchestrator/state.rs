//! Run states and the transitions allowed between them.

use std::fmt;

use relay_core_types::{GameId, TabId};
use uuid::Uuid;

use crate::errors::{RelayError, RelayResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Idle,
    Retrieving,
    Submitting,
    Configuring,
    Done,
}

impl RunState {
    /// `Idle` is reachable from anywhere; everything else moves strictly forward.
    pub fn can_advance_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (_, Idle)
                | (Idle, Retrieving)
                | (Retrieving, Submitting)
                | (Submitting, Configuring)
                | (Configuring, Done)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Retrieving => "retrieving",
            RunState::Submitting => "submitting",
            RunState::Configuring => "configuring",
            RunState::Done => "done",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the current state of one run and every state it has entered.
#[derive(Debug, Clone)]
pub struct RunMachine {
    state: RunState,
    history: Vec<RunState>,
}

impl Default for RunMachine {
    fn default() -> Self {
        Self {
            state: RunState::Idle,
            history: vec![RunState::Idle],
        }
    }
}

impl RunMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    pub fn advance(&mut self, next: RunState) -> RelayResult<()> {
        if !self.state.can_advance_to(next) {
            return Err(RelayError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(from = %self.state, to = %next, "run state changed");
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Returns to `Idle`, keeping the state that was left for reporting.
    pub fn reset(&mut self) -> RunState {
        let left = self.state;
        if left != RunState::Idle {
            self.state = RunState::Idle;
            self.history.push(RunState::Idle);
        }
        left
    }
}

/// Where the move record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrigin {
    Archive,
    Manual,
}

impl RecordOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordOrigin::Archive => "archive",
            RecordOrigin::Manual => "manual",
        }
    }
}

/// Summary of a run that reached `Done`.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub source_tab: TabId,
    pub target_tab: TabId,
    /// `None` when the source page carried no game id and the record came from the page.
    pub game_id: Option<GameId>,
    pub origin: RecordOrigin,
    pub flipped: bool,
    pub states: Vec<RunState>,
}

#[derive(Debug)]
pub enum TriggerOutcome {
    /// Another run for the same tab is in flight; nothing was done.
    AlreadyRunning,
    Completed(RunReport),
    Failed {
        run_id: Uuid,
        /// State the run was in when it failed
        state: RunState,
        error: RelayError,
    },
}

impl TriggerOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            TriggerOutcome::AlreadyRunning => "already_running",
            TriggerOutcome::Completed(_) => "completed",
            TriggerOutcome::Failed { .. } => "failed",
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, TriggerOutcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_path_is_accepted() {
        let mut machine = RunMachine::new();
        for next in [
            RunState::Retrieving,
            RunState::Submitting,
            RunState::Configuring,
            RunState::Done,
            RunState::Idle,
        ] {
            machine.advance(next).unwrap();
        }
        assert_eq!(machine.history().len(), 6);
    }

    #[test]
    fn skipping_a_state_is_rejected() {
        let mut machine = RunMachine::new();
        machine.advance(RunState::Retrieving).unwrap();

        let err = machine.advance(RunState::Configuring).unwrap_err();
        assert!(matches!(
            err,
            RelayError::InvalidTransition {
                from: RunState::Retrieving,
                to: RunState::Configuring
            }
        ));
        assert_eq!(machine.state(), RunState::Retrieving);
    }

    #[test]
    fn reset_reports_the_state_left() {
        let mut machine = RunMachine::new();
        machine.advance(RunState::Retrieving).unwrap();
        machine.advance(RunState::Submitting).unwrap();

        assert_eq!(machine.reset(), RunState::Submitting);
        assert_eq!(machine.state(), RunState::Idle);
        assert_eq!(machine.reset(), RunState::Idle);
    }
}
