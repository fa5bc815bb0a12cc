//! Per-tab in-flight guard.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use relay_core_types::TabId;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
}

/// Source tabs with a run in flight. A tab is present exactly while its run lasts.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    in_flight: Arc<DashMap<TabId, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `tab` in flight, or returns `None` if it already is.
    pub fn try_begin(&self, tab: &TabId, run_id: Uuid) -> Option<SessionGuard> {
        match self.in_flight.entry(tab.clone()) {
            Entry::Occupied(held) => {
                let entry = held.get();
                debug!(
                    %tab,
                    held_by = %entry.run_id,
                    running_ms = (Utc::now() - entry.started_at).num_milliseconds(),
                    "tab already has a run in flight"
                );
                None
            }
            Entry::Vacant(slot) => {
                slot.insert(SessionEntry {
                    run_id,
                    started_at: Utc::now(),
                });
                Some(SessionGuard {
                    in_flight: self.in_flight.clone(),
                    tab: tab.clone(),
                })
            }
        }
    }

    pub fn is_in_flight(&self, tab: &TabId) -> bool {
        self.in_flight.contains_key(tab)
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }
}

/// Clears the tab's in-flight mark when dropped, whichever way the run ends.
pub struct SessionGuard {
    in_flight: Arc<DashMap<TabId, SessionEntry>>,
    tab: TabId,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.in_flight.remove(&self.tab);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_refused_until_guard_drops() {
        let sessions = SessionRegistry::new();
        let tab = TabId::new("source-1");

        let guard = sessions.try_begin(&tab, Uuid::new_v4()).unwrap();
        assert!(sessions.is_in_flight(&tab));
        assert!(sessions.try_begin(&tab, Uuid::new_v4()).is_none());

        drop(guard);
        assert!(!sessions.is_in_flight(&tab));
        assert!(sessions.try_begin(&tab, Uuid::new_v4()).is_some());
    }

    #[test]
    fn distinct_tabs_are_independent() {
        let sessions = SessionRegistry::new();
        let _a = sessions.try_begin(&TabId::new("a"), Uuid::new_v4()).unwrap();
        let _b = sessions.try_begin(&TabId::new("b"), Uuid::new_v4()).unwrap();
        assert_eq!(sessions.len(), 2);
    }
}
