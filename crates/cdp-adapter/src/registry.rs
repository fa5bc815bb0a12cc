//! Registry of tabs attached to a channel.

use dashmap::DashMap;
use relay_core_types::TabId;

/// Concurrent map from tab handles to whatever the backend uses to reach them.
pub struct TabRegistry<P> {
    tabs: DashMap<TabId, P>,
}

impl<P: Clone> TabRegistry<P> {
    pub fn new() -> Self {
        Self {
            tabs: DashMap::new(),
        }
    }

    pub fn insert(&self, tab: TabId, handle: P) {
        self.tabs.insert(tab, handle);
    }

    pub fn get(&self, tab: &TabId) -> Option<P> {
        self.tabs.get(tab).map(|entry| entry.value().clone())
    }

    /// Forgets every tab not in `live`. Returns how many were dropped.
    pub fn retain_live(&self, live: &[TabId]) -> usize {
        let before = self.tabs.len();
        self.tabs.retain(|tab, _| live.contains(tab));
        before - self.tabs.len()
    }
}

impl<P: Clone> Default for TabRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
