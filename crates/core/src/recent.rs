//! Recently viewed games, persisted through a [`StringStore`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{models::GameRecord, storage::StringStore};

/// Key the serialised list is stored under.
pub const RECENTLY_VIEWED_KEY: &str = "recentlyViewed";
/// Maximum number of remembered views.
pub const RECENTLY_VIEWED_CAPACITY: usize = 5;

/// Bounded most-recently-used list of record snapshots, newest first.
///
/// Entries are copies taken when the view happened, so reloading the
/// catalog never rewrites history. Persistence failures are logged and
/// swallowed; the in-memory list stays authoritative for the session.
pub struct RecentlyViewed {
    entries: Vec<GameRecord>,
    store: Arc<dyn StringStore>,
}

impl RecentlyViewed {
    /// Restore the list from `store`. Missing or malformed data yields an empty list.
    pub fn load(store: Arc<dyn StringStore>) -> Self {
        let entries = match store.get(RECENTLY_VIEWED_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<GameRecord>>(&raw) {
                Ok(mut entries) => {
                    entries.truncate(RECENTLY_VIEWED_CAPACITY);
                    entries
                }
                Err(err) => {
                    warn!(%err, "Discarding malformed recently viewed list");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "Failed to read recently viewed list");
                Vec::new()
            }
        };
        debug!(count = entries.len(), "Recently viewed list restored");
        Self { entries, store }
    }

    /// Remember a view of `record`, moving an earlier view of the same id to the front.
    pub fn record_view(&mut self, record: &GameRecord) {
        self.entries.retain(|entry| entry.id != record.id);
        self.entries.insert(0, record.clone());
        self.entries.truncate(RECENTLY_VIEWED_CAPACITY);
        self.persist();
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> &[GameRecord] {
        &self.entries
    }

    /// Number of remembered views.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been viewed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every entry, in memory and in the store.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(err) = self.store.remove(RECENTLY_VIEWED_KEY) {
            warn!(%err, "Failed to clear persisted recently viewed list");
        }
    }

    fn persist(&self) {
        let serialised = match serde_json::to_string(&self.entries) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "Failed to serialise recently viewed list");
                return;
            }
        };
        if let Err(err) = self.store.set(RECENTLY_VIEWED_KEY, &serialised) {
            warn!(%err, "Failed to persist recently viewed list");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::sample_games, storage::MemoryStore};

    fn game(id: u64) -> GameRecord {
        sample_games()
            .into_iter()
            .find(|record| record.id == id)
            .expect("sample id")
    }

    #[test]
    fn deduplicates_and_moves_to_front() {
        let mut recent = RecentlyViewed::load(Arc::new(MemoryStore::new()));
        let (a, b) = (game(1), game(2));

        recent.record_view(&a);
        recent.record_view(&b);
        recent.record_view(&a);

        let ids: Vec<_> = recent.entries().iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn caps_at_capacity_dropping_oldest() {
        let mut recent = RecentlyViewed::load(Arc::new(MemoryStore::new()));
        for id in 1..=7 {
            recent.record_view(&game(id));
            assert!(recent.len() <= RECENTLY_VIEWED_CAPACITY);
        }
        let ids: Vec<_> = recent.entries().iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn survives_reload_through_store() {
        let store = Arc::new(MemoryStore::new());
        let mut recent = RecentlyViewed::load(store.clone());
        recent.record_view(&game(3));
        recent.record_view(&game(9));

        let restored = RecentlyViewed::load(store);
        let ids: Vec<_> = restored.entries().iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![9, 3]);
    }

    #[test]
    fn keeps_snapshot_values() {
        let store = Arc::new(MemoryStore::new());
        let mut recent = RecentlyViewed::load(store);
        let mut record = game(4);
        recent.record_view(&record);
        record.title = "Renamed".to_string();

        assert_eq!(recent.entries()[0].title, "Among Us");
    }

    #[test]
    fn malformed_data_yields_empty_list() {
        let store = Arc::new(MemoryStore::with_entry(RECENTLY_VIEWED_KEY, "{not json"));
        let recent = RecentlyViewed::load(store);
        assert!(recent.is_empty());
    }

    #[test]
    fn write_failures_are_swallowed() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_writes(true);
        let mut recent = RecentlyViewed::load(store.clone());

        recent.record_view(&game(5));
        recent.clear();
        recent.record_view(&game(6));

        assert_eq!(recent.entries()[0].id, 6);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn clear_removes_persisted_entry() {
        let store = Arc::new(MemoryStore::new());
        let mut recent = RecentlyViewed::load(store.clone());
        recent.record_view(&game(1));
        recent.clear();

        assert!(recent.is_empty());
        assert_eq!(store.get(RECENTLY_VIEWED_KEY).expect("readable"), None);
    }
}
