use std::{collections::HashSet, sync::Arc};

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::{models::GameRecord, slug::slugify};

/// In-memory record list shared between the query engine and the router.
///
/// The list is swapped as a whole on reload; readers holding an older
/// snapshot keep a consistent view.
#[derive(Clone, Default)]
pub struct RecordStore {
    inner: Arc<RwLock<Arc<Vec<GameRecord>>>>,
}

impl RecordStore {
    /// Empty store, as seen before the first load resolves.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store populated with `records`.
    pub fn with_records(records: Vec<GameRecord>) -> Self {
        let store = Self::new();
        store.replace(records);
        store
    }

    /// Replace the whole list. Later duplicates of an id are dropped.
    pub fn replace(&self, records: Vec<GameRecord>) {
        let mut seen = HashSet::with_capacity(records.len());
        let records: Vec<_> = records
            .into_iter()
            .filter(|record| {
                let fresh = seen.insert(record.id);
                if !fresh {
                    warn!(id = record.id, title = %record.title, "Dropping record with duplicate id");
                }
                fresh
            })
            .collect();
        info!(total = records.len(), "Catalog replaced");
        *self.inner.write() = Arc::new(records);
    }

    /// Snapshot of every record in insertion order.
    pub fn all(&self) -> Arc<Vec<GameRecord>> {
        self.inner.read().clone()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether no records are loaded.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Record with the given id.
    pub fn find_by_id(&self, id: u64) -> Option<GameRecord> {
        self.inner
            .read()
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    /// First record, in store order, whose title slugifies to `slug`.
    pub fn find_by_slug(&self, slug: &str) -> Option<GameRecord> {
        self.inner
            .read()
            .iter()
            .find(|record| slugify(&record.title) == slug)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_games;

    #[test]
    fn slug_lookup_round_trips_for_distinct_titles() {
        let store = RecordStore::with_records(sample_games());
        for record in store.all().iter() {
            let found = store
                .find_by_slug(&slugify(&record.title))
                .expect("slug resolves");
            assert_eq!(Some(found.id), store.find_by_id(record.id).map(|r| r.id));
        }
    }

    #[test]
    fn colliding_slugs_resolve_to_first_in_store_order() {
        let mut games = sample_games();
        let mut twin = games[2].clone();
        twin.id = 99;
        twin.title = "MINECRAFT!".to_string();
        games.insert(0, twin);
        let store = RecordStore::with_records(games);

        assert_eq!(store.find_by_slug("minecraft").map(|r| r.id), Some(99));
    }

    #[test]
    fn replace_swaps_snapshot_and_drops_duplicate_ids() {
        let store = RecordStore::new();
        assert!(store.is_empty());
        assert!(store.find_by_slug("minecraft").is_none());

        let old = store.all();
        let mut games = sample_games();
        let mut dup = games[0].clone();
        dup.title = "Duplicate".to_string();
        games.push(dup);
        store.replace(games);

        assert!(old.is_empty());
        assert_eq!(store.len(), 10);
        assert_eq!(
            store.find_by_id(1).map(|r| r.title),
            Some("The Legend of Zelda: Breath of the Wild".to_string())
        );
    }
}
