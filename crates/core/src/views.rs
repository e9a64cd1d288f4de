//! Featured, recent and statistics views derived from the record list.

use std::collections::HashSet;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::models::GameRecord;

/// Default length of the "recent releases" strip.
pub const DEFAULT_RECENT_LIMIT: usize = 6;

/// Source of randomness for featured/random selection.
///
/// Seed it in tests to make selection reproducible.
pub struct Picker {
    rng: StdRng,
}

impl Picker {
    /// Deterministic picker.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Picker seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform index into a collection of `len` items.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.gen_range(0..len))
    }
}

impl Default for Picker {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// First record flagged `featured`, otherwise a random one.
///
/// Not idempotent when nothing is flagged.
pub fn featured(records: &[GameRecord], picker: &mut Picker) -> Option<GameRecord> {
    records
        .iter()
        .find(|record| record.featured)
        .cloned()
        .or_else(|| random(records, picker))
}

/// Uniformly random record.
pub fn random(records: &[GameRecord], picker: &mut Picker) -> Option<GameRecord> {
    picker
        .pick_index(records.len())
        .and_then(|idx| records.get(idx))
        .cloned()
}

/// The `n` most recently released records, newest first.
///
/// Records with unparseable dates sort last; ties keep store order.
pub fn recent(records: &[GameRecord], n: usize) -> Vec<GameRecord> {
    let mut sorted: Vec<&GameRecord> = records.iter().collect();
    // Reverse on the Option so `None` ends up after every real date.
    sorted.sort_by(|a, b| b.released_on().cmp(&a.released_on()));
    sorted.into_iter().take(n).cloned().collect()
}

/// Catalog-wide counters shown on the home page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of records.
    pub count: usize,
    /// Number of distinct developer strings.
    pub distinct_developers: usize,
    /// Number of distinct platform strings across all records.
    pub distinct_platforms: usize,
}

/// Count records, developers and platforms.
pub fn statistics(records: &[GameRecord]) -> Statistics {
    let developers: HashSet<&str> = records.iter().map(|r| r.developer.as_str()).collect();
    let platforms: HashSet<&str> = records
        .iter()
        .flat_map(|r| r.platforms.iter().map(String::as_str))
        .collect();
    Statistics {
        count: records.len(),
        distinct_developers: developers.len(),
        distinct_platforms: platforms.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_games;

    fn bare(id: u64, developer: &str, platforms: &[&str], release_date: &str) -> GameRecord {
        GameRecord {
            id,
            title: format!("Game {id}"),
            developer: developer.to_string(),
            publisher: String::new(),
            release_date: release_date.to_string(),
            platforms: platforms.iter().map(|p| p.to_string()).collect(),
            genre: String::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            description: String::new(),
            rating: String::new(),
            image_url: None,
            featured: false,
        }
    }

    #[test]
    fn statistics_count_distinct_values() {
        let records = vec![
            bare(1, "A", &["X"], "2020-01-01"),
            bare(2, "A", &["X", "Y"], "2020-01-01"),
            bare(3, "B", &["Z"], "2020-01-01"),
        ];
        assert_eq!(
            statistics(&records),
            Statistics {
                count: 3,
                distinct_developers: 2,
                distinct_platforms: 3,
            }
        );
        assert_eq!(statistics(&[]), Statistics::default());
    }

    #[test]
    fn featured_prefers_flagged_record() {
        let mut picker = Picker::seeded(7);
        let games = sample_games();
        for _ in 0..5 {
            assert_eq!(featured(&games, &mut picker).map(|r| r.id), Some(1));
        }
    }

    #[test]
    fn featured_falls_back_to_a_member_of_the_store() {
        let mut games = sample_games();
        games.iter_mut().for_each(|record| record.featured = false);
        let mut picker = Picker::from_entropy();
        for _ in 0..20 {
            let picked = featured(&games, &mut picker).expect("non-empty store");
            assert!(games.iter().any(|record| record.id == picked.id));
        }
        assert!(featured(&[], &mut picker).is_none());
    }

    #[test]
    fn seeded_pickers_agree() {
        let games = sample_games();
        let mut first = Picker::seeded(42);
        let mut second = Picker::seeded(42);
        for _ in 0..10 {
            assert_eq!(
                random(&games, &mut first).map(|r| r.id),
                random(&games, &mut second).map(|r| r.id)
            );
        }
    }

    #[test]
    fn recent_sorts_newest_first_with_stable_ties() {
        let records = vec![
            bare(1, "A", &[], "2019-05-01"),
            bare(2, "A", &[], "not a date"),
            bare(3, "A", &[], "2021-01-01"),
            bare(4, "A", &[], "2019-05-01"),
        ];
        let ids: Vec<_> = recent(&records, 6).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 4, 2]);

        let ids: Vec<_> = recent(&sample_games(), DEFAULT_RECENT_LIMIT)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2, 9, 8, 10, 4, 7]);
    }
}
