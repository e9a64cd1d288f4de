//! Search, faceted filtering and suggestions over a record list.
//!
//! Every match is a locale-naive, case-insensitive substring test. Results
//! keep the order of the input slice; nothing is relevance-ranked.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::GameRecord;

/// Default number of suggestions offered while typing.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn any_contains(values: &[String], needle: &str) -> bool {
    values.iter().any(|value| contains(value, needle))
}

/// Whether `record` contains `query`, ignoring case, in any searchable field.
pub fn matches(record: &GameRecord, query: &str) -> bool {
    matches_lowered(record, &query.to_lowercase())
}

fn matches_lowered(record: &GameRecord, needle: &str) -> bool {
    contains(&record.title, needle)
        || contains(&record.developer, needle)
        || contains(&record.publisher, needle)
        || contains(&record.genre, needle)
        || contains(&record.description, needle)
        || any_contains(&record.platforms, needle)
        || any_contains(&record.tags, needle)
}

fn suggestion_matches(record: &GameRecord, needle: &str) -> bool {
    contains(&record.title, needle)
        || contains(&record.developer, needle)
        || contains(&record.genre, needle)
}

/// Records containing `query` in title, developer, publisher, genre,
/// description, any platform or any tag.
///
/// An empty query matches nothing; callers are expected to short-circuit
/// before searching for it.
pub fn search(query: &str, records: &[GameRecord]) -> Vec<GameRecord> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| matches_lowered(record, &needle))
        .cloned()
        .collect()
}

/// Up to `limit` records matching `query` on title, developer or genre.
pub fn suggestions(query: &str, records: &[GameRecord], limit: usize) -> Vec<GameRecord> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| suggestion_matches(record, &needle))
        .take(limit)
        .cloned()
        .collect()
}

/// Facet selection. Unset (or blank) facets do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// Exact genre.
    pub genre: Option<String>,
    /// Substring of any platform, case-insensitive.
    pub platform: Option<String>,
    /// Prefix of the release date, normally a four-digit year.
    pub year: Option<String>,
}

impl Filters {
    /// Filters with only the genre facet set.
    pub fn genre(genre: impl Into<String>) -> Self {
        Self {
            genre: Some(genre.into()),
            ..Self::default()
        }
    }

    /// Filters with only the platform facet set.
    pub fn platform(platform: impl Into<String>) -> Self {
        Self {
            platform: Some(platform.into()),
            ..Self::default()
        }
    }

    /// Filters with only the year facet set.
    pub fn year(year: impl Into<String>) -> Self {
        Self {
            year: Some(year.into()),
            ..Self::default()
        }
    }

    /// Set the genre facet.
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Set the platform facet.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Set the year facet.
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    /// Whether no facet constrains the result.
    pub fn is_empty(&self) -> bool {
        active(&self.genre).is_none()
            && active(&self.platform).is_none()
            && active(&self.year).is_none()
    }

    /// Whether `record` passes every active facet.
    pub fn accepts(&self, record: &GameRecord) -> bool {
        if let Some(genre) = active(&self.genre) {
            if record.genre != genre {
                return false;
            }
        }
        if let Some(platform) = active(&self.platform) {
            let needle = platform.to_lowercase();
            if !any_contains(&record.platforms, &needle) {
                return false;
            }
        }
        if let Some(year) = active(&self.year) {
            if !record.release_date.starts_with(year) {
                return false;
            }
        }
        true
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}

/// Records passing every active facet in `filters`.
pub fn filter(records: &[GameRecord], filters: &Filters) -> Vec<GameRecord> {
    records
        .iter()
        .filter(|record| filters.accepts(record))
        .cloned()
        .collect()
}

/// Search then filter. With a blank query the facets apply to all `records`.
pub fn apply(query: &str, filters: &Filters, records: &[GameRecord]) -> Vec<GameRecord> {
    let query = query.trim();
    if query.is_empty() {
        filter(records, filters)
    } else {
        filter(&search(query, records), filters)
    }
}

/// Distinct facet values present in a record list, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Every genre.
    pub genres: Vec<String>,
    /// Every platform string.
    pub platforms: Vec<String>,
    /// Every release year.
    pub years: Vec<String>,
}

/// Collect the facet values offered for filtering.
pub fn facets(records: &[GameRecord]) -> Facets {
    let mut genres = BTreeSet::new();
    let mut platforms = BTreeSet::new();
    let mut years = BTreeSet::new();
    for record in records {
        if !record.genre.is_empty() {
            genres.insert(record.genre.clone());
        }
        platforms.extend(record.platforms.iter().cloned());
        if record.year().len() == 4 {
            years.insert(record.year().to_string());
        }
    }
    Facets {
        genres: genres.into_iter().collect(),
        platforms: platforms.into_iter().collect(),
        // Newest first, matching the year dropdown.
        years: years.into_iter().rev().collect(),
    }
}

/// Canned browse lists reachable from quick navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Released after 2023-01-01, newest first.
    NewReleases,
    /// Released before 2010-01-01.
    Classics,
    /// Category `indie`.
    Indie,
    /// Category `multiplayer`, or tagged `multiplayer`/`online`.
    Multiplayer,
}

impl Collection {
    /// All collections in menu order.
    pub const ALL: [Collection; 4] = [
        Collection::NewReleases,
        Collection::Classics,
        Collection::Indie,
        Collection::Multiplayer,
    ];

    /// Heading shown above the list.
    pub fn label(self) -> &'static str {
        match self {
            Collection::NewReleases => "New Releases",
            Collection::Classics => "Classic Games",
            Collection::Indie => "Indie Games",
            Collection::Multiplayer => "Multiplayer Games",
        }
    }

    /// Records belonging to the collection.
    pub fn select(self, records: &[GameRecord]) -> Vec<GameRecord> {
        match self {
            Collection::NewReleases => {
                let cutoff = NaiveDate::from_ymd_opt(2023, 1, 1);
                let mut selected: Vec<_> = records
                    .iter()
                    .filter(|record| record.released_on() > cutoff)
                    .cloned()
                    .collect();
                selected.sort_by(|a, b| b.released_on().cmp(&a.released_on()));
                selected
            }
            Collection::Classics => {
                let cutoff = NaiveDate::from_ymd_opt(2010, 1, 1);
                records
                    .iter()
                    .filter(|record| record.released_on().is_some_and(|date| Some(date) < cutoff))
                    .cloned()
                    .collect()
            }
            Collection::Indie => records
                .iter()
                .filter(|record| record.categories.iter().any(|c| c == "indie"))
                .cloned()
                .collect(),
            Collection::Multiplayer => records
                .iter()
                .filter(|record| {
                    record.categories.iter().any(|c| c == "multiplayer")
                        || record.tags.iter().any(|t| t == "multiplayer" || t == "online")
                })
                .cloned()
                .collect(),
        }
    }
}

/// A piece of display text, flagged when it matched the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight<'a> {
    /// Slice of the original text.
    pub text: &'a str,
    /// Whether this slice matched the query.
    pub matched: bool,
}

/// Split `text` into matched and unmatched runs of `query`, ignoring case.
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Highlight<'a>> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    let mut segments = Vec::new();
    if needle.is_empty() {
        if !text.is_empty() {
            segments.push(Highlight {
                text,
                matched: false,
            });
        }
        return segments;
    }

    let mut plain_start = 0;
    let mut cursor = 0;
    while cursor < text.len() {
        if let Some(len) = match_len(&text[cursor..], &needle) {
            if plain_start < cursor {
                segments.push(Highlight {
                    text: &text[plain_start..cursor],
                    matched: false,
                });
            }
            segments.push(Highlight {
                text: &text[cursor..cursor + len],
                matched: true,
            });
            cursor += len;
            plain_start = cursor;
        } else {
            cursor += text[cursor..].chars().next().map_or(1, char::len_utf8);
        }
    }
    if plain_start < text.len() {
        segments.push(Highlight {
            text: &text[plain_start..],
            matched: false,
        });
    }
    segments
}

// Byte length of the prefix of `haystack` that lowercases to `needle`.
fn match_len(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut lowered = Vec::with_capacity(needle.len());
    for (idx, ch) in haystack.char_indices() {
        lowered.extend(ch.to_lowercase());
        if lowered.len() > needle.len() || lowered[..] != needle[..lowered.len()] {
            return None;
        }
        if lowered.len() == needle.len() {
            return Some(idx + ch.len_utf8());
        }
    }
    None
}
