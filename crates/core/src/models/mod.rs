//! Shared domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::slug::slugify;

/// A single catalog entry as delivered by the catalog JSON document.
///
/// Records are immutable once loaded; the store replaces the whole list
/// instead of patching entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Stable identity key, unique across the store.
    pub id: u64,
    /// Display title, also the basis of the routing slug.
    pub title: String,
    /// Developer studio.
    #[serde(default)]
    pub developer: String,
    /// Publishing label.
    #[serde(default)]
    pub publisher: String,
    /// ISO 8601 release date (`YYYY-MM-DD`).
    #[serde(default)]
    pub release_date: String,
    /// Platforms in display order.
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Single genre, matched by equality when filtering.
    #[serde(default)]
    pub genre: String,
    /// Category labels used by the browse collections.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Free-form tags, searchable.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Long description, searchable.
    #[serde(default)]
    pub description: String,
    /// Content rating, treated as an opaque label.
    #[serde(default)]
    pub rating: String,
    /// Cover art location, display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Marks the record the home page should feature.
    #[serde(default, skip_serializing_if = "is_false")]
    pub featured: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl GameRecord {
    /// First four characters of the release date, or the whole date when shorter.
    pub fn year(&self) -> &str {
        self.release_date
            .get(..4)
            .unwrap_or(self.release_date.as_str())
    }

    /// Parsed release date; `None` when the stored string is not `YYYY-MM-DD`.
    pub fn released_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d").ok()
    }

    /// Routing slug derived from the title.
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    /// Short metadata line (`developer • year • genre`).
    pub fn meta_line(&self) -> String {
        [self.developer.as_str(), self.year(), self.genre.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let record: GameRecord = serde_json::from_str(
            r#"{"id": 7, "title": "Hades", "releaseDate": "2020-09-17", "imageUrl": "x.png"}"#,
        )
        .expect("valid record");

        assert_eq!(record.id, 7);
        assert_eq!(record.year(), "2020");
        assert_eq!(record.image_url.as_deref(), Some("x.png"));
        assert!(record.platforms.is_empty());
        assert!(!record.featured);
        assert_eq!(
            record.released_on(),
            NaiveDate::from_ymd_opt(2020, 9, 17)
        );
    }

    #[test]
    fn meta_line_skips_blank_parts() {
        let record: GameRecord =
            serde_json::from_str(r#"{"id": 1, "title": "X", "developer": "Studio"}"#)
                .expect("valid record");
        assert_eq!(record.meta_line(), "Studio");
        assert_eq!(record.year(), "");
    }
}
