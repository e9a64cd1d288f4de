//! Title to URL-fragment slugs.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::GameRecord;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").expect("invalid slug character regex"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));
static HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("invalid hyphen regex"));

/// Derive the routing slug for a title.
///
/// Lowercases, drops everything outside `[a-z0-9]`, whitespace and hyphens,
/// turns whitespace runs into a hyphen, collapses hyphen runs and trims
/// hyphens from both ends. The output is a fixed point of this function.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = DISALLOWED.replace_all(&lowered, "");
    let hyphenated = WHITESPACE.replace_all(&stripped, "-");
    let collapsed = HYPHENS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Shareable fragment for a record (`#game/<slug>`).
pub fn game_url(record: &GameRecord) -> String {
    format!("#game/{}", slugify(&record.title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugifies_titles() {
        assert_eq!(
            slugify("The Legend of Zelda: Breath of the Wild"),
            "the-legend-of-zelda-breath-of-the-wild"
        );
        assert_eq!(slugify("God of War (2018)"), "god-of-war-2018");
        assert_eq!(slugify("  Spider - Man  "), "spider-man");
        assert_eq!(slugify("Pokémon Red"), "pokmon-red");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_is_idempotent() {
        for title in [
            "The Witcher 3: Wild Hunt",
            "Animal Crossing: New Horizons",
            "--Edge--Case--",
            "tabs\tand\nnewlines",
            "Xbox Series X/S",
        ] {
            let once = slugify(title);
            assert_eq!(slugify(&once), once, "not idempotent for {title:?}");
        }
    }
}
