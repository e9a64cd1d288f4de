#![allow(missing_docs)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Player profile shown in the widget header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    pub personaname: String,
    pub avatarfull: String,
    pub personastate: u8,
    pub profileurl: String,
}

impl Player {
    /// Human label for `personastate`; unknown codes read as offline.
    pub fn status_label(&self) -> &'static str {
        persona_state_label(self.personastate)
    }

    /// Whether the state counts as "online" for styling.
    pub fn is_online(&self) -> bool {
        matches!(self.personastate, 1 | 2 | 5 | 6)
    }
}

/// Library-wide totals. The text fields arrive preformatted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryStats {
    pub total_games: u32,
    pub total_playtime: String,
    pub most_played: String,
    pub average_playtime: String,
    pub games_never_played: u32,
    pub games_played_recently: u32,
}

/// A game from the player's library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnedGame {
    pub appid: u32,
    pub name: String,
    /// Minutes.
    pub playtime_forever: u32,
    /// Minutes in the last two weeks.
    pub playtime_2weeks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Comma separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metacritic_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_current: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_original: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_discount_percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements_count: Option<u32>,
}

impl OwnedGame {
    /// Total playtime as `Xh Ym` / `Ym`.
    pub fn playtime_label(&self) -> String {
        format_playtime(self.playtime_forever)
    }

    /// `+Nh this week` when there was recent play.
    pub fn recent_label(&self) -> Option<String> {
        self.playtime_2weeks
            .filter(|minutes| *minutes > 0)
            .map(|minutes| format!("+{}h this week", minutes / 60))
    }

    /// Current price, if known.
    pub fn price_label(&self) -> Option<String> {
        self.price_current.map(format_price)
    }

    /// First listed genre.
    pub fn primary_genre(&self) -> Option<&str> {
        self.genres
            .as_deref()
            .and_then(|genres| genres.split(',').next())
            .map(str::trim)
            .filter(|genre| !genre.is_empty())
    }
}

/// Achievement progress for one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementProgress {
    pub total: u32,
    pub unlocked: u32,
    pub percentage: f64,
}

/// A suggested purchase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    pub name: String,
    pub reason: String,
    pub score: u8,
    pub price: f64,
}

/// Everything the widget renders, as served by the widget endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetPayload {
    pub player: Player,
    pub stats: LibraryStats,
    pub recent_games: Vec<OwnedGame>,
    pub top_games: Vec<OwnedGame>,
    /// Keyed by app id.
    pub achievements: BTreeMap<u32, AchievementProgress>,
    pub recommendations: Vec<Recommendation>,
}

impl WidgetPayload {
    /// Unlocked and total achievements across every game, with the overall percentage.
    pub fn achievement_totals(&self) -> (u32, u32, f64) {
        let (unlocked, total) = self
            .achievements
            .values()
            .fold((0, 0), |(unlocked, total), progress| {
                (unlocked + progress.unlocked, total + progress.total)
            });
        let percentage = if total > 0 {
            f64::from(unlocked) / f64::from(total) * 100.0
        } else {
            0.0
        };
        (unlocked, total, percentage)
    }
}

/// Steam persona state code to label.
pub fn persona_state_label(state: u8) -> &'static str {
    match state {
        1 => "Online",
        2 => "Busy",
        3 => "Away",
        4 => "Snooze",
        5 => "Looking to trade",
        6 => "Looking to play",
        _ => "Offline",
    }
}

/// Minutes as `Xh Ym`, or `Ym` under an hour.
pub fn format_playtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours > 0 {
        format!("{hours}h {rest}m")
    } else {
        format!("{rest}m")
    }
}

/// `Free` for zero, otherwise dollars with cents.
pub fn format_price(price: f64) -> String {
    if price <= 0.0 {
        "Free".to_string()
    } else {
        format!("${price:.2}")
    }
}

fn game(appid: u32, name: &str, playtime_forever: u32) -> OwnedGame {
    OwnedGame {
        appid,
        name: name.to_string(),
        playtime_forever,
        ..OwnedGame::default()
    }
}

/// Canned payload shown when no endpoint is configured or it fails.
pub fn demo_payload() -> WidgetPayload {
    let counter_strike = OwnedGame {
        playtime_2weeks: Some(32),
        header_image: Some("https://cdn.cloudflare.steamstatic.com/steam/apps/730/header.jpg".into()),
        short_description: Some(
            "For over two decades, Counter-Strike has offered an elite competitive experience..."
                .into(),
        ),
        genres: Some("Action, Free to Play".into()),
        metacritic_score: Some(83),
        price_current: Some(0.0),
        achievements_count: Some(167),
        ..game(730, "Counter-Strike 2", 1847)
    };
    let cyberpunk = OwnedGame {
        playtime_2weeks: Some(28),
        header_image: Some(
            "https://cdn.cloudflare.steamstatic.com/steam/apps/1091500/header.jpg".into(),
        ),
        short_description: Some(
            "Cyberpunk 2077 is an open-world, action-adventure RPG set in the megalopolis of Night City..."
                .into(),
        ),
        genres: Some("RPG, Action, Adventure".into()),
        metacritic_score: Some(86),
        price_current: Some(29.99),
        price_original: Some(59.99),
        price_discount_percent: Some(50),
        achievements_count: Some(44),
        ..game(1091500, "Cyberpunk 2077", 156)
    };
    let baldurs_gate = OwnedGame {
        playtime_2weeks: Some(15),
        header_image: Some(
            "https://cdn.cloudflare.steamstatic.com/steam/apps/1086940/header.jpg".into(),
        ),
        short_description: Some(
            "Baldur's Gate 3 is a story-rich, party-based RPG set in the universe of Dungeons & Dragons..."
                .into(),
        ),
        genres: Some("RPG, Strategy, Adventure".into()),
        metacritic_score: Some(96),
        price_current: Some(59.99),
        achievements_count: Some(54),
        ..game(1086940, "Baldur's Gate 3", 89)
    };

    WidgetPayload {
        player: Player {
            personaname: "GameMaster Pro".into(),
            avatarfull: "https://avatars.steamstatic.com/b5bd56c1aa4644a474a2e4972be27ef9e82e517e_full.jpg"
                .into(),
            personastate: 1,
            profileurl: "https://steamcommunity.com/profiles/76561198123456789".into(),
        },
        stats: LibraryStats {
            total_games: 247,
            total_playtime: "3,847 hours".into(),
            most_played: "Counter-Strike 2".into(),
            average_playtime: "15.6 hours".into(),
            games_never_played: 23,
            games_played_recently: 12,
        },
        top_games: vec![
            OwnedGame {
                metacritic_score: Some(83),
                achievements_count: Some(167),
                ..game(730, "Counter-Strike 2", 1847)
            },
            OwnedGame {
                metacritic_score: Some(86),
                achievements_count: Some(44),
                ..game(1091500, "Cyberpunk 2077", 156)
            },
        ],
        recent_games: vec![counter_strike, cyberpunk, baldurs_gate],
        achievements: BTreeMap::from([
            (
                730,
                AchievementProgress {
                    total: 167,
                    unlocked: 89,
                    percentage: 53.3,
                },
            ),
            (
                1091500,
                AchievementProgress {
                    total: 44,
                    unlocked: 23,
                    percentage: 52.3,
                },
            ),
        ]),
        recommendations: vec![
            Recommendation {
                name: "The Witcher 3: Wild Hunt".into(),
                reason: "Based on your RPG preferences".into(),
                score: 93,
                price: 39.99,
            },
            Recommendation {
                name: "Elden Ring".into(),
                reason: "Highly rated action RPG".into(),
                score: 96,
                price: 59.99,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_display_values() {
        assert_eq!(format_playtime(1847), "30h 47m");
        assert_eq!(format_playtime(59), "59m");
        assert_eq!(format_playtime(0), "0m");
        assert_eq!(format_price(0.0), "Free");
        assert_eq!(format_price(29.99), "$29.99");
        assert_eq!(format_price(40.0), "$40.00");
        assert_eq!(persona_state_label(6), "Looking to play");
        assert_eq!(persona_state_label(42), "Offline");
    }

    #[test]
    fn demo_payload_totals() {
        let payload = demo_payload();
        let (unlocked, total, percentage) = payload.achievement_totals();
        assert_eq!((unlocked, total), (112, 211));
        assert!((percentage - 53.08).abs() < 0.01);

        let cyberpunk = &payload.recent_games[1];
        assert_eq!(cyberpunk.recent_label().as_deref(), Some("+0h this week"));
        assert_eq!(cyberpunk.primary_genre(), Some("RPG"));
        assert_eq!(payload.recent_games[0].price_label().as_deref(), Some("Free"));
        assert!(payload.player.is_online());
    }

    #[test]
    fn decodes_endpoint_json() -> anyhow::Result<()> {
        let payload: WidgetPayload = serde_json::from_str(
            r#"{
                "player": {"personaname": "Someone", "personastate": 3},
                "recentGames": [{"appid": 10, "name": "Half-Life", "playtime_forever": 61}],
                "achievements": {"10": {"total": 4, "unlocked": 1, "percentage": 25.0}}
            }"#,
        )?;
        assert_eq!(payload.player.status_label(), "Away");
        assert_eq!(payload.recent_games[0].playtime_label(), "1h 1m");
        assert_eq!(payload.achievements[&10].unlocked, 1);
        assert!(payload.recommendations.is_empty());
        Ok(())
    }
}
