//! Decorative player widget: payload contract, demo data and fetching.

mod client;
mod models;

pub use client::{WidgetClient, WidgetError, WidgetEvent, WidgetMode, WidgetSnapshot};
pub use models::{
    demo_payload, format_playtime, format_price, persona_state_label, AchievementProgress,
    LibraryStats, OwnedGame, Player, Recommendation, WidgetPayload,
};

/// Games listed in the widget.
pub const WIDGET_GAME_LIMIT: usize = 5;

/// One recently played game, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub struct GameLine {
    /// Game name.
    pub name: String,
    /// Total playtime label.
    pub playtime: String,
    /// Recent playtime label.
    pub recent: Option<String>,
    /// First genre.
    pub genre: Option<String>,
    /// Price label.
    pub price: Option<String>,
    /// Metacritic score.
    pub score: Option<u8>,
}

/// Display-ready widget contents.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    /// Demo or live data.
    pub mode: WidgetMode,
    /// Persona name.
    pub player_name: String,
    /// Persona state label.
    pub status: &'static str,
    /// Whether the persona state counts as online.
    pub online: bool,
    /// Labelled library totals.
    pub stats: Vec<(&'static str, String)>,
    /// Recently played games.
    pub recent_games: Vec<GameLine>,
    /// Unlocked achievements across all games.
    pub achievements_unlocked: u32,
    /// Achievements across all games.
    pub achievements_total: u32,
    /// Overall completion percentage.
    pub achievement_percentage: f64,
    /// One line per recommendation.
    pub recommendations: Vec<String>,
}

impl From<&WidgetSnapshot> for WidgetView {
    fn from(snapshot: &WidgetSnapshot) -> Self {
        let payload = &snapshot.payload;
        let stats = &payload.stats;
        let (unlocked, total, percentage) = payload.achievement_totals();
        Self {
            mode: snapshot.mode,
            player_name: payload.player.personaname.clone(),
            status: payload.player.status_label(),
            online: payload.player.is_online(),
            stats: vec![
                ("Total games", stats.total_games.to_string()),
                ("Total playtime", stats.total_playtime.clone()),
                ("Most played", stats.most_played.clone()),
                ("Average playtime", stats.average_playtime.clone()),
                ("Never played", stats.games_never_played.to_string()),
                ("Played recently", stats.games_played_recently.to_string()),
            ],
            recent_games: payload
                .recent_games
                .iter()
                .take(WIDGET_GAME_LIMIT)
                .map(|game| GameLine {
                    name: game.name.clone(),
                    playtime: game.playtime_label(),
                    recent: game.recent_label(),
                    genre: game.primary_genre().map(str::to_string),
                    price: game.price_label(),
                    score: game.metacritic_score,
                })
                .collect(),
            achievements_unlocked: unlocked,
            achievements_total: total,
            achievement_percentage: percentage,
            recommendations: payload
                .recommendations
                .iter()
                .map(|rec| {
                    format!(
                        "{} ({}/100, {}): {}",
                        rec.name,
                        rec.score,
                        format_price(rec.price),
                        rec.reason
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_view_is_display_ready() {
        let view = WidgetView::from(&WidgetSnapshot::demo());
        assert_eq!(view.mode, WidgetMode::Demo);
        assert_eq!(view.player_name, "GameMaster Pro");
        assert_eq!(view.status, "Online");
        assert_eq!(view.stats[0], ("Total games", "247".to_string()));
        assert_eq!(view.recent_games.len(), 3);
        assert_eq!(view.recent_games[0].playtime, "30h 47m");
        assert_eq!(view.recent_games[1].price.as_deref(), Some("$29.99"));
        assert_eq!((view.achievements_unlocked, view.achievements_total), (112, 211));
        assert_eq!(
            view.recommendations[0],
            "The Witcher 3: Wild Hunt (93/100, $39.99): Based on your RPG preferences"
        );
    }
}
