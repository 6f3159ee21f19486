//! Quarter star, game MVP and series MVP selection.
//!
//! All awards rank by the same composite:
//! `points * 1.0 + rebounds * 1.2 + assists * 1.5 - personal_fouls * 2.0`.

use crate::data::catalog::PlayerCatalog;
use crate::data::player::Player;
use crate::sim::quarter::PlayerPoints;
use crate::sim::state::{GamePlayerState, PlayerStats};

pub const POINTS_WEIGHT: f64 = 1.0;
pub const REBOUNDS_WEIGHT: f64 = 1.2;
pub const ASSISTS_WEIGHT: f64 = 1.5;
pub const FOULS_WEIGHT: f64 = 2.0;

pub const BALANCED_SCORING: &str = "Balanced scoring";

pub fn mvp_score(points: u32, rebounds: u32, assists: u32, personal_fouls: u32) -> f64 {
    points as f64 * POINTS_WEIGHT + rebounds as f64 * REBOUNDS_WEIGHT
        + assists as f64 * ASSISTS_WEIGHT
        - personal_fouls as f64 * FOULS_WEIGHT
}

impl PlayerStats {
    pub fn mvp_score(&self) -> f64 {
        mvp_score(self.points, self.rebounds, self.assists, self.personal_fouls)
    }
}

/// Highest-scoring item; ties keep the earliest one.
pub fn best_by<T, F>(items: impl IntoIterator<Item = T>, score: F) -> Option<T>
where
    F: Fn(&T) -> f64,
{
    let mut best: Option<(T, f64)> = None;
    for item in items {
        let value = score(&item);
        let replace = match &best {
            Some((_, best_value)) => value > *best_value,
            None => true,
        };
        if replace {
            best = Some((item, value));
        }
    }
    best.map(|(item, _)| item)
}

/// Game MVP over every player passed in (both teams, court and bench).
///
/// With no candidates at all this returns a zero-stat entry for the first
/// catalog player (or a placeholder) rather than failing.
pub fn game_mvp<'a>(
    players: impl IntoIterator<Item = &'a GamePlayerState>,
    catalog: &PlayerCatalog,
) -> GamePlayerState {
    match best_by(players, |player| player.stats.mvp_score()) {
        Some(player) => player.clone(),
        None => GamePlayerState::sentinel(
            catalog.first().cloned().unwrap_or_else(Player::placeholder),
        ),
    }
}

/// "Name (N pts)" for the top scorer of the quarter, first to reach the high on ties.
pub fn quarter_star_label(player_points: &[PlayerPoints]) -> String {
    let star = best_by(player_points.iter().filter(|entry| entry.points > 0), |entry| {
        mvp_score(entry.points, 0, 0, 0)
    });
    match star {
        Some(entry) => format!("{} ({} pts)", entry.name, entry.points),
        None => BALANCED_SCORING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_stats(id: &str, points: u32, rebounds: u32, assists: u32, fouls: u32) -> GamePlayerState {
        let mut player = Player::placeholder();
        player.id = id.to_string();
        player.name = id.to_string();
        let mut state = GamePlayerState::new(player);
        state.stats = PlayerStats {
            points,
            rebounds,
            assists,
            minutes: 0,
            personal_fouls: fouls,
        };
        state
    }

    #[test]
    fn formula_weights() {
        assert!((mvp_score(10, 5, 4, 2) - 18.0).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_first_encountered() {
        // 12 points vs 8 assists: both score 12.0
        let first = with_stats("first", 12, 0, 0, 0);
        let second = with_stats("second", 0, 0, 8, 0);
        let catalog = PlayerCatalog::default();
        let mvp = game_mvp([&first, &second], &catalog);
        assert_eq!(mvp.id(), "first");
        let mvp = game_mvp([&second, &first], &catalog);
        assert_eq!(mvp.id(), "second");
    }

    #[test]
    fn fouls_can_cost_the_award() {
        let scorer = with_stats("scorer", 20, 0, 0, 6);
        let glue = with_stats("glue", 6, 6, 4, 0);
        let mvp = game_mvp([&scorer, &glue], &PlayerCatalog::default());
        assert_eq!(mvp.id(), "glue");
    }

    #[test]
    fn empty_pool_returns_zero_stat_sentinel() {
        let catalog = PlayerCatalog::builtin();
        let mvp = game_mvp(std::iter::empty(), &catalog);
        assert_eq!(mvp.stats, PlayerStats::default());
        assert_eq!(mvp.stamina, 0.0);
        assert_eq!(Some(mvp.id()), catalog.first().map(|p| p.id.as_str()));

        let mvp = game_mvp(std::iter::empty(), &PlayerCatalog::default());
        assert_eq!(mvp.name(), "Unknown");
    }

    #[test]
    fn star_label_picks_top_scorer_or_balanced() {
        assert_eq!(quarter_star_label(&[]), BALANCED_SCORING);
        let points = vec![
            PlayerPoints {
                player_id: "a".into(),
                name: "Ace".into(),
                points: 7,
            },
            PlayerPoints {
                player_id: "b".into(),
                name: "Bee".into(),
                points: 9,
            },
            PlayerPoints {
                player_id: "c".into(),
                name: "Cee".into(),
                points: 9,
            },
        ];
        assert_eq!(quarter_star_label(&points), "Bee (9 pts)");
    }
}
