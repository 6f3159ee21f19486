//! Best-of-seven series: fresh rosters every game, cumulative box score lines,
//! and the series MVP from the winning side.

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::data::catalog::PlayerCatalog;
use crate::sim::awards::{best_by, mvp_score};
use crate::sim::game::{simulate_game, GameResult};
use crate::sim::rng::RandomSource;
use crate::sim::state::{Side, TeamInGame};

pub const WINS_TO_CLINCH: u32 = 4;
pub const MAX_GAMES: u32 = 2 * WINS_TO_CLINCH - 1;

/// Series totals for one player. Minutes are not tracked across a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeriesStatLine {
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub personal_fouls: u32,
}

impl SeriesStatLine {
    pub fn mvp_score(&self) -> f64 {
        mvp_score(self.points, self.rebounds, self.assists, self.personal_fouls)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesLine {
    pub player_id: String,
    pub name: String,
    pub stats: SeriesStatLine,
}

/// Cumulative lines for one roster, in roster order (starters then bench).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesStats {
    pub lines: Vec<SeriesLine>,
}

impl SeriesStats {
    pub fn for_team(team: &TeamInGame) -> Self {
        Self {
            lines: team
                .all_players()
                .map(|player| SeriesLine {
                    player_id: player.id().to_string(),
                    name: player.name().to_string(),
                    stats: SeriesStatLine::default(),
                })
                .collect(),
        }
    }

    /// Fold a finished game's team into the totals. Players not on the
    /// series roster are ignored.
    pub fn record(&mut self, team: &TeamInGame) {
        for player in team.all_players() {
            if let Some(line) = self
                .lines
                .iter_mut()
                .find(|line| line.player_id == player.id())
            {
                line.stats.points += player.stats.points;
                line.stats.rebounds += player.stats.rebounds;
                line.stats.assists += player.stats.assists;
                line.stats.personal_fouls += player.stats.personal_fouls;
            }
        }
    }

    pub fn get(&self, player_id: &str) -> Option<&SeriesLine> {
        self.lines.iter().find(|line| line.player_id == player_id)
    }

    pub fn total_points(&self) -> u32 {
        self.lines.iter().map(|line| line.stats.points).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesMvp {
    pub player_id: String,
    pub name: String,
    pub stats: SeriesStatLine,
    pub games_played: u32,
    pub points_per_game: f64,
    pub rebounds_per_game: f64,
    pub assists_per_game: f64,
}

impl SeriesMvp {
    fn from_line(line: &SeriesLine, games_played: u32) -> Self {
        let per_game = |total: u32| {
            if games_played == 0 {
                0.0
            } else {
                total as f64 / games_played as f64
            }
        };
        Self {
            player_id: line.player_id.clone(),
            name: line.name.clone(),
            stats: line.stats,
            games_played,
            points_per_game: per_game(line.stats.points),
            rebounds_per_game: per_game(line.stats.rebounds),
            assists_per_game: per_game(line.stats.assists),
        }
    }
}

/// Best composite score among `stats`; ties keep roster order. Falls back
/// to a zero line named "Unknown" for an empty roster.
pub fn series_mvp(stats: &SeriesStats, games_played: u32) -> SeriesMvp {
    match best_by(stats.lines.iter(), |line| line.stats.mvp_score()) {
        Some(line) => SeriesMvp::from_line(line, games_played),
        None => SeriesMvp::from_line(
            &SeriesLine {
                player_id: String::new(),
                name: "Unknown".to_string(),
                stats: SeriesStatLine::default(),
            },
            games_played,
        ),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesTeam {
    pub name: String,
    pub wins: u32,
    pub stats: SeriesStats,
}

#[derive(Debug, Clone)]
pub struct Series {
    run_id: Uuid,
    /// Starting state every game is projected from.
    templates: [TeamInGame; 2],
    teams: [SeriesTeam; 2],
    games: Vec<GameResult>,
}

impl Series {
    pub fn new(team1: TeamInGame, team2: TeamInGame) -> Self {
        let templates = [team1.reset_for_new_game(), team2.reset_for_new_game()];
        let teams = [
            SeriesTeam {
                name: templates[0].name.clone(),
                wins: 0,
                stats: SeriesStats::for_team(&templates[0]),
            },
            SeriesTeam {
                name: templates[1].name.clone(),
                wins: 0,
                stats: SeriesStats::for_team(&templates[1]),
            },
        ];
        Self {
            run_id: Uuid::new_v4(),
            templates,
            teams,
            games: Vec::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn wins(&self, side: Side) -> u32 {
        self.teams[side.index()].wins
    }

    pub fn team(&self, side: Side) -> &SeriesTeam {
        &self.teams[side.index()]
    }

    pub fn games(&self) -> &[GameResult] {
        &self.games
    }

    pub fn is_decided(&self) -> bool {
        self.teams.iter().any(|team| team.wins >= WINS_TO_CLINCH)
    }

    /// Number the next game would carry.
    pub fn next_game_number(&self) -> u32 {
        self.games.len() as u32 + 1
    }

    /// Play the next game, or `None` once a team has clinched.
    pub fn play_next_game<R: RandomSource + ?Sized>(
        &mut self,
        catalog: &PlayerCatalog,
        rng: &mut R,
    ) -> Option<&GameResult> {
        if self.is_decided() {
            return None;
        }
        let game_number = self.next_game_number();
        let result = simulate_game(
            self.templates[0].reset_for_new_game(),
            self.templates[1].reset_for_new_game(),
            game_number,
            catalog,
            rng,
        );

        self.teams[0].stats.record(&result.team1);
        self.teams[1].stats.record(&result.team2);
        self.teams[result.winner.index()].wins += 1;
        debug!(
            run_id = %self.run_id,
            game = game_number,
            team1_wins = self.teams[0].wins,
            team2_wins = self.teams[1].wins,
            "series game recorded"
        );

        self.games.push(result);
        self.games.last()
    }

    pub fn play_out<R: RandomSource + ?Sized>(&mut self, catalog: &PlayerCatalog, rng: &mut R) {
        while self.play_next_game(catalog, rng).is_some() {}
    }

    pub fn finish(self) -> SeriesResult {
        let winner = if self.teams[0].wins >= self.teams[1].wins {
            Side::Team1
        } else {
            Side::Team2
        };
        let games_played = self.games.len() as u32;
        let mvp = series_mvp(&self.teams[winner.index()].stats, games_played);
        let [team1, team2] = self.teams;

        let result = SeriesResult {
            run_id: self.run_id,
            winner,
            winner_name: match winner {
                Side::Team1 => team1.name.clone(),
                Side::Team2 => team2.name.clone(),
            },
            loser_name: match winner {
                Side::Team1 => team2.name.clone(),
                Side::Team2 => team1.name.clone(),
            },
            team1,
            team2,
            games: self.games,
            mvp,
        };
        info!(
            run_id = %result.run_id,
            winner = %result.winner_name,
            record = %result.record(),
            mvp = %result.mvp.name,
            "series final"
        );
        result
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesResult {
    pub run_id: Uuid,
    pub winner: Side,
    pub winner_name: String,
    pub loser_name: String,
    pub team1: SeriesTeam,
    pub team2: SeriesTeam,
    pub games: Vec<GameResult>,
    pub mvp: SeriesMvp,
}

impl SeriesResult {
    pub fn team(&self, side: Side) -> &SeriesTeam {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    pub fn winning_team(&self) -> &SeriesTeam {
        self.team(self.winner)
    }

    pub fn losing_team(&self) -> &SeriesTeam {
        self.team(self.winner.other())
    }

    /// "4-2", winner first.
    pub fn record(&self) -> String {
        format!(
            "{}-{}",
            self.winning_team().wins,
            self.losing_team().wins
        )
    }
}

/// Play a whole best-of-seven.
pub fn simulate_series<R: RandomSource + ?Sized>(
    team1: TeamInGame,
    team2: TeamInGame,
    catalog: &PlayerCatalog,
    rng: &mut R,
) -> SeriesResult {
    let mut series = Series::new(team1, team2);
    series.play_out(catalog, rng);
    series.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, points: u32, rebounds: u32, assists: u32, fouls: u32) -> SeriesLine {
        SeriesLine {
            player_id: id.to_string(),
            name: id.to_uppercase(),
            stats: SeriesStatLine {
                points,
                rebounds,
                assists,
                personal_fouls: fouls,
            },
        }
    }

    #[test]
    fn series_mvp_reports_per_game_averages() {
        let stats = SeriesStats {
            lines: vec![line("a", 100, 20, 10, 5), line("b", 120, 10, 5, 10)],
        };
        // a: 100 + 24 + 15 - 10 = 129, b: 120 + 12 + 7.5 - 20 = 119.5
        let mvp = series_mvp(&stats, 5);
        assert_eq!(mvp.player_id, "a");
        assert_eq!(mvp.points_per_game, 20.0);
        assert_eq!(mvp.rebounds_per_game, 4.0);
        assert_eq!(mvp.assists_per_game, 2.0);
    }

    #[test]
    fn series_mvp_tie_keeps_roster_order_even_when_negative() {
        let stats = SeriesStats {
            lines: vec![line("a", 0, 0, 0, 3), line("b", 0, 0, 0, 3)],
        };
        assert_eq!(series_mvp(&stats, 4).player_id, "a");
    }

    #[test]
    fn empty_roster_gives_unknown_mvp() {
        let mvp = series_mvp(&SeriesStats::default(), 0);
        assert_eq!(mvp.name, "Unknown");
        assert_eq!(mvp.points_per_game, 0.0);
    }
}
