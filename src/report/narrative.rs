//! Fact sheets for a game or series recap. These carry only numbers and
//! names; turning them into prose is left to whoever consumes them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::sim::awards::best_by;
use crate::sim::game::GameResult;
use crate::sim::series::SeriesResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MvpLine {
    pub name: String,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameBrief {
    pub game_number: u32,
    pub team1: String,
    pub team2: String,
    pub final_score: String,
    pub winner: String,
    pub mvp: MvpLine,
    pub halftime_score: String,
    pub lead_changes: u32,
    pub generated_at: DateTime<Utc>,
}

impl GameBrief {
    pub fn from_result(result: &GameResult) -> Self {
        Self {
            game_number: result.game_number,
            team1: result.team1.name.clone(),
            team2: result.team2.name.clone(),
            final_score: result.score.clone(),
            winner: result.winner_name.clone(),
            mvp: MvpLine {
                name: result.mvp.name().to_string(),
                points: result.mvp.stats.points,
                rebounds: result.mvp.stats.rebounds,
                assists: result.mvp.stats.assists,
            },
            halftime_score: result.halftime_score.clone(),
            lead_changes: result.lead_changes,
            generated_at: Utc::now(),
        }
    }
}

impl fmt::Display for GameBrief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Team 1: {}", self.team1)?;
        writeln!(f, "Team 2: {}", self.team2)?;
        writeln!(f, "Final Score: {}", self.final_score)?;
        writeln!(f, "Winner: {}", self.winner)?;
        writeln!(
            f,
            "Game MVP: {} ({} PTS, {} REB, {} AST)",
            self.mvp.name, self.mvp.points, self.mvp.rebounds, self.mvp.assists
        )?;
        write!(
            f,
            "Game Flow: Halftime score was {}. Total lead changes: {}.",
            self.halftime_score, self.lead_changes
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSide {
    pub name: String,
    pub wins: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesMvpLine {
    pub name: String,
    pub points_per_game: f64,
    pub rebounds_per_game: f64,
    pub assists_per_game: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandoutLine {
    pub name: String,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesBrief {
    pub run_id: Uuid,
    pub winner: SeriesSide,
    pub loser: SeriesSide,
    pub mvp: SeriesMvpLine,
    /// Best composite score on the losing side, if it had anyone.
    pub loser_standout: Option<StandoutLine>,
    /// "G1: 112 - 104" and so on, in play order.
    pub game_scores: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl SeriesBrief {
    pub fn from_result(result: &SeriesResult) -> Self {
        let winner = result.winning_team();
        let loser = result.losing_team();
        let loser_standout = best_by(loser.stats.lines.iter(), |line| line.stats.mvp_score()).map(
            |line| StandoutLine {
                name: line.name.clone(),
                points: line.stats.points,
                rebounds: line.stats.rebounds,
                assists: line.stats.assists,
            },
        );

        Self {
            run_id: result.run_id,
            winner: SeriesSide {
                name: winner.name.clone(),
                wins: winner.wins,
            },
            loser: SeriesSide {
                name: loser.name.clone(),
                wins: loser.wins,
            },
            mvp: SeriesMvpLine {
                name: result.mvp.name.clone(),
                points_per_game: one_decimal(result.mvp.points_per_game),
                rebounds_per_game: one_decimal(result.mvp.rebounds_per_game),
                assists_per_game: one_decimal(result.mvp.assists_per_game),
            },
            loser_standout,
            game_scores: result
                .games
                .iter()
                .enumerate()
                .map(|(index, game)| format!("G{}: {}", index + 1, game.score))
                .collect(),
            generated_at: Utc::now(),
        }
    }
}

impl fmt::Display for SeriesBrief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Series Winner: {} ({} wins)", self.winner.name, self.winner.wins)?;
        writeln!(f, "Series Loser: {} ({} wins)", self.loser.name, self.loser.wins)?;
        writeln!(
            f,
            "Series MVP: {}, averaging {:.1} PPG, {:.1} RPG, and {:.1} APG.",
            self.mvp.name,
            self.mvp.points_per_game,
            self.mvp.rebounds_per_game,
            self.mvp.assists_per_game
        )?;
        if let Some(standout) = &self.loser_standout {
            writeln!(
                f,
                "Key Player from Loser: {} ({} PTS, {} REB, {} AST over the series)",
                standout.name, standout.points, standout.rebounds, standout.assists
            )?;
        }
        write!(f, "Game Scores: {}.", self.game_scores.join(", "))
    }
}
