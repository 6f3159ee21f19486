//! Four quarters into a game, either one quarter at a time or all at once.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::catalog::PlayerCatalog;
use crate::sim::awards::game_mvp;
use crate::sim::quarter::{simulate_quarter, PlayByPlayLog, QuarterScore};
use crate::sim::rng::RandomSource;
use crate::sim::state::{GamePlayerState, Leader, Side, TeamInGame};

pub const QUARTERS: u8 = 4;

/// Per-quarter scores, Q1 through Q4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScore {
    pub q1: QuarterScore,
    pub q2: QuarterScore,
    pub q3: QuarterScore,
    pub q4: QuarterScore,
}

impl GameScore {
    pub fn quarter(&self, quarter: u8) -> Option<QuarterScore> {
        match quarter {
            1 => Some(self.q1),
            2 => Some(self.q2),
            3 => Some(self.q3),
            4 => Some(self.q4),
            _ => None,
        }
    }

    /// Store the score for `quarter`; quarters outside 1..=4 are ignored.
    pub fn set_quarter(&mut self, quarter: u8, score: QuarterScore) {
        match quarter {
            1 => self.q1 = score,
            2 => self.q2 = score,
            3 => self.q3 = score,
            4 => self.q4 = score,
            _ => {}
        }
    }

    pub fn quarters(&self) -> [QuarterScore; 4] {
        [self.q1, self.q2, self.q3, self.q4]
    }

    pub fn totals(&self) -> QuarterScore {
        self.q1 + self.q2 + self.q3 + self.q4
    }

    pub fn halftime(&self) -> QuarterScore {
        self.q1 + self.q2
    }
}

/// A game in progress. Each quarter consumes the current team states and
/// replaces them with the ones the quarter hands back.
#[derive(Debug, Clone)]
pub struct GameSession {
    teams: [TeamInGame; 2],
    score: GameScore,
    next_quarter: u8,
    logs: Vec<PlayByPlayLog>,
    last_leader: Leader,
}

impl GameSession {
    pub fn new(team1: TeamInGame, team2: TeamInGame) -> Self {
        Self {
            teams: [team1, team2],
            score: GameScore::default(),
            next_quarter: 1,
            logs: Vec::with_capacity(QUARTERS as usize),
            last_leader: Leader::Tied,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.next_quarter > QUARTERS
    }

    /// The quarter the next call will play, or `None` after Q4.
    pub fn upcoming_quarter(&self) -> Option<u8> {
        (!self.is_complete()).then_some(self.next_quarter)
    }

    pub fn teams(&self) -> &[TeamInGame; 2] {
        &self.teams
    }

    pub fn score(&self) -> &GameScore {
        &self.score
    }

    /// Quarter logs in play order.
    pub fn logs(&self) -> &[PlayByPlayLog] {
        &self.logs
    }

    pub fn last_leader(&self) -> Leader {
        self.last_leader
    }

    pub fn simulate_next_quarter<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Option<&PlayByPlayLog> {
        if self.is_complete() {
            return None;
        }
        let quarter = self.next_quarter;
        let teams = std::mem::take(&mut self.teams);
        let outcome = simulate_quarter(teams, &self.score, quarter, self.last_leader, rng);

        self.teams = outcome.teams;
        self.score.set_quarter(quarter, outcome.score);
        self.last_leader = outcome.last_leader;
        self.logs.push(outcome.log);
        self.next_quarter += 1;
        self.logs.last()
    }

    /// Play every quarter that is left.
    pub fn simulate_remaining<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        while self.simulate_next_quarter(rng).is_some() {}
    }

    /// Close the game out with whatever quarters have been played.
    pub fn finalize(self, game_number: u32, catalog: &PlayerCatalog) -> GameResult {
        let totals = self.score.totals();
        let halftime = self.score.halftime();
        let winner = if totals.team1 >= totals.team2 {
            Side::Team1
        } else {
            Side::Team2
        };
        let [team1, team2] = self.teams;
        let mvp = game_mvp(team1.all_players().chain(team2.all_players()), catalog);
        let lead_changes = self.logs.iter().map(|log| log.lead_changes).sum();

        let result = GameResult {
            game_number,
            winner,
            winner_name: match winner {
                Side::Team1 => team1.name.clone(),
                Side::Team2 => team2.name.clone(),
            },
            score: format!(
                "{} - {}",
                totals.team1.max(totals.team2),
                totals.team1.min(totals.team2)
            ),
            halftime_score: format!("{} - {}", halftime.team1, halftime.team2),
            lead_changes,
            mvp,
            game_score: self.score,
            quarters: self.logs,
            team1,
            team2,
        };
        debug!(
            game = game_number,
            winner = %result.winner_name,
            score = %result.score,
            mvp = %result.mvp.name(),
            lead_changes,
            "game final"
        );
        result
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub game_number: u32,
    pub winner: Side,
    pub winner_name: String,
    /// "high - low", independent of which team won.
    pub score: String,
    pub team1: TeamInGame,
    pub team2: TeamInGame,
    /// Q1 + Q2, team 1 first.
    pub halftime_score: String,
    pub lead_changes: u32,
    pub mvp: GamePlayerState,
    pub game_score: GameScore,
    pub quarters: Vec<PlayByPlayLog>,
}

impl GameResult {
    pub fn team(&self, side: Side) -> &TeamInGame {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    pub fn winner_team(&self) -> &TeamInGame {
        self.team(self.winner)
    }

    pub fn loser_team(&self) -> &TeamInGame {
        self.team(self.winner.other())
    }

    pub fn final_totals(&self) -> QuarterScore {
        self.game_score.totals()
    }
}

/// Play a full game from tip-off.
pub fn simulate_game<R: RandomSource + ?Sized>(
    team1: TeamInGame,
    team2: TeamInGame,
    game_number: u32,
    catalog: &PlayerCatalog,
    rng: &mut R,
) -> GameResult {
    let mut session = GameSession::new(team1, team2);
    session.simulate_remaining(rng);
    session.finalize(game_number, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_score_sums_and_halves() {
        let mut score = GameScore::default();
        score.set_quarter(1, QuarterScore::new(20, 18));
        score.set_quarter(2, QuarterScore::new(22, 30));
        score.set_quarter(3, QuarterScore::new(25, 19));
        score.set_quarter(4, QuarterScore::new(17, 21));
        score.set_quarter(5, QuarterScore::new(99, 99));

        assert_eq!(score.halftime(), QuarterScore::new(42, 48));
        assert_eq!(score.totals(), QuarterScore::new(84, 88));
        assert_eq!(score.quarter(3), Some(QuarterScore::new(25, 19)));
        assert_eq!(score.quarter(0), None);
    }

    #[test]
    fn tied_game_goes_to_team_one() {
        let session = GameSession::new(
            TeamInGame::new("Alpha", Vec::new(), Vec::new()),
            TeamInGame::new("Beta", Vec::new(), Vec::new()),
        );
        let result = session.finalize(3, &PlayerCatalog::default());
        assert_eq!(result.winner, Side::Team1);
        assert_eq!(result.winner_name, "Alpha");
        assert_eq!(result.score, "0 - 0");
        assert_eq!(result.halftime_score, "0 - 0");
        assert_eq!(result.mvp.name(), "Unknown");
    }
}
