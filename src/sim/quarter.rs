//! One quarter: 48 alternating possessions, minutes, then the substitution pass.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sim::awards::quarter_star_label;
use crate::sim::game::GameScore;
use crate::sim::possession::{resolve_possession, PlayEvent};
use crate::sim::rng::RandomSource;
use crate::sim::state::{GamePlayerState, Leader, Side, TeamInGame};

/// Possessions per quarter. Fixed; one quarter is always this many.
pub const POSSESSIONS_PER_QUARTER: u32 = 48;
/// Minutes credited to every on-court player at the end of a quarter.
pub const MINUTES_PER_QUARTER: u32 = 12;
pub const BENCH_RECOVERY: f64 = 15.0;
/// On-court players below this stamina are candidates to come out.
pub const FATIGUE_THRESHOLD: f64 = 70.0;
/// Bench players must be above this stamina to come in.
pub const FRESH_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterScore {
    pub team1: u32,
    pub team2: u32,
}

impl QuarterScore {
    pub fn new(team1: u32, team2: u32) -> Self {
        Self { team1, team2 }
    }

    pub fn add(&mut self, side: Side, points: u32) {
        match side {
            Side::Team1 => self.team1 += points,
            Side::Team2 => self.team2 += points,
        }
    }

    pub fn for_side(&self, side: Side) -> u32 {
        match side {
            Side::Team1 => self.team1,
            Side::Team2 => self.team2,
        }
    }

    pub fn total(&self) -> u32 {
        self.team1 + self.team2
    }
}

impl std::ops::Add for QuarterScore {
    type Output = QuarterScore;

    fn add(self, rhs: Self) -> Self::Output {
        QuarterScore {
            team1: self.team1 + rhs.team1,
            team2: self.team2 + rhs.team2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerPoints {
    pub player_id: String,
    pub name: String,
    pub points: u32,
}

/// Running state for the quarter in progress.
#[derive(Debug, Clone)]
pub struct QuarterTally {
    /// Game totals before this quarter started.
    base: QuarterScore,
    pub score: QuarterScore,
    /// Per-player points this quarter, in order of first basket.
    pub player_points: Vec<PlayerPoints>,
    pub plays: Vec<PlayEvent>,
    pub lead_changes: u32,
    pub last_leader: Leader,
}

impl QuarterTally {
    pub fn new(team1_before: u32, team2_before: u32, last_leader: Leader) -> Self {
        Self {
            base: QuarterScore::new(team1_before, team2_before),
            score: QuarterScore::default(),
            player_points: Vec::new(),
            plays: Vec::with_capacity(POSSESSIONS_PER_QUARTER as usize),
            lead_changes: 0,
            last_leader,
        }
    }

    /// Game score including this quarter so far.
    pub fn running_totals(&self) -> QuarterScore {
        self.base + self.score
    }

    /// Credit a basket and update lead tracking. Returns the running game totals.
    pub fn record_score(
        &mut self,
        side: Side,
        shooter: &GamePlayerState,
        points: u32,
    ) -> (u32, u32) {
        self.score.add(side, points);
        match self
            .player_points
            .iter_mut()
            .find(|entry| entry.player_id == shooter.id())
        {
            Some(entry) => entry.points += points,
            None => self.player_points.push(PlayerPoints {
                player_id: shooter.id().to_string(),
                name: shooter.name().to_string(),
                points,
            }),
        }

        let totals = self.running_totals();
        let leader = Leader::from_totals(totals.team1, totals.team2);
        if leader != Leader::Tied && leader != self.last_leader {
            self.lead_changes += 1;
            self.last_leader = leader;
        }
        (totals.team1, totals.team2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayByPlayLog {
    pub quarter: u8,
    pub star: String,
    pub lead_changes: u32,
    pub plays: Vec<PlayEvent>,
}

impl PlayByPlayLog {
    pub fn descriptions(&self) -> Vec<String> {
        self.plays.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    pub slot: usize,
    pub player_out: String,
    pub player_in: String,
}

#[derive(Debug, Clone)]
pub struct QuarterOutcome {
    pub teams: [TeamInGame; 2],
    pub score: QuarterScore,
    pub log: PlayByPlayLog,
    pub last_leader: Leader,
    pub substitutions: [Vec<Substitution>; 2],
}

fn split_teams(teams: &mut [TeamInGame; 2], offense: Side) -> (&mut TeamInGame, &mut TeamInGame) {
    let [team1, team2] = teams;
    match offense {
        Side::Team1 => (team1, team2),
        Side::Team2 => (team2, team1),
    }
}

/// Simulate quarter `quarter` (1-based) and return the new team states.
///
/// Takes the teams by value; the caller keeps nothing aliased into the result.
pub fn simulate_quarter<R: RandomSource + ?Sized>(
    mut teams: [TeamInGame; 2],
    score_so_far: &GameScore,
    quarter: u8,
    last_leader: Leader,
    rng: &mut R,
) -> QuarterOutcome {
    let before = score_so_far.totals();
    let mut tally = QuarterTally::new(before.team1, before.team2, last_leader);

    for possession in 0..POSSESSIONS_PER_QUARTER {
        let side = Side::on_offense(possession);
        let (offense, defense) = split_teams(&mut teams, side);
        resolve_possession(offense, defense, side, &mut tally, rng);
    }

    for team in teams.iter_mut() {
        for player in team.on_court.iter_mut() {
            player.stats.minutes += MINUTES_PER_QUARTER;
        }
    }

    let substitutions = [
        apply_substitutions(&mut teams[0]),
        apply_substitutions(&mut teams[1]),
    ];

    let star = quarter_star_label(&tally.player_points);
    debug!(
        quarter,
        team1 = tally.score.team1,
        team2 = tally.score.team2,
        lead_changes = tally.lead_changes,
        subs = substitutions[0].len() + substitutions[1].len(),
        %star,
        "quarter complete"
    );

    QuarterOutcome {
        teams,
        score: tally.score,
        log: PlayByPlayLog {
            quarter,
            star,
            lead_changes: tally.lead_changes,
            plays: tally.plays,
        },
        last_leader: tally.last_leader,
        substitutions,
    }
}

/// End-of-quarter rotation: rest the bench, then swap tired starters for fresh
/// same-position reserves in one pass over the on-court slots.
pub fn apply_substitutions(team: &mut TeamInGame) -> Vec<Substitution> {
    for player in team.bench.iter_mut() {
        player.recover(BENCH_RECOVERY);
    }

    let mut substitutions = Vec::new();
    for slot in 0..team.on_court.len() {
        let tired = &team.on_court[slot];
        if tired.stamina >= FATIGUE_THRESHOLD || tired.stats.minutes >= tired.player.target_minutes {
            continue;
        }
        let position = tired.position();
        let Some(fresh) = team
            .bench
            .iter()
            .position(|player| player.position() == position && player.stamina > FRESH_THRESHOLD)
        else {
            continue;
        };
        std::mem::swap(&mut team.on_court[slot], &mut team.bench[fresh]);
        substitutions.push(Substitution {
            slot,
            player_out: team.bench[fresh].name().to_string(),
            player_in: team.on_court[slot].name().to_string(),
        });
    }
    substitutions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::player::{CareerStats, Player, PlayerAttributes, Position, ShotTendencies};
    use crate::sim::rng::Rng;

    fn player(id: &str, position: Position, target_minutes: u32) -> Player {
        Player {
            id: id.to_string(),
            name: id.to_string(),
            position,
            tier: String::new(),
            attributes: PlayerAttributes::uniform(60.0),
            career_stats: CareerStats {
                usage_rate: 20.0,
                field_goal_pct: 48.0,
            },
            shot_tendencies: ShotTendencies {
                inside: 1.0,
                mid: 1.0,
                three: 1.0,
            },
            target_minutes,
            foul_tendency: 2.0,
            traits: Vec::new(),
            era: String::new(),
        }
    }

    fn team(prefix: &str, target_minutes: u32) -> TeamInGame {
        TeamInGame::new(
            prefix,
            Position::ALL
                .iter()
                .map(|&pos| GamePlayerState::new(player(&format!("{prefix}-{pos}"), pos, target_minutes)))
                .collect(),
            Position::ALL
                .iter()
                .map(|&pos| {
                    GamePlayerState::new(player(&format!("{prefix}-bench-{pos}"), pos, target_minutes))
                })
                .collect(),
        )
    }

    #[test]
    fn tired_player_under_target_is_swapped_in_place() {
        let mut team = team("a", 36);
        team.on_court[2].stamina = 60.0;
        team.on_court[2].stats.minutes = 12;
        team.bench[2].stamina = 80.0; // 80 + 15 recovery = 95 > 90

        let subs = apply_substitutions(&mut team);

        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].slot, 2);
        assert_eq!(team.on_court[2].id(), "a-bench-SF");
        assert_eq!(team.bench[2].id(), "a-SF");
        assert_eq!(team.on_court[2].position(), Position::SF);
    }

    #[test]
    fn player_at_target_minutes_stays_on_court() {
        let mut team = team("a", 0);
        team.on_court[0].stamina = 40.0;
        team.on_court[0].stats.minutes = 12;
        let subs = apply_substitutions(&mut team);
        assert!(subs.is_empty());
        assert_eq!(team.on_court[0].id(), "a-PG");
    }

    #[test]
    fn no_swap_without_fresh_reserve() {
        let mut team = team("a", 48);
        team.on_court[4].stamina = 50.0;
        team.bench[4].stamina = 70.0; // recovers to 85, not > 90
        let subs = apply_substitutions(&mut team);
        assert!(subs.is_empty());
        assert_eq!(team.bench[4].stamina, 85.0);
    }

    #[test]
    fn bench_recovery_caps_at_full() {
        let mut team = team("a", 48);
        team.bench[0].stamina = 95.0;
        apply_substitutions(&mut team);
        assert_eq!(team.bench[0].stamina, 100.0);
    }

    #[test]
    fn quarter_logs_every_possession_and_conserves_points() {
        let teams = [team("a", 36), team("b", 36)];
        let mut rng = Rng::new(5);
        let outcome = simulate_quarter(teams, &GameScore::default(), 1, Leader::Tied, &mut rng);

        assert_eq!(outcome.log.plays.len(), POSSESSIONS_PER_QUARTER as usize);
        let player_points: u32 = outcome.teams.iter().map(TeamInGame::total_points).sum();
        assert_eq!(player_points, outcome.score.total());
        assert!(outcome.score.total() <= POSSESSIONS_PER_QUARTER * 3);
    }

    #[test]
    fn lead_change_ignores_ties_and_repeats() {
        let shooter = GamePlayerState::new(player("x", Position::PG, 30));
        let mut tally = QuarterTally::new(0, 0, Leader::Tied);
        tally.record_score(Side::Team1, &shooter, 2); // 2-0 -> change
        tally.record_score(Side::Team2, &shooter, 2); // 2-2 tie
        tally.record_score(Side::Team1, &shooter, 2); // 4-2 same leader
        tally.record_score(Side::Team2, &shooter, 3); // 4-5 -> change
        assert_eq!(tally.lead_changes, 2);
        assert_eq!(tally.last_leader, Leader::Team2);
        assert_eq!(tally.player_points.len(), 1);
        assert_eq!(tally.player_points[0].points, 9);
    }
}
