//! Resolves one possession: ball handler, optional pass, shot, foul check, and
//! either a make or a rebound.
//!
//! Every random choice goes through [pick_weighted], [pick_uniform] or
//! [roll_percent], in a fixed draw order, so a seeded source replays a
//! possession exactly.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::data::player::{Position, ShotType};
use crate::sim::quarter::QuarterTally;
use crate::sim::rng::RandomSource;
use crate::sim::state::{Side, TeamInGame};
use crate::sim::weighted::{pick_uniform, pick_weighted, roll_percent};

pub const BALL_HANDLER_STAMINA_COST: f64 = 2.0;
pub const DEFENDER_STAMINA_COST: f64 = 1.0;
pub const PASS_USAGE_PENALTY: f64 = 1.5;
pub const FOUL_TENDENCY_SCALE: f64 = 2.0;
pub const RATING_EDGE_SCALE: f64 = 0.75;

/// What happened on a possession, in enough detail to rebuild the play text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayEvent {
    Score {
        offense: Side,
        shooter: String,
        shot: ShotType,
        points: u32,
        assist: Option<String>,
        fouled_by: Option<String>,
        /// Game totals after the basket.
        team1_total: u32,
        team2_total: u32,
    },
    Miss {
        offense: Side,
        shooter: String,
        shot: ShotType,
        fouled_by: Option<String>,
        rebounder: String,
        offensive_rebound: bool,
    },
}

impl PlayEvent {
    pub fn offense(&self) -> Side {
        match self {
            Self::Score { offense, .. } | Self::Miss { offense, .. } => *offense,
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            Self::Score { points, .. } => *points,
            Self::Miss { .. } => 0,
        }
    }

    pub fn is_score(&self) -> bool {
        matches!(self, Self::Score { .. })
    }
}

impl fmt::Display for PlayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score {
                shooter,
                points,
                assist,
                team1_total,
                team2_total,
                ..
            } => {
                write!(f, "SCORE: {shooter} scores {points} points")?;
                if let Some(assist) = assist {
                    write!(f, " (assist by {assist})")?;
                }
                write!(f, ". ({team1_total}-{team2_total})")
            }
            Self::Miss {
                shooter, rebounder, ..
            } => write!(f, "MISS: {shooter}'s shot is off. Rebound by {rebounder}."),
        }
    }
}

/// Same-position defender, or a uniformly random one when nobody matches.
fn matchup_defender<R: RandomSource + ?Sized>(
    defense: &TeamInGame,
    position: Position,
    rng: &mut R,
) -> usize {
    defense
        .on_court_at(position)
        .unwrap_or_else(|| pick_uniform(defense.on_court.len(), rng))
}

/// Resolve one possession, mutating both teams and the quarter tally in place.
///
/// Both teams must have at least one player on the court.
pub fn resolve_possession<R: RandomSource + ?Sized>(
    offense: &mut TeamInGame,
    defense: &mut TeamInGame,
    offense_side: Side,
    tally: &mut QuarterTally,
    rng: &mut R,
) -> PlayEvent {
    let usage: Vec<f64> = offense
        .on_court
        .iter()
        .map(|player| player.player.career_stats.usage_rate)
        .collect();
    let handler = pick_weighted(&usage, 0, rng);
    let primary_defender = matchup_defender(defense, offense.on_court[handler].position(), rng);

    offense.on_court[handler].drain(BALL_HANDLER_STAMINA_COST);
    defense.on_court[primary_defender].drain(DEFENDER_STAMINA_COST);

    let pass_chance = {
        let player = &offense.on_court[handler].player;
        player.attributes.playmaking - PASS_USAGE_PENALTY * player.career_stats.usage_rate
    };
    let (shooter, assister) =
        if roll_percent(rng) < pass_chance && offense.on_court.len() > 1 {
            let pick = pick_uniform(offense.on_court.len() - 1, rng);
            let receiver = if pick >= handler { pick + 1 } else { pick };
            (receiver, Some(handler))
        } else {
            (handler, None)
        };

    let shot_defender = matchup_defender(defense, offense.on_court[shooter].position(), rng);

    let shot_index = pick_weighted(
        &offense.on_court[shooter].player.shot_tendencies.weights(),
        0,
        rng,
    );
    let shot = ShotType::ORDER[shot_index];

    let offensive_rating = {
        let state = &offense.on_court[shooter];
        state.player.attributes.scoring(shot) * state.stamina_factor()
    };
    let defensive_rating = {
        let state = &defense.on_court[shot_defender];
        state.player.attributes.contest(shot) * state.stamina_factor()
    };
    let score_chance = offense.on_court[shooter].player.career_stats.field_goal_pct
        + (offensive_rating - defensive_rating) * RATING_EDGE_SCALE;

    let fouled_by = if roll_percent(rng)
        < defense.on_court[shot_defender].player.foul_tendency * FOUL_TENDENCY_SCALE
    {
        let fouler = &mut defense.on_court[shot_defender];
        fouler.stats.personal_fouls += 1;
        Some(fouler.name().to_string())
    } else {
        None
    };

    let event = if roll_percent(rng) < score_chance {
        let points = shot.points();
        offense.on_court[shooter].stats.points += points;
        let assist = assister.map(|index| {
            let passer = &mut offense.on_court[index];
            passer.stats.assists += 1;
            passer.name().to_string()
        });
        let (team1_total, team2_total) =
            tally.record_score(offense_side, &offense.on_court[shooter], points);
        PlayEvent::Score {
            offense: offense_side,
            shooter: offense.on_court[shooter].name().to_string(),
            shot,
            points,
            assist,
            fouled_by,
            team1_total,
            team2_total,
        }
    } else {
        let weights: Vec<f64> = offense
            .on_court
            .iter()
            .chain(defense.on_court.iter())
            .map(|player| player.player.attributes.rebounding * player.stamina_factor())
            .collect();
        let pick = pick_weighted(&weights, weights.len().saturating_sub(1), rng);
        let shooter_name = offense.on_court[shooter].name().to_string();
        let offensive_rebound = pick < offense.on_court.len();
        let rebounder = if offensive_rebound {
            &mut offense.on_court[pick]
        } else {
            &mut defense.on_court[pick - offense.on_court.len()]
        };
        rebounder.stats.rebounds += 1;
        PlayEvent::Miss {
            offense: offense_side,
            shooter: shooter_name,
            shot,
            fouled_by,
            rebounder: rebounder.name().to_string(),
            offensive_rebound,
        }
    };

    trace!(%event, "possession resolved");
    tally.plays.push(event.clone());
    event
}
