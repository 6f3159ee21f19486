//! Per-game mutable state layered over catalog players.

use serde::{Deserialize, Serialize};

use crate::data::player::{Player, Position};

pub const MAX_STAMINA: f64 = 100.0;
pub const MIN_STAMINA: f64 = 0.0;

/// Which of the two teams in a game. `Team1` is index 0 and has the ball on even possessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub const fn index(self) -> usize {
        match self {
            Self::Team1 => 0,
            Self::Team2 => 1,
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::Team1 => Self::Team2,
            Self::Team2 => Self::Team1,
        }
    }

    /// Offense for the possession at `possession` (even -> Team1).
    pub const fn on_offense(possession: u32) -> Self {
        if possession % 2 == 0 {
            Self::Team1
        } else {
            Self::Team2
        }
    }
}

/// Current point leader. Encodes to 0/1/2 on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Leader {
    #[default]
    Tied,
    Team1,
    Team2,
}

impl Leader {
    pub fn from_totals(team1: u32, team2: u32) -> Self {
        match team1.cmp(&team2) {
            std::cmp::Ordering::Greater => Self::Team1,
            std::cmp::Ordering::Less => Self::Team2,
            std::cmp::Ordering::Equal => Self::Tied,
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::Tied => 0,
            Self::Team1 => 1,
            Self::Team2 => 2,
        }
    }
}

impl From<Leader> for u8 {
    fn from(leader: Leader) -> Self {
        leader.code()
    }
}

impl TryFrom<u8> for Leader {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Tied),
            1 => Ok(Self::Team1),
            2 => Ok(Self::Team2),
            other => Err(format!("invalid leader code {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub minutes: u32,
    pub personal_fouls: u32,
}

/// A catalog player plus this game's box score line and stamina.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePlayerState {
    pub player: Player,
    pub stats: PlayerStats,
    pub stamina: f64,
}

impl GamePlayerState {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            stats: PlayerStats::default(),
            stamina: MAX_STAMINA,
        }
    }

    /// Zero-stat, zero-stamina entry used when no real candidate exists.
    pub fn sentinel(player: Player) -> Self {
        Self {
            player,
            stats: PlayerStats::default(),
            stamina: MIN_STAMINA,
        }
    }

    pub fn id(&self) -> &str {
        &self.player.id
    }

    pub fn name(&self) -> &str {
        &self.player.name
    }

    pub fn position(&self) -> Position {
        self.player.position
    }

    /// Stamina as a 0..=1 multiplier on ratings.
    pub fn stamina_factor(&self) -> f64 {
        self.stamina / MAX_STAMINA
    }

    pub fn drain(&mut self, amount: f64) {
        self.stamina = (self.stamina - amount).max(MIN_STAMINA);
    }

    pub fn recover(&mut self, amount: f64) {
        self.stamina = (self.stamina + amount).min(MAX_STAMINA);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamInGame {
    pub name: String,
    /// Five players, slot order PG, SG, SF, PF, C. Slot order drives defensive matching.
    pub on_court: Vec<GamePlayerState>,
    pub bench: Vec<GamePlayerState>,
}

impl TeamInGame {
    pub fn new(
        name: impl Into<String>,
        on_court: Vec<GamePlayerState>,
        bench: Vec<GamePlayerState>,
    ) -> Self {
        Self {
            name: name.into(),
            on_court,
            bench,
        }
    }

    /// On-court then bench.
    pub fn all_players(&self) -> impl Iterator<Item = &GamePlayerState> {
        self.on_court.iter().chain(self.bench.iter())
    }

    /// First on-court slot holding `position`.
    pub fn on_court_at(&self, position: Position) -> Option<usize> {
        self.on_court
            .iter()
            .position(|player| player.position() == position)
    }

    pub fn total_points(&self) -> u32 {
        self.all_players().map(|player| player.stats.points).sum()
    }

    /// Fresh copy with zeroed stats and full stamina, keeping the starting lineup.
    pub fn reset_for_new_game(&self) -> Self {
        Self {
            name: self.name.clone(),
            on_court: self
                .on_court
                .iter()
                .map(|player| GamePlayerState::new(player.player.clone()))
                .collect(),
            bench: self
                .bench
                .iter()
                .map(|player| GamePlayerState::new(player.player.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamina_is_bounded_both_ways() {
        let mut state = GamePlayerState::new(Player::placeholder());
        state.drain(250.0);
        assert_eq!(state.stamina, MIN_STAMINA);
        state.recover(15.0);
        assert_eq!(state.stamina, 15.0);
        state.recover(500.0);
        assert_eq!(state.stamina, MAX_STAMINA);
    }

    #[test]
    fn leader_from_totals_and_codes() {
        assert_eq!(Leader::from_totals(10, 8), Leader::Team1);
        assert_eq!(Leader::from_totals(8, 10), Leader::Team2);
        assert_eq!(Leader::from_totals(9, 9), Leader::Tied);
        assert_eq!(serde_json::to_string(&Leader::Team2).expect("serialize"), "2");
        let parsed: Leader = serde_json::from_str("1").expect("deserialize");
        assert_eq!(parsed, Leader::Team1);
        assert!(serde_json::from_str::<Leader>("3").is_err());
    }

    #[test]
    fn offense_alternates_by_parity() {
        assert_eq!(Side::on_offense(0), Side::Team1);
        assert_eq!(Side::on_offense(1), Side::Team2);
        assert_eq!(Side::on_offense(46), Side::Team1);
        assert_eq!(Side::Team1.other(), Side::Team2);
    }
}
