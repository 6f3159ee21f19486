use std::fmt;

use serde::{Deserialize, Serialize};

/// The five court roles. Declaration order is the on-court slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::PG,
        Position::SG,
        Position::SF,
        Position::PF,
        Position::C,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PG => "PG",
            Self::SG => "SG",
            Self::SF => "SF",
            Self::PF => "PF",
            Self::C => "C",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    pub inside_scoring: f64,
    pub mid_range: f64,
    pub three_point: f64,
    pub playmaking: f64,
    pub perimeter_defense: f64,
    pub interior_defense: f64,
    pub rebounding: f64,
    pub athleticism: f64,
    pub basketball_iq: f64,
}

impl PlayerAttributes {
    /// Every rating set to `value`.
    pub const fn uniform(value: f64) -> Self {
        Self {
            inside_scoring: value,
            mid_range: value,
            three_point: value,
            playmaking: value,
            perimeter_defense: value,
            interior_defense: value,
            rebounding: value,
            athleticism: value,
            basketball_iq: value,
        }
    }

    pub fn scoring(&self, shot: ShotType) -> f64 {
        match shot {
            ShotType::Inside => self.inside_scoring,
            ShotType::Mid => self.mid_range,
            ShotType::Three => self.three_point,
        }
    }

    /// Rating used to contest `shot`: interior for shots at the rim, perimeter otherwise.
    pub fn contest(&self, shot: ShotType) -> f64 {
        match shot {
            ShotType::Inside => self.interior_defense,
            ShotType::Mid | ShotType::Three => self.perimeter_defense,
        }
    }

    pub fn named(&self) -> [(&'static str, f64); 9] {
        [
            ("inside_scoring", self.inside_scoring),
            ("mid_range", self.mid_range),
            ("three_point", self.three_point),
            ("playmaking", self.playmaking),
            ("perimeter_defense", self.perimeter_defense),
            ("interior_defense", self.interior_defense),
            ("rebounding", self.rebounding),
            ("athleticism", self.athleticism),
            ("basketball_iq", self.basketball_iq),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CareerStats {
    /// Share of team possessions used, in percent.
    pub usage_rate: f64,
    /// Field goal percentage, in percent.
    pub field_goal_pct: f64,
}

/// Relative shot preference weights; they need not sum to anything in particular.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotTendencies {
    pub inside: f64,
    pub mid: f64,
    pub three: f64,
}

impl ShotTendencies {
    pub fn weights(&self) -> [f64; 3] {
        [self.inside, self.mid, self.three]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    Inside,
    Mid,
    Three,
}

impl ShotType {
    /// Indexed the same way as [ShotTendencies::weights].
    pub const ORDER: [ShotType; 3] = [ShotType::Inside, ShotType::Mid, ShotType::Three];

    pub const fn points(self) -> u32 {
        match self {
            Self::Three => 3,
            Self::Inside | Self::Mid => 2,
        }
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable catalog key.
    pub id: String,
    pub name: String,
    #[serde(rename = "pos")]
    pub position: Position,
    pub tier: String,
    pub attributes: PlayerAttributes,
    pub career_stats: CareerStats,
    pub shot_tendencies: ShotTendencies,
    /// Soft cap on minutes; substitution only considers players still under it.
    pub target_minutes: u32,
    pub foul_tendency: f64,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub era: String,
}

impl Player {
    /// Stand-in used when an award has no candidates at all.
    pub fn placeholder() -> Self {
        Self {
            id: String::new(),
            name: "Unknown".to_string(),
            position: Position::PG,
            tier: String::new(),
            attributes: PlayerAttributes::uniform(0.0),
            career_stats: CareerStats {
                usage_rate: 0.0,
                field_goal_pct: 0.0,
            },
            shot_tendencies: ShotTendencies {
                inside: 0.0,
                mid: 0.0,
                three: 0.0,
            },
            target_minutes: 0,
            foul_tendency: 0.0,
            traits: Vec::new(),
            era: String::new(),
        }
    }
}
