//! Team sheets: which catalog player fills each starting and bench slot.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::catalog::PlayerCatalog;
use crate::data::player::Position;
use crate::sim::rng::RandomSource;
use crate::sim::state::{GamePlayerState, TeamInGame};
use crate::sim::weighted::pick_uniform;

pub const DEFAULT_MATCHUP_PATH: &str = "data/matchup.yaml";
pub const DEFAULT_TEAM_NAMES: [&str; 2] = ["Showtime Legends", "Modern Era Dominators"];

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read matchup {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse matchup {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("{team}: {slot} {position} slot is empty")]
    UnfilledSlot {
        team: String,
        slot: SlotKind,
        position: Position,
    },

    #[error("{team}: unknown player `{key}` at {position}")]
    UnknownPlayer {
        team: String,
        key: String,
        position: Position,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Starter,
    Bench,
}

impl SlotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Bench => "bench",
        }
    }
}

impl std::fmt::Display for SlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One team's selections, keyed by position. Values are catalog keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSheet {
    pub name: String,
    #[serde(default)]
    pub starters: BTreeMap<Position, String>,
    #[serde(default)]
    pub bench: BTreeMap<Position, String>,
}

impl TeamSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn slots(&self, kind: SlotKind) -> &BTreeMap<Position, String> {
        match kind {
            SlotKind::Starter => &self.starters,
            SlotKind::Bench => &self.bench,
        }
    }

    /// Every filled slot as (kind, position, key), starters first, PG..C.
    pub fn entries(&self) -> impl Iterator<Item = (SlotKind, Position, &str)> {
        [SlotKind::Starter, SlotKind::Bench]
            .into_iter()
            .flat_map(move |kind| {
                self.slots(kind)
                    .iter()
                    .map(move |(&position, key)| (kind, position, key.as_str()))
            })
    }

    fn project_slots(
        &self,
        kind: SlotKind,
        catalog: &PlayerCatalog,
    ) -> Result<Vec<GamePlayerState>, RosterError> {
        Position::ALL
            .iter()
            .map(|&position| {
                let key = self
                    .slots(kind)
                    .get(&position)
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| RosterError::UnfilledSlot {
                        team: self.name.clone(),
                        slot: kind,
                        position,
                    })?;
                let player = catalog
                    .resolve(key)
                    .ok_or_else(|| RosterError::UnknownPlayer {
                        team: self.name.clone(),
                        key: key.clone(),
                        position,
                    })?;
                Ok(GamePlayerState::new(player.clone()))
            })
            .collect()
    }

    /// Fresh in-game team: on-court PG..C, bench in the same order.
    pub fn to_team_in_game(&self, catalog: &PlayerCatalog) -> Result<TeamInGame, RosterError> {
        Ok(TeamInGame::new(
            self.name.clone(),
            self.project_slots(SlotKind::Starter, catalog)?,
            self.project_slots(SlotKind::Bench, catalog)?,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub teams: [TeamSheet; 2],
}

impl Matchup {
    pub fn new(team1: TeamSheet, team2: TeamSheet) -> Self {
        Self {
            teams: [team1, team2],
        }
    }

    /// Load from YAML, or JSON when the extension is `.json`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            serde_json::from_str(&raw).map_err(|err| err.to_string())
        } else {
            serde_yaml::from_str(&raw).map_err(|err| err.to_string())
        };
        parsed.map_err(|message| RosterError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, RosterError> {
        serde_yaml::from_str(raw).map_err(|err| RosterError::Parse {
            path: PathBuf::from("<inline>"),
            message: err.to_string(),
        })
    }

    /// Both sides as fresh in-game teams.
    pub fn to_teams(&self, catalog: &PlayerCatalog) -> Result<[TeamInGame; 2], RosterError> {
        Ok([
            self.teams[0].to_team_in_game(catalog)?,
            self.teams[1].to_team_in_game(catalog)?,
        ])
    }

    /// Two random sheets under the default names, no player on both.
    pub fn random<R: RandomSource + ?Sized>(catalog: &PlayerCatalog, rng: &mut R) -> Self {
        let mut used = HashSet::new();
        let team1 = random_team_sheet(DEFAULT_TEAM_NAMES[0], catalog, &used, rng);
        used.extend(team1.entries().map(|(_, _, key)| key.to_string()));
        let team2 = random_team_sheet(DEFAULT_TEAM_NAMES[1], catalog, &used, rng);
        Self::new(team1, team2)
    }
}

/// Fill every starter and bench slot with a uniformly random player of that
/// position not in `excluded` and not already on this sheet. A slot stays
/// empty when the position's pool runs dry.
pub fn random_team_sheet<R: RandomSource + ?Sized>(
    name: &str,
    catalog: &PlayerCatalog,
    excluded: &HashSet<String>,
    rng: &mut R,
) -> TeamSheet {
    let mut sheet = TeamSheet::new(name);
    let mut taken: HashSet<String> = excluded.clone();

    for kind in [SlotKind::Starter, SlotKind::Bench] {
        for position in Position::ALL {
            let pool: Vec<&str> = catalog
                .by_position(position)
                .map(|player| player.id.as_str())
                .filter(|key| !taken.contains(*key))
                .collect();
            if pool.is_empty() {
                continue;
            }
            let key = pool[pick_uniform(pool.len(), rng)].to_string();
            taken.insert(key.clone());
            match kind {
                SlotKind::Starter => sheet.starters.insert(position, key),
                SlotKind::Bench => sheet.bench.insert(position, key),
            };
        }
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::Rng;

    #[test]
    fn bundled_matchup_projects_to_full_rosters() {
        let catalog = PlayerCatalog::builtin();
        let matchup = Matchup::from_yaml_str(include_str!("../../data/matchup.yaml"))
            .expect("bundled matchup parses");
        let [team1, team2] = matchup.to_teams(&catalog).expect("bundled matchup resolves");

        assert_eq!(team1.name, DEFAULT_TEAM_NAMES[0]);
        assert_eq!(team2.name, DEFAULT_TEAM_NAMES[1]);
        for team in [&team1, &team2] {
            let positions: Vec<Position> = team.on_court.iter().map(|p| p.position()).collect();
            assert_eq!(positions, Position::ALL.to_vec());
            assert_eq!(team.bench.len(), 5);
            assert!(team.all_players().all(|p| p.stamina == 100.0));
        }
    }

    #[test]
    fn missing_slot_is_reported() {
        let catalog = PlayerCatalog::builtin();
        let mut sheet = TeamSheet::new("Short");
        for player in Position::ALL.iter().filter_map(|&pos| catalog.by_position(pos).next()) {
            sheet.starters.insert(player.position, player.id.clone());
        }
        let err = sheet.to_team_in_game(&catalog).unwrap_err();
        assert!(matches!(
            err,
            RosterError::UnfilledSlot {
                slot: SlotKind::Bench,
                position: Position::PG,
                ..
            }
        ));
    }

    #[test]
    fn unknown_key_is_reported() {
        let catalog = PlayerCatalog::builtin();
        let mut sheet = random_team_sheet("Rand", &catalog, &HashSet::new(), &mut Rng::new(1));
        sheet.starters.insert(Position::C, "nobody_at_all".to_string());
        let err = sheet.to_team_in_game(&catalog).unwrap_err();
        assert!(matches!(err, RosterError::UnknownPlayer { position: Position::C, .. }));
    }

    #[test]
    fn random_matchup_never_repeats_a_player() {
        let catalog = PlayerCatalog::builtin();
        let matchup = Matchup::random(&catalog, &mut Rng::new(99));
        let keys: Vec<&str> = matchup
            .teams
            .iter()
            .flat_map(|sheet| sheet.entries().map(|(_, _, key)| key))
            .collect();
        assert_eq!(keys.len(), 20);
        let unique: HashSet<&str> = keys.iter().copied().collect();
        assert_eq!(unique.len(), 20);
        for sheet in &matchup.teams {
            for (_, position, key) in sheet.entries() {
                assert_eq!(catalog.get(key).map(|p| p.position), Some(position));
            }
        }
    }

    #[test]
    fn exhausted_pool_leaves_slot_empty() {
        let catalog = PlayerCatalog::builtin();
        let excluded: HashSet<String> = catalog
            .by_position(Position::C)
            .skip(1)
            .map(|player| player.id.clone())
            .collect();
        let sheet = random_team_sheet("Thin", &catalog, &excluded, &mut Rng::new(3));
        assert!(sheet.starters.contains_key(&Position::C));
        assert!(!sheet.bench.contains_key(&Position::C));
    }
}
