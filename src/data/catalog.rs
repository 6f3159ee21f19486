//! Read-only player catalog. Loaded once and passed by reference to whatever
//! needs key -> player lookup.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::data::player::{Player, Position};

pub const DEFAULT_CATALOG_PATH: &str = "data/players.json";

const BUILTIN_CATALOG_JSON: &str = include_str!("../../data/players.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate player key `{0}`")]
    DuplicateKey(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    players: Vec<Player>,
}

/// Normalize a string for lookup: lowercase, collapse spaces/underscores.
fn normalize_lookup(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '_' { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Debug, Clone, Default)]
pub struct PlayerCatalog {
    /// All players in file order.
    players: Vec<Player>,
    by_key: HashMap<String, usize>,
}

impl PlayerCatalog {
    pub fn from_players(players: Vec<Player>) -> Result<Self, CatalogError> {
        let mut by_key = HashMap::with_capacity(players.len());
        for (index, player) in players.iter().enumerate() {
            if by_key.insert(player.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateKey(player.id.clone()));
            }
        }
        Ok(Self { players, by_key })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let parsed: CatalogFile = serde_json::from_str(raw)?;
        Self::from_players(parsed.players)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Self {
        match Self::from_json_str(BUILTIN_CATALOG_JSON) {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!(%err, "built-in catalog is invalid, using an empty catalog");
                Self::default()
            }
        }
    }

    /// Load from `path` when given and readable, otherwise the built-in catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|err| {
                warn!(%err, "falling back to built-in catalog");
                Self::builtin()
            }),
            None => Self::builtin(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Player> {
        self.by_key.get(key).map(|&index| &self.players[index])
    }

    /// Resolve by exact key, then by normalized key or name.
    pub fn resolve(&self, name_or_key: &str) -> Option<&Player> {
        if let Some(player) = self.get(name_or_key) {
            return Some(player);
        }
        let normalized = normalize_lookup(name_or_key);
        self.players.iter().find(|player| {
            normalize_lookup(&player.id) == normalized || normalize_lookup(&player.name) == normalized
        })
    }

    pub fn by_position(&self, position: Position) -> impl Iterator<Item = &Player> {
        self.players
            .iter()
            .filter(move |player| player.position == position)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn first(&self) -> Option<&Player> {
        self.players.first()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_fills_every_position() {
        let catalog = PlayerCatalog::builtin();
        assert_eq!(catalog.len(), 30);
        for position in Position::ALL {
            assert_eq!(catalog.by_position(position).count(), 6, "{position}");
        }
    }

    #[test]
    fn resolve_accepts_names_and_loose_keys() {
        let catalog = PlayerCatalog::builtin();
        let by_key = catalog.get("marcus_vale").expect("key lookup");
        let by_name = catalog.resolve("Marcus Vale").expect("name lookup");
        let by_loose = catalog.resolve("  MARCUS   vale ").expect("loose lookup");
        assert_eq!(by_key.id, by_name.id);
        assert_eq!(by_key.id, by_loose.id);
        assert!(catalog.resolve("nobody at all").is_none());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let catalog = PlayerCatalog::builtin();
        let mut players = catalog.players().to_vec();
        players.push(players[0].clone());
        let err = PlayerCatalog::from_players(players).expect_err("duplicate should fail");
        assert!(matches!(err, CatalogError::DuplicateKey(_)));
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let catalog =
            PlayerCatalog::load_or_builtin(Some(Path::new("definitely/not/here.json")));
        assert_eq!(catalog.len(), PlayerCatalog::builtin().len());
    }
}
