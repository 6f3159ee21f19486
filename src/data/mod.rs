pub mod catalog;
pub mod player;
pub mod roster;
pub mod validate;

pub use catalog::{CatalogError, PlayerCatalog};
pub use player::{Player, Position, ShotType};
pub use roster::{Matchup, RosterError, TeamSheet};
