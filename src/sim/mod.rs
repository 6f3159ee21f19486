//! Possession-level basketball engine: possessions roll up into quarters,
//! quarters into games, games into a best-of-seven series.

pub mod awards;
pub mod game;
pub mod possession;
pub mod quarter;
pub mod rng;
pub mod series;
pub mod state;
pub mod weighted;

pub use game::{simulate_game, GameResult, GameScore, GameSession};
pub use possession::{resolve_possession, PlayEvent};
pub use quarter::{simulate_quarter, PlayByPlayLog, QuarterOutcome, QuarterScore};
pub use rng::{RandomSource, Rng, SequenceRng};
pub use series::{simulate_series, Series, SeriesResult};
pub use state::{GamePlayerState, Leader, PlayerStats, Side, TeamInGame};
