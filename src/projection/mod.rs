//! Many independent best-of-seven series over one matchup, run in parallel.

pub mod monte_carlo;

pub use monte_carlo::{
    project_matchup, project_matchup_with_progress, run_series_once, ProjectionReport,
    SeriesOutcome,
};
