use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::data::catalog::PlayerCatalog;
use crate::parallel::batch::fixed_size_ranges;
use crate::parallel::pool::WorkerPool;
use crate::sim::rng::Rng;
use crate::sim::series::{Series, MAX_GAMES, WINS_TO_CLINCH};
use crate::sim::state::{Side, TeamInGame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesOutcome {
    pub index: usize,
    pub seed: u64,
    pub winner: Side,
    pub team1_wins: u32,
    pub team2_wins: u32,
    pub games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionReport {
    pub run_id: Uuid,
    pub seed: u64,
    pub series: usize,
    pub team1: String,
    pub team2: String,
    pub team1_series_wins: usize,
    pub team2_series_wins: usize,
    pub team1_win_rate: f64,
    pub mean_games: f64,
    /// Series length (4..=7) -> count. Every length is present.
    pub length_histogram: BTreeMap<u32, usize>,
    pub generated_at: DateTime<Utc>,
}

impl ProjectionReport {
    fn from_outcomes(teams: &[TeamInGame; 2], seed: u64, outcomes: &[SeriesOutcome]) -> Self {
        let mut length_histogram: BTreeMap<u32, usize> =
            (WINS_TO_CLINCH..=MAX_GAMES).map(|games| (games, 0)).collect();
        let mut team1_series_wins = 0usize;
        let mut total_games = 0u64;
        for outcome in outcomes {
            *length_histogram.entry(outcome.games).or_insert(0) += 1;
            if outcome.winner == Side::Team1 {
                team1_series_wins += 1;
            }
            total_games += u64::from(outcome.games);
        }

        let series = outcomes.len();
        let (team1_win_rate, mean_games) = if series == 0 {
            (0.0, 0.0)
        } else {
            (
                team1_series_wins as f64 / series as f64,
                total_games as f64 / series as f64,
            )
        };

        Self {
            run_id: Uuid::new_v4(),
            seed,
            series,
            team1: teams[0].name.clone(),
            team2: teams[1].name.clone(),
            team1_series_wins,
            team2_series_wins: series - team1_series_wins,
            team1_win_rate,
            mean_games,
            length_histogram,
            generated_at: Utc::now(),
        }
    }
}

/// Seed for series `index` of a run seeded with `seed`.
pub fn series_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add(index as u64)
}

/// Play one full series from fresh copies of `teams`.
pub fn run_series_once(
    teams: &[TeamInGame; 2],
    catalog: &PlayerCatalog,
    index: usize,
    seed: u64,
) -> SeriesOutcome {
    let series_seed = series_seed(seed, index);
    let mut rng = Rng::new(series_seed);
    let mut series = Series::new(teams[0].reset_for_new_game(), teams[1].reset_for_new_game());
    series.play_out(catalog, &mut rng);

    let team1_wins = series.wins(Side::Team1);
    let team2_wins = series.wins(Side::Team2);
    SeriesOutcome {
        index,
        seed: series_seed,
        winner: if team1_wins >= team2_wins {
            Side::Team1
        } else {
            Side::Team2
        },
        team1_wins,
        team2_wins,
        games: series.games().len() as u32,
    }
}

fn run_range(
    teams: &[TeamInGame; 2],
    catalog: &PlayerCatalog,
    seed: u64,
    start: usize,
    end: usize,
) -> Vec<SeriesOutcome> {
    (start..end)
        .into_par_iter()
        .map(|index| run_series_once(teams, catalog, index, seed))
        .collect()
}

/// Project `series_count` series on `pool`. Results depend only on `seed`,
/// never on the worker count.
pub fn project_matchup(
    teams: &[TeamInGame; 2],
    catalog: &PlayerCatalog,
    series_count: usize,
    seed: u64,
    pool: &WorkerPool,
) -> ProjectionReport {
    let outcomes = pool.install(|| run_range(teams, catalog, seed, 0, series_count));
    let report = ProjectionReport::from_outcomes(teams, seed, &outcomes);
    info!(
        run_id = %report.run_id,
        series = report.series,
        seed,
        workers = pool.workers,
        team1_win_rate = report.team1_win_rate,
        "projection complete"
    );
    report
}

/// Like [project_matchup] but runs in chunks of `batch_size` and calls
/// `on_progress(done, total)` after each chunk.
pub fn project_matchup_with_progress<F>(
    teams: &[TeamInGame; 2],
    catalog: &PlayerCatalog,
    series_count: usize,
    seed: u64,
    pool: &WorkerPool,
    batch_size: usize,
    mut on_progress: F,
) -> ProjectionReport
where
    F: FnMut(usize, usize),
{
    let mut outcomes = Vec::with_capacity(series_count);
    for (start, end) in fixed_size_ranges(series_count, batch_size) {
        let chunk = pool.install(|| run_range(teams, catalog, seed, start, end));
        outcomes.extend(chunk);
        on_progress(end, series_count);
    }
    let report = ProjectionReport::from_outcomes(teams, seed, &outcomes);
    info!(
        run_id = %report.run_id,
        series = report.series,
        seed,
        batch_size,
        team1_win_rate = report.team1_win_rate,
        "projection complete"
    );
    report
}
