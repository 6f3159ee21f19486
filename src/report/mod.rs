//! Output artifacts built from finished games and series.

pub mod box_score;
pub mod narrative;

use thiserror::Error;

pub use box_score::{box_score_rows, write_box_score, BoxScoreRow};
pub use narrative::{GameBrief, SeriesBrief};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
