//! Box score CSV export: one row per rostered player, team 1 first.

use std::io::Write;

use serde::Serialize;

use crate::report::ReportError;
use crate::sim::game::GameResult;
use crate::sim::state::TeamInGame;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxScoreRow {
    pub team: String,
    pub player: String,
    pub position: String,
    pub pts: u32,
    pub reb: u32,
    pub ast: u32,
    pub pf: u32,
    pub min: u32,
    /// Rounded to one decimal.
    pub stamina: f64,
    pub on_court: bool,
}

fn team_rows(team: &TeamInGame) -> impl Iterator<Item = BoxScoreRow> + '_ {
    let on_court = team.on_court.iter().map(|player| (player, true));
    let bench = team.bench.iter().map(|player| (player, false));
    on_court.chain(bench).map(|(player, on_court)| BoxScoreRow {
        team: team.name.clone(),
        player: player.name().to_string(),
        position: player.position().to_string(),
        pts: player.stats.points,
        reb: player.stats.rebounds,
        ast: player.stats.assists,
        pf: player.stats.personal_fouls,
        min: player.stats.minutes,
        stamina: (player.stamina * 10.0).round() / 10.0,
        on_court,
    })
}

pub fn box_score_rows(result: &GameResult) -> Vec<BoxScoreRow> {
    team_rows(&result.team1)
        .chain(team_rows(&result.team2))
        .collect()
}

/// Write the final box score as CSV with a header row.
pub fn write_box_score<W: Write>(result: &GameResult, writer: W) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in box_score_rows(result) {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
