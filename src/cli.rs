use std::fs::File;
use std::io::{self, Write as _};
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::data::catalog::PlayerCatalog;
use crate::data::roster::Matchup;
use crate::data::validate::{
    validate_catalog, validate_matchup, ValidationReport, ValidationSeverity,
};
use crate::parallel::pool::WorkerPool;
use crate::projection::project_matchup;
use crate::report::{write_box_score, GameBrief, SeriesBrief};
use crate::sim::game::{GameResult, GameSession};
use crate::sim::rng::{entropy_seed, Rng};
use crate::sim::series::{Series, SeriesResult};
use crate::sim::state::TeamInGame;

const USAGE: &str = "usage: buzzer <game|series|project|validate|export>";
const DEFAULT_PROJECTION_SERIES: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Game,
    Series,
    Project,
    Validate,
    Export,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("game") => Some(Command::Game),
        Some("series") => Some(Command::Series),
        Some("project") => Some(Command::Project),
        Some("validate") => Some(Command::Validate),
        Some("export") => Some(Command::Export),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };

    match command {
        Command::Game => handle_game(args, &config),
        Command::Series => handle_series(args, &config),
        Command::Project => handle_project(args, &config),
        Command::Validate => handle_validate(args, &config),
        Command::Export => handle_export(args, &config),
    }
}

/// Positional arguments after the command, flags removed.
fn positional(args: &[String]) -> Vec<&String> {
    args.iter()
        .skip(2)
        .filter(|arg| !arg.starts_with("--"))
        .collect()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn resolve_seed(raw: Option<&String>, config: &AppConfig) -> u64 {
    let fallback = config.seed.unwrap_or_else(entropy_seed);
    match raw {
        Some(_) => parse_u64_arg(raw, "seed", fallback),
        None => fallback,
    }
}

/// Catalog from config, and teams from the matchup file or `--random`.
fn load_teams(
    args: &[String],
    config: &AppConfig,
    rng: &mut Rng,
) -> Result<(PlayerCatalog, [TeamInGame; 2]), String> {
    let catalog = PlayerCatalog::load_or_builtin(config.catalog_path.as_deref());
    let matchup = if has_flag(args, "--random") {
        Matchup::random(&catalog, rng)
    } else {
        Matchup::load(&config.matchup_path).map_err(|err| err.to_string())?
    };
    let teams = matchup.to_teams(&catalog).map_err(|err| err.to_string())?;
    Ok((catalog, teams))
}

fn print_json<T: Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

/// Delay before the next quarter; none after the final one.
fn quarter_pause(config: &AppConfig, game_over: bool) -> Option<Duration> {
    (config.pace_ms > 0 && !game_over).then(|| config.pace())
}

#[derive(Serialize)]
struct GamePayload<'a> {
    seed: u64,
    brief: GameBrief,
    result: &'a GameResult,
}

fn handle_game(args: &[String], config: &AppConfig) -> i32 {
    let positional = positional(args);
    let seed = resolve_seed(positional.first().copied(), config);
    let as_table = has_flag(args, "--table");
    let mut rng = Rng::new(seed);
    let (catalog, [team1, team2]) = match load_teams(args, config, &mut rng) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("failed to load rosters: {err}");
            return 1;
        }
    };

    let mut session = GameSession::new(team1, team2);
    while let Some(log) = session.simulate_next_quarter(&mut rng) {
        if as_table {
            println!(
                "Q{}\tplays={}\tlead_changes={}\tstar={}",
                log.quarter,
                log.plays.len(),
                log.lead_changes,
                log.star
            );
        }
        if let Some(delay) = quarter_pause(config, session.is_complete()) {
            thread::sleep(delay);
        }
    }
    let result = session.finalize(1, &catalog);
    info!(seed, winner = %result.winner_name, "game command finished");

    if as_table {
        println!("quarter\tteam1\tteam2");
        for (index, score) in result.game_score.quarters().iter().enumerate() {
            println!("{}\t{}\t{}", index + 1, score.team1, score.team2);
        }
        println!("{}", GameBrief::from_result(&result));
        return 0;
    }

    print_json(
        &GamePayload {
            seed,
            brief: GameBrief::from_result(&result),
            result: &result,
        },
        "game result",
    )
}

#[derive(Serialize)]
struct SeriesPayload<'a> {
    seed: u64,
    brief: SeriesBrief,
    result: &'a SeriesResult,
}

fn handle_series(args: &[String], config: &AppConfig) -> i32 {
    let positional = positional(args);
    let seed = resolve_seed(positional.first().copied(), config);
    let as_table = has_flag(args, "--table");
    let mut rng = Rng::new(seed);
    let (catalog, [team1, team2]) = match load_teams(args, config, &mut rng) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("failed to load rosters: {err}");
            return 1;
        }
    };

    let mut series = Series::new(team1, team2);
    if as_table {
        println!("game\tscore\twinner\tmvp");
    }
    while let Some(game) = series.play_next_game(&catalog, &mut rng) {
        if as_table {
            println!(
                "{}\t{}\t{}\t{}",
                game.game_number,
                game.score,
                game.winner_name,
                game.mvp.name()
            );
        }
    }
    let result = series.finish();
    let brief = SeriesBrief::from_result(&result);

    if as_table {
        println!("{brief}");
        return 0;
    }
    print_json(
        &SeriesPayload {
            seed,
            brief,
            result: &result,
        },
        "series result",
    )
}

fn handle_project(args: &[String], config: &AppConfig) -> i32 {
    let positional = positional(args);
    let series_count = parse_u32_arg(positional.first().copied(), "series", DEFAULT_PROJECTION_SERIES);
    let seed = resolve_seed(positional.get(1).copied(), config);
    let as_table = has_flag(args, "--table");
    let mut rng = Rng::new(seed);
    let (catalog, teams) = match load_teams(args, config, &mut rng) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("failed to load rosters: {err}");
            return 1;
        }
    };

    let pool = WorkerPool::with_workers(config.workers);
    let report = project_matchup(&teams, &catalog, series_count as usize, seed, &pool);

    if as_table {
        println!("team\tseries_wins");
        println!("{}\t{}", report.team1, report.team1_series_wins);
        println!("{}\t{}", report.team2, report.team2_series_wins);
        println!("games\tcount");
        for (games, count) in &report.length_histogram {
            println!("{games}\t{count}");
        }
        println!("mean_games\t{:.3}", report.mean_games);
        return 0;
    }
    print_json(&report, "projection report")
}

#[derive(Serialize)]
struct ValidationPayload {
    catalog: ValidationReport,
    matchup: ValidationReport,
}

fn handle_validate(args: &[String], config: &AppConfig) -> i32 {
    let positional = positional(args);
    let path = positional
        .first()
        .map(|path| std::path::PathBuf::from(path.as_str()))
        .unwrap_or_else(|| config.matchup_path.clone());
    let catalog = PlayerCatalog::load_or_builtin(config.catalog_path.as_deref());

    let matchup = match Matchup::load(&path) {
        Ok(matchup) => matchup,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    let payload = ValidationPayload {
        catalog: validate_catalog(&catalog),
        matchup: validate_matchup(&matchup, &catalog),
    };
    for diag in payload
        .catalog
        .diagnostics
        .iter()
        .chain(payload.matchup.diagnostics.iter())
    {
        eprintln!("- {diag}");
    }

    if payload.catalog.has_errors() || payload.matchup.has_errors() {
        let errors = payload.catalog.count(ValidationSeverity::Error)
            + payload.matchup.count(ValidationSeverity::Error);
        eprintln!("validation failed: {errors} error(s)");
        return 1;
    }
    println!("validation passed: {}", path.display());
    0
}

fn handle_export(args: &[String], config: &AppConfig) -> i32 {
    let positional = positional(args);
    let Some(out) = positional.first() else {
        eprintln!("usage: buzzer export <out.csv|-> [seed]");
        return 2;
    };
    let seed = resolve_seed(positional.get(1).copied(), config);
    let mut rng = Rng::new(seed);
    let (catalog, [team1, team2]) = match load_teams(args, config, &mut rng) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("failed to load rosters: {err}");
            return 1;
        }
    };

    let mut session = GameSession::new(team1, team2);
    session.simulate_remaining(&mut rng);
    let result = session.finalize(1, &catalog);

    let written = if out.as_str() == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_box_score(&result, &mut handle).and_then(|()| handle.flush().map_err(Into::into))
    } else {
        match File::create(out.as_str()) {
            Ok(file) => write_box_score(&result, file),
            Err(err) => Err(err.into()),
        }
    };

    match written {
        Ok(()) => {
            if out.as_str() != "-" {
                println!("box score written: {out}");
            }
            0
        }
        Err(err) => {
            eprintln!("export failed: {err}");
            1
        }
    }
}

fn parse_u32_arg(raw: Option<&String>, name: &str, default: u32) -> u32 {
    raw.and_then(|value| value.parse::<u32>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                warn!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

fn parse_u64_arg(raw: Option<&String>, name: &str, default: u64) -> u64 {
    raw.and_then(|value| value.parse::<u64>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                warn!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command(&args(&["buzzer", "game"])), Some(Command::Game));
        assert_eq!(parse_command(&args(&["buzzer", "export", "-"])), Some(Command::Export));
        assert_eq!(parse_command(&args(&["buzzer", "serve"])), None);
        assert_eq!(parse_command(&args(&["buzzer"])), None);
    }

    #[test]
    fn flags_are_not_positional() {
        let list = args(&["buzzer", "project", "--table", "50", "--random", "9"]);
        let found: Vec<&str> = positional(&list).into_iter().map(String::as_str).collect();
        assert_eq!(found, vec!["50", "9"]);
        assert!(has_flag(&list, "--random"));
    }

    #[test]
    fn pace_applies_between_quarters_only() {
        let paced = AppConfig {
            pace_ms: 40,
            ..AppConfig::default()
        };
        assert_eq!(quarter_pause(&paced, false), Some(Duration::from_millis(40)));
        assert_eq!(quarter_pause(&paced, true), None);
        assert_eq!(quarter_pause(&AppConfig::default(), false), None);
    }

    #[test]
    fn seed_argument_beats_config() {
        let config = AppConfig {
            seed: Some(5),
            ..AppConfig::default()
        };
        assert_eq!(resolve_seed(Some(&"12".to_string()), &config), 12);
        assert_eq!(resolve_seed(None, &config), 5);
        assert_eq!(resolve_seed(Some(&"nope".to_string()), &config), 5);
    }
}
