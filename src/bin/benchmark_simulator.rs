//! Run the game simulator benchmark and optionally append one line to a log file for trend tracking.
//!
//! Usage:
//!   cargo run --release --bin benchmark_simulator
//!   cargo run --release --bin benchmark_simulator -- --log
//!
//! --log  Append one row to benchmark_log.csv (date, games_per_sec, games_per_min, possessions_per_sec).

use std::fs::OpenOptions;
use std::io::Write;
use std::time::Instant;

use buzzer::data::catalog::PlayerCatalog;
use buzzer::data::roster::Matchup;
use buzzer::sim::game::simulate_game;
use buzzer::sim::quarter::POSSESSIONS_PER_QUARTER;
use buzzer::sim::rng::Rng;

const POSSESSIONS_PER_GAME: u32 = POSSESSIONS_PER_QUARTER * 4;

fn append_log(games_per_sec: f64, games_per_min: f64, possessions_per_sec: f64) -> std::io::Result<()> {
    let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let line = format!(
        "{},{:.4},{:.4},{:.4}\n",
        date, games_per_sec, games_per_min, possessions_per_sec
    );
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("benchmark_log.csv")?;
    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        file.write_all(b"date,games_per_sec,games_per_min,possessions_per_sec\n")?;
    }
    file.write_all(line.as_bytes())?;
    file.flush()
}

fn main() {
    let log = std::env::args().any(|a| a == "--log");

    let catalog = PlayerCatalog::builtin();
    let mut rng = Rng::new(7);
    let teams = Matchup::random(&catalog, &mut rng).to_teams(&catalog);
    let [team1, team2] = match teams {
        Ok(teams) => teams,
        Err(err) => {
            eprintln!("cannot build benchmark rosters: {err}");
            std::process::exit(1);
        }
    };

    // Run for at least this long or this many games
    const MIN_DURATION_MS: u128 = 2000;
    const MIN_GAMES: u32 = 200;

    let start = Instant::now();
    let mut games: u32 = 0;
    while start.elapsed().as_millis() < MIN_DURATION_MS || games < MIN_GAMES {
        let _ = simulate_game(
            team1.reset_for_new_game(),
            team2.reset_for_new_game(),
            games + 1,
            &catalog,
            &mut rng,
        );
        games += 1;
    }
    let elapsed_secs = start.elapsed().as_secs_f64();

    let games_per_sec = games as f64 / elapsed_secs;
    let games_per_min = games_per_sec * 60.0;
    let possessions_per_sec = games_per_sec * POSSESSIONS_PER_GAME as f64;

    println!("Game simulator benchmark ({POSSESSIONS_PER_GAME} possessions/game):");
    println!("  Games:         {}", games);
    println!("  Duration:      {:.2} s", elapsed_secs);
    println!("  Games/s:       {:.2}", games_per_sec);
    println!("  Games/min:     {:.2}", games_per_min);
    println!("  Possessions/s: {:.2}", possessions_per_sec);

    if log {
        match append_log(games_per_sec, games_per_min, possessions_per_sec) {
            Ok(()) => println!("Appended to benchmark_log.csv"),
            Err(err) => {
                eprintln!("failed to append benchmark_log.csv: {err}");
                std::process::exit(1);
            }
        }
    }
}
