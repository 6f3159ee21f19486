use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use buzzer::data::catalog::{CatalogError, PlayerCatalog};
use buzzer::data::player::{Position, ShotType};
use buzzer::data::roster::{random_team_sheet, Matchup, RosterError};
use buzzer::data::validate::{validate_matchup, ValidationSeverity};
use buzzer::sim::rng::Rng;

fn unique_temp_path(name: &str, ext: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("buzzer-{name}-{stamp}.{ext}"))
}

#[test]
fn shipped_catalog_file_matches_builtin() {
    let from_disk = PlayerCatalog::load("data/players.json").expect("catalog file loads");
    let builtin = PlayerCatalog::builtin();
    assert_eq!(from_disk.len(), builtin.len());
    assert_eq!(from_disk.players(), builtin.players());
    for position in Position::ALL {
        assert_eq!(builtin.by_position(position).count(), 6, "{position}");
    }
}

#[test]
fn catalog_load_reports_io_and_parse_errors() {
    let missing = unique_temp_path("missing", "json");
    assert!(matches!(
        PlayerCatalog::load(&missing),
        Err(CatalogError::Io { .. })
    ));

    let broken = unique_temp_path("broken", "json");
    fs::write(&broken, "{\"players\": [").expect("fixture should be written");
    assert!(matches!(
        PlayerCatalog::load(&broken),
        Err(CatalogError::Parse(_))
    ));
    let _ = fs::remove_file(broken);

    let fallback = PlayerCatalog::load_or_builtin(Some(missing.as_path()));
    assert_eq!(fallback.len(), PlayerCatalog::builtin().len());
}

#[test]
fn shot_values_and_tendencies() {
    assert_eq!(ShotType::Inside.points(), 2);
    assert_eq!(ShotType::Mid.points(), 2);
    assert_eq!(ShotType::Three.points(), 3);
    let catalog = PlayerCatalog::builtin();
    assert!(catalog
        .players()
        .iter()
        .all(|p| p.shot_tendencies.weights().iter().sum::<f64>() > 0.0));
}

#[test]
fn json_matchup_loads_like_yaml() {
    let yaml = Matchup::load("data/matchup.yaml").expect("yaml matchup");
    let path = unique_temp_path("matchup", "json");
    fs::write(&path, serde_json::to_string(&yaml).expect("matchup serializes"))
        .expect("fixture should be written");
    let json = Matchup::load(&path).expect("json matchup");
    let _ = fs::remove_file(path);
    assert_eq!(json, yaml);
}

#[test]
fn malformed_matchup_is_a_parse_error() {
    let path = unique_temp_path("bad-matchup", "yaml");
    fs::write(&path, "teams:\n  - name: Only One\n").expect("fixture should be written");
    let err = Matchup::load(&path).unwrap_err();
    let _ = fs::remove_file(path);
    assert!(matches!(err, RosterError::Parse { .. }));
}

#[test]
fn random_sheets_validate_cleanly() {
    let catalog = PlayerCatalog::builtin();
    let matchup = Matchup::random(&catalog, &mut Rng::new(12));
    let report = validate_matchup(&matchup, &catalog);
    assert_eq!(report.count(ValidationSeverity::Error), 0);
    assert_eq!(report.count(ValidationSeverity::Warning), 0);
    let [team1, team2] = matchup.to_teams(&catalog).expect("random sheets resolve");
    assert_eq!(team1.on_court.len() + team1.bench.len(), 10);
    assert_eq!(team2.on_court.len() + team2.bench.len(), 10);
}

#[test]
fn random_sheet_respects_exclusions() {
    let catalog = PlayerCatalog::builtin();
    let excluded: HashSet<String> = catalog
        .by_position(Position::PG)
        .take(4)
        .map(|p| p.id.clone())
        .collect();
    let sheet = random_team_sheet("Picky", &catalog, &excluded, &mut Rng::new(5));
    let pg_keys = [&sheet.starters[&Position::PG], &sheet.bench[&Position::PG]];
    for key in pg_keys {
        assert!(!excluded.contains(key));
    }
    assert_ne!(pg_keys[0], pg_keys[1]);
}
