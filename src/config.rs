//! Runtime configuration: defaults, then an optional YAML file, then env vars.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::data::roster::DEFAULT_MATCHUP_PATH;

pub const CONFIG_ENV: &str = "BUZZER_CONFIG";
pub const CATALOG_ENV: &str = "BUZZER_CATALOG";
pub const MATCHUP_ENV: &str = "BUZZER_MATCHUP";
pub const SEED_ENV: &str = "BUZZER_SEED";
pub const WORKERS_ENV: &str = "BUZZER_WORKERS";
pub const PACE_ENV: &str = "BUZZER_PACE_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid value for `{var}`: '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Player catalog JSON. `None` means the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    pub matchup_path: PathBuf,
    /// Fixed seed; `None` draws one from OS entropy.
    pub seed: Option<u64>,
    /// Projection threads, 0 = all cores.
    pub workers: usize,
    /// Delay between quarters when printing a game.
    pub pace_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            matchup_path: PathBuf::from(DEFAULT_MATCHUP_PATH),
            seed: None,
            workers: 0,
            pace_ms: 0,
        }
    }
}

/// Raw YAML shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    catalog: Option<PathBuf>,
    matchup: Option<PathBuf>,
    seed: Option<u64>,
    workers: Option<usize>,
    pace_ms: Option<u64>,
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

impl AppConfig {
    /// Load using the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn from_sources<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup(CONFIG_ENV).filter(|value| !value.trim().is_empty()) {
            config.apply_file(Path::new(&path))?;
        }

        if let Some(value) = lookup(CATALOG_ENV).filter(|value| !value.trim().is_empty()) {
            config.catalog_path = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup(MATCHUP_ENV).filter(|value| !value.trim().is_empty()) {
            config.matchup_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(SEED_ENV) {
            config.seed = Some(parse_env(SEED_ENV, value)?);
        }
        if let Some(value) = lookup(WORKERS_ENV) {
            config.workers = parse_env(WORKERS_ENV, value)?;
        }
        if let Some(value) = lookup(PACE_ENV) {
            config.pace_ms = parse_env(PACE_ENV, value)?;
        }
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;

        if file.catalog.is_some() {
            self.catalog_path = file.catalog;
        }
        if let Some(matchup) = file.matchup {
            self.matchup_path = matchup;
        }
        if file.seed.is_some() {
            self.seed = file.seed;
        }
        if let Some(workers) = file.workers {
            self.workers = workers;
        }
        if let Some(pace_ms) = file.pace_ms {
            self.pace_ms = pace_ms;
        }
        Ok(())
    }

    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    fn temp_yaml(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "buzzer-config-{name}-{}.yaml",
            std::process::id()
        ));
        fs::write(&path, body).expect("write temp config");
        path
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_sources(lookup(&[])).expect("defaults load");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.matchup_path, PathBuf::from("data/matchup.yaml"));
    }

    #[test]
    fn env_overrides_file() {
        let path = temp_yaml("layered", "seed: 9\nworkers: 3\npace_ms: 250\n");
        let config = AppConfig::from_sources(lookup(&[
            (CONFIG_ENV, path.to_str().expect("utf8 path")),
            (SEED_ENV, "11"),
        ]))
        .expect("layered load");
        let _ = fs::remove_file(&path);

        assert_eq!(config.seed, Some(11));
        assert_eq!(config.workers, 3);
        assert_eq!(config.pace(), Duration::from_millis(250));
    }

    #[test]
    fn bad_env_value_is_an_error() {
        let err = AppConfig::from_sources(lookup(&[(WORKERS_ENV, "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: WORKERS_ENV, .. }));
    }

    #[test]
    fn unknown_file_key_is_a_parse_error() {
        let path = temp_yaml("unknown", "possessions: 60\n");
        let err = AppConfig::from_sources(lookup(&[(CONFIG_ENV, path.to_str().expect("utf8 path"))]))
            .unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
