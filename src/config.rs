//! Configuration for the data generators
//!
//! Everything is optional; a missing file or section means defaults.

use crate::difficulty::{TierTable, TierTableError, DEFAULT_THRESHOLDS};
use crate::distractors::DistractorOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Invalid difficulty thresholds: {0}")]
    InvalidThresholds(#[from] TierTableError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Ascending inclusive percentile cut-offs
    pub thresholds: Vec<f64>,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        DifficultyConfig {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenderConfig {
    /// TOML file with `[overrides]` and `[given_names]`
    pub tables: PathBuf,
}

impl Default for GenderConfig {
    fn default() -> Self {
        GenderConfig {
            tables: PathBuf::from("data/gender_names.toml"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub difficulty: DifficultyConfig,
    pub gender: GenderConfig,
    pub distractors: DistractorOptions,
}

impl Config {
    /// Load configuration from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tier_table()?;
        if self.distractors.options < 2 {
            return Err(ConfigError::Invalid(
                "distractors.options must be at least 2".to_string(),
            ));
        }
        if self.distractors.candidate_pool == 0 {
            return Err(ConfigError::Invalid(
                "distractors.candidate_pool must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tier_table(&self) -> Result<TierTable, ConfigError> {
        Ok(TierTable::new(self.difficulty.thresholds.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Tier;

    #[test]
    fn test_defaults() {
        let config = Config::load(None).expect("defaults");
        assert_eq!(config, Config::default());
        assert_eq!(config.tier_table().expect("table").terminal(), Tier(6));
        assert_eq!(config.distractors.options, 4);
        assert_eq!(config.gender.tables, PathBuf::from("data/gender_names.toml"));
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml(
            r#"
            [difficulty]
            thresholds = [0.01, 0.20, 0.60]

            [distractors]
            options = 5
            "#,
        )
        .expect("config should parse");
        assert_eq!(config.tier_table().expect("table").terminal(), Tier(5));
        assert_eq!(config.distractors.options, 5);
        assert_eq!(config.distractors.candidate_pool, 20);
    }

    #[test]
    fn test_rejects_descending_thresholds() {
        let result = Config::from_toml("[difficulty]\nthresholds = [0.5, 0.1]\n");
        assert!(matches!(result, Err(ConfigError::InvalidThresholds(_))));
    }

    #[test]
    fn test_rejects_single_option() {
        let result = Config::from_toml("[distractors]\noptions = 1\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load(Some(Path::new("does/not/exist.toml")));
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_example_config_parses() {
        Config::load(Some(Path::new("vtes-guess.example.toml"))).expect("example config");
    }
}
