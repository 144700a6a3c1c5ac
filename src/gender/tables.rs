use crate::gender::Gender;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenderDataError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Lookup data for the detector chain, kept out of code so it can be edited
/// between runs.
///
/// ```toml
/// [overrides]
/// "Enkidu" = "M"
///
/// [given_names]
/// "mary" = "F"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenderTables {
    /// Exact card names (group notation stripped), consulted before any heuristic
    #[serde(default)]
    pub overrides: HashMap<String, Gender>,
    /// Given names, matched case-insensitively
    #[serde(default)]
    pub given_names: HashMap<String, Gender>,
}

impl GenderTables {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GenderDataError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, GenderDataError> {
        let mut tables: GenderTables = toml::from_str(content)?;
        tables.given_names = tables
            .given_names
            .into_iter()
            .map(|(name, gender)| (name.to_lowercase(), gender))
            .collect();
        Ok(tables)
    }
}
