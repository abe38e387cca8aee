//! Simplify configuration.
//!
//! Without a config file the tool runs the two built-in datasets. A TOML
//! file replaces the dataset list wholesale:
//!
//! ```toml
//! [[datasets]]
//! name = "etfs"
//! source = "raw_data/etfs.csv"
//! destination = "filtered_data/etfs.csv"
//! allow_list = ["us_market"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dataset::DatasetSpec;

/// Errors from reading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("config defines no datasets")]
    NoDatasets,
    #[error("dataset name '{0}' is used more than once")]
    DuplicateName(String),
    #[error("datasets '{first}' and '{second}' both write to '{}'", destination.display())]
    DuplicateDestination {
        first: String,
        second: String,
        destination: PathBuf,
    },
    #[error("dataset '{0}' selects no columns")]
    NoColumns(String),
    #[error("dataset '{0}' has an empty allow-list")]
    EmptyAllowList(String),
}

/// The full set of datasets a `simplify` run processes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifyConfig {
    pub datasets: Vec<DatasetSpec>,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            datasets: vec![DatasetSpec::equities(), DatasetSpec::etfs()],
        }
    }
}

impl SimplifyConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.datasets.is_empty() {
            return Err(ConfigError::NoDatasets);
        }

        let mut names = HashSet::new();
        for ds in &self.datasets {
            if !names.insert(ds.name.as_str()) {
                return Err(ConfigError::DuplicateName(ds.name.clone()));
            }
            if ds.columns.is_empty() {
                return Err(ConfigError::NoColumns(ds.name.clone()));
            }
            if ds.allow_list.is_empty() {
                return Err(ConfigError::EmptyAllowList(ds.name.clone()));
            }
        }

        for (i, a) in self.datasets.iter().enumerate() {
            if let Some(b) = self.datasets[i + 1..]
                .iter()
                .find(|b| b.destination == a.destination)
            {
                return Err(ConfigError::DuplicateDestination {
                    first: a.name.clone(),
                    second: b.name.clone(),
                    destination: a.destination.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn dataset(&self, name: &str) -> Option<&DatasetSpec> {
        self.datasets.iter().find(|d| d.name == name)
    }
}
