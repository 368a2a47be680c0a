//! TOML job files describing a full two-dataset match.
//!
//! ```toml
//! [dataset1]
//! file = "yelp.csv"
//! keep_columns = ["categories", "rating"]
//! address_columns = ["address1", "address2", "city", "zip_code", "name"]
//! address_roles = ["address1", "address2", "city", "zip", "name"]
//!
//! [dataset2]
//! file = "accounts.csv"
//! keep_columns = ["ACCT_ID"]
//! address_columns = ["CITY", "ADDRESS", "POSTAL", "CUST_NAME"]
//! address_roles = ["city", "address", "zip", "name"]
//!
//! [match]
//! keep = "2"
//! hard_keys = ["zip", "streetName", "streetNumber"]
//! soft_keys = ["unitNumber", "name"]
//! check_name = true
//! jaro_threshold = 0.9
//!
//! [output]
//! file = "matched.csv"
//! ```
//!
//! Relative paths resolve against the directory holding the job file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::matching::engine::MatchConfig;
use crate::normalize::records::{DatasetSpec, PassthroughPolicy};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read job file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse job file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid job file: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub file: PathBuf,

    #[serde(flatten)]
    pub spec: DatasetSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub file: Option<PathBuf>,
}

/// Custom abbreviation tables replacing the built-in ones
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryConfig {
    pub street_suffixes: PathBuf,
    pub unit_designators: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub dataset1: DatasetConfig,
    pub dataset2: DatasetConfig,

    #[serde(rename = "match")]
    pub matching: MatchConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub dictionary: Option<DictionaryConfig>,

    #[serde(default)]
    pub passthrough_policy: PassthroughPolicy,
}

impl JobConfig {
    /// Parse and validate a job from TOML text; paths are left as written
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or unknown role names,
    /// or `ConfigError::Invalid` if validation fails.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: JobConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a job file and resolve its relative paths against its directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, or another
    /// `ConfigError` if it is malformed or invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a dataset's role declarations or the
    /// match parameters are inconsistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, dataset) in [("dataset1", &self.dataset1), ("dataset2", &self.dataset2)] {
            dataset
                .spec
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("{name}: {e}")))?;
        }

        self.matching
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("match: {e}")))?;

        for (name, dataset) in [("dataset1", &self.dataset1), ("dataset2", &self.dataset2)] {
            let fields = dataset.spec.output_fields();
            let keys = self.matching.hard_keys.iter().chain(&self.matching.soft_keys);
            for key in keys {
                if !fields.contains(key) {
                    return Err(ConfigError::Invalid(format!(
                        "{name}: key '{key}' is not produced by its address roles"
                    )));
                }
            }
        }

        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.dataset1.file);
        resolve(&mut self.dataset2.file);
        if let Some(file) = self.output.file.as_mut() {
            resolve(file);
        }
        if let Some(dictionary) = self.dictionary.as_mut() {
            resolve(&mut dictionary.street_suffixes);
            resolve(&mut dictionary.unit_designators);
        }
    }
}
