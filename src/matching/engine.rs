use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::types::{JoinIndicator, KeepSide, MatchField};
use crate::matching::join::{group_sizes, outer_join, row_key, JoinKey};
use crate::matching::scoring::DecisionRules;
use crate::normalize::records::NormalizedSet;
use crate::utils::validation::{validate_keys, validate_threshold, ValidationError};

/// Default word-level Jaro threshold; with strict comparison nothing passes it
pub const DEFAULT_JARO_THRESHOLD: f64 = 1.0;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Invalid match configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Key '{key}' is not a column of dataset {dataset}")]
    MissingKey { key: MatchField, dataset: u8 },
}

/// Parameters of one reconciliation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default)]
    pub keep: KeepSide,

    /// Fields that must be equal for two records to be joined
    pub hard_keys: Vec<MatchField>,

    /// Fields compared after the join to confirm or flag a pair
    #[serde(default)]
    pub soft_keys: Vec<MatchField>,

    /// Try a fuzzy name comparison on rows the join could not pair
    #[serde(default)]
    pub check_name: bool,

    #[serde(default = "default_jaro_threshold")]
    pub jaro_threshold: f64,
}

fn default_jaro_threshold() -> f64 {
    DEFAULT_JARO_THRESHOLD
}

impl MatchConfig {
    #[must_use]
    pub fn new(hard_keys: Vec<MatchField>) -> Self {
        Self {
            keep: KeepSide::default(),
            hard_keys,
            soft_keys: Vec::new(),
            check_name: false,
            jaro_threshold: DEFAULT_JARO_THRESHOLD,
        }
    }

    /// # Errors
    ///
    /// Returns a `ValidationError` if the threshold is outside `[0, 1]`, no
    /// hard key is given, or a key is repeated or both hard and soft.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_threshold(self.jaro_threshold)?;
        validate_keys(&self.hard_keys, &self.soft_keys)
    }

    fn rules(&self) -> DecisionRules<'_> {
        DecisionRules {
            soft_keys: &self.soft_keys,
            check_name: self.check_name,
            jaro_threshold: self.jaro_threshold,
        }
    }
}

/// A joined row that passed the match rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedPair {
    /// Index into the first set's records
    pub left: Option<usize>,
    /// Index into the second set's records
    pub right: Option<usize>,
    pub indicator: JoinIndicator,
    /// Soft-key disagreement worth a manual look
    pub check: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub joined_rows: usize,
    /// Hard-key tuples shared by more than one joined row
    pub ambiguous_groups: usize,
    pub left_only: usize,
    pub right_only: usize,
    pub both: usize,
    pub matched: usize,
    pub flagged: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchOutput {
    pub pairs: Vec<MatchedPair>,
    pub summary: MatchSummary,
}

/// Joins two normalized record sets and decides which joined rows match
#[derive(Debug, Clone)]
pub struct MatchEngine {
    config: MatchConfig,
}

impl MatchEngine {
    /// # Errors
    ///
    /// Returns `MatchError::Validation` if the configuration is invalid.
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Run the join and the match rules.
    ///
    /// Only rows with `match = 1` are returned. One record may appear in
    /// several pairs; nothing here enforces a one-to-one mapping.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::MissingKey` if a hard or soft key is not a column
    /// of either set.
    pub fn run(&self, first: &NormalizedSet, second: &NormalizedSet) -> Result<MatchOutput, MatchError> {
        self.check_keys(first, 1)?;
        self.check_keys(second, 2)?;

        let hard_keys = &self.config.hard_keys;
        let rows = outer_join(&first.records, &second.records, hard_keys, self.config.keep);

        // Cardinality over the full joined table before any decision
        let keys: Vec<JoinKey> = rows
            .iter()
            .map(|row| row_key(row, &first.records, &second.records, hard_keys))
            .collect();
        let sizes = group_sizes(&keys);

        let mut summary = MatchSummary {
            joined_rows: rows.len(),
            ambiguous_groups: sizes.values().filter(|&&n| n > 1).count(),
            ..MatchSummary::default()
        };

        let rules = self.config.rules();
        let mut pairs = Vec::new();
        for (row, key) in rows.iter().zip(&keys) {
            let indicator = row.indicator();
            match indicator {
                JoinIndicator::LeftOnly => summary.left_only += 1,
                JoinIndicator::RightOnly => summary.right_only += 1,
                JoinIndicator::Both => summary.both += 1,
            }

            let ambiguous = sizes.get(key).is_some_and(|&n| n > 1);
            let decision = rules.decide(
                row.left.map(|i| &first.records[i]),
                row.right.map(|i| &second.records[i]),
                ambiguous,
            );

            if decision.matched {
                summary.matched += 1;
                if decision.check {
                    summary.flagged += 1;
                }
                pairs.push(MatchedPair {
                    left: row.left,
                    right: row.right,
                    indicator,
                    check: decision.check,
                });
            }
        }

        info!(
            joined = summary.joined_rows,
            ambiguous_groups = summary.ambiguous_groups,
            matched = summary.matched,
            flagged = summary.flagged,
            "Matching complete"
        );

        Ok(MatchOutput { pairs, summary })
    }

    fn check_keys(&self, set: &NormalizedSet, dataset: u8) -> Result<(), MatchError> {
        let keys = self.config.hard_keys.iter().chain(&self.config.soft_keys);
        for &key in keys {
            if !set.has_field(key) {
                return Err(MatchError::MissingKey { key, dataset });
            }
        }
        Ok(())
    }
}
