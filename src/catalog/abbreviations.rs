use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

use crate::utils::validation::is_canonical_token;

/// Which of the two reference tables an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Street,
    Unit,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Street => write!(f, "street suffix"),
            Self::Unit => write!(f, "unit designator"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read abbreviation table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse abbreviation table: {0}")]
    Csv(#[from] csv::Error),

    #[error("{table} table is missing column '{column}'")]
    MissingColumn {
        table: TableKind,
        column: &'static str,
    },

    #[error("{table} table, line {line}: invalid entry '{value}' (expected A-Z, 0-9 or '#')")]
    InvalidEntry {
        table: TableKind,
        line: usize,
        value: String,
    },

    #[error("{table} table, line {line}: duplicate long form '{value}'")]
    DuplicateEntry {
        table: TableKind,
        line: usize,
        value: String,
    },

    #[error("{0} table has no entries")]
    Empty(TableKind),
}

/// One street-type designator, e.g. `BOULEVARD` / `BOUL` / `BLVD`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreetSuffix {
    pub long: String,
    pub medium: String,
    pub abbrev: String,
}

/// One secondary unit designator, e.g. `SUITE` / `STE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitDesignator {
    pub long: String,
    pub abbrev: String,
}

const EMBEDDED_STREET_SUFFIXES: &str = include_str!("../../catalogs/street_suffixes.csv");
const EMBEDDED_UNIT_DESIGNATORS: &str = include_str!("../../catalogs/unit_designators.csv");

/// Immutable lookup from street/unit type spellings to canonical abbreviations.
///
/// Built once from the two reference tables; all lookups are exact and
/// case-sensitive against canonicalized (uppercase) tokens.
#[derive(Debug, Clone)]
pub struct AbbreviationDictionary {
    street_rows: Vec<StreetSuffix>,
    unit_rows: Vec<UnitDesignator>,

    /// Long/medium spelling -> abbreviation, first entry wins
    abbreviations: HashMap<String, String>,

    /// Every long, medium and abbreviated street-type spelling
    street_tokens: HashSet<String>,

    /// Every long and abbreviated unit-type spelling
    unit_tokens: HashSet<String>,
}

impl AbbreviationDictionary {
    /// Load the tables compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns a `DictionaryError` if the embedded tables are malformed.
    pub fn load_embedded() -> Result<Self, DictionaryError> {
        // Validated at compile time via build.rs
        Self::from_tables(EMBEDDED_STREET_SUFFIXES, EMBEDDED_UNIT_DESIGNATORS)
    }

    /// Load custom tables from CSV files
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError::Io` if a file cannot be read, or another
    /// `DictionaryError` if either table is malformed.
    pub fn load_from_files(street_path: &Path, unit_path: &Path) -> Result<Self, DictionaryError> {
        let street = std::fs::read_to_string(street_path)?;
        let unit = std::fs::read_to_string(unit_path)?;
        Self::from_tables(&street, &unit)
    }

    /// Build from CSV text with headers `long,medium,abbrev` and `long,abbrev`
    ///
    /// # Errors
    ///
    /// Returns a `DictionaryError` when a required column is missing, an entry
    /// is empty or not canonical, a long form repeats, or a table is empty.
    pub fn from_tables(street_csv: &str, unit_csv: &str) -> Result<Self, DictionaryError> {
        let street_rows = read_table(street_csv, TableKind::Street, &["long", "medium", "abbrev"])?
            .into_iter()
            .map(|mut row| StreetSuffix {
                abbrev: row.pop().unwrap_or_default(),
                medium: row.pop().unwrap_or_default(),
                long: row.pop().unwrap_or_default(),
            })
            .collect();
        let unit_rows = read_table(unit_csv, TableKind::Unit, &["long", "abbrev"])?
            .into_iter()
            .map(|mut row| UnitDesignator {
                abbrev: row.pop().unwrap_or_default(),
                long: row.pop().unwrap_or_default(),
            })
            .collect();

        Ok(Self::from_rows(street_rows, unit_rows))
    }

    /// Build from already-validated rows
    #[must_use]
    pub fn from_rows(street_rows: Vec<StreetSuffix>, unit_rows: Vec<UnitDesignator>) -> Self {
        let mut abbreviations = HashMap::new();
        // Priority: street medium, street long, unit long
        for row in &street_rows {
            abbreviations
                .entry(row.medium.clone())
                .or_insert_with(|| row.abbrev.clone());
        }
        for row in &street_rows {
            abbreviations
                .entry(row.long.clone())
                .or_insert_with(|| row.abbrev.clone());
        }
        for row in &unit_rows {
            abbreviations
                .entry(row.long.clone())
                .or_insert_with(|| row.abbrev.clone());
        }

        let street_tokens = street_rows
            .iter()
            .flat_map(|r| [r.long.clone(), r.medium.clone(), r.abbrev.clone()])
            .collect();
        let unit_tokens = unit_rows
            .iter()
            .flat_map(|r| [r.long.clone(), r.abbrev.clone()])
            .collect();

        Self {
            street_rows,
            unit_rows,
            abbreviations,
            street_tokens,
            unit_tokens,
        }
    }

    /// Abbreviation for a long/medium spelling; any other token is returned unchanged
    #[must_use]
    pub fn lookup<'a>(&'a self, token: &'a str) -> &'a str {
        self.abbreviations
            .get(token)
            .map_or(token, String::as_str)
    }

    /// Is `token` any spelling of a street-type designator?
    #[must_use]
    pub fn is_street_type(&self, token: &str) -> bool {
        self.street_tokens.contains(token)
    }

    /// Is `token` any spelling of a unit-type designator?
    #[must_use]
    pub fn is_unit_type(&self, token: &str) -> bool {
        self.unit_tokens.contains(token)
    }

    #[must_use]
    pub fn street_rows(&self) -> &[StreetSuffix] {
        &self.street_rows
    }

    #[must_use]
    pub fn unit_rows(&self) -> &[UnitDesignator] {
        &self.unit_rows
    }
}

/// Read a reference table, returning its rows with values in `columns` order
fn read_table(
    text: &str,
    table: TableKind,
    columns: &[&'static str],
) -> Result<Vec<Vec<String>>, DictionaryError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let indices = columns
        .iter()
        .map(|&column| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or(DictionaryError::MissingColumn { table, column })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    let mut seen_long = HashSet::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Line numbers are 1-based and count the header
        let line = i + 2;

        let mut row = Vec::with_capacity(indices.len());
        for &idx in &indices {
            let value = record.get(idx).unwrap_or_default();
            if !is_canonical_token(value) {
                return Err(DictionaryError::InvalidEntry {
                    table,
                    line,
                    value: value.to_string(),
                });
            }
            row.push(value.to_string());
        }

        // The long form is always the first requested column
        if !seen_long.insert(row[0].clone()) {
            return Err(DictionaryError::DuplicateEntry {
                table,
                line,
                value: row[0].clone(),
            });
        }

        rows.push(row);
    }

    if rows.is_empty() {
        return Err(DictionaryError::Empty(table));
    }

    Ok(rows)
}
