use std::path::Path;
use thiserror::Error;

use crate::utils::validation::check_record_limit;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table has no column '{0}'")]
    MissingColumn(String),

    #[error("Too many records: {0} exceeds maximum allowed ({max})", max = crate::utils::validation::MAX_RECORDS)]
    TooManyRecords(usize),

    #[error("Unsupported table format: {0}")]
    UnsupportedFormat(String),
}

/// A delimited text table with every cell read as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SourceTable {
    /// Index of a column by exact header name
    ///
    /// # Errors
    ///
    /// Returns `TableError::MissingColumn` if no header matches.
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Cell value, with empty cells treated as missing
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Delimiter implied by a file extension: tab for `.tsv`/`.tab`, comma otherwise
#[must_use]
pub fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("tsv" | "tab") => b'\t',
        _ => b',',
    }
}

/// Load a CSV or TSV table from disk
///
/// # Errors
///
/// Returns `TableError::Io` if the file cannot be read,
/// `TableError::UnsupportedFormat` for compressed or spreadsheet files, or
/// another `TableError` if the content is invalid.
pub fn load_table(path: &Path) -> Result<SourceTable, TableError> {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let ext = ext.to_ascii_lowercase();
        if matches!(ext.as_str(), "gz" | "xls" | "xlsx" | "parquet") {
            return Err(TableError::UnsupportedFormat(format!(
                "{} (expected .csv, .tsv or .txt)",
                path.display()
            )));
        }
    }

    let content = std::fs::read_to_string(path)?;
    parse_table_text(&content, delimiter_for(path))
}

/// Parse delimited text with a required header row.
///
/// Cells are kept verbatim; rows must have as many fields as the header.
///
/// # Errors
///
/// Returns `TableError::Csv` for malformed or ragged rows, or
/// `TableError::TooManyRecords` if the limit is exceeded.
pub fn parse_table_text(text: &str, delimiter: u8) -> Result<SourceTable, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;

        if check_record_limit(rows.len()).is_some() {
            return Err(TableError::TooManyRecords(rows.len()));
        }

        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(SourceTable { headers, rows })
}
