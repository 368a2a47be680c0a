use serde::Serialize;
use std::collections::HashSet;
use std::io::Write;

use crate::core::types::MatchField;
use crate::matching::engine::{MatchOutput, MatchSummary};
use crate::normalize::records::{NormalizeReport, NormalizedSet};

/// Indicator column name, as written by pandas-style merges
pub const MERGE_COLUMN: &str = "_merge";

/// Where an output column takes its value from
#[derive(Debug, Clone, Copy)]
enum Source {
    /// Hard key, shared by both sides of a joined row
    Key(MatchField),
    /// Column index in the first set's `columns()`
    First(usize),
    /// Column index in the second set's `columns()`
    Second(usize),
}

/// Matched pairs flattened into one table.
///
/// Columns: the first set's columns (hard keys once), then the second set's
/// non-key columns, with `_x`/`_y` suffixes on names present on both sides,
/// then `_merge`, `match` and `check`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MatchTable {
    #[must_use]
    pub fn build(
        first: &NormalizedSet,
        second: &NormalizedSet,
        hard_keys: &[MatchField],
        output: &MatchOutput,
    ) -> Self {
        let first_columns = first.columns();
        let second_columns = second.columns();
        let is_key = |name: &str| hard_keys.iter().any(|k| k.as_str() == name);

        let first_names: HashSet<&str> = first_columns
            .iter()
            .map(String::as_str)
            .filter(|c| !is_key(*c))
            .collect();
        let shared: HashSet<&str> = second_columns
            .iter()
            .map(String::as_str)
            .filter(|c| first_names.contains(c))
            .collect();

        let mut headers = Vec::new();
        let mut sources = Vec::new();
        for (i, name) in first_columns.iter().enumerate() {
            if let Some(&key) = hard_keys.iter().find(|k| k.as_str() == name.as_str()) {
                headers.push(name.clone());
                sources.push(Source::Key(key));
            } else if shared.contains(name.as_str()) {
                headers.push(format!("{name}_x"));
                sources.push(Source::First(i));
            } else {
                headers.push(name.clone());
                sources.push(Source::First(i));
            }
        }
        for (i, name) in second_columns.iter().enumerate() {
            if is_key(name.as_str()) {
                continue;
            }
            if shared.contains(name.as_str()) {
                headers.push(format!("{name}_y"));
            } else {
                headers.push(name.clone());
            }
            sources.push(Source::Second(i));
        }
        headers.extend([MERGE_COLUMN, "match", "check"].map(String::from));

        let rows = output
            .pairs
            .iter()
            .map(|pair| {
                let left = pair.left.map(|i| &first.records[i]);
                let right = pair.right.map(|i| &second.records[i]);
                let left_row = left.map(|r| first.row(r));
                let right_row = right.map(|r| second.row(r));

                let mut row: Vec<String> = sources
                    .iter()
                    .map(|source| match *source {
                        Source::Key(field) => left
                            .or(right)
                            .and_then(|r| r.get(field))
                            .unwrap_or_default()
                            .to_string(),
                        Source::First(i) => left_row
                            .as_ref()
                            .map(|r| r[i].clone())
                            .unwrap_or_default(),
                        Source::Second(i) => right_row
                            .as_ref()
                            .map(|r| r[i].clone())
                            .unwrap_or_default(),
                    })
                    .collect();
                row.push(pair.indicator.to_string());
                row.push("1".to_string());
                row.push(if pair.check { "1" } else { "0" }.to_string());
                row
            })
            .collect();

        Self { headers, rows }
    }

    /// # Errors
    ///
    /// Returns `csv::Error` if writing fails.
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), csv::Error> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        out.write_record(&self.headers)?;
        for row in &self.rows {
            out.write_record(row)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Rows as JSON objects keyed by header
    #[must_use]
    pub fn json_rows(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row)
                    .map(|(h, v)| (h.clone(), serde_json::Value::String(v.clone())))
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub tool: &'static str,
    pub version: &'static str,
    pub run_at: String,
}

impl ReportMeta {
    #[must_use]
    pub fn now() -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            run_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Full JSON report of a match run
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub meta: ReportMeta,
    pub normalization: [NormalizeReport; 2],
    pub summary: MatchSummary,
    pub columns: Vec<String>,
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl MatchReport {
    #[must_use]
    pub fn new(
        first: &NormalizedSet,
        second: &NormalizedSet,
        output: &MatchOutput,
        table: &MatchTable,
    ) -> Self {
        Self {
            meta: ReportMeta::now(),
            normalization: [first.report, second.report],
            summary: output.summary,
            columns: table.headers.clone(),
            rows: table.json_rows(),
        }
    }
}
