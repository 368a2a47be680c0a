//! Command-line interface for addr-match.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **parse**: Parse a single address line into its components
//! - **normalize**: Normalize the addresses of one CSV/TSV record set
//! - **match**: Run a full two-dataset match described by a TOML job file
//! - **dictionary**: List the abbreviation tables or look up a token
//!
//! ## Usage
//!
//! ```text
//! # Parse one line
//! addr-match parse "123 N Main Street Suite 200" --mode both
//!
//! # Normalize a record set
//! addr-match normalize yelp.csv \
//!     --columns address1,address2,city,zip_code,name \
//!     --roles address1,address2,city,zip,name \
//!     --keep categories,rating -o yelp.normalized.csv
//!
//! # Match two record sets
//! addr-match match job.toml -o matched.csv
//!
//! # JSON report for scripting
//! addr-match match job.toml --format json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::catalog::abbreviations::AbbreviationDictionary;

pub mod dictionary;
pub mod normalize;
pub mod parse;
pub mod reconcile;

#[derive(Parser)]
#[command(name = "addr-match")]
#[command(author)]
#[command(version)]
#[command(about = "Normalize postal addresses and match records across two datasets")]
#[command(
    long_about = "addr-match normalizes free-text postal addresses into canonical components (street number, name and type; unit type and number) and reconciles two record sets by joining on chosen components.\n\nEach matched pair is annotated with:\n- match: the pair is a candidate for the same entity\n- check: a secondary field disagrees and the pair deserves a manual look"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse one address line into components
    Parse(parse::ParseArgs),

    /// Normalize the addresses of one record set
    Normalize(normalize::NormalizeArgs),

    /// Match two record sets described by a TOML job file
    Match(reconcile::MatchArgs),

    /// List abbreviation tables or look up a token
    Dictionary(dictionary::DictionaryArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Custom abbreviation tables, shared by every command
#[derive(clap::Args, Debug, Default)]
pub struct TableArgs {
    /// Street suffix table (CSV with columns long,medium,abbrev)
    #[arg(long, requires = "unit_designators")]
    pub street_suffixes: Option<PathBuf>,

    /// Unit designator table (CSV with columns long,abbrev)
    #[arg(long, requires = "street_suffixes")]
    pub unit_designators: Option<PathBuf>,
}

impl TableArgs {
    /// Load the custom tables if given, otherwise the built-in ones
    ///
    /// # Errors
    ///
    /// Returns an error if a custom table cannot be read or is malformed.
    pub fn load(&self, verbose: bool) -> anyhow::Result<AbbreviationDictionary> {
        let dictionary = match (&self.street_suffixes, &self.unit_designators) {
            (Some(street), Some(unit)) => AbbreviationDictionary::load_from_files(street, unit)?,
            _ => AbbreviationDictionary::load_embedded()?,
        };

        if verbose {
            eprintln!(
                "Loaded {} street suffixes and {} unit designators",
                dictionary.street_rows().len(),
                dictionary.unit_rows().len()
            );
        }

        Ok(dictionary)
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.street_suffixes.is_some()
    }
}
