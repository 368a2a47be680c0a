//! # addr-match
//!
//! A library for normalizing postal addresses and matching records across
//! two independently sourced datasets.
//!
//! Two lists of businesses or accounts rarely spell an address the same way:
//! "123 N. Main Street, Suite 200" in one, "123 MAIN ST STE 200" in the other.
//! `addr-match` reduces both to canonical components and joins on the ones
//! you choose.
//!
//! ## Features
//!
//! - **Canonicalization**: character filtering, uppercasing and USPS-style
//!   street-type and unit-type abbreviations
//! - **Address line parsing**: street number, name and type; unit type and number
//! - **Line combination**: merges a street line and a unit line into one address
//! - **Hard and soft keys**: joins on exact components, then confirms or
//!   flags each pair with secondary components
//! - **Fuzzy names**: word-level Jaro similarity to resolve ambiguous joins
//!
//! ## Example
//!
//! ```rust
//! use addr_match::{AbbreviationDictionary, MatchField, ParseMode, StreetAddressParser};
//!
//! let dictionary = AbbreviationDictionary::load_embedded().unwrap();
//! let parser = StreetAddressParser::new(&dictionary);
//!
//! let parsed = parser.parse("123 N. Main Street", ParseMode::Street);
//! assert_eq!(parsed.get(MatchField::StreetNumber), Some("123"));
//! assert_eq!(parsed.get(MatchField::StreetName), Some("MAIN"));
//! assert_eq!(parsed.get(MatchField::StreetType), Some("ST"));
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Abbreviation reference tables
//! - [`core`]: Core data types for roles, parsed addresses and records
//! - [`parsing`]: Canonicalization, address line parsing and table loading
//! - [`normalize`]: Record set normalization
//! - [`matching`]: Join, match rules and output
//! - [`config`]: TOML job files
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod matching;
pub mod normalize;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::abbreviations::AbbreviationDictionary;
pub use core::address::ParsedAddress;
pub use core::record::NormalizedRecord;
pub use core::types::*;
pub use matching::engine::{MatchConfig, MatchEngine, MatchOutput};
pub use normalize::records::{DatasetSpec, NormalizedSet, RecordNormalizer};
pub use parsing::canonical::Canonicalizer;
pub use parsing::street::StreetAddressParser;
