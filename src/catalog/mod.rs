//! Address abbreviation reference tables.
//!
//! Two tables drive canonicalization: street-type designators (`long`,
//! `medium`, `abbrev`) and secondary unit designators (`long`, `abbrev`).
//! Default tables holding the USPS Publication 28 street suffix and secondary
//! unit designator lists are compiled into the binary; custom tables can be
//! loaded from CSV files.
//!
//! ## Example
//!
//! ```rust
//! use addr_match::AbbreviationDictionary;
//!
//! let dictionary = AbbreviationDictionary::load_embedded().unwrap();
//!
//! assert_eq!(dictionary.lookup("BOULEVARD"), "BLVD");
//! assert_eq!(dictionary.lookup("APARTMENT"), "APT");
//! assert_eq!(dictionary.lookup("MAIN"), "MAIN");
//! ```
//!
//! ## Custom Tables
//!
//! ```rust,no_run
//! use addr_match::AbbreviationDictionary;
//! use std::path::Path;
//!
//! let dictionary = AbbreviationDictionary::load_from_files(
//!     Path::new("StreetSuffixAbbreviations.csv"),
//!     Path::new("UnitAbbreviations.csv"),
//! )
//! .unwrap();
//! ```

pub mod abbreviations;
