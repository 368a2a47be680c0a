//! Parsers for turning free-text address data into structured components.
//!
//! This module provides:
//!
//! - **Canonicalization**: character filtering, uppercasing and whole-field
//!   abbreviation of single values, plus zip truncation
//! - **Street address lines**: a two-stage parser that splits one line into
//!   street and unit components
//! - **Line combination**: merging the parses of a street line and a unit line
//! - **Tables**: loading CSV/TSV record sets with every cell read as text
//!
//! ## Example
//!
//! ```rust
//! use addr_match::{AbbreviationDictionary, ParseMode, StreetAddressParser};
//! use addr_match::parsing::combine::combine;
//!
//! let dictionary = AbbreviationDictionary::load_embedded().unwrap();
//! let parser = StreetAddressParser::new(&dictionary);
//!
//! let street = parser.parse("123 N. Main Street", ParseMode::Street);
//! let unit = parser.parse("Suite 200", ParseMode::Unit);
//! let full = combine(street, unit);
//!
//! assert_eq!(full.field_count(), 5);
//! assert_eq!(full.street.unwrap().street_type, "ST");
//! ```
//!
//! ## Line Roles
//!
//! | Role | Parse mode | Produces |
//! |------|------------|----------|
//! | `address1` | street | number, name, type |
//! | `address2` | unit | unit type, unit number |
//! | `address` | both | all five components |

pub mod canonical;
pub mod combine;
pub mod street;
pub mod table;
