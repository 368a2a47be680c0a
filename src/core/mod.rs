//! Core data types for address normalization and matching.
//!
//! - [`ParsedAddress`](address::ParsedAddress): street and/or unit components of one address
//! - [`NormalizedRecord`](record::NormalizedRecord): a canonical record ready for matching
//! - [`MatchField`](types::MatchField), [`AddressRole`](types::AddressRole): column semantics
//! - [`ParseMode`](types::ParseMode), [`KeepSide`](types::KeepSide),
//!   [`JoinIndicator`](types::JoinIndicator): parser and join parameters
//!
//! ## Address Roles
//!
//! Source columns are tagged with the role they play:
//!
//! | Role | Content | Parse mode |
//! |------|---------|------------|
//! | `address1` | `123 N MAIN ST` | street |
//! | `address2` | `STE 200` | unit |
//! | `address`  | `123 MAIN ST APT 4` | both |
//! | `streetNumber` .. `name` | one component | none (canonicalized) |

pub mod address;
pub mod record;
pub mod types;
