//! Record set reconciliation.
//!
//! - [`MatchEngine`](engine::MatchEngine): joins two normalized sets and decides which rows match
//! - [`DecisionRules`](scoring::DecisionRules): per-row `match` / `check` rules
//! - [`MatchTable`](report::MatchTable): flattened output of matched pairs
//!
//! ## Matching Algorithm
//!
//! 1. **Join**: equi-join on the hard keys. The `keep` flag picks a left,
//!    right or full outer join.
//! 2. **Cardinality**: count joined rows per hard-key tuple over the whole
//!    joined table. A tuple with more than one row is ambiguous.
//! 3. **Decision**: unique pairs always match and are flagged (`check`) when a
//!    soft key disagrees or the names are not similar. Ambiguous pairs match
//!    only when a soft key agrees or the names are similar.
//! 4. **Filter**: only matching rows are kept. Outer-join misses never match.
//!
//! Name similarity compares every word pair with the Jaro metric and needs a
//! score strictly above the threshold, so the default threshold of 1.0
//! rejects even identical words.
//!
//! ## Example
//!
//! ```rust
//! use addr_match::{MatchConfig, MatchEngine, MatchField};
//! use addr_match::normalize::records::NormalizedSet;
//!
//! let mut config = MatchConfig::new(vec![MatchField::Zip, MatchField::StreetName]);
//! config.soft_keys = vec![MatchField::Name];
//! config.jaro_threshold = 0.9;
//!
//! let engine = MatchEngine::new(config).unwrap();
//! let empty = NormalizedSet {
//!     fields: MatchField::ALL.to_vec(),
//!     ..NormalizedSet::default()
//! };
//! let output = engine.run(&empty, &empty).unwrap();
//! assert!(output.pairs.is_empty());
//! ```

pub mod engine;
pub mod join;
pub mod report;
pub mod scoring;
