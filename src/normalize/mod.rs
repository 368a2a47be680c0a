//! Record set normalization.
//!
//! A [`RecordNormalizer`](records::RecordNormalizer) turns one loaded table
//! into a [`NormalizedSet`](records::NormalizedSet): raw address combinations
//! are deduplicated, address lines are parsed by role and combined, the other
//! declared roles are canonicalized, and passthrough columns are reattached
//! verbatim.
//!
//! Data-quality problems never abort a run. Rows whose address lines cannot
//! be parsed or combined are dropped, logged at debug level, and counted in
//! the [`NormalizeReport`](records::NormalizeReport).

pub mod records;
