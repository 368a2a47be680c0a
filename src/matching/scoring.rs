use serde::Serialize;

use crate::core::record::NormalizedRecord;
use crate::core::types::MatchField;

/// Word-level fuzzy comparison of two names.
///
/// True iff both names are present and some word of the first has a Jaro
/// similarity *strictly greater* than `threshold` with some word of the
/// second. With a threshold of 1.0 this never matches, not even identical
/// words.
#[must_use]
pub fn fuzzy_name_match(a: Option<&str>, b: Option<&str>, threshold: f64) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };

    a.split_whitespace()
        .any(|w1| b.split_whitespace().any(|w2| strsim::jaro(w1, w2) > threshold))
}

/// Soft-key comparison of one field on both sides of a joined pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftComparison {
    /// Both values present and equal
    Agree,
    /// Both values present and different
    Disagree,
    /// At least one side missing; cannot confirm either way
    Unknown,
}

impl SoftComparison {
    /// Compare one field. A parsed empty string is a value: an address with
    /// no unit agrees with another address with no unit. Only fields that
    /// were never set (blank source cell, group not parsed) are unknown.
    #[must_use]
    pub fn compare(left: &NormalizedRecord, right: &NormalizedRecord, field: MatchField) -> Self {
        match (left.get(field), right.get(field)) {
            (Some(l), Some(r)) if l == r => Self::Agree,
            (Some(_), Some(_)) => Self::Disagree,
            _ => Self::Unknown,
        }
    }
}

/// Rules applied to every joined row
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRules<'a> {
    pub soft_keys: &'a [MatchField],
    pub check_name: bool,
    pub jaro_threshold: f64,
}

/// `match` / `check` annotation of one joined row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub matched: bool,
    pub check: bool,
}

impl DecisionRules<'_> {
    fn name_soft_key(&self) -> bool {
        self.soft_keys.contains(&MatchField::Name)
    }

    fn other_soft_keys(&self) -> impl Iterator<Item = MatchField> + '_ {
        self.soft_keys
            .iter()
            .copied()
            .filter(|k| *k != MatchField::Name)
    }

    fn names_match(&self, left: Option<&NormalizedRecord>, right: Option<&NormalizedRecord>) -> bool {
        fuzzy_name_match(
            left.and_then(|r| r.value(MatchField::Name)),
            right.and_then(|r| r.value(MatchField::Name)),
            self.jaro_threshold,
        )
    }

    /// Decide one joined row.
    ///
    /// `ambiguous` is true when the row's hard-key group holds more than one
    /// joined row; it must be computed over the whole joined table first.
    #[must_use]
    pub fn decide(
        &self,
        left: Option<&NormalizedRecord>,
        right: Option<&NormalizedRecord>,
        ambiguous: bool,
    ) -> Decision {
        let (Some(l), Some(r)) = (left, right) else {
            // Outer-join miss: only a name comparison could rescue it
            return Decision {
                matched: self.check_name && self.names_match(left, right),
                check: false,
            };
        };

        let comparisons: Vec<SoftComparison> = self
            .other_soft_keys()
            .map(|field| SoftComparison::compare(l, r, field))
            .collect();
        let any_disagree = comparisons.contains(&SoftComparison::Disagree);

        if ambiguous {
            let soft_agree = comparisons.contains(&SoftComparison::Agree);
            let name_agree = self.name_soft_key() && self.names_match(left, right);
            Decision {
                matched: soft_agree || name_agree,
                check: any_disagree,
            }
        } else {
            let name_disagree = self.name_soft_key() && !self.names_match(left, right);
            Decision {
                matched: true,
                check: any_disagree || name_disagree,
            }
        }
    }
}
