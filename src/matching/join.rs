use std::collections::HashMap;

use crate::core::record::NormalizedRecord;
use crate::core::types::{JoinIndicator, KeepSide, MatchField};

/// Tuple of hard-key values; missing values compare as empty strings
pub type JoinKey = Vec<String>;

/// One row of the outer join: indices into the left and right record lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinedRow {
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl JoinedRow {
    #[must_use]
    pub fn indicator(&self) -> JoinIndicator {
        match (self.left, self.right) {
            (Some(_), Some(_)) => JoinIndicator::Both,
            (Some(_), None) => JoinIndicator::LeftOnly,
            _ => JoinIndicator::RightOnly,
        }
    }
}

#[must_use]
pub fn join_key(record: &NormalizedRecord, hard_keys: &[MatchField]) -> JoinKey {
    hard_keys
        .iter()
        .map(|k| record.get(*k).unwrap_or_default().to_string())
        .collect()
}

/// Equi-join two record lists on the hard keys.
///
/// `Left` keeps every left record, `Right` every right record, `Both` every
/// record of either side. Rows follow the kept side's order with matching
/// partners in their own order; for `Both`, unmatched right records are
/// appended after the left pass.
#[must_use]
pub fn outer_join(
    left: &[NormalizedRecord],
    right: &[NormalizedRecord],
    hard_keys: &[MatchField],
    keep: KeepSide,
) -> Vec<JoinedRow> {
    let index = |records: &[NormalizedRecord]| {
        let mut map: HashMap<JoinKey, Vec<usize>> = HashMap::new();
        for (i, record) in records.iter().enumerate() {
            map.entry(join_key(record, hard_keys)).or_default().push(i);
        }
        map
    };

    let mut rows = Vec::new();

    if !keep.keeps_left() {
        let left_index = index(left);
        for (r, record) in right.iter().enumerate() {
            match left_index.get(&join_key(record, hard_keys)) {
                Some(partners) => rows.extend(partners.iter().map(|&l| JoinedRow {
                    left: Some(l),
                    right: Some(r),
                })),
                None => rows.push(JoinedRow {
                    left: None,
                    right: Some(r),
                }),
            }
        }
        return rows;
    }

    let right_index = index(right);
    let mut right_matched = vec![false; right.len()];
    for (l, record) in left.iter().enumerate() {
        match right_index.get(&join_key(record, hard_keys)) {
            Some(partners) => {
                for &r in partners {
                    right_matched[r] = true;
                    rows.push(JoinedRow {
                        left: Some(l),
                        right: Some(r),
                    });
                }
            }
            None => rows.push(JoinedRow {
                left: Some(l),
                right: None,
            }),
        }
    }

    if keep.keeps_right() {
        rows.extend(
            right_matched
                .iter()
                .enumerate()
                .filter(|(_, matched)| !**matched)
                .map(|(r, _)| JoinedRow {
                    left: None,
                    right: Some(r),
                }),
        );
    }

    rows
}

/// Key of a joined row, taken from whichever side is present
#[must_use]
pub fn row_key(
    row: &JoinedRow,
    left: &[NormalizedRecord],
    right: &[NormalizedRecord],
    hard_keys: &[MatchField],
) -> JoinKey {
    let record = match (row.left, row.right) {
        (Some(l), _) => &left[l],
        (None, Some(r)) => &right[r],
        (None, None) => return vec![String::new(); hard_keys.len()],
    };
    join_key(record, hard_keys)
}

/// Number of joined rows per hard-key tuple, over the whole joined table
#[must_use]
pub fn group_sizes(keys: &[JoinKey]) -> HashMap<&JoinKey, usize> {
    let mut sizes = HashMap::new();
    for key in keys {
        *sizes.entry(key).or_insert(0) += 1;
    }
    sizes
}
