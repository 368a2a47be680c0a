use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::abbreviations::AbbreviationDictionary;
use crate::core::address::ParsedAddress;
use crate::core::record::NormalizedRecord;
use crate::core::types::{AddressRole, MatchField, ParseMode};
use crate::parsing::canonical::{truncate_zip, Canonicalizer};
use crate::parsing::combine::combine;
use crate::parsing::street::StreetAddressParser;
use crate::parsing::table::{SourceTable, TableError};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("{columns} address columns but {roles} address roles; the lists must be parallel")]
    RoleCountMismatch { columns: usize, roles: usize },

    #[error("Address role '{0}' is declared more than once")]
    DuplicateRole(AddressRole),

    #[error("Role 'address' cannot be combined with 'address1' or 'address2'")]
    MixedAddressRoles,

    #[error("No address roles declared")]
    NoRoles,

    #[error("Passthrough column '{0}' clashes with a normalized column name")]
    PassthroughNameClash(String),

    #[error(
        "{groups} address combination(s) have differing passthrough values (first: {example})"
    )]
    InconsistentPassthrough { groups: usize, example: String },
}

/// What to do when one raw address maps to several passthrough combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassthroughPolicy {
    /// Keep one record per combination and log the groups
    #[default]
    Warn,
    /// Fail with `NormalizeError::InconsistentPassthrough`
    Reject,
}

/// Column configuration for one record set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Columns carried through unchanged
    #[serde(default)]
    pub keep_columns: Vec<String>,

    /// Raw address-bearing columns, parallel to `address_roles`
    pub address_columns: Vec<String>,

    pub address_roles: Vec<AddressRole>,
}

impl DatasetSpec {
    /// Check the role declarations on their own, before any table is read
    ///
    /// # Errors
    ///
    /// Returns a `NormalizeError` if the lists are not parallel, a role is
    /// declared twice, no role is declared, or `address` is mixed with
    /// `address1`/`address2`.
    pub fn validate(&self) -> Result<(), NormalizeError> {
        if self.address_columns.len() != self.address_roles.len() {
            return Err(NormalizeError::RoleCountMismatch {
                columns: self.address_columns.len(),
                roles: self.address_roles.len(),
            });
        }
        if self.address_roles.is_empty() {
            return Err(NormalizeError::NoRoles);
        }

        let mut seen = HashSet::new();
        for role in &self.address_roles {
            if !seen.insert(*role) {
                return Err(NormalizeError::DuplicateRole(*role));
            }
        }

        if seen.contains(&AddressRole::Address)
            && (seen.contains(&AddressRole::Address1) || seen.contains(&AddressRole::Address2))
        {
            return Err(NormalizeError::MixedAddressRoles);
        }

        for column in &self.keep_columns {
            if MatchField::ALL.iter().any(|f| f.as_str() == column) {
                return Err(NormalizeError::PassthroughNameClash(column.clone()));
            }
        }

        Ok(())
    }

    fn has_line_role(&self) -> bool {
        self.address_roles.iter().any(|r| r.parse_mode().is_some())
    }

    /// Normalized columns produced for this spec, in output order
    #[must_use]
    pub fn output_fields(&self) -> Vec<MatchField> {
        let has_line = self.has_line_role();
        MatchField::ALL
            .into_iter()
            .filter(|field| {
                (has_line && field.is_address_component())
                    || self.address_roles.contains(&AddressRole::Field(*field))
            })
            .collect()
    }
}

/// Diagnostic counts for one normalization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub input_rows: usize,
    pub unique_combinations: usize,
    /// Address lines that produced no components
    pub unparseable: usize,
    /// Address line pairs whose parses could not be combined
    pub incompatible: usize,
    pub normalized: usize,
    /// Raw addresses seen with more than one passthrough combination
    pub inconsistent_passthrough_groups: usize,
}

impl NormalizeReport {
    #[must_use]
    pub fn excluded(&self) -> usize {
        self.unparseable + self.incompatible
    }
}

/// A normalized record set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedSet {
    /// Normalized columns present in this set, in output order
    pub fields: Vec<MatchField>,

    /// Names of the passthrough columns, parallel to each record's passthrough values
    pub passthrough_columns: Vec<String>,

    pub records: Vec<NormalizedRecord>,

    pub report: NormalizeReport,
}

impl NormalizedSet {
    #[must_use]
    pub fn has_field(&self, field: MatchField) -> bool {
        self.fields.contains(&field)
    }

    /// Output header: normalized columns then passthrough columns
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| f.as_str().to_string())
            .chain(self.passthrough_columns.iter().cloned())
            .collect()
    }

    /// Values of one record in `columns()` order; missing values are empty
    #[must_use]
    pub fn row(&self, record: &NormalizedRecord) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| record.get(*f).unwrap_or_default().to_string())
            .chain(
                record
                    .passthrough
                    .iter()
                    .map(|v| v.clone().unwrap_or_default()),
            )
            .collect()
    }

    /// Write the set as delimited text with a header row
    ///
    /// # Errors
    ///
    /// Returns `csv::Error` if writing fails.
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), csv::Error> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        out.write_record(self.columns())?;
        for record in &self.records {
            out.write_record(self.row(record))?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Column indices resolved against one table
struct ResolvedColumns {
    roles: Vec<(AddressRole, usize)>,
    keep: Vec<usize>,
}

impl ResolvedColumns {
    fn resolve(table: &SourceTable, spec: &DatasetSpec) -> Result<Self, TableError> {
        let roles = spec
            .address_roles
            .iter()
            .zip(&spec.address_columns)
            .map(|(role, column)| Ok((*role, table.column_index(column)?)))
            .collect::<Result<Vec<_>, TableError>>()?;
        let keep = spec
            .keep_columns
            .iter()
            .map(|column| table.column_index(column))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { roles, keep })
    }

    fn line(&self, role: AddressRole) -> Option<usize> {
        self.roles.iter().find(|(r, _)| *r == role).map(|(_, i)| *i)
    }
}

/// Outcome of deriving an address from the line roles of one row
enum LineOutcome {
    /// No line roles declared
    NoLines,
    Parsed(ParsedAddress),
    Unparseable,
    Incompatible,
}

/// Normalizes record sets against a shared abbreviation dictionary
#[derive(Debug, Clone, Copy)]
pub struct RecordNormalizer<'a> {
    dictionary: &'a AbbreviationDictionary,
    policy: PassthroughPolicy,
}

impl<'a> RecordNormalizer<'a> {
    #[must_use]
    pub fn new(dictionary: &'a AbbreviationDictionary) -> Self {
        Self {
            dictionary,
            policy: PassthroughPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: PassthroughPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Normalize a loaded table.
    ///
    /// # Errors
    ///
    /// Returns a `NormalizeError` if the role declarations are invalid, a
    /// declared column is missing from the table, or the passthrough policy
    /// is `Reject` and a raw address carries differing passthrough values.
    pub fn normalize(
        &self,
        table: &SourceTable,
        spec: &DatasetSpec,
    ) -> Result<NormalizedSet, NormalizeError> {
        spec.validate()?;
        let columns = ResolvedColumns::resolve(table, spec)?;

        let mut report = NormalizeReport {
            input_rows: table.len(),
            ..NormalizeReport::default()
        };

        let unique_rows = dedupe_rows(table, &columns);
        report.unique_combinations = unique_rows.len();
        report.inconsistent_passthrough_groups = self.check_passthrough(table, &columns, &unique_rows)?;

        let parser = StreetAddressParser::new(self.dictionary);
        let canonicalizer = Canonicalizer::new(self.dictionary);

        let mut records = Vec::with_capacity(unique_rows.len());
        for &row in &unique_rows {
            let mut record = match derive_address(&parser, table, &columns, row) {
                LineOutcome::NoLines => NormalizedRecord::default(),
                LineOutcome::Parsed(parsed) => NormalizedRecord::from_parsed(&parsed),
                LineOutcome::Unparseable => {
                    debug!(row = row + 1, "Address line could not be parsed, excluding record");
                    report.unparseable += 1;
                    continue;
                }
                LineOutcome::Incompatible => {
                    debug!(row = row + 1, "Address lines could not be combined, excluding record");
                    report.incompatible += 1;
                    continue;
                }
            };

            // Standalone roles override anything parsed from the lines
            for &(role, column) in &columns.roles {
                if let AddressRole::Field(field) = role {
                    let value = table.cell(row, column).map(|raw| match field {
                        MatchField::Zip => truncate_zip(raw),
                        _ => canonicalizer.canonicalize(raw),
                    });
                    record.set(field, value);
                }
            }

            record.passthrough = columns
                .keep
                .iter()
                .map(|&column| table.cell(row, column).map(str::to_string))
                .collect();

            records.push(record);
        }

        report.normalized = records.len();
        if report.excluded() > 0 {
            warn!(
                unparseable = report.unparseable,
                incompatible = report.incompatible,
                "Excluded {} of {} unique address combinations",
                report.excluded(),
                report.unique_combinations
            );
        }

        Ok(NormalizedSet {
            fields: spec.output_fields(),
            passthrough_columns: spec.keep_columns.clone(),
            records,
            report,
        })
    }

    /// Count raw addresses that appear with more than one passthrough combination
    fn check_passthrough(
        &self,
        table: &SourceTable,
        columns: &ResolvedColumns,
        unique_rows: &[usize],
    ) -> Result<usize, NormalizeError> {
        if columns.keep.is_empty() {
            return Ok(0);
        }

        let mut groups: HashMap<Vec<Option<&str>>, usize> = HashMap::new();
        let mut first_inconsistent: Option<usize> = None;
        for &row in unique_rows {
            let key = address_key(table, columns, row);
            let count = groups.entry(key).or_insert(0);
            *count += 1;
            if *count == 2 && first_inconsistent.is_none() {
                first_inconsistent = Some(row);
            }
        }

        let inconsistent = groups.values().filter(|&&n| n > 1).count();
        if let Some(row) = first_inconsistent {
            let example = address_key(table, columns, row)
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect::<Vec<_>>()
                .join(" | ");
            match self.policy {
                PassthroughPolicy::Warn => warn!(
                    groups = inconsistent,
                    example = %example,
                    "Raw addresses carry differing passthrough values; keeping one record per combination"
                ),
                PassthroughPolicy::Reject => {
                    return Err(NormalizeError::InconsistentPassthrough {
                        groups: inconsistent,
                        example,
                    })
                }
            }
        }

        Ok(inconsistent)
    }
}

fn address_key<'t>(table: &'t SourceTable, columns: &ResolvedColumns, row: usize) -> Vec<Option<&'t str>> {
    columns
        .roles
        .iter()
        .map(|&(_, column)| table.cell(row, column))
        .collect()
}

/// Indices of the first row of every distinct (address + passthrough) combination
fn dedupe_rows(table: &SourceTable, columns: &ResolvedColumns) -> Vec<usize> {
    let mut seen = HashSet::new();
    (0..table.len())
        .filter(|&row| {
            let mut key = address_key(table, columns, row);
            key.extend(columns.keep.iter().map(|&column| table.cell(row, column)));
            seen.insert(key)
        })
        .collect()
}

fn derive_address(
    parser: &StreetAddressParser<'_>,
    table: &SourceTable,
    columns: &ResolvedColumns,
    row: usize,
) -> LineOutcome {
    let parse = |role: AddressRole, column: usize| {
        let mode = role.parse_mode().unwrap_or(ParseMode::Unhinted);
        parser.parse(table.cell(row, column).unwrap_or_default(), mode)
    };

    let address = columns.line(AddressRole::Address);
    let address1 = columns.line(AddressRole::Address1);
    let address2 = columns.line(AddressRole::Address2);

    let parsed = match (address, address1, address2) {
        (Some(column), _, _) => parse(AddressRole::Address, column),
        (None, Some(c1), Some(c2)) => {
            let combined = combine(parse(AddressRole::Address1, c1), parse(AddressRole::Address2, c2));
            if combined.is_empty() {
                return LineOutcome::Incompatible;
            }
            combined
        }
        (None, Some(column), None) => parse(AddressRole::Address1, column),
        (None, None, Some(column)) => parse(AddressRole::Address2, column),
        (None, None, None) => return LineOutcome::NoLines,
    };

    if parsed.is_empty() {
        LineOutcome::Unparseable
    } else {
        LineOutcome::Parsed(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::table::parse_table_text;

    fn spec(keep: &[&str], columns: &[&str], roles: &[&str]) -> DatasetSpec {
        DatasetSpec {
            keep_columns: keep.iter().map(|s| s.to_string()).collect(),
            address_columns: columns.iter().map(|s| s.to_string()).collect(),
            address_roles: roles.iter().map(|r| r.parse().unwrap()).collect(),
        }
    }

    fn normalize(csv: &str, spec: &DatasetSpec) -> Result<NormalizedSet, NormalizeError> {
        let dict = AbbreviationDictionary::load_embedded().unwrap();
        let table = parse_table_text(csv, b',').unwrap();
        RecordNormalizer::new(&dict).normalize(&table, spec)
    }

    #[test]
    fn test_two_line_addresses_are_combined() {
        let csv = "\
id,address1,address2,city,zip_code,name
1,123 N Main Street,Suite 200,Irvine,92618-1234,Acme Cafe
2,4500 Campus Dr,,Irvine,92612,Beta Shop
";
        let set = normalize(
            csv,
            &spec(
                &["id"],
                &["address1", "address2", "city", "zip_code", "name"],
                &["address1", "address2", "city", "zip", "name"],
            ),
        )
        .unwrap();

        assert_eq!(set.records.len(), 2);
        let first = &set.records[0];
        assert_eq!(first.get(MatchField::StreetNumber), Some("123"));
        assert_eq!(first.get(MatchField::StreetName), Some("MAIN"));
        assert_eq!(first.get(MatchField::StreetType), Some("ST"));
        assert_eq!(first.get(MatchField::UnitType), Some("STE"));
        assert_eq!(first.get(MatchField::UnitNumber), Some("200"));
        assert_eq!(first.get(MatchField::City), Some("IRVINE"));
        assert_eq!(first.get(MatchField::Zip), Some("92618"));
        assert_eq!(first.get(MatchField::Name), Some("ACME CAFE"));
        assert_eq!(first.passthrough, vec![Some("1".to_string())]);

        // Blank second line still parses as an empty unit
        let second = &set.records[1];
        assert_eq!(second.get(MatchField::UnitNumber), Some(""));
        assert_eq!(second.value(MatchField::UnitNumber), None);

        assert_eq!(
            set.columns(),
            vec![
                "streetNumber",
                "streetName",
                "streetType",
                "unitType",
                "unitNumber",
                "city",
                "zip",
                "name",
                "id"
            ]
        );
    }

    #[test]
    fn test_single_line_address() {
        let csv = "ADDRESS,POSTAL\n2 Corporate Plaza Suite 1000,92614\n";
        let set = normalize(csv, &spec(&[], &["ADDRESS", "POSTAL"], &["address", "zip"])).unwrap();
        let record = &set.records[0];
        assert_eq!(record.get(MatchField::StreetName), Some("CORPORATE"));
        assert_eq!(record.get(MatchField::StreetType), Some("PLZ"));
        assert_eq!(record.get(MatchField::UnitNumber), Some("1000"));
        assert_eq!(record.get(MatchField::City), None);
    }

    #[test]
    fn test_duplicate_combinations_collapse_in_first_seen_order() {
        let csv = "\
address1,zip,id
9 Oak Ave,11111,b
1 Elm St,22222,a
9 Oak Ave,11111,b
";
        let set = normalize(csv, &spec(&["id"], &["address1", "zip"], &["address1", "zip"])).unwrap();
        assert_eq!(set.report.input_rows, 3);
        assert_eq!(set.report.unique_combinations, 2);
        assert_eq!(set.records[0].get(MatchField::StreetName), Some("OAK"));
        assert_eq!(set.records[1].get(MatchField::StreetName), Some("ELM"));
    }

    #[test]
    fn test_incompatible_lines_are_excluded_and_counted() {
        let csv = "\
address1,address2
100 Main St Ste 5,Apt 2
200 Main St,Apt 3
";
        let set = normalize(csv, &spec(&[], &["address1", "address2"], &["address1", "address2"])).unwrap();
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.report.incompatible, 1);
        assert_eq!(set.report.normalized, 1);
        assert_eq!(set.report.excluded(), 1);
    }

    #[test]
    fn test_standalone_components_override_parsed_values() {
        let csv = "address,streetType\n12 Elm St,Boulevard\n";
        let set = normalize(csv, &spec(&[], &["address", "streetType"], &["address", "streetType"])).unwrap();
        assert_eq!(set.records[0].get(MatchField::StreetType), Some("BLVD"));
    }

    #[test]
    fn test_standalone_components_without_lines() {
        let csv = "num,street,zip\n12,Elm,92618\n";
        let set = normalize(
            csv,
            &spec(&[], &["num", "street", "zip"], &["streetNumber", "streetName", "zip"]),
        )
        .unwrap();
        assert_eq!(
            set.fields,
            vec![MatchField::StreetNumber, MatchField::StreetName, MatchField::Zip]
        );
        assert_eq!(set.records[0].get(MatchField::StreetName), Some("ELM"));
        assert_eq!(set.records[0].get(MatchField::StreetType), None);
    }

    #[test]
    fn test_role_validation() {
        let csv = "a,b\nx,y\n";
        let err = normalize(csv, &spec(&[], &["a", "b"], &["address"])).unwrap_err();
        assert!(matches!(err, NormalizeError::RoleCountMismatch { columns: 2, roles: 1 }));

        let err = normalize(csv, &spec(&[], &["a", "b"], &["zip", "zip"])).unwrap_err();
        assert!(matches!(err, NormalizeError::DuplicateRole(_)));

        let err = normalize(csv, &spec(&[], &["a", "b"], &["address", "address2"])).unwrap_err();
        assert!(matches!(err, NormalizeError::MixedAddressRoles));

        let err = normalize(csv, &spec(&[], &["a", "zip"], &["address", "zip"])).unwrap_err();
        assert!(matches!(err, NormalizeError::Table(TableError::MissingColumn(ref c)) if c == "zip"));

        let err = normalize(csv, &spec(&["name"], &["a"], &["address"])).unwrap_err();
        assert!(matches!(err, NormalizeError::PassthroughNameClash(_)));
    }

    #[test]
    fn test_inconsistent_passthrough_policy() {
        let csv = "\
address,acct
1 Main St,A1
1 Main St,A2
2 Main St,B1
";
        let spec = spec(&["acct"], &["address"], &["address"]);
        let set = normalize(csv, &spec).unwrap();
        assert_eq!(set.records.len(), 3);
        assert_eq!(set.report.inconsistent_passthrough_groups, 1);

        let dict = AbbreviationDictionary::load_embedded().unwrap();
        let table = parse_table_text(csv, b',').unwrap();
        let err = RecordNormalizer::new(&dict)
            .with_policy(PassthroughPolicy::Reject)
            .normalize(&table, &spec)
            .unwrap_err();
        assert!(matches!(err, NormalizeError::InconsistentPassthrough { groups: 1, .. }));
    }

    #[test]
    fn test_write_delimited() {
        let csv = "address1,id\n5 Cedar Rd,7\n";
        let set = normalize(csv, &spec(&["id"], &["address1"], &["address1"])).unwrap();
        let mut out = Vec::new();
        set.write_delimited(&mut out, b',').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "streetNumber,streetName,streetType,unitType,unitNumber,id\n5,CEDAR,RD,,,7\n"
        );
    }
}
