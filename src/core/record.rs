use serde::{Deserialize, Serialize};

use crate::core::address::ParsedAddress;
use crate::core::types::MatchField;

/// One normalized record: canonical address components, city, zip and name,
/// plus passthrough values carried verbatim from the source row.
///
/// Passthrough values are positional; their column names live on the owning
/// [`NormalizedSet`](crate::normalize::records::NormalizedSet).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub street_number: Option<String>,
    pub street_name: Option<String>,
    pub street_type: Option<String>,
    pub unit_type: Option<String>,
    pub unit_number: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub name: Option<String>,
    pub passthrough: Vec<Option<String>>,
}

impl NormalizedRecord {
    /// Build a record from a parsed address; unset parts stay `None`
    #[must_use]
    pub fn from_parsed(parsed: &ParsedAddress) -> Self {
        let mut record = Self::default();
        for field in MatchField::ALL {
            if let Some(value) = parsed.get(field) {
                record.set(field, Some(value.to_string()));
            }
        }
        record
    }

    #[must_use]
    pub fn get(&self, field: MatchField) -> Option<&str> {
        let value = match field {
            MatchField::StreetNumber => &self.street_number,
            MatchField::StreetName => &self.street_name,
            MatchField::StreetType => &self.street_type,
            MatchField::UnitType => &self.unit_type,
            MatchField::UnitNumber => &self.unit_number,
            MatchField::City => &self.city,
            MatchField::Zip => &self.zip,
            MatchField::Name => &self.name,
        };
        value.as_deref()
    }

    /// Value of a field for name comparisons: empty strings count as missing
    #[must_use]
    pub fn value(&self, field: MatchField) -> Option<&str> {
        self.get(field).filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, field: MatchField, value: Option<String>) {
        let slot = match field {
            MatchField::StreetNumber => &mut self.street_number,
            MatchField::StreetName => &mut self.street_name,
            MatchField::StreetType => &mut self.street_type,
            MatchField::UnitType => &mut self.unit_type,
            MatchField::UnitNumber => &mut self.unit_number,
            MatchField::City => &mut self.city,
            MatchField::Zip => &mut self.zip,
            MatchField::Name => &mut self.name,
        };
        *slot = value;
    }
}
