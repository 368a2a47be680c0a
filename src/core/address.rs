use serde::{Deserialize, Serialize};

use crate::core::types::MatchField;

/// Street portion of a parsed address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetPart {
    pub number: String,
    pub name: String,
    /// Canonical street-type abbreviation, empty when the line had no marker
    pub street_type: String,
}

/// Unit portion of a parsed address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPart {
    /// Canonical unit-type abbreviation, empty when the line had no marker
    pub unit_type: String,
    pub number: String,
}

/// Structured result of parsing one or two address lines.
///
/// Completeness is carried by which parts are present: street only (3
/// fields), unit only (2 fields), both (5 fields) or neither (0 fields,
/// unparseable).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<StreetPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<UnitPart>,
}

impl ParsedAddress {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of populated fields: 0, 2, 3 or 5
    #[must_use]
    pub fn field_count(&self) -> usize {
        let street = if self.street.is_some() { 3 } else { 0 };
        let unit = if self.unit.is_some() { 2 } else { 0 };
        street + unit
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.street.is_none() && self.unit.is_none()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.street.is_some() && self.unit.is_some()
    }

    /// Value of one address component, if its part is present
    #[must_use]
    pub fn get(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::StreetNumber => self.street.as_ref().map(|s| s.number.as_str()),
            MatchField::StreetName => self.street.as_ref().map(|s| s.name.as_str()),
            MatchField::StreetType => self.street.as_ref().map(|s| s.street_type.as_str()),
            MatchField::UnitType => self.unit.as_ref().map(|u| u.unit_type.as_str()),
            MatchField::UnitNumber => self.unit.as_ref().map(|u| u.number.as_str()),
            MatchField::City | MatchField::Zip | MatchField::Name => None,
        }
    }
}
