//! Street address line parser.
//!
//! Parsing runs as two explicit stages over the token sequence:
//!
//! 1. **Marker scan**: find the first street-type token and the first
//!    unit-type token and remember their positions.
//! 2. **Classification**: combine the markers with the caller's
//!    [`ParseMode`] hint into a layout, then assign every remaining token
//!    to street number, street name, unit number, or drop it (directions).

use crate::catalog::abbreviations::AbbreviationDictionary;
use crate::core::address::{ParsedAddress, StreetPart, UnitPart};
use crate::core::types::ParseMode;
use crate::parsing::canonical::clean;

/// Direction tokens, dropped from street names because sources disagree on them
pub const DIRECTIONS: [&str; 8] = ["N", "S", "E", "W", "NORTH", "SOUTH", "EAST", "WEST"];

/// A type designator found during the marker scan
#[derive(Debug, Clone, PartialEq, Eq)]
struct Marker {
    index: usize,
    abbrev: String,
}

/// Result of the marker scan
#[derive(Debug, Default)]
struct Markers {
    street: Option<Marker>,
    unit: Option<Marker>,
}

impl Markers {
    fn is_marker(&self, index: usize) -> bool {
        self.street.as_ref().is_some_and(|m| m.index == index)
            || self.unit.as_ref().is_some_and(|m| m.index == index)
    }
}

/// Which components the classification stage is looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// No street or unit marker and no hint: unparseable
    Nothing,
    StreetOnly,
    UnitOnly,
    /// Street tokens before `unit_index`, unit number tokens after it
    StreetThenUnit { unit_index: usize },
}

impl Layout {
    fn resolve(markers: &Markers, mode: ParseMode, token_count: usize) -> Self {
        let has_street = markers.street.is_some() || mode.expects_street();
        let has_unit = markers.unit.is_some() || mode.expects_unit();

        match (has_street, has_unit) {
            (false, false) => Self::Nothing,
            (true, false) => Self::StreetOnly,
            (false, true) => Self::UnitOnly,
            (true, true) => Self::StreetThenUnit {
                // Without a unit marker the whole line is street
                unit_index: markers.unit.as_ref().map_or(token_count, |m| m.index),
            },
        }
    }

    fn classify(self, index: usize, token: &str) -> TokenClass {
        match self {
            Self::Nothing => TokenClass::Dropped,
            Self::StreetOnly => classify_street_token(index, token),
            Self::UnitOnly => TokenClass::UnitNumber,
            Self::StreetThenUnit { unit_index } => {
                if index > unit_index {
                    TokenClass::UnitNumber
                } else {
                    classify_street_token(index, token)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    StreetNumber,
    StreetName,
    UnitNumber,
    Dropped,
}

/// Street rule: a leading token with a digit or any all-digit token is the
/// number, directions are dropped, everything else is name
fn classify_street_token(index: usize, token: &str) -> TokenClass {
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    let all_digits = !token.is_empty() && token.chars().all(|c| c.is_ascii_digit());

    if (index == 0 && has_digit) || all_digits {
        TokenClass::StreetNumber
    } else if DIRECTIONS.contains(&token) {
        TokenClass::Dropped
    } else {
        TokenClass::StreetName
    }
}

/// Splits one free-text address line into street and unit components
#[derive(Debug, Clone, Copy)]
pub struct StreetAddressParser<'a> {
    dictionary: &'a AbbreviationDictionary,
}

impl<'a> StreetAddressParser<'a> {
    #[must_use]
    pub fn new(dictionary: &'a AbbreviationDictionary) -> Self {
        Self { dictionary }
    }

    /// Parse a raw address line.
    ///
    /// The result holds a street part when the line has a street-type token
    /// or `mode` expects one, and a unit part likewise; a line with neither
    /// yields an empty [`ParsedAddress`].
    #[must_use]
    pub fn parse(&self, line: &str, mode: ParseMode) -> ParsedAddress {
        let cleaned = clean(line);
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();

        // Stage 1
        let markers = self.scan_markers(&tokens);
        let layout = Layout::resolve(&markers, mode, tokens.len());

        // Stage 2
        let mut street_number = String::new();
        let mut street_name: Vec<&str> = Vec::new();
        let mut unit_number: Vec<&str> = Vec::new();

        for (index, &token) in tokens.iter().enumerate() {
            if markers.is_marker(index) {
                continue;
            }
            match layout.classify(index, token) {
                // A later all-digit token replaces an earlier number
                TokenClass::StreetNumber => street_number = token.to_string(),
                TokenClass::StreetName => street_name.push(token),
                TokenClass::UnitNumber => unit_number.push(token),
                TokenClass::Dropped => {}
            }
        }

        let street = StreetPart {
            number: street_number,
            name: street_name.join(" "),
            street_type: markers.street.map(|m| m.abbrev).unwrap_or_default(),
        };
        let unit = UnitPart {
            unit_type: markers.unit.map(|m| m.abbrev).unwrap_or_default(),
            number: unit_number.join(" "),
        };

        match layout {
            Layout::Nothing => ParsedAddress::empty(),
            Layout::StreetOnly => ParsedAddress {
                street: Some(street),
                unit: None,
            },
            Layout::UnitOnly => ParsedAddress {
                street: None,
                unit: Some(unit),
            },
            Layout::StreetThenUnit { .. } => ParsedAddress {
                street: Some(street),
                unit: Some(unit),
            },
        }
    }

    fn scan_markers(&self, tokens: &[&str]) -> Markers {
        let mut markers = Markers::default();

        for (index, token) in tokens.iter().enumerate() {
            if self.dictionary.is_street_type(token) {
                if markers.street.is_none() {
                    markers.street = Some(Marker {
                        index,
                        abbrev: self.dictionary.lookup(token).to_string(),
                    });
                }
            } else if self.dictionary.is_unit_type(token) && markers.unit.is_none() {
                markers.unit = Some(Marker {
                    index,
                    abbrev: self.dictionary.lookup(token).to_string(),
                });
            }
        }

        markers
    }
}
