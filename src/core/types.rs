use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A normalized address attribute that can be used as a match key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchField {
    StreetNumber,
    StreetName,
    StreetType,
    UnitType,
    #[serde(alias = "unitName")]
    UnitNumber,
    City,
    Zip,
    Name,
}

impl MatchField {
    /// All fields, in output column order
    pub const ALL: [MatchField; 8] = [
        Self::StreetNumber,
        Self::StreetName,
        Self::StreetType,
        Self::UnitType,
        Self::UnitNumber,
        Self::City,
        Self::Zip,
        Self::Name,
    ];

    /// Column name used in normalized output
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StreetNumber => "streetNumber",
            Self::StreetName => "streetName",
            Self::StreetType => "streetType",
            Self::UnitType => "unitType",
            Self::UnitNumber => "unitNumber",
            Self::City => "city",
            Self::Zip => "zip",
            Self::Name => "name",
        }
    }

    /// True for the five components produced by the street address parser
    #[must_use]
    pub fn is_address_component(&self) -> bool {
        matches!(
            self,
            Self::StreetNumber
                | Self::StreetName
                | Self::StreetType
                | Self::UnitType
                | Self::UnitNumber
        )
    }
}

impl std::fmt::Display for MatchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match AddressRole::from_str(s)? {
            AddressRole::Field(field) => Ok(field),
            role => Err(format!("'{role}' is an address line role, not a match field")),
        }
    }
}

/// Semantic role of a raw source column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AddressRole {
    /// Street line (number, name, type); parsed in street mode
    Address1,
    /// Secondary line (unit type and number); parsed in unit mode
    Address2,
    /// Single combined line; parsed expecting both street and unit
    Address,
    /// A column already holding one normalized component
    Field(MatchField),
}

impl AddressRole {
    /// Parse mode implied by an address line role
    #[must_use]
    pub fn parse_mode(&self) -> Option<ParseMode> {
        match self {
            Self::Address1 => Some(ParseMode::Street),
            Self::Address2 => Some(ParseMode::Unit),
            Self::Address => Some(ParseMode::Both),
            Self::Field(_) => None,
        }
    }
}

impl std::fmt::Display for AddressRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address1 => write!(f, "address1"),
            Self::Address2 => write!(f, "address2"),
            Self::Address => write!(f, "address"),
            Self::Field(field) => write!(f, "{field}"),
        }
    }
}

impl FromStr for AddressRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role = match s {
            "address1" => Self::Address1,
            "address2" => Self::Address2,
            "address" => Self::Address,
            "streetNumber" => Self::Field(MatchField::StreetNumber),
            "streetName" => Self::Field(MatchField::StreetName),
            "streetType" => Self::Field(MatchField::StreetType),
            "unitType" => Self::Field(MatchField::UnitType),
            "unitNumber" | "unitName" => Self::Field(MatchField::UnitNumber),
            "city" => Self::Field(MatchField::City),
            "zip" => Self::Field(MatchField::Zip),
            "name" => Self::Field(MatchField::Name),
            other => return Err(format!("unknown address role '{other}'")),
        };
        Ok(role)
    }
}

impl TryFrom<String> for AddressRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AddressRole> for String {
    fn from(role: AddressRole) -> Self {
        role.to_string()
    }
}

/// Hint telling the parser which components a line is expected to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    Street,
    Unit,
    Both,
    /// No hint; only type markers found in the line decide
    #[default]
    Unhinted,
}

impl ParseMode {
    #[must_use]
    pub fn expects_street(&self) -> bool {
        matches!(self, Self::Street | Self::Both)
    }

    #[must_use]
    pub fn expects_unit(&self) -> bool {
        matches!(self, Self::Unit | Self::Both)
    }
}

/// Which record set must be preserved by the join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KeepSide {
    /// Left-outer join: every record of the first set is kept
    Left,
    /// Right-outer join: every record of the second set is kept
    Right,
    /// Full-outer join
    #[default]
    Both,
}

impl KeepSide {
    /// Interpret the `keep` flag: `"1"` keeps the first set, `"2"` the second,
    /// anything else keeps both
    #[must_use]
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim() {
            "1" | "left" => Self::Left,
            "2" | "right" => Self::Right,
            _ => Self::Both,
        }
    }

    #[must_use]
    pub fn keeps_left(&self) -> bool {
        matches!(self, Self::Left | Self::Both)
    }

    #[must_use]
    pub fn keeps_right(&self) -> bool {
        matches!(self, Self::Right | Self::Both)
    }
}

impl std::fmt::Display for KeepSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "1"),
            Self::Right => write!(f, "2"),
            Self::Both => write!(f, "both"),
        }
    }
}

impl From<String> for KeepSide {
    fn from(flag: String) -> Self {
        Self::from_flag(&flag)
    }
}

impl From<KeepSide> for String {
    fn from(keep: KeepSide) -> Self {
        keep.to_string()
    }
}

/// Which sides of the join a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinIndicator {
    LeftOnly,
    RightOnly,
    Both,
}

impl std::fmt::Display for JoinIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeftOnly => write!(f, "left_only"),
            Self::RightOnly => write!(f, "right_only"),
            Self::Both => write!(f, "both"),
        }
    }
}
