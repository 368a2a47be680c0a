use crate::core::address::ParsedAddress;

/// Merge the parses of two address lines into one full address.
///
/// - street-only + unit-only, in either order: street from one, unit from the other
/// - full + empty, in either order: the full one
/// - anything else: empty, and the record is dropped by the caller
#[must_use]
pub fn combine(a: ParsedAddress, b: ParsedAddress) -> ParsedAddress {
    match (a.field_count(), b.field_count()) {
        (3, 2) => ParsedAddress {
            street: a.street,
            unit: b.unit,
        },
        (2, 3) => ParsedAddress {
            street: b.street,
            unit: a.unit,
        },
        (5, 0) => a,
        (0, 5) => b,
        _ => ParsedAddress::empty(),
    }
}
