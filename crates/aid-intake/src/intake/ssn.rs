//! Structural checks for social security numbers.
//!
//! These helpers only answer yes/no questions; they never return or format the digits so
//! callers cannot accidentally propagate an SSN into derived output.

/// Numbers printed in advertising or otherwise known to be void.
const PUBLISHED_PLACEHOLDERS: [&str; 3] = ["123456789", "078051120", "219099999"];

pub(crate) fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// True when the input resolves to exactly nine digits once separators are removed.
pub fn has_nine_digits(raw: &str) -> bool {
    digits(raw).len() == 9
}

/// Area, group, and serial checks for an issuable SSN.
pub fn is_valid_pattern(raw: &str) -> bool {
    let digits = digits(raw);
    if digits.len() != 9 {
        return false;
    }

    let (area, rest) = digits.split_at(3);
    let (group, serial) = rest.split_at(2);

    if area == "000" || area == "666" || area.starts_with('9') {
        return false;
    }
    if group == "00" || serial == "0000" {
        return false;
    }

    !PUBLISHED_PLACEHOLDERS.contains(&digits.as_str())
}

/// Flags numbers that look fabricated or could not have been issued.
pub fn is_unusual(raw: &str) -> bool {
    !has_nine_digits(raw) || !is_valid_pattern(raw)
}
