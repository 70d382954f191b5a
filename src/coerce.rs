//! Text to value coercion
//!
//! Each `parse_*` function returns `None` when the text cannot be
//! interpreted; the importer then leaves the destination field untouched,
//! which on a fresh record means its zero value.

/// Parses a 32-bit signed integer.
///
/// Surrounding whitespace is ignored, an optional sign is accepted and the
/// `0x`, `0o` and `0b` prefixes select base 16, 8 and 2.
pub fn parse_int(text: &str) -> Option<i32> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = match digits.get(..2) {
        Some("0x") | Some("0X") => (16, &digits[2..]),
        Some("0o") | Some("0O") => (8, &digits[2..]),
        Some("0b") | Some("0B") => (2, &digits[2..]),
        _ => (10, digits),
    };

    // from_str_radix would accept a second sign
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}

/// Parses a float (`"2.8"`, `"-3.5"`, `"1e3"`)
pub fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Only the literal `true` is true; any other text is false
pub fn parse_bool(text: &str) -> bool {
    text.trim() == "true"
}
