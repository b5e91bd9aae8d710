//! Parsing of numeric-as-string limit fields.
//!
//! Limit columns in the rule table are free text ("100", "20 req", "N/A").
//! Parsing reads the leading integer and never fails; callers decide what a
//! missing number means.

/// Limit used for usage math when a rule's sustained limit has no usable number.
pub const FALLBACK_LIMIT: u32 = 10;

/// Reads the leading base-10 integer of `text`.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit. Returns `None` when no digit follows. Values beyond the
/// `i64` range saturate.
#[must_use]
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Returns the capacity used by the usage gauge for a sustained-limit field.
///
/// Falls back to `fallback` when the field has no leading integer or the
/// integer is not positive.
#[must_use]
pub fn usage_limit(sustained_limit: &str, fallback: u32) -> u32 {
    match parse_leading_int(sustained_limit) {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => fallback,
    }
}
