//! Number parsing and fixed-precision formatting.
//!
//! Values are parsed leniently (surrounding whitespace, exponents, a leading
//! `+`) and rendered from the exact binary value, so `0.15` (stored as
//! 0.1499999...) renders as `0.1` while `50.25` renders as `50.3`.

use tavi_types::{FieldDescriptor, FieldKind};

/// Parses a raw field value. Empty, non-numeric and non-finite input yield
/// `None`.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Renders with exactly one fractional digit, `""` for unparseable input.
#[must_use]
pub fn fmt_decimal1(raw: &str) -> String {
    parse_number(raw).map(one_decimal).unwrap_or_default()
}

/// Renders as the nearest integer, `""` for unparseable input.
#[must_use]
pub fn fmt_int(raw: &str) -> String {
    parse_number(raw).map(nearest_integer).unwrap_or_default()
}

/// Renders a raw value according to the field's kind.
#[must_use]
pub fn format_value(descriptor: &FieldDescriptor, raw: &str) -> String {
    match descriptor.kind {
        FieldKind::Text => raw.to_string(),
        FieldKind::Integer => fmt_int(raw),
        FieldKind::Decimal => fmt_decimal1(raw),
    }
}

fn one_decimal(value: f64) -> String {
    let negative = value < 0.0;
    // 40 digits is far past any f64 that could sit on a .x5 boundary.
    let exact = format!("{:.40}", value.abs());
    let (whole, frac) = match exact.split_once('.') {
        Some(parts) => parts,
        None => (exact.as_str(), ""),
    };
    let mut frac_digits = frac.bytes();
    let tenths = frac_digits.next().unwrap_or(b'0');
    let round_up = frac_digits.next().is_some_and(|d| d >= b'5');

    let mut digits: Vec<u8> = whole.bytes().chain(std::iter::once(tenths)).collect();
    if round_up {
        increment(&mut digits);
    }

    let split = digits.len() - 1;
    let mut out = String::with_capacity(digits.len() + 2);
    if negative {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|&d| d as char));
    out.push('.');
    out.push(digits[split] as char);
    out
}

/// Adds one to a string of ASCII digits, growing it on overflow.
fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Halves round towards positive infinity (`-2.5` becomes `-2`).
fn nearest_integer(value: f64) -> String {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    if rounded == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    format!("{rounded:.0}")
}
