use tavi_report::{fmt_decimal1, fmt_int, format_value, parse_number};
use tavi_types::tavi_schema;

// ── parse_number ─────────────────────────────────────────────────

#[test]
fn parse_accepts_plain_and_lenient_forms() {
    assert_eq!(parse_number("50"), Some(50.0));
    assert_eq!(parse_number(" -3.5 "), Some(-3.5));
    assert_eq!(parse_number("1e3"), Some(1000.0));
    assert_eq!(parse_number(".5"), Some(0.5));
    assert_eq!(parse_number("+7"), Some(7.0));
}

#[test]
fn parse_rejects_empty_garbage_and_non_finite() {
    assert_eq!(parse_number(""), None);
    assert_eq!(parse_number("   "), None);
    assert_eq!(parse_number("abc"), None);
    assert_eq!(parse_number("12mm"), None);
    assert_eq!(parse_number("inf"), None);
    assert_eq!(parse_number("NaN"), None);
}

// ── fmt_decimal1 ─────────────────────────────────────────────────

#[test]
fn decimal_pads_integers() {
    assert_eq!(fmt_decimal1("50"), "50.0");
    assert_eq!(fmt_decimal1("0"), "0.0");
}

#[test]
fn decimal_rounds_to_one_digit() {
    assert_eq!(fmt_decimal1("50.26"), "50.3");
    assert_eq!(fmt_decimal1("50.24"), "50.2");
    assert_eq!(fmt_decimal1("9.96"), "10.0");
    assert_eq!(fmt_decimal1("99.95"), "100.0");
}

#[test]
fn decimal_ties_round_away_from_zero() {
    // 50.25 and 0.75 are exactly representable.
    assert_eq!(fmt_decimal1("50.25"), "50.3");
    assert_eq!(fmt_decimal1("0.75"), "0.8");
    assert_eq!(fmt_decimal1("-0.75"), "-0.8");
}

#[test]
fn decimal_uses_exact_binary_value() {
    // 0.15 is stored as 0.1499999999999999944...
    assert_eq!(fmt_decimal1("0.15"), "0.1");
    // 1.45 is stored as 1.4499999999999999555...
    assert_eq!(fmt_decimal1("1.45"), "1.4");
}

#[test]
fn decimal_negative_values() {
    assert_eq!(fmt_decimal1("-12.34"), "-12.3");
    assert_eq!(fmt_decimal1("-0.04"), "-0.0");
    assert_eq!(fmt_decimal1("-0"), "0.0");
}

#[test]
fn decimal_invalid_is_empty() {
    assert_eq!(fmt_decimal1(""), "");
    assert_eq!(fmt_decimal1("n/a"), "");
}

// ── fmt_int ──────────────────────────────────────────────────────

#[test]
fn int_rounds_to_nearest() {
    assert_eq!(fmt_int("3.7"), "4");
    assert_eq!(fmt_int("3.2"), "3");
    assert_eq!(fmt_int("2.5"), "3");
    assert_eq!(fmt_int("10"), "10");
}

#[test]
fn int_half_rounds_up_for_negatives() {
    assert_eq!(fmt_int("-2.5"), "-2");
    assert_eq!(fmt_int("-2.6"), "-3");
    assert_eq!(fmt_int("-0.4"), "0");
}

#[test]
fn int_invalid_is_empty() {
    assert_eq!(fmt_int(""), "");
    assert_eq!(fmt_int("x"), "");
}

// ── format_value ─────────────────────────────────────────────────

#[test]
fn format_value_follows_kind() {
    let schema = tavi_schema();
    assert_eq!(format_value(schema.get("analyst").unwrap(), " Dr. K "), " Dr. K ");
    assert_eq!(format_value(schema.get("phases_a").unwrap(), "39.6"), "40");
    assert_eq!(format_value(schema.get("stj_min").unwrap(), "25"), "25.0");
}
