use tavi_report::{IssueKind, matches_numeric_shape, range_warning, validate};
use tavi_types::tavi_schema;

// ── range_warning ────────────────────────────────────────────────

#[test]
fn inside_and_on_bounds_is_silent() {
    assert_eq!(range_warning("500", 0.0, 1000.0), None);
    assert_eq!(range_warning("1000", 0.0, 1000.0), None);
    assert_eq!(range_warning("0", 0.0, 1000.0), None);
    assert_eq!(range_warning("-180", -180.0, 180.0), None);
}

#[test]
fn outside_names_both_bounds() {
    let message = range_warning("1500", 0.0, 1000.0).unwrap();
    assert!(message.contains('0'));
    assert!(message.contains("1000"));
    assert!(range_warning("1000.0001", 0.0, 1000.0).is_some());
    assert!(range_warning("-0.1", 0.0, 50.0).is_some());
}

#[test]
fn empty_or_text_is_not_a_range_concern() {
    assert_eq!(range_warning("", 0.0, 10.0), None);
    assert_eq!(range_warning("abc", 0.0, 10.0), None);
}

// ── numeric shape ────────────────────────────────────────────────

#[test]
fn numeric_shape() {
    for ok in ["", "0", "12", "-3", "4.25", "-0.5"] {
        assert!(matches_numeric_shape(ok), "{ok:?} should pass");
    }
    for bad in ["abc", "1.", ".5", "1e3", "+1", " 1", "1,5", "--1"] {
        assert!(!matches_numeric_shape(bad), "{bad:?} should fail");
    }
}

// ── validate ─────────────────────────────────────────────────────

#[test]
fn validate_reports_patterns_and_advisories() {
    let schema = tavi_schema();
    let mut snapshot = schema.empty_snapshot();
    snapshot.set("annulus_area", "1500").unwrap();
    snapshot.set("stj_min", "2O").unwrap();
    snapshot.set("analyst", "not checked").unwrap();
    snapshot.set("sov_l", "30").unwrap();

    let issues = validate(&schema, &snapshot);
    assert_eq!(issues.len(), 2);

    let area = issues.iter().find(|i| i.key.as_str() == "annulus_area").unwrap();
    assert_eq!(area.kind, IssueKind::RangeAdvisory);
    assert!(!area.is_blocking());

    let stj = issues.iter().find(|i| i.key.as_str() == "stj_min").unwrap();
    assert_eq!(stj.kind, IssueKind::PatternError);
    assert!(stj.is_blocking());
}

#[test]
fn validate_clean_snapshot() {
    let schema = tavi_schema();
    assert!(validate(&schema, &schema.empty_snapshot()).is_empty());
}
