use tavi_types::{FieldKind, ReportItem, tavi_schema};

#[test]
fn catalogue_has_sixty_two_fields() {
    assert_eq!(tavi_schema().len(), 62);
}

#[test]
fn entry_order_starts_with_case_details() {
    let schema = tavi_schema();
    let first: Vec<&str> = schema.keys().take(6).map(|k| k.as_str()).collect();
    assert_eq!(
        first,
        vec!["case_name", "analyst", "phases_a", "phases_b", "ca_score", "annulus_area"]
    );
    assert_eq!(schema.keys().last().unwrap().as_str(), "lt_psca_max");
}

#[test]
fn navigation_crosses_groups() {
    let schema = tavi_schema();
    assert_eq!(schema.next_after("annulus_max").unwrap().key.as_str(), "perpen_lr");
    assert_eq!(schema.next_after("sov_l").unwrap().key.as_str(), "rt_pcia_min");
    assert_eq!(schema.next_after("lt_cfa_max").unwrap().key.as_str(), "tao_2ndic");
}

#[test]
fn kinds_match_measurements() {
    let schema = tavi_schema();
    assert_eq!(schema.get("case_name").unwrap().kind, FieldKind::Text);
    assert_eq!(schema.get("analyst").unwrap().kind, FieldKind::Text);
    assert_eq!(schema.get("phases_a").unwrap().kind, FieldKind::Integer);
    assert_eq!(schema.get("phases_b").unwrap().kind, FieldKind::Integer);
    assert_eq!(schema.get("rootangle").unwrap().kind, FieldKind::Decimal);
    let numeric = schema.fields().filter(|f| f.kind.is_numeric()).count();
    assert_eq!(numeric, 60);
}

#[test]
fn ranges_and_units() {
    let schema = tavi_schema();
    let area = schema.get("annulus_area").unwrap();
    assert_eq!(area.unit_str(), "mm2");
    assert_eq!(area.range.unwrap().max, 1000.0);

    let angle = schema.get("perpen_crca").unwrap();
    assert_eq!(angle.unit_str(), "deg.");
    assert_eq!(angle.range.unwrap().min, -180.0);
    assert_eq!(angle.form_label, "perpen cra/cau (deg.)");

    let cfa = schema.get("lt_cfa_min").unwrap();
    assert_eq!(cfa.label, "Lt.CFA min");
    assert_eq!(cfa.range.unwrap().max, 50.0);

    assert!(schema.get("ca_score").unwrap().range.is_none());
    assert!(schema.get("phases_a").unwrap().range.is_none());
}

#[test]
fn layout_blank_counts() {
    let schema = tavi_schema();
    let blanks: Vec<usize> = schema
        .layout()
        .iter()
        .filter_map(|item| match item {
            ReportItem::Blank { lines } => Some(*lines),
            _ => None,
        })
        .collect();
    assert_eq!(blanks, vec![4, 2, 1, 1, 1]);
}

#[test]
fn layout_covers_every_field_but_case_name() {
    let schema = tavi_schema();
    let mut rendered: Vec<&str> = schema
        .layout()
        .iter()
        .flat_map(ReportItem::field_keys)
        .map(|k| k.as_str())
        .collect();
    rendered.sort_unstable();
    let mut expected: Vec<&str> = schema.keys().map(|k| k.as_str()).filter(|k| *k != "case_name").collect();
    expected.sort_unstable();
    assert_eq!(rendered, expected);
}
