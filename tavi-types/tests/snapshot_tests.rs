use tavi_types::{Error, FieldDescriptor, FieldKind, FieldSchema};

fn schema() -> FieldSchema {
    FieldSchema::new(
        vec![
            FieldDescriptor::new("x", "X", FieldKind::Decimal, 0),
            FieldDescriptor::new("y", "Y", FieldKind::Decimal, 1),
        ],
        vec![],
    )
    .unwrap()
}

#[test]
fn empty_snapshot_is_blank() {
    let snapshot = schema().empty_snapshot();
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.is_blank());
    assert!(!snapshot.is_empty());
}

#[test]
fn set_returns_previous_value() {
    let mut snapshot = schema().empty_snapshot();
    assert_eq!(snapshot.set("x", "1.5").unwrap(), "");
    assert_eq!(snapshot.set("x", "2").unwrap(), "1.5");
    assert_eq!(snapshot.value("x"), "2");
    assert!(!snapshot.is_blank());
}

#[test]
fn set_unknown_key_never_adds_it() {
    let mut snapshot = schema().empty_snapshot();
    assert_eq!(snapshot.set("nope", "1").unwrap_err(), Error::UnknownField("nope".into()));
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.value("nope"), "");
}

#[test]
fn changed_keys_lists_differences() {
    let s = schema();
    let a = s.empty_snapshot();
    let mut b = s.empty_snapshot();
    b.set("y", "3").unwrap();
    let changed: Vec<String> = a.changed_keys(&b).iter().map(ToString::to_string).collect();
    assert_eq!(changed, vec!["y"]);
    assert!(a.changed_keys(&a.clone()).is_empty());
}

#[test]
fn serializes_as_flat_map() {
    let mut snapshot = schema().empty_snapshot();
    snapshot.set("x", "7").unwrap();
    let json = serde_json::to_string(&snapshot).unwrap();
    assert_eq!(json, r#"{"x":"7","y":""}"#);
}
