use pretty_assertions::assert_eq;
use tavi_mail::{MailConfig, SubmitError, SubmitTrigger, compose};
use tavi_report::{IssueKind, ReportMode, serialize};
use tavi_types::{Snapshot, tavi_schema};

fn recipients() -> Vec<String> {
    vec!["a@example.com".into(), "b@example.com".into()]
}

fn filled() -> Snapshot {
    let mut snapshot = tavi_schema().empty_snapshot();
    snapshot.set("case_name", "Case 12").unwrap();
    snapshot.set("analyst", "Dr. K").unwrap();
    snapshot.set("annulus_area", "450").unwrap();
    snapshot
}

// ── Triggers ─────────────────────────────────────────────────────

#[test]
fn commit_key_never_submits() {
    let schema = tavi_schema();
    let result = compose(
        &schema,
        &filled(),
        &recipients(),
        SubmitTrigger::CommitKey,
        ReportMode::Labeled,
        &MailConfig::default(),
    );
    assert_eq!(result, Ok(None));
}

#[test]
fn commit_key_ignores_blocking_problems() {
    let schema = tavi_schema();
    let mut snapshot = filled();
    snapshot.set("ca_score", "abc").unwrap();
    let result = compose(
        &schema,
        &snapshot,
        &[],
        SubmitTrigger::CommitKey,
        ReportMode::Labeled,
        &MailConfig::default(),
    );
    assert_eq!(result, Ok(None));
}

// ── Send control ─────────────────────────────────────────────────

#[test]
fn send_control_composes_subject_and_body() {
    let schema = tavi_schema();
    let snapshot = filled();
    let outbound = compose(
        &schema,
        &snapshot,
        &recipients(),
        SubmitTrigger::SendControl,
        ReportMode::Labeled,
        &MailConfig::default(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(outbound.subject, "Case 12");
    assert_eq!(outbound.recipients, recipients());
    assert_eq!(outbound.body, serialize(&schema, &snapshot, ReportMode::Labeled));
}

#[test]
fn empty_case_name_uses_default_subject() {
    let schema = tavi_schema();
    let mut snapshot = filled();
    snapshot.set("case_name", "").unwrap();
    let outbound = compose(
        &schema,
        &snapshot,
        &recipients(),
        SubmitTrigger::SendControl,
        ReportMode::Bare,
        &MailConfig::default(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(outbound.subject, "TAVI術前CT所見");
    assert_eq!(outbound.body, serialize(&schema, &snapshot, ReportMode::Bare));
}

#[test]
fn case_name_is_used_verbatim() {
    let schema = tavi_schema();
    let mut snapshot = filled();
    snapshot.set("case_name", " Case 12 ").unwrap();
    let outbound = compose(
        &schema,
        &snapshot,
        &recipients(),
        SubmitTrigger::SendControl,
        ReportMode::Bare,
        &MailConfig::default(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(outbound.subject, " Case 12 ");
}

#[test]
fn missing_recipients_block_submission() {
    let schema = tavi_schema();
    let result = compose(
        &schema,
        &filled(),
        &[],
        SubmitTrigger::SendControl,
        ReportMode::Labeled,
        &MailConfig::default(),
    );
    assert_eq!(result, Err(SubmitError::MissingRecipients));
}

#[test]
fn pattern_errors_block_before_recipients_are_checked() {
    let schema = tavi_schema();
    let mut snapshot = filled();
    snapshot.set("ca_score", "12,5").unwrap();
    let result = compose(
        &schema,
        &snapshot,
        &[],
        SubmitTrigger::SendControl,
        ReportMode::Labeled,
        &MailConfig::default(),
    );

    let Err(SubmitError::InvalidFields(issues)) = result else {
        panic!("expected InvalidFields, got {result:?}");
    };
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].key.as_str(), "ca_score");
    assert_eq!(issues[0].kind, IssueKind::PatternError);
}

#[test]
fn range_advisories_do_not_block() {
    let schema = tavi_schema();
    let mut snapshot = filled();
    snapshot.set("annulus_area", "1500").unwrap();
    let outbound = compose(
        &schema,
        &snapshot,
        &recipients(),
        SubmitTrigger::SendControl,
        ReportMode::Labeled,
        &MailConfig::default(),
    )
    .unwrap();
    assert!(outbound.is_some());
}

#[test]
fn submit_error_messages() {
    assert_eq!(
        SubmitError::MissingRecipients.to_string(),
        "no mail recipients configured"
    );
    assert_eq!(
        SubmitError::InvalidFields(Vec::new()).to_string(),
        "0 field(s) are not valid numbers"
    );
}

// ── Config ───────────────────────────────────────────────────────

#[test]
fn config_defaults_fill_missing_keys() {
    let config: MailConfig = serde_json::from_str(r#"{"fallback_timeout_ms": 1500}"#).unwrap();
    assert_eq!(config.fallback_timeout_ms, 1500);
    assert_eq!(config.deep_link_base, "googlegmail://co");
    assert_eq!(config.default_subject, "TAVI術前CT所見");
}
