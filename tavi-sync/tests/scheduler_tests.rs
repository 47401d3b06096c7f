use pretty_assertions::assert_eq;
use tavi_sync::{
    AutosaveFire, AutosaveScheduler, Deadline, NavigationController, SessionConfig, SyncConfig,
    SyncGate,
};
use tavi_report::ReportMode;
use tavi_types::{FieldKey, tavi_schema};

// ── Deadline ─────────────────────────────────────────────────────

#[test]
fn deadline_fires_once() {
    let mut d = Deadline::default();
    d.arm(100);
    assert_eq!(d.take_due(99), None);
    assert_eq!(d.take_due(150), Some(100));
    assert_eq!(d.take_due(200), None);
    assert!(!d.is_pending());
}

#[test]
fn deadline_cancel_is_idempotent() {
    let mut d = Deadline::default();
    d.cancel();
    d.arm(10);
    d.cancel();
    d.cancel();
    assert_eq!(d.at(), None);
    assert_eq!(d.take_due(100), None);
}

// ── Autosave scheduler ───────────────────────────────────────────

#[test]
fn rearm_replaces_debounce() {
    let mut s = AutosaveScheduler::new(&SyncConfig::default());
    s.arm(0);
    s.arm(300);
    assert_eq!(s.debounce_at(), Some(800));
    assert_eq!(s.fire_debounce(500, false), None);
    assert_eq!(s.fire_debounce(800, false), Some(AutosaveFire::Write));
    assert!(!s.is_pending());
}

#[test]
fn focused_fire_moves_to_settle() {
    let mut s = AutosaveScheduler::new(&SyncConfig::default());
    s.arm(0);
    assert_eq!(
        s.fire_debounce(500, true),
        Some(AutosaveFire::Settling { until: 700 })
    );
    assert!(s.is_pending());
    assert!(!s.fire_settle(699));
    assert!(s.fire_settle(700));
    assert!(!s.is_pending());
}

#[test]
fn arm_drops_pending_settle() {
    let mut s = AutosaveScheduler::new(&SyncConfig::default());
    s.arm(0);
    s.fire_debounce(500, true);
    s.arm(600);
    assert_eq!(s.settle_at(), None);
    assert_eq!(s.debounce_at(), Some(1_100));
}

#[test]
fn scheduler_cancel_is_idempotent() {
    let mut s = AutosaveScheduler::new(&SyncConfig::default());
    s.cancel();
    s.arm(0);
    s.fire_debounce(500, true);
    s.cancel();
    s.cancel();
    assert!(!s.is_pending());
    assert!(!s.fire_settle(10_000));
}

#[test]
fn durations_come_from_config() {
    let config = SyncConfig {
        autosave_debounce_ms: 50,
        autosave_settle_ms: 5,
        ..SyncConfig::default()
    };
    let mut s = AutosaveScheduler::new(&config);
    s.arm(10);
    assert_eq!(
        s.fire_debounce(60, true),
        Some(AutosaveFire::Settling { until: 65 })
    );
}

// ── Navigation controller ────────────────────────────────────────

#[test]
fn next_key_follows_schema_order() {
    let schema = tavi_schema();
    assert_eq!(
        NavigationController::next_key(&schema, "case_name"),
        Some(FieldKey::from("analyst"))
    );
    assert_eq!(NavigationController::next_key(&schema, "lt_psca_max"), None);
    assert_eq!(NavigationController::next_key(&schema, "unknown"), None);
}

#[test]
fn latest_move_wins() {
    let mut nav = NavigationController::new(100);
    nav.begin(FieldKey::from("analyst"), 0);
    nav.begin(FieldKey::from("phases_a"), 50);
    assert_eq!(nav.take_due(100), None);
    assert_eq!(nav.take_due(150), Some(FieldKey::from("phases_a")));
    assert_eq!(nav.destination(), None);
}

#[test]
fn cancelled_move_never_lands() {
    let mut nav = NavigationController::new(100);
    nav.begin(FieldKey::from("analyst"), 0);
    nav.cancel();
    assert_eq!(nav.deadline(), None);
    assert_eq!(nav.take_due(1_000), None);
}

// ── Gate ─────────────────────────────────────────────────────────

#[test]
fn only_idle_gate_is_open() {
    let a = FieldKey::from("analyst");
    assert!(SyncGate::Idle.is_open());
    assert!(!SyncGate::Editing(a.clone()).is_open());
    assert!(!SyncGate::Resetting.is_open());
    let navigating = SyncGate::Navigating {
        from: a.clone(),
        to: FieldKey::from("phases_a"),
    };
    assert!(!navigating.is_open());
    assert!(navigating.holds_focus());
    assert_eq!(navigating.focused_key(), Some(&a));
    assert!(!SyncGate::Resetting.holds_focus());
}

// ── Config ───────────────────────────────────────────────────────

#[test]
fn default_timings() {
    let c = SyncConfig::default();
    assert_eq!(c.autosave_debounce_ms, 500);
    assert_eq!(c.autosave_settle_ms, 200);
    assert_eq!(c.blur_grace_ms, 200);
    assert_eq!(c.blur_flush_ms, 600);
    assert_eq!(c.navigation_settle_ms, 100);
}

#[test]
fn session_config_from_partial_json() {
    let config = SessionConfig::from_json(
        r#"{"sync": {"autosave_debounce_ms": 800}, "report": {"mode": "bare"}}"#,
    )
    .unwrap();
    assert_eq!(config.sync.autosave_debounce_ms, 800);
    assert_eq!(config.sync.blur_grace_ms, 200);
    assert_eq!(config.report.mode, ReportMode::Bare);
    assert_eq!(config.mail.fallback_timeout_ms, 1_000);
}

#[test]
fn session_config_load_reports_missing_file() {
    let result = SessionConfig::load("/definitely/not/here.json");
    assert!(matches!(result, Err(tavi_sync::SyncError::Config(_))));
}

#[test]
fn session_config_load_reads_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, r#"{"mail": {"default_subject": "CT"}}"#).unwrap();
    let config = SessionConfig::load(&path).unwrap();
    assert_eq!(config.mail.default_subject, "CT");
    assert_eq!(config.sync, SyncConfig::default());
}

#[test]
fn gate_default_is_idle() {
    assert_eq!(SyncGate::default(), SyncGate::Idle);
}
