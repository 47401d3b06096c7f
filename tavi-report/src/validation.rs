//! Inline field checks: numeric shape (blocks submission) and advisory
//! ranges (never blocks anything).

use crate::format::parse_number;
use regex_lite::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tavi_types::{FieldKey, FieldSchema, Snapshot};

static NUMERIC_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("numeric shape pattern is valid"));

/// Kind of problem found on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Raw text is not a plain number. Blocks the explicit submit only.
    PatternError,
    /// Parsed value lies outside the advisory range. Informational.
    RangeAdvisory,
}

/// A problem attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub key: FieldKey,
    pub kind: IssueKind,
    pub message: String,
}

impl FieldIssue {
    /// Returns true if the issue prevents submission.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.kind == IssueKind::PatternError
    }
}

/// Returns true if `raw` is empty or looks like `-12` / `3.45`.
#[must_use]
pub fn matches_numeric_shape(raw: &str) -> bool {
    raw.is_empty() || NUMERIC_SHAPE.is_match(raw)
}

/// Advisory for values outside `[min, max]`.
///
/// Empty or non-numeric input is not this evaluator's concern and yields
/// `None`, as do values equal to either bound.
#[must_use]
pub fn range_warning(raw: &str, min: f64, max: f64) -> Option<String> {
    let value = parse_number(raw)?;
    if value >= min && value <= max {
        None
    } else {
        Some(format!("value out of range ({min} to {max})"))
    }
}

/// Checks every numeric field of a snapshot, in entry order.
#[must_use]
pub fn validate(schema: &FieldSchema, snapshot: &Snapshot) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    for field in schema.fields().filter(|f| f.kind.is_numeric()) {
        let raw = snapshot.value(field.key.as_str());
        if !matches_numeric_shape(raw) {
            issues.push(FieldIssue {
                key: field.key.clone(),
                kind: IssueKind::PatternError,
                message: "enter a number".to_string(),
            });
            continue;
        }
        if let Some(range) = field.range {
            if let Some(message) = range_warning(raw, range.min, range.max) {
                issues.push(FieldIssue {
                    key: field.key.clone(),
                    kind: IssueKind::RangeAdvisory,
                    message,
                });
            }
        }
    }
    issues
}
