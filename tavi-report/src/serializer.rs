//! Snapshot to report text.

use crate::format::format_value;
use serde::{Deserialize, Serialize};
use tavi_types::{FieldSchema, ReportItem, Snapshot};

/// Line terminator joining every report element.
pub const CRLF: &str = "\r\n";

/// Selects how report lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// `- label[value]unit` per line.
    #[default]
    Labeled,
    /// Values only, same positions and separators.
    Bare,
}

/// Report configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub mode: ReportMode,
}

/// Serializes a snapshot following the schema's report layout.
///
/// Every layout item produces one element, even when its value is empty;
/// elements are joined with CRLF. A `Blank { lines: n }` item is itself an
/// element made of `n` CRLF sequences.
#[must_use]
pub fn serialize(schema: &FieldSchema, snapshot: &Snapshot, mode: ReportMode) -> String {
    schema
        .layout()
        .iter()
        .map(|item| render_item(schema, snapshot, item, mode))
        .collect::<Vec<_>>()
        .join(CRLF)
}

/// Number of CRLF-separated lines [`serialize`] produces for this schema.
#[must_use]
pub fn expected_line_count(schema: &FieldSchema) -> usize {
    schema
        .layout()
        .iter()
        .map(|item| match item {
            ReportItem::Blank { lines } => lines + 1,
            _ => 1,
        })
        .sum()
}

fn render_item(schema: &FieldSchema, snapshot: &Snapshot, item: &ReportItem, mode: ReportMode) -> String {
    match item {
        ReportItem::Field { key } => {
            let Some(descriptor) = schema.get(key.as_str()) else {
                return String::new();
            };
            let value = format_value(descriptor, snapshot.value(key.as_str()));
            match mode {
                ReportMode::Labeled => {
                    format!("- {}[{}]{}", descriptor.label, value, descriptor.unit_str())
                }
                ReportMode::Bare => value,
            }
        }
        ReportItem::Pair { label, first, second } => {
            let first = render_value(schema, snapshot, first.as_str());
            let second = render_value(schema, snapshot, second.as_str());
            match mode {
                ReportMode::Labeled => format!("- {label}[{first}]/[{second}]"),
                ReportMode::Bare => format!("{first}/{second}"),
            }
        }
        ReportItem::Blank { lines } => CRLF.repeat(*lines),
    }
}

fn render_value(schema: &FieldSchema, snapshot: &Snapshot, key: &str) -> String {
    schema
        .get(key)
        .map(|d| format_value(d, snapshot.value(key)))
        .unwrap_or_default()
}
