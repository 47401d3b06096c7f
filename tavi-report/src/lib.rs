//! Report serialization and field validation.
//!
//! Both halves are total: any well-formed snapshot serializes, and invalid
//! raw text renders as an empty value instead of failing.
//!
//! # Example
//!
//! ```
//! use tavi_report::{ReportMode, serialize};
//! use tavi_types::tavi_schema;
//!
//! let schema = tavi_schema();
//! let mut snapshot = schema.empty_snapshot();
//! snapshot.set("annulus_area", "450").unwrap();
//!
//! let body = serialize(&schema, &snapshot, ReportMode::Labeled);
//! assert!(body.contains("- annulus area[450.0]mm2"));
//! ```

mod format;
mod serializer;
mod validation;

pub use format::{fmt_decimal1, fmt_int, format_value, parse_number};
pub use serializer::{CRLF, ReportConfig, ReportMode, expected_line_count, serialize};
pub use validation::{FieldIssue, IssueKind, matches_numeric_shape, range_warning, validate};
