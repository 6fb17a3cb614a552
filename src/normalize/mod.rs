//! Row normalization: raw tabular cells into typed [`EmployeeRecord`]s.
//!
//! One raw row (arbitrary string/blank/missing cells) becomes one typed
//! record. Coercion is best-effort by design: a malformed cell becomes an
//! absent value and never fails the row or the upload. Validation beyond
//! type coercion (score ranges, negative sales, future dates) is left to
//! consumers.
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────┐     ┌──────────────────┐
//! │ RawRow           │────▶│  normalize  │────▶│ EmployeeRecord   │
//! │ (name → RawCell) │     │  (per-field │     │ (typed, nullable │
//! │                  │     │   coercion) │     │   fields)        │
//! └──────────────────┘     └─────────────┘     └──────────────────┘
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

use crate::models::EmployeeRecord;

// =============================================================================
// Raw Cells
// =============================================================================

/// A raw cell as it arrives from a row source.
///
/// Source rows carry heterogeneous cell types: text from a delimited file,
/// numbers from a typed row source, or an explicit missing marker. A
/// NaN-valued [`RawCell::Number`] counts as missing, mirroring the
/// float-NaN placeholder that tabular readers emit for blank numeric cells.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Text(String),
    Number(f64),
    Missing,
}

impl RawCell {
    /// Whether the cell carries no usable data.
    pub fn is_missing(&self) -> bool {
        match self {
            RawCell::Missing => true,
            RawCell::Number(n) => n.is_nan(),
            RawCell::Text(_) => false,
        }
    }

    /// Stringify the cell content, if any.
    fn to_text(&self) -> Option<String> {
        match self {
            RawCell::Missing => None,
            RawCell::Number(n) if n.is_nan() => None,
            RawCell::Number(n) => Some(format_number(*n)),
            RawCell::Text(s) => Some(s.clone()),
        }
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::Text(s.to_string())
    }
}

impl From<f64> for RawCell {
    fn from(n: f64) -> Self {
        RawCell::Number(n)
    }
}

/// A raw row: trimmed column name to raw cell. A missing key is
/// equivalent to a [`RawCell::Missing`] cell.
pub type RawRow = HashMap<String, RawCell>;

/// Integral numbers stringify without a trailing `.0` so that integer
/// coercion of a numeric cell round-trips cleanly.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && in_i64_range(n) {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// `-2^63` is exact in f64; `2^63` is the first value past `i64::MAX`.
/// An `as` cast outside this range would saturate silently.
fn in_i64_range(n: f64) -> bool {
    n >= i64::MIN as f64 && n < -(i64::MIN as f64)
}

// =============================================================================
// Field Coercions
// =============================================================================

/// Coerce a cell to trimmed, non-empty text.
pub fn safe_str(cell: &RawCell) -> Option<String> {
    let s = cell.to_text()?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Coerce a cell to a decimal number.
///
/// Thousands separators (`,`) are stripped before parsing. Anything that
/// still fails to parse becomes absent rather than an error.
pub fn safe_float(cell: &RawCell) -> Option<f64> {
    let s = cell.to_text()?;
    let cleaned = s.replace(',', "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Coerce a cell to an integer via the decimal pipeline.
///
/// `"12.0"` parses to 12; a non-integral decimal like `"7.9"` truncates
/// to 7 rather than being rejected. A magnitude beyond the `i64` range
/// becomes absent like any other bad cell.
pub fn safe_int(cell: &RawCell) -> Option<i64> {
    safe_float(cell)
        .map(f64::trunc)
        .filter(|t| in_i64_range(*t))
        .map(|t| t as i64)
}

/// Formats accepted by [`safe_date`], tried in order. ISO first, then the
/// common human forms. Day-first forms come after month-first, matching
/// the permissive parser the source data was authored against.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%B %d, %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Coerce a cell to a calendar date, best effort.
///
/// Unparsable text yields an absent date, silently: one malformed date
/// must not fail the whole row or the whole upload.
pub fn safe_date(cell: &RawCell) -> Option<NaiveDate> {
    let text = safe_str(cell)?;

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&text, fmt) {
            return Some(date);
        }
    }
    // Datetime text keeps only the date component.
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&text, fmt) {
            return Some(dt.date());
        }
    }

    None
}

// =============================================================================
// Normalization
// =============================================================================

/// Convert one raw row into a typed record.
///
/// Pure function of its input: field lookups are by exact expected key,
/// a missing key yields an absent field, and no cell content can make
/// this fail. The record's `id` is left unset for the store to assign.
pub fn normalize(row: &RawRow) -> EmployeeRecord {
    let cell = |key: &str| row.get(key).cloned().unwrap_or(RawCell::Missing);

    EmployeeRecord {
        id: None,
        name: safe_str(&cell("name")),
        department: safe_str(&cell("department")),
        role: safe_str(&cell("role")),
        location: safe_str(&cell("location")),
        performance_score: safe_float(&cell("performance_score")),
        projects_completed: safe_int(&cell("projects_completed")),
        sales: safe_float(&cell("sales")),
        customer_satisfaction: safe_float(&cell("customer_satisfaction")),
        review_date: safe_date(&cell("review_date")),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(pairs: &[(&str, RawCell)]) -> RawRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_safe_str_trims_and_drops_empty() {
        assert_eq!(safe_str(&"  Alice  ".into()), Some("Alice".to_string()));
        assert_eq!(safe_str(&"".into()), None);
        assert_eq!(safe_str(&"   ".into()), None);
        assert_eq!(safe_str(&RawCell::Missing), None);
    }

    #[test]
    fn test_safe_str_nan_marker_is_absent() {
        assert_eq!(safe_str(&RawCell::Number(f64::NAN)), None);
    }

    #[test]
    fn test_safe_str_stringifies_numbers() {
        assert_eq!(safe_str(&RawCell::Number(42.0)), Some("42".to_string()));
        assert_eq!(safe_str(&RawCell::Number(4.25)), Some("4.25".to_string()));
    }

    #[test]
    fn test_safe_float_strips_thousands_separators() {
        assert_eq!(safe_float(&"12,500.5".into()), Some(12500.5));
        assert_eq!(safe_float(&"1,234,567".into()), Some(1234567.0));
    }

    #[test]
    fn test_safe_float_bad_input_is_absent() {
        assert_eq!(safe_float(&"abc".into()), None);
        assert_eq!(safe_float(&"12.3.4".into()), None);
        assert_eq!(safe_float(&"  ".into()), None);
        assert_eq!(safe_float(&RawCell::Missing), None);
        assert_eq!(safe_float(&RawCell::Number(f64::NAN)), None);
    }

    #[test]
    fn test_safe_float_accepts_plain_numbers() {
        assert_eq!(safe_float(&"4.5".into()), Some(4.5));
        assert_eq!(safe_float(&" -12 ".into()), Some(-12.0));
        assert_eq!(safe_float(&RawCell::Number(3.25)), Some(3.25));
    }

    #[test]
    fn test_safe_int_truncates() {
        assert_eq!(safe_int(&"7.9".into()), Some(7));
        assert_eq!(safe_int(&"12.0".into()), Some(12));
        assert_eq!(safe_int(&"-3.7".into()), Some(-3));
        assert_eq!(safe_int(&"1,200".into()), Some(1200));
        assert_eq!(safe_int(&"seven".into()), None);
    }

    #[test]
    fn test_safe_int_out_of_range_is_absent() {
        // Past i64 in either direction: absent, not a saturated cast.
        assert_eq!(safe_int(&"9.3e18".into()), None);
        assert_eq!(safe_int(&"-9.3e18".into()), None);
        assert_eq!(safe_int(&RawCell::Number(1.0e19)), None);
        // Still well inside the range.
        assert_eq!(safe_int(&"4e18".into()), Some(4_000_000_000_000_000_000));
    }

    #[test]
    fn test_huge_numeric_cell_stringifies_as_float() {
        // 9.3e18 is integral but outside i64; stringification must not
        // saturate it to i64::MAX.
        assert_eq!(
            safe_str(&RawCell::Number(9.3e18)),
            Some("9300000000000000000".to_string())
        );
    }

    #[test]
    fn test_safe_date_iso() {
        assert_eq!(
            safe_date(&"2024-03-15".into()),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn test_safe_date_human_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(safe_date(&"03/15/2024".into()), expected);
        assert_eq!(safe_date(&"2024/03/15".into()), expected);
        assert_eq!(safe_date(&"March 15, 2024".into()), expected);
        assert_eq!(safe_date(&"15 March 2024".into()), expected);
    }

    #[test]
    fn test_safe_date_datetime_keeps_date() {
        assert_eq!(
            safe_date(&"2024-03-15 09:30:00".into()),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn test_safe_date_garbage_is_absent() {
        assert_eq!(safe_date(&"not a date".into()), None);
        assert_eq!(safe_date(&"".into()), None);
        assert_eq!(safe_date(&RawCell::Missing), None);
    }

    #[test]
    fn test_normalize_full_row() {
        let input = row(&[
            ("name", " Alice ".into()),
            ("department", "Engineering".into()),
            ("role", "Manager".into()),
            ("location", "Berlin".into()),
            ("performance_score", "4.5".into()),
            ("projects_completed", "12.0".into()),
            ("sales", "12,500.5".into()),
            ("customer_satisfaction", "3.8".into()),
            ("review_date", "2024-03-15".into()),
        ]);

        let record = normalize(&input);
        assert_eq!(record.id, None);
        assert_eq!(record.name.as_deref(), Some("Alice"));
        assert_eq!(record.department.as_deref(), Some("Engineering"));
        assert_eq!(record.performance_score, Some(4.5));
        assert_eq!(record.projects_completed, Some(12));
        assert_eq!(record.sales, Some(12500.5));
        assert_eq!(record.customer_satisfaction, Some(3.8));
        assert_eq!(record.review_date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_normalize_missing_keys_are_absent() {
        let record = normalize(&row(&[("name", "Bob".into())]));
        assert_eq!(record.name.as_deref(), Some("Bob"));
        assert_eq!(record.department, None);
        assert_eq!(record.sales, None);
        assert_eq!(record.review_date, None);
    }

    #[test]
    fn test_normalize_bad_cells_never_fail_the_row() {
        let record = normalize(&row(&[
            ("name", "Carol".into()),
            ("performance_score", "excellent".into()),
            ("projects_completed", RawCell::Number(f64::NAN)),
            ("review_date", "someday".into()),
        ]));
        assert_eq!(record.name.as_deref(), Some("Carol"));
        assert_eq!(record.performance_score, None);
        assert_eq!(record.projects_completed, None);
        assert_eq!(record.review_date, None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = row(&[
            ("name", "Dana".into()),
            ("sales", "900".into()),
            ("review_date", "2023-12-01".into()),
        ]);
        assert_eq!(normalize(&input), normalize(&input));
    }

    #[test]
    fn test_no_range_validation() {
        // Out-of-range scores and negative sales pass through untouched.
        let record = normalize(&row(&[
            ("performance_score", "999.9".into()),
            ("sales", "-500".into()),
        ]));
        assert_eq!(record.performance_score, Some(999.9));
        assert_eq!(record.sales, Some(-500.0));
    }
}
