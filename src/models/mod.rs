//! Domain models for the perfio analytics pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`EmployeeRecord`] - one normalized employee performance observation
//! - [`NumericColumn`] - the numeric attributes available as metrics
//! - [`GroupColumn`] - the categorical attributes available for grouping
//! - [`DatasetMeta`] - the fixed column sets exposed to clients

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Employee Record
// =============================================================================

/// One row of normalized analytical data.
///
/// Every field except `id` is optional: a field is either a well-formed,
/// non-empty value of its declared type or `None` — never an empty string,
/// never a NaN sentinel. `id` is assigned by the store on insert and is
/// `None` on records the normalizer has just produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Store-assigned identity; `None` until the record is persisted.
    pub id: Option<i64>,
    pub name: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub performance_score: Option<f64>,
    pub projects_completed: Option<i64>,
    pub sales: Option<f64>,
    pub customer_satisfaction: Option<f64>,
    /// Calendar date, no time component. Serializes as ISO-8601 (`YYYY-MM-DD`).
    pub review_date: Option<NaiveDate>,
}

impl EmployeeRecord {
    /// An all-absent record (the normalizer's starting point).
    pub fn empty() -> Self {
        Self {
            id: None,
            name: None,
            department: None,
            role: None,
            location: None,
            performance_score: None,
            projects_completed: None,
            sales: None,
            customer_satisfaction: None,
            review_date: None,
        }
    }

    /// Read a numeric attribute as `f64`.
    ///
    /// `projects_completed` is widened from integer so the aggregator can
    /// treat all four metrics uniformly.
    pub fn numeric(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::PerformanceScore => self.performance_score,
            NumericColumn::ProjectsCompleted => self.projects_completed.map(|v| v as f64),
            NumericColumn::Sales => self.sales,
            NumericColumn::CustomerSatisfaction => self.customer_satisfaction,
        }
    }

    /// Read a grouping attribute as display text.
    pub fn group(&self, column: GroupColumn) -> Option<&str> {
        match column {
            GroupColumn::Department => self.department.as_deref(),
            GroupColumn::Role => self.role.as_deref(),
            GroupColumn::Location => self.location.as_deref(),
        }
    }
}

// =============================================================================
// Numeric Columns
// =============================================================================

/// The numeric attributes that can serve as a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    PerformanceScore,
    ProjectsCompleted,
    Sales,
    CustomerSatisfaction,
}

/// Natural column order, used for correlation labels.
pub const NUMERIC_COLUMNS: [NumericColumn; 4] = [
    NumericColumn::PerformanceScore,
    NumericColumn::ProjectsCompleted,
    NumericColumn::Sales,
    NumericColumn::CustomerSatisfaction,
];

impl NumericColumn {
    /// Parse a column from its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "performance_score" => Some(Self::PerformanceScore),
            "projects_completed" => Some(Self::ProjectsCompleted),
            "sales" => Some(Self::Sales),
            "customer_satisfaction" => Some(Self::CustomerSatisfaction),
            _ => None,
        }
    }

    /// Wire name of the column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerformanceScore => "performance_score",
            Self::ProjectsCompleted => "projects_completed",
            Self::Sales => "sales",
            Self::CustomerSatisfaction => "customer_satisfaction",
        }
    }
}

// =============================================================================
// Group Columns
// =============================================================================

/// The categorical attributes that can serve as a group-by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupColumn {
    Department,
    Role,
    Location,
}

pub const GROUP_COLUMNS: [GroupColumn; 3] = [
    GroupColumn::Department,
    GroupColumn::Role,
    GroupColumn::Location,
];

impl GroupColumn {
    /// Parse a column from its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "department" => Some(Self::Department),
            "role" => Some(Self::Role),
            "location" => Some(Self::Location),
            _ => None,
        }
    }

    /// Wire name of the column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Role => "role",
            Self::Location => "location",
        }
    }
}

// =============================================================================
// Dataset Metadata
// =============================================================================

/// The fixed column sets, exposed so clients can validate query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub numeric_columns: Vec<String>,
    pub group_columns: Vec<String>,
}

impl DatasetMeta {
    pub fn current() -> Self {
        Self {
            numeric_columns: NUMERIC_COLUMNS.iter().map(|c| c.as_str().to_string()).collect(),
            group_columns: GROUP_COLUMNS.iter().map(|c| c.as_str().to_string()).collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_column_roundtrip() {
        for col in NUMERIC_COLUMNS {
            assert_eq!(NumericColumn::from_name(col.as_str()), Some(col));
        }
        assert_eq!(NumericColumn::from_name("salary"), None);
    }

    #[test]
    fn test_group_column_roundtrip() {
        for col in GROUP_COLUMNS {
            assert_eq!(GroupColumn::from_name(col.as_str()), Some(col));
        }
        assert_eq!(GroupColumn::from_name("name"), None);
    }

    #[test]
    fn test_numeric_accessor_widens_integers() {
        let mut record = EmployeeRecord::empty();
        record.projects_completed = Some(7);
        assert_eq!(record.numeric(NumericColumn::ProjectsCompleted), Some(7.0));
        assert_eq!(record.numeric(NumericColumn::Sales), None);
    }

    #[test]
    fn test_record_date_serializes_iso() {
        let mut record = EmployeeRecord::empty();
        record.review_date = NaiveDate::from_ymd_opt(2024, 3, 15);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"2024-03-15\""));
    }

    #[test]
    fn test_meta_contents() {
        let meta = DatasetMeta::current();
        assert_eq!(meta.numeric_columns.len(), 4);
        assert_eq!(meta.numeric_columns[0], "performance_score");
        assert_eq!(meta.group_columns, vec!["department", "role", "location"]);
    }
}
