//! Grouped distribution statistics for box-plot rendering.
//!
//! One metric column grouped by one categorical column:
//!
//! ```text
//! Records (store order)             →  Grouped output
//! ┌───────────────────────────┐        ┌──────────────────────────┐
//! │ dept: A, score: 1         │        │ groups: ["A", "B"]       │
//! │ dept: B, score: 2         │   →    │ values: [[1, 3], [2]]    │
//! │ dept: A, score: 3         │        └──────────────────────────┘
//! │ dept: ∅, score: 4  (drop) │
//! └───────────────────────────┘
//! ```
//!
//! Group keys appear in first-appearance order among the retained
//! records, and values within a group keep record order.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::{QueryError, QueryResult};
use crate::models::{EmployeeRecord, GroupColumn, NumericColumn};

/// A validated metric/group-by pair.
///
/// Parsing the wire names happens here, before any aggregation: an
/// unknown name is a client error, not an empty result.
#[derive(Debug, Clone, Copy)]
pub struct GroupQuery {
    pub metric: NumericColumn,
    pub group_by: GroupColumn,
}

impl GroupQuery {
    pub fn parse(metric: &str, group_by: &str) -> QueryResult<Self> {
        let metric = NumericColumn::from_name(metric)
            .ok_or_else(|| QueryError::UnknownMetric(metric.to_string()))?;
        let group_by = GroupColumn::from_name(group_by)
            .ok_or_else(|| QueryError::UnknownGroupBy(group_by.to_string()))?;
        Ok(Self { metric, group_by })
    }
}

/// Grouped value lists, positionally aligned: `values[i]` belongs to
/// `groups[i]`.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedDistribution {
    pub groups: Vec<String>,
    pub values: Vec<Vec<f64>>,
    pub metric: String,
    pub group_by: String,
}

/// Compute grouped value lists for a metric/group-by pair.
///
/// Records where either the metric or the group-by field is absent are
/// excluded entirely (pairwise-complete on exactly those two fields).
/// No surviving records is a successful empty result.
pub fn group_metric(records: &[EmployeeRecord], query: GroupQuery) -> GroupedDistribution {
    let mut groups: Vec<String> = Vec::new();
    let mut values: Vec<Vec<f64>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let (key, value) = match (record.group(query.group_by), record.numeric(query.metric)) {
            (Some(key), Some(value)) => (key, value),
            _ => continue,
        };

        match index.get(key) {
            Some(&i) => values[i].push(value),
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(key.to_string());
                values.push(vec![value]);
            }
        }
    }

    GroupedDistribution {
        groups,
        values,
        metric: query.metric.as_str().to_string(),
        group_by: query.group_by.as_str().to_string(),
    }
}
