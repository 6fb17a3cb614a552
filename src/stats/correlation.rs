//! Pairwise-complete Pearson correlation over the numeric attributes.
//!
//! Always operates over the four numeric columns in natural order. Each
//! matrix cell is computed from only the records where both compared
//! fields are present, independently per pair — a partial row still
//! contributes to every pair it completes.
//!
//! The wire format has no NaN literal, so undefined coefficients
//! (zero-variance column, fewer than two complete pairs) are `None`,
//! which serializes as JSON `null`.

use serde::Serialize;

use crate::models::{EmployeeRecord, NumericColumn, NUMERIC_COLUMNS};

/// Symmetric correlation matrix with positionally aligned labels.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationResult {
    pub labels: Vec<String>,
    pub matrix: Vec<Vec<Option<f64>>>,
}

/// Compute the correlation matrix over the four numeric columns.
///
/// Records with all four fields absent are dropped first; if nothing
/// remains the result is empty labels and an empty matrix.
pub fn correlate(records: &[EmployeeRecord]) -> CorrelationResult {
    let retained: Vec<&EmployeeRecord> = records
        .iter()
        .filter(|r| NUMERIC_COLUMNS.iter().any(|&c| r.numeric(c).is_some()))
        .collect();

    if retained.is_empty() {
        return CorrelationResult {
            labels: Vec::new(),
            matrix: Vec::new(),
        };
    }

    let n = NUMERIC_COLUMNS.len();
    let mut matrix = vec![vec![None; n]; n];

    for i in 0..n {
        for j in i..n {
            let cell = if i == j {
                diagonal(&retained, NUMERIC_COLUMNS[i])
            } else {
                pearson(&retained, NUMERIC_COLUMNS[i], NUMERIC_COLUMNS[j])
            };
            matrix[i][j] = cell;
            matrix[j][i] = cell;
        }
    }

    CorrelationResult {
        labels: NUMERIC_COLUMNS.iter().map(|c| c.as_str().to_string()).collect(),
        matrix,
    }
}

/// A column correlates perfectly with itself when it has variance;
/// a constant (or near-empty) column has no defined self-correlation.
fn diagonal(records: &[&EmployeeRecord], column: NumericColumn) -> Option<f64> {
    let values: Vec<f64> = records.iter().filter_map(|r| r.numeric(column)).collect();
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let has_variance = values.iter().any(|v| (v - mean).abs() > 0.0);
    if has_variance {
        Some(1.0)
    } else {
        None
    }
}

/// Sample Pearson coefficient over the pairwise-complete subset.
fn pearson(records: &[&EmployeeRecord], a: NumericColumn, b: NumericColumn) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| match (r.numeric(a), r.numeric(b)) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }

    Some(cov / denom)
}
