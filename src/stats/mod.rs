//! Aggregation engine: the two analytical queries served over the full
//! record collection.
//!
//! - [`grouping`] - grouped value lists for box-plot rendering
//! - [`correlation`] - pairwise-complete Pearson correlation matrix
//!
//! Both operations are read-only, in-memory computations over
//! already-materialized records; neither suspends or touches the store.

pub mod correlation;
pub mod grouping;

pub use correlation::{correlate, CorrelationResult};
pub use grouping::{group_metric, GroupQuery, GroupedDistribution};
