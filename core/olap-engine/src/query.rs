//! FILENAME: core/olap-engine/src/query.rs
//! Query Engine - orchestrates filter, hierarchy resolution and
//! aggregation into one ordered result set.
//!
//! Two call shapes share the aggregator:
//! - the 4-axis cube query (`run_query`), keyed by the concatenated
//!   hierarchy attributes of all four axes, and
//! - the flat single-field query (`run_flat_query`) used by simple
//!   charting clients, keyed by one named field and sorted by key.
//!
//! Both are pure synchronous functions of their inputs and the
//! immutable store.

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, AggregateRow};
use crate::filter::FilterSet;
use crate::hierarchy::{is_grouped, resolve, Axis};
use crate::store::{FactRecord, FactStore};

/// The per-axis level tokens of one cube query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSelection {
    pub temp: String,
    pub clie: String,
    pub emp: String,
    pub prod: String,
}

impl LevelSelection {
    /// The grouping attributes of all four axes, concatenated in
    /// fixed axis order (time, client, employee, product).
    pub fn grouping_attributes(&self) -> Vec<&'static str> {
        let mut attributes = Vec::new();
        attributes.extend_from_slice(resolve(Axis::Time, &self.temp));
        attributes.extend_from_slice(resolve(Axis::Client, &self.clie));
        attributes.extend_from_slice(resolve(Axis::Employee, &self.emp));
        attributes.extend_from_slice(resolve(Axis::Product, &self.prod));
        attributes
    }

    /// Number of axes grouped at all (token not "ALL"/empty).
    /// Independent of whether the token resolved to attributes.
    pub fn dimension_count(&self) -> usize {
        [&self.temp, &self.clie, &self.emp, &self.prod]
            .into_iter()
            .filter(|t| is_grouped(t))
            .count()
    }
}

/// The result of one query: ordered rows plus descriptive metadata
/// telling callers which output columns are dimensions.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutput {
    pub rows: Vec<AggregateRow>,
    pub dimension_columns: Vec<String>,
    pub dimension_count: usize,
}

/// Runs a 4-axis cube query: filter, resolve, aggregate.
pub fn run_query(store: &FactStore, selection: &LevelSelection, filters: &FilterSet) -> QueryOutput {
    let filtered = filtered_records(store, filters);
    let grouping = selection.grouping_attributes();
    let rows = aggregate(&filtered, &grouping);

    QueryOutput {
        rows,
        dimension_columns: grouping.iter().map(|a| a.to_string()).collect(),
        dimension_count: selection.dimension_count(),
    }
}

/// Runs a flat single-field query: same weighted aggregation, keyed
/// by one named field, rows sorted ascending by the key rendered as a
/// string.
///
/// A field outside the dimension schema matches no record (the
/// fail-closed policy again), so the result is empty rather than one
/// giant unkeyed group.
pub fn run_flat_query(store: &FactStore, field: &str, filters: &FilterSet) -> QueryOutput {
    let field = field.trim().to_ascii_lowercase();
    let filtered = filtered_records(store, filters);
    let mut rows = aggregate(&filtered, &[field.as_str()]);
    rows.sort_by(|a, b| a.dimensions[0].1.cmp(&b.dimensions[0].1));

    QueryOutput {
        rows,
        dimension_columns: vec![field],
        dimension_count: 1,
    }
}

fn filtered_records<'a>(store: &'a FactStore, filters: &FilterSet) -> Vec<&'a FactRecord> {
    store
        .records()
        .iter()
        .filter(|r| filters.matches(r))
        .collect()
}
