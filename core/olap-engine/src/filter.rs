//! FILENAME: core/olap-engine/src/filter.rs
//! Slice Filter - restricts the record set before aggregation.
//!
//! A filter is a set of (attribute, value) constraints. Each target
//! value is a closed tagged scalar (`Number` or `Text`) decided once
//! at the request boundary, never re-sniffed during matching.
//!
//! Matching is numeric-first: when both sides parse as f64 they are
//! compared for exact numeric equality, otherwise the comparison
//! falls back to trimmed, case-sensitive string equality. A
//! constraint on an attribute the record does not carry fails closed:
//! the engine never includes a row it cannot evaluate.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::store::{AttrValue, FactRecord};

/// A slicing target value, decided once at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
}

impl FilterValue {
    /// Parse-if-possible conversion for raw string scalars: numeric
    /// when the trimmed text is a float, text otherwise.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) => FilterValue::Number(n),
            Err(_) => FilterValue::Text(trimmed.to_string()),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            FilterValue::Number(n) => Some(*n),
            FilterValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

/// A set of slicing constraints, keyed by lower-cased attribute name.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    constraints: FxHashMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        FilterSet::default()
    }

    /// Adds a constraint. Attribute names are case-insensitive.
    pub fn insert(&mut self, attribute: &str, value: FilterValue) {
        self.constraints
            .insert(attribute.trim().to_ascii_lowercase(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.constraints.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Pure predicate: does the record satisfy every constraint?
    /// Short-circuits on the first failing constraint.
    pub fn matches(&self, record: &FactRecord) -> bool {
        for (attribute, target) in &self.constraints {
            match record.attribute(attribute) {
                Some(actual) => {
                    if !value_matches(&actual, target) {
                        return false;
                    }
                }
                // Fail closed: a row we cannot evaluate is excluded.
                None => return false,
            }
        }
        true
    }
}

fn value_matches(actual: &AttrValue<'_>, target: &FilterValue) -> bool {
    let actual_number = match actual {
        AttrValue::Number(n) => Some(*n),
        AttrValue::Text(s) => s.trim().parse::<f64>().ok(),
    };

    if let (Some(a), Some(t)) = (actual_number, target.as_number()) {
        return a == t;
    }

    let actual_text = match actual {
        AttrValue::Number(n) => n.to_string(),
        AttrValue::Text(s) => s.trim().to_string(),
    };
    match target {
        FilterValue::Number(n) => actual_text == n.to_string(),
        FilterValue::Text(s) => actual_text == s.trim(),
    }
}
