//! FILENAME: server/src/api.rs
//! Request and response types for the analyse API.
//!
//! Raw JSON filter scalars are converted into the engine's closed
//! `FilterValue` type here, once, at the boundary; nothing downstream
//! re-sniffs value types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use olap_engine::{AggregateRow, FilterSet, FilterValue, LevelSelection};

use crate::error::ApiError;

fn default_level() -> String {
    "ALL".to_string()
}

/// A 4-axis cube query. Body fields for POST, query parameters for
/// GET (GET carries no filters map).
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyseRequest {
    #[serde(default = "default_level")]
    pub temp: String,
    #[serde(default = "default_level")]
    pub clie: String,
    #[serde(default = "default_level")]
    pub emp: String,
    #[serde(default = "default_level")]
    pub prod: String,
    #[serde(default)]
    pub filters: HashMap<String, Value>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl AnalyseRequest {
    pub fn selection(&self) -> LevelSelection {
        LevelSelection {
            temp: self.temp.clone(),
            clie: self.clie.clone(),
            emp: self.emp.clone(),
            prod: self.prod.clone(),
        }
    }
}

/// A flat single-field grouping request for charting clients.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartRequest {
    pub field: String,
    #[serde(default)]
    pub filters: HashMap<String, Value>,
}

/// Converts boundary JSON scalars into engine filter values.
/// Strings parse to numbers when possible; anything that is not a
/// scalar is a malformed request.
pub fn filter_set_from_json(filters: &HashMap<String, Value>) -> Result<FilterSet, ApiError> {
    let mut set = FilterSet::new();
    for (name, value) in filters {
        let parsed = match value {
            Value::Number(n) => match n.as_f64() {
                Some(f) => FilterValue::Number(f),
                None => return Err(ApiError::InvalidFilter(name.clone())),
            },
            Value::String(s) => FilterValue::parse(s),
            Value::Bool(b) => FilterValue::Text(b.to_string()),
            _ => return Err(ApiError::InvalidFilter(name.clone())),
        };
        set.insert(name, parsed);
    }
    Ok(set)
}

/// Echo of the requested dimension levels and filters.
#[derive(Debug, Clone, Serialize)]
pub struct DimensionsEcho {
    pub temp: String,
    pub clie: String,
    pub emp: String,
    pub prod: String,
    pub filters: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseMetadata {
    /// Axes requested with a level other than "ALL".
    pub dimension_count: usize,
    /// Result rows produced by the query, before pagination.
    pub record_count: usize,
    /// Resolved grouping attribute names, in output column order.
    pub dimension_columns: Vec<String>,
    /// Which data source answered: "procedure" (authoritative) or
    /// "memory" (in-memory fallback).
    pub source: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AnalyseResponse {
    pub success: bool,
    pub data: Vec<AggregateRow>,
    pub dimensions: DimensionsEcho,
    pub metadata: ResponseMetadata,
    pub page: u32,
    pub page_size: u32,
    pub total_rows: usize,
    pub is_last_page: bool,
}

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub success: bool,
    pub data: Vec<AggregateRow>,
    pub field: String,
    pub metadata: ResponseMetadata,
}
