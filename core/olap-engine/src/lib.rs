//! FILENAME: core/olap-engine/src/lib.rs
//! OLAP aggregation engine for the delay-analysis service.
//!
//! This crate is the in-memory replacement for the external `ANALYSE`
//! stored procedure: it takes a flat fact table, a hierarchical
//! dimension-level selection per axis and an optional set of slicing
//! filters, and produces the same result-row shape the procedure
//! returns (dimension columns first, then the eight fixed measures).
//!
//! Layers:
//! - `store`: The immutable fact table (WHAT we aggregate)
//! - `hierarchy`: Level-token resolution per axis (HOW records group)
//! - `filter`: Slice predicates over records (WHICH records count)
//! - `aggregate`: Composite-key grouping and weighted measures
//! - `query`: Orchestration of the above into one result set

pub mod store;
pub mod hierarchy;
pub mod filter;
pub mod aggregate;
pub mod query;

pub use store::{AttrValue, FactRecord, FactStore};
pub use hierarchy::{is_grouped, resolve, Axis};
pub use filter::{FilterSet, FilterValue};
pub use aggregate::{aggregate, round2, AggregateRow, MeasureSet, MEASURE_COLUMNS};
pub use query::{run_flat_query, run_query, LevelSelection, QueryOutput};
