//! FILENAME: server/src/lib.rs
//! HTTP query surface for the delay-analysis OLAP engine.
//!
//! The server owns everything the engine treats as external: the
//! request/response transport, the fact-table generation, the data
//! source fallback decision, configuration and logging. The engine
//! crate (`olap-engine`) stays a pure library underneath.

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod http;
pub mod logging;
pub mod source;
