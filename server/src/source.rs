//! FILENAME: server/src/source.rs
//! Data sources and the once-per-request fallback decision.
//!
//! `AnalyseSource` is the contract of the external `ANALYSE` stored
//! procedure: four level tokens plus filters in, rows whose leading
//! columns are dimensions and trailing columns are the eight fixed
//! measures out. The in-memory engine is a drop-in implementation of
//! the same contract, which is what makes the fallback transparent to
//! callers.

use thiserror::Error;

use olap_engine::{run_flat_query, run_query, FactStore, FilterSet, LevelSelection, QueryOutput};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("upstream data source failed: {0}")]
    Upstream(String),

    #[error("no data source is available")]
    Unavailable,
}

/// A queryable data source honoring the stored-procedure column
/// contract.
pub trait AnalyseSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn query(
        &self,
        selection: &LevelSelection,
        filters: &FilterSet,
    ) -> Result<QueryOutput, SourceError>;

    fn flat_query(&self, field: &str, filters: &FilterSet) -> Result<QueryOutput, SourceError>;
}

/// The in-memory engine over the immutable fact store.
pub struct EngineSource {
    store: FactStore,
}

impl EngineSource {
    pub fn new(store: FactStore) -> Self {
        EngineSource { store }
    }

    pub fn store(&self) -> &FactStore {
        &self.store
    }
}

impl AnalyseSource for EngineSource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn query(
        &self,
        selection: &LevelSelection,
        filters: &FilterSet,
    ) -> Result<QueryOutput, SourceError> {
        Ok(run_query(&self.store, selection, filters))
    }

    fn flat_query(&self, field: &str, filters: &FilterSet) -> Result<QueryOutput, SourceError> {
        Ok(run_flat_query(&self.store, field, filters))
    }
}

/// Tries the configured primary source, then falls back to the
/// in-memory engine. The decision is made once per request and never
/// retried mid-computation; callers learn which source answered from
/// the returned name.
pub struct FallbackSource {
    primary: Option<Box<dyn AnalyseSource>>,
    fallback: EngineSource,
}

impl FallbackSource {
    pub fn new(primary: Option<Box<dyn AnalyseSource>>, fallback: EngineSource) -> Self {
        FallbackSource { primary, fallback }
    }

    /// A source with no external primary, answering purely from the
    /// in-memory engine.
    pub fn memory_only(store: FactStore) -> Self {
        FallbackSource {
            primary: None,
            fallback: EngineSource::new(store),
        }
    }

    pub fn store(&self) -> &FactStore {
        self.fallback.store()
    }

    pub fn query(
        &self,
        selection: &LevelSelection,
        filters: &FilterSet,
    ) -> Result<(QueryOutput, &'static str), SourceError> {
        if let Some(primary) = &self.primary {
            match primary.query(selection, filters) {
                Ok(output) => return Ok((output, primary.name())),
                Err(err) => log::warn!(
                    "source '{}' failed, falling back to in-memory engine: {}",
                    primary.name(),
                    err
                ),
            }
        }
        let output = self.fallback.query(selection, filters)?;
        Ok((output, self.fallback.name()))
    }

    pub fn flat_query(
        &self,
        field: &str,
        filters: &FilterSet,
    ) -> Result<(QueryOutput, &'static str), SourceError> {
        if let Some(primary) = &self.primary {
            match primary.flat_query(field, filters) {
                Ok(output) => return Ok((output, primary.name())),
                Err(err) => log::warn!(
                    "source '{}' failed, falling back to in-memory engine: {}",
                    primary.name(),
                    err
                ),
            }
        }
        let output = self.fallback.flat_query(field, filters)?;
        Ok((output, self.fallback.name()))
    }
}
