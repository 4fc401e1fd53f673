use crate::sparql::error::QueryEvaluationError;
use crate::sparql::{evaluate_query, Query, QueryExplanation, QueryOptions, QueryResults};
use rdf_weave_common::QuadStorage;
use std::sync::Arc;
use tracing::debug;

/// Represents an instance of an RDF Weave engine.
///
/// An instance consists of a reference to a storage backend that holds quads. The storage is
/// used for updates via the store API and hands out the snapshots that queries run against.
#[derive(Clone)]
pub struct WeaveContext {
    /// The storage that backs this instance.
    storage: Arc<dyn QuadStorage>,
}

impl WeaveContext {
    /// Creates a new [WeaveContext] with the given `storage`.
    pub fn new(storage: Arc<dyn QuadStorage>) -> Self {
        Self { storage }
    }

    /// Provides access to the [QuadStorage] of this instance for writing operations.
    pub fn storage(&self) -> &dyn QuadStorage {
        self.storage.as_ref()
    }

    /// Evaluates a SPARQL [Query] over the instance.
    ///
    /// The query sees the state of the storage at the time of the call. The evaluation itself
    /// runs on the blocking thread pool of tokio.
    pub async fn execute_query(
        &self,
        query: &Query,
        options: QueryOptions,
    ) -> Result<(QueryResults, QueryExplanation), QueryEvaluationError> {
        let snapshot = self.storage.snapshot()?;
        let query = query.clone();
        tokio::task::spawn_blocking(move || evaluate_query(snapshot, &query, &options))
            .await
            .map_err(|error| {
                debug!(%error, "Query evaluation task did not complete");
                QueryEvaluationError::InternalError(error.to_string())
            })?
    }
}
