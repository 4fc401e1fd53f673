use crate::error::StorageError;
use crate::QuadDataset;
use async_trait::async_trait;
use rdf_weave_model::{GraphNameRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef};
use std::sync::Arc;

/// A mutable quad storage that hands out consistent, read-only snapshots for query evaluation.
#[async_trait]
#[allow(clippy::len_without_is_empty, reason = "is_empty is provided by the store")]
pub trait QuadStorage: Send + Sync {
    /// Returns an immutable snapshot of the current state. Later writes are not visible to it.
    fn snapshot(&self) -> Result<Arc<dyn QuadDataset>, StorageError>;

    /// Inserts `quads` in a single write. Returns how many of them were not stored before.
    async fn extend(&self, quads: Vec<Quad>) -> Result<usize, StorageError>;

    /// Registers a named graph, even if it holds no quads. Returns `false` if it already existed.
    async fn insert_named_graph<'a>(
        &self,
        graph_name: NamedOrBlankNodeRef<'a>,
    ) -> Result<bool, StorageError>;

    /// Returns every named graph, including empty ones.
    async fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError>;

    /// Checks whether `graph_name` is a registered named graph.
    async fn contains_named_graph<'a>(
        &self,
        graph_name: NamedOrBlankNodeRef<'a>,
    ) -> Result<bool, StorageError>;

    /// Returns whether the storage contains the given quad.
    async fn contains(&self, quad: QuadRef<'_>) -> Result<bool, StorageError>;

    /// Returns the number of quads in the storage.
    async fn len(&self) -> Result<usize, StorageError>;

    /// Removes every quad and every named graph.
    async fn clear(&self) -> Result<(), StorageError>;

    /// Removes the quads of a graph. A named graph stays registered.
    async fn clear_graph<'a>(&self, graph_name: GraphNameRef<'a>) -> Result<(), StorageError>;

    /// Removes a named graph together with its quads.
    async fn remove_named_graph(
        &self,
        graph_name: NamedOrBlankNodeRef<'_>,
    ) -> Result<bool, StorageError>;

    /// Removes a single quad. Returns `false` if it was not stored.
    async fn remove(&self, quad: QuadRef<'_>) -> Result<bool, StorageError>;
}
