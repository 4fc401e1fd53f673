use crate::error::StorageError;
use rdf_weave_model::{
    GraphNameRef, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, SubjectRef, TermRef,
};
use std::fmt::Debug;

/// An iterator over the quads that match a pattern.
pub type QuadIter<'a> = Box<dyn Iterator<Item = Result<Quad, StorageError>> + 'a>;

/// A read-only view of an RDF dataset that the query engine evaluates against.
///
/// # Consistency
///
/// A single query evaluation issues many lookups against the same dataset. Implementations must
/// ensure that all lookups observe the same state, usually by handing out an immutable snapshot.
pub trait QuadDataset: Debug + Send + Sync {
    /// Returns the quads that match the given pattern. A `None` position matches anything.
    ///
    /// If `graph_name` is `None`, quads from all graphs (including the default graph) are
    /// returned. Looking up a graph that does not exist yields no quads.
    fn quads_for_pattern<'a>(
        &'a self,
        graph_name: Option<GraphNameRef<'a>>,
        subject: Option<SubjectRef<'a>>,
        predicate: Option<NamedNodeRef<'a>>,
        object: Option<TermRef<'a>>,
    ) -> QuadIter<'a>;

    /// Returns the named graphs in the order they were created.
    fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError>;

    /// Returns whether `graph_name` is a named graph in the dataset.
    fn contains_named_graph(
        &self,
        graph_name: NamedOrBlankNodeRef<'_>,
    ) -> Result<bool, StorageError>;
}
