use crate::memory::object_id::{EncodedQuad, EncodedQuadPattern, ObjectId};
use crate::memory::storage::MemoryContent;
use rdf_weave_common::error::StorageError;
use rdf_weave_common::{QuadDataset, QuadIter};
use rdf_weave_model::{
    GraphName, GraphNameRef, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef,
    Quad, QuadRef, Subject, SubjectRef, Term, TermRef,
};
use std::sync::Arc;

/// An immutable snapshot of a [MemoryQuadStorage](crate::MemoryQuadStorage).
#[derive(Debug, Clone)]
pub struct MemoryStorageReader {
    content: Arc<MemoryContent>,
}

impl MemoryStorageReader {
    pub(crate) fn new(content: Arc<MemoryContent>) -> Self {
        Self { content }
    }

    /// Returns the number of quads in the snapshot.
    pub fn len(&self) -> usize {
        self.content.indexes.len()
    }

    /// Returns true if the snapshot contains no quads.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether the snapshot contains the given quad.
    pub fn contains(&self, quad: QuadRef<'_>) -> bool {
        self.content
            .object_ids
            .try_get_quad(quad)
            .is_some_and(|encoded| self.content.indexes.contains(encoded))
    }

    fn decode_quad(&self, quad: EncodedQuad) -> Result<Quad, StorageError> {
        let object_ids = &self.content.object_ids;
        let graph_name = if quad.graph_name == ObjectId::DEFAULT_GRAPH {
            GraphName::DefaultGraph
        } else {
            match object_ids.decode(quad.graph_name)? {
                Term::NamedNode(node) => GraphName::NamedNode(node.clone()),
                Term::BlankNode(node) => GraphName::BlankNode(node.clone()),
                _ => return Err(StorageError::UnknownObjectId(quad.graph_name.0)),
            }
        };
        let subject = match object_ids.decode(quad.subject)? {
            Term::NamedNode(node) => Subject::NamedNode(node.clone()),
            Term::BlankNode(node) => Subject::BlankNode(node.clone()),
            _ => return Err(StorageError::UnknownObjectId(quad.subject.0)),
        };
        let predicate = match object_ids.decode(quad.predicate)? {
            Term::NamedNode(node) => node.clone(),
            _ => return Err(StorageError::UnknownObjectId(quad.predicate.0)),
        };
        let object = object_ids.decode(quad.object)?.clone();
        Ok(Quad::new(subject, predicate, object, graph_name))
    }
}

impl QuadDataset for MemoryStorageReader {
    fn quads_for_pattern<'a>(
        &'a self,
        graph_name: Option<GraphNameRef<'a>>,
        subject: Option<SubjectRef<'a>>,
        predicate: Option<NamedNodeRef<'a>>,
        object: Option<TermRef<'a>>,
    ) -> QuadIter<'a> {
        let object_ids = &self.content.object_ids;

        // A bound term that was never interned cannot match anything.
        let graph_name = match graph_name.map(|g| object_ids.try_get_graph_name(g)) {
            Some(None) => return Box::new(std::iter::empty()),
            Some(Some(id)) => Some(id),
            None => None,
        };
        let subject = match subject.map(|s| object_ids.try_get(s.into())) {
            Some(None) => return Box::new(std::iter::empty()),
            other => other.flatten(),
        };
        let predicate = match predicate.map(|p| object_ids.try_get(p.into())) {
            Some(None) => return Box::new(std::iter::empty()),
            other => other.flatten(),
        };
        let object = match object.map(|o| object_ids.try_get(o)) {
            Some(None) => return Box::new(std::iter::empty()),
            other => other.flatten(),
        };

        let pattern = EncodedQuadPattern {
            graph_name,
            subject,
            predicate,
            object,
        };
        Box::new(
            self.content
                .indexes
                .scan(pattern)
                .map(move |quad| self.decode_quad(quad)),
        )
    }

    fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError> {
        self.content
            .indexes
            .named_graphs()
            .iter()
            .map(|id| match self.content.object_ids.decode(*id)? {
                Term::NamedNode(node) => Ok(NamedOrBlankNode::NamedNode(node.clone())),
                Term::BlankNode(node) => Ok(NamedOrBlankNode::BlankNode(node.clone())),
                _ => Err(StorageError::UnknownObjectId(id.0)),
            })
            .collect()
    }

    fn contains_named_graph(
        &self,
        graph_name: NamedOrBlankNodeRef<'_>,
    ) -> Result<bool, StorageError> {
        Ok(self
            .content
            .object_ids
            .try_get(graph_name.into())
            .is_some_and(|id| self.content.indexes.contains_named_graph(id)))
    }
}
