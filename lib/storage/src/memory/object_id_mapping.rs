use crate::memory::object_id::{EncodedQuad, ObjectId};
use rdf_weave_common::error::StorageError;
use rdf_weave_model::{GraphNameRef, QuadRef, Term, TermRef};
use rustc_hash::FxHashMap;

/// Interns terms into dense [ObjectId]s.
///
/// Ids are handed out in insertion order starting at 1. Id 0 is reserved for the default graph.
/// Terms are never removed from the mapping, so ids stay stable for the lifetime of the storage.
#[derive(Debug, Clone, Default)]
pub(crate) struct ObjectIdMapping {
    term2id: FxHashMap<Term, ObjectId>,
    id2term: Vec<Term>,
}

impl ObjectIdMapping {
    /// Returns the id of `term`, creating one if the term is new.
    pub(crate) fn encode(&mut self, term: TermRef<'_>) -> ObjectId {
        if let Some(id) = self.term2id.get(&term.into_owned()) {
            return *id;
        }

        let id = ObjectId(
            u32::try_from(self.id2term.len() + 1).unwrap_or(u32::MAX),
        );
        self.id2term.push(term.into_owned());
        self.term2id.insert(term.into_owned(), id);
        id
    }

    /// Returns the id of `term` without creating a new one.
    pub(crate) fn try_get(&self, term: TermRef<'_>) -> Option<ObjectId> {
        self.term2id.get(&term.into_owned()).copied()
    }

    pub(crate) fn encode_graph_name(&mut self, graph_name: GraphNameRef<'_>) -> ObjectId {
        match graph_name {
            GraphNameRef::NamedNode(node) => self.encode(node.into()),
            GraphNameRef::BlankNode(node) => self.encode(node.into()),
            GraphNameRef::DefaultGraph => ObjectId::DEFAULT_GRAPH,
        }
    }

    pub(crate) fn try_get_graph_name(&self, graph_name: GraphNameRef<'_>) -> Option<ObjectId> {
        match graph_name {
            GraphNameRef::NamedNode(node) => self.try_get(node.into()),
            GraphNameRef::BlankNode(node) => self.try_get(node.into()),
            GraphNameRef::DefaultGraph => Some(ObjectId::DEFAULT_GRAPH),
        }
    }

    pub(crate) fn encode_quad(&mut self, quad: QuadRef<'_>) -> EncodedQuad {
        EncodedQuad {
            graph_name: self.encode_graph_name(quad.graph_name),
            subject: self.encode(quad.subject.into()),
            predicate: self.encode(quad.predicate.into()),
            object: self.encode(quad.object),
        }
    }

    /// Encodes the quad only if all of its terms are already known.
    pub(crate) fn try_get_quad(&self, quad: QuadRef<'_>) -> Option<EncodedQuad> {
        Some(EncodedQuad {
            graph_name: self.try_get_graph_name(quad.graph_name)?,
            subject: self.try_get(quad.subject.into())?,
            predicate: self.try_get(quad.predicate.into())?,
            object: self.try_get(quad.object)?,
        })
    }

    /// Returns the term for `id`.
    pub(crate) fn decode(&self, id: ObjectId) -> Result<&Term, StorageError> {
        let index = usize::try_from(id.0)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .ok_or(StorageError::UnknownObjectId(id.0))?;
        self.id2term
            .get(index)
            .ok_or(StorageError::UnknownObjectId(id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_weave_model::{Literal, NamedNode};

    #[test]
    fn encoding_the_same_term_twice_yields_the_same_id() {
        let mut mapping = ObjectIdMapping::default();
        let term = Term::from(NamedNode::new_unchecked("http://example.com/a"));
        let first = mapping.encode(term.as_ref());
        let second = mapping.encode(term.as_ref());
        assert_eq!(first, second);
        assert_eq!(mapping.decode(first).unwrap(), &term);
    }

    #[test]
    fn default_graph_is_not_a_term() {
        let mut mapping = ObjectIdMapping::default();
        mapping.encode(Literal::from(1).as_ref().into());
        assert_eq!(
            mapping.encode_graph_name(GraphNameRef::DefaultGraph),
            ObjectId::DEFAULT_GRAPH
        );
        assert!(mapping.decode(ObjectId::DEFAULT_GRAPH).is_err());
    }
}
