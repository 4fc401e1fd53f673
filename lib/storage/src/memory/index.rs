use crate::memory::object_id::{EncodedQuad, EncodedQuadPattern, ObjectId};
use std::collections::BTreeSet;

type IndexKey = [ObjectId; 4];

/// The permutation used to answer a quad pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Permutation {
    Gspo,
    Gpos,
    Gosp,
}

/// Three ordered permutations of all quads. Each permutation starts with the graph name, so every
/// lookup is scoped to a single graph.
#[derive(Debug, Clone, Default)]
pub(crate) struct QuadIndexes {
    gspo: BTreeSet<IndexKey>,
    gpos: BTreeSet<IndexKey>,
    gosp: BTreeSet<IndexKey>,
    /// Named graphs in creation order. A named graph may exist without any quads.
    named_graphs: Vec<ObjectId>,
}

impl QuadIndexes {
    pub(crate) fn len(&self) -> usize {
        self.gspo.len()
    }

    pub(crate) fn insert(&mut self, quad: EncodedQuad) -> bool {
        let EncodedQuad {
            graph_name: g,
            subject: s,
            predicate: p,
            object: o,
        } = quad;
        if !self.gspo.insert([g, s, p, o]) {
            return false;
        }
        self.gpos.insert([g, p, o, s]);
        self.gosp.insert([g, o, s, p]);
        if g != ObjectId::DEFAULT_GRAPH {
            self.insert_named_graph(g);
        }
        true
    }

    pub(crate) fn remove(&mut self, quad: EncodedQuad) -> bool {
        let EncodedQuad {
            graph_name: g,
            subject: s,
            predicate: p,
            object: o,
        } = quad;
        if !self.gspo.remove(&[g, s, p, o]) {
            return false;
        }
        self.gpos.remove(&[g, p, o, s]);
        self.gosp.remove(&[g, o, s, p]);
        true
    }

    pub(crate) fn contains(&self, quad: EncodedQuad) -> bool {
        self.gspo.contains(&[
            quad.graph_name,
            quad.subject,
            quad.predicate,
            quad.object,
        ])
    }

    pub(crate) fn insert_named_graph(&mut self, graph_name: ObjectId) -> bool {
        if self.named_graphs.contains(&graph_name) {
            return false;
        }
        self.named_graphs.push(graph_name);
        true
    }

    pub(crate) fn remove_named_graph(&mut self, graph_name: ObjectId) -> bool {
        self.clear_graph(graph_name);
        let before = self.named_graphs.len();
        self.named_graphs.retain(|g| *g != graph_name);
        before != self.named_graphs.len()
    }

    pub(crate) fn contains_named_graph(&self, graph_name: ObjectId) -> bool {
        self.named_graphs.contains(&graph_name)
    }

    pub(crate) fn named_graphs(&self) -> &[ObjectId] {
        &self.named_graphs
    }

    pub(crate) fn clear_graph(&mut self, graph_name: ObjectId) {
        let quads = self
            .scan(EncodedQuadPattern {
                graph_name: Some(graph_name),
                ..EncodedQuadPattern::default()
            })
            .collect::<Vec<_>>();
        for quad in quads {
            self.remove(quad);
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns all quads matching `pattern`. The pattern must be scoped to a graph; unscoped
    /// patterns are answered by scanning every graph.
    pub(crate) fn scan(
        &self,
        pattern: EncodedQuadPattern,
    ) -> Box<dyn Iterator<Item = EncodedQuad> + '_> {
        let Some(graph_name) = pattern.graph_name else {
            let graphs = std::iter::once(ObjectId::DEFAULT_GRAPH)
                .chain(self.named_graphs.iter().copied())
                .collect::<Vec<_>>();
            return Box::new(graphs.into_iter().flat_map(move |graph_name| {
                self.scan(EncodedQuadPattern {
                    graph_name: Some(graph_name),
                    ..pattern
                })
            }));
        };

        let (permutation, prefix) = match (pattern.subject, pattern.predicate, pattern.object) {
            (Some(s), Some(p), _) => (Permutation::Gspo, vec![graph_name, s, p]),
            (Some(s), None, Some(o)) => (Permutation::Gosp, vec![graph_name, o, s]),
            (Some(s), None, None) => (Permutation::Gspo, vec![graph_name, s]),
            (None, Some(p), Some(o)) => (Permutation::Gpos, vec![graph_name, p, o]),
            (None, Some(p), None) => (Permutation::Gpos, vec![graph_name, p]),
            (None, None, Some(o)) => (Permutation::Gosp, vec![graph_name, o]),
            (None, None, None) => (Permutation::Gspo, vec![graph_name]),
        };

        let index = match permutation {
            Permutation::Gspo => &self.gspo,
            Permutation::Gpos => &self.gpos,
            Permutation::Gosp => &self.gosp,
        };
        let (from, to) = prefix_bounds(&prefix);
        Box::new(
            index
                .range(from..=to)
                .map(move |key| decode_key(permutation, *key))
                .filter(move |quad| pattern.matches(quad)),
        )
    }
}

fn prefix_bounds(prefix: &[ObjectId]) -> (IndexKey, IndexKey) {
    let mut from = [ObjectId::MIN; 4];
    let mut to = [ObjectId::MAX; 4];
    for (i, id) in prefix.iter().enumerate() {
        from[i] = *id;
        to[i] = *id;
    }
    (from, to)
}

fn decode_key(permutation: Permutation, key: IndexKey) -> EncodedQuad {
    let [g, a, b, c] = key;
    let (subject, predicate, object) = match permutation {
        Permutation::Gspo => (a, b, c),
        Permutation::Gpos => (c, a, b),
        Permutation::Gosp => (b, c, a),
    };
    EncodedQuad {
        graph_name: g,
        subject,
        predicate,
        object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(g: u32, s: u32, p: u32, o: u32) -> EncodedQuad {
        EncodedQuad {
            graph_name: ObjectId(g),
            subject: ObjectId(s),
            predicate: ObjectId(p),
            object: ObjectId(o),
        }
    }

    #[test]
    fn scan_uses_every_permutation() {
        let mut indexes = QuadIndexes::default();
        indexes.insert(quad(0, 1, 2, 3));
        indexes.insert(quad(0, 3, 2, 1));
        indexes.insert(quad(4, 1, 2, 3));

        let by_object = indexes
            .scan(EncodedQuadPattern {
                graph_name: Some(ObjectId(0)),
                object: Some(ObjectId(3)),
                ..EncodedQuadPattern::default()
            })
            .collect::<Vec<_>>();
        assert_eq!(by_object, vec![quad(0, 1, 2, 3)]);

        let by_predicate = indexes
            .scan(EncodedQuadPattern {
                predicate: Some(ObjectId(2)),
                ..EncodedQuadPattern::default()
            })
            .count();
        assert_eq!(by_predicate, 3);
        assert_eq!(indexes.named_graphs(), &[ObjectId(4)]);
    }

    #[test]
    fn remove_named_graph_removes_its_quads() {
        let mut indexes = QuadIndexes::default();
        indexes.insert(quad(4, 1, 2, 3));
        assert!(indexes.remove_named_graph(ObjectId(4)));
        assert_eq!(indexes.len(), 0);
        assert!(!indexes.contains_named_graph(ObjectId(4)));
    }
}
