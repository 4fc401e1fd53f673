use crate::context::ActiveGraph;
use crate::error::EvaluationError;
use crate::eval::bgp::{as_subject, triples_for_pattern};
use crate::{Bindings, EvaluationContext, Multiset};
use itertools::Itertools;
use rdf_weave_logical::PathExpression;
use rdf_weave_model::{NamedNode, Term, TermPattern, Variable};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Evaluates the path pattern `subject path object` against the active graph.
///
/// Path solutions are distinct: every pair of connected nodes is returned once, no matter how
/// many paths connect them.
pub(super) fn evaluate_path(
    context: &EvaluationContext,
    subject: &TermPattern,
    path: &PathExpression,
    object: &TermPattern,
    graph: &ActiveGraph,
) -> Result<Multiset, EvaluationError> {
    let paths = PathEvaluator { context, graph };
    match (Endpoint::new(subject), Endpoint::new(object)) {
        (Endpoint::Term(start), Endpoint::Term(end)) => {
            let is_connected = if context.options().rigorous_evaluation {
                // Nodes outside the graph are only connected to themselves by a zero-length path.
                (start == end && path.matches_zero_length())
                    || paths.all_pairs(path)?.contains(&(start, end))
            } else {
                paths.reachable(path, &start, Direction::Forward)?.contains(&end)
            };
            Ok(if is_connected {
                Multiset::Identity
            } else {
                Multiset::Null
            })
        }
        (Endpoint::Term(start), Endpoint::Variable(end)) => {
            let nodes = paths.reachable(path, &start, Direction::Forward)?;
            Ok(single_column(end, nodes))
        }
        (Endpoint::Variable(start), Endpoint::Term(end)) => {
            let nodes = paths.reachable(path, &end, Direction::Backward)?;
            Ok(single_column(start, nodes))
        }
        (Endpoint::Variable(start), Endpoint::Variable(end)) if start == end => {
            let nodes = paths
                .all_pairs(path)?
                .into_iter()
                .filter_map(|(start, end)| (start == end).then_some(start));
            Ok(single_column(start, nodes))
        }
        (Endpoint::Variable(start), Endpoint::Variable(end)) => {
            let rows = paths
                .all_pairs(path)?
                .into_iter()
                .map(|(start, end)| vec![Some(start), Some(end)]);
            Ok(Bindings::with_rows(vec![start.clone(), end.clone()], rows).into())
        }
    }
}

fn single_column(variable: &Variable, nodes: impl IntoIterator<Item = Term>) -> Multiset {
    let rows = nodes.into_iter().map(|node| vec![Some(node)]);
    Bindings::with_rows(vec![variable.clone()], rows).into()
}

enum Endpoint<'a> {
    Term(Term),
    Variable(&'a Variable),
}

impl<'a> Endpoint<'a> {
    fn new(pattern: &'a TermPattern) -> Self {
        match pattern {
            TermPattern::Variable(variable) => Endpoint::Variable(variable),
            TermPattern::NamedNode(node) => Endpoint::Term(node.clone().into()),
            TermPattern::BlankNode(node) => Endpoint::Term(node.clone().into()),
            TermPattern::Literal(literal) => Endpoint::Term(literal.clone().into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// From the subject to the object.
    Forward,
    /// From the object to the subject.
    Backward,
}

impl Direction {
    fn reverse(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

struct PathEvaluator<'a> {
    context: &'a EvaluationContext,
    graph: &'a ActiveGraph,
}

impl PathEvaluator<'_> {
    /// Returns the distinct nodes that can be reached from `node` by following `path` in
    /// `direction`, in order of discovery.
    fn reachable(
        &self,
        path: &PathExpression,
        node: &Term,
        direction: Direction,
    ) -> Result<Vec<Term>, EvaluationError> {
        match path {
            PathExpression::Property(predicate) => self.neighbors(predicate, node, direction),
            PathExpression::Inverse(inner) => self.reachable(inner, node, direction.reverse()),
            PathExpression::Sequence(lhs, rhs) => {
                let (first, second) = match direction {
                    Direction::Forward => (lhs, rhs),
                    Direction::Backward => (rhs, lhs),
                };
                let mut result = Vec::new();
                for middle in self.reachable(first, node, direction)? {
                    result.extend(self.reachable(second, &middle, direction)?);
                }
                Ok(result.into_iter().unique().collect())
            }
            PathExpression::Alternative(lhs, rhs) => {
                let mut result = self.reachable(lhs, node, direction)?;
                result.extend(self.reachable(rhs, node, direction)?);
                Ok(result.into_iter().unique().collect())
            }
            PathExpression::ZeroOrMore(inner) => self.closure(inner, node, direction, true),
            PathExpression::OneOrMore(inner) => self.closure(inner, node, direction, false),
            PathExpression::ZeroOrOne(inner) => {
                let mut result = vec![node.clone()];
                result.extend(self.reachable(inner, node, direction)?);
                Ok(result.into_iter().unique().collect())
            }
            PathExpression::FixedCardinality(inner, count) => {
                let mut frontier = vec![node.clone()];
                for _ in 0..*count {
                    self.context.check_deadline()?;
                    let mut next = Vec::new();
                    for node in &frontier {
                        next.extend(self.reachable(inner, node, direction)?);
                    }
                    frontier = next.into_iter().unique().collect();
                }
                Ok(frontier)
            }
            PathExpression::NegatedPropertySet { forward, inverse } => {
                let mut result = Vec::new();
                // A set that only lists inverse properties does not match forward edges.
                if !forward.is_empty() || inverse.is_empty() {
                    result.extend(self.negated_neighbors(forward, node, direction)?);
                }
                if !inverse.is_empty() {
                    result.extend(self.negated_neighbors(inverse, node, direction.reverse())?);
                }
                Ok(result.into_iter().unique().collect())
            }
        }
    }

    /// Computes the transitive closure from `node` with a breadth-first search. Every node is
    /// expanded at most once, so the search terminates on cyclic graphs.
    fn closure(
        &self,
        inner: &PathExpression,
        node: &Term,
        direction: Direction,
        include_start: bool,
    ) -> Result<Vec<Term>, EvaluationError> {
        let mut result = Vec::new();
        let mut found = FxHashSet::default();
        if include_start {
            found.insert(node.clone());
            result.push(node.clone());
        }

        let mut expanded = FxHashSet::default();
        expanded.insert(node.clone());
        let mut queue = VecDeque::from([node.clone()]);
        while let Some(current) = queue.pop_front() {
            self.context.check_deadline()?;
            for next in self.reachable(inner, &current, direction)? {
                if found.insert(next.clone()) {
                    result.push(next.clone());
                }
                if expanded.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
        Ok(result)
    }

    /// Returns every pair of nodes connected by `path`.
    fn all_pairs(&self, path: &PathExpression) -> Result<Vec<(Term, Term)>, EvaluationError> {
        match path {
            PathExpression::Property(predicate) => {
                let triples = triples_for_pattern(
                    self.context,
                    self.graph,
                    None,
                    Some(predicate.as_ref()),
                    None,
                )?;
                Ok(triples
                    .into_iter()
                    .map(|triple| (Term::from(triple.subject), triple.object))
                    .unique()
                    .collect())
            }
            PathExpression::Inverse(inner) => Ok(self
                .all_pairs(inner)?
                .into_iter()
                .map(|(start, end)| (end, start))
                .collect()),
            _ => {
                let mut result = Vec::new();
                for start in self.graph_nodes()? {
                    for end in self.reachable(path, &start, Direction::Forward)? {
                        result.push((start.clone(), end));
                    }
                }
                Ok(result)
            }
        }
    }

    /// Returns the nodes that occur as subject or object in the active graph.
    fn graph_nodes(&self) -> Result<Vec<Term>, EvaluationError> {
        let triples = triples_for_pattern(self.context, self.graph, None, None, None)?;
        Ok(triples
            .into_iter()
            .flat_map(|triple| [Term::from(triple.subject), triple.object])
            .unique()
            .collect())
    }

    fn neighbors(
        &self,
        predicate: &NamedNode,
        node: &Term,
        direction: Direction,
    ) -> Result<Vec<Term>, EvaluationError> {
        let predicate = Some(predicate.as_ref());
        let neighbors = match direction {
            Direction::Forward => {
                let Some(subject) = as_subject(node) else {
                    return Ok(Vec::new());
                };
                triples_for_pattern(self.context, self.graph, Some(subject), predicate, None)?
                    .into_iter()
                    .map(|triple| triple.object)
                    .collect::<Vec<_>>()
            }
            Direction::Backward => {
                triples_for_pattern(self.context, self.graph, None, predicate, Some(node.as_ref()))?
                    .into_iter()
                    .map(|triple| Term::from(triple.subject))
                    .collect()
            }
        };
        Ok(neighbors.into_iter().unique().collect())
    }

    /// Follows every edge in `direction` whose predicate is not in `excluded`.
    fn negated_neighbors(
        &self,
        excluded: &[NamedNode],
        node: &Term,
        direction: Direction,
    ) -> Result<Vec<Term>, EvaluationError> {
        let triples = match direction {
            Direction::Forward => match as_subject(node) {
                Some(subject) => {
                    triples_for_pattern(self.context, self.graph, Some(subject), None, None)?
                }
                None => Vec::new(),
            },
            Direction::Backward => {
                triples_for_pattern(self.context, self.graph, None, None, Some(node.as_ref()))?
            }
        };
        Ok(triples
            .into_iter()
            .filter(|triple| !excluded.contains(&triple.predicate))
            .map(|triple| match direction {
                Direction::Forward => triple.object,
                Direction::Backward => Term::from(triple.subject),
            })
            .unique()
            .collect())
    }
}
