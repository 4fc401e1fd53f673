use crate::context::ActiveGraph;
use crate::error::EvaluationError;
use crate::eval::Evaluator;
use crate::multiset::join_variables;
use crate::{Bindings, EvaluationContext, Multiset};
use itertools::Itertools;
use rdf_weave_logical::pattern_variables;
use rdf_weave_model::{
    GraphNameRef, NamedNodePattern, NamedNodeRef, SubjectRef, Term, TermPattern, TermRef, Triple,
    TriplePattern, Variable,
};

/// Evaluates a basic graph pattern. Stops after `limit` solutions, if given.
pub(super) fn evaluate_bgp(
    evaluator: &Evaluator<'_>,
    patterns: &[TriplePattern],
    graph: &ActiveGraph,
    limit: Option<usize>,
) -> Result<Multiset, EvaluationError> {
    if patterns.is_empty() {
        return Ok(match limit {
            Some(0) => Multiset::Empty,
            _ => Multiset::Identity,
        });
    }

    if evaluator.context().options().rigorous_evaluation {
        let mut result = Multiset::Identity;
        for pattern in patterns {
            let solutions =
                evaluate_seeded_bgp(evaluator, std::slice::from_ref(pattern), graph, seed(), None)?;
            result = result.join(solutions);
        }
        return Ok(match limit {
            Some(limit) => result.limit(limit),
            None => result,
        });
    }

    evaluate_seeded_bgp(evaluator, patterns, graph, seed(), limit)
}

fn seed() -> Bindings {
    Multiset::Identity.into_bindings()
}

/// Matches `patterns` once for every row of `seed` and returns the joined solutions.
///
/// The values of each seed row are substituted into the patterns before the dataset is
/// accessed. With a single empty seed row this is a plain BGP evaluation.
pub(super) fn evaluate_seeded_bgp(
    evaluator: &Evaluator<'_>,
    patterns: &[TriplePattern],
    graph: &ActiveGraph,
    seed: Bindings,
    limit: Option<usize>,
) -> Result<Multiset, EvaluationError> {
    let mut bgp_variables = Vec::new();
    for variable in patterns.iter().flat_map(pattern_variables) {
        if !bgp_variables.contains(variable) {
            bgp_variables.push(variable.clone());
        }
    }
    let variables = join_variables(seed.variables(), &bgp_variables);

    let matcher = PatternMatcher {
        context: evaluator.context(),
        graph,
        patterns: patterns
            .iter()
            .map(|pattern| CompiledPattern::new(pattern, &variables))
            .collect(),
        limit: limit.unwrap_or(usize::MAX),
    };

    let mut result = Bindings::new(variables);
    let width = result.variables().len();
    for mut row in seed.into_rows() {
        if result.len() >= matcher.limit {
            break;
        }
        row.resize(width, None);
        matcher.search(0, &mut row, &mut result)?;
    }
    Ok(result.into())
}

/// A position of a compiled triple pattern.
#[derive(Debug)]
enum Slot {
    Constant(Term),
    Variable(usize),
}

impl Slot {
    fn new(pattern: &TermPattern, variables: &[Variable]) -> Self {
        match pattern {
            TermPattern::Variable(variable) => Self::variable(variable, variables),
            TermPattern::NamedNode(node) => Slot::Constant(node.clone().into()),
            TermPattern::BlankNode(node) => Slot::Constant(node.clone().into()),
            TermPattern::Literal(literal) => Slot::Constant(literal.clone().into()),
        }
    }

    fn variable(variable: &Variable, variables: &[Variable]) -> Self {
        // Every pattern variable is part of the layout.
        let index = variables.iter().position(|v| v == variable).unwrap_or(0);
        Slot::Variable(index)
    }

    /// Returns the term at this position, if it is known for `row`.
    fn resolve<'a>(&'a self, row: &'a [Option<Term>]) -> Option<&'a Term> {
        match self {
            Slot::Constant(term) => Some(term),
            Slot::Variable(index) => row[*index].as_ref(),
        }
    }
}

#[derive(Debug)]
struct CompiledPattern {
    subject: Slot,
    predicate: Slot,
    object: Slot,
}

impl CompiledPattern {
    fn new(pattern: &TriplePattern, variables: &[Variable]) -> Self {
        let predicate = match &pattern.predicate {
            NamedNodePattern::NamedNode(node) => Slot::Constant(node.clone().into()),
            NamedNodePattern::Variable(variable) => Slot::variable(variable, variables),
        };
        Self {
            subject: Slot::new(&pattern.subject, variables),
            predicate,
            object: Slot::new(&pattern.object, variables),
        }
    }
}

/// A depth-first search that binds one pattern after the other.
struct PatternMatcher<'a> {
    context: &'a EvaluationContext,
    graph: &'a ActiveGraph,
    patterns: Vec<CompiledPattern>,
    limit: usize,
}

impl PatternMatcher<'_> {
    /// Extends `row` with the matches of `patterns[depth..]` and pushes complete rows to
    /// `result`. `row` is restored before returning.
    fn search(
        &self,
        depth: usize,
        row: &mut [Option<Term>],
        result: &mut Bindings,
    ) -> Result<(), EvaluationError> {
        let Some(pattern) = self.patterns.get(depth) else {
            result.push(row.to_vec());
            return Ok(());
        };

        self.context.check_deadline()?;
        let subject = pattern.subject.resolve(row);
        let predicate = pattern.predicate.resolve(row);
        let object = pattern.object.resolve(row);

        // Literals cannot be subjects and only IRIs can be predicates.
        let subject = match subject.map(as_subject) {
            None => None,
            Some(Some(subject)) => Some(subject),
            Some(None) => return Ok(()),
        };
        let predicate = match predicate {
            None => None,
            Some(Term::NamedNode(node)) => Some(node.as_ref()),
            Some(_) => return Ok(()),
        };
        let object = object.map(Term::as_ref);

        let triples = triples_for_pattern(self.context, self.graph, subject, predicate, object)?;
        for triple in triples {
            let mut bound = Vec::with_capacity(3);
            let values = [
                (&pattern.subject, Term::from(triple.subject)),
                (&pattern.predicate, Term::from(triple.predicate)),
                (&pattern.object, triple.object),
            ];
            let mut is_consistent = true;
            for (slot, value) in values {
                if let Slot::Variable(index) = slot {
                    if row[*index].is_none() {
                        row[*index] = Some(value);
                        bound.push(*index);
                    } else {
                        // Only reachable for a variable that occurs twice in the pattern.
                        is_consistent &= row[*index].as_ref() == Some(&value);
                    }
                }
            }

            if is_consistent {
                self.search(depth + 1, row, result)?;
            }
            for index in bound {
                row[index] = None;
            }
            if result.len() >= self.limit {
                break;
            }
        }
        Ok(())
    }
}

pub(super) fn as_subject(term: &Term) -> Option<SubjectRef<'_>> {
    match term {
        Term::NamedNode(node) => Some(SubjectRef::NamedNode(node.as_ref())),
        Term::BlankNode(node) => Some(SubjectRef::BlankNode(node.as_ref())),
        Term::Literal(_) => None,
    }
}

/// Returns the triples of the active graph that match the given pattern.
///
/// If the active graph is the merge of multiple graphs, a triple that occurs in more than one
/// graph is only returned once.
pub(super) fn triples_for_pattern(
    context: &EvaluationContext,
    graph: &ActiveGraph,
    subject: Option<SubjectRef<'_>>,
    predicate: Option<NamedNodeRef<'_>>,
    object: Option<TermRef<'_>>,
) -> Result<Vec<Triple>, EvaluationError> {
    let dataset = context.dataset();
    let lookup = |graph_name: Option<GraphNameRef<'_>>| {
        dataset
            .quads_for_pattern(graph_name, subject, predicate, object)
            .map(|quad| quad.map(Triple::from))
            .collect::<Result<Vec<_>, _>>()
    };

    Ok(match graph {
        ActiveGraph::DefaultGraph => lookup(Some(GraphNameRef::DefaultGraph))?,
        ActiveGraph::AllGraphs => lookup(None)?.into_iter().unique().collect(),
        ActiveGraph::Union(graphs) => match graphs.as_slice() {
            [graph] => lookup(Some(graph.as_ref()))?,
            graphs => {
                let mut result = Vec::new();
                for graph in graphs {
                    result.extend(lookup(Some(graph.as_ref()))?);
                }
                result.into_iter().unique().collect()
            }
        },
    })
}
