//! The evaluator maps every [Algebra] node onto the multiset operation that implements it.

mod aggregates;
mod bgp;
pub(crate) mod expression;
mod ordering;
mod paths;

use crate::context::ActiveGraph;
use crate::error::EvaluationError;
use crate::multiset::join_variables;
use crate::{Bindings, EvaluationContext, Multiset};
use expression::compile;
use rdf_weave_logical::Algebra;
use rdf_weave_model::{GraphName, GroundTerm, NamedNodePattern, Term, Variable};
use tracing::warn;

/// Evaluates `algebra` against the dataset of `context`.
///
/// The algebra is evaluated as it is. Optimizing it beforehand is the job of the caller.
pub fn evaluate(
    algebra: &Algebra,
    context: &EvaluationContext,
) -> Result<Multiset, EvaluationError> {
    Evaluator::new(context).evaluate(algebra, context.default_graph())
}

/// Recursively evaluates the nodes of an algebra tree.
///
/// The evaluator itself is stateless. Nodes that change the active graph (i.e., `GRAPH`) pass
/// the new active graph to their children.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Evaluator<'a> {
    context: &'a EvaluationContext,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(context: &'a EvaluationContext) -> Self {
        Self { context }
    }

    pub(crate) fn context(&self) -> &'a EvaluationContext {
        self.context
    }

    pub(crate) fn evaluate(
        &self,
        algebra: &Algebra,
        graph: &ActiveGraph,
    ) -> Result<Multiset, EvaluationError> {
        self.context.check_deadline()?;
        match algebra {
            Algebra::Bgp { patterns } => bgp::evaluate_bgp(self, patterns, graph, None),
            Algebra::AskBgp { patterns } => bgp::evaluate_bgp(self, patterns, graph, Some(1)),
            Algebra::LazyBgp { patterns, limit } => {
                bgp::evaluate_bgp(self, patterns, graph, Some(*limit))
            }
            Algebra::Path {
                subject,
                path,
                object,
            } => paths::evaluate_path(self.context, subject, path, object, graph),
            Algebra::Join { lhs, rhs } => self.evaluate_join(lhs, rhs, graph),
            Algebra::LeftJoin { lhs, rhs, filter } => {
                let (lhs, rhs) = self.evaluate_pair(lhs, rhs, graph)?;
                match filter {
                    None => Ok(lhs.left_join(rhs, None)),
                    Some(filter) => {
                        let variables = join_variables(lhs.variables(), rhs.variables());
                        let filter = compile(self, filter, &variables, graph)?;
                        let predicate = |row: &[Option<Term>]| filter.is_satisfied(row, self.context);
                        Ok(lhs.left_join(rhs, Some(&predicate)))
                    }
                }
            }
            Algebra::Union { lhs, rhs } => {
                let (lhs, rhs) = self.evaluate_pair(lhs, rhs, graph)?;
                Ok(lhs.union(rhs))
            }
            Algebra::LazyUnion { lhs, rhs, limit } => {
                let lhs = self.evaluate(lhs, graph)?.limit(*limit);
                if lhs.len() >= *limit {
                    return Ok(lhs);
                }
                let remaining = *limit - lhs.len();
                let rhs = self.evaluate(rhs, graph)?.limit(remaining);
                Ok(lhs.union(rhs))
            }
            Algebra::AskUnion { lhs, rhs } => {
                let lhs = self.evaluate(lhs, graph)?;
                if lhs.is_empty() {
                    self.evaluate(rhs, graph)
                } else {
                    Ok(lhs)
                }
            }
            Algebra::Minus { lhs, rhs } => {
                let (lhs, rhs) = self.evaluate_pair(lhs, rhs, graph)?;
                Ok(lhs.minus(rhs))
            }
            Algebra::Filter { inner, expression } => {
                let inner = self.evaluate(inner, graph)?;
                let expression = compile(self, expression, inner.variables(), graph)?;
                Ok(inner.filter(|row| expression.is_satisfied(row.values(), self.context)))
            }
            Algebra::FilteredProduct {
                lhs,
                rhs,
                expression,
            } => {
                let (lhs, rhs) = self.evaluate_pair(lhs, rhs, graph)?;
                let variables = join_variables(lhs.variables(), rhs.variables());
                let expression = compile(self, expression, &variables, graph)?;
                let predicate = |row: &[Option<Term>]| expression.is_satisfied(row, self.context);
                Ok(lhs.join_filtered(rhs, &predicate))
            }
            Algebra::Extend {
                inner,
                variable,
                expression,
            } => {
                let inner = self.evaluate(inner, graph)?;
                let expression = compile(self, expression, inner.variables(), graph)?;
                Ok(inner.extend(variable, |row| {
                    expression.evaluate(row.values(), self.context).ok()
                }))
            }
            Algebra::Group {
                inner,
                variables,
                aggregates,
            } => {
                let inner = self.evaluate(inner, graph)?;
                aggregates::evaluate_group(self, inner, variables, aggregates, graph)
            }
            Algebra::OrderBy { inner, expressions } => {
                let inner = self.evaluate(inner, graph)?;
                ordering::evaluate_order_by(self, inner, expressions, graph)
            }
            Algebra::Distinct { inner } | Algebra::Reduced { inner } => {
                Ok(self.evaluate(inner, graph)?.distinct())
            }
            Algebra::Slice {
                inner,
                start,
                length,
            } => Ok(self.evaluate(inner, graph)?.slice(*start, *length)),
            Algebra::Select { inner, variables } => {
                Ok(self.evaluate(inner, graph)?.project(variables))
            }
            Algebra::Graph { inner, name } => self.evaluate_graph(inner, name),
            Algebra::Service {
                name,
                inner,
                silent,
            } => self.evaluate_service(name, inner, *silent),
            Algebra::Values {
                variables,
                bindings,
            } => Ok(evaluate_values(variables, bindings)),
        }
    }

    /// Evaluates both children, in parallel if enabled.
    fn evaluate_pair(
        &self,
        lhs: &Algebra,
        rhs: &Algebra,
        graph: &ActiveGraph,
    ) -> Result<(Multiset, Multiset), EvaluationError> {
        if self.context.options().parallel {
            let (lhs, rhs) = rayon_core::join(
                || self.evaluate(lhs, graph),
                || self.evaluate(rhs, graph),
            );
            Ok((lhs?, rhs?))
        } else {
            Ok((self.evaluate(lhs, graph)?, self.evaluate(rhs, graph)?))
        }
    }

    fn evaluate_join(
        &self,
        lhs: &Algebra,
        rhs: &Algebra,
        graph: &ActiveGraph,
    ) -> Result<Multiset, EvaluationError> {
        let options = self.context.options();
        if let Algebra::Bgp { patterns } = rhs {
            if !options.parallel && !options.rigorous_evaluation {
                // Index nested loop join: the BGP is matched once per solution of the lhs.
                let lhs = self.evaluate(lhs, graph)?;
                return match lhs {
                    Multiset::Empty | Multiset::Null => Ok(lhs),
                    lhs => bgp::evaluate_seeded_bgp(self, patterns, graph, lhs.into_bindings(), None),
                };
            }
        }

        let (lhs, rhs) = self.evaluate_pair(lhs, rhs, graph)?;
        Ok(lhs.join(rhs))
    }

    fn evaluate_graph(
        &self,
        inner: &Algebra,
        name: &NamedNodePattern,
    ) -> Result<Multiset, EvaluationError> {
        match name {
            NamedNodePattern::NamedNode(name) => {
                if !self.context.is_visible_named_graph(&name.clone().into())? {
                    return Ok(Multiset::Null);
                }
                let graph = ActiveGraph::Union(vec![GraphName::NamedNode(name.clone())]);
                self.evaluate(inner, &graph)
            }
            NamedNodePattern::Variable(variable) => {
                let mut result = Multiset::Empty;
                for name in self.context.named_graphs()? {
                    self.context.check_deadline()?;
                    let graph = ActiveGraph::Union(vec![GraphName::from(name.clone())]);
                    let solutions = self.evaluate(inner, &graph)?;
                    let binding = Bindings::with_rows(
                        vec![variable.clone()],
                        [vec![Some(Term::from(name))]],
                    );
                    result = result.union(solutions.join(binding.into()));
                }
                Ok(result)
            }
        }
    }

    fn evaluate_service(
        &self,
        name: &NamedNodePattern,
        inner: &Algebra,
        silent: bool,
    ) -> Result<Multiset, EvaluationError> {
        let endpoint = match name {
            NamedNodePattern::NamedNode(endpoint) => endpoint,
            NamedNodePattern::Variable(variable) => {
                return Err(EvaluationError::NotImplemented(format!(
                    "SERVICE with the variable {variable} as endpoint"
                )))
            }
        };

        let Some(handler) = self.context.service_handler() else {
            if silent {
                warn!(%endpoint, "No SERVICE handler is configured, ignoring the silent service");
                return Ok(Multiset::Identity);
            }
            return Err(EvaluationError::UnsupportedService(endpoint.clone()));
        };

        match handler.handle(endpoint, inner) {
            Ok(solutions) => Ok(solutions),
            Err(error) if silent => {
                warn!(%endpoint, %error, "Ignoring the failure of a silent service");
                Ok(Multiset::Identity)
            }
            Err(source) => Err(EvaluationError::Service {
                endpoint: endpoint.clone(),
                source,
            }),
        }
    }
}

fn evaluate_values(variables: &[Variable], bindings: &[Vec<Option<GroundTerm>>]) -> Multiset {
    let rows = bindings.iter().map(|row| {
        row.iter()
            .map(|value| value.as_ref().map(ground_term_to_term))
            .collect::<Vec<_>>()
    });
    Bindings::with_rows(variables.to_vec(), rows).into()
}

fn ground_term_to_term(term: &GroundTerm) -> Term {
    match term {
        GroundTerm::NamedNode(node) => node.clone().into(),
        GroundTerm::Literal(literal) => literal.clone().into(),
    }
}
