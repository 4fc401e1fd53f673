use crate::sparql::rewriting::expression_rewriter::ExpressionRewriter;
use rdf_weave_logical::{
    AggregateExpression, Algebra, Expression, OrderExpression, PathExpression, PathTranslator,
};
use rdf_weave_model::{BlankNode, TermPattern, TriplePattern, Variable};
use spargebra::algebra::{GraphPattern, PropertyPathExpression};
use std::cell::RefCell;

/// Rewrites the graph pattern of a parsed query into an [Algebra] tree.
///
/// Blank nodes in patterns are replaced by variables that cannot clash with the variables of
/// the query. Property paths are lowered with a [PathTranslator] that is shared by the entire
/// query, such that the intermediate variables of different paths are distinct.
#[derive(Debug, Default)]
pub struct GraphPatternRewriter {
    translator: RefCell<PathTranslator>,
}

impl GraphPatternRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rewrite(&self, pattern: &GraphPattern) -> Algebra {
        self.rewrite_graph_pattern(pattern)
    }

    pub(super) fn rewrite_graph_pattern(&self, pattern: &GraphPattern) -> Algebra {
        match pattern {
            GraphPattern::Bgp { patterns } => {
                Algebra::bgp(patterns.iter().map(rewrite_triple_pattern).collect())
            }
            GraphPattern::Path {
                subject,
                path,
                object,
            } => self.translator.borrow_mut().translate(
                &rewrite_term_pattern(subject),
                &rewrite_path(path),
                &rewrite_term_pattern(object),
            ),
            GraphPattern::Join { left, right } => Algebra::join(
                self.rewrite_graph_pattern(left),
                self.rewrite_graph_pattern(right),
            ),
            GraphPattern::LeftJoin {
                left,
                right,
                expression,
            } => Algebra::left_join(
                self.rewrite_graph_pattern(left),
                self.rewrite_graph_pattern(right),
                expression.as_ref().map(|e| self.rewrite_expression(e)),
            ),
            GraphPattern::Filter { expr, inner } => {
                Algebra::filter(self.rewrite_graph_pattern(inner), self.rewrite_expression(expr))
            }
            GraphPattern::Union { left, right } => Algebra::union(
                self.rewrite_graph_pattern(left),
                self.rewrite_graph_pattern(right),
            ),
            GraphPattern::Graph { name, inner } => {
                Algebra::graph(self.rewrite_graph_pattern(inner), name.clone())
            }
            GraphPattern::Extend {
                inner,
                variable,
                expression,
            } => Algebra::extend(
                self.rewrite_graph_pattern(inner),
                variable.clone(),
                self.rewrite_expression(expression),
            ),
            GraphPattern::Minus { left, right } => Algebra::minus(
                self.rewrite_graph_pattern(left),
                self.rewrite_graph_pattern(right),
            ),
            GraphPattern::Values {
                variables,
                bindings,
            } => Algebra::Values {
                variables: variables.clone(),
                bindings: bindings.clone(),
            },
            GraphPattern::OrderBy { inner, expression } => {
                let expressions = expression
                    .iter()
                    .map(|e| self.rewrite_order_expression(e))
                    .collect();
                Algebra::order_by(self.rewrite_graph_pattern(inner), expressions)
            }
            GraphPattern::Project { inner, variables } => {
                Algebra::select(self.rewrite_graph_pattern(inner), variables.clone())
            }
            GraphPattern::Distinct { inner } => {
                Algebra::distinct(self.rewrite_graph_pattern(inner))
            }
            GraphPattern::Reduced { inner } => Algebra::reduced(self.rewrite_graph_pattern(inner)),
            GraphPattern::Slice {
                inner,
                start,
                length,
            } => Algebra::slice(self.rewrite_graph_pattern(inner), *start, *length),
            GraphPattern::Group {
                inner,
                variables,
                aggregates,
            } => Algebra::Group {
                inner: Box::new(self.rewrite_graph_pattern(inner)),
                variables: variables.clone(),
                aggregates: aggregates
                    .iter()
                    .map(|(variable, aggregate)| {
                        (variable.clone(), self.rewrite_aggregate(aggregate))
                    })
                    .collect(),
            },
            GraphPattern::Service {
                name,
                inner,
                silent,
            } => Algebra::Service {
                name: name.clone(),
                inner: Box::new(self.rewrite_graph_pattern(inner)),
                silent: *silent,
            },
        }
    }

    /// Rewrites an [Expression](spargebra::algebra::Expression).
    fn rewrite_expression(&self, expression: &spargebra::algebra::Expression) -> Expression {
        ExpressionRewriter::new(self).rewrite(expression)
    }

    /// Rewrites an [OrderExpression](spargebra::algebra::OrderExpression).
    fn rewrite_order_expression(
        &self,
        expression: &spargebra::algebra::OrderExpression,
    ) -> OrderExpression {
        match expression {
            spargebra::algebra::OrderExpression::Asc(inner) => {
                OrderExpression::Asc(self.rewrite_expression(inner))
            }
            spargebra::algebra::OrderExpression::Desc(inner) => {
                OrderExpression::Desc(self.rewrite_expression(inner))
            }
        }
    }

    /// Rewrites an [AggregateExpression](spargebra::algebra::AggregateExpression).
    fn rewrite_aggregate(
        &self,
        expression: &spargebra::algebra::AggregateExpression,
    ) -> AggregateExpression {
        match expression {
            spargebra::algebra::AggregateExpression::CountSolutions { distinct } => {
                AggregateExpression::CountSolutions {
                    distinct: *distinct,
                }
            }
            spargebra::algebra::AggregateExpression::FunctionCall {
                name,
                expr,
                distinct,
            } => AggregateExpression::FunctionCall {
                name: name.clone(),
                expression: self.rewrite_expression(expr),
                distinct: *distinct,
            },
        }
    }
}

fn rewrite_triple_pattern(pattern: &TriplePattern) -> TriplePattern {
    TriplePattern {
        subject: rewrite_term_pattern(&pattern.subject),
        predicate: pattern.predicate.clone(),
        object: rewrite_term_pattern(&pattern.object),
    }
}

/// Blank nodes in a query pattern behave like variables that cannot be projected.
fn rewrite_term_pattern(pattern: &TermPattern) -> TermPattern {
    match pattern {
        TermPattern::BlankNode(node) => blank_node_variable(node).into(),
        pattern => pattern.clone(),
    }
}

fn blank_node_variable(node: &BlankNode) -> Variable {
    Variable::new_unchecked(format!("__bnode_{}", node.as_str()))
}

fn rewrite_path(path: &PropertyPathExpression) -> PathExpression {
    match path {
        PropertyPathExpression::NamedNode(node) => PathExpression::Property(node.clone()),
        PropertyPathExpression::Reverse(inner) => match inner.as_ref() {
            PropertyPathExpression::NegatedPropertySet(properties) => {
                PathExpression::NegatedPropertySet {
                    forward: Vec::new(),
                    inverse: properties.clone(),
                }
            }
            inner => PathExpression::inverse(rewrite_path(inner)),
        },
        PropertyPathExpression::Sequence(lhs, rhs) => {
            PathExpression::sequence(rewrite_path(lhs), rewrite_path(rhs))
        }
        PropertyPathExpression::Alternative(lhs, rhs) => {
            PathExpression::alternative(rewrite_path(lhs), rewrite_path(rhs))
        }
        PropertyPathExpression::ZeroOrMore(inner) => {
            PathExpression::zero_or_more(rewrite_path(inner))
        }
        PropertyPathExpression::OneOrMore(inner) => {
            PathExpression::one_or_more(rewrite_path(inner))
        }
        PropertyPathExpression::ZeroOrOne(inner) => {
            PathExpression::zero_or_one(rewrite_path(inner))
        }
        PropertyPathExpression::NegatedPropertySet(properties) => {
            PathExpression::NegatedPropertySet {
                forward: properties.clone(),
                inverse: Vec::new(),
            }
        }
    }
}
