use crate::algebra::pattern_variables;
use crate::optimizer::{AlgebraRule, OptimizerContext};
use crate::{Algebra, Expression, Transformed};
use rdf_weave_model::{NamedNodePattern, Variable};

/// Moves filters as close as possible to the patterns that bind their variables.
///
/// - In a BGP, the filter is placed directly after the shortest prefix of patterns that binds all
///   variables of the filter. The remaining patterns are joined afterward.
/// - In a join, the filter is pushed into the side that certainly binds all of its variables.
/// - In an OPTIONAL, the filter is pushed into the required side if possible.
/// - Filters are distributed over both branches of a UNION.
/// - Filters are pushed below BIND and GRAPH if they do not reference the bound variable.
///
/// Filters that contain `EXISTS` are never moved.
#[derive(Debug, Default)]
pub struct FilterPlacementRule;

impl FilterPlacementRule {
    /// Creates a new [FilterPlacementRule].
    pub fn new() -> Self {
        Self
    }
}

impl AlgebraRule for FilterPlacementRule {
    fn name(&self) -> &str {
        "filter-placement"
    }

    fn rewrite(&self, algebra: Algebra, _context: &OptimizerContext) -> Transformed<Algebra> {
        algebra.transform_up(&|node| match node {
            Algebra::Filter { inner, expression } if !expression.contains_exists() => {
                let variables = expression.variables();
                push_filter(*inner, expression, &variables)
            }
            other => Transformed::no(other),
        })
    }
}

/// Places `expression` within `inner`. Returns [Transformed::no] with a plain filter on top if
/// the filter cannot be moved.
fn push_filter(inner: Algebra, expression: Expression, variables: &[Variable]) -> Transformed<Algebra> {
    if variables.is_empty() {
        return Transformed::no(Algebra::filter(inner, expression));
    }

    match inner {
        Algebra::Bgp { patterns } => {
            let mut bound = Vec::new();
            let split = patterns.iter().position(|pattern| {
                bound.extend(pattern_variables(pattern).cloned());
                variables.iter().all(|variable| bound.contains(variable))
            });
            match split {
                Some(last) if last + 1 < patterns.len() => {
                    let mut head = patterns;
                    let tail = head.split_off(last + 1);
                    Transformed::yes(Algebra::join(
                        Algebra::filter(Algebra::bgp(head), expression),
                        Algebra::bgp(tail),
                    ))
                }
                _ => Transformed::no(Algebra::filter(Algebra::bgp(patterns), expression)),
            }
        }
        Algebra::Join { lhs, rhs } => {
            if covers(&lhs, variables) {
                let lhs = push_filter(*lhs, expression, variables);
                Transformed::yes(Algebra::join(lhs.data, *rhs))
            } else if covers(&rhs, variables) {
                let rhs = push_filter(*rhs, expression, variables);
                Transformed::yes(Algebra::join(*lhs, rhs.data))
            } else {
                Transformed::no(Algebra::filter(Algebra::Join { lhs, rhs }, expression))
            }
        }
        Algebra::LeftJoin { lhs, rhs, filter } if covers(&lhs, variables) => {
            let lhs = push_filter(*lhs, expression, variables);
            Transformed::yes(Algebra::left_join(lhs.data, *rhs, filter))
        }
        Algebra::Union { lhs, rhs } => {
            let lhs = push_filter(*lhs, expression.clone(), variables);
            let rhs = push_filter(*rhs, expression, variables);
            Transformed::yes(Algebra::union(lhs.data, rhs.data))
        }
        Algebra::Extend {
            inner,
            variable,
            expression: bound,
        } if !variables.contains(&variable) => {
            let inner = push_filter(*inner, expression, variables);
            Transformed::yes(Algebra::extend(inner.data, variable, bound))
        }
        Algebra::Graph { inner, name } if !references_graph(&name, variables) => {
            let inner = push_filter(*inner, expression, variables);
            Transformed::yes(Algebra::graph(inner.data, name))
        }
        inner => Transformed::no(Algebra::filter(inner, expression)),
    }
}

fn covers(algebra: &Algebra, variables: &[Variable]) -> bool {
    let certain = algebra.certain_variables();
    variables.iter().all(|variable| certain.contains(variable))
}

fn references_graph(name: &NamedNodePattern, variables: &[Variable]) -> bool {
    match name {
        NamedNodePattern::Variable(variable) => variables.contains(variable),
        NamedNodePattern::NamedNode(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Expression;
    use insta::assert_snapshot;
    use rdf_weave_functions::BuiltinName;
    use rdf_weave_model::{Literal, NamedNode, TermPattern, TriplePattern};

    fn var(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    fn pattern(subject: &str, predicate: &str, object: &str) -> TriplePattern {
        TriplePattern {
            subject: TermPattern::from(var(subject)),
            predicate: NamedNode::new_unchecked(format!("http://ex/{predicate}")).into(),
            object: TermPattern::from(var(object)),
        }
    }

    fn greater_than(name: &str, value: i64) -> Expression {
        Expression::builtin(
            BuiltinName::GreaterThan,
            vec![Expression::Variable(var(name)), Literal::from(value).into()],
        )
    }

    fn rewrite(algebra: Algebra) -> Transformed<Algebra> {
        FilterPlacementRule::new().rewrite(algebra, &OptimizerContext::default())
    }

    #[test]
    fn filter_is_placed_after_binding_pattern() {
        let algebra = Algebra::filter(
            Algebra::bgp(vec![
                pattern("s", "age", "age"),
                pattern("s", "name", "name"),
                pattern("s", "knows", "o"),
            ]),
            greater_than("age", 18),
        );
        let result = rewrite(algebra);
        assert!(result.transformed);
        assert_snapshot!(
            result.data,
            @r#"Join(Filter(Bgp(?s <http://ex/age> ?age), GT(?age, "18"^^<http://www.w3.org/2001/XMLSchema#integer>)), Bgp(?s <http://ex/name> ?name . ?s <http://ex/knows> ?o))"#
        );
    }

    #[test]
    fn filter_over_last_pattern_stays() {
        let algebra = Algebra::filter(
            Algebra::bgp(vec![pattern("s", "name", "name"), pattern("s", "age", "age")]),
            greater_than("age", 18),
        );
        let result = rewrite(algebra);
        assert!(!result.transformed);
    }

    #[test]
    fn filter_is_pushed_into_optional_lhs() {
        let algebra = Algebra::filter(
            Algebra::left_join(
                Algebra::bgp(vec![pattern("s", "age", "age")]),
                Algebra::bgp(vec![pattern("s", "name", "name")]),
                None,
            ),
            greater_than("age", 18),
        );
        let result = rewrite(algebra);
        assert_snapshot!(
            result.data,
            @r#"LeftJoin(Filter(Bgp(?s <http://ex/age> ?age), GT(?age, "18"^^<http://www.w3.org/2001/XMLSchema#integer>)), Bgp(?s <http://ex/name> ?name))"#
        );
    }

    #[test]
    fn filter_on_optional_variable_stays() {
        let algebra = Algebra::filter(
            Algebra::left_join(
                Algebra::bgp(vec![pattern("s", "name", "name")]),
                Algebra::bgp(vec![pattern("s", "age", "age")]),
                None,
            ),
            greater_than("age", 18),
        );
        assert!(!rewrite(algebra).transformed);
    }

    #[test]
    fn filter_is_distributed_over_union() {
        let algebra = Algebra::filter(
            Algebra::union(
                Algebra::bgp(vec![pattern("s", "age", "age")]),
                Algebra::bgp(vec![pattern("s", "years", "age")]),
            ),
            greater_than("age", 18),
        );
        let result = rewrite(algebra);
        assert!(result.transformed);
        assert!(result.data.to_string().starts_with("Union(Filter("));
    }

    #[test]
    fn exists_filter_is_not_moved() {
        let exists = Expression::Exists(Box::new(Algebra::bgp(vec![pattern("s", "q", "x")])));
        let algebra = Algebra::filter(
            Algebra::bgp(vec![pattern("s", "p", "o"), pattern("o", "p", "z")]),
            exists,
        );
        assert!(!rewrite(algebra).transformed);
    }
}
