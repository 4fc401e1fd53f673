use crate::algebra::pattern_variables;
use crate::optimizer::{AlgebraRule, OptimizerContext};
use crate::{Algebra, Expression, Transformed};
use rdf_weave_model::{TriplePattern, Variable};

/// Fuses a filter with the cross product below it.
///
/// A cross product arises from a join without shared variables or from a BGP whose patterns
/// form disconnected groups. If the filter references variables of both sides, the product is
/// replaced by a [Algebra::FilteredProduct] that evaluates the filter while generating the
/// pairs instead of materializing the entire product first.
#[derive(Debug, Default)]
pub struct FilteredProductRule;

impl FilteredProductRule {
    /// Creates a new [FilteredProductRule].
    pub fn new() -> Self {
        Self
    }
}

impl AlgebraRule for FilteredProductRule {
    fn name(&self) -> &str {
        "filtered-product"
    }

    fn rewrite(&self, algebra: Algebra, _context: &OptimizerContext) -> Transformed<Algebra> {
        algebra.transform_up(&|node| match node {
            Algebra::Filter { inner, expression } if !expression.contains_exists() => {
                rewrite_filter(*inner, expression)
            }
            other => Transformed::no(other),
        })
    }
}

fn rewrite_filter(inner: Algebra, expression: Expression) -> Transformed<Algebra> {
    let variables = expression.variables();
    match inner {
        Algebra::Join { lhs, rhs } => {
            let lhs_variables = lhs.in_scope_variables();
            let rhs_variables = rhs.in_scope_variables();
            let disjoint = lhs_variables.iter().all(|v| !rhs_variables.contains(v));
            if disjoint
                && intersects(&variables, &lhs_variables)
                && intersects(&variables, &rhs_variables)
            {
                Transformed::yes(Algebra::FilteredProduct {
                    lhs,
                    rhs,
                    expression,
                })
            } else {
                Transformed::no(Algebra::filter(Algebra::Join { lhs, rhs }, expression))
            }
        }
        Algebra::Bgp { patterns } => match split_component(&patterns, &variables) {
            Some(in_component) => {
                let (lhs, rhs): (Vec<_>, Vec<_>) = patterns
                    .into_iter()
                    .zip(in_component)
                    .partition(|(_, in_component)| *in_component);
                Transformed::yes(Algebra::FilteredProduct {
                    lhs: Box::new(Algebra::bgp(lhs.into_iter().map(|(p, _)| p).collect())),
                    rhs: Box::new(Algebra::bgp(rhs.into_iter().map(|(p, _)| p).collect())),
                    expression,
                })
            }
            None => Transformed::no(Algebra::filter(Algebra::bgp(patterns), expression)),
        },
        inner => Transformed::no(Algebra::filter(inner, expression)),
    }
}

/// Finds the connected group of patterns that contains the first filter variable. Returns a
/// membership mask if the filter also references a variable outside of this group.
fn split_component(patterns: &[TriplePattern], variables: &[Variable]) -> Option<Vec<bool>> {
    if patterns.len() < 2 {
        return None;
    }

    let start = patterns.iter().position(|pattern| {
        pattern_variables(pattern).any(|variable| variables.contains(variable))
    })?;

    let mut in_component = vec![false; patterns.len()];
    in_component[start] = true;
    let mut component_variables = pattern_variables(&patterns[start]).collect::<Vec<_>>();
    loop {
        let next = patterns.iter().enumerate().position(|(i, pattern)| {
            !in_component[i]
                && pattern_variables(pattern).any(|variable| component_variables.contains(&variable))
        });
        let Some(next) = next else {
            break;
        };
        in_component[next] = true;
        component_variables.extend(pattern_variables(&patterns[next]));
    }

    let outside = patterns
        .iter()
        .zip(&in_component)
        .filter(|(_, in_component)| !**in_component)
        .flat_map(|(pattern, _)| pattern_variables(pattern))
        .collect::<Vec<_>>();
    let spans_both = variables.iter().any(|variable| outside.contains(&variable));
    spans_both.then_some(in_component)
}

fn intersects(lhs: &[Variable], rhs: &[Variable]) -> bool {
    lhs.iter().any(|variable| rhs.contains(variable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use rdf_weave_functions::BuiltinName;
    use rdf_weave_model::{NamedNode, TermPattern};

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

    fn less_than(lhs: &str, rhs: &str) -> Expression {
        Expression::builtin(
            BuiltinName::LessThan,
            vec![var(lhs).into(), var(rhs).into()],
        )
    }

    fn rewrite(algebra: Algebra) -> Transformed<Algebra> {
        FilteredProductRule::new().rewrite(algebra, &OptimizerContext::default())
    }

    #[test]
    fn disconnected_bgp_becomes_filtered_product() {
        let algebra = Algebra::filter(
            Algebra::bgp(vec![
                pattern("a", "p", "x"),
                pattern("b", "p", "y"),
                pattern("a", "q", "z"),
            ]),
            less_than("x", "y"),
        );
        let result = rewrite(algebra);
        assert!(result.transformed);
        assert_snapshot!(
            result.data,
            @"FilteredProduct(Bgp(?a <http://ex/p> ?x . ?a <http://ex/q> ?z), Bgp(?b <http://ex/p> ?y), LT(?x, ?y))"
        );
    }

    #[test]
    fn disjoint_join_becomes_filtered_product() {
        let algebra = Algebra::filter(
            Algebra::join(
                Algebra::bgp(vec![pattern("a", "p", "x")]),
                Algebra::bgp(vec![pattern("b", "p", "y")]),
            ),
            less_than("x", "y"),
        );
        let rendered = rewrite(algebra).data.to_string();
        assert!(rendered.starts_with("FilteredProduct("));
        assert!(!rendered.contains("Filter("));
    }

    #[test]
    fn connected_bgp_is_kept() {
        let algebra = Algebra::filter(
            Algebra::bgp(vec![pattern("a", "p", "x"), pattern("a", "q", "y")]),
            less_than("x", "y"),
        );
        assert!(!rewrite(algebra).transformed);
    }

    #[test]
    fn filter_on_one_side_is_kept() {
        let algebra = Algebra::filter(
            Algebra::bgp(vec![pattern("a", "p", "x"), pattern("b", "q", "y")]),
            less_than("a", "x"),
        );
        assert!(!rewrite(algebra).transformed);
    }
}
