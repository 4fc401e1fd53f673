use crate::optimizer::{AlgebraRule, OptimizerContext};
use crate::{Algebra, OrderExpression, Transformed};
use rdf_weave_model::Variable;

/// Sorts after removing duplicates instead of before.
///
/// `Distinct(Select(OrderBy(x, keys), vars))` becomes `OrderBy(Distinct(Select(x, vars)), keys)`.
/// The same applies to `Reduced`. Sorting the smaller, deduplicated multiset is cheaper.
///
/// The rewrite requires an explicit projection (not `SELECT *`) and sort keys that only
/// reference projected variables. Otherwise, the keys could reference variables that the
/// projection removes.
#[derive(Debug, Default)]
pub struct OrderByDistinctFusionRule;

impl OrderByDistinctFusionRule {
    /// Creates a new [OrderByDistinctFusionRule].
    pub fn new() -> Self {
        Self
    }
}

impl AlgebraRule for OrderByDistinctFusionRule {
    fn name(&self) -> &str {
        "order-by-distinct-fusion"
    }

    fn rewrite(&self, algebra: Algebra, _context: &OptimizerContext) -> Transformed<Algebra> {
        algebra.transform_up(&|node| match node {
            Algebra::Distinct { inner } => fuse(*inner, Algebra::distinct),
            Algebra::Reduced { inner } => fuse(*inner, Algebra::reduced),
            other => Transformed::no(other),
        })
    }
}

fn fuse(inner: Algebra, wrap: fn(Algebra) -> Algebra) -> Transformed<Algebra> {
    let (ordered, expressions, variables) = match inner {
        Algebra::Select { inner, variables } => match *inner {
            Algebra::OrderBy { inner, expressions } => (inner, expressions, variables),
            inner => return Transformed::no(wrap(Algebra::select(inner, variables))),
        },
        inner => return Transformed::no(wrap(inner)),
    };

    if !can_fuse(&ordered, &variables, &expressions) {
        let inner = Algebra::order_by(*ordered, expressions);
        return Transformed::no(wrap(Algebra::select(inner, variables)));
    }

    Transformed::yes(Algebra::order_by(
        wrap(Algebra::select(*ordered, variables)),
        expressions,
    ))
}

fn can_fuse(ordered: &Algebra, variables: &[Variable], expressions: &[OrderExpression]) -> bool {
    let in_scope = ordered.in_scope_variables();
    let is_wildcard = in_scope.len() == variables.len()
        && in_scope.iter().all(|variable| variables.contains(variable));
    if is_wildcard {
        return false;
    }

    expressions.iter().all(|expression| {
        expression
            .expression()
            .variables()
            .iter()
            .all(|variable| variables.contains(variable))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Expression;
    use insta::assert_snapshot;
    use rdf_weave_model::{NamedNode, TermPattern, TriplePattern};

    fn var(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    fn bgp() -> Algebra {
        Algebra::bgp(vec![TriplePattern {
            subject: TermPattern::from(var("s")),
            predicate: NamedNode::new_unchecked("http://ex/p").into(),
            object: TermPattern::from(var("o")),
        }])
    }

    fn ordered_projection(variables: Vec<Variable>, key: &str) -> Algebra {
        Algebra::select(
            Algebra::order_by(bgp(), vec![OrderExpression::Asc(var(key).into())]),
            variables,
        )
    }

    fn rewrite(algebra: Algebra) -> Transformed<Algebra> {
        OrderByDistinctFusionRule::new().rewrite(algebra, &OptimizerContext::default())
    }

    #[test]
    fn order_by_floats_above_distinct() {
        let algebra = Algebra::distinct(ordered_projection(vec![var("o")], "o"));
        let result = rewrite(algebra);
        assert!(result.transformed);
        assert_snapshot!(
            result.data,
            @"OrderBy(Distinct(Select(Bgp(?s <http://ex/p> ?o), ?o)), ASC(?o))"
        );
    }

    #[test]
    fn order_by_floats_above_reduced() {
        let algebra = Algebra::reduced(ordered_projection(vec![var("o")], "o"));
        let result = rewrite(algebra);
        assert!(result.data.to_string().starts_with("OrderBy(Reduced("));
    }

    #[test]
    fn select_all_is_kept() {
        let algebra = Algebra::distinct(ordered_projection(vec![var("s"), var("o")], "o"));
        let result = rewrite(algebra);
        assert!(!result.transformed);
        assert!(result.data.to_string().starts_with("Distinct("));
    }

    #[test]
    fn key_outside_of_projection_is_kept() {
        let algebra = Algebra::distinct(ordered_projection(vec![var("o")], "s"));
        assert!(!rewrite(algebra).transformed);
    }

    #[test]
    fn sort_key_expression_is_checked() {
        let key = Expression::Bound(var("s"));
        let algebra = Algebra::distinct(Algebra::select(
            Algebra::order_by(bgp(), vec![OrderExpression::Desc(key)]),
            vec![var("o")],
        ));
        assert!(!rewrite(algebra).transformed);
    }
}
