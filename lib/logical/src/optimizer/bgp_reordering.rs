use crate::algebra::pattern_variables;
use crate::optimizer::{AlgebraRule, OptimizerContext};
use crate::{Algebra, Transformed};
use rdf_weave_model::{TriplePattern, Variable};
use rustc_hash::FxHashSet;

/// Reorders the triple patterns of a BGP.
///
/// The BGP is evaluated by substituting the bindings of the patterns evaluated so far into the
/// next one. Hence, the rule greedily picks the next pattern:
/// 1. A pattern that shares a variable with the patterns picked so far (avoids cross products).
/// 2. A pattern with the fewest variables that are not yet bound (more selective).
/// 3. The pattern that came first in the original order.
///
/// The ordering is stable: reordering an already reordered BGP does not change it.
#[derive(Debug, Default)]
pub struct BgpReorderingRule;

impl BgpReorderingRule {
    /// Creates a new [BgpReorderingRule].
    pub fn new() -> Self {
        Self
    }
}

impl AlgebraRule for BgpReorderingRule {
    fn name(&self) -> &str {
        "bgp-reordering"
    }

    fn rewrite(&self, algebra: Algebra, _context: &OptimizerContext) -> Transformed<Algebra> {
        algebra.transform_up(&|node| match node {
            Algebra::Bgp { patterns } => {
                reorder_patterns(patterns).map(|patterns| Algebra::Bgp { patterns })
            }
            Algebra::AskBgp { patterns } => {
                reorder_patterns(patterns).map(|patterns| Algebra::AskBgp { patterns })
            }
            Algebra::LazyBgp { patterns, limit } => {
                reorder_patterns(patterns).map(|patterns| Algebra::LazyBgp { patterns, limit })
            }
            other => Transformed::no(other),
        })
    }
}

/// Returns the patterns in evaluation order.
pub(crate) fn reorder_patterns(patterns: Vec<TriplePattern>) -> Transformed<Vec<TriplePattern>> {
    if patterns.len() < 2 {
        return Transformed::no(patterns);
    }

    let mut bound = FxHashSet::<&Variable>::default();
    let mut remaining = (0..patterns.len()).collect::<Vec<_>>();
    let mut order = Vec::with_capacity(patterns.len());
    while !remaining.is_empty() {
        let best = remaining
            .iter()
            .enumerate()
            .min_by_key(|(_, index)| {
                let pattern = &patterns[**index];
                let variables = pattern_variables(pattern).collect::<FxHashSet<_>>();
                let shares_bound = variables.iter().any(|variable| bound.contains(variable));
                let unbound = variables
                    .iter()
                    .filter(|variable| !bound.contains(*variable))
                    .count();
                (!shares_bound, unbound, **index)
            })
            .map(|(position, _)| position);
        let Some(best) = best else {
            break;
        };

        let index = remaining.remove(best);
        bound.extend(pattern_variables(&patterns[index]));
        order.push(index);
    }

    if order.iter().enumerate().all(|(i, index)| i == *index) {
        return Transformed::no(patterns);
    }

    let mut slots = patterns.into_iter().map(Some).collect::<Vec<_>>();
    let reordered = order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect();
    Transformed::yes(reordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use rdf_weave_model::{NamedNode, TermPattern};

    fn term(value: &str) -> TermPattern {
        match value.strip_prefix('?') {
            Some(name) => Variable::new_unchecked(name).into(),
            None => NamedNode::new_unchecked(format!("http://ex/{value}")).into(),
        }
    }

    fn pattern(subject: &str, predicate: &str, object: &str) -> TriplePattern {
        TriplePattern {
            subject: term(subject),
            predicate: NamedNode::new_unchecked(format!("http://ex/{predicate}")).into(),
            object: term(object),
        }
    }

    fn rewrite(patterns: Vec<TriplePattern>) -> Transformed<Algebra> {
        BgpReorderingRule::new().rewrite(Algebra::bgp(patterns), &OptimizerContext::default())
    }

    #[test]
    fn selective_pattern_moves_first() {
        let result = rewrite(vec![
            pattern("?s", "p", "?o"),
            pattern("?s", "type", "Car"),
        ]);
        assert!(result.transformed);
        assert_snapshot!(result.data, @"Bgp(?s <http://ex/type> <http://ex/Car> . ?s <http://ex/p> ?o)");
    }

    #[test]
    fn connected_pattern_is_preferred_over_cross_product() {
        let result = rewrite(vec![
            pattern("a", "p", "?x"),
            pattern("?y", "q", "?z"),
            pattern("?x", "r", "?y"),
        ]);
        assert_snapshot!(
            result.data,
            @"Bgp(<http://ex/a> <http://ex/p> ?x . ?x <http://ex/r> ?y . ?y <http://ex/q> ?z)"
        );
    }

    #[test]
    fn reordering_is_idempotent() {
        let first = rewrite(vec![
            pattern("?a", "p", "?b"),
            pattern("?c", "p", "?d"),
            pattern("?b", "p", "x"),
        ]);
        assert!(first.transformed);

        let second = BgpReorderingRule::new().rewrite(first.data.clone(), &OptimizerContext::default());
        assert!(!second.transformed);
        assert_eq!(first.data, second.data);
    }

    #[test]
    fn single_pattern_is_unchanged() {
        let result = rewrite(vec![pattern("?s", "p", "?o")]);
        assert!(!result.transformed);
    }
}
