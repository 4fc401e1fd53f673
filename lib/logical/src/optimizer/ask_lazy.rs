use crate::optimizer::{AlgebraRule, OptimizerContext};
use crate::{Algebra, Transformed};

/// Replaces BGPs and unions with variants that stop early if only a prefix of the solutions is
/// needed.
///
/// Under an ASK query, the root only needs a single solution. Under a LIMIT, the slice only needs
/// `offset + limit` solutions. This demand is propagated through the operators that do not
/// change the number of solutions (projections, BIND, GRAPH) and into the required side of an
/// OPTIONAL. For ASK, it is also propagated through DISTINCT and ORDER BY. Every other operator
/// stops the propagation.
#[derive(Debug, Default)]
pub struct AskLazySpecializationRule;

impl AskLazySpecializationRule {
    /// Creates a new [AskLazySpecializationRule].
    pub fn new() -> Self {
        Self
    }
}

impl AlgebraRule for AskLazySpecializationRule {
    fn name(&self) -> &str {
        "ask-lazy-specialization"
    }

    fn rewrite(&self, algebra: Algebra, context: &OptimizerContext) -> Transformed<Algebra> {
        let demand = context.ask_query.then_some(Demand::Ask);
        specialize(algebra, demand)
    }
}

/// How many solutions an operator must produce at most.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Demand {
    Ask,
    Lazy(usize),
}

impl Demand {
    fn rows(self) -> usize {
        match self {
            Demand::Ask => 1,
            Demand::Lazy(rows) => rows,
        }
    }
}

fn specialize(algebra: Algebra, demand: Option<Demand>) -> Transformed<Algebra> {
    match (algebra, demand) {
        (
            Algebra::Slice {
                inner,
                start,
                length,
            },
            demand,
        ) => {
            let inner_demand = slice_demand(start, length, demand);
            specialize(*inner, inner_demand).map(|inner| Algebra::slice(inner, start, length))
        }
        (Algebra::Bgp { patterns }, Some(Demand::Ask)) => {
            Transformed::yes(Algebra::AskBgp { patterns })
        }
        (Algebra::Bgp { patterns }, Some(Demand::Lazy(limit))) => {
            Transformed::yes(Algebra::LazyBgp { patterns, limit })
        }
        (Algebra::Union { lhs, rhs }, Some(demand)) => {
            let lhs = Box::new(specialize(*lhs, Some(demand)).data);
            let rhs = Box::new(specialize(*rhs, Some(demand)).data);
            Transformed::yes(match demand {
                Demand::Ask => Algebra::AskUnion { lhs, rhs },
                Demand::Lazy(limit) => Algebra::LazyUnion { lhs, rhs, limit },
            })
        }
        (
            node @ (Algebra::Select { .. } | Algebra::Extend { .. } | Algebra::Graph { .. }),
            Some(demand),
        ) => node.map_children(|child| specialize(child, Some(demand))),
        (
            node @ (Algebra::Distinct { .. } | Algebra::Reduced { .. } | Algebra::OrderBy { .. }),
            Some(Demand::Ask),
        ) => node.map_children(|child| specialize(child, Some(Demand::Ask))),
        (Algebra::LeftJoin { lhs, rhs, filter }, Some(demand)) => {
            let lhs = specialize(*lhs, Some(demand));
            let rhs = specialize(*rhs, None);
            Transformed::new(
                Algebra::left_join(lhs.data, rhs.data, filter),
                lhs.transformed || rhs.transformed,
            )
        }
        (node, _) => node.map_children(|child| specialize(child, None)),
    }
}

/// Computes the demand below a slice.
fn slice_demand(start: usize, length: Option<usize>, outer: Option<Demand>) -> Option<Demand> {
    let rows = match (length, outer.map(Demand::rows)) {
        (Some(length), Some(outer)) => length.min(outer),
        (Some(length), None) => length,
        (None, Some(outer)) => outer,
        (None, None) => return None,
    };
    if start == 0 && outer == Some(Demand::Ask) {
        Some(Demand::Ask)
    } else {
        Some(Demand::Lazy(start.saturating_add(rows)))
    }
}
