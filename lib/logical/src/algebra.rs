use crate::expression::{push_unique, write_separated};
use crate::{AggregateExpression, Expression, OrderExpression, PathExpression};
use rdf_weave_model::{GroundTerm, NamedNodePattern, TermPattern, TriplePattern, Variable};
use std::fmt::{Display, Formatter};

/// A node of the SPARQL algebra.
///
/// The tree is immutable. Optimizer rules consume a tree and return a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Algebra {
    /// A basic graph pattern. An empty BGP produces a single empty solution.
    Bgp { patterns: Vec<TriplePattern> },
    /// A BGP that stops after the first match.
    AskBgp { patterns: Vec<TriplePattern> },
    /// A BGP that stops after `limit` matches.
    LazyBgp {
        patterns: Vec<TriplePattern>,
        limit: usize,
    },
    /// A property path between two pattern positions.
    Path {
        subject: TermPattern,
        path: PathExpression,
        object: TermPattern,
    },
    /// A natural join. If the children share no variables this is a cross product.
    Join { lhs: Box<Algebra>, rhs: Box<Algebra> },
    /// An OPTIONAL with an optional filter folded into the join condition.
    LeftJoin {
        lhs: Box<Algebra>,
        rhs: Box<Algebra>,
        filter: Option<Expression>,
    },
    Union { lhs: Box<Algebra>, rhs: Box<Algebra> },
    /// A union that stops once `limit` solutions have been produced.
    LazyUnion {
        lhs: Box<Algebra>,
        rhs: Box<Algebra>,
        limit: usize,
    },
    /// A union that only evaluates `rhs` if `lhs` has no solution.
    AskUnion { lhs: Box<Algebra>, rhs: Box<Algebra> },
    Minus { lhs: Box<Algebra>, rhs: Box<Algebra> },
    Filter {
        inner: Box<Algebra>,
        expression: Expression,
    },
    /// A cross product of two children that is pruned by `expression` while it is generated.
    FilteredProduct {
        lhs: Box<Algebra>,
        rhs: Box<Algebra>,
        expression: Expression,
    },
    Extend {
        inner: Box<Algebra>,
        variable: Variable,
        expression: Expression,
    },
    Group {
        inner: Box<Algebra>,
        variables: Vec<Variable>,
        aggregates: Vec<(Variable, AggregateExpression)>,
    },
    OrderBy {
        inner: Box<Algebra>,
        expressions: Vec<OrderExpression>,
    },
    Distinct { inner: Box<Algebra> },
    Reduced { inner: Box<Algebra> },
    Slice {
        inner: Box<Algebra>,
        start: usize,
        length: Option<usize>,
    },
    /// Projects the solutions of `inner` onto `variables`.
    Select {
        inner: Box<Algebra>,
        variables: Vec<Variable>,
    },
    /// Evaluates `inner` against a named graph. A variable iterates over all named graphs.
    Graph {
        inner: Box<Algebra>,
        name: NamedNodePattern,
    },
    Service {
        name: NamedNodePattern,
        inner: Box<Algebra>,
        silent: bool,
    },
    /// Inline data. `None` is an unbound position.
    Values {
        variables: Vec<Variable>,
        bindings: Vec<Vec<Option<GroundTerm>>>,
    },
}

impl Algebra {
    pub fn bgp(patterns: Vec<TriplePattern>) -> Self {
        Algebra::Bgp { patterns }
    }

    pub fn join(lhs: Algebra, rhs: Algebra) -> Self {
        Algebra::Join {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn left_join(lhs: Algebra, rhs: Algebra, filter: Option<Expression>) -> Self {
        Algebra::LeftJoin {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            filter,
        }
    }

    pub fn union(lhs: Algebra, rhs: Algebra) -> Self {
        Algebra::Union {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn minus(lhs: Algebra, rhs: Algebra) -> Self {
        Algebra::Minus {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn filter(inner: Algebra, expression: Expression) -> Self {
        Algebra::Filter {
            inner: Box::new(inner),
            expression,
        }
    }

    pub fn extend(inner: Algebra, variable: Variable, expression: Expression) -> Self {
        Algebra::Extend {
            inner: Box::new(inner),
            variable,
            expression,
        }
    }

    pub fn select(inner: Algebra, variables: Vec<Variable>) -> Self {
        Algebra::Select {
            inner: Box::new(inner),
            variables,
        }
    }

    pub fn distinct(inner: Algebra) -> Self {
        Algebra::Distinct {
            inner: Box::new(inner),
        }
    }

    pub fn reduced(inner: Algebra) -> Self {
        Algebra::Reduced {
            inner: Box::new(inner),
        }
    }

    pub fn order_by(inner: Algebra, expressions: Vec<OrderExpression>) -> Self {
        Algebra::OrderBy {
            inner: Box::new(inner),
            expressions,
        }
    }

    pub fn slice(inner: Algebra, start: usize, length: Option<usize>) -> Self {
        Algebra::Slice {
            inner: Box::new(inner),
            start,
            length,
        }
    }

    pub fn graph(inner: Algebra, name: NamedNodePattern) -> Self {
        Algebra::Graph {
            inner: Box::new(inner),
            name,
        }
    }

    /// Returns every variable that may be bound by a solution of this node, in order of first
    /// appearance.
    pub fn in_scope_variables(&self) -> Vec<Variable> {
        let mut result = Vec::new();
        self.collect_in_scope_variables(&mut result);
        result
    }

    fn collect_in_scope_variables(&self, result: &mut Vec<Variable>) {
        match self {
            Algebra::Bgp { patterns }
            | Algebra::AskBgp { patterns }
            | Algebra::LazyBgp { patterns, .. } => {
                for pattern in patterns {
                    for variable in pattern_variables(pattern) {
                        push_unique(result, variable);
                    }
                }
            }
            Algebra::Path {
                subject, object, ..
            } => {
                for variable in [subject, object].into_iter().filter_map(term_variable) {
                    push_unique(result, variable);
                }
            }
            Algebra::Join { lhs, rhs }
            | Algebra::LeftJoin { lhs, rhs, .. }
            | Algebra::Union { lhs, rhs }
            | Algebra::LazyUnion { lhs, rhs, .. }
            | Algebra::AskUnion { lhs, rhs }
            | Algebra::FilteredProduct { lhs, rhs, .. } => {
                lhs.collect_in_scope_variables(result);
                rhs.collect_in_scope_variables(result);
            }
            Algebra::Minus { lhs: inner, .. }
            | Algebra::Filter { inner, .. }
            | Algebra::OrderBy { inner, .. }
            | Algebra::Distinct { inner }
            | Algebra::Reduced { inner }
            | Algebra::Slice { inner, .. }
            | Algebra::Service { inner, .. } => inner.collect_in_scope_variables(result),
            Algebra::Extend {
                inner, variable, ..
            } => {
                inner.collect_in_scope_variables(result);
                push_unique(result, variable);
            }
            Algebra::Group {
                variables,
                aggregates,
                ..
            } => {
                for variable in variables {
                    push_unique(result, variable);
                }
                for (variable, _) in aggregates {
                    push_unique(result, variable);
                }
            }
            Algebra::Select { variables, .. } | Algebra::Values { variables, .. } => {
                for variable in variables {
                    push_unique(result, variable);
                }
            }
            Algebra::Graph { inner, name } => {
                inner.collect_in_scope_variables(result);
                if let NamedNodePattern::Variable(variable) = name {
                    push_unique(result, variable);
                }
            }
        }
    }

    /// Returns the variables that are bound in every solution of this node.
    pub fn certain_variables(&self) -> Vec<Variable> {
        match self {
            Algebra::Bgp { .. }
            | Algebra::AskBgp { .. }
            | Algebra::LazyBgp { .. }
            | Algebra::Path { .. } => self.in_scope_variables(),
            Algebra::Join { lhs, rhs } | Algebra::FilteredProduct { lhs, rhs, .. } => {
                let mut result = lhs.certain_variables();
                for variable in rhs.certain_variables() {
                    push_unique(&mut result, &variable);
                }
                result
            }
            Algebra::LeftJoin { lhs: inner, .. }
            | Algebra::Minus { lhs: inner, .. }
            | Algebra::Filter { inner, .. }
            | Algebra::OrderBy { inner, .. }
            | Algebra::Distinct { inner }
            | Algebra::Reduced { inner }
            | Algebra::Slice { inner, .. }
            | Algebra::Extend { inner, .. }
            | Algebra::Service { inner, .. } => inner.certain_variables(),
            Algebra::Union { lhs, rhs }
            | Algebra::LazyUnion { lhs, rhs, .. }
            | Algebra::AskUnion { lhs, rhs } => {
                let rhs = rhs.certain_variables();
                lhs.certain_variables()
                    .into_iter()
                    .filter(|variable| rhs.contains(variable))
                    .collect()
            }
            Algebra::Group {
                inner, variables, ..
            } => {
                let inner = inner.certain_variables();
                variables
                    .iter()
                    .filter(|variable| inner.contains(variable))
                    .cloned()
                    .collect()
            }
            Algebra::Select { inner, variables } => {
                let inner = inner.certain_variables();
                variables
                    .iter()
                    .filter(|variable| inner.contains(variable))
                    .cloned()
                    .collect()
            }
            Algebra::Graph { inner, name } => {
                let mut result = inner.certain_variables();
                if let NamedNodePattern::Variable(variable) = name {
                    push_unique(&mut result, variable);
                }
                result
            }
            Algebra::Values {
                variables,
                bindings,
            } => variables
                .iter()
                .enumerate()
                .filter(|(i, _)| {
                    bindings
                        .iter()
                        .all(|row| row.get(*i).is_some_and(Option::is_some))
                })
                .map(|(_, variable)| variable.clone())
                .collect(),
        }
    }

    /// Applies `f` to every direct child of this node.
    ///
    /// The body of a `SERVICE` is not a child. It is handed to the endpoint as written, so
    /// rewrites never reach it.
    pub fn map_children<F>(self, mut f: F) -> Transformed<Algebra>
    where
        F: FnMut(Algebra) -> Transformed<Algebra>,
    {
        let mut transformed = false;
        let mut apply = |child: Box<Algebra>| {
            let result = f(*child);
            transformed |= result.transformed;
            Box::new(result.data)
        };

        let data = match self {
            leaf @ (Algebra::Bgp { .. }
            | Algebra::AskBgp { .. }
            | Algebra::LazyBgp { .. }
            | Algebra::Path { .. }
            | Algebra::Service { .. }
            | Algebra::Values { .. }) => leaf,
            Algebra::Join { lhs, rhs } => Algebra::Join {
                lhs: apply(lhs),
                rhs: apply(rhs),
            },
            Algebra::LeftJoin { lhs, rhs, filter } => Algebra::LeftJoin {
                lhs: apply(lhs),
                rhs: apply(rhs),
                filter,
            },
            Algebra::Union { lhs, rhs } => Algebra::Union {
                lhs: apply(lhs),
                rhs: apply(rhs),
            },
            Algebra::LazyUnion { lhs, rhs, limit } => Algebra::LazyUnion {
                lhs: apply(lhs),
                rhs: apply(rhs),
                limit,
            },
            Algebra::AskUnion { lhs, rhs } => Algebra::AskUnion {
                lhs: apply(lhs),
                rhs: apply(rhs),
            },
            Algebra::Minus { lhs, rhs } => Algebra::Minus {
                lhs: apply(lhs),
                rhs: apply(rhs),
            },
            Algebra::Filter { inner, expression } => Algebra::Filter {
                inner: apply(inner),
                expression,
            },
            Algebra::FilteredProduct {
                lhs,
                rhs,
                expression,
            } => Algebra::FilteredProduct {
                lhs: apply(lhs),
                rhs: apply(rhs),
                expression,
            },
            Algebra::Extend {
                inner,
                variable,
                expression,
            } => Algebra::Extend {
                inner: apply(inner),
                variable,
                expression,
            },
            Algebra::Group {
                inner,
                variables,
                aggregates,
            } => Algebra::Group {
                inner: apply(inner),
                variables,
                aggregates,
            },
            Algebra::OrderBy { inner, expressions } => Algebra::OrderBy {
                inner: apply(inner),
                expressions,
            },
            Algebra::Distinct { inner } => Algebra::Distinct {
                inner: apply(inner),
            },
            Algebra::Reduced { inner } => Algebra::Reduced {
                inner: apply(inner),
            },
            Algebra::Slice {
                inner,
                start,
                length,
            } => Algebra::Slice {
                inner: apply(inner),
                start,
                length,
            },
            Algebra::Select { inner, variables } => Algebra::Select {
                inner: apply(inner),
                variables,
            },
            Algebra::Graph { inner, name } => Algebra::Graph {
                inner: apply(inner),
                name,
            },
        };
        Transformed::new(data, transformed)
    }

    /// Rewrites the tree bottom-up. `f` sees each node after its children have been rewritten.
    pub fn transform_up<F>(self, f: &F) -> Transformed<Algebra>
    where
        F: Fn(Algebra) -> Transformed<Algebra>,
    {
        let children = self.map_children(|child| child.transform_up(f));
        let result = f(children.data);
        Transformed::new(result.data, children.transformed || result.transformed)
    }
}

/// The result of a rewrite, tracking whether anything changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed<T> {
    pub data: T,
    pub transformed: bool,
}

impl<T> Transformed<T> {
    pub fn new(data: T, transformed: bool) -> Self {
        Self { data, transformed }
    }

    pub fn yes(data: T) -> Self {
        Self::new(data, true)
    }

    pub fn no(data: T) -> Self {
        Self::new(data, false)
    }

    /// Maps the data while keeping the flag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Transformed<U> {
        Transformed::new(f(self.data), self.transformed)
    }
}

/// Returns the variables of a triple pattern in subject, predicate, object order.
pub fn pattern_variables(pattern: &TriplePattern) -> impl Iterator<Item = &Variable> {
    let predicate = match &pattern.predicate {
        NamedNodePattern::Variable(variable) => Some(variable),
        NamedNodePattern::NamedNode(_) => None,
    };
    term_variable(&pattern.subject)
        .into_iter()
        .chain(predicate)
        .chain(term_variable(&pattern.object))
}

/// Returns the variable if the term pattern is one.
pub fn term_variable(term: &TermPattern) -> Option<&Variable> {
    match term {
        TermPattern::Variable(variable) => Some(variable),
        _ => None,
    }
}

impl Display for Algebra {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Algebra::Bgp { patterns } => {
                f.write_str("Bgp(")?;
                write_patterns(f, patterns)?;
                f.write_str(")")
            }
            Algebra::AskBgp { patterns } => {
                f.write_str("AskBgp(")?;
                write_patterns(f, patterns)?;
                f.write_str(")")
            }
            Algebra::LazyBgp { patterns, limit } => {
                f.write_str("LazyBgp(")?;
                write_patterns(f, patterns)?;
                write!(f, "; limit {limit})")
            }
            Algebra::Path {
                subject,
                path,
                object,
            } => write!(f, "Path({subject} {path} {object})"),
            Algebra::Join { lhs, rhs } => write!(f, "Join({lhs}, {rhs})"),
            Algebra::LeftJoin { lhs, rhs, filter } => match filter {
                Some(filter) => write!(f, "LeftJoin({lhs}, {rhs}, {filter})"),
                None => write!(f, "LeftJoin({lhs}, {rhs})"),
            },
            Algebra::Union { lhs, rhs } => write!(f, "Union({lhs}, {rhs})"),
            Algebra::LazyUnion { lhs, rhs, limit } => {
                write!(f, "LazyUnion({lhs}, {rhs}; limit {limit})")
            }
            Algebra::AskUnion { lhs, rhs } => write!(f, "AskUnion({lhs}, {rhs})"),
            Algebra::Minus { lhs, rhs } => write!(f, "Minus({lhs}, {rhs})"),
            Algebra::Filter { inner, expression } => write!(f, "Filter({inner}, {expression})"),
            Algebra::FilteredProduct {
                lhs,
                rhs,
                expression,
            } => write!(f, "FilteredProduct({lhs}, {rhs}, {expression})"),
            Algebra::Extend {
                inner,
                variable,
                expression,
            } => write!(f, "Extend({inner}, {variable} := {expression})"),
            Algebra::Group {
                inner,
                variables,
                aggregates,
            } => {
                write!(f, "GroupBy({inner}, [")?;
                write_separated(f, variables, " ")?;
                f.write_str("], [")?;
                for (i, (variable, aggregate)) in aggregates.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{variable} := {aggregate}")?;
                }
                f.write_str("])")
            }
            Algebra::OrderBy { inner, expressions } => {
                write!(f, "OrderBy({inner}, ")?;
                write_separated(f, expressions, " ")?;
                f.write_str(")")
            }
            Algebra::Distinct { inner } => write!(f, "Distinct({inner})"),
            Algebra::Reduced { inner } => write!(f, "Reduced({inner})"),
            Algebra::Slice {
                inner,
                start,
                length,
            } => match length {
                Some(length) => write!(f, "Slice({inner}, {start}, {length})"),
                None => write!(f, "Slice({inner}, {start}, *)"),
            },
            Algebra::Select { inner, variables } => {
                write!(f, "Select({inner}, ")?;
                write_separated(f, variables, " ")?;
                f.write_str(")")
            }
            Algebra::Graph { inner, name } => write!(f, "Graph({inner}, {name})"),
            Algebra::Service {
                name,
                inner,
                silent,
            } => {
                if *silent {
                    write!(f, "Service({name}, {inner}, silent)")
                } else {
                    write!(f, "Service({name}, {inner})")
                }
            }
            Algebra::Values {
                variables,
                bindings,
            } => {
                f.write_str("Values(")?;
                write_separated(f, variables, " ")?;
                write!(f, "; {} rows)", bindings.len())
            }
        }
    }
}

fn write_patterns(f: &mut Formatter<'_>, patterns: &[TriplePattern]) -> std::fmt::Result {
    for (i, pattern) in patterns.iter().enumerate() {
        if i > 0 {
            f.write_str(" . ")?;
        }
        write!(
            f,
            "{} {} {}",
            pattern.subject, pattern.predicate, pattern.object
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_weave_model::NamedNode;

    fn var(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    fn pattern(subject: &str, predicate: &str, object: &str) -> TriplePattern {
        TriplePattern {
            subject: var(subject).into(),
            predicate: NamedNode::new_unchecked(format!("http://example.com/{predicate}")).into(),
            object: var(object).into(),
        }
    }

    #[test]
    fn in_scope_variables_follow_first_appearance() {
        let algebra = Algebra::join(
            Algebra::bgp(vec![pattern("b", "p", "a")]),
            Algebra::extend(
                Algebra::bgp(vec![pattern("a", "q", "c")]),
                var("d"),
                Expression::Variable(var("c")),
            ),
        );
        assert_eq!(
            algebra.in_scope_variables(),
            vec![var("b"), var("a"), var("c"), var("d")]
        );
    }

    #[test]
    fn certain_variables_of_optional_and_union() {
        let optional = Algebra::left_join(
            Algebra::bgp(vec![pattern("s", "p", "o")]),
            Algebra::bgp(vec![pattern("s", "q", "x")]),
            None,
        );
        assert_eq!(optional.certain_variables(), vec![var("s"), var("o")]);

        let union = Algebra::union(
            Algebra::bgp(vec![pattern("s", "p", "o")]),
            Algebra::bgp(vec![pattern("s", "q", "x")]),
        );
        assert_eq!(union.certain_variables(), vec![var("s")]);
    }

    #[test]
    fn certain_variables_of_values() {
        let values = Algebra::Values {
            variables: vec![var("a"), var("b")],
            bindings: vec![
                vec![Some(NamedNode::new_unchecked("http://example.com/x").into()), None],
                vec![
                    Some(NamedNode::new_unchecked("http://example.com/y").into()),
                    Some(NamedNode::new_unchecked("http://example.com/z").into()),
                ],
            ],
        };
        assert_eq!(values.certain_variables(), vec![var("a")]);
    }

    #[test]
    fn transform_up_reports_changes() {
        let algebra = Algebra::distinct(Algebra::bgp(vec![pattern("s", "p", "o")]));
        let result = algebra.clone().transform_up(&|node| match node {
            Algebra::Bgp { patterns } => Transformed::yes(Algebra::AskBgp { patterns }),
            other => Transformed::no(other),
        });
        assert!(result.transformed);
        assert_eq!(
            result.data.to_string(),
            "Distinct(AskBgp(?s <http://example.com/p> ?o))"
        );

        let unchanged = algebra.transform_up(&Transformed::no);
        assert!(!unchanged.transformed);
    }

    #[test]
    fn display_slice_and_left_join() {
        let algebra = Algebra::slice(
            Algebra::left_join(
                Algebra::bgp(vec![pattern("s", "p", "o")]),
                Algebra::bgp(vec![pattern("s", "q", "x")]),
                Some(Expression::Bound(var("x"))),
            ),
            2,
            None,
        );
        assert_eq!(
            algebra.to_string(),
            "Slice(LeftJoin(Bgp(?s <http://example.com/p> ?o), Bgp(?s <http://example.com/q> ?x), BOUND(?x)), 2, *)"
        );
    }
}
