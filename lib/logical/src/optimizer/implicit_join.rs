use crate::algebra::pattern_variables;
use crate::optimizer::{AlgebraRule, OptimizerContext};
use crate::{Algebra, Expression, Transformed};
use rdf_weave_functions::{BuiltinName, FunctionName};
use rdf_weave_model::{NamedNodePattern, TermPattern, TriplePattern, Variable};

/// Turns an equality filter between two variables of the same BGP into a join on a shared
/// variable.
///
/// `Filter(Bgp(.. ?a .. ?b ..), sameTerm(?a, ?b))` becomes `Extend(Bgp(.. ?a .. ?a ..), ?b := ?a)`.
///
/// `sameTerm` always qualifies. `=` compares literals by value (e.g., `1 = 1.0`), so it only
/// qualifies if both variables exclusively occur in subject or predicate positions, which can
/// only hold IRIs and blank nodes.
///
/// Only filters that directly wrap a BGP are considered. A variable that crosses a subquery or an
/// OPTIONAL is never part of the same BGP, so the filter stays in place there.
#[derive(Debug, Default)]
pub struct ImplicitJoinRule;

impl ImplicitJoinRule {
    /// Creates a new [ImplicitJoinRule].
    pub fn new() -> Self {
        Self
    }
}

impl AlgebraRule for ImplicitJoinRule {
    fn name(&self) -> &str {
        "implicit-join"
    }

    fn rewrite(&self, algebra: Algebra, _context: &OptimizerContext) -> Transformed<Algebra> {
        algebra.transform_up(&|node| match node {
            Algebra::Filter { inner, expression } => match (*inner, expression) {
                (Algebra::Bgp { patterns }, expression) => rewrite_filter(patterns, expression),
                (inner, expression) => Transformed::no(Algebra::filter(inner, expression)),
            },
            other => Transformed::no(other),
        })
    }
}

fn rewrite_filter(patterns: Vec<TriplePattern>, expression: Expression) -> Transformed<Algebra> {
    let Some((kept, replaced)) = implicit_join_variables(&patterns, &expression) else {
        return Transformed::no(Algebra::filter(Algebra::bgp(patterns), expression));
    };

    let patterns = patterns
        .into_iter()
        .map(|pattern| substitute(pattern, &replaced, &kept))
        .collect();
    Transformed::yes(Algebra::extend(
        Algebra::bgp(patterns),
        replaced,
        Expression::Variable(kept),
    ))
}

/// Returns the variable to keep and the variable to replace if the rewrite applies.
fn implicit_join_variables(
    patterns: &[TriplePattern],
    expression: &Expression,
) -> Option<(Variable, Variable)> {
    let Expression::Call(FunctionName::Builtin(builtin), args) = expression else {
        return None;
    };
    let [Expression::Variable(lhs), Expression::Variable(rhs)] = args.as_slice() else {
        return None;
    };
    if lhs == rhs {
        return None;
    }

    let occurs = |variable: &Variable| {
        patterns
            .iter()
            .any(|pattern| pattern_variables(pattern).any(|v| v == variable))
    };
    if !occurs(lhs) || !occurs(rhs) {
        return None;
    }

    match builtin {
        BuiltinName::SameTerm => {}
        BuiltinName::Equal => {
            let in_object_position = |variable: &Variable| {
                patterns.iter().any(
                    |pattern| matches!(&pattern.object, TermPattern::Variable(v) if v == variable),
                )
            };
            if in_object_position(lhs) || in_object_position(rhs) {
                return None;
            }
        }
        _ => return None,
    }

    Some((lhs.clone(), rhs.clone()))
}

fn substitute(pattern: TriplePattern, from: &Variable, to: &Variable) -> TriplePattern {
    let substitute_term = |term: TermPattern| match term {
        TermPattern::Variable(variable) if variable == *from => TermPattern::Variable(to.clone()),
        term => term,
    };
    let predicate = match pattern.predicate {
        NamedNodePattern::Variable(variable) if variable == *from => {
            NamedNodePattern::Variable(to.clone())
        }
        predicate => predicate,
    };
    TriplePattern {
        subject: substitute_term(pattern.subject),
        predicate,
        object: substitute_term(pattern.object),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use rdf_weave_model::vocab::rdf;

    fn var(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    fn type_pattern(subject: &str, object: &str) -> TriplePattern {
        TriplePattern {
            subject: var(subject).into(),
            predicate: rdf::TYPE.into_owned().into(),
            object: var(object).into(),
        }
    }

    fn rewrite(algebra: Algebra) -> Transformed<Algebra> {
        ImplicitJoinRule::new().rewrite(algebra, &OptimizerContext::default())
    }

    #[test]
    fn equality_on_subjects_becomes_extend() {
        let algebra = Algebra::filter(
            Algebra::bgp(vec![type_pattern("x", "type"), type_pattern("y", "type")]),
            Expression::equal(var("x").into(), var("y").into()),
        );
        let result = rewrite(algebra);
        assert!(result.transformed);
        assert_snapshot!(
            result.data,
            @"Extend(Bgp(?x <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> ?type . ?x <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> ?type), ?y := ?x)"
        );
    }

    #[test]
    fn equality_on_objects_is_kept() {
        let algebra = Algebra::filter(
            Algebra::bgp(vec![type_pattern("x", "a"), type_pattern("y", "b")]),
            Expression::equal(var("a").into(), var("b").into()),
        );
        let result = rewrite(algebra);
        assert!(!result.transformed);
        assert!(result.data.to_string().starts_with("Filter("));
    }

    #[test]
    fn same_term_on_objects_becomes_extend() {
        let algebra = Algebra::filter(
            Algebra::bgp(vec![type_pattern("x", "a"), type_pattern("y", "b")]),
            Expression::same_term(var("a").into(), var("b").into()),
        );
        let result = rewrite(algebra);
        assert!(result.transformed);
        assert!(result.data.to_string().contains(", ?b := ?a)"));
    }

    #[test]
    fn variable_outside_of_bgp_is_kept() {
        let algebra = Algebra::filter(
            Algebra::bgp(vec![type_pattern("y", "type")]),
            Expression::same_term(var("x").into(), var("y").into()),
        );
        assert!(!rewrite(algebra).transformed);
    }
}
