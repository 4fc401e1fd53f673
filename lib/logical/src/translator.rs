use crate::{Algebra, PathExpression};
use rdf_weave_model::{TermPattern, TriplePattern, Variable};

/// Lowers property paths into algebra.
///
/// Paths that are plain joins and unions of predicates (`Property`, `Inverse`, `Sequence` and
/// `Alternative`) become BGPs, joins and unions. The intermediate nodes of a sequence are bound
/// to fresh variables that a projection removes again. Closures, optional steps, fixed
/// cardinalities and negated property sets stay as [`Algebra::Path`] nodes and are evaluated by
/// graph traversal.
#[derive(Debug, Default)]
pub struct PathTranslator {
    next_variable: usize,
}

impl PathTranslator {
    /// Creates a new [PathTranslator].
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates the path pattern `subject path object`.
    pub fn translate(
        &mut self,
        subject: &TermPattern,
        path: &PathExpression,
        object: &TermPattern,
    ) -> Algebra {
        let fresh_before = self.next_variable;
        let algebra = self.translate_inner(subject, path, object);
        if self.next_variable == fresh_before {
            return algebra;
        }

        let mut variables = Vec::new();
        for term in [subject, object] {
            if let TermPattern::Variable(variable) = term {
                if !variables.contains(variable) {
                    variables.push(variable.clone());
                }
            }
        }
        Algebra::select(algebra, variables)
    }

    fn translate_inner(
        &mut self,
        subject: &TermPattern,
        path: &PathExpression,
        object: &TermPattern,
    ) -> Algebra {
        match path {
            PathExpression::Property(predicate) => Algebra::bgp(vec![TriplePattern {
                subject: subject.clone(),
                predicate: predicate.clone().into(),
                object: object.clone(),
            }]),
            PathExpression::Inverse(inner) => self.translate_inner(object, inner, subject),
            PathExpression::Sequence(lhs, rhs) => {
                let middle = TermPattern::Variable(self.fresh_variable());
                let lhs = self.translate_inner(subject, lhs, &middle);
                let rhs = self.translate_inner(&middle, rhs, object);
                merge_join(lhs, rhs)
            }
            PathExpression::Alternative(lhs, rhs) => {
                let lhs = self.translate_inner(subject, lhs, object);
                let rhs = self.translate_inner(subject, rhs, object);
                Algebra::union(lhs, rhs)
            }
            PathExpression::ZeroOrMore(_)
            | PathExpression::OneOrMore(_)
            | PathExpression::ZeroOrOne(_)
            | PathExpression::FixedCardinality(_, _)
            | PathExpression::NegatedPropertySet { .. } => Algebra::Path {
                subject: subject.clone(),
                path: path.clone(),
                object: object.clone(),
            },
        }
    }

    fn fresh_variable(&mut self) -> Variable {
        let variable = Variable::new_unchecked(format!("__path{}", self.next_variable));
        self.next_variable += 1;
        variable
    }
}

/// Joins two translated steps. Two BGPs are merged into one so that later rewrites can reorder
/// their patterns.
fn merge_join(lhs: Algebra, rhs: Algebra) -> Algebra {
    match (lhs, rhs) {
        (Algebra::Bgp { mut patterns }, Algebra::Bgp { patterns: rhs }) => {
            patterns.extend(rhs);
            Algebra::Bgp { patterns }
        }
        (lhs, rhs) => Algebra::join(lhs, rhs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use rdf_weave_model::NamedNode;

    fn var(name: &str) -> TermPattern {
        Variable::new_unchecked(name).into()
    }

    fn p(name: &str) -> PathExpression {
        NamedNode::new_unchecked(format!("http://ex/{name}")).into()
    }

    #[test]
    fn inverse_swaps_endpoints() {
        let algebra =
            PathTranslator::new().translate(&var("s"), &PathExpression::inverse(p("a")), &var("o"));
        assert_snapshot!(algebra, @"Bgp(?o <http://ex/a> ?s)");
    }

    #[test]
    fn sequence_becomes_projected_bgp() {
        let path = PathExpression::sequence(p("a"), PathExpression::sequence(p("b"), p("c")));
        let algebra = PathTranslator::new().translate(&var("s"), &path, &var("o"));
        assert_snapshot!(
            algebra,
            @"Select(Bgp(?s <http://ex/a> ?__path0 . ?__path0 <http://ex/b> ?__path1 . ?__path1 <http://ex/c> ?o), ?s ?o)"
        );
    }

    #[test]
    fn alternative_becomes_union() {
        let path = PathExpression::alternative(p("a"), PathExpression::inverse(p("b")));
        let algebra = PathTranslator::new().translate(&var("s"), &path, &var("o"));
        assert_snapshot!(algebra, @"Union(Bgp(?s <http://ex/a> ?o), Bgp(?o <http://ex/b> ?s))");
    }

    #[test]
    fn closure_inside_sequence_is_joined() {
        let path = PathExpression::sequence(PathExpression::one_or_more(p("a")), p("b"));
        let algebra = PathTranslator::new().translate(&var("s"), &path, &var("o"));
        assert_snapshot!(
            algebra,
            @"Select(Join(Path(?s (<http://ex/a>)+ ?__path0), Bgp(?__path0 <http://ex/b> ?o)), ?s ?o)"
        );
    }

    #[test]
    fn closure_stays_a_path() {
        let path = PathExpression::zero_or_more(p("a"));
        let algebra = PathTranslator::new().translate(&var("s"), &path, &var("s"));
        assert_snapshot!(algebra, @"Path(?s (<http://ex/a>)* ?s)");
    }
}
