use crate::sparql::rewriting::GraphPatternRewriter;
use rdf_weave_functions::{BuiltinName, FunctionName};
use rdf_weave_logical::Expression;
use spargebra::algebra::Expression as SparqlExpression;

/// Rewrites SPARQL expressions. Operators become calls to builtin functions.
pub(super) struct ExpressionRewriter<'rewriter> {
    graph_rewriter: &'rewriter GraphPatternRewriter,
}

impl<'rewriter> ExpressionRewriter<'rewriter> {
    /// Creates a new expression rewriter. `graph_rewriter` rewrites the patterns of `EXISTS`.
    pub fn new(graph_rewriter: &'rewriter GraphPatternRewriter) -> Self {
        Self { graph_rewriter }
    }

    /// Rewrites an [Expression](SparqlExpression).
    pub fn rewrite(&self, expression: &SparqlExpression) -> Expression {
        match expression {
            SparqlExpression::NamedNode(node) => Expression::NamedNode(node.clone()),
            SparqlExpression::Literal(literal) => Expression::Literal(literal.clone()),
            SparqlExpression::Variable(variable) => Expression::Variable(variable.clone()),
            SparqlExpression::Bound(variable) => Expression::Bound(variable.clone()),
            SparqlExpression::Or(lhs, rhs) => {
                Expression::Or(Box::new(self.rewrite(lhs)), Box::new(self.rewrite(rhs)))
            }
            SparqlExpression::And(lhs, rhs) => {
                Expression::And(Box::new(self.rewrite(lhs)), Box::new(self.rewrite(rhs)))
            }
            SparqlExpression::In(lhs, rhs) => {
                Expression::In(Box::new(self.rewrite(lhs)), self.rewrite_all(rhs))
            }
            SparqlExpression::Not(inner) => Expression::not(self.rewrite(inner)),
            SparqlExpression::Equal(lhs, rhs) => self.binary(BuiltinName::Equal, lhs, rhs),
            SparqlExpression::SameTerm(lhs, rhs) => self.binary(BuiltinName::SameTerm, lhs, rhs),
            SparqlExpression::Greater(lhs, rhs) => self.binary(BuiltinName::GreaterThan, lhs, rhs),
            SparqlExpression::GreaterOrEqual(lhs, rhs) => {
                self.binary(BuiltinName::GreaterOrEqual, lhs, rhs)
            }
            SparqlExpression::Less(lhs, rhs) => self.binary(BuiltinName::LessThan, lhs, rhs),
            SparqlExpression::LessOrEqual(lhs, rhs) => {
                self.binary(BuiltinName::LessOrEqual, lhs, rhs)
            }
            SparqlExpression::Add(lhs, rhs) => self.binary(BuiltinName::Add, lhs, rhs),
            SparqlExpression::Subtract(lhs, rhs) => self.binary(BuiltinName::Sub, lhs, rhs),
            SparqlExpression::Multiply(lhs, rhs) => self.binary(BuiltinName::Mul, lhs, rhs),
            SparqlExpression::Divide(lhs, rhs) => self.binary(BuiltinName::Div, lhs, rhs),
            SparqlExpression::UnaryPlus(inner) => {
                Expression::builtin(BuiltinName::UnaryPlus, vec![self.rewrite(inner)])
            }
            SparqlExpression::UnaryMinus(inner) => {
                Expression::builtin(BuiltinName::UnaryMinus, vec![self.rewrite(inner)])
            }
            SparqlExpression::Exists(pattern) => Expression::Exists(Box::new(
                self.graph_rewriter.rewrite_graph_pattern(pattern),
            )),
            SparqlExpression::If(test, if_true, if_false) => Expression::If(
                Box::new(self.rewrite(test)),
                Box::new(self.rewrite(if_true)),
                Box::new(self.rewrite(if_false)),
            ),
            SparqlExpression::Coalesce(args) => Expression::Coalesce(self.rewrite_all(args)),
            SparqlExpression::FunctionCall(function, args) => {
                Expression::Call(FunctionName::from(function), self.rewrite_all(args))
            }
        }
    }

    fn rewrite_all(&self, expressions: &[SparqlExpression]) -> Vec<Expression> {
        expressions.iter().map(|e| self.rewrite(e)).collect()
    }

    fn binary(
        &self,
        name: BuiltinName,
        lhs: &SparqlExpression,
        rhs: &SparqlExpression,
    ) -> Expression {
        Expression::builtin(name, vec![self.rewrite(lhs), self.rewrite(rhs)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_weave_model::{Literal, Variable};

    #[test]
    fn operators_become_builtin_calls() {
        let rewriter = GraphPatternRewriter::new();
        let expression = SparqlExpression::Add(
            Box::new(Variable::new_unchecked("x").into()),
            Box::new(Literal::from(1).into()),
        );
        let rewritten = ExpressionRewriter::new(&rewriter).rewrite(&expression);
        assert_eq!(
            rewritten,
            Expression::builtin(
                BuiltinName::Add,
                vec![
                    Variable::new_unchecked("x").into(),
                    Literal::from(1).into()
                ]
            )
        );
    }

    #[test]
    fn not_exists_wraps_the_pattern() {
        let rewriter = GraphPatternRewriter::new();
        let expression = SparqlExpression::Not(Box::new(SparqlExpression::Exists(Box::default())));
        let rewritten = ExpressionRewriter::new(&rewriter).rewrite(&expression);
        assert!(rewritten.contains_exists());
    }
}
