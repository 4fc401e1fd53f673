use crate::context::ActiveGraph;
use crate::error::EvaluationError;
use crate::eval::Evaluator;
use crate::{Bindings, EvaluationContext};
use rdf_weave_functions::{BuiltinName, FunctionName};
use rdf_weave_logical::Expression;
use rdf_weave_model::{Literal, Term, ThinError, ThinResult, TypedValue, Variable};

/// An [Expression] that has been bound to the variables of a multiset.
///
/// Variables are resolved to column positions and `EXISTS` patterns are evaluated once while
/// compiling. Evaluating a compiled expression for a row then only touches the row itself.
#[derive(Debug)]
pub(crate) enum PhysicalExpression {
    Constant(Term),
    Variable(usize),
    /// A variable that is not part of the multiset. It is always unbound.
    Unbound,
    Or(Box<PhysicalExpression>, Box<PhysicalExpression>),
    And(Box<PhysicalExpression>, Box<PhysicalExpression>),
    In(Box<PhysicalExpression>, Vec<PhysicalExpression>),
    Bound(Option<usize>),
    If(
        Box<PhysicalExpression>,
        Box<PhysicalExpression>,
        Box<PhysicalExpression>,
    ),
    Coalesce(Vec<PhysicalExpression>),
    /// The solutions of the `EXISTS` pattern and the pairs of (row position, solution position)
    /// of the variables they share with the row.
    Exists {
        solutions: Bindings,
        shared: Vec<(usize, usize)>,
    },
    Call(FunctionName, Vec<PhysicalExpression>),
}

/// Compiles `expression` against a row layout given by `variables`.
pub(crate) fn compile(
    evaluator: &Evaluator<'_>,
    expression: &Expression,
    variables: &[Variable],
    graph: &ActiveGraph,
) -> Result<PhysicalExpression, EvaluationError> {
    let compile_all = |expressions: &[Expression]| {
        expressions
            .iter()
            .map(|expression| compile(evaluator, expression, variables, graph))
            .collect::<Result<Vec<_>, _>>()
    };
    let compile_boxed = |expression: &Expression| {
        compile(evaluator, expression, variables, graph).map(Box::new)
    };

    Ok(match expression {
        Expression::NamedNode(node) => PhysicalExpression::Constant(node.clone().into()),
        Expression::Literal(literal) => PhysicalExpression::Constant(literal.clone().into()),
        Expression::Variable(variable) => match position(variables, variable) {
            Some(index) => PhysicalExpression::Variable(index),
            None => PhysicalExpression::Unbound,
        },
        Expression::Or(lhs, rhs) => PhysicalExpression::Or(compile_boxed(lhs)?, compile_boxed(rhs)?),
        Expression::And(lhs, rhs) => {
            PhysicalExpression::And(compile_boxed(lhs)?, compile_boxed(rhs)?)
        }
        Expression::In(value, list) => {
            PhysicalExpression::In(compile_boxed(value)?, compile_all(list)?)
        }
        Expression::Bound(variable) => PhysicalExpression::Bound(position(variables, variable)),
        Expression::If(condition, then, otherwise) => PhysicalExpression::If(
            compile_boxed(condition)?,
            compile_boxed(then)?,
            compile_boxed(otherwise)?,
        ),
        Expression::Coalesce(args) => PhysicalExpression::Coalesce(compile_all(args)?),
        Expression::Exists(pattern) => {
            let solutions = evaluator.evaluate(pattern, graph)?.into_bindings();
            let shared = variables
                .iter()
                .enumerate()
                .filter_map(|(row_index, variable)| {
                    position(solutions.variables(), variable).map(|index| (row_index, index))
                })
                .collect();
            PhysicalExpression::Exists { solutions, shared }
        }
        Expression::Call(name, args) => PhysicalExpression::Call(name.clone(), compile_all(args)?),
    })
}

fn position(variables: &[Variable], variable: &Variable) -> Option<usize> {
    variables.iter().position(|v| v == variable)
}

impl PhysicalExpression {
    /// Evaluates the expression for `row`.
    pub(crate) fn evaluate(
        &self,
        row: &[Option<Term>],
        context: &EvaluationContext,
    ) -> ThinResult<Term> {
        match self {
            PhysicalExpression::Constant(term) => Ok(term.clone()),
            PhysicalExpression::Variable(index) => match &row[*index] {
                Some(term) => Ok(term.clone()),
                None => ThinError::expected(),
            },
            PhysicalExpression::Unbound => ThinError::expected(),
            PhysicalExpression::Or(lhs, rhs) => {
                // An error is only returned if no operand is true.
                match lhs.evaluate_ebv(row, context) {
                    Ok(true) => Ok(boolean(true)),
                    Ok(false) => rhs.evaluate_ebv(row, context).map(boolean),
                    Err(error) => match rhs.evaluate_ebv(row, context) {
                        Ok(true) => Ok(boolean(true)),
                        _ => Err(error),
                    },
                }
            }
            PhysicalExpression::And(lhs, rhs) => {
                // An error is only returned if no operand is false.
                match lhs.evaluate_ebv(row, context) {
                    Ok(false) => Ok(boolean(false)),
                    Ok(true) => rhs.evaluate_ebv(row, context).map(boolean),
                    Err(error) => match rhs.evaluate_ebv(row, context) {
                        Ok(false) => Ok(boolean(false)),
                        _ => Err(error),
                    },
                }
            }
            PhysicalExpression::In(value, list) => {
                let value = value.evaluate(row, context)?;
                let mut error = None;
                for item in list {
                    let is_equal = item.evaluate(row, context).and_then(|item| {
                        let equal = FunctionName::Builtin(BuiltinName::Equal);
                        let result = context.registry().call(
                            &equal,
                            &[value.clone(), item],
                            context.functions(),
                        )?;
                        ebv(&result)
                    });
                    match is_equal {
                        Ok(true) => return Ok(boolean(true)),
                        Ok(false) => {}
                        Err(err) => error = Some(err),
                    }
                }
                match error {
                    Some(error) => Err(error),
                    None => Ok(boolean(false)),
                }
            }
            PhysicalExpression::Bound(index) => {
                let is_bound = index.is_some_and(|index| row[index].is_some());
                Ok(boolean(is_bound))
            }
            PhysicalExpression::If(condition, then, otherwise) => {
                if condition.evaluate_ebv(row, context)? {
                    then.evaluate(row, context)
                } else {
                    otherwise.evaluate(row, context)
                }
            }
            PhysicalExpression::Coalesce(args) => args
                .iter()
                .find_map(|arg| arg.evaluate(row, context).ok())
                .ok_or_else(ThinError::default),
            PhysicalExpression::Exists { solutions, shared } => {
                let exists = solutions.rows().iter().any(|solution| {
                    shared.iter().all(|(row_index, index)| {
                        match (&row[*row_index], &solution[*index]) {
                            (Some(lhs), Some(rhs)) => lhs == rhs,
                            _ => true,
                        }
                    })
                });
                Ok(boolean(exists))
            }
            PhysicalExpression::Call(name, args) => {
                let args = args
                    .iter()
                    .map(|arg| arg.evaluate(row, context))
                    .collect::<ThinResult<Vec<_>>>()?;
                context.registry().call(name, &args, context.functions())
            }
        }
    }

    /// Evaluates the expression for `row` and computes its effective boolean value.
    pub(crate) fn evaluate_ebv(
        &self,
        row: &[Option<Term>],
        context: &EvaluationContext,
    ) -> ThinResult<bool> {
        ebv(&self.evaluate(row, context)?)
    }

    /// Returns true if the expression holds for `row`. Errors count as false.
    pub(crate) fn is_satisfied(&self, row: &[Option<Term>], context: &EvaluationContext) -> bool {
        self.evaluate_ebv(row, context).unwrap_or(false)
    }
}

fn boolean(value: bool) -> Term {
    Literal::from(value).into()
}

fn ebv(term: &Term) -> ThinResult<bool> {
    TypedValue::from_term(term.as_ref()).effective_boolean_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EvaluationOptions;
    use rdf_weave_storage::MemoryQuadStorage;
    use std::sync::Arc;

    fn context() -> EvaluationContext {
        let storage = MemoryQuadStorage::new();
        let reader = storage.reader().unwrap();
        EvaluationContext::new(Arc::new(reader), EvaluationOptions::default())
    }

    fn var(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    fn evaluate(expression: &Expression, row: &[Option<Term>]) -> ThinResult<Term> {
        let context = context();
        let evaluator = Evaluator::new(&context);
        let compiled = compile(
            &evaluator,
            expression,
            &[var("a"), var("b")],
            &ActiveGraph::DefaultGraph,
        )
        .unwrap();
        compiled.evaluate(row, &context)
    }

    fn error() -> Expression {
        Expression::Variable(var("missing"))
    }

    #[test]
    fn or_tolerates_error_if_other_side_is_true() {
        let expression = Expression::Or(Box::new(error()), Box::new(Literal::from(true).into()));
        assert_eq!(evaluate(&expression, &[None, None]), Ok(boolean(true)));

        let expression = Expression::Or(Box::new(error()), Box::new(Literal::from(false).into()));
        assert!(evaluate(&expression, &[None, None]).is_err());
    }

    #[test]
    fn and_tolerates_error_if_other_side_is_false() {
        let expression = Expression::And(Box::new(Literal::from(false).into()), Box::new(error()));
        assert_eq!(evaluate(&expression, &[None, None]), Ok(boolean(false)));

        let expression = Expression::And(Box::new(Literal::from(true).into()), Box::new(error()));
        assert!(evaluate(&expression, &[None, None]).is_err());
    }

    #[test]
    fn bound_and_coalesce() {
        let row = [Some(Literal::from(1).into()), None];
        let bound = Expression::Bound(var("b"));
        assert_eq!(evaluate(&bound, &row), Ok(boolean(false)));

        let coalesce = Expression::Coalesce(vec![var("b").into(), var("a").into()]);
        assert_eq!(evaluate(&coalesce, &row), Ok(Literal::from(1).into()));
    }

    #[test]
    fn in_compares_by_value() {
        let row = [Some(Literal::from(1).into()), None];
        let expression = Expression::In(
            Box::new(var("a").into()),
            vec![
                Literal::from(2).into(),
                Literal::new_typed_literal("1.0", rdf_weave_model::vocab::xsd::DECIMAL).into(),
            ],
        );
        assert_eq!(evaluate(&expression, &row), Ok(boolean(true)));

        let expression = Expression::In(Box::new(var("a").into()), vec![]);
        assert_eq!(evaluate(&expression, &row), Ok(boolean(false)));
    }

    #[test]
    fn if_propagates_condition_error() {
        let expression = Expression::If(
            Box::new(error()),
            Box::new(Literal::from(1).into()),
            Box::new(Literal::from(2).into()),
        );
        assert!(evaluate(&expression, &[None, None]).is_err());
    }

    #[test]
    fn custom_function_is_a_row_error() {
        let expression = Expression::Call(
            FunctionName::Custom(rdf_weave_model::NamedNode::new_unchecked("http://ex/f")),
            vec![],
        );
        assert!(evaluate(&expression, &[None, None]).is_err());
    }
}
