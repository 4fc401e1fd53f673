use crate::context::ActiveGraph;
use crate::error::EvaluationError;
use crate::eval::expression::{compile, PhysicalExpression};
use crate::eval::ordering::compare_terms;
use crate::eval::Evaluator;
use crate::{Bindings, EvaluationContext, Multiset, Row};
use itertools::Itertools;
use rdf_weave_functions::{BuiltinName, FunctionName};
use rdf_weave_logical::AggregateExpression;
use rdf_weave_model::{AggregateFunction, Literal, Term, ThinError, ThinResult, Variable};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

/// Groups the solutions of `inner` by `variables` and computes `aggregates` for each group.
///
/// Groups are returned in order of their first solution. Without grouping variables there is
/// exactly one group, even if `inner` has no solutions.
pub(super) fn evaluate_group(
    evaluator: &Evaluator<'_>,
    inner: Multiset,
    variables: &[Variable],
    aggregates: &[(Variable, AggregateExpression)],
    graph: &ActiveGraph,
) -> Result<Multiset, EvaluationError> {
    let bindings = inner.into_bindings();
    let key_positions = variables
        .iter()
        .map(|variable| bindings.index_of(variable))
        .collect::<Vec<_>>();

    let mut compiled = Vec::with_capacity(aggregates.len());
    for (_, aggregate) in aggregates {
        compiled.push(match aggregate {
            AggregateExpression::CountSolutions { distinct } => Aggregate::CountSolutions {
                distinct: *distinct,
            },
            AggregateExpression::FunctionCall {
                name,
                expression,
                distinct,
            } => Aggregate::Function {
                name: name.clone(),
                expression: compile(evaluator, expression, bindings.variables(), graph)?,
                distinct: *distinct,
            },
        });
    }

    let mut groups: Vec<(Row, Vec<usize>)> = Vec::new();
    let mut group_index = FxHashMap::<Row, usize>::default();
    for (index, row) in bindings.rows().iter().enumerate() {
        let key = key_positions
            .iter()
            .map(|position| position.and_then(|position| row[position].clone()))
            .collect::<Row>();
        let group = *group_index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[group].1.push(index);
    }
    if variables.is_empty() && groups.is_empty() {
        groups.push((Vec::new(), Vec::new()));
    }

    let context = evaluator.context();
    let output_variables = variables
        .iter()
        .chain(aggregates.iter().map(|(variable, _)| variable))
        .cloned()
        .collect::<Vec<_>>();
    let mut result = Bindings::new(output_variables);
    for (key, members) in groups {
        context.check_deadline()?;
        let rows = members
            .iter()
            .map(|index| bindings.rows()[*index].as_slice())
            .collect::<Vec<_>>();
        let mut output = key;
        for aggregate in &compiled {
            output.push(aggregate.compute(&rows, context).ok());
        }
        result.push(output);
    }
    Ok(result.into())
}

enum Aggregate {
    CountSolutions {
        distinct: bool,
    },
    Function {
        name: AggregateFunction,
        expression: PhysicalExpression,
        distinct: bool,
    },
}

impl Aggregate {
    /// Computes the aggregate over the rows of a group. An error leaves the aggregate unbound.
    fn compute(&self, rows: &[&[Option<Term>]], context: &EvaluationContext) -> ThinResult<Term> {
        let (name, expression, distinct) = match self {
            Aggregate::CountSolutions { distinct } => {
                let count = if *distinct {
                    rows.iter().unique().count()
                } else {
                    rows.len()
                };
                return Ok(integer(count));
            }
            Aggregate::Function {
                name,
                expression,
                distinct,
            } => (name, expression, *distinct),
        };

        let values = rows.iter().map(|row| expression.evaluate(row, context));
        let values = if distinct {
            values
                .map(|value| value.ok())
                .unique()
                .map(|value| value.ok_or_else(ThinError::default))
                .collect::<Vec<_>>()
        } else {
            values.collect::<Vec<_>>()
        };

        match name {
            AggregateFunction::Count => Ok(integer(values.iter().filter(|v| v.is_ok()).count())),
            AggregateFunction::Sum => sum(&values, context),
            AggregateFunction::Avg => {
                if values.is_empty() {
                    return Ok(integer(0));
                }
                let sum = sum(&values, context)?;
                call(BuiltinName::Div, &[sum, integer(values.len())], context)
            }
            AggregateFunction::Min => extremum(values, Ordering::Less),
            AggregateFunction::Max => extremum(values, Ordering::Greater),
            AggregateFunction::Sample => values
                .into_iter()
                .find_map(Result::ok)
                .ok_or_else(ThinError::default),
            AggregateFunction::GroupConcat { separator } => {
                let separator = separator.as_deref().unwrap_or(" ");
                let mut parts = Vec::with_capacity(values.len());
                for value in values {
                    match value? {
                        Term::Literal(literal) => parts.push(literal.value().to_owned()),
                        _ => return ThinError::expected(),
                    }
                }
                Ok(Literal::new_simple_literal(parts.join(separator)).into())
            }
            AggregateFunction::Custom(_) => ThinError::expected(),
        }
    }
}

fn sum(values: &[ThinResult<Term>], context: &EvaluationContext) -> ThinResult<Term> {
    let mut total = integer(0);
    for value in values {
        total = call(BuiltinName::Add, &[total, value.clone()?], context)?;
    }
    Ok(total)
}

/// Returns the value that is ordered before (`Less`) or after (`Greater`) every other value.
fn extremum(values: Vec<ThinResult<Term>>, wanted: Ordering) -> ThinResult<Term> {
    let mut result: Option<Term> = None;
    for value in values {
        let value = value?;
        let replace = result
            .as_ref()
            .map_or(true, |current| compare_terms(Some(&value), Some(current)) == wanted);
        if replace {
            result = Some(value);
        }
    }
    result.ok_or_else(ThinError::default)
}

fn call(name: BuiltinName, args: &[Term], context: &EvaluationContext) -> ThinResult<Term> {
    context
        .registry()
        .call(&FunctionName::Builtin(name), args, context.functions())
}

fn integer(value: usize) -> Term {
    Literal::from(i64::try_from(value).unwrap_or(i64::MAX)).into()
}
