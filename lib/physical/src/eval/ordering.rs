use crate::context::ActiveGraph;
use crate::error::EvaluationError;
use crate::eval::expression::compile;
use crate::eval::Evaluator;
use crate::{Bindings, Multiset};
use rdf_weave_logical::OrderExpression;
use rdf_weave_model::{Decimal, Duration, Literal, Term, TypedValue};
use std::cmp::Ordering;

/// Sorts the solutions of `inner` by `expressions`. The sort is stable.
pub(super) fn evaluate_order_by(
    evaluator: &Evaluator<'_>,
    inner: Multiset,
    expressions: &[OrderExpression],
    graph: &ActiveGraph,
) -> Result<Multiset, EvaluationError> {
    let bindings = match inner {
        Multiset::Bindings(bindings) => bindings,
        inner => return Ok(inner),
    };

    let keys = expressions
        .iter()
        .map(|expression| {
            let compiled = compile(evaluator, expression.expression(), bindings.variables(), graph)?;
            Ok((compiled, expression.is_ascending()))
        })
        .collect::<Result<Vec<_>, EvaluationError>>()?;

    let context = evaluator.context();
    let row_keys = bindings
        .rows()
        .iter()
        .map(|row| {
            keys.iter()
                .map(|(key, _)| key.evaluate(row, context).ok())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut order = (0..bindings.len()).collect::<Vec<_>>();
    order.sort_by(|lhs, rhs| {
        keys.iter()
            .enumerate()
            .map(|(i, (_, ascending))| {
                let ordering = compare_terms(row_keys[*lhs][i].as_ref(), row_keys[*rhs][i].as_ref());
                if *ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    let variables = bindings.variables().to_vec();
    let mut rows = bindings.into_rows().into_iter().map(Some).collect::<Vec<_>>();
    let sorted = order.into_iter().filter_map(|index| rows[index].take());
    Ok(Bindings::with_rows(variables, sorted.collect::<Vec<_>>()).into())
}

/// The SPARQL order of terms: unbound values, blank nodes, IRIs and finally literals.
///
/// Literals are first ranked by their type family (booleans, numerics, strings, date/time values,
/// durations and all other literals). Inside a family they are ordered by value, and literals with
/// equal values are ordered by their lexical form, datatype and language. This is a total order.
pub(crate) fn compare_terms(lhs: Option<&Term>, rhs: Option<&Term>) -> Ordering {
    match (lhs, rhs) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(lhs), Some(rhs)) => match (lhs, rhs) {
            (Term::BlankNode(lhs), Term::BlankNode(rhs)) => lhs.as_str().cmp(rhs.as_str()),
            (Term::NamedNode(lhs), Term::NamedNode(rhs)) => lhs.as_str().cmp(rhs.as_str()),
            (Term::Literal(lhs), Term::Literal(rhs)) => compare_literals(lhs, rhs),
            _ => kind(lhs).cmp(&kind(rhs)),
        },
    }
}

fn kind(term: &Term) -> u8 {
    match term {
        Term::BlankNode(_) => 0,
        Term::NamedNode(_) => 1,
        Term::Literal(_) => 2,
    }
}

fn compare_literals(lhs: &Literal, rhs: &Literal) -> Ordering {
    let lhs_value = TypedValue::from_literal(lhs.as_ref());
    let rhs_value = TypedValue::from_literal(rhs.as_ref());
    family(&lhs_value)
        .cmp(&family(&rhs_value))
        .then_with(|| compare_values(&lhs_value, &rhs_value))
        .then_with(|| {
            (lhs.value(), lhs.datatype().as_str(), lhs.language()).cmp(&(
                rhs.value(),
                rhs.datatype().as_str(),
                rhs.language(),
            ))
        })
}

fn family(value: &TypedValue) -> u8 {
    match value {
        TypedValue::BooleanLiteral(_) => 0,
        TypedValue::NumericLiteral(_) => 1,
        TypedValue::SimpleLiteral(_) | TypedValue::LanguageStringLiteral { .. } => 2,
        TypedValue::DateTimeLiteral(_) => 3,
        TypedValue::TimeLiteral(_) => 4,
        TypedValue::DateLiteral(_) => 5,
        TypedValue::DurationLiteral(_)
        | TypedValue::YearMonthDurationLiteral(_)
        | TypedValue::DayTimeDurationLiteral(_) => 6,
        TypedValue::NamedNode(_) | TypedValue::BlankNode(_) | TypedValue::OtherLiteral(_) => 7,
    }
}

/// Compares two values of the same family. Values that are only partially ordered by the SPARQL
/// operators (`NaN`, timezones, mixed durations) are split into totally ordered groups first.
fn compare_values(lhs: &TypedValue, rhs: &TypedValue) -> Ordering {
    match (lhs, rhs) {
        (TypedValue::NumericLiteral(lhs), TypedValue::NumericLiteral(rhs)) => lhs
            .is_nan()
            .cmp(&rhs.is_nan())
            .then_with(|| lhs.partial_cmp(rhs).unwrap_or(Ordering::Equal)),
        (TypedValue::BooleanLiteral(lhs), TypedValue::BooleanLiteral(rhs)) => lhs.cmp(rhs),
        (TypedValue::SimpleLiteral(lhs), TypedValue::SimpleLiteral(rhs)) => lhs.cmp(rhs),
        (TypedValue::SimpleLiteral(_), TypedValue::LanguageStringLiteral { .. }) => Ordering::Less,
        (TypedValue::LanguageStringLiteral { .. }, TypedValue::SimpleLiteral(_)) => {
            Ordering::Greater
        }
        (
            TypedValue::LanguageStringLiteral {
                value: lhs,
                language: lhs_language,
            },
            TypedValue::LanguageStringLiteral {
                value: rhs,
                language: rhs_language,
            },
        ) => (lhs, lhs_language).cmp(&(rhs, rhs_language)),
        (TypedValue::DateTimeLiteral(lhs), TypedValue::DateTimeLiteral(rhs)) => lhs
            .timezone_offset()
            .is_some()
            .cmp(&rhs.timezone_offset().is_some())
            .then_with(|| lhs.partial_cmp(rhs).unwrap_or(Ordering::Equal)),
        (TypedValue::DateLiteral(lhs), TypedValue::DateLiteral(rhs)) => lhs
            .timezone_offset()
            .is_some()
            .cmp(&rhs.timezone_offset().is_some())
            .then_with(|| lhs.partial_cmp(rhs).unwrap_or(Ordering::Equal)),
        (TypedValue::TimeLiteral(lhs), TypedValue::TimeLiteral(rhs)) => lhs
            .timezone_offset()
            .is_some()
            .cmp(&rhs.timezone_offset().is_some())
            .then_with(|| lhs.partial_cmp(rhs).unwrap_or(Ordering::Equal)),
        _ => match (duration(lhs), duration(rhs)) {
            (Some(lhs), Some(rhs)) => duration_key(lhs).cmp(&duration_key(rhs)),
            _ => Ordering::Equal,
        },
    }
}

fn duration(value: &TypedValue) -> Option<Duration> {
    match value {
        TypedValue::DurationLiteral(value) => Some(*value),
        TypedValue::YearMonthDurationLiteral(value) => Some((*value).into()),
        TypedValue::DayTimeDurationLiteral(value) => Some((*value).into()),
        _ => None,
    }
}

/// Months first, then the day-time part. `P1M` and `P30D` are incomparable as values.
fn duration_key(value: Duration) -> (i64, i64, i64, i64, i64, Decimal) {
    (
        value.years(),
        value.months(),
        value.days(),
        value.hours(),
        value.minutes(),
        value.seconds(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_weave_model::{BlankNode, NamedNode};

    #[test]
    fn terms_are_ordered_by_kind() {
        let blank = Term::from(BlankNode::new_unchecked("b"));
        let iri = Term::from(NamedNode::new_unchecked("http://ex/a"));
        let literal = Term::from(Literal::from(1));
        assert_eq!(compare_terms(None, Some(&blank)), Ordering::Less);
        assert_eq!(compare_terms(Some(&blank), Some(&iri)), Ordering::Less);
        assert_eq!(compare_terms(Some(&iri), Some(&literal)), Ordering::Less);
    }

    #[test]
    fn numerics_are_ordered_by_value() {
        let two = Term::from(Literal::from(2));
        let ten = Term::from(Literal::from(10));
        assert_eq!(compare_terms(Some(&two), Some(&ten)), Ordering::Less);
    }

    #[test]
    fn numerics_are_ordered_before_strings() {
        let number = Term::from(Literal::from(2));
        let string = Term::from(Literal::new_simple_literal("1"));
        assert_eq!(compare_terms(Some(&number), Some(&string)), Ordering::Less);
    }

    #[test]
    fn mixed_literals_are_totally_ordered() {
        let terms = vec![
            Some(Term::from(Literal::from(10))),
            Some(Term::from(Literal::new_simple_literal("5"))),
            None,
            Some(Term::from(Literal::from(9))),
            Some(Term::from(Literal::from(f64::NAN))),
            Some(Term::from(Literal::from(9.0))),
            Some(Term::from(Literal::new_language_tagged_literal_unchecked("5", "en"))),
            Some(Term::from(NamedNode::new_unchecked("http://ex/a"))),
            Some(Term::from(Literal::from(true))),
            Some(Term::from(Literal::new_typed_literal(
                "P1M",
                rdf_weave_model::vocab::xsd::DURATION,
            ))),
            Some(Term::from(Literal::new_typed_literal(
                "P30D",
                rdf_weave_model::vocab::xsd::DURATION,
            ))),
            Some(Term::from(BlankNode::new_unchecked("b"))),
        ];
        for a in &terms {
            for b in &terms {
                let ab = compare_terms(a.as_ref(), b.as_ref());
                assert_eq!(ab, compare_terms(b.as_ref(), a.as_ref()).reverse());
                assert_eq!(ab == Ordering::Equal, a == b);
                for c in &terms {
                    if ab.is_le() && compare_terms(b.as_ref(), c.as_ref()).is_le() {
                        assert!(compare_terms(a.as_ref(), c.as_ref()).is_le());
                    }
                }
            }
        }

        let mut sorted = terms.clone();
        sorted.sort_by(|a, b| compare_terms(a.as_ref(), b.as_ref()));
        let rendered = sorted
            .iter()
            .map(|term| term.as_ref().map_or_else(|| "UNDEF".to_owned(), Term::to_string))
            .collect::<Vec<_>>();
        insta::assert_debug_snapshot!(rendered, @r#"
        [
            "UNDEF",
            "_:b",
            "<http://ex/a>",
            "\"true\"^^<http://www.w3.org/2001/XMLSchema#boolean>",
            "\"9\"^^<http://www.w3.org/2001/XMLSchema#double>",
            "\"9\"^^<http://www.w3.org/2001/XMLSchema#integer>",
            "\"10\"^^<http://www.w3.org/2001/XMLSchema#integer>",
            "\"NaN\"^^<http://www.w3.org/2001/XMLSchema#double>",
            "\"5\"",
            "\"5\"@en",
            "\"P30D\"^^<http://www.w3.org/2001/XMLSchema#duration>",
            "\"P1M\"^^<http://www.w3.org/2001/XMLSchema#duration>",
        ]
        "#);
    }
}
