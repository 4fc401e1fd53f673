use crate::scalar::{
    checked, stateless_sparql_op, BinarySparqlOp, NullarySparqlOp, SparqlOp, UnarySparqlOp,
};
use rdf_weave_model::{
    Decimal, Double, Duration, Numeric, NumericPair, ThinError, ThinResult, TypedValue,
};

/// The SPARQL `+` operator.
///
/// Outside of strict mode, the operator also adds durations to `xsd:dateTime`, `xsd:date` and
/// `xsd:time` values, and durations to each other.
#[derive(Debug, Default, Clone, Copy)]
pub struct AddSparqlOp {
    strict: bool,
}

impl AddSparqlOp {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }
}

impl SparqlOp for AddSparqlOp {
    fn name(&self) -> &str {
        "ADD"
    }
}

impl BinarySparqlOp for AddSparqlOp {
    type ArgLhs = TypedValue;
    type ArgRhs = TypedValue;
    type Result = TypedValue;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        match (lhs, rhs) {
            (TypedValue::NumericLiteral(lhs), TypedValue::NumericLiteral(rhs)) => {
                add_numeric(lhs, rhs).map(TypedValue::NumericLiteral)
            }
            (lhs, rhs) if !self.strict => add_temporal(&lhs, &rhs),
            _ => ThinError::expected(),
        }
    }
}

/// The SPARQL binary `-` operator. Shares the strictness rules of [AddSparqlOp].
#[derive(Debug, Default, Clone, Copy)]
pub struct SubSparqlOp {
    strict: bool,
}

impl SubSparqlOp {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }
}

impl SparqlOp for SubSparqlOp {
    fn name(&self) -> &str {
        "SUB"
    }
}

impl BinarySparqlOp for SubSparqlOp {
    type ArgLhs = TypedValue;
    type ArgRhs = TypedValue;
    type Result = TypedValue;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        match (lhs, rhs) {
            (TypedValue::NumericLiteral(lhs), TypedValue::NumericLiteral(rhs)) => {
                let result = match NumericPair::with_casts_from(lhs, rhs) {
                    NumericPair::Integer(lhs, rhs) => checked(lhs.checked_sub(rhs))?.into(),
                    NumericPair::Decimal(lhs, rhs) => checked(lhs.checked_sub(rhs))?.into(),
                    NumericPair::Float(lhs, rhs) => (lhs - rhs).into(),
                    NumericPair::Double(lhs, rhs) => (lhs - rhs).into(),
                };
                Ok(TypedValue::NumericLiteral(result))
            }
            (lhs, rhs) if !self.strict => sub_temporal(&lhs, &rhs),
            _ => ThinError::expected(),
        }
    }
}

stateless_sparql_op!(MulSparqlOp, "MUL");

impl BinarySparqlOp for MulSparqlOp {
    type ArgLhs = Numeric;
    type ArgRhs = Numeric;
    type Result = Numeric;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        Ok(match NumericPair::with_casts_from(lhs, rhs) {
            NumericPair::Integer(lhs, rhs) => checked(lhs.checked_mul(rhs))?.into(),
            NumericPair::Decimal(lhs, rhs) => checked(lhs.checked_mul(rhs))?.into(),
            NumericPair::Float(lhs, rhs) => (lhs * rhs).into(),
            NumericPair::Double(lhs, rhs) => (lhs * rhs).into(),
        })
    }
}

stateless_sparql_op!(
    /// The SPARQL `/` operator. Dividing two integers yields a decimal.
    DivSparqlOp,
    "DIV"
);

impl BinarySparqlOp for DivSparqlOp {
    type ArgLhs = Numeric;
    type ArgRhs = Numeric;
    type Result = Numeric;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        Ok(match NumericPair::with_casts_from(lhs, rhs) {
            NumericPair::Integer(lhs, rhs) => {
                checked(Decimal::from(lhs).checked_div(Decimal::from(rhs)))?.into()
            }
            NumericPair::Decimal(lhs, rhs) => checked(lhs.checked_div(rhs))?.into(),
            NumericPair::Float(lhs, rhs) => (lhs / rhs).into(),
            NumericPair::Double(lhs, rhs) => (lhs / rhs).into(),
        })
    }
}

stateless_sparql_op!(UnaryPlusSparqlOp, "UNARY_PLUS");

impl UnarySparqlOp for UnaryPlusSparqlOp {
    type Arg = Numeric;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(value)
    }
}

stateless_sparql_op!(UnaryMinusSparqlOp, "UNARY_MINUS");

impl UnarySparqlOp for UnaryMinusSparqlOp {
    type Arg = Numeric;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(match value {
            Numeric::Integer(value) => checked(value.checked_neg())?.into(),
            Numeric::Decimal(value) => checked(value.checked_neg())?.into(),
            Numeric::Float(value) => (-value).into(),
            Numeric::Double(value) => (-value).into(),
        })
    }
}

stateless_sparql_op!(AbsSparqlOp, "ABS");

impl UnarySparqlOp for AbsSparqlOp {
    type Arg = Numeric;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(match value {
            Numeric::Integer(value) => checked(value.checked_abs())?.into(),
            Numeric::Decimal(value) => checked(value.checked_abs())?.into(),
            Numeric::Float(value) => value.abs().into(),
            Numeric::Double(value) => value.abs().into(),
        })
    }
}

stateless_sparql_op!(RoundSparqlOp, "ROUND");

impl UnarySparqlOp for RoundSparqlOp {
    type Arg = Numeric;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(match value {
            Numeric::Integer(value) => value.into(),
            Numeric::Decimal(value) => checked(value.checked_round())?.into(),
            Numeric::Float(value) => value.round().into(),
            Numeric::Double(value) => value.round().into(),
        })
    }
}

stateless_sparql_op!(CeilSparqlOp, "CEIL");

impl UnarySparqlOp for CeilSparqlOp {
    type Arg = Numeric;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(match value {
            Numeric::Integer(value) => value.into(),
            Numeric::Decimal(value) => checked(value.checked_ceil())?.into(),
            Numeric::Float(value) => value.ceil().into(),
            Numeric::Double(value) => value.ceil().into(),
        })
    }
}

stateless_sparql_op!(FloorSparqlOp, "FLOOR");

impl UnarySparqlOp for FloorSparqlOp {
    type Arg = Numeric;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(match value {
            Numeric::Integer(value) => value.into(),
            Numeric::Decimal(value) => checked(value.checked_floor())?.into(),
            Numeric::Float(value) => value.floor().into(),
            Numeric::Double(value) => value.floor().into(),
        })
    }
}

stateless_sparql_op!(
    /// Returns a random `xsd:double` between 0 (inclusive) and 1 (exclusive).
    RandSparqlOp,
    "RAND"
);

impl NullarySparqlOp for RandSparqlOp {
    type Result = Numeric;

    fn evaluate(&self) -> ThinResult<Self::Result> {
        Ok(Numeric::Double(Double::from(rand::random::<f64>())))
    }
}

/// Adds two numerics after promoting them to their common type.
pub fn add_numeric(lhs: Numeric, rhs: Numeric) -> ThinResult<Numeric> {
    Ok(match NumericPair::with_casts_from(lhs, rhs) {
        NumericPair::Integer(lhs, rhs) => checked(lhs.checked_add(rhs))?.into(),
        NumericPair::Decimal(lhs, rhs) => checked(lhs.checked_add(rhs))?.into(),
        NumericPair::Float(lhs, rhs) => (lhs + rhs).into(),
        NumericPair::Double(lhs, rhs) => (lhs + rhs).into(),
    })
}

fn as_duration(value: &TypedValue) -> Option<Duration> {
    match value {
        TypedValue::DurationLiteral(value) => Some(*value),
        TypedValue::YearMonthDurationLiteral(value) => Some(Duration::from(*value)),
        TypedValue::DayTimeDurationLiteral(value) => Some(Duration::from(*value)),
        _ => None,
    }
}

fn add_temporal(lhs: &TypedValue, rhs: &TypedValue) -> ThinResult<TypedValue> {
    match (lhs, rhs) {
        (TypedValue::YearMonthDurationLiteral(lhs), TypedValue::YearMonthDurationLiteral(rhs)) => {
            checked(lhs.checked_add(*rhs)).map(TypedValue::YearMonthDurationLiteral)
        }
        (TypedValue::DayTimeDurationLiteral(lhs), TypedValue::DayTimeDurationLiteral(rhs)) => {
            checked(lhs.checked_add(*rhs)).map(TypedValue::DayTimeDurationLiteral)
        }
        (TypedValue::DateTimeLiteral(lhs), rhs) => {
            let rhs = as_duration(rhs).ok_or(ThinError::default())?;
            checked(lhs.checked_add_duration(rhs)).map(TypedValue::DateTimeLiteral)
        }
        (TypedValue::DateLiteral(lhs), rhs) => {
            let rhs = as_duration(rhs).ok_or(ThinError::default())?;
            checked(lhs.checked_add_duration(rhs)).map(TypedValue::DateLiteral)
        }
        (TypedValue::TimeLiteral(lhs), rhs) => {
            let rhs = as_duration(rhs).ok_or(ThinError::default())?;
            checked(lhs.checked_add_duration(rhs)).map(TypedValue::TimeLiteral)
        }
        (lhs, rhs) => {
            let (lhs, rhs) = as_duration(lhs)
                .zip(as_duration(rhs))
                .ok_or(ThinError::default())?;
            checked(lhs.checked_add(rhs)).map(TypedValue::DurationLiteral)
        }
    }
}

fn sub_temporal(lhs: &TypedValue, rhs: &TypedValue) -> ThinResult<TypedValue> {
    match (lhs, rhs) {
        (TypedValue::YearMonthDurationLiteral(lhs), TypedValue::YearMonthDurationLiteral(rhs)) => {
            checked(lhs.checked_sub(*rhs)).map(TypedValue::YearMonthDurationLiteral)
        }
        (TypedValue::DayTimeDurationLiteral(lhs), TypedValue::DayTimeDurationLiteral(rhs)) => {
            checked(lhs.checked_sub(*rhs)).map(TypedValue::DayTimeDurationLiteral)
        }
        (TypedValue::DateTimeLiteral(lhs), rhs) => {
            let rhs = as_duration(rhs).ok_or(ThinError::default())?;
            checked(lhs.checked_sub_duration(rhs)).map(TypedValue::DateTimeLiteral)
        }
        (TypedValue::DateLiteral(lhs), rhs) => {
            let rhs = as_duration(rhs).ok_or(ThinError::default())?;
            checked(lhs.checked_sub_duration(rhs)).map(TypedValue::DateLiteral)
        }
        (TypedValue::TimeLiteral(lhs), rhs) => {
            let rhs = as_duration(rhs).ok_or(ThinError::default())?;
            checked(lhs.checked_sub_duration(rhs)).map(TypedValue::TimeLiteral)
        }
        (lhs, rhs) => {
            let (lhs, rhs) = as_duration(lhs)
                .zip(as_duration(rhs))
                .ok_or(ThinError::default())?;
            checked(lhs.checked_sub(rhs)).map(TypedValue::DurationLiteral)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_weave_model::vocab::xsd;
    use rdf_weave_model::{Integer, LiteralRef};

    fn typed(value: &str, datatype: rdf_weave_model::NamedNodeRef<'_>) -> TypedValue {
        TypedValue::from_literal(LiteralRef::new_typed_literal(value, datatype))
    }

    #[test]
    fn integer_division_yields_decimal() {
        let result = DivSparqlOp::new()
            .evaluate(Integer::from(1).into(), Integer::from(2).into())
            .unwrap();
        assert!(matches!(result, Numeric::Decimal(_)));
        assert_eq!(result, Numeric::Decimal("0.5".parse().unwrap()));
    }

    #[test]
    fn integer_division_by_zero_fails() {
        let result =
            DivSparqlOp::new().evaluate(Integer::from(1).into(), Integer::from(0).into());
        assert!(result.is_err());
    }

    #[test]
    fn add_promotes_to_double() {
        let result = AddSparqlOp::new(true)
            .evaluate(typed("1", xsd::INTEGER), typed("1.5", xsd::DOUBLE))
            .unwrap();
        assert_eq!(result, TypedValue::NumericLiteral(Numeric::Double(Double::from(2.5_f64))));
    }

    #[test]
    fn date_arithmetic_requires_non_strict_mode() {
        let date_time = typed("2020-01-01T00:00:00Z", xsd::DATE_TIME);
        let duration = typed("P1D", xsd::DAY_TIME_DURATION);

        assert!(AddSparqlOp::new(true)
            .evaluate(date_time.clone(), duration.clone())
            .is_err());
        let result = AddSparqlOp::new(false)
            .evaluate(date_time, duration)
            .unwrap();
        assert_eq!(result, typed("2020-01-02T00:00:00Z", xsd::DATE_TIME));
    }

    #[test]
    fn durations_add_up() {
        let result = AddSparqlOp::new(false)
            .evaluate(
                typed("PT1H", xsd::DAY_TIME_DURATION),
                typed("PT30M", xsd::DAY_TIME_DURATION),
            )
            .unwrap();
        assert_eq!(result, typed("PT1H30M", xsd::DAY_TIME_DURATION));
    }

    #[test]
    fn strings_cannot_be_added() {
        let result = AddSparqlOp::new(false).evaluate(
            TypedValue::SimpleLiteral("a".to_owned()),
            typed("1", xsd::INTEGER),
        );
        assert!(result.is_err());
    }

    #[test]
    fn round_decimal() {
        let result = RoundSparqlOp::new()
            .evaluate(Numeric::Decimal("2.5".parse().unwrap()))
            .unwrap();
        assert_eq!(result, Numeric::Decimal(Decimal::from(3)));
    }
}
