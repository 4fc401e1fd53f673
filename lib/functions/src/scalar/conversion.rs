//! The XSD constructor functions (e.g., `xsd:integer(?x)`).

use crate::scalar::{stateless_sparql_op, StringLiteral, UnarySparqlOp};
use rdf_weave_model::{
    Boolean, DateTime, Decimal, Double, Float, Integer, Numeric, ThinError, ThinResult,
    TypedValue,
};

stateless_sparql_op!(CastStringSparqlOp, "xsd:string");

impl UnarySparqlOp for CastStringSparqlOp {
    type Arg = TypedValue;
    type Result = StringLiteral;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        let converted = match value {
            TypedValue::NamedNode(value) => value.into_string(),
            TypedValue::BlankNode(_) => return ThinError::expected(),
            TypedValue::BooleanLiteral(value) => value.to_string(),
            TypedValue::NumericLiteral(value) => value.format_value(),
            TypedValue::SimpleLiteral(value) => value,
            TypedValue::LanguageStringLiteral { value, .. } => value,
            TypedValue::DateTimeLiteral(value) => value.to_string(),
            TypedValue::TimeLiteral(value) => value.to_string(),
            TypedValue::DateLiteral(value) => value.to_string(),
            TypedValue::DurationLiteral(value) => value.to_string(),
            TypedValue::YearMonthDurationLiteral(value) => value.to_string(),
            TypedValue::DayTimeDurationLiteral(value) => value.to_string(),
            TypedValue::OtherLiteral(value) => value.value().to_owned(),
        };
        Ok(StringLiteral::new(converted, None))
    }
}

stateless_sparql_op!(CastBooleanSparqlOp, "xsd:boolean");

impl UnarySparqlOp for CastBooleanSparqlOp {
    type Arg = TypedValue;
    type Result = bool;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        let converted = match value {
            TypedValue::BooleanLiteral(value) => value,
            TypedValue::SimpleLiteral(value) => value.parse::<Boolean>()?,
            TypedValue::NumericLiteral(numeric) => match numeric {
                Numeric::Integer(value) => Boolean::from(value),
                Numeric::Decimal(value) => Boolean::from(value),
                Numeric::Float(value) => Boolean::from(value),
                Numeric::Double(value) => Boolean::from(value),
            },
            _ => return ThinError::expected(),
        };
        Ok(converted.into())
    }
}

stateless_sparql_op!(CastIntegerSparqlOp, "xsd:integer");

impl UnarySparqlOp for CastIntegerSparqlOp {
    type Arg = TypedValue;
    type Result = Integer;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        match value {
            TypedValue::BooleanLiteral(value) => Ok(Integer::from(value)),
            TypedValue::SimpleLiteral(value) => Ok(value.parse()?),
            TypedValue::NumericLiteral(numeric) => match numeric {
                Numeric::Integer(value) => Ok(value),
                Numeric::Decimal(value) => Ok(Integer::try_from(value)?),
                Numeric::Float(value) => Ok(Integer::try_from(value)?),
                Numeric::Double(value) => Ok(Integer::try_from(value)?),
            },
            _ => ThinError::expected(),
        }
    }
}

stateless_sparql_op!(CastDecimalSparqlOp, "xsd:decimal");

impl UnarySparqlOp for CastDecimalSparqlOp {
    type Arg = TypedValue;
    type Result = Decimal;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        match value {
            TypedValue::BooleanLiteral(value) => Ok(Decimal::from(value)),
            TypedValue::SimpleLiteral(value) => Ok(value.parse()?),
            TypedValue::NumericLiteral(numeric) => match numeric {
                Numeric::Integer(value) => Ok(Decimal::from(value)),
                Numeric::Decimal(value) => Ok(value),
                Numeric::Float(value) => Ok(Decimal::try_from(value)?),
                Numeric::Double(value) => Ok(Decimal::try_from(value)?),
            },
            _ => ThinError::expected(),
        }
    }
}

stateless_sparql_op!(CastFloatSparqlOp, "xsd:float");

impl UnarySparqlOp for CastFloatSparqlOp {
    type Arg = TypedValue;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        let converted = match value {
            TypedValue::BooleanLiteral(value) => Float::from(value),
            TypedValue::SimpleLiteral(value) => value.parse()?,
            TypedValue::NumericLiteral(numeric) => match numeric {
                Numeric::Integer(value) => Float::from(value),
                Numeric::Decimal(value) => Float::from(value),
                Numeric::Float(value) => value,
                Numeric::Double(value) => Float::from(value),
            },
            _ => return ThinError::expected(),
        };
        Ok(Numeric::Float(converted))
    }
}

stateless_sparql_op!(CastDoubleSparqlOp, "xsd:double");

impl UnarySparqlOp for CastDoubleSparqlOp {
    type Arg = TypedValue;
    type Result = Numeric;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        let converted = match value {
            TypedValue::BooleanLiteral(value) => Double::from(value),
            TypedValue::SimpleLiteral(value) => value.parse()?,
            TypedValue::NumericLiteral(numeric) => match numeric {
                Numeric::Integer(value) => Double::from(value),
                Numeric::Decimal(value) => Double::from(value),
                Numeric::Float(value) => Double::from(value),
                Numeric::Double(value) => value,
            },
            _ => return ThinError::expected(),
        };
        Ok(Numeric::Double(converted))
    }
}

stateless_sparql_op!(CastDateTimeSparqlOp, "xsd:dateTime");

impl UnarySparqlOp for CastDateTimeSparqlOp {
    type Arg = TypedValue;
    type Result = DateTime;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        match value {
            TypedValue::SimpleLiteral(value) => Ok(value.parse()?),
            TypedValue::DateTimeLiteral(value) => Ok(value),
            TypedValue::DateLiteral(value) => Ok(DateTime::try_from(value)?),
            _ => ThinError::expected(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_weave_model::vocab::xsd;
    use rdf_weave_model::{Literal, NamedNode};

    fn simple(value: &str) -> TypedValue {
        TypedValue::SimpleLiteral(value.to_owned())
    }

    #[test]
    fn cast_string_of_iri() {
        let value = TypedValue::NamedNode(NamedNode::new_unchecked("http://example.com/a"));
        let result = CastStringSparqlOp::new().evaluate(value).unwrap();
        assert_eq!(result, StringLiteral::new("http://example.com/a", None));
    }

    #[test]
    fn cast_string_of_ill_typed_literal_keeps_lexical_form() {
        let literal = Literal::new_typed_literal("abc", xsd::INTEGER);
        let value = TypedValue::from_literal(literal.as_ref());
        let result = CastStringSparqlOp::new().evaluate(value).unwrap();
        assert_eq!(result.value, "abc");
    }

    #[test]
    fn cast_boolean() {
        let op = CastBooleanSparqlOp::new();
        assert!(op.evaluate(simple("true")).unwrap());
        assert!(!op.evaluate(simple("0")).unwrap());
        assert!(op.evaluate(simple("yes")).is_err());
        assert!(!op
            .evaluate(TypedValue::NumericLiteral(Integer::from(0).into()))
            .unwrap());
    }

    #[test]
    fn cast_integer_truncates_decimals() {
        let op = CastIntegerSparqlOp::new();
        let value = TypedValue::NumericLiteral("3.7".parse::<Decimal>().unwrap().into());
        assert_eq!(op.evaluate(value).unwrap(), Integer::from(3));
        assert!(op.evaluate(simple("3.7")).is_err());
    }

    #[test]
    fn cast_integer_rejects_nan() {
        let op = CastIntegerSparqlOp::new();
        let value = TypedValue::NumericLiteral(Double::from(f64::NAN).into());
        assert!(op.evaluate(value).is_err());
    }

    #[test]
    fn cast_decimal_of_boolean() {
        let op = CastDecimalSparqlOp::new();
        let result = op.evaluate(TypedValue::from(true)).unwrap();
        assert_eq!(result, Decimal::from(1));
    }

    #[test]
    fn cast_date_time_of_date() {
        let op = CastDateTimeSparqlOp::new();
        let value = TypedValue::DateLiteral("2020-01-01".parse().unwrap());
        let result = op.evaluate(value).unwrap();
        assert_eq!(result, "2020-01-01T00:00:00".parse::<DateTime>().unwrap());
    }

    #[test]
    fn cast_date_time_of_resource_fails() {
        let op = CastDateTimeSparqlOp::new();
        let value = TypedValue::NamedNode(NamedNode::new_unchecked("http://example.com/a"));
        assert!(op.evaluate(value).is_err());
    }
}
