use crate::{ThinError, ThinResult};
use oxrdf::vocab::xsd;
use oxrdf::{Literal, NamedNodeRef};
use oxsdatatypes::{Decimal, Double, Float, Integer};
use std::cmp::Ordering;

/// A numeric value of one of the four primitive XSD numeric types.
///
/// All types derived from `xsd:integer` (e.g., `xsd:int`, `xsd:nonNegativeInteger`) are mapped to
/// [Numeric::Integer].
#[derive(Copy, Clone, Debug)]
pub enum Numeric {
    Integer(Integer),
    Decimal(Decimal),
    Float(Float),
    Double(Double),
}

impl Numeric {
    /// Parses a numeric value from the lexical form of `datatype`.
    ///
    /// Returns an error if `datatype` is not numeric or `value` is not in its lexical space.
    pub fn parse(value: &str, datatype: NamedNodeRef<'_>) -> ThinResult<Self> {
        if is_integer_datatype(datatype) {
            return Ok(Numeric::Integer(value.parse()?));
        }
        match datatype {
            xsd::DECIMAL => Ok(Numeric::Decimal(value.parse()?)),
            xsd::FLOAT => Ok(Numeric::Float(value.parse()?)),
            xsd::DOUBLE => Ok(Numeric::Double(value.parse()?)),
            _ => ThinError::expected(),
        }
    }

    /// Returns the effective boolean value of this numeric.
    pub fn is_truthy(self) -> bool {
        match self {
            Numeric::Integer(value) => value != Integer::from(0),
            Numeric::Decimal(value) => value != Decimal::from(0),
            Numeric::Float(value) => value != Float::from(0_f32) && !value.is_nan(),
            Numeric::Double(value) => value != Double::from(0_f64) && !value.is_nan(),
        }
    }

    /// Returns `true` for the `NaN` value of `xsd:float` and `xsd:double`.
    pub fn is_nan(self) -> bool {
        match self {
            Numeric::Integer(_) | Numeric::Decimal(_) => false,
            Numeric::Float(value) => value.is_nan(),
            Numeric::Double(value) => value.is_nan(),
        }
    }

    /// Returns the datatype of this numeric.
    pub fn datatype(self) -> NamedNodeRef<'static> {
        match self {
            Numeric::Integer(_) => xsd::INTEGER,
            Numeric::Decimal(_) => xsd::DECIMAL,
            Numeric::Float(_) => xsd::FLOAT,
            Numeric::Double(_) => xsd::DOUBLE,
        }
    }

    pub fn format_value(&self) -> String {
        match self {
            Numeric::Integer(value) => value.to_string(),
            Numeric::Decimal(value) => value.to_string(),
            Numeric::Float(value) => value.to_string(),
            Numeric::Double(value) => value.to_string(),
        }
    }
}

impl From<Numeric> for Literal {
    fn from(value: Numeric) -> Self {
        match value {
            Numeric::Integer(value) => value.into(),
            Numeric::Decimal(value) => value.into(),
            Numeric::Float(value) => value.into(),
            Numeric::Double(value) => value.into(),
        }
    }
}

impl From<Integer> for Numeric {
    fn from(value: Integer) -> Self {
        Numeric::Integer(value)
    }
}

impl From<Decimal> for Numeric {
    fn from(value: Decimal) -> Self {
        Numeric::Decimal(value)
    }
}

impl From<Float> for Numeric {
    fn from(value: Float) -> Self {
        Numeric::Float(value)
    }
}

impl From<Double> for Numeric {
    fn from(value: Double) -> Self {
        Numeric::Double(value)
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Numeric {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match NumericPair::with_casts_from(*self, *other) {
            NumericPair::Integer(lhs, rhs) => Some(lhs.cmp(&rhs)),
            NumericPair::Decimal(lhs, rhs) => Some(lhs.cmp(&rhs)),
            NumericPair::Float(lhs, rhs) => lhs.partial_cmp(&rhs),
            NumericPair::Double(lhs, rhs) => lhs.partial_cmp(&rhs),
        }
    }
}

/// Two numerics promoted to their common type (integer → decimal → float → double).
pub enum NumericPair {
    Integer(Integer, Integer),
    Decimal(Decimal, Decimal),
    Float(Float, Float),
    Double(Double, Double),
}

impl NumericPair {
    pub fn with_casts_from(lhs: Numeric, rhs: Numeric) -> NumericPair {
        match (lhs, rhs) {
            (Numeric::Integer(lhs), Numeric::Integer(rhs)) => NumericPair::Integer(lhs, rhs),
            (Numeric::Integer(lhs), Numeric::Decimal(rhs)) => {
                NumericPair::Decimal(Decimal::from(lhs), rhs)
            }
            (Numeric::Integer(lhs), Numeric::Float(rhs)) => NumericPair::Float(lhs.into(), rhs),
            (Numeric::Integer(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs.into(), rhs),

            (Numeric::Decimal(lhs), Numeric::Integer(rhs)) => {
                NumericPair::Decimal(lhs, Decimal::from(rhs))
            }
            (Numeric::Decimal(lhs), Numeric::Decimal(rhs)) => NumericPair::Decimal(lhs, rhs),
            (Numeric::Decimal(lhs), Numeric::Float(rhs)) => NumericPair::Float(lhs.into(), rhs),
            (Numeric::Decimal(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs.into(), rhs),

            (Numeric::Float(lhs), Numeric::Integer(rhs)) => NumericPair::Float(lhs, rhs.into()),
            (Numeric::Float(lhs), Numeric::Decimal(rhs)) => NumericPair::Float(lhs, rhs.into()),
            (Numeric::Float(lhs), Numeric::Float(rhs)) => NumericPair::Float(lhs, rhs),
            (Numeric::Float(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs.into(), rhs),

            (Numeric::Double(lhs), Numeric::Integer(rhs)) => NumericPair::Double(lhs, rhs.into()),
            (Numeric::Double(lhs), Numeric::Decimal(rhs)) => NumericPair::Double(lhs, rhs.into()),
            (Numeric::Double(lhs), Numeric::Float(rhs)) => NumericPair::Double(lhs, rhs.into()),
            (Numeric::Double(lhs), Numeric::Double(rhs)) => NumericPair::Double(lhs, rhs),
        }
    }
}

/// Checks if the datatype is `xsd:integer` or one of its derived datatypes.
pub fn is_integer_datatype(datatype: NamedNodeRef<'_>) -> bool {
    static INTEGER_DATATYPES: &[NamedNodeRef<'_>; 13] = &[
        xsd::INTEGER,
        xsd::BYTE,
        xsd::SHORT,
        xsd::INT,
        xsd::LONG,
        xsd::UNSIGNED_BYTE,
        xsd::UNSIGNED_SHORT,
        xsd::UNSIGNED_INT,
        xsd::UNSIGNED_LONG,
        xsd::POSITIVE_INTEGER,
        xsd::NEGATIVE_INTEGER,
        xsd::NON_POSITIVE_INTEGER,
        xsd::NON_NEGATIVE_INTEGER,
    ];
    INTEGER_DATATYPES.contains(&datatype)
}

/// Checks if the datatype is a numeric datatype.
pub fn is_numeric_datatype(datatype: NamedNodeRef<'_>) -> bool {
    is_integer_datatype(datatype)
        || datatype == xsd::DECIMAL
        || datatype == xsd::FLOAT
        || datatype == xsd::DOUBLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_decimal_compare_by_value() {
        let one = Numeric::Integer(Integer::from(1));
        let one_decimal = Numeric::Decimal(Decimal::from(1));
        assert_eq!(one, one_decimal);
        assert_eq!(
            Numeric::parse("01", xsd::INT).ok(),
            Some(Numeric::Integer(Integer::from(1)))
        );
    }

    #[test]
    fn nan_is_not_comparable() {
        let nan = Numeric::Double(Double::from(f64::NAN));
        assert_eq!(nan.partial_cmp(&nan), None);
        assert!(!nan.is_truthy());
    }

    #[test]
    fn parse_rejects_invalid_lexical_form() {
        assert!(Numeric::parse("abc", xsd::INTEGER).is_err());
        assert!(Numeric::parse("1", xsd::STRING).is_err());
    }
}
