use crate::{is_numeric_datatype, Numeric, ThinError, ThinResult};
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{BlankNode, Literal, LiteralRef, NamedNode, Term, TermRef};
use oxsdatatypes::{Boolean, Date, DateTime, DayTimeDuration, Duration, Time, YearMonthDuration};
use std::cmp::Ordering;

/// An RDF term together with the value of its literal, if the literal has a supported datatype.
///
/// Literals with unsupported datatypes or ill-typed lexical forms are kept as
/// [TypedValue::OtherLiteral]. Such literals can only be compared by term identity.
#[derive(Clone, PartialEq, Debug)]
pub enum TypedValue {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    BooleanLiteral(Boolean),
    NumericLiteral(Numeric),
    SimpleLiteral(String),
    LanguageStringLiteral { value: String, language: String },
    DateTimeLiteral(DateTime),
    TimeLiteral(Time),
    DateLiteral(Date),
    DurationLiteral(Duration),
    YearMonthDurationLiteral(YearMonthDuration),
    DayTimeDurationLiteral(DayTimeDuration),
    OtherLiteral(Literal),
}

impl TypedValue {
    /// Interprets the given term.
    pub fn from_term(term: TermRef<'_>) -> Self {
        match term {
            TermRef::NamedNode(node) => TypedValue::NamedNode(node.into_owned()),
            TermRef::BlankNode(node) => TypedValue::BlankNode(node.into_owned()),
            TermRef::Literal(literal) => Self::from_literal(literal),
            #[allow(unreachable_patterns, reason = "Triple terms only exist with rdf-star")]
            _ => TypedValue::OtherLiteral(Literal::new_simple_literal(term.to_string())),
        }
    }

    /// Interprets the given literal. Ill-typed literals become [TypedValue::OtherLiteral].
    pub fn from_literal(literal: LiteralRef<'_>) -> Self {
        if let Some(language) = literal.language() {
            return TypedValue::LanguageStringLiteral {
                value: literal.value().to_owned(),
                language: language.to_owned(),
            };
        }

        let value = literal.value();
        let datatype = literal.datatype();
        let parsed = match datatype {
            xsd::STRING => Ok(TypedValue::SimpleLiteral(value.to_owned())),
            xsd::BOOLEAN => value.parse().map(TypedValue::BooleanLiteral).map_err(ThinError::from),
            xsd::DATE_TIME => value
                .parse()
                .map(TypedValue::DateTimeLiteral)
                .map_err(ThinError::from),
            xsd::TIME => value.parse().map(TypedValue::TimeLiteral).map_err(ThinError::from),
            xsd::DATE => value.parse().map(TypedValue::DateLiteral).map_err(ThinError::from),
            xsd::DURATION => value
                .parse()
                .map(TypedValue::DurationLiteral)
                .map_err(ThinError::from),
            xsd::YEAR_MONTH_DURATION => value
                .parse()
                .map(TypedValue::YearMonthDurationLiteral)
                .map_err(ThinError::from),
            xsd::DAY_TIME_DURATION => value
                .parse()
                .map(TypedValue::DayTimeDurationLiteral)
                .map_err(ThinError::from),
            _ if is_numeric_datatype(datatype) => {
                Numeric::parse(value, datatype).map(TypedValue::NumericLiteral)
            }
            _ => ThinError::expected(),
        };
        parsed.unwrap_or_else(|_| TypedValue::OtherLiteral(literal.into_owned()))
    }

    /// Returns true if this value is an IRI or a blank node.
    pub fn is_resource(&self) -> bool {
        matches!(self, TypedValue::NamedNode(_) | TypedValue::BlankNode(_))
    }

    /// Returns the lexical form and the language tag of string literals.
    pub fn as_string_literal(&self) -> Option<(&str, Option<&str>)> {
        match self {
            TypedValue::SimpleLiteral(value) => Some((value.as_str(), None)),
            TypedValue::LanguageStringLiteral { value, language } => {
                Some((value.as_str(), Some(language.as_str())))
            }
            _ => None,
        }
    }

    /// Returns the numeric value, if this is a numeric literal.
    pub fn as_numeric(&self) -> ThinResult<Numeric> {
        match self {
            TypedValue::NumericLiteral(numeric) => Ok(*numeric),
            _ => ThinError::expected(),
        }
    }

    /// Computes the [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv).
    pub fn effective_boolean_value(&self) -> ThinResult<bool> {
        match self {
            TypedValue::BooleanLiteral(value) => Ok(bool::from(*value)),
            TypedValue::NumericLiteral(value) => Ok(value.is_truthy()),
            TypedValue::SimpleLiteral(value) => Ok(!value.is_empty()),
            TypedValue::OtherLiteral(literal)
                if literal.datatype() == xsd::BOOLEAN || is_numeric_datatype(literal.datatype()) =>
            {
                // Ill-typed booleans and numerics evaluate to false.
                Ok(false)
            }
            _ => ThinError::expected(),
        }
    }

    /// Implements the SPARQL `=` operator.
    ///
    /// Values of known but different types are never equal. Literals of unknown datatypes that
    /// are not identical produce an error.
    pub fn sparql_eq(&self, other: &Self) -> ThinResult<bool> {
        match (self, other) {
            (TypedValue::NamedNode(lhs), TypedValue::NamedNode(rhs)) => Ok(lhs == rhs),
            (TypedValue::BlankNode(lhs), TypedValue::BlankNode(rhs)) => Ok(lhs == rhs),
            (TypedValue::NamedNode(_) | TypedValue::BlankNode(_), _)
            | (_, TypedValue::NamedNode(_) | TypedValue::BlankNode(_)) => Ok(false),
            (TypedValue::OtherLiteral(lhs), TypedValue::OtherLiteral(rhs)) => {
                if lhs == rhs {
                    Ok(true)
                } else {
                    ThinError::expected()
                }
            }
            (TypedValue::OtherLiteral(_), _) | (_, TypedValue::OtherLiteral(_)) => {
                ThinError::expected()
            }
            (
                TypedValue::LanguageStringLiteral {
                    value: lhs_value,
                    language: lhs_language,
                },
                TypedValue::LanguageStringLiteral {
                    value: rhs_value,
                    language: rhs_language,
                },
            ) => Ok(lhs_value == rhs_value && lhs_language.eq_ignore_ascii_case(rhs_language)),
            _ => match partial_cmp_literals(self, other) {
                Some(ordering) => Ok(ordering == Ordering::Equal),
                None if same_family(self, other) => ThinError::expected(),
                None => Ok(false),
            },
        }
    }
}

impl From<TypedValue> for Term {
    fn from(value: TypedValue) -> Self {
        match value {
            TypedValue::NamedNode(value) => value.into(),
            TypedValue::BlankNode(value) => value.into(),
            TypedValue::BooleanLiteral(value) => Literal::from(value).into(),
            TypedValue::NumericLiteral(value) => Literal::from(value).into(),
            TypedValue::SimpleLiteral(value) => Literal::new_simple_literal(value).into(),
            TypedValue::LanguageStringLiteral { value, language } => {
                Literal::new_language_tagged_literal_unchecked(value, language).into()
            }
            TypedValue::DateTimeLiteral(value) => Literal::from(value).into(),
            TypedValue::TimeLiteral(value) => Literal::from(value).into(),
            TypedValue::DateLiteral(value) => Literal::from(value).into(),
            TypedValue::DurationLiteral(value) => Literal::from(value).into(),
            TypedValue::YearMonthDurationLiteral(value) => Literal::from(value).into(),
            TypedValue::DayTimeDurationLiteral(value) => Literal::from(value).into(),
            TypedValue::OtherLiteral(value) => value.into(),
        }
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::BooleanLiteral(value.into())
    }
}

impl From<Numeric> for TypedValue {
    fn from(value: Numeric) -> Self {
        TypedValue::NumericLiteral(value)
    }
}

impl PartialOrd for TypedValue {
    /// Implements the SPARQL `<` family of operators. Resources are not comparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_resource() || other.is_resource() {
            return None;
        }
        partial_cmp_literals(self, other)
    }
}

fn partial_cmp_literals(a: &TypedValue, b: &TypedValue) -> Option<Ordering> {
    match (a, b) {
        (TypedValue::SimpleLiteral(a), TypedValue::SimpleLiteral(b)) => Some(a.cmp(b)),
        (
            TypedValue::LanguageStringLiteral {
                value: a,
                language: a_language,
            },
            TypedValue::LanguageStringLiteral {
                value: b,
                language: b_language,
            },
        ) if a_language == b_language => Some(a.cmp(b)),
        (TypedValue::BooleanLiteral(a), TypedValue::BooleanLiteral(b)) => a.partial_cmp(b),
        (TypedValue::NumericLiteral(a), TypedValue::NumericLiteral(b)) => a.partial_cmp(b),
        (TypedValue::DateTimeLiteral(a), TypedValue::DateTimeLiteral(b)) => a.partial_cmp(b),
        (TypedValue::TimeLiteral(a), TypedValue::TimeLiteral(b)) => a.partial_cmp(b),
        (TypedValue::DateLiteral(a), TypedValue::DateLiteral(b)) => a.partial_cmp(b),
        (TypedValue::DurationLiteral(a), TypedValue::DurationLiteral(b)) => a.partial_cmp(b),
        (TypedValue::DurationLiteral(a), TypedValue::YearMonthDurationLiteral(b)) => {
            a.partial_cmp(&Duration::from(*b))
        }
        (TypedValue::DurationLiteral(a), TypedValue::DayTimeDurationLiteral(b)) => {
            a.partial_cmp(&Duration::from(*b))
        }
        (TypedValue::YearMonthDurationLiteral(a), TypedValue::YearMonthDurationLiteral(b)) => {
            a.partial_cmp(b)
        }
        (TypedValue::YearMonthDurationLiteral(a), TypedValue::DurationLiteral(b)) => {
            Duration::from(*a).partial_cmp(b)
        }
        (TypedValue::YearMonthDurationLiteral(a), TypedValue::DayTimeDurationLiteral(b)) => {
            Duration::from(*a).partial_cmp(&Duration::from(*b))
        }
        (TypedValue::DayTimeDurationLiteral(a), TypedValue::DayTimeDurationLiteral(b)) => {
            a.partial_cmp(b)
        }
        (TypedValue::DayTimeDurationLiteral(a), TypedValue::DurationLiteral(b)) => {
            Duration::from(*a).partial_cmp(b)
        }
        (TypedValue::DayTimeDurationLiteral(a), TypedValue::YearMonthDurationLiteral(b)) => {
            Duration::from(*a).partial_cmp(&Duration::from(*b))
        }
        (TypedValue::OtherLiteral(a), TypedValue::OtherLiteral(b)) if a == b => {
            Some(Ordering::Equal)
        }
        _ => None,
    }
}

/// Returns true if both values belong to a family of literals whose comparison can be undefined.
fn same_family(a: &TypedValue, b: &TypedValue) -> bool {
    matches!(
        (a, b),
        (
            TypedValue::DurationLiteral(_)
                | TypedValue::YearMonthDurationLiteral(_)
                | TypedValue::DayTimeDurationLiteral(_),
            TypedValue::DurationLiteral(_)
                | TypedValue::YearMonthDurationLiteral(_)
                | TypedValue::DayTimeDurationLiteral(_)
        ) | (TypedValue::DateTimeLiteral(_), TypedValue::DateTimeLiteral(_))
            | (TypedValue::DateLiteral(_), TypedValue::DateLiteral(_))
            | (TypedValue::TimeLiteral(_), TypedValue::TimeLiteral(_))
    )
}

/// Returns the datatype IRI of a literal term, `rdf:langString` for language-tagged strings.
pub fn literal_datatype(literal: LiteralRef<'_>) -> NamedNode {
    if literal.language().is_some() {
        rdf::LANG_STRING.into_owned()
    } else {
        literal.datatype().into_owned()
    }
}
