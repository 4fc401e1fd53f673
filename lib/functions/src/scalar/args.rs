use rdf_weave_model::vocab::xsd;
use rdf_weave_model::{
    DateTime, Integer, NamedNode, Numeric, Term, ThinError, ThinResult, TypedValue,
};

/// Extracts an argument of a SPARQL operation from an RDF term.
///
/// A term that does not have the expected type yields a [ThinError].
pub trait SparqlArg: Sized {
    fn from_term(term: &Term) -> ThinResult<Self>;
}

impl SparqlArg for Term {
    fn from_term(term: &Term) -> ThinResult<Self> {
        Ok(term.clone())
    }
}

impl SparqlArg for TypedValue {
    fn from_term(term: &Term) -> ThinResult<Self> {
        Ok(TypedValue::from_term(term.as_ref()))
    }
}

impl SparqlArg for Numeric {
    fn from_term(term: &Term) -> ThinResult<Self> {
        TypedValue::from_term(term.as_ref()).as_numeric()
    }
}

impl SparqlArg for Integer {
    fn from_term(term: &Term) -> ThinResult<Self> {
        match Numeric::from_term(term)? {
            Numeric::Integer(value) => Ok(value),
            _ => ThinError::expected(),
        }
    }
}

impl SparqlArg for DateTime {
    fn from_term(term: &Term) -> ThinResult<Self> {
        match TypedValue::from_term(term.as_ref()) {
            TypedValue::DateTimeLiteral(value) => Ok(value),
            _ => ThinError::expected(),
        }
    }
}

impl SparqlArg for NamedNode {
    fn from_term(term: &Term) -> ThinResult<Self> {
        match term {
            Term::NamedNode(node) => Ok(node.clone()),
            _ => ThinError::expected(),
        }
    }
}

/// A simple literal or a language-tagged string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    pub value: String,
    pub language: Option<String>,
}

impl StringLiteral {
    pub fn new(value: impl Into<String>, language: Option<String>) -> Self {
        Self {
            value: value.into(),
            language,
        }
    }

    /// Creates a literal with the same language tag as `self`.
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self::new(value, self.language.clone())
    }

    /// Checks whether `self` and `other` are
    /// [argument compatible](https://www.w3.org/TR/sparql11-query/#func-arg-compatibility).
    pub fn is_compatible_with(&self, other: &StringLiteral) -> bool {
        match (&self.language, &other.language) {
            (_, None) => true,
            (Some(lhs), Some(rhs)) => lhs == rhs,
            (None, Some(_)) => false,
        }
    }
}

impl SparqlArg for StringLiteral {
    fn from_term(term: &Term) -> ThinResult<Self> {
        match term {
            Term::Literal(literal) => {
                if let Some(language) = literal.language() {
                    Ok(Self::new(literal.value(), Some(language.to_owned())))
                } else if literal.datatype() == xsd::STRING {
                    Ok(Self::new(literal.value(), None))
                } else {
                    ThinError::expected()
                }
            }
            _ => ThinError::expected(),
        }
    }
}

/// A literal of type `xsd:string` without a language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleLiteral(pub String);

impl SparqlArg for SimpleLiteral {
    fn from_term(term: &Term) -> ThinResult<Self> {
        match term {
            Term::Literal(literal)
                if literal.language().is_none() && literal.datatype() == xsd::STRING =>
            {
                Ok(Self(literal.value().to_owned()))
            }
            _ => ThinError::expected(),
        }
    }
}
