use crate::scalar::StringLiteral;
use rdf_weave_model::{
    BlankNode, DateTime, DayTimeDuration, Decimal, Integer, Literal, NamedNode, Numeric, Term,
    TypedValue,
};

/// Converts the result of a SPARQL operation into an RDF term.
pub trait IntoTerm {
    fn into_term(self) -> Term;
}

impl IntoTerm for Term {
    fn into_term(self) -> Term {
        self
    }
}

impl IntoTerm for TypedValue {
    fn into_term(self) -> Term {
        self.into()
    }
}

impl IntoTerm for bool {
    fn into_term(self) -> Term {
        Literal::from(self).into()
    }
}

impl IntoTerm for Numeric {
    fn into_term(self) -> Term {
        Literal::from(self).into()
    }
}

impl IntoTerm for Integer {
    fn into_term(self) -> Term {
        Literal::from(self).into()
    }
}

impl IntoTerm for Decimal {
    fn into_term(self) -> Term {
        Literal::from(self).into()
    }
}

impl IntoTerm for DateTime {
    fn into_term(self) -> Term {
        Literal::from(self).into()
    }
}

impl IntoTerm for DayTimeDuration {
    fn into_term(self) -> Term {
        Literal::from(self).into()
    }
}

impl IntoTerm for Literal {
    fn into_term(self) -> Term {
        self.into()
    }
}

impl IntoTerm for NamedNode {
    fn into_term(self) -> Term {
        self.into()
    }
}

impl IntoTerm for BlankNode {
    fn into_term(self) -> Term {
        self.into()
    }
}

impl IntoTerm for StringLiteral {
    fn into_term(self) -> Term {
        match self.language {
            Some(language) => {
                Literal::new_language_tagged_literal_unchecked(self.value, language).into()
            }
            None => Literal::new_simple_literal(self.value).into(),
        }
    }
}
