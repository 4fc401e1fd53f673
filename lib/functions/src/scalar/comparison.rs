use crate::scalar::{stateless_sparql_op, BinarySparqlOp};
use rdf_weave_model::{Term, ThinError, ThinResult, TypedValue};
use std::cmp::Ordering;

stateless_sparql_op!(
    /// The SPARQL `=` operator. Compares values, not terms.
    EqualSparqlOp,
    "EQ"
);

impl BinarySparqlOp for EqualSparqlOp {
    type ArgLhs = TypedValue;
    type ArgRhs = TypedValue;
    type Result = bool;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        lhs.sparql_eq(&rhs)
    }
}

stateless_sparql_op!(
    /// `sameTerm`: RDF term equality. Never fails.
    SameTermSparqlOp,
    "SAMETERM"
);

impl BinarySparqlOp for SameTermSparqlOp {
    type ArgLhs = Term;
    type ArgRhs = Term;
    type Result = bool;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        Ok(lhs == rhs)
    }
}

macro_rules! create_binary_cmp_op {
    ($STRUCT: ident, $NAME: expr, $ORDERINGS: expr) => {
        stateless_sparql_op!($STRUCT, $NAME);

        impl BinarySparqlOp for $STRUCT {
            type ArgLhs = TypedValue;
            type ArgRhs = TypedValue;
            type Result = bool;

            fn evaluate(
                &self,
                lhs: Self::ArgLhs,
                rhs: Self::ArgRhs,
            ) -> ThinResult<Self::Result> {
                lhs.partial_cmp(&rhs)
                    .map(|o| $ORDERINGS.contains(&o))
                    .ok_or(ThinError::default())
            }
        }
    };
}

create_binary_cmp_op!(GreaterThanSparqlOp, "GT", [Ordering::Greater]);
create_binary_cmp_op!(
    GreaterOrEqualSparqlOp,
    "GEQ",
    [Ordering::Equal, Ordering::Greater]
);
create_binary_cmp_op!(LessThanSparqlOp, "LT", [Ordering::Less]);
create_binary_cmp_op!(LessOrEqualSparqlOp, "LEQ", [Ordering::Less, Ordering::Equal]);

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_weave_model::{Float, Integer, Literal, NamedNode, Numeric};

    #[test]
    fn test_lth_int_with_float() {
        let less_than = LessThanSparqlOp::new();
        let result = less_than
            .evaluate(
                TypedValue::NumericLiteral(Numeric::Integer(Integer::from(5))),
                TypedValue::NumericLiteral(Numeric::Float(Float::from(10.0_f32))),
            )
            .unwrap();
        assert!(result);
    }

    #[test]
    fn test_iris_are_not_ordered() {
        let iri = TypedValue::NamedNode(NamedNode::new_unchecked("http://example.com/a"));
        assert!(GreaterThanSparqlOp::new()
            .evaluate(iri.clone(), iri)
            .is_err());
    }

    #[test]
    fn test_same_term_distinguishes_lexical_forms() {
        let one = Term::from(Literal::new_typed_literal(
            "1",
            rdf_weave_model::vocab::xsd::INTEGER,
        ));
        let zero_one = Term::from(Literal::new_typed_literal(
            "01",
            rdf_weave_model::vocab::xsd::INTEGER,
        ));
        assert!(!SameTermSparqlOp::new().evaluate(one.clone(), zero_one.clone()).unwrap());
        assert!(EqualSparqlOp::new()
            .evaluate(
                TypedValue::from_term(one.as_ref()),
                TypedValue::from_term(zero_one.as_ref())
            )
            .unwrap());
    }
}
