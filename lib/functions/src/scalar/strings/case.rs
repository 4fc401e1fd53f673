use crate::scalar::{stateless_sparql_op, StringLiteral, UnarySparqlOp};
use rdf_weave_model::ThinResult;

stateless_sparql_op!(UCaseSparqlOp, "UCASE");

impl UnarySparqlOp for UCaseSparqlOp {
    type Arg = StringLiteral;
    type Result = StringLiteral;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(value.with_value(value.value.to_uppercase()))
    }
}

stateless_sparql_op!(LCaseSparqlOp, "LCASE");

impl UnarySparqlOp for LCaseSparqlOp {
    type Arg = StringLiteral;
    type Result = StringLiteral;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(value.with_value(value.value.to_lowercase()))
    }
}
