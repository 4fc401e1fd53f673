use crate::scalar::{stateless_sparql_op, UnarySparqlOp};
use rdf_weave_model::{ThinResult, TypedValue};

stateless_sparql_op!(
    /// Negates the effective boolean value of its argument.
    NotSparqlOp,
    "NOT"
);

impl UnarySparqlOp for NotSparqlOp {
    type Arg = TypedValue;
    type Result = bool;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        value.effective_boolean_value().map(|value| !value)
    }
}
