use crate::scalar::{stateless_sparql_op, BinarySparqlOp, SimpleLiteral};
use rdf_weave_model::ThinResult;

stateless_sparql_op!(
    /// Basic filtering of [RFC 4647](https://www.rfc-editor.org/rfc/rfc4647) language ranges.
    LangMatchesSparqlOp,
    "LANGMATCHES"
);

impl BinarySparqlOp for LangMatchesSparqlOp {
    type ArgLhs = SimpleLiteral;
    type ArgRhs = SimpleLiteral;
    type Result = bool;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        let (tag, range) = (lhs.0, rhs.0);
        if range == "*" {
            return Ok(!tag.is_empty());
        }

        let mut range_subtags = range.split('-');
        let mut tag_subtags = tag.split('-');
        loop {
            match (range_subtags.next(), tag_subtags.next()) {
                (None, _) => return Ok(true),
                (Some(_), None) => return Ok(false),
                (Some(range_subtag), Some(tag_subtag)) => {
                    if !range_subtag.eq_ignore_ascii_case(tag_subtag) {
                        return Ok(false);
                    }
                }
            }
        }
    }
}
