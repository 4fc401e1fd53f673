use crate::scalar::{
    stateless_sparql_op, BinarySparqlOp, StringLiteral, TernarySparqlOp, UnarySparqlOp,
};
use rdf_weave_model::{Integer, ThinResult};

stateless_sparql_op!(StrLenSparqlOp, "STRLEN");

impl UnarySparqlOp for StrLenSparqlOp {
    type Arg = StringLiteral;
    type Result = Integer;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        let length = i64::try_from(value.value.chars().count())?;
        Ok(Integer::from(length))
    }
}

stateless_sparql_op!(
    /// `SUBSTR` with 1-based character positions. Positions outside the string are ignored.
    SubStrSparqlOp,
    "SUBSTR"
);

impl BinarySparqlOp for SubStrSparqlOp {
    type ArgLhs = StringLiteral;
    type ArgRhs = Integer;
    type Result = StringLiteral;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        Ok(evaluate_substr(&lhs, rhs, None))
    }
}

impl TernarySparqlOp for SubStrSparqlOp {
    type Arg0 = StringLiteral;
    type Arg1 = Integer;
    type Arg2 = Integer;
    type Result = StringLiteral;

    fn evaluate(
        &self,
        arg0: Self::Arg0,
        arg1: Self::Arg1,
        arg2: Self::Arg2,
    ) -> ThinResult<Self::Result> {
        Ok(evaluate_substr(&arg0, arg1, Some(arg2)))
    }
}

fn evaluate_substr(
    source: &StringLiteral,
    starting_loc: Integer,
    length: Option<Integer>,
) -> StringLiteral {
    let start = i64::from(starting_loc);
    let end = length.map(|length| start.saturating_add(i64::from(length)));

    let result = source
        .value
        .chars()
        .zip(1_i64..)
        .filter(|(_, position)| *position >= start && end.map_or(true, |end| *position < end))
        .map(|(c, _)| c)
        .collect::<String>();
    source.with_value(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substr(value: &str, start: i64, length: Option<i64>) -> String {
        let source = StringLiteral::new(value, None);
        let op = SubStrSparqlOp::new();
        let result = match length {
            Some(length) => TernarySparqlOp::evaluate(
                &op,
                source,
                Integer::from(start),
                Integer::from(length),
            ),
            None => BinarySparqlOp::evaluate(&op, source, Integer::from(start)),
        };
        result.unwrap().value
    }

    #[test]
    fn substr_uses_character_positions() {
        assert_eq!(substr("motor", 2, Some(3)), "oto");
        assert_eq!(substr("motor", 3, None), "tor");
        assert_eq!(substr("\u{e4}bc", 2, None), "bc");
    }

    #[test]
    fn substr_with_positions_outside_of_the_string() {
        assert_eq!(substr("12345", 0, Some(3)), "12");
        assert_eq!(substr("12345", 10, None), "");
        assert_eq!(substr("12345", -1, Some(1)), "");
    }

    #[test]
    fn strlen_counts_characters() {
        let result = StrLenSparqlOp::new()
            .evaluate(StringLiteral::new("\u{e4}b", None))
            .unwrap();
        assert_eq!(result, Integer::from(2));
    }
}
