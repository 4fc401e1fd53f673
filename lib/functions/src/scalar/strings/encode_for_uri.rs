use crate::scalar::{stateless_sparql_op, StringLiteral, UnarySparqlOp};
use rdf_weave_model::{ThinError, ThinResult};

stateless_sparql_op!(EncodeForUriSparqlOp, "ENCODE_FOR_URI");

impl UnarySparqlOp for EncodeForUriSparqlOp {
    type Arg = StringLiteral;
    type Result = StringLiteral;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        let mut result = Vec::with_capacity(value.value.len());
        for c in value.value.bytes() {
            match c {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    result.push(c);
                }
                _ => {
                    result.push(b'%');
                    result.push(hex_digit(c / 16));
                    result.push(hex_digit(c % 16));
                }
            }
        }

        let result = String::from_utf8(result).map_err(|_| ThinError::default())?;
        Ok(StringLiteral::new(result, None))
    }
}

fn hex_digit(value: u8) -> u8 {
    if value < 10 {
        b'0' + value
    } else {
        b'A' + (value - 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reserved_and_non_ascii_characters() {
        let result = EncodeForUriSparqlOp::new()
            .evaluate(StringLiteral::new("Los Angeles/\u{fc}", None))
            .unwrap();
        assert_eq!(result.value, "Los%20Angeles%2F%C3%BC");
    }
}
