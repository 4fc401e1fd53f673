use crate::scalar::{stateless_sparql_op, NArySparqlOp, StringLiteral};
use rdf_weave_model::ThinResult;

stateless_sparql_op!(
    /// Concatenates strings. The result keeps the language tag only if all arguments share it.
    ConcatSparqlOp,
    "CONCAT"
);

impl NArySparqlOp for ConcatSparqlOp {
    type Args = StringLiteral;
    type Result = StringLiteral;

    fn evaluate(&self, args: &[Self::Args]) -> ThinResult<Self::Result> {
        let mut result = String::default();
        let mut language: Option<Option<&str>> = None;

        for arg in args {
            let arg_language = arg.language.as_deref();
            if let Some(lang) = language {
                if lang != arg_language {
                    language = Some(None);
                }
            } else {
                language = Some(arg_language);
            }
            result.push_str(&arg.value);
        }

        Ok(StringLiteral::new(
            result,
            language.flatten().map(ToOwned::to_owned),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_keeps_common_language() {
        let result = ConcatSparqlOp::new()
            .evaluate(&[
                StringLiteral::new("a", Some("en".to_owned())),
                StringLiteral::new("b", Some("en".to_owned())),
            ])
            .unwrap();
        assert_eq!(result, StringLiteral::new("ab", Some("en".to_owned())));
    }

    #[test]
    fn concat_drops_mixed_languages() {
        let result = ConcatSparqlOp::new()
            .evaluate(&[
                StringLiteral::new("a", Some("en".to_owned())),
                StringLiteral::new("b", None),
            ])
            .unwrap();
        assert_eq!(result, StringLiteral::new("ab", None));
    }

    #[test]
    fn concat_of_nothing_is_empty() {
        let result = ConcatSparqlOp::new().evaluate(&[]).unwrap();
        assert_eq!(result, StringLiteral::new("", None));
    }
}
