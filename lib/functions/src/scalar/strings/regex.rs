use crate::scalar::{
    stateless_sparql_op, BinarySparqlOp, QuaternarySparqlOp, SimpleLiteral, StringLiteral,
    TernarySparqlOp,
};
use regex::{Regex, RegexBuilder};
use rdf_weave_model::{ThinError, ThinResult};
use std::borrow::Cow;

stateless_sparql_op!(RegexSparqlOp, "REGEX");

impl BinarySparqlOp for RegexSparqlOp {
    type ArgLhs = StringLiteral;
    type ArgRhs = SimpleLiteral;
    type Result = bool;

    fn evaluate(&self, text: Self::ArgLhs, pattern: Self::ArgRhs) -> ThinResult<Self::Result> {
        let regex = compile_pattern(&pattern.0, None)?;
        Ok(regex.is_match(&text.value))
    }
}

impl TernarySparqlOp for RegexSparqlOp {
    type Arg0 = StringLiteral;
    type Arg1 = SimpleLiteral;
    type Arg2 = SimpleLiteral;
    type Result = bool;

    fn evaluate(
        &self,
        text: Self::Arg0,
        pattern: Self::Arg1,
        flags: Self::Arg2,
    ) -> ThinResult<Self::Result> {
        let regex = compile_pattern(&pattern.0, Some(&flags.0))?;
        Ok(regex.is_match(&text.value))
    }
}

stateless_sparql_op!(ReplaceSparqlOp, "REPLACE");

impl TernarySparqlOp for ReplaceSparqlOp {
    type Arg0 = StringLiteral;
    type Arg1 = SimpleLiteral;
    type Arg2 = SimpleLiteral;
    type Result = StringLiteral;

    fn evaluate(
        &self,
        text: Self::Arg0,
        pattern: Self::Arg1,
        replacement: Self::Arg2,
    ) -> ThinResult<Self::Result> {
        let regex = compile_pattern(&pattern.0, None)?;
        Ok(replace(&regex, &text, &replacement.0))
    }
}

impl QuaternarySparqlOp for ReplaceSparqlOp {
    type Arg0 = StringLiteral;
    type Arg1 = SimpleLiteral;
    type Arg2 = SimpleLiteral;
    type Arg3 = SimpleLiteral;
    type Result = StringLiteral;

    fn evaluate(
        &self,
        text: Self::Arg0,
        pattern: Self::Arg1,
        replacement: Self::Arg2,
        flags: Self::Arg3,
    ) -> ThinResult<Self::Result> {
        let regex = compile_pattern(&pattern.0, Some(&flags.0))?;
        Ok(replace(&regex, &text, &replacement.0))
    }
}

fn replace(regex: &Regex, text: &StringLiteral, replacement: &str) -> StringLiteral {
    let result = match regex.replace_all(&text.value, replacement) {
        Cow::Owned(replaced) => replaced,
        Cow::Borrowed(_) => text.value.clone(),
    };
    text.with_value(result)
}

/// Compiles a SPARQL regular expression with the given flags.
///
/// Supported flags are `s`, `m`, `i`, `x` and `q`. Unknown flags and patterns whose compiled form
/// exceeds the size limit produce an error.
pub fn compile_pattern(pattern: &str, flags: Option<&str>) -> ThinResult<Regex> {
    const REGEX_SIZE_LIMIT: usize = 1_000_000;

    let mut pattern = Cow::Borrowed(pattern);
    let flags = flags.unwrap_or_default();
    if flags.contains('q') {
        pattern = regex::escape(&pattern).into();
    }
    let mut regex_builder = RegexBuilder::new(&pattern);
    regex_builder.size_limit(REGEX_SIZE_LIMIT);
    for flag in flags.chars() {
        match flag {
            's' => {
                regex_builder.dot_matches_new_line(true);
            }
            'm' => {
                regex_builder.multi_line(true);
            }
            'i' => {
                regex_builder.case_insensitive(true);
            }
            'x' => {
                regex_builder.ignore_whitespace(true);
            }
            'q' => (),
            _ => return ThinError::expected(),
        }
    }
    regex_builder.build().map_err(|_| ThinError::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(value: &str) -> SimpleLiteral {
        SimpleLiteral(value.to_owned())
    }

    #[test]
    fn regex_with_flags() {
        let op = RegexSparqlOp::new();
        let text = StringLiteral::new("Hello World", None);
        assert!(!BinarySparqlOp::evaluate(&op, text.clone(), simple("^hello")).unwrap());
        assert!(TernarySparqlOp::evaluate(&op, text, simple("^hello"), simple("i")).unwrap());
    }

    #[test]
    fn quote_flag_escapes_the_pattern() {
        let op = RegexSparqlOp::new();
        let text = StringLiteral::new("a.b", None);
        assert!(TernarySparqlOp::evaluate(&op, text.clone(), simple("."), simple("q")).unwrap());
        assert!(!TernarySparqlOp::evaluate(
            &op,
            StringLiteral::new("ab", None),
            simple("."),
            simple("q")
        )
        .unwrap());
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(compile_pattern("a", Some("z")).is_err());
    }

    #[test]
    fn replace_keeps_language() {
        let result = TernarySparqlOp::evaluate(
            &ReplaceSparqlOp::new(),
            StringLiteral::new("abcd", Some("en".to_owned())),
            simple("b(c)"),
            simple("[$1]"),
        )
        .unwrap();
        assert_eq!(result, StringLiteral::new("a[c]d", Some("en".to_owned())));
    }
}
