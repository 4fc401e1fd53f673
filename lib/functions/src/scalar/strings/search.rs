use crate::scalar::{stateless_sparql_op, BinarySparqlOp, StringLiteral};
use rdf_weave_model::{ThinError, ThinResult};

/// Fails unless the two arguments are argument compatible.
fn compatible(lhs: &StringLiteral, rhs: &StringLiteral) -> ThinResult<()> {
    if lhs.is_compatible_with(rhs) {
        Ok(())
    } else {
        ThinError::expected()
    }
}

stateless_sparql_op!(StrStartsSparqlOp, "STRSTARTS");

impl BinarySparqlOp for StrStartsSparqlOp {
    type ArgLhs = StringLiteral;
    type ArgRhs = StringLiteral;
    type Result = bool;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        compatible(&lhs, &rhs)?;
        Ok(lhs.value.starts_with(&rhs.value))
    }
}

stateless_sparql_op!(StrEndsSparqlOp, "STRENDS");

impl BinarySparqlOp for StrEndsSparqlOp {
    type ArgLhs = StringLiteral;
    type ArgRhs = StringLiteral;
    type Result = bool;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        compatible(&lhs, &rhs)?;
        Ok(lhs.value.ends_with(&rhs.value))
    }
}

stateless_sparql_op!(ContainsSparqlOp, "CONTAINS");

impl BinarySparqlOp for ContainsSparqlOp {
    type ArgLhs = StringLiteral;
    type ArgRhs = StringLiteral;
    type Result = bool;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        compatible(&lhs, &rhs)?;
        Ok(lhs.value.contains(&rhs.value))
    }
}

stateless_sparql_op!(
    /// Returns the part of the first argument before the first occurrence of the second one.
    ///
    /// If there is no occurrence, the result is the empty simple literal.
    StrBeforeSparqlOp,
    "STRBEFORE"
);

impl BinarySparqlOp for StrBeforeSparqlOp {
    type ArgLhs = StringLiteral;
    type ArgRhs = StringLiteral;
    type Result = StringLiteral;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        compatible(&lhs, &rhs)?;
        Ok(match lhs.value.find(&rhs.value) {
            Some(position) => lhs.with_value(&lhs.value[..position]),
            None => StringLiteral::new("", None),
        })
    }
}

stateless_sparql_op!(
    /// Returns the part of the first argument after the first occurrence of the second one.
    ///
    /// If there is no occurrence, the result is the empty simple literal.
    StrAfterSparqlOp,
    "STRAFTER"
);

impl BinarySparqlOp for StrAfterSparqlOp {
    type ArgLhs = StringLiteral;
    type ArgRhs = StringLiteral;
    type Result = StringLiteral;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        compatible(&lhs, &rhs)?;
        Ok(match lhs.value.find(&rhs.value) {
            Some(position) => lhs.with_value(&lhs.value[position + rhs.value.len()..]),
            None => StringLiteral::new("", None),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en(value: &str) -> StringLiteral {
        StringLiteral::new(value, Some("en".to_owned()))
    }

    fn simple(value: &str) -> StringLiteral {
        StringLiteral::new(value, None)
    }

    #[test]
    fn incompatible_languages_fail() {
        let result = ContainsSparqlOp::new().evaluate(simple("abc"), en("b"));
        assert!(result.is_err());
        assert!(ContainsSparqlOp::new().evaluate(en("abc"), simple("b")).unwrap());
    }

    #[test]
    fn str_before_and_after() {
        assert_eq!(
            StrBeforeSparqlOp::new().evaluate(en("abc"), simple("b")).unwrap(),
            en("a")
        );
        assert_eq!(
            StrAfterSparqlOp::new().evaluate(en("abc"), simple("b")).unwrap(),
            en("c")
        );
        assert_eq!(
            StrAfterSparqlOp::new().evaluate(en("abc"), simple("z")).unwrap(),
            simple("")
        );
        assert_eq!(
            StrBeforeSparqlOp::new().evaluate(en("abc"), simple("")).unwrap(),
            en("")
        );
    }
}
