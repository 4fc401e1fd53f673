use crate::scalar::{
    stateless_sparql_op, BinarySparqlOp, NullarySparqlOp, SimpleLiteral, SparqlOp, UnarySparqlOp,
};
use rdf_weave_model::vocab::xsd;
use rdf_weave_model::{
    literal_datatype, BlankNode, Iri, Literal, NamedNode, Term, ThinError, ThinResult,
    TypedValue,
};

stateless_sparql_op!(IsIriSparqlOp, "ISIRI");

impl UnarySparqlOp for IsIriSparqlOp {
    type Arg = Term;
    type Result = bool;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(matches!(value, Term::NamedNode(_)))
    }
}

stateless_sparql_op!(IsBlankSparqlOp, "ISBLANK");

impl UnarySparqlOp for IsBlankSparqlOp {
    type Arg = Term;
    type Result = bool;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(matches!(value, Term::BlankNode(_)))
    }
}

stateless_sparql_op!(IsLiteralSparqlOp, "ISLITERAL");

impl UnarySparqlOp for IsLiteralSparqlOp {
    type Arg = Term;
    type Result = bool;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(matches!(value, Term::Literal(_)))
    }
}

stateless_sparql_op!(
    /// Returns true for literals with a numeric datatype and a valid lexical form.
    IsNumericSparqlOp,
    "ISNUMERIC"
);

impl UnarySparqlOp for IsNumericSparqlOp {
    type Arg = TypedValue;
    type Result = bool;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(matches!(value, TypedValue::NumericLiteral(_)))
    }
}

stateless_sparql_op!(StrSparqlOp, "STR");

impl UnarySparqlOp for StrSparqlOp {
    type Arg = Term;
    type Result = Literal;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        match value {
            Term::NamedNode(node) => Ok(Literal::new_simple_literal(node.into_string())),
            Term::Literal(literal) => Ok(Literal::new_simple_literal(literal.value())),
            _ => ThinError::expected(),
        }
    }
}

stateless_sparql_op!(LangSparqlOp, "LANG");

impl UnarySparqlOp for LangSparqlOp {
    type Arg = Term;
    type Result = Literal;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        match value {
            Term::Literal(literal) => Ok(Literal::new_simple_literal(
                literal.language().unwrap_or_default(),
            )),
            _ => ThinError::expected(),
        }
    }
}

stateless_sparql_op!(DatatypeSparqlOp, "DATATYPE");

impl UnarySparqlOp for DatatypeSparqlOp {
    type Arg = Term;
    type Result = NamedNode;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        match value {
            Term::Literal(literal) => Ok(literal_datatype(literal.as_ref())),
            _ => ThinError::expected(),
        }
    }
}

/// `IRI()`. Relative IRIs are resolved against the base IRI of the query.
#[derive(Debug, Clone, Default)]
pub struct IriSparqlOp {
    base_iri: Option<Iri<String>>,
}

impl IriSparqlOp {
    pub fn new(base_iri: Option<Iri<String>>) -> Self {
        Self { base_iri }
    }
}

impl SparqlOp for IriSparqlOp {
    fn name(&self) -> &str {
        "IRI"
    }
}

impl UnarySparqlOp for IriSparqlOp {
    type Arg = Term;
    type Result = NamedNode;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        match value {
            Term::NamedNode(node) => Ok(node),
            Term::Literal(literal)
                if literal.language().is_none() && literal.datatype() == xsd::STRING =>
            {
                let iri = match &self.base_iri {
                    Some(base_iri) => base_iri.resolve(literal.value())?,
                    None => Iri::parse(literal.value().to_owned())?,
                };
                Ok(NamedNode::new_unchecked(iri.into_inner()))
            }
            _ => ThinError::expected(),
        }
    }
}

stateless_sparql_op!(
    /// Creates a fresh blank node. The optional string argument only needs to be a simple
    /// literal; every call produces a new node.
    BNodeSparqlOp,
    "BNODE"
);

impl NullarySparqlOp for BNodeSparqlOp {
    type Result = BlankNode;

    fn evaluate(&self) -> ThinResult<Self::Result> {
        Ok(BlankNode::default())
    }
}

impl UnarySparqlOp for BNodeSparqlOp {
    type Arg = SimpleLiteral;
    type Result = BlankNode;

    fn evaluate(&self, _value: Self::Arg) -> ThinResult<Self::Result> {
        Ok(BlankNode::default())
    }
}

stateless_sparql_op!(StrDtSparqlOp, "STRDT");

impl BinarySparqlOp for StrDtSparqlOp {
    type ArgLhs = SimpleLiteral;
    type ArgRhs = NamedNode;
    type Result = Literal;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        Ok(Literal::new_typed_literal(lhs.0, rhs))
    }
}

stateless_sparql_op!(StrLangSparqlOp, "STRLANG");

impl BinarySparqlOp for StrLangSparqlOp {
    type ArgLhs = SimpleLiteral;
    type ArgRhs = SimpleLiteral;
    type Result = Literal;

    fn evaluate(&self, lhs: Self::ArgLhs, rhs: Self::ArgRhs) -> ThinResult<Self::Result> {
        Literal::new_language_tagged_literal(lhs.0, rhs.0).map_err(|_| ThinError::default())
    }
}

stateless_sparql_op!(UuidSparqlOp, "UUID");

impl NullarySparqlOp for UuidSparqlOp {
    type Result = NamedNode;

    fn evaluate(&self) -> ThinResult<Self::Result> {
        let iri = format!("urn:uuid:{}", uuid::Uuid::new_v4());
        Ok(NamedNode::new_unchecked(iri))
    }
}

stateless_sparql_op!(StrUuidSparqlOp, "STRUUID");

impl NullarySparqlOp for StrUuidSparqlOp {
    type Result = Literal;

    fn evaluate(&self) -> ThinResult<Self::Result> {
        Ok(Literal::new_simple_literal(uuid::Uuid::new_v4().to_string()))
    }
}
