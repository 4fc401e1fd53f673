use rdf_weave_model::{DateTime, Iri};

/// Query-wide state that some functions depend on.
#[derive(Debug, Clone)]
pub struct FunctionContext {
    /// The value of `NOW()`. Fixed once per query.
    pub now: DateTime,
    /// The base IRI used by `IRI()` to resolve relative IRIs.
    pub base_iri: Option<Iri<String>>,
    /// If set, `+` and `-` only accept numeric operands.
    pub strict_operators: bool,
}

impl FunctionContext {
    /// Creates a context with the current time as `NOW()`.
    pub fn new(base_iri: Option<Iri<String>>, strict_operators: bool) -> Self {
        Self {
            now: DateTime::now(),
            base_iri,
            strict_operators,
        }
    }
}

impl Default for FunctionContext {
    fn default() -> Self {
        Self::new(None, false)
    }
}
