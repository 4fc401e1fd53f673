use crate::Multiset;
use rdf_weave_logical::Algebra;
use rdf_weave_model::NamedNode;
use std::error::Error;
use std::fmt::Debug;

/// Evaluates the graph pattern of a `SERVICE` clause against a remote endpoint.
///
/// RDF Weave does not ship a handler. Applications that want to support federated queries
/// provide their own, e.g., one that sends the pattern to a SPARQL endpoint over HTTP.
pub trait ServiceHandler: Debug + Send + Sync {
    /// Evaluates `pattern` at `endpoint` and returns the solutions.
    ///
    /// The pattern is the algebra of the `SERVICE` body as translated from the query. The
    /// optimizer does not rewrite it.
    fn handle(
        &self,
        endpoint: &NamedNode,
        pattern: &Algebra,
    ) -> Result<Multiset, Box<dyn Error + Send + Sync + 'static>>;
}
