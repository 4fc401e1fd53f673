use rdf_weave_logical::Algebra;
use std::time::Duration;

/// Describes how a query has been planned.
///
/// Both algebras render with the canonical string form, e.g., `Join(Bgp(..), Filter(..))`.
#[derive(Debug, Clone)]
pub struct QueryExplanation {
    /// The time spent translating and optimizing the query.
    pub planning_time: Duration,
    /// The algebra created from the SPARQL query.
    pub initial_algebra: Algebra,
    /// The algebra after the optimizer ran. This is the algebra that was evaluated.
    pub optimized_algebra: Algebra,
}
