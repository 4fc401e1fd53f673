//! [SPARQL](https://www.w3.org/TR/sparql11-overview/) implementation.

mod algebra;
pub mod error;
mod eval;
mod explanation;
mod rewriting;

pub use crate::results::{QueryResults, QuerySolution, QuerySolutions};
pub use crate::sparql::algebra::Query;
pub use crate::sparql::explanation::QueryExplanation;
pub use eval::evaluate_query;
pub use rdf_weave_logical::optimizer::{OptimizationLevel, OptimizerConfig};
pub use rdf_weave_model::{QueryDataset, SparqlSyntaxError, Variable};
pub use rdf_weave_physical::ServiceHandler;

use rdf_weave_physical::EvaluationOptions;
use std::sync::Arc;
use std::time::Duration;

/// Options for SPARQL query evaluation.
///
/// The options are an immutable value that is passed along with each query.
#[derive(Clone, Default, Debug)]
pub struct QueryOptions {
    /// How much effort the optimizer spends on the query.
    pub optimization_level: OptimizationLevel,
    /// The optimizer rules that may run.
    pub optimizer: OptimizerConfig,
    /// Restricts `+` and `-` to numeric operands.
    pub strict_operators: bool,
    /// Evaluates BGPs pattern by pattern and closures with two bound ends from every start node.
    pub rigorous_evaluation: bool,
    /// Evaluates independent branches of joins and unions on the rayon thread pool.
    pub parallel: bool,
    /// Aborts the query once the duration has elapsed.
    pub timeout: Option<Duration>,
    /// Matches unscoped patterns against the union of all graphs instead of the default graph.
    pub default_graph_as_union: bool,
    /// Evaluates `SERVICE` clauses. Without a handler, only `SERVICE SILENT` succeeds.
    pub service_handler: Option<Arc<dyn ServiceHandler>>,
}

impl QueryOptions {
    /// Uses `handler` for `SERVICE` clauses.
    #[must_use]
    pub fn with_service_handler(mut self, handler: Arc<dyn ServiceHandler>) -> Self {
        self.service_handler = Some(handler);
        self
    }

    /// Returns the options that the evaluator needs.
    pub(crate) fn evaluation_options(&self) -> EvaluationOptions {
        EvaluationOptions {
            strict_operators: self.strict_operators,
            rigorous_evaluation: self.rigorous_evaluation,
            parallel: self.parallel,
            timeout: self.timeout,
        }
    }
}
