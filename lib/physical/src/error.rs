use rdf_weave_common::error::StorageError;
use rdf_weave_model::NamedNode;
use std::error::Error;

/// An error that aborts the evaluation of an algebra tree.
///
/// Expected failures of single solutions (e.g., a type error in a filter) are not reported
/// through this type. They leave a variable unbound or drop the solution instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EvaluationError {
    /// The deadline of the query has passed.
    #[error("The query did not complete before its deadline")]
    Timeout,
    /// An error from the dataset.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The handler of a `SERVICE` call failed.
    #[error("The service {endpoint} failed: {source}")]
    Service {
        endpoint: NamedNode,
        #[source]
        source: Box<dyn Error + Send + Sync + 'static>,
    },
    /// No handler is able to evaluate the given `SERVICE`.
    #[error("The service {0} is not supported")]
    UnsupportedService(NamedNode),
    #[error("A feature has not yet been implemented: {0}")]
    NotImplemented(String),
    /// The algebra tree is malformed. This indicates a bug in the translation or the optimizer.
    #[error("An internal error occurred during the evaluation: {0}")]
    Internal(String),
}

impl EvaluationError {
    pub fn internal<T>(cause: impl Into<String>) -> Result<T, Self> {
        Err(EvaluationError::Internal(cause.into()))
    }
}
