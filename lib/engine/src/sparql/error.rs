use rdf_weave_common::error::StorageError;
use rdf_weave_model::{NamedNode, SparqlSyntaxError};
use rdf_weave_physical::EvaluationError;
use std::convert::Infallible;
use std::error::Error;

/// A SPARQL evaluation error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryEvaluationError {
    /// An error in SPARQL parsing.
    #[error(transparent)]
    Parsing(#[from] SparqlSyntaxError),
    /// An error from the storage.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The query did not complete before its timeout.
    #[error("The query did not complete in time")]
    Timeout,
    /// Error during `SERVICE` evaluation
    #[error("{0}")]
    Service(#[source] Box<dyn Error + Send + Sync + 'static>),
    /// The given `SERVICE` is not supported
    #[error("The service {0} is not supported")]
    UnsupportedService(NamedNode),
    #[error("A feature has not yet been implemented: {0}")]
    NotImplemented(String),
    #[error("An internal error that likely indicates towards a bug in RDF Weave: {0}")]
    InternalError(String),
}

impl QueryEvaluationError {
    pub fn internal<T>(cause: impl Into<String>) -> Result<T, Self> {
        Err(QueryEvaluationError::InternalError(cause.into()))
    }

    /// Returns true if the query was aborted because of its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, QueryEvaluationError::Timeout)
    }
}

impl From<Infallible> for QueryEvaluationError {
    #[inline]
    fn from(error: Infallible) -> Self {
        match error {}
    }
}

impl From<EvaluationError> for QueryEvaluationError {
    fn from(error: EvaluationError) -> Self {
        match error {
            EvaluationError::Timeout => Self::Timeout,
            EvaluationError::Storage(error) => Self::Storage(error),
            EvaluationError::Service { source, .. } => Self::Service(source),
            EvaluationError::UnsupportedService(endpoint) => Self::UnsupportedService(endpoint),
            EvaluationError::NotImplemented(feature) => Self::NotImplemented(feature),
            EvaluationError::Internal(cause) => Self::InternalError(cause),
            error => Self::InternalError(error.to_string()),
        }
    }
}
