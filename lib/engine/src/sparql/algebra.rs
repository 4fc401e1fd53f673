use rdf_weave_model::SparqlSyntaxError;
use std::fmt;
use std::str::FromStr;

/// A parsed [SPARQL query](https://www.w3.org/TR/sparql11-query/).
///
/// ```
/// use rdf_weave_engine::sparql::Query;
///
/// let query_str = "SELECT ?s ?p ?o WHERE { ?s ?p ?o . }";
/// let query = Query::parse(query_str)?;
///
/// assert_eq!(query.to_string(), query_str);
/// # Ok::<_, rdf_weave_engine::sparql::SparqlSyntaxError>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Query {
    pub(crate) inner: spargebra::Query,
}

impl Query {
    /// Parses a SPARQL query.
    pub fn parse(query: &str) -> Result<Self, SparqlSyntaxError> {
        Ok(Self {
            inner: spargebra::Query::parse(query, None)?,
        })
    }

    /// Returns the parsed query.
    pub fn inner(&self) -> &spargebra::Query {
        &self.inner
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl FromStr for Query {
    type Err = SparqlSyntaxError;

    fn from_str(query: &str) -> Result<Self, Self::Err> {
        Self::parse(query)
    }
}

impl TryFrom<&str> for Query {
    type Error = SparqlSyntaxError;

    fn try_from(query: &str) -> Result<Self, Self::Error> {
        Self::from_str(query)
    }
}

impl TryFrom<&String> for Query {
    type Error = SparqlSyntaxError;

    fn try_from(query: &String) -> Result<Self, Self::Error> {
        Self::from_str(query)
    }
}

impl From<spargebra::Query> for Query {
    fn from(inner: spargebra::Query) -> Self {
        Self { inner }
    }
}
