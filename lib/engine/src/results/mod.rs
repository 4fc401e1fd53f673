//! The results of a SPARQL query.

mod solutions;

use rdf_weave_model::Triple;
pub use solutions::QuerySolutions;
pub use sparesults::QuerySolution;

/// Results of a [SPARQL query](https://www.w3.org/TR/sparql11-query/).
#[derive(Debug)]
pub enum QueryResults {
    /// Results of a [SELECT](https://www.w3.org/TR/sparql11-query/#select) query.
    Solutions(QuerySolutions),
    /// Result of a [ASK](https://www.w3.org/TR/sparql11-query/#ask) query.
    Boolean(bool),
    /// Results of a [CONSTRUCT](https://www.w3.org/TR/sparql11-query/#construct) or
    /// [DESCRIBE](https://www.w3.org/TR/sparql11-query/#describe) query. Every triple occurs
    /// once.
    Graph(Vec<Triple>),
}

impl QueryResults {
    /// Returns the solutions of a SELECT query.
    pub fn into_solutions(self) -> Option<QuerySolutions> {
        match self {
            QueryResults::Solutions(solutions) => Some(solutions),
            _ => None,
        }
    }

    /// Returns the result of an ASK query.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            QueryResults::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the triples of a CONSTRUCT or DESCRIBE query.
    pub fn into_graph(self) -> Option<Vec<Triple>> {
        match self {
            QueryResults::Graph(triples) => Some(triples),
            _ => None,
        }
    }
}

impl From<QuerySolutions> for QueryResults {
    #[inline]
    fn from(value: QuerySolutions) -> Self {
        Self::Solutions(value)
    }
}

impl From<bool> for QueryResults {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}
