//! API to access an in-memory [RDF dataset](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset).
//!
//! The entry point of the module is the [`Store`] struct.

use crate::error::{LoaderError, QueryEvaluationError};
use oxrdfio::RdfParser;
use rdf_weave_common::error::StorageError;
use rdf_weave_engine::sparql::{Query, QueryExplanation, QueryOptions, QueryResults};
use rdf_weave_engine::WeaveContext;
use rdf_weave_model::{GraphNameRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef};
use rdf_weave_storage::MemoryQuadStorage;
use std::io::Read;
use std::sync::Arc;

/// An [RDF dataset](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset) store.
///
/// The store can be queried using [SPARQL](https://www.w3.org/TR/sparql11-query). Each query
/// sees the state of the store at the time it was issued, even if the store is modified while
/// the query runs.
///
/// Usage example:
/// ```
/// use rdf_weave::model::*;
/// use rdf_weave::store::Store;
///
/// # tokio_test::block_on(async {
/// let store = Store::default();
///
/// // insertion
/// let ex = NamedNode::new("http://example.com")?;
/// let quad = Quad::new(ex.clone(), ex.clone(), ex.clone(), GraphName::DefaultGraph);
/// store.insert(&quad).await?;
///
/// // SPARQL query
/// let results = store.query("SELECT ?s WHERE { ?s ?p ?o }").await?;
/// let solutions = results.into_solutions().unwrap();
/// assert_eq!(solutions.iter().next().and_then(|s| s.get("s")), Some(&ex.into()));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// # }).unwrap();
/// ```
#[derive(Clone)]
pub struct Store {
    context: WeaveContext,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates an empty [Store] with a [MemoryQuadStorage] as backing storage.
    pub fn new() -> Store {
        Self {
            context: WeaveContext::new(Arc::new(MemoryQuadStorage::new())),
        }
    }

    /// Returns a reference to the underlying [WeaveContext].
    pub fn context(&self) -> &WeaveContext {
        &self.context
    }

    /// Executes a [SPARQL](https://www.w3.org/TR/sparql11-query/) query.
    ///
    /// Usage example:
    /// ```
    /// use rdf_weave::model::*;
    /// use rdf_weave::store::Store;
    ///
    /// # tokio_test::block_on(async {
    /// let store = Store::default();
    /// let ex = NamedNodeRef::new("http://example.com")?;
    /// store.insert(QuadRef::new(ex, ex, ex, GraphNameRef::DefaultGraph)).await?;
    ///
    /// assert_eq!(store.query("ASK { ?s ?p ?o }").await?.as_boolean(), Some(true));
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// # }).unwrap();
    /// ```
    pub async fn query(
        &self,
        query: impl TryInto<Query, Error = impl Into<QueryEvaluationError> + std::fmt::Debug>,
    ) -> Result<QueryResults, QueryEvaluationError> {
        self.query_opt(query, QueryOptions::default()).await
    }

    /// Executes a [SPARQL 1.1 query](https://www.w3.org/TR/sparql11-query/) with some options.
    ///
    /// Usage example:
    /// ```
    /// use rdf_weave::model::*;
    /// use rdf_weave::sparql::QueryOptions;
    /// use rdf_weave::store::Store;
    ///
    /// # tokio_test::block_on(async {
    /// let store = Store::default();
    /// let results = store.query_opt(
    ///     "SELECT (STR(1) AS ?nt) WHERE {}",
    ///     QueryOptions::default(),
    /// ).await?;
    /// let solutions = results.into_solutions().unwrap();
    /// assert_eq!(
    ///     solutions.iter().next().and_then(|s| s.get("nt")),
    ///     Some(&Literal::from("1").into())
    /// );
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// # }).unwrap();
    /// ```
    pub async fn query_opt(
        &self,
        query: impl TryInto<Query, Error = impl Into<QueryEvaluationError> + std::fmt::Debug>,
        options: QueryOptions,
    ) -> Result<QueryResults, QueryEvaluationError> {
        self.explain_query_opt(query, options).await.map(|(r, _)| r)
    }

    /// Executes a [SPARQL 1.1 query](https://www.w3.org/TR/sparql11-query/) with some options and
    /// returns an explanation of how the query has been planned.
    ///
    /// Usage example:
    /// ```
    /// use rdf_weave::sparql::QueryOptions;
    /// use rdf_weave::store::Store;
    ///
    /// # tokio_test::block_on(async {
    /// let store = Store::default();
    /// let (_, explanation) = store.explain_query_opt(
    ///     "SELECT ?s WHERE { ?s ?p ?o } LIMIT 5",
    ///     QueryOptions::default(),
    /// ).await?;
    /// assert!(explanation.optimized_algebra.to_string().contains("LazyBgp"));
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// # }).unwrap();
    /// ```
    pub async fn explain_query_opt(
        &self,
        query: impl TryInto<Query, Error = impl Into<QueryEvaluationError> + std::fmt::Debug>,
        options: QueryOptions,
    ) -> Result<(QueryResults, QueryExplanation), QueryEvaluationError> {
        let query = query.try_into();
        match query {
            Ok(query) => self.context.execute_query(&query, options).await,
            Err(err) => Err(err.into()),
        }
    }

    /// Checks if this store contains a given quad.
    pub async fn contains<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        self.context.storage().contains(quad.into()).await
    }

    /// Returns the number of quads in the store.
    pub async fn len(&self) -> Result<usize, StorageError> {
        self.context.storage().len().await
    }

    /// Returns if the store is empty.
    pub async fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len().await? == 0)
    }

    /// Loads an RDF file into the store.
    ///
    /// The file is parsed entirely before any quad is inserted. Blank nodes are renamed, so
    /// loading the same file twice yields distinct blank nodes.
    ///
    /// A graph file can be loaded into a named graph by configuring the parser:
    /// ```
    /// use rdf_weave::io::{RdfFormat, RdfParser};
    /// use rdf_weave::model::*;
    /// use rdf_weave::store::Store;
    ///
    /// # tokio_test::block_on(async {
    /// let store = Store::default();
    /// let graph = NamedNodeRef::new("http://example.com/graph")?;
    /// let parser = RdfParser::from_format(RdfFormat::Turtle)
    ///     .with_base_iri("http://example.com/")?
    ///     .with_default_graph(graph);
    /// store.load_from_reader(parser, "<a> <b> <c> .".as_bytes()).await?;
    ///
    /// assert!(store.contains_named_graph(graph).await?);
    /// assert_eq!(store.len().await?, 1);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// # }).unwrap();
    /// ```
    pub async fn load_from_reader(
        &self,
        parser: impl Into<RdfParser>,
        reader: impl Read,
    ) -> Result<(), LoaderError> {
        let quads = parser
            .into()
            .rename_blank_nodes()
            .for_reader(reader)
            .collect::<Result<Vec<_>, _>>()?;
        self.context
            .storage()
            .extend(quads)
            .await
            .map(|_| ())
            .map_err(LoaderError::from)
    }

    /// Adds a quad to this store.
    ///
    /// Returns `true` if the quad was not already in the store.
    pub async fn insert<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        let quad = vec![quad.into().into_owned()];
        self.context
            .storage()
            .extend(quad)
            .await
            .map(|inserted| inserted > 0)
    }

    /// Adds a set of quads to this store. Returns the number of quads that were not already in
    /// the store.
    pub async fn extend(
        &self,
        quads: impl IntoIterator<Item = impl Into<Quad>>,
    ) -> Result<usize, StorageError> {
        let quads = quads.into_iter().map(Into::into).collect::<Vec<_>>();
        self.context.storage().extend(quads).await
    }

    /// Removes a quad from this store.
    ///
    /// Returns `true` if the quad was in the store and has been removed.
    pub async fn remove<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        self.context.storage().remove(quad.into()).await
    }

    /// Returns all the store named graphs, including empty ones.
    pub async fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError> {
        self.context.storage().named_graphs().await
    }

    /// Checks if the store contains a given graph.
    pub async fn contains_named_graph<'a>(
        &self,
        graph_name: impl Into<NamedOrBlankNodeRef<'a>>,
    ) -> Result<bool, StorageError> {
        self.context
            .storage()
            .contains_named_graph(graph_name.into())
            .await
    }

    /// Inserts an empty graph into this store.
    ///
    /// Returns `true` if the graph was not already in the store.
    pub async fn insert_named_graph<'a>(
        &self,
        graph_name: impl Into<NamedOrBlankNodeRef<'a>>,
    ) -> Result<bool, StorageError> {
        self.context
            .storage()
            .insert_named_graph(graph_name.into())
            .await
    }

    /// Removes all quads of a graph. A named graph stays in the store as an empty graph.
    pub async fn clear_graph<'a>(
        &self,
        graph_name: impl Into<GraphNameRef<'a>>,
    ) -> Result<(), StorageError> {
        self.context.storage().clear_graph(graph_name.into()).await
    }

    /// Removes a graph and its quads from this store.
    ///
    /// Returns `true` if the graph was in the store and has been removed.
    pub async fn remove_named_graph<'a>(
        &self,
        graph_name: impl Into<NamedOrBlankNodeRef<'a>>,
    ) -> Result<bool, StorageError> {
        self.context
            .storage()
            .remove_named_graph(graph_name.into())
            .await
    }

    /// Clears the store.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.context.storage().clear().await
    }
}
