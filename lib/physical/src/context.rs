use crate::error::EvaluationError;
use crate::{EvaluationOptions, ServiceHandler};
use rdf_weave_common::QuadDataset;
use rdf_weave_functions::{DefaultFunctionRegistry, FunctionContext, FunctionRegistryRef};
use rdf_weave_model::{GraphName, Iri, NamedOrBlankNode};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// The active graph defines which graphs partake in the matching of triple patterns.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActiveGraph {
    /// Only the default graph of the dataset forms the active graph.
    #[default]
    DefaultGraph,
    /// The merge of all graphs, including the default graph.
    AllGraphs,
    /// The merge of the given graphs. Used for `FROM` clauses and inside `GRAPH` patterns.
    Union(Vec<GraphName>),
}

impl Display for ActiveGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveGraph::DefaultGraph => write!(f, "Default Graph"),
            ActiveGraph::AllGraphs => write!(f, "All Graphs"),
            ActiveGraph::Union(graphs) => {
                write!(f, "Union of [")?;
                for (i, graph) in graphs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{graph}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Everything an evaluation needs besides the algebra tree.
///
/// A context is created once per query and shared (immutably) by every operator of the tree.
/// It holds the dataset snapshot, the graphs that form the default graph and the named graphs,
/// the options and the deadline.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    dataset: Arc<dyn QuadDataset>,
    default_graph: ActiveGraph,
    named_graphs: Option<Vec<NamedOrBlankNode>>,
    options: EvaluationOptions,
    deadline: Option<Instant>,
    functions: FunctionContext,
    registry: FunctionRegistryRef,
    service_handler: Option<Arc<dyn ServiceHandler>>,
}

impl EvaluationContext {
    /// Creates a new context. The deadline starts counting now.
    pub fn new(dataset: Arc<dyn QuadDataset>, options: EvaluationOptions) -> Self {
        let deadline = options.timeout.map(|timeout| Instant::now() + timeout);
        let functions = FunctionContext::new(None, options.strict_operators);
        Self {
            dataset,
            default_graph: ActiveGraph::DefaultGraph,
            named_graphs: None,
            options,
            deadline,
            functions,
            registry: Arc::new(DefaultFunctionRegistry),
            service_handler: None,
        }
    }

    /// Sets the graphs that unscoped patterns are matched against.
    #[must_use]
    pub fn with_default_graph(mut self, default_graph: ActiveGraph) -> Self {
        self.default_graph = default_graph;
        self
    }

    /// Restricts the graphs that `GRAPH` patterns can access. By default, every named graph of
    /// the dataset is visible.
    #[must_use]
    pub fn with_named_graphs(mut self, named_graphs: Vec<NamedOrBlankNode>) -> Self {
        self.named_graphs = Some(named_graphs);
        self
    }

    /// Sets the base IRI that `IRI()` resolves relative IRIs against.
    #[must_use]
    pub fn with_base_iri(mut self, base_iri: Option<Iri<String>>) -> Self {
        self.functions.base_iri = base_iri;
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: FunctionRegistryRef) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_service_handler(mut self, handler: Arc<dyn ServiceHandler>) -> Self {
        self.service_handler = Some(handler);
        self
    }

    pub fn dataset(&self) -> &dyn QuadDataset {
        self.dataset.as_ref()
    }

    pub fn default_graph(&self) -> &ActiveGraph {
        &self.default_graph
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    pub fn functions(&self) -> &FunctionContext {
        &self.functions
    }

    pub fn registry(&self) -> &FunctionRegistryRef {
        &self.registry
    }

    pub fn service_handler(&self) -> Option<&Arc<dyn ServiceHandler>> {
        self.service_handler.as_ref()
    }

    /// Returns the named graphs that `GRAPH ?g` iterates over, in dataset order.
    pub fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, EvaluationError> {
        let Some(named_graphs) = &self.named_graphs else {
            return Ok(self.dataset.named_graphs()?);
        };

        let mut result = Vec::with_capacity(named_graphs.len());
        for name in named_graphs {
            if self.dataset.contains_named_graph(name.as_ref())? && !result.contains(name) {
                result.push(name.clone());
            }
        }
        Ok(result)
    }

    /// Returns whether `GRAPH <name>` can access the named graph `name`.
    pub fn is_visible_named_graph(&self, name: &NamedOrBlankNode) -> Result<bool, EvaluationError> {
        if let Some(named_graphs) = &self.named_graphs {
            if !named_graphs.contains(name) {
                return Ok(false);
            }
        }
        Ok(self.dataset.contains_named_graph(name.as_ref())?)
    }

    /// Returns an error if the deadline of the query has passed.
    pub fn check_deadline(&self) -> Result<(), EvaluationError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                debug!("Query evaluation exceeded its deadline");
                Err(EvaluationError::Timeout)
            }
            _ => Ok(()),
        }
    }
}
