use crate::results::{QueryResults, QuerySolution, QuerySolutions};
use crate::sparql::error::QueryEvaluationError;
use crate::sparql::rewriting::GraphPatternRewriter;
use crate::sparql::{Query, QueryDataset, QueryExplanation, QueryOptions};
use itertools::Itertools;
use rdf_weave_common::QuadDataset;
use rdf_weave_logical::optimizer::{AlgebraOptimizer, OptimizerContext};
use rdf_weave_logical::Algebra;
use rdf_weave_model::{
    BlankNode, GraphName, Iri, NamedNodePattern, NamedOrBlankNode, Subject, Term,
    TermPattern, Triple, TriplePattern, Variable,
};
use rdf_weave_physical::{evaluate, ActiveGraph, BindingSet, EvaluationContext, Multiset};
use rustc_hash::FxHashMap;
use spargebra::algebra::GraphPattern;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Evaluates a SPARQL query and returns the results along with an explanation of the plan.
///
/// The evaluation is synchronous and runs against `dataset`, which must not change while the
/// query runs. Most users should refrain from directly using this function, as the store
/// provides an asynchronous API for querying.
pub fn evaluate_query(
    dataset: Arc<dyn QuadDataset>,
    query: &Query,
    options: &QueryOptions,
) -> Result<(QueryResults, QueryExplanation), QueryEvaluationError> {
    let (pattern, query_dataset, base_iri) = match &query.inner {
        spargebra::Query::Select {
            pattern,
            dataset,
            base_iri,
        }
        | spargebra::Query::Construct {
            pattern,
            dataset,
            base_iri,
            ..
        }
        | spargebra::Query::Describe {
            pattern,
            dataset,
            base_iri,
        }
        | spargebra::Query::Ask {
            pattern,
            dataset,
            base_iri,
        } => (pattern, dataset.as_ref(), base_iri.as_ref()),
    };

    let explanation = create_plan(query, pattern, options);
    let context = create_context(dataset, query_dataset, base_iri, options);
    let solutions = evaluate(&explanation.optimized_algebra, &context)?;

    let results = match &query.inner {
        spargebra::Query::Select { pattern, .. } => {
            QueryResults::Solutions(to_solutions(projected_variables(pattern), &solutions))
        }
        spargebra::Query::Ask { .. } => QueryResults::Boolean(!solutions.is_empty()),
        spargebra::Query::Construct { template, .. } => {
            QueryResults::Graph(construct(template, &solutions))
        }
        spargebra::Query::Describe { .. } => QueryResults::Graph(describe(&context, &solutions)?),
    };
    Ok((results, explanation))
}

/// Translates and optimizes the graph pattern of `query`.
fn create_plan(query: &Query, pattern: &GraphPattern, options: &QueryOptions) -> QueryExplanation {
    let planning_time_start = Instant::now();
    let initial_algebra = GraphPatternRewriter::new().rewrite(pattern);
    debug!(algebra = %initial_algebra, "Translated SPARQL query");

    let optimizer_context = OptimizerContext {
        ask_query: matches!(query.inner, spargebra::Query::Ask { .. }),
    };
    let optimized_algebra = AlgebraOptimizer::new(options.optimization_level, &options.optimizer)
        .optimize(initial_algebra.clone(), &optimizer_context);
    debug!(algebra = %optimized_algebra, "Optimized SPARQL query");

    QueryExplanation {
        planning_time: planning_time_start.elapsed(),
        initial_algebra,
        optimized_algebra,
    }
}

/// Sets up the graphs of the evaluation according to the dataset clauses of the query.
///
/// With `FROM` or `FROM NAMED`, only the listed graphs are visible. A query that only has
/// `FROM NAMED` clauses has an empty default graph.
fn create_context(
    dataset: Arc<dyn QuadDataset>,
    query_dataset: Option<&QueryDataset>,
    base_iri: Option<&Iri<String>>,
    options: &QueryOptions,
) -> EvaluationContext {
    let mut context = EvaluationContext::new(dataset, options.evaluation_options())
        .with_base_iri(base_iri.cloned());

    match query_dataset {
        Some(query_dataset) => {
            let default_graph = query_dataset
                .default
                .iter()
                .map(|graph| GraphName::NamedNode(graph.clone()))
                .collect();
            let named_graphs = query_dataset
                .named
                .iter()
                .flatten()
                .map(|graph| NamedOrBlankNode::NamedNode(graph.clone()))
                .collect();
            context = context
                .with_default_graph(ActiveGraph::Union(default_graph))
                .with_named_graphs(named_graphs);
        }
        None if options.default_graph_as_union => {
            context = context.with_default_graph(ActiveGraph::AllGraphs);
        }
        None => {}
    }

    if let Some(handler) = &options.service_handler {
        context = context.with_service_handler(Arc::clone(handler));
    }
    context
}

/// Returns the variables of a SELECT query in the order of the SELECT clause.
fn projected_variables(pattern: &GraphPattern) -> Vec<Variable> {
    match pattern {
        GraphPattern::Project { variables, .. } => variables.clone(),
        GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner }
        | GraphPattern::Slice { inner, .. }
        | GraphPattern::OrderBy { inner, .. } => projected_variables(inner),
        pattern => {
            let mut variables = Vec::new();
            pattern.on_in_scope_variable(|variable| {
                if !variables.contains(variable) {
                    variables.push(variable.clone());
                }
            });
            variables
        }
    }
}

fn to_solutions(variables: Vec<Variable>, solutions: &Multiset) -> QuerySolutions {
    let variables: Arc<[Variable]> = variables.into();
    let solutions = solutions
        .iter()
        .map(|row| {
            let values = variables
                .iter()
                .map(|variable| row.get(variable).cloned())
                .collect::<Vec<_>>();
            QuerySolution::from((Arc::clone(&variables), values))
        })
        .collect();
    QuerySolutions::new(variables, solutions)
}

/// Instantiates `template` once per solution. Blank nodes of the template are fresh for each
/// solution and triples with unbound or invalid positions are skipped.
fn construct(template: &[TriplePattern], solutions: &Multiset) -> Vec<Triple> {
    let mut triples = Vec::new();
    for row in solutions.iter() {
        let mut blank_nodes = FxHashMap::default();
        for pattern in template {
            let subject = match instantiate(&pattern.subject, &row, &mut blank_nodes) {
                Some(Term::NamedNode(node)) => Subject::NamedNode(node),
                Some(Term::BlankNode(node)) => Subject::BlankNode(node),
                Some(Term::Literal(_)) | None => continue,
            };
            let predicate = match &pattern.predicate {
                NamedNodePattern::NamedNode(node) => node.clone(),
                NamedNodePattern::Variable(variable) => match row.get(variable) {
                    Some(Term::NamedNode(node)) => node.clone(),
                    _ => continue,
                },
            };
            let Some(object) = instantiate(&pattern.object, &row, &mut blank_nodes) else {
                continue;
            };
            triples.push(Triple::new(subject, predicate, object));
        }
    }
    triples.into_iter().unique().collect()
}

fn instantiate(
    pattern: &TermPattern,
    row: &BindingSet<'_>,
    blank_nodes: &mut FxHashMap<BlankNode, BlankNode>,
) -> Option<Term> {
    match pattern {
        TermPattern::NamedNode(node) => Some(node.clone().into()),
        TermPattern::Literal(literal) => Some(literal.clone().into()),
        TermPattern::BlankNode(node) => {
            Some(blank_nodes.entry(node.clone()).or_default().clone().into())
        }
        TermPattern::Variable(variable) => row.get(variable).cloned(),
    }
}

/// Returns the triples that have one of the resources bound in `solutions` as subject.
fn describe(
    context: &EvaluationContext,
    solutions: &Multiset,
) -> Result<Vec<Triple>, QueryEvaluationError> {
    let resources = solutions
        .iter()
        .flat_map(|row| {
            row.iter()
                .map(|(_, term)| term.clone())
                .collect::<Vec<_>>()
        })
        .filter(|term| !matches!(term, Term::Literal(_)))
        .unique()
        .collect::<Vec<_>>();

    let predicate = Variable::new_unchecked("predicate");
    let object = Variable::new_unchecked("object");
    let mut triples = Vec::new();
    for resource in resources {
        let subject = match resource {
            Term::NamedNode(node) => Subject::NamedNode(node),
            Term::BlankNode(node) => Subject::BlankNode(node),
            Term::Literal(_) => continue,
        };
        let algebra = Algebra::bgp(vec![TriplePattern {
            subject: subject_pattern(&subject),
            predicate: predicate.clone().into(),
            object: object.clone().into(),
        }]);
        for row in evaluate(&algebra, context)?.iter() {
            if let (Some(Term::NamedNode(p)), Some(o)) = (row.get(&predicate), row.get(&object)) {
                triples.push(Triple::new(subject.clone(), p.clone(), o.clone()));
            }
        }
    }
    Ok(triples.into_iter().unique().collect())
}

fn subject_pattern(subject: &Subject) -> TermPattern {
    match subject {
        Subject::NamedNode(node) => node.clone().into(),
        Subject::BlankNode(node) => node.clone().into(),
    }
}
