use oxrdfio::{RdfFormat, RdfParser};
use rdf_weave_common::QuadDataset;
use rdf_weave_engine::results::QueryResults;
use rdf_weave_engine::sparql::{
    evaluate_query, OptimizationLevel, OptimizerConfig, Query, QueryExplanation, QueryOptions,
};
use rdf_weave_engine::WeaveContext;
use rdf_weave_model::{Triple, Variable};
use rdf_weave_storage::MemoryQuadStorage;
use std::sync::Arc;
use std::time::Duration;

const DATA: &str = r#"
@prefix ex: <http://ex/> .

ex:alice ex:knows ex:bob ; ex:age 31 ; a ex:Person .
ex:bob ex:knows ex:carol ; ex:age 17 ; a ex:Person .
ex:carol ex:age 45 ; a ex:Person .
ex:beetle a ex:Car ; ex:color ex:red .
ex:mini a ex:Car .

ex:g1 { ex:dave ex:knows ex:erin . }
ex:g2 { ex:erin ex:knows ex:frank . }
"#;

fn storage(data: &str) -> MemoryQuadStorage {
    let quads = RdfParser::from_format(RdfFormat::TriG)
        .for_reader(data.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let storage = MemoryQuadStorage::new();
    storage.insert_quads(&quads).unwrap();
    storage
}

fn dataset(data: &str) -> Arc<dyn QuadDataset> {
    Arc::new(storage(data).reader().unwrap())
}

fn run(query: &str, options: &QueryOptions) -> (QueryResults, QueryExplanation) {
    evaluate_query(dataset(DATA), &Query::parse(query).unwrap(), options).unwrap()
}

/// Renders the solutions of a SELECT query as sorted lines of `var=term` pairs.
fn render(results: QueryResults) -> Vec<String> {
    let solutions = results.into_solutions().unwrap();
    let mut rows = solutions
        .iter()
        .map(|solution| {
            solution
                .iter()
                .map(|(variable, term)| format!("{}={term}", variable.as_str()))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>();
    rows.sort();
    rows
}

fn render_graph(results: QueryResults) -> Vec<String> {
    let mut triples = results
        .into_graph()
        .unwrap()
        .iter()
        .map(Triple::to_string)
        .collect::<Vec<_>>();
    triples.sort();
    triples
}

fn unoptimized() -> QueryOptions {
    QueryOptions {
        optimization_level: OptimizationLevel::None,
        optimizer: OptimizerConfig::none(),
        ..QueryOptions::default()
    }
}

#[test]
fn select_keeps_projection_order() {
    let (results, _) = run(
        "SELECT ?o ?s WHERE { ?s <http://ex/knows> ?o }",
        &QueryOptions::default(),
    );
    let solutions = results.into_solutions().unwrap();
    let variables = solutions
        .variables()
        .iter()
        .map(Variable::as_str)
        .collect::<Vec<_>>();
    assert_eq!(variables, ["o", "s"]);
    assert_eq!(solutions.len(), 2);
}

#[test]
fn one_or_more_path_follows_chains() {
    let (results, _) = run(
        "SELECT * WHERE { <http://ex/alice> <http://ex/knows>+ ?y }",
        &QueryOptions::default(),
    );
    insta::assert_debug_snapshot!(render(results), @r#"
    [
        "y=<http://ex/bob>",
        "y=<http://ex/carol>",
    ]
    "#);
}

#[test]
fn minus_and_optional_not_bound_agree() {
    let minus = run(
        "PREFIX ex: <http://ex/>
         SELECT ?car WHERE { ?car a ex:Car MINUS { ?car ex:color ?c } }",
        &QueryOptions::default(),
    )
    .0;
    let optional = run(
        "PREFIX ex: <http://ex/>
         SELECT ?car WHERE { ?car a ex:Car OPTIONAL { ?car ex:color ?c } FILTER(!BOUND(?c)) }",
        &QueryOptions::default(),
    )
    .0;
    let minus = render(minus);
    assert_eq!(minus, vec!["car=<http://ex/mini>"]);
    assert_eq!(minus, render(optional));
}

#[test]
fn order_by_over_mixed_terms() {
    let query = "SELECT ?x WHERE {
        VALUES ?x { 10 \"5\" 9 <http://ex/a> UNDEF 2.5 \"10\" }
    } ORDER BY ?x";
    let (results, _) = run(query, &QueryOptions::default());
    let ordered = results
        .into_solutions()
        .unwrap()
        .iter()
        .map(|solution| {
            solution
                .get("x")
                .map_or_else(|| "UNDEF".to_owned(), ToString::to_string)
        })
        .collect::<Vec<_>>();
    insta::assert_debug_snapshot!(ordered, @r#"
    [
        "UNDEF",
        "<http://ex/a>",
        "\"2.5\"^^<http://www.w3.org/2001/XMLSchema#decimal>",
        "\"9\"^^<http://www.w3.org/2001/XMLSchema#integer>",
        "\"10\"^^<http://www.w3.org/2001/XMLSchema#integer>",
        "\"10\"",
        "\"5\"",
    ]
    "#);

    let (results, _) = run(
        "SELECT (MIN(?x) AS ?min) (MAX(?x) AS ?max) WHERE { VALUES ?x { 10 \"5\" 9 } }",
        &QueryOptions::default(),
    );
    assert_eq!(
        render(results),
        vec!["min=\"9\"^^<http://www.w3.org/2001/XMLSchema#integer> max=\"5\""]
    );
}

#[test]
fn rigorous_paths_agree_on_terms_outside_the_graph() {
    let queries = [
        "ASK { <http://ex/nobody> <http://ex/knows>* <http://ex/nobody> }",
        "ASK { <http://ex/nobody> <http://ex/knows>? <http://ex/nobody> }",
        "ASK { <http://ex/nobody> <http://ex/knows>+ <http://ex/nobody> }",
        "ASK { <http://ex/alice> <http://ex/knows>* <http://ex/nobody> }",
        "ASK { <http://ex/alice> <http://ex/knows>+ <http://ex/carol> }",
    ];
    for query in queries {
        let default = run(query, &QueryOptions::default()).0.as_boolean();
        let rigorous = run(
            query,
            &QueryOptions {
                rigorous_evaluation: true,
                ..QueryOptions::default()
            },
        )
        .0
        .as_boolean();
        assert_eq!(default, rigorous, "{query}");
    }
    let zero_length = run(queries[0], &QueryOptions::default()).0;
    assert_eq!(zero_length.as_boolean(), Some(true));
}

#[test]
fn optimization_does_not_change_results() {
    let queries = [
        "PREFIX ex: <http://ex/>
         SELECT ?s ?age WHERE { ?s a ex:Person ; ex:age ?age FILTER(?age >= 18) }",
        "PREFIX ex: <http://ex/>
         SELECT ?a ?b WHERE { ?a ex:knows ?x . ?b ex:knows ?y FILTER(?a = ?b) }",
        "PREFIX ex: <http://ex/>
         SELECT ?a ?b WHERE { ?a ex:knows ?x OPTIONAL { ?b ex:knows ?x } FILTER(sameTerm(?a, ?b)) }",
        "PREFIX ex: <http://ex/>
         SELECT DISTINCT ?s WHERE { ?s ?p ?o } ORDER BY ?s",
        "PREFIX ex: <http://ex/>
         SELECT ?a ?b WHERE { ?a ex:age ?x . ?b ex:age ?y FILTER(?x < ?y) }",
    ];
    for query in queries {
        let optimized = render(run(query, &QueryOptions::default()).0);
        let full = render(
            run(
                query,
                &QueryOptions {
                    optimization_level: OptimizationLevel::Full,
                    ..QueryOptions::default()
                },
            )
            .0,
        );
        let plain = render(run(query, &unoptimized()).0);
        assert_eq!(optimized, plain, "{query}");
        assert_eq!(full, plain, "{query}");
    }
}

#[test]
fn filter_across_optional_is_not_an_implicit_join() {
    let (_, explanation) = run(
        "PREFIX ex: <http://ex/>
         SELECT * WHERE { ?a ex:knows ?x OPTIONAL { ?b ex:knows ?y } FILTER(?a = ?b) }",
        &QueryOptions::default(),
    );
    let plan = explanation.optimized_algebra.to_string();
    assert!(!plan.contains("Extend"), "{plan}");
    assert!(plan.contains("Filter("), "{plan}");
}

#[test]
fn ask_uses_ask_specialization() {
    let (results, explanation) = run(
        "ASK { ?s <http://ex/knows> ?o }",
        &QueryOptions::default(),
    );
    assert_eq!(results.as_boolean(), Some(true));
    let plan = explanation.optimized_algebra.to_string();
    assert!(plan.contains("AskBgp"), "{plan}");

    let (results, _) = run("ASK { ?s <http://ex/hates> ?o }", &QueryOptions::default());
    assert_eq!(results.as_boolean(), Some(false));
}

#[test]
fn limit_uses_lazy_bgp() {
    let (results, explanation) = run(
        "SELECT ?s WHERE { ?s ?p ?o } LIMIT 3",
        &QueryOptions::default(),
    );
    assert_eq!(results.into_solutions().unwrap().len(), 3);
    let plan = explanation.optimized_algebra.to_string();
    assert!(plan.contains("LazyBgp"), "{plan}");
}

#[test]
fn aggregates_over_empty_input() {
    let (results, _) = run(
        "SELECT (MAX(?o) AS ?max) (COUNT(*) AS ?count) WHERE { ?s <http://ex/hates> ?o }",
        &QueryOptions::default(),
    );
    insta::assert_debug_snapshot!(render(results), @r#"
    [
        "count=\"0\"^^<http://www.w3.org/2001/XMLSchema#integer>",
    ]
    "#);

    let (results, _) = run(
        "SELECT ?s (COUNT(*) AS ?count) WHERE { ?s ?p ?o FILTER(false) } GROUP BY ?s",
        &QueryOptions::default(),
    );
    assert!(results.into_solutions().unwrap().is_empty());
}

#[test]
fn from_and_from_named_restrict_the_dataset() {
    let (results, _) = run(
        "SELECT ?a ?c FROM <http://ex/g1> FROM <http://ex/g2>
         WHERE { ?a <http://ex/knows> ?b . ?b <http://ex/knows> ?c }",
        &QueryOptions::default(),
    );
    assert_eq!(
        render(results),
        vec!["a=<http://ex/dave> c=<http://ex/frank>"]
    );

    let (results, _) = run(
        "SELECT ?g ?s FROM NAMED <http://ex/g2>
         WHERE { GRAPH ?g { ?s <http://ex/knows> ?o } }",
        &QueryOptions::default(),
    );
    assert_eq!(
        render(results),
        vec!["g=<http://ex/g2> s=<http://ex/erin>"]
    );

    let (results, _) = run(
        "SELECT ?s FROM NAMED <http://ex/g2> WHERE { ?s ?p ?o }",
        &QueryOptions::default(),
    );
    assert!(results.into_solutions().unwrap().is_empty());
}

#[test]
fn default_graph_as_union_sees_named_graphs() {
    let (results, _) = run(
        "SELECT ?s WHERE { ?s <http://ex/knows> <http://ex/frank> }",
        &QueryOptions {
            default_graph_as_union: true,
            ..QueryOptions::default()
        },
    );
    assert_eq!(render(results), vec!["s=<http://ex/erin>"]);
}

#[test]
fn construct_instantiates_the_template() {
    let (results, _) = run(
        "PREFIX ex: <http://ex/>
         CONSTRUCT { ?o ex:knownBy ?s } WHERE { ?s ex:knows ?o }",
        &QueryOptions::default(),
    );
    insta::assert_debug_snapshot!(render_graph(results), @r#"
    [
        "<http://ex/bob> <http://ex/knownBy> <http://ex/alice>",
        "<http://ex/carol> <http://ex/knownBy> <http://ex/bob>",
    ]
    "#);
}

#[test]
fn construct_creates_fresh_blank_nodes_per_solution() {
    let (results, _) = run(
        "PREFIX ex: <http://ex/>
         CONSTRUCT { _:b ex:about ?s } WHERE { ?s a ex:Car }",
        &QueryOptions::default(),
    );
    let triples = results.into_graph().unwrap();
    assert_eq!(triples.len(), 2);
    assert_ne!(triples[0].subject, triples[1].subject);
}

#[test]
fn describe_returns_outgoing_triples() {
    let (results, _) = run(
        "DESCRIBE <http://ex/beetle>",
        &QueryOptions::default(),
    );
    insta::assert_debug_snapshot!(render_graph(results), @r#"
    [
        "<http://ex/beetle> <http://ex/color> <http://ex/red>",
        "<http://ex/beetle> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ex/Car>",
    ]
    "#);
}

#[test]
fn expired_timeout_is_reported() {
    let error = evaluate_query(
        dataset(DATA),
        &Query::parse("SELECT * WHERE { ?s ?p ?o }").unwrap(),
        &QueryOptions {
            timeout: Some(Duration::ZERO),
            ..QueryOptions::default()
        },
    )
    .unwrap_err();
    assert!(error.is_timeout());
}

#[test]
fn silent_service_without_handler_is_ignored() {
    let (results, _) = run(
        "SELECT ?s WHERE { ?s a <http://ex/Car> SERVICE SILENT <http://remote/> { ?x ?y ?z } }",
        &QueryOptions::default(),
    );
    assert_eq!(results.into_solutions().unwrap().len(), 2);
}

#[tokio::test]
async fn context_executes_queries_on_a_snapshot() {
    let context = WeaveContext::new(Arc::new(storage(DATA)));
    let query = Query::parse("SELECT ?s WHERE { ?s a <http://ex/Person> }").unwrap();
    let (results, explanation) = context
        .execute_query(&query, QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(results.into_solutions().unwrap().len(), 3);
    assert!(explanation.planning_time <= Duration::from_secs(60));
}
