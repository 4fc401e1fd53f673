#![cfg(test)]
#![allow(clippy::panic_in_result_fn, reason = "Tests")]

use rdf_weave::io::RdfFormat;
use rdf_weave::model::vocab::rdf;
use rdf_weave::model::{
    GraphNameRef, Literal, LiteralRef, NamedNode, NamedNodeRef, Quad, QuadRef,
};
use rdf_weave::sparql::{QueryOptions, QueryResults};
use rdf_weave::store::Store;
use std::error::Error;
use std::time::Duration;

const DATA: &str = r#"
@prefix schema: <http://schema.org/> .
@prefix wd: <http://www.wikidata.org/entity/> .

wd:Q90 a schema:City ;
    schema:name "Paris"@fr ;
    schema:country wd:Q142 ;
    schema:population 2000000 .
"#;

const GRAPH_DATA: &str = r#"
@prefix schema: <http://schema.org/> .
@prefix wd: <http://www.wikidata.org/entity/> .

GRAPH <http://www.wikidata.org/wiki/Special:EntityData/Q90> {
    wd:Q90 a schema:City ;
        schema:name "Paris"@fr ;
        schema:country wd:Q142 ;
        schema:population 2000000 .
}
"#;

fn quads(graph_name: impl Into<GraphNameRef<'static>>) -> Vec<QuadRef<'static>> {
    let graph_name = graph_name.into();
    let paris = NamedNodeRef::new_unchecked("http://www.wikidata.org/entity/Q90");
    let france = NamedNodeRef::new_unchecked("http://www.wikidata.org/entity/Q142");
    let city = NamedNodeRef::new_unchecked("http://schema.org/City");
    let name = NamedNodeRef::new_unchecked("http://schema.org/name");
    let country = NamedNodeRef::new_unchecked("http://schema.org/country");
    vec![
        QuadRef::new(paris, rdf::TYPE, city, graph_name),
        QuadRef::new(
            paris,
            name,
            LiteralRef::new_language_tagged_literal_unchecked("Paris", "fr"),
            graph_name,
        ),
        QuadRef::new(paris, country, france, graph_name),
    ]
}

#[tokio::test]
async fn test_load_graph() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store
        .load_from_reader(RdfFormat::Turtle, DATA.as_bytes())
        .await?;
    for q in quads(GraphNameRef::DefaultGraph) {
        assert!(store.contains(q).await?);
    }
    assert_eq!(store.len().await?, 4);
    Ok(())
}

#[tokio::test]
async fn test_load_dataset() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store
        .load_from_reader(RdfFormat::TriG, GRAPH_DATA.as_bytes())
        .await?;
    let graph = NamedNodeRef::new_unchecked("http://www.wikidata.org/wiki/Special:EntityData/Q90");
    for q in quads(graph) {
        assert!(store.contains(q).await?);
    }
    assert!(store.contains_named_graph(graph).await?);
    Ok(())
}

#[tokio::test]
async fn test_load_graph_generates_new_blank_nodes() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    for _ in 0..2 {
        store
            .load_from_reader(
                RdfFormat::NTriples,
                "_:a <http://example.com/p> <http://example.com/p> .".as_bytes(),
            )
            .await?;
    }
    assert_eq!(store.len().await?, 2);
    Ok(())
}

#[tokio::test]
async fn test_insert_and_remove() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    let ex = NamedNodeRef::new("http://example.com")?;
    let quad = QuadRef::new(ex, ex, ex, GraphNameRef::DefaultGraph);

    assert!(store.insert(quad).await?);
    assert!(!store.insert(quad).await?);
    assert!(store.contains(quad).await?);

    assert!(store.remove(quad).await?);
    assert!(!store.remove(quad).await?);
    assert!(store.is_empty().await?);
    Ok(())
}

#[tokio::test]
async fn test_named_graphs() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    let ex = NamedNode::new("http://example.com")?;
    let empty = NamedNode::new("http://example.com/empty")?;
    store
        .extend([Quad::new(ex.clone(), ex.clone(), ex.clone(), ex.clone())])
        .await?;
    assert!(store.insert_named_graph(&empty).await?);
    assert!(!store.insert_named_graph(&empty).await?);

    let mut graphs = store.named_graphs().await?;
    graphs.sort_by_key(ToString::to_string);
    assert_eq!(graphs, vec![empty.clone().into(), ex.clone().into()]);

    store.clear_graph(&ex).await?;
    assert!(store.is_empty().await?);
    assert!(store.contains_named_graph(&ex).await?);

    assert!(store.remove_named_graph(&ex).await?);
    assert!(!store.contains_named_graph(&ex).await?);
    Ok(())
}

#[tokio::test]
async fn test_clear() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store
        .load_from_reader(RdfFormat::TriG, GRAPH_DATA.as_bytes())
        .await?;
    store.load_from_reader(RdfFormat::Turtle, DATA.as_bytes()).await?;
    assert_eq!(store.len().await?, 8);

    store.clear().await?;
    assert!(store.is_empty().await?);
    Ok(())
}

#[tokio::test]
async fn test_select_query() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store.load_from_reader(RdfFormat::Turtle, DATA.as_bytes()).await?;

    let results = store
        .query(
            "PREFIX schema: <http://schema.org/>
             SELECT ?population WHERE { ?city a schema:City ; schema:population ?population }",
        )
        .await?;
    let QueryResults::Solutions(solutions) = results else {
        return Err("expected solutions".into());
    };
    assert_eq!(solutions.len(), 1);
    assert_eq!(
        solutions.iter().next().and_then(|s| s.get("population")),
        Some(&Literal::from(2_000_000).into())
    );
    Ok(())
}

#[tokio::test]
async fn test_query_sees_snapshot_at_call_time() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store.load_from_reader(RdfFormat::Turtle, DATA.as_bytes()).await?;
    let before = store.query("SELECT * WHERE { ?s ?p ?o }").await?;

    store.clear().await?;
    let after = store.query("SELECT * WHERE { ?s ?p ?o }").await?;

    assert_eq!(before.into_solutions().map(|s| s.len()), Some(4));
    assert_eq!(after.into_solutions().map(|s| s.len()), Some(0));
    Ok(())
}

#[tokio::test]
async fn test_query_syntax_error() {
    let store = Store::default();
    let error = store.query("SELECT ?s WHERE {").await;
    assert!(error.is_err());
}

#[tokio::test]
async fn test_query_timeout() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store.load_from_reader(RdfFormat::Turtle, DATA.as_bytes()).await?;
    let options = QueryOptions {
        timeout: Some(Duration::ZERO),
        ..QueryOptions::default()
    };
    let Err(error) = store
        .query_opt("SELECT * WHERE { ?s ?p ?o }", options)
        .await
    else {
        return Err("expected a timeout".into());
    };
    assert!(error.is_timeout());
    Ok(())
}

#[tokio::test]
async fn test_explain_query() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store.load_from_reader(RdfFormat::Turtle, DATA.as_bytes()).await?;
    let (results, explanation) = store
        .explain_query_opt("ASK { ?s ?p ?o }", QueryOptions::default())
        .await?;
    assert_eq!(results.as_boolean(), Some(true));
    assert_eq!(
        explanation.initial_algebra.to_string(),
        "Bgp(?s ?p ?o)"
    );
    assert_eq!(
        explanation.optimized_algebra.to_string(),
        "AskBgp(?s ?p ?o)"
    );
    Ok(())
}

#[tokio::test]
async fn test_default_graph_as_union() -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store
        .load_from_reader(RdfFormat::TriG, GRAPH_DATA.as_bytes())
        .await?;
    let query = "SELECT ?s WHERE { ?s a <http://schema.org/City> }";

    let results = store.query(query).await?;
    assert_eq!(results.into_solutions().map(|s| s.len()), Some(0));

    let options = QueryOptions {
        default_graph_as_union: true,
        ..QueryOptions::default()
    };
    let results = store.query_opt(query, options).await?;
    assert_eq!(results.into_solutions().map(|s| s.len()), Some(1));
    Ok(())
}
