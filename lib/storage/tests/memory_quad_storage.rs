use rdf_weave_common::{QuadDataset, QuadStorage};
use rdf_weave_model::{
    GraphName, GraphNameRef, Literal, NamedNode, NamedOrBlankNode, Quad, Subject, Term,
};
use rdf_weave_storage::MemoryQuadStorage;

#[tokio::test]
async fn test_extend_counts_new_quads() {
    let store = MemoryQuadStorage::new();

    let inserted = store.extend(vec![example_quad()]).await.unwrap();
    assert_eq!(inserted, 1);

    let inserted = store.extend(vec![example_quad(), example_quad()]).await.unwrap();
    assert_eq!(inserted, 0);

    assert_eq!(store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_named_graphs_keep_creation_order() {
    let store = MemoryQuadStorage::new();
    store
        .extend(vec![
            example_quad_in_graph("http://example.com/g2"),
            example_quad_in_graph("http://example.com/g1"),
        ])
        .await
        .unwrap();
    let empty = NamedOrBlankNode::NamedNode(NamedNode::new("http://example.com/g0").unwrap());
    assert!(store.insert_named_graph(empty.as_ref()).await.unwrap());

    let graphs = store.named_graphs().await.unwrap();
    assert_eq!(
        graphs,
        vec![
            NamedOrBlankNode::NamedNode(NamedNode::new("http://example.com/g2").unwrap()),
            NamedOrBlankNode::NamedNode(NamedNode::new("http://example.com/g1").unwrap()),
            empty.clone(),
        ]
    );
    assert!(store.contains_named_graph(empty.as_ref()).await.unwrap());
}

#[tokio::test]
async fn test_remove_quad() {
    let store = MemoryQuadStorage::new();
    let quad = example_quad_in_graph("http://example.com/g");

    store.extend(vec![quad.clone()]).await.unwrap();
    assert!(store.contains(quad.as_ref()).await.unwrap());
    assert!(store.remove(quad.as_ref()).await.unwrap());
    assert!(!store.remove(quad.as_ref()).await.unwrap());

    assert_eq!(store.len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_clear_graph() {
    let store = MemoryQuadStorage::new();

    let g1 = "http://example.com/g1";
    let g2 = "http://example.com/g2";
    store
        .extend(vec![example_quad_in_graph(g1), example_quad_in_graph(g2)])
        .await
        .unwrap();

    store
        .clear_graph(GraphNameRef::NamedNode(
            NamedNode::new(g1).unwrap().as_ref(),
        ))
        .await
        .unwrap();

    assert_eq!(store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_remove_named_graph() {
    let store = MemoryQuadStorage::new();
    let graph =
        NamedOrBlankNode::NamedNode(NamedNode::new("http://example.com/graph").unwrap());

    store.insert_named_graph(graph.as_ref()).await.unwrap();
    assert!(store.remove_named_graph(graph.as_ref()).await.unwrap());
    assert!(!store.contains_named_graph(graph.as_ref()).await.unwrap());
}

#[tokio::test]
async fn test_snapshot_consistency() {
    let store = MemoryQuadStorage::new();
    store
        .extend(vec![example_quad_in_graph("http://g")])
        .await
        .unwrap();

    let snapshot = store.snapshot().unwrap();

    // Update storage after snapshot
    store.clear().await.unwrap();

    // Snapshot should still see the original quad
    assert_eq!(snapshot.quads_for_pattern(None, None, None, None).count(), 1);
    assert_eq!(store.len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_pattern_lookup_on_missing_graph_is_empty() {
    let store = MemoryQuadStorage::new();
    store.extend(vec![example_quad()]).await.unwrap();
    let snapshot = store.snapshot().unwrap();

    let missing = NamedNode::new("http://example.com/missing").unwrap();
    let quads = snapshot
        .quads_for_pattern(Some(missing.as_ref().into()), None, None, None)
        .count();
    assert_eq!(quads, 0);

    let in_default = snapshot
        .quads_for_pattern(Some(GraphNameRef::DefaultGraph), None, None, None)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(in_default, vec![example_quad()]);
}

fn example_quad() -> Quad {
    Quad::new(
        Subject::NamedNode(NamedNode::new("http://example.com/subject").unwrap()),
        NamedNode::new("http://example.com/predicate").unwrap(),
        Term::Literal(Literal::new_simple_literal("value")),
        GraphName::DefaultGraph,
    )
}

fn example_quad_in_graph(graph: &str) -> Quad {
    Quad::new(
        Subject::NamedNode(NamedNode::new("http://example.com/subject").unwrap()),
        NamedNode::new("http://example.com/predicate").unwrap(),
        Term::Literal(Literal::new_simple_literal("value")),
        GraphName::NamedNode(NamedNode::new(graph).unwrap()),
    )
}
