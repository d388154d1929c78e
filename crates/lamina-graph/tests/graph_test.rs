use lamina_graph::{DiGraph, DirectedGraph, EdgeKey, GraphOptions, alg};

#[test]
fn graph_keeps_insertion_order_of_nodes_and_edges() {
    let mut g: DiGraph<(), ()> = DiGraph::default();
    g.set_edge("c", "a");
    g.set_node("b", ());
    g.set_edge("a", "b");

    assert_eq!(g.node_ids(), vec!["c", "a", "b"]);
    assert_eq!(
        g.edge_keys(),
        vec![
            EdgeKey::new("c", "a", None::<String>),
            EdgeKey::new("a", "b", None::<String>)
        ]
    );
}

#[test]
fn graph_set_edge_creates_missing_endpoints() {
    let mut g: DiGraph<i32, ()> = DiGraph::default();
    g.set_edge("a", "b");
    assert!(g.has_node("a"));
    assert!(g.has_node("b"));
    assert_eq!(g.node("a"), Some(&0));
}

#[test]
fn graph_relabels_existing_edges_instead_of_duplicating_them() {
    let mut g: DiGraph<(), i32> = DiGraph::default();
    g.set_edge_with_label("a", "b", 1);
    g.set_edge_with_label("a", "b", 2);
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.edge("a", "b", None), Some(&2));
}

#[test]
fn graph_multigraph_distinguishes_named_edges() {
    let mut g: DiGraph<(), i32> = DiGraph::new(GraphOptions { multigraph: true });
    g.set_edge_named("a", "b", Some("x"), Some(1));
    g.set_edge_named("a", "b", Some("y"), Some(2));
    g.set_edge("a", "b");

    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.edge("a", "b", Some("y")), Some(&2));
    assert_eq!(g.out_edges("a", Some("b")).len(), 3);
    assert_eq!(g.successors("a"), vec!["b", "b", "b"]);
}

#[test]
fn graph_ignores_edge_names_outside_multigraphs() {
    let mut g: DiGraph<(), i32> = DiGraph::default();
    g.set_edge_named("a", "b", Some("x"), Some(1));
    g.set_edge_named("a", "b", Some("y"), Some(2));
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.edge("a", "b", Some("whatever")), Some(&2));
}

#[test]
fn graph_adjacency_follows_mutations() {
    let mut g: DiGraph<(), ()> = DiGraph::default();
    g.set_path(&["a", "b", "c"]);
    assert_eq!(g.successors("a"), vec!["b"]);
    assert_eq!(g.predecessors("c"), vec!["b"]);

    g.set_edge("a", "c");
    assert_eq!(g.successors("a"), vec!["b", "c"]);

    assert!(g.remove_edge("a", "b", None));
    assert_eq!(g.successors("a"), vec!["c"]);
    assert!(!g.remove_edge("a", "b", None));
}

#[test]
fn graph_remove_node_drops_incident_edges() {
    let mut g: DiGraph<(), ()> = DiGraph::default();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c");

    assert!(g.remove_node("b"));
    assert_eq!(g.node_ids(), vec!["a", "c"]);
    assert_eq!(g.edge_keys(), vec![EdgeKey::new("a", "c", None::<String>)]);
    assert!(g.has_edge("a", "c", None));
    assert_eq!(g.predecessors("c"), vec!["a"]);
}

#[test]
fn graph_sources_and_sinks() {
    let mut g: DiGraph<(), ()> = DiGraph::default();
    g.set_path(&["a", "b", "c"]);
    g.set_node("lonely", ());
    assert_eq!(g.sources(), vec!["a", "lonely"]);
    assert_eq!(g.sinks(), vec!["c", "lonely"]);
}

#[test]
fn graph_directed_view_reports_degrees() {
    let mut g: DiGraph<(), ()> = DiGraph::default();
    g.set_edge("a", "b");
    g.set_edge("a", "c");
    g.set_edge("c", "a");

    let a = "a".to_string();
    assert_eq!(DirectedGraph::out_degree(&g, &a), 2);
    assert_eq!(DirectedGraph::in_degree(&g, &a), 1);
    assert_eq!(g.degree(&a), 3);
    assert_eq!(g.vertex_count(), 3);
    assert_eq!(
        g.endpoints(&EdgeKey::new("c", "a", None::<String>)),
        ("c".to_string(), "a".to_string())
    );
}

#[test]
fn alg_components_splits_weakly_connected_parts() {
    let mut g: DiGraph<(), ()> = DiGraph::default();
    g.set_edge("a", "b");
    g.set_edge("c", "b");
    g.set_edge("d", "e");
    g.set_node("f", ());

    let comps = alg::components(&g);
    assert_eq!(comps.len(), 3);
    let mut first = comps[0].clone();
    first.sort();
    assert_eq!(first, vec!["a", "b", "c"]);
    assert_eq!(comps[2], vec!["f"]);
}

#[test]
fn alg_find_cycles_reports_sccs_and_self_loops() {
    let mut g: DiGraph<(), ()> = DiGraph::default();
    g.set_path(&["a", "b", "c", "a"]);
    g.set_edge("c", "d");
    g.set_edge("e", "e");

    assert_eq!(
        alg::find_cycles(&g),
        vec![vec!["a", "b", "c"], vec!["e"]]
            .into_iter()
            .map(|c| c.into_iter().map(String::from).collect::<Vec<_>>())
            .collect::<Vec<_>>()
    );
}

#[test]
fn alg_find_cycles_is_empty_for_dags() {
    let mut g: DiGraph<(), ()> = DiGraph::default();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c");
    assert!(alg::find_cycles(&g).is_empty());
    assert!(alg::is_acyclic(&g));
}

#[test]
fn alg_topsort_breaks_ties_by_insertion_order() {
    let mut g: DiGraph<(), ()> = DiGraph::default();
    g.set_node("x", ());
    g.set_edge("a", "b");
    g.set_edge("x", "b");
    g.set_edge("b", "c");

    assert_eq!(
        alg::topsort(&g),
        Some(vec![
            "x".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string()
        ])
    );
}

#[test]
fn alg_topsort_returns_none_for_cycles() {
    let mut g: DiGraph<(), ()> = DiGraph::default();
    g.set_path(&["a", "b", "a"]);
    assert_eq!(alg::topsort(&g), None);
    assert!(!alg::is_acyclic(&g));
}
