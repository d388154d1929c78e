use lamina::acyclic;
use lamina::graphlib::{DiGraph, alg};
use lamina::greedy_fas::greedy_fas;

fn check_fas(n: usize, edges: &[(usize, usize)], fas: &[usize]) {
    let mut g: DiGraph<(), ()> = DiGraph::default();
    for v in 0..n {
        g.set_node(v.to_string(), ());
    }
    for (i, &(v, w)) in edges.iter().enumerate() {
        if v == w || fas.contains(&i) {
            continue;
        }
        g.set_edge(v.to_string(), w.to_string());
    }
    assert!(alg::is_acyclic(&g), "cycles left: {:?}", alg::find_cycles(&g));
    let bound = (edges.len() / 2).saturating_sub(n / 6);
    assert!(fas.len() <= bound.max(1), "{} > {}", fas.len(), bound);
}

#[test]
fn greedy_fas_returns_the_empty_set_for_empty_graphs() {
    assert_eq!(greedy_fas(0, &[]), Vec::<usize>::new());
}

#[test]
fn greedy_fas_returns_the_empty_set_for_single_vertex_graphs() {
    assert_eq!(greedy_fas(1, &[]), Vec::<usize>::new());
    assert_eq!(greedy_fas(1, &[(0, 0)]), Vec::<usize>::new());
}

#[test]
fn greedy_fas_returns_an_empty_set_if_the_input_graph_is_acyclic() {
    let edges = [(0, 1), (1, 2), (1, 3), (0, 4)];
    assert_eq!(greedy_fas(5, &edges), Vec::<usize>::new());
}

#[test]
fn greedy_fas_returns_a_single_edge_with_a_simple_cycle() {
    let edges = [(0, 1), (1, 0)];
    let fas = greedy_fas(2, &edges);
    assert_eq!(fas.len(), 1);
    check_fas(2, &edges, &fas);
}

#[test]
fn greedy_fas_returns_a_single_edge_in_a_4_vertex_cycle() {
    let edges = [(0, 1), (1, 2), (2, 3), (3, 0)];
    let fas = greedy_fas(4, &edges);
    assert_eq!(fas.len(), 1);
    check_fas(4, &edges, &fas);
}

#[test]
fn greedy_fas_returns_two_edges_for_two_4_vertex_cycles() {
    let edges = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
    ];
    let fas = greedy_fas(8, &edges);
    assert_eq!(fas.len(), 2);
    check_fas(8, &edges, &fas);
}

#[test]
fn greedy_fas_breaks_dense_tangles() {
    let mut edges = Vec::new();
    for v in 0..6 {
        edges.push((v, (v + 1) % 6));
        edges.push((v, (v + 2) % 6));
    }
    let fas = greedy_fas(6, &edges);
    check_fas(6, &edges, &fas);
}

#[test]
fn greedy_fas_reverses_parallel_edges_together() {
    let edges = [(0, 1), (1, 0), (1, 0), (1, 0)];
    let fas = greedy_fas(2, &edges);
    assert_eq!(fas, vec![0]);
}

#[test]
fn greedy_fas_ignores_self_loops() {
    let edges = [(0, 0), (0, 1), (1, 1)];
    assert_eq!(greedy_fas(2, &edges), Vec::<usize>::new());
}

#[test]
fn greedy_fas_is_deterministic() {
    let edges = [(0, 1), (1, 2), (2, 0), (2, 3), (3, 1), (3, 4), (4, 2)];
    assert_eq!(greedy_fas(5, &edges), greedy_fas(5, &edges));
}

#[test]
fn acyclic_orientation_flips_feedback_edges_only() {
    let edges = [(0, 1), (1, 2), (2, 0), (2, 2)];
    let orientation = acyclic::run(3, &edges);
    assert_eq!(orientation.feedback_count(), 1);

    let reversed = orientation.feedback()[0];
    let (v, w) = edges[reversed];
    assert!(orientation.is_reversed(reversed));
    assert_eq!(orientation.oriented(reversed), (w, v));

    let layered: Vec<usize> = orientation.layered_edges().map(|(e, _)| e).collect();
    assert_eq!(layered, vec![0, 1, 2]);
}
