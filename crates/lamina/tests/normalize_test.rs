use lamina::model::VertexKind;
use lamina::normalize::{self, Normalized};
use lamina::rank::longest_path;
use lamina::{LayoutInput, Size, acyclic};

fn build(vertices: &[&str], edges: &[(&str, &str)], compact: bool) -> Normalized {
    let input: LayoutInput<String, usize> = LayoutInput::from_parts(
        vertices
            .iter()
            .map(|v| (v.to_string(), Size::new(10.0, 10.0)))
            .collect(),
        edges
            .iter()
            .enumerate()
            .map(|(i, (v, w))| (i, v.to_string(), w.to_string()))
            .collect(),
    );
    let orientation = acyclic::run(input.vertex_count(), input.endpoint_list());
    let layered: Vec<(usize, usize)> = orientation.layered_edges().map(|(_, e)| e).collect();
    let ranks = longest_path(input.vertex_count(), &layered);
    normalize::run(&input, &orientation, &ranks, compact).unwrap()
}

fn count(n: &Normalized, pred: impl Fn(VertexKind) -> bool) -> usize {
    n.graph.vertices().iter().filter(|v| pred(v.kind)).count()
}

#[test]
fn normalize_keeps_unit_span_edges() {
    let n = build(&["a", "b"], &[("a", "b")], true);
    assert_eq!(n.graph.vertices().len(), 2);
    assert_eq!(n.graph.edges().len(), 1);
    assert!(n.chains[0].is_empty());
}

#[test]
fn normalize_splits_a_two_rank_edge_with_one_synthetic_vertex() {
    let n = build(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")], true);
    assert_eq!(n.chains[2].len(), 1);
    let s = n.chains[2][0];
    assert_eq!(n.graph.vertex(s).kind, VertexKind::Synthetic(2));
    assert_eq!(n.graph.vertex(s).rank, 1);
    assert!(n.graph.segments().is_empty());
    n.graph.check_spans().unwrap();
}

#[test]
fn normalize_turns_a_long_edge_into_one_segment() {
    let n = build(
        &["a", "x", "y", "d"],
        &[("a", "x"), ("x", "y"), ("y", "d"), ("a", "d")],
        true,
    );
    assert_eq!(n.graph.segments().len(), 1);
    assert_eq!(count(&n, |k| matches!(k, VertexKind::Synthetic(_))), 0);
    assert_eq!(count(&n, |k| k.segment().is_some()), 2);

    let segment = n.graph.segments()[0];
    assert_eq!(segment.origin, 3);
    assert_eq!(n.graph.vertex(segment.top).rank, 1);
    assert_eq!(n.graph.vertex(segment.bottom).rank, 2);
    assert_eq!(n.chains[3], vec![segment.top, segment.bottom]);

    // a -> P and Q -> d; the P-Q link is not a layer edge
    let origins: Vec<usize> = n.graph.edges().iter().map(|e| e.origin).collect();
    assert_eq!(origins.iter().filter(|&&o| o == 3).count(), 2);
    n.graph.check_spans().unwrap();
    n.graph.check_ranks().unwrap();
}

#[test]
fn normalize_builds_synthetic_chains_without_compaction() {
    let n = build(
        &["a", "x", "y", "z", "d"],
        &[("a", "x"), ("x", "y"), ("y", "z"), ("z", "d"), ("a", "d")],
        false,
    );
    assert!(n.graph.segments().is_empty());
    assert_eq!(n.chains[4].len(), 3);
    let ranks: Vec<usize> = n.chains[4].iter().map(|&s| n.graph.vertex(s).rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert!(!n.compacted);
    n.graph.check_spans().unwrap();
}

#[test]
fn normalize_skips_self_loops() {
    let n = build(&["a", "b"], &[("a", "a"), ("a", "b")], true);
    assert!(n.chains[0].is_empty());
    assert_eq!(n.graph.edges().len(), 1);
}

#[test]
fn init_order_walks_depth_first_from_the_top_rank() {
    let n = build(
        &["a", "b", "c", "d", "e"],
        &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "e")],
        true,
    );
    let names = ["a", "b", "c", "d", "e"];
    let ranks: Vec<Vec<&str>> = n
        .graph
        .ranks()
        .iter()
        .map(|vs| vs.iter().map(|v| names[v.index()]).collect())
        .collect();
    assert_eq!(ranks, vec![vec!["a"], vec!["b", "c"], vec!["d", "e"]]);
}

#[test]
fn init_order_follows_a_segment_from_top_to_bottom() {
    let n = build(
        &["a", "x", "y", "d"],
        &[("a", "d"), ("a", "x"), ("x", "y"), ("y", "d")],
        true,
    );
    let segment = n.graph.segments()[0];
    // a visits P first, P continues at Q, so both lead their ranks
    assert_eq!(n.graph.rank(1)[0], segment.top);
    assert_eq!(n.graph.rank(2)[0], segment.bottom);
}
