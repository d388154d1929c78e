use lamina::rank::network_simplex::network_simplex;
use lamina::rank::{check, longest_path, rank, total_length};
use lamina::{InvariantViolation, Ranker, acyclic};

fn assert_respects_edges(ranks: &[usize], edges: &[(usize, usize)]) {
    for &(v, w) in edges {
        assert!(ranks[w] > ranks[v], "{v} -> {w}: {} !< {}", ranks[v], ranks[w]);
    }
}

#[test]
fn longest_path_ranks_sources_at_zero() {
    let edges = [(0, 1), (1, 2), (0, 2)];
    assert_eq!(longest_path(3, &edges), vec![0, 1, 2]);
}

#[test]
fn longest_path_puts_isolated_vertices_on_rank_zero() {
    let edges = [(0, 1)];
    assert_eq!(longest_path(4, &edges), vec![0, 1, 0, 0]);
}

#[test]
fn longest_path_ranks_a_diamond() {
    let edges = [(0, 1), (0, 2), (1, 3), (2, 3)];
    assert_eq!(longest_path(4, &edges), vec![0, 1, 1, 2]);
}

#[test]
fn network_simplex_pulls_short_sources_down() {
    let edges = [(0, 1), (1, 2), (2, 3), (4, 3)];
    let lp = longest_path(5, &edges);
    let ns = network_simplex(5, &edges);
    assert_eq!(lp[4], 0);
    assert_eq!(ns, vec![0, 1, 2, 3, 2]);
    assert_eq!(total_length(&lp, &edges), 6);
    assert_eq!(total_length(&ns, &edges), 4);
}

#[test]
fn network_simplex_never_lengthens_edges() {
    let graphs: Vec<(usize, Vec<(usize, usize)>)> = vec![
        (4, vec![(0, 1), (0, 2), (1, 3), (2, 3)]),
        (6, vec![(0, 1), (1, 2), (2, 3), (0, 4), (4, 5), (5, 3), (0, 3)]),
        (7, vec![(0, 3), (1, 3), (2, 3), (3, 4), (3, 5), (5, 6), (4, 6)]),
        (5, vec![(0, 1), (0, 1), (1, 2), (3, 2), (3, 4)]),
    ];
    for (n, edges) in graphs {
        let lp = longest_path(n, &edges);
        let ns = network_simplex(n, &edges);
        assert_respects_edges(&ns, &edges);
        assert!(total_length(&ns, &edges) <= total_length(&lp, &edges));
        assert_eq!(ns.iter().copied().min(), Some(0));
    }
}

#[test]
fn network_simplex_normalizes_every_component() {
    let edges = [(0, 1), (2, 3), (3, 4)];
    let ns = network_simplex(6, &edges);
    assert_eq!(ns, vec![0, 1, 0, 1, 2, 0]);
}

#[test]
fn rank_dispatches_on_the_ranker() {
    let edges = [(0, 1), (1, 2), (2, 3), (4, 3)];
    assert_eq!(rank(5, &edges, Ranker::LongestPath)[4], 0);
    assert_eq!(rank(5, &edges, Ranker::NetworkSimplex)[4], 2);
}

#[test]
fn rank_gives_a_three_cycle_three_ranks() {
    let endpoints = [(0, 1), (1, 2), (2, 0)];
    let orientation = acyclic::run(3, &endpoints);
    assert_eq!(orientation.feedback_count(), 1);

    let edges: Vec<(usize, usize)> = orientation.layered_edges().map(|(_, e)| e).collect();
    let mut ranks = rank(3, &edges, Ranker::LongestPath);
    check(&ranks, &edges).unwrap();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![0, 1, 2]);
}

#[test]
fn check_reports_edges_that_do_not_point_down() {
    let err = check(&[1, 1], &[(0, 1)]).unwrap_err();
    assert_eq!(
        err,
        InvariantViolation::RankOrder {
            tail: 0,
            head: 1,
            tail_rank: 1,
            head_rank: 1,
        }
    );
}
