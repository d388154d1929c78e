//! Layer assignment.
//!
//! Both rankers take the acyclic edge list (self-loops already removed) and return contiguous
//! ranks starting at 0 with `rank(head) > rank(tail)` for every edge.

pub mod network_simplex;

use crate::config::Ranker;
use crate::error::InvariantViolation;
use std::collections::VecDeque;

pub fn rank(vertex_count: usize, edges: &[(usize, usize)], ranker: Ranker) -> Vec<usize> {
    let ranks = match ranker {
        Ranker::LongestPath => longest_path(vertex_count, edges),
        Ranker::NetworkSimplex => network_simplex::network_simplex(vertex_count, edges),
    };
    tracing::debug!(
        ?ranker,
        ranks = ranks.iter().max().map_or(0, |r| r + 1),
        length = total_length(&ranks, edges),
        "ranking done"
    );
    ranks
}

/// Sources get rank 0, every other vertex sits one below its lowest predecessor.
pub fn longest_path(vertex_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut out_adj: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
    let mut indegree: Vec<usize> = vec![0; vertex_count];
    for &(v, w) in edges {
        out_adj[v].push(w);
        indegree[w] += 1;
    }

    let mut rank: Vec<usize> = vec![0; vertex_count];
    let mut ready: VecDeque<usize> = (0..vertex_count).filter(|&v| indegree[v] == 0).collect();
    while let Some(v) = ready.pop_front() {
        for &w in &out_adj[v] {
            rank[w] = rank[w].max(rank[v] + 1);
            indegree[w] -= 1;
            if indegree[w] == 0 {
                ready.push_back(w);
            }
        }
    }
    rank
}

/// Sum of `rank(head) - rank(tail)` over all edges.
pub fn total_length(ranks: &[usize], edges: &[(usize, usize)]) -> usize {
    edges
        .iter()
        .map(|&(v, w)| ranks[w].saturating_sub(ranks[v]))
        .sum()
}

pub fn check(ranks: &[usize], edges: &[(usize, usize)]) -> Result<(), InvariantViolation> {
    for &(v, w) in edges {
        if ranks[w] <= ranks[v] {
            return Err(InvariantViolation::RankOrder {
                tail: v as u32,
                head: w as u32,
                tail_rank: ranks[v],
                head_rank: ranks[w],
            });
        }
    }
    Ok(())
}
