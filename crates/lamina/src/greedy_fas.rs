//! Greedy feedback arc set (Eades, Lin & Smyth).
//!
//! Vertices are peeled off in three ways: sinks are prepended to a right-hand sequence, sources
//! are appended to a left-hand sequence, and otherwise the vertex with the largest
//! `out - in` weight is appended to the left. Edges that point backwards in the concatenated
//! sequence form the feedback set. Bucket queues keep the whole run O(V + E).

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use std::collections::hash_map::Entry;

/// Indices (ascending) of the edges to reverse so that `edges` becomes acyclic.
///
/// Self-loops are ignored; parallel edges are weighed together and reversed together. Ties
/// between vertices of equal weight go to the one bucketed first, so the result only depends on
/// the order of `edges`.
pub fn greedy_fas(vertex_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    if vertex_count <= 1 || edges.is_empty() {
        return Vec::new();
    }

    let mut in_w: Vec<i64> = vec![0; vertex_count];
    let mut out_w: Vec<i64> = vec![0; vertex_count];
    let mut edge_w: HashMap<(usize, usize), i64> = HashMap::default();
    let mut edge_order: Vec<(usize, usize)> = Vec::new();

    for &(v, w) in edges {
        if v == w {
            continue;
        }
        match edge_w.entry((v, w)) {
            Entry::Vacant(slot) => {
                slot.insert(1);
                edge_order.push((v, w));
            }
            Entry::Occupied(mut slot) => *slot.get_mut() += 1,
        }
        out_w[v] += 1;
        in_w[w] += 1;
    }

    let max_in = in_w.iter().copied().max().unwrap_or(0);
    let max_out = out_w.iter().copied().max().unwrap_or(0);

    let mut in_adj: Vec<Vec<(usize, i64)>> = vec![Vec::new(); vertex_count];
    let mut out_adj: Vec<Vec<(usize, i64)>> = vec![Vec::new(); vertex_count];
    for &(v, w) in &edge_order {
        let weight = edge_w.get(&(v, w)).copied().unwrap_or(0);
        out_adj[v].push((w, weight));
        in_adj[w].push((v, weight));
    }

    let mut work = Work {
        alive: vec![true; vertex_count],
        remaining: vertex_count,
        buckets: Buckets::new((max_out + max_in + 3) as usize, vertex_count),
        zero_idx: max_in + 1,
        in_w,
        out_w,
        in_adj: &in_adj,
        out_adj: &out_adj,
    };
    for v in 0..vertex_count {
        work.assign_bucket(v);
    }

    let mut backward: Vec<(usize, usize)> = Vec::new();
    let last = work.buckets.len() - 1;
    while work.remaining > 0 {
        while let Some(v) = work.buckets.pop(0) {
            work.remove_vertex(v, None);
        }
        while let Some(v) = work.buckets.pop(last) {
            work.remove_vertex(v, None);
        }
        if work.remaining == 0 {
            break;
        }

        let picked = (1..last).rev().find_map(|i| work.buckets.pop(i));
        let Some(v) = picked else {
            break;
        };
        work.remove_vertex(v, Some(&mut backward));
    }

    let backward: HashSet<(usize, usize)> = backward.into_iter().collect();
    let feedback: Vec<usize> = edges
        .iter()
        .enumerate()
        .filter(|(_, pair)| backward.contains(*pair))
        .map(|(i, _)| i)
        .collect();
    tracing::trace!(feedback = feedback.len(), "greedy feedback arc set");
    feedback
}

struct Work<'a> {
    alive: Vec<bool>,
    remaining: usize,
    buckets: Buckets,
    zero_idx: i64,
    in_w: Vec<i64>,
    out_w: Vec<i64>,
    in_adj: &'a [Vec<(usize, i64)>],
    out_adj: &'a [Vec<(usize, i64)>],
}

impl Work<'_> {
    fn assign_bucket(&mut self, v: usize) {
        let last = self.buckets.len() - 1;
        let idx = if self.out_w[v] == 0 {
            0
        } else if self.in_w[v] == 0 {
            last
        } else {
            (self.out_w[v] - self.in_w[v] + self.zero_idx).clamp(0, last as i64) as usize
        };
        self.buckets.push(idx, v);
    }

    /// Drops `v` from the working graph, re-bucketing its live neighbours. With `collect`, the
    /// live in-edges of `v` are recorded: those sources end up after `v`.
    fn remove_vertex(&mut self, v: usize, mut collect: Option<&mut Vec<(usize, usize)>>) {
        if !self.alive[v] {
            return;
        }
        self.alive[v] = false;
        self.remaining -= 1;
        self.buckets.unlink(v);

        let (in_adj, out_adj) = (self.in_adj, self.out_adj);
        for &(u, weight) in &in_adj[v] {
            if !self.alive[u] {
                continue;
            }
            if let Some(out) = collect.as_deref_mut() {
                out.push((u, v));
            }
            self.out_w[u] -= weight;
            self.buckets.unlink(u);
            self.assign_bucket(u);
        }

        for &(w, weight) in &out_adj[v] {
            if !self.alive[w] {
                continue;
            }
            self.in_w[w] -= weight;
            self.buckets.unlink(w);
            self.assign_bucket(w);
        }
    }
}

/// FIFO queues of vertices threaded through shared `prev`/`next` arrays, so moving a vertex
/// between buckets is O(1).
struct Buckets {
    head: Vec<Option<usize>>,
    tail: Vec<Option<usize>>,
    prev: Vec<Option<usize>>,
    next: Vec<Option<usize>>,
    bucket_of: Vec<Option<usize>>,
}

impl Buckets {
    fn new(bucket_count: usize, vertex_count: usize) -> Self {
        Self {
            head: vec![None; bucket_count],
            tail: vec![None; bucket_count],
            prev: vec![None; vertex_count],
            next: vec![None; vertex_count],
            bucket_of: vec![None; vertex_count],
        }
    }

    fn len(&self) -> usize {
        self.head.len()
    }

    fn push(&mut self, bucket: usize, v: usize) {
        self.prev[v] = self.tail[bucket];
        self.next[v] = None;
        match self.tail[bucket] {
            Some(t) => self.next[t] = Some(v),
            None => self.head[bucket] = Some(v),
        }
        self.tail[bucket] = Some(v);
        self.bucket_of[v] = Some(bucket);
    }

    fn unlink(&mut self, v: usize) {
        let Some(bucket) = self.bucket_of[v].take() else {
            return;
        };
        match self.prev[v] {
            Some(p) => self.next[p] = self.next[v],
            None => self.head[bucket] = self.next[v],
        }
        match self.next[v] {
            Some(n) => self.prev[n] = self.prev[v],
            None => self.tail[bucket] = self.prev[v],
        }
        self.prev[v] = None;
        self.next[v] = None;
    }

    fn pop(&mut self, bucket: usize) -> Option<usize> {
        let v = self.head[bucket]?;
        self.unlink(v);
        Some(v)
    }
}
