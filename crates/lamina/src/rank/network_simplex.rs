//! Network simplex ranking (Gansner, Koutsofios, North & Vo).
//!
//! Starts from the longest-path ranking, grows a feasible tight spanning tree and pivots tree
//! edges with negative cut values until the total edge length is minimal. Each weakly connected
//! component is solved on its own and shifted so its smallest rank is 0.

use super::longest_path;
use rustc_hash::FxHashMap as HashMap;
use std::collections::hash_map::Entry;

pub fn network_simplex(vertex_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let initial = longest_path(vertex_count, edges);
    let mut ranks: Vec<usize> = vec![0; vertex_count];

    for members in components(vertex_count, edges) {
        let mut local: HashMap<usize, usize> = HashMap::default();
        for (i, &v) in members.iter().enumerate() {
            local.insert(v, i);
        }
        let local_edges: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|(v, w)| Some((*local.get(v)?, *local.get(w)?)))
            .collect();
        let start: Vec<i64> = members.iter().map(|&v| initial[v] as i64).collect();

        let mut simplex = Simplex::new(members.len(), &local_edges, start);
        simplex.run();

        let min = simplex.rank.iter().copied().min().unwrap_or(0);
        for (i, &v) in members.iter().enumerate() {
            ranks[v] = (simplex.rank[i] - min) as usize;
        }
    }
    ranks
}

fn components(vertex_count: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
    for &(v, w) in edges {
        adj[v].push(w);
        adj[w].push(v);
    }
    let mut seen = vec![false; vertex_count];
    let mut out: Vec<Vec<usize>> = Vec::new();
    for start in 0..vertex_count {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        let mut comp = vec![start];
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            for &w in &adj[v] {
                if !seen[w] {
                    seen[w] = true;
                    comp.push(w);
                    stack.push(w);
                }
            }
        }
        comp.sort_unstable();
        out.push(comp);
    }
    out
}

struct Simplex {
    /// Simple graph: parallel edges merged into one weighted edge.
    edges: Vec<(usize, usize, i64)>,
    incident: Vec<Vec<usize>>,
    rank: Vec<i64>,
    in_tree: Vec<bool>,
    parent: Vec<Option<usize>>,
    parent_edge: Vec<Option<usize>>,
    low: Vec<usize>,
    lim: Vec<usize>,
    /// Cut value of `parent_edge[v]`.
    cut: Vec<i64>,
}

impl Simplex {
    fn new(n: usize, edges: &[(usize, usize)], rank: Vec<i64>) -> Self {
        let mut merged: Vec<(usize, usize, i64)> = Vec::new();
        let mut index: HashMap<(usize, usize), usize> = HashMap::default();
        for &(v, w) in edges {
            match index.entry((v, w)) {
                Entry::Vacant(slot) => {
                    slot.insert(merged.len());
                    merged.push((v, w, 1));
                }
                Entry::Occupied(slot) => merged[*slot.get()].2 += 1,
            }
        }
        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, &(v, w, _)) in merged.iter().enumerate() {
            incident[v].push(i);
            incident[w].push(i);
        }
        let m = merged.len();
        Self {
            edges: merged,
            incident,
            rank,
            in_tree: vec![false; m],
            parent: vec![None; n],
            parent_edge: vec![None; n],
            low: vec![0; n],
            lim: vec![0; n],
            cut: vec![0; n],
        }
    }

    fn slack(&self, e: usize) -> i64 {
        let (v, w, _) = self.edges[e];
        self.rank[w] - self.rank[v] - 1
    }

    fn run(&mut self) {
        if self.rank.len() <= 1 {
            return;
        }
        self.feasible_tree();
        self.init_low_lim();
        self.init_cut_values();

        let limit = (self.edges.len() + 1) * (self.rank.len() + 1);
        let mut iterations = 0usize;
        while let Some(leave) = self.leave_edge() {
            if iterations == limit {
                tracing::debug!(iterations, "network simplex stopped at the pivot limit");
                break;
            }
            iterations += 1;
            let Some(enter) = self.enter_edge(leave) else {
                break;
            };
            self.in_tree[leave] = false;
            self.in_tree[enter] = true;
            self.init_low_lim();
            self.init_cut_values();
            self.update_ranks();
        }
        tracing::trace!(iterations, "network simplex converged");
    }

    /// Grows a tree of tight edges from vertex 0, shifting the tree by the smallest slack of an
    /// edge leaving it whenever no tight edge is left.
    fn feasible_tree(&mut self) {
        let n = self.rank.len();
        let mut in_tree_v = vec![false; n];
        in_tree_v[0] = true;
        let mut tree: Vec<usize> = vec![0];

        loop {
            let mut stack = tree.clone();
            while let Some(v) = stack.pop() {
                for i in 0..self.incident[v].len() {
                    let e = self.incident[v][i];
                    let (a, b, _) = self.edges[e];
                    let other = if a == v { b } else { a };
                    if !in_tree_v[other] && self.slack(e) == 0 {
                        in_tree_v[other] = true;
                        self.in_tree[e] = true;
                        tree.push(other);
                        stack.push(other);
                    }
                }
            }
            if tree.len() == n {
                return;
            }

            let candidate = (0..self.edges.len())
                .filter(|&e| {
                    let (v, w, _) = self.edges[e];
                    in_tree_v[v] != in_tree_v[w]
                })
                .min_by_key(|&e| self.slack(e));
            let Some(e) = candidate else {
                return;
            };
            let slack = self.slack(e);
            let delta = if in_tree_v[self.edges[e].0] {
                slack
            } else {
                -slack
            };
            for &v in &tree {
                self.rank[v] += delta;
            }
        }
    }

    fn tree_neighbors(&self, v: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.incident[v]
            .iter()
            .copied()
            .filter(|&e| self.in_tree[e])
            .map(move |e| {
                let (a, b, _) = self.edges[e];
                (if a == v { b } else { a }, e)
            })
    }

    /// Postorder numbering rooted at vertex 0: `lim` is the postorder number, `low` the smallest
    /// `lim` in the subtree.
    fn init_low_lim(&mut self) {
        let n = self.rank.len();
        let mut visited = vec![false; n];
        let mut next_lim = 1usize;
        self.parent[0] = None;
        self.parent_edge[0] = None;

        // (vertex, low, next neighbour cursor)
        let mut stack: Vec<(usize, usize, usize)> = vec![(0, next_lim, 0)];
        visited[0] = true;
        while let Some(&mut (v, low, ref mut cursor)) = stack.last_mut() {
            let next = self.tree_neighbors(v).nth(*cursor);
            *cursor += 1;
            match next {
                Some((w, e)) if !visited[w] => {
                    visited[w] = true;
                    self.parent[w] = Some(v);
                    self.parent_edge[w] = Some(e);
                    stack.push((w, next_lim, 0));
                }
                Some(_) => {}
                None => {
                    self.low[v] = low;
                    self.lim[v] = next_lim;
                    next_lim += 1;
                    stack.pop();
                }
            }
        }
    }

    fn init_cut_values(&mut self) {
        let mut postorder: Vec<usize> = (0..self.rank.len()).collect();
        postorder.sort_by_key(|&v| self.lim[v]);
        for v in postorder {
            if self.parent[v].is_some() {
                self.cut[v] = self.calc_cut_value(v);
            }
        }
    }

    fn calc_cut_value(&self, child: usize) -> i64 {
        let Some(pe) = self.parent_edge[child] else {
            return 0;
        };
        let (tail, _, weight) = self.edges[pe];
        let child_is_tail = tail == child;
        let mut cut = weight;
        for &e in &self.incident[child] {
            if e == pe {
                continue;
            }
            let (a, b, w) = self.edges[e];
            let is_out = a == child;
            let other = if is_out { b } else { a };
            let points_to_head = is_out == child_is_tail;
            cut += if points_to_head { w } else { -w };
            if self.in_tree[e] && self.parent[other] == Some(child) {
                cut += if points_to_head {
                    -self.cut[other]
                } else {
                    self.cut[other]
                };
            }
        }
        cut
    }

    fn leave_edge(&self) -> Option<usize> {
        (0..self.rank.len())
            .find(|&v| self.parent[v].is_some() && self.cut[v] < 0)
            .and_then(|v| self.parent_edge[v])
    }

    fn is_descendant(&self, v: usize, root: usize) -> bool {
        self.low[root] <= self.lim[v] && self.lim[v] <= self.lim[root]
    }

    fn enter_edge(&self, leave: usize) -> Option<usize> {
        let (v, w, _) = self.edges[leave];
        let (tail, flip) = if self.lim[v] > self.lim[w] {
            (w, true)
        } else {
            (v, false)
        };
        (0..self.edges.len())
            .filter(|&e| {
                let (a, b, _) = self.edges[e];
                flip == self.is_descendant(a, tail) && flip != self.is_descendant(b, tail)
            })
            .min_by_key(|&e| self.slack(e))
    }

    fn update_ranks(&mut self) {
        let mut order: Vec<usize> = (0..self.rank.len()).collect();
        order.sort_by_key(|&v| std::cmp::Reverse(self.lim[v]));
        for v in order {
            let (Some(p), Some(e)) = (self.parent[v], self.parent_edge[v]) else {
                continue;
            };
            self.rank[v] = if self.edges[e].0 == p {
                self.rank[p] + 1
            } else {
                self.rank[p] - 1
            };
        }
    }
}
