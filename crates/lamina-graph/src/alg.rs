//! Whole-graph algorithms over any [`DirectedGraph`].

use crate::DirectedGraph;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use std::collections::VecDeque;

fn vertex_positions<G: DirectedGraph>(g: &G) -> (Vec<G::Vertex>, HashMap<G::Vertex, usize>) {
    let ids = g.vertices();
    let pos = ids
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, v)| (v, i))
        .collect();
    (ids, pos)
}

/// Weakly connected components, each listed in breadth-first order from its first vertex.
pub fn components<G: DirectedGraph>(g: &G) -> Vec<Vec<G::Vertex>> {
    let mut seen: HashSet<G::Vertex> = HashSet::default();
    let mut out: Vec<Vec<G::Vertex>> = Vec::new();

    for start in g.vertices() {
        if !seen.insert(start.clone()) {
            continue;
        }
        let mut comp: Vec<G::Vertex> = Vec::new();
        let mut q: VecDeque<G::Vertex> = VecDeque::new();
        q.push_back(start);
        while let Some(v) = q.pop_front() {
            for n in g.successors(&v).into_iter().chain(g.predecessors(&v)) {
                if seen.insert(n.clone()) {
                    q.push_back(n);
                }
            }
            comp.push(v);
        }
        out.push(comp);
    }

    out
}

struct Tarjan<'a, G: DirectedGraph> {
    g: &'a G,
    pos: &'a HashMap<G::Vertex, usize>,
    index: usize,
    stack: Vec<usize>,
    on_stack: Vec<bool>,
    indices: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    sccs: Vec<Vec<usize>>,
}

impl<G: DirectedGraph> Tarjan<'_, G> {
    fn strongconnect(&mut self, ids: &[G::Vertex], v: usize) {
        self.indices[v] = Some(self.index);
        self.lowlink[v] = self.index;
        self.index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;

        for w in self.g.successors(&ids[v]) {
            let Some(&w) = self.pos.get(&w) else {
                continue;
            };
            match self.indices[w] {
                None => {
                    self.strongconnect(ids, w);
                    self.lowlink[v] = self.lowlink[v].min(self.lowlink[w]);
                }
                Some(w_idx) if self.on_stack[w] => {
                    self.lowlink[v] = self.lowlink[v].min(w_idx);
                }
                Some(_) => {}
            }
        }

        if Some(self.lowlink[v]) == self.indices[v] {
            let mut scc = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack[w] = false;
                scc.push(w);
                if w == v {
                    break;
                }
            }
            self.sccs.push(scc);
        }
    }
}

/// Strongly connected components (Tarjan) that contain a cycle: every SCC with more than one
/// vertex, plus single vertices carrying a self-loop. Vertices inside a cycle keep insertion order
/// and cycles are sorted by their first vertex's insertion position.
pub fn find_cycles<G: DirectedGraph>(g: &G) -> Vec<Vec<G::Vertex>> {
    let (ids, pos) = vertex_positions(g);
    let n = ids.len();
    let mut tarjan = Tarjan {
        g,
        pos: &pos,
        index: 0,
        stack: Vec::new(),
        on_stack: vec![false; n],
        indices: vec![None; n],
        lowlink: vec![0; n],
        sccs: Vec::new(),
    };
    for v in 0..n {
        if tarjan.indices[v].is_none() {
            tarjan.strongconnect(&ids, v);
        }
    }

    let mut cycles: Vec<Vec<usize>> = Vec::new();
    for mut scc in tarjan.sccs {
        if scc.len() > 1 {
            scc.sort_unstable();
            cycles.push(scc);
        } else if g.successors(&ids[scc[0]]).contains(&ids[scc[0]]) {
            cycles.push(scc);
        }
    }
    cycles.sort_by_key(|c| c[0]);
    cycles
        .into_iter()
        .map(|c| c.into_iter().map(|i| ids[i].clone()).collect())
        .collect()
}

pub fn is_acyclic<G: DirectedGraph>(g: &G) -> bool {
    topsort(g).is_some()
}

/// Topological order (Kahn). Ties are broken by insertion order; `None` when the graph has a cycle.
pub fn topsort<G: DirectedGraph>(g: &G) -> Option<Vec<G::Vertex>> {
    let (ids, pos) = vertex_positions(g);
    let mut indegree: Vec<usize> = vec![0; ids.len()];
    let mut out_adj: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
    for e in g.edges() {
        let (v, w) = g.endpoints(&e);
        let (Some(&v), Some(&w)) = (pos.get(&v), pos.get(&w)) else {
            continue;
        };
        out_adj[v].push(w);
        indegree[w] += 1;
    }

    let mut ready: VecDeque<usize> = (0..ids.len()).filter(|&v| indegree[v] == 0).collect();
    let mut order: Vec<usize> = Vec::with_capacity(ids.len());
    while let Some(v) = ready.pop_front() {
        order.push(v);
        for &w in &out_adj[v] {
            indegree[w] -= 1;
            if indegree[w] == 0 {
                ready.push_back(w);
            }
        }
    }

    (order.len() == ids.len()).then(|| order.into_iter().map(|i| ids[i].clone()).collect())
}
