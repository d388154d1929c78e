//! Directed graph container consumed by `lamina`.
//!
//! The layout engine only needs a read-only view of a directed graph: its vertices, its edges and
//! their endpoints, plus per-vertex adjacency. [`DirectedGraph`] captures that view so callers can
//! plug in their own containers; [`DiGraph`] is a ready-made string-keyed implementation.

mod graph;

pub mod alg;

pub use graph::{DiGraph, EdgeKey, GraphOptions};

use std::fmt::Debug;
use std::hash::Hash;

/// Read-only view of a directed graph.
///
/// `vertices` and `edges` must return a stable order for an unchanged graph; the layout engine is
/// deterministic with respect to that order.
pub trait DirectedGraph {
    type Vertex: Clone + Eq + Hash + Ord + Debug;
    type Edge: Clone + Eq + Hash + Debug;

    fn vertices(&self) -> Vec<Self::Vertex>;

    fn edges(&self) -> Vec<Self::Edge>;

    /// `(source, target)` of an edge.
    fn endpoints(&self, edge: &Self::Edge) -> (Self::Vertex, Self::Vertex);

    fn successors(&self, v: &Self::Vertex) -> Vec<Self::Vertex>;

    fn predecessors(&self, v: &Self::Vertex) -> Vec<Self::Vertex>;

    fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    fn edge_count(&self) -> usize {
        self.edges().len()
    }

    fn out_degree(&self, v: &Self::Vertex) -> usize {
        self.successors(v).len()
    }

    fn in_degree(&self, v: &Self::Vertex) -> usize {
        self.predecessors(v).len()
    }

    fn degree(&self, v: &Self::Vertex) -> usize {
        self.in_degree(v) + self.out_degree(v)
    }
}

impl<N, E> DirectedGraph for DiGraph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    type Vertex = String;
    type Edge = EdgeKey;

    fn vertices(&self) -> Vec<String> {
        self.node_ids()
    }

    fn edges(&self) -> Vec<EdgeKey> {
        self.edge_keys()
    }

    fn endpoints(&self, edge: &EdgeKey) -> (String, String) {
        (edge.v.clone(), edge.w.clone())
    }

    fn successors(&self, v: &String) -> Vec<String> {
        DiGraph::successors(self, v)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn predecessors(&self, v: &String) -> Vec<String> {
        DiGraph::predecessors(self, v)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn vertex_count(&self) -> usize {
        self.node_count()
    }

    fn edge_count(&self) -> usize {
        DiGraph::edge_count(self)
    }

    fn out_degree(&self, v: &String) -> usize {
        self.out_edges(v, None).len()
    }

    fn in_degree(&self, v: &String) -> usize {
        self.in_edges(v, None).len()
    }
}
