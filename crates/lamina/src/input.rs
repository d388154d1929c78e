//! Owned snapshot of the graph being laid out.

use crate::graphlib::DirectedGraph;
use crate::model::Size;
use rustc_hash::FxHashMap as HashMap;
use std::collections::HashMap as StdHashMap;
use std::hash::{BuildHasher, Hash};

/// Bounding box of each vertex, used for spacing.
pub trait VertexSizes<V> {
    fn size_of(&self, vertex: &V) -> Size;
}

impl<V, F> VertexSizes<V> for F
where
    F: Fn(&V) -> Size,
{
    fn size_of(&self, vertex: &V) -> Size {
        self(vertex)
    }
}

impl<V: Eq + Hash, S: BuildHasher> VertexSizes<V> for StdHashMap<V, Size, S> {
    fn size_of(&self, vertex: &V) -> Size {
        self.get(vertex).copied().unwrap_or(Size::ZERO)
    }
}

/// Vertices and edges with dense indices, detached from the caller's graph so a layout can run on
/// another thread while the graph keeps changing.
#[derive(Debug, Clone)]
pub struct LayoutInput<V, E> {
    vertices: Vec<V>,
    sizes: Vec<Size>,
    edges: Vec<E>,
    endpoints: Vec<(usize, usize)>,
}

impl<V, E> Default for LayoutInput<V, E> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            sizes: Vec::new(),
            edges: Vec::new(),
            endpoints: Vec::new(),
        }
    }
}

impl<V, E> LayoutInput<V, E>
where
    V: Clone + Eq + Hash,
{
    pub fn snapshot<G, S>(graph: &G, sizes: &S) -> Self
    where
        G: DirectedGraph<Vertex = V, Edge = E>,
        S: VertexSizes<V> + ?Sized,
    {
        let vertices = graph
            .vertices()
            .into_iter()
            .map(|v| {
                let size = sizes.size_of(&v);
                (v, size)
            })
            .collect();
        let edges = graph
            .edges()
            .into_iter()
            .map(|e| {
                let (v, w) = graph.endpoints(&e);
                (e, v, w)
            })
            .collect();
        Self::from_parts(vertices, edges)
    }

    /// Builds a snapshot from explicit lists. Edge endpoints missing from `vertices` are added with
    /// a zero size.
    pub fn from_parts(vertices: Vec<(V, Size)>, edges: Vec<(E, V, V)>) -> Self {
        let mut input = Self::default();
        let mut index: HashMap<V, usize> = HashMap::default();
        for (v, size) in vertices {
            if index.contains_key(&v) {
                continue;
            }
            index.insert(v.clone(), input.vertices.len());
            input.vertices.push(v);
            input.sizes.push(size);
        }

        for (e, v, w) in edges {
            let mut lookup = |v: V| {
                *index.entry(v.clone()).or_insert_with(|| {
                    input.vertices.push(v);
                    input.sizes.push(Size::ZERO);
                    input.vertices.len() - 1
                })
            };
            let from = lookup(v);
            let to = lookup(w);
            input.edges.push(e);
            input.endpoints.push((from, to));
        }
        input
    }
}

impl<V, E> LayoutInput<V, E> {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    pub fn edges(&self) -> &[E] {
        &self.edges
    }

    pub fn size(&self, v: usize) -> Size {
        self.sizes[v]
    }

    /// `(source, target)` vertex indices of edge `e`.
    pub fn endpoints(&self, e: usize) -> (usize, usize) {
        self.endpoints[e]
    }

    pub fn endpoint_list(&self) -> &[(usize, usize)] {
        &self.endpoints
    }
}
