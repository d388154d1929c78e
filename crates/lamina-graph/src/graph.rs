//! String-keyed directed graph with node and edge labels.
//!
//! Nodes and edges keep insertion order. Adjacency is rebuilt lazily after mutations so that the
//! query methods can stay on `&self`.

use rustc_hash::FxBuildHasher;
use std::cell::RefCell;
use std::hash::Hash;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone)]
struct AdjCache {
    generation: u64,
    out: Vec<Vec<usize>>,
    in_: Vec<Vec<usize>>,
}

#[derive(Clone, Copy, Hash)]
struct EdgeKeyView<'a> {
    v: &'a str,
    w: &'a str,
    name: Option<&'a str>,
}

impl<'a> hashbrown::Equivalent<EdgeKey> for EdgeKeyView<'a> {
    fn equivalent(&self, key: &EdgeKey) -> bool {
        key.v == self.v && key.w == self.w && key.name.as_deref() == self.name
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    /// Allow several edges between the same ordered pair, told apart by their name.
    pub multigraph: bool,
}

/// Identity of an edge: ordered endpoints plus an optional name (multigraphs only).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
    pub name: Option<String>,
}

impl EdgeKey {
    pub fn new(
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
    ) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
            name: name.map(Into::into),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.v == self.w
    }
}

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    id: String,
    label: N,
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    key: EdgeKey,
    label: E,
}

pub struct DiGraph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    options: GraphOptions,

    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<EdgeKey, usize>,

    adj_gen: u64,
    adj_cache: RefCell<Option<AdjCache>>,
}

impl<N, E> Default for DiGraph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}

impl<N, E> std::fmt::Debug for DiGraph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiGraph")
            .field("nodes", &self.nodes.iter().map(|n| &n.id).collect::<Vec<_>>())
            .field("edges", &self.edges.iter().map(|e| &e.key).collect::<Vec<_>>())
            .finish()
    }
}

impl<N, E> DiGraph<N, E>
where
    N: Default + 'static,
    E: Default + 'static,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            adj_gen: 0,
            adj_cache: RefCell::new(None),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    fn invalidate_adj(&mut self) {
        self.adj_gen = self.adj_gen.wrapping_add(1);
        *self.adj_cache.get_mut() = None;
    }

    fn build_adj(&self, generation: u64) -> AdjCache {
        let mut out: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        let mut in_: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (edge_idx, e) in self.edges.iter().enumerate() {
            let (Some(&v_idx), Some(&w_idx)) =
                (self.node_index.get(&e.key.v), self.node_index.get(&e.key.w))
            else {
                continue;
            };
            out[v_idx].push(edge_idx);
            in_[w_idx].push(edge_idx);
        }
        AdjCache {
            generation,
            out,
            in_,
        }
    }

    fn with_adj<R>(&self, f: impl FnOnce(&AdjCache) -> R) -> R {
        let generation = self.adj_gen;
        let mut cache = self.adj_cache.borrow_mut();
        if cache.as_ref().is_some_and(|c| c.generation != generation) {
            *cache = None;
        }
        f(cache.get_or_insert_with(|| self.build_adj(generation)))
    }

    fn view<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyView<'a> {
        let name = if self.options.multigraph { name } else { None };
        EdgeKeyView { v, w, name }
    }

    fn index_of(&self, view: EdgeKeyView<'_>) -> Option<usize> {
        self.edge_index.get(&view).copied()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx].label = label;
            return self;
        }
        self.invalidate_adj();
        self.node_index.insert(id.clone(), self.nodes.len());
        self.nodes.push(NodeEntry { id, label });
        self
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if !self.has_node(&id) {
            self.set_node(id, N::default());
        }
        self
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        let idx = *self.node_index.get(id)?;
        Some(&mut self.nodes[idx].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().map(|e| &e.key)
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.iter().map(|e| e.key.clone()).collect()
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, None)
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, Some(label))
    }

    /// Adds (or relabels) the edge `v -> w`. Missing endpoints are created with default labels.
    /// The name is ignored unless the graph is a multigraph.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let v = v.into();
        let w = w.into();
        self.ensure_node(v.clone());
        self.ensure_node(w.clone());

        let name = if self.options.multigraph {
            name.map(Into::into)
        } else {
            None
        };
        let key = EdgeKey { v, w, name };

        if let Some(&idx) = self.edge_index.get(&key) {
            if let Some(label) = label {
                self.edges[idx].label = label;
            }
            return self;
        }

        self.invalidate_adj();
        self.edge_index.insert(key.clone(), self.edges.len());
        self.edges.push(EdgeEntry {
            key,
            label: label.unwrap_or_default(),
        });
        self
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.index_of(self.view(v, w, name)).is_some()
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        let idx = self.index_of(self.view(v, w, name))?;
        Some(&self.edges[idx].label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let idx = self.index_of(self.view(v, w, name))?;
        Some(&mut self.edges[idx].label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    fn remove_edge_at(&mut self, idx: usize) {
        self.invalidate_adj();
        let _ = self.edge_index.remove(&self.edges[idx].key);
        self.edges.remove(idx);
        for (i, e) in self.edges.iter().enumerate().skip(idx) {
            if let Some(slot) = self.edge_index.get_mut(&e.key) {
                *slot = i;
            }
        }
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> bool {
        let Some(idx) = self.index_of(self.view(v, w, name)) else {
            return false;
        };
        self.remove_edge_at(idx);
        true
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> bool {
        self.remove_edge(&key.v, &key.w, key.name.as_deref())
    }

    /// Removes a node together with every incident edge.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(idx) = self.node_index.remove(id) else {
            return false;
        };

        self.invalidate_adj();
        self.nodes.remove(idx);
        for (i, n) in self.nodes.iter().enumerate().skip(idx) {
            if let Some(slot) = self.node_index.get_mut(n.id.as_str()) {
                *slot = i;
            }
        }

        let before = self.edges.len();
        self.edges.retain(|e| e.key.v != id && e.key.w != id);
        if self.edges.len() != before {
            self.edge_index.clear();
            for (i, e) in self.edges.iter().enumerate() {
                self.edge_index.insert(e.key.clone(), i);
            }
        }
        true
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        let edge_ids = self.with_adj(|c| c.out.get(v_idx).cloned().unwrap_or_default());
        edge_ids
            .into_iter()
            .map(|e| self.edges[e].key.w.as_str())
            .collect()
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        let edge_ids = self.with_adj(|c| c.in_.get(v_idx).cloned().unwrap_or_default());
        edge_ids
            .into_iter()
            .map(|e| self.edges[e].key.v.as_str())
            .collect()
    }

    /// Outgoing edges of `v`, optionally restricted to those ending at `w`.
    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.with_adj(|c| {
            c.out
                .get(v_idx)
                .into_iter()
                .flatten()
                .map(|&e| &self.edges[e].key)
                .filter(|k| w.is_none_or(|w| k.w == w))
                .cloned()
                .collect()
        })
    }

    /// Incoming edges of `v`, optionally restricted to those starting at `u`.
    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Vec<EdgeKey> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.with_adj(|c| {
            c.in_
                .get(v_idx)
                .into_iter()
                .flatten()
                .map(|&e| &self.edges[e].key)
                .filter(|k| u.is_none_or(|u| k.v == u))
                .cloned()
                .collect()
        })
    }

    pub fn sources(&self) -> Vec<&str> {
        self.with_adj(|c| {
            self.nodes
                .iter()
                .enumerate()
                .filter(|(i, _)| c.in_.get(*i).is_none_or(Vec::is_empty))
                .map(|(_, n)| n.id.as_str())
                .collect()
        })
    }

    pub fn sinks(&self) -> Vec<&str> {
        self.with_adj(|c| {
            self.nodes
                .iter()
                .enumerate()
                .filter(|(i, _)| c.out.get(*i).is_none_or(Vec::is_empty))
                .map(|(_, n)| n.id.as_str())
                .collect()
        })
    }
}
