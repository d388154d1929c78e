//! Replace every multi-rank edge by unit-span pieces.
//!
//! A span of 2 gets one synthetic vertex. Longer spans become a [`Segment`](crate::model::Segment)
//! (P right below the tail, Q right above the head) when compacting, or a chain of synthetic
//! vertices otherwise. The initial order of every rank comes from a depth-first walk started at
//! the vertices of the lowest ranks.

use crate::acyclic::Orientation;
use crate::error::Result;
use crate::input::LayoutInput;
use crate::model::{LayerGraph, SegmentId, Size, VertexId, VertexKind};

#[derive(Debug, Clone)]
pub struct Normalized {
    pub graph: LayerGraph,
    /// Per input edge, its synthetic vertices from layered tail to layered head. Empty for unit
    /// spans and self-loops; `[P, Q]` for segments.
    pub chains: Vec<Vec<VertexId>>,
    pub compacted: bool,
}

pub fn run<V, E>(
    input: &LayoutInput<V, E>,
    orientation: &Orientation,
    ranks: &[usize],
    compact: bool,
) -> Result<Normalized> {
    let mut graph = LayerGraph::new();
    for (v, &rank) in ranks.iter().enumerate() {
        graph.add_vertex(VertexKind::Real(v), rank, input.size(v));
    }

    let mut chains: Vec<Vec<VertexId>> = vec![Vec::new(); input.edge_count()];
    for (e, (tail, head)) in orientation.layered_edges() {
        let (u, w) = (VertexId::from_index(tail), VertexId::from_index(head));
        let (from, to) = (ranks[tail], ranks[head]);
        let span = to.saturating_sub(from);
        chains[e] = match span {
            0 | 1 => {
                graph.add_edge(u, w, e);
                Vec::new()
            }
            2 => {
                let s = graph.add_vertex(VertexKind::Synthetic(e), from + 1, Size::ZERO);
                graph.add_edge(u, s, e);
                graph.add_edge(s, w, e);
                vec![s]
            }
            _ if compact => {
                let segment = SegmentId::from_index(graph.segments().len());
                let p = graph.add_vertex(VertexKind::SegmentTop(segment), from + 1, Size::ZERO);
                let q = graph.add_vertex(VertexKind::SegmentBottom(segment), to - 1, Size::ZERO);
                graph.add_segment(p, q, e);
                graph.add_edge(u, p, e);
                graph.add_edge(q, w, e);
                vec![p, q]
            }
            _ => {
                let mut chain = Vec::with_capacity(span - 1);
                let mut prev = u;
                for r in from + 1..to {
                    let s = graph.add_vertex(VertexKind::Synthetic(e), r, Size::ZERO);
                    graph.add_edge(prev, s, e);
                    chain.push(s);
                    prev = s;
                }
                graph.add_edge(prev, w, e);
                chain
            }
        };
    }

    let order = init_order(&graph);
    graph.set_ranks(order);
    graph.check_ranks()?;
    graph.check_spans()?;

    tracing::debug!(
        vertices = graph.vertices().len(),
        synthetic = graph
            .vertices()
            .iter()
            .filter(|v| matches!(v.kind, VertexKind::Synthetic(_)))
            .count(),
        segments = graph.segments().len(),
        compact,
        "normalization done"
    );

    Ok(Normalized {
        graph,
        chains,
        compacted: compact,
    })
}

/// Following a segment from P continues at Q.
fn order_successors(graph: &LayerGraph, v: VertexId) -> Vec<VertexId> {
    match graph.vertex(v).kind {
        VertexKind::SegmentTop(s) => vec![graph.segment(s).bottom],
        _ => graph.successors(v).collect(),
    }
}

/// Depth-first visit from every vertex in rank order; each vertex is appended to its rank when
/// first reached.
pub fn init_order(graph: &LayerGraph) -> Vec<Vec<VertexId>> {
    let rank_count = graph
        .vertices()
        .iter()
        .map(|v| v.rank + 1)
        .max()
        .unwrap_or(0);
    let mut layers: Vec<Vec<VertexId>> = vec![Vec::new(); rank_count];
    let mut visited = vec![false; graph.vertices().len()];

    let mut starts: Vec<VertexId> = graph.vertex_ids().collect();
    starts.sort_by_key(|&v| graph.vertex(v).rank);

    let mut stack: Vec<VertexId> = Vec::new();
    for start in starts {
        stack.push(start);
        while let Some(v) = stack.pop() {
            if visited[v.index()] {
                continue;
            }
            visited[v.index()] = true;
            layers[graph.vertex(v).rank].push(v);
            let next = order_successors(graph, v);
            stack.extend(next.into_iter().rev());
        }
    }
    layers
}
