//! Crossing minimization.
//!
//! Layer-by-layer sweeps that alternate downward and upward. Every bilayer step works on the
//! current rank as an alternating sequence of containers and plain vertices, so a long edge costs
//! one container entry per rank instead of one synthetic vertex per rank.

mod bilayer;

mod container;
use container::Containers;

mod cross_count;
pub use cross_count::{cross_count, pair_crossings, two_layer_cross_count};

use crate::config::LayoutConfig;
use crate::data::splay::SeqId;
use crate::error::Result;
use crate::model::{LayerGraph, SegmentId, VertexId, VertexKind};
use crate::task::CancelToken;
use serde::Serialize;

/// One slot of the expanded layering: a vertex, or a segment passing through the rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Vertex(VertexId),
    Segment(SegmentId),
}

/// Entry of a rank while a bilayer is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Vertex(VertexId),
    Container(SeqId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ranks in increasing order; P vertices join containers, Q vertices split them.
    Down,
    /// Ranks in decreasing order; Q vertices join, P vertices split.
    Up,
}

impl Direction {
    pub(crate) fn join_segment(self, kind: VertexKind) -> Option<SegmentId> {
        match (self, kind) {
            (Direction::Down, VertexKind::SegmentTop(s))
            | (Direction::Up, VertexKind::SegmentBottom(s)) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn split_segment(self, kind: VertexKind) -> Option<SegmentId> {
        match (self, kind) {
            (Direction::Down, VertexKind::SegmentBottom(s))
            | (Direction::Up, VertexKind::SegmentTop(s)) => Some(s),
            _ => None,
        }
    }

    /// Neighbours of `v` in the rank processed just before its own.
    pub(crate) fn neighbors(self, graph: &LayerGraph, v: VertexId) -> Vec<VertexId> {
        match self {
            Direction::Down => graph.predecessors(v).collect(),
            Direction::Up => graph.successors(v).collect(),
        }
    }

    fn next(self, rank: usize, rank_count: usize) -> Option<usize> {
        match self {
            Direction::Down => (rank + 1 < rank_count).then_some(rank + 1),
            Direction::Up => rank.checked_sub(1),
        }
    }

    fn reverse(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderStats {
    /// Crossings of the kept ordering.
    pub crossings: usize,
    /// Best crossing count seen so far, after every directional sweep. Never increases.
    pub history: Vec<usize>,
    pub sweeps: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Ordering {
    /// Per rank, vertices and the segments passing through it, left to right.
    pub layering: Vec<Vec<Slot>>,
    pub stats: OrderStats,
}

/// Reorders every rank of `graph` in place and returns the expanded layering of the best order.
pub fn order(
    graph: &mut LayerGraph,
    config: &LayoutConfig,
    cancel: &CancelToken,
) -> Result<Ordering> {
    let rank_count = graph.rank_count();
    if rank_count <= 1 {
        return Ok(Ordering {
            layering: rank_layering(graph),
            stats: OrderStats::default(),
        });
    }

    let mut best: Option<(usize, Vec<Vec<VertexId>>, Vec<Vec<Slot>>)> = None;
    let mut history: Vec<usize> = Vec::new();
    let mut stale = 0usize;
    let mut direction = Direction::Down;

    for sweep_index in 0..2 * config.max_sweeps {
        let layering = sweep(graph, direction, config.transpose, cancel)?;
        let cc = cross_count(graph, &layering)?;
        tracing::trace!(sweep = sweep_index, ?direction, crossings = cc, "sweep done");

        match &best {
            Some((best_cc, ..)) if cc >= *best_cc => stale += 1,
            _ => {
                best = Some((cc, graph.ranks().to_vec(), layering));
                stale = 0;
            }
        }
        let best_cc = best.as_ref().map_or(cc, |(b, ..)| *b);
        history.push(best_cc);
        if best_cc == 0 || stale >= 2 {
            break;
        }
        direction = direction.reverse();
    }

    let Some((crossings, ranks, layering)) = best else {
        let layering = rank_layering(graph);
        let crossings = cross_count(graph, &layering)?;
        return Ok(Ordering {
            layering,
            stats: OrderStats {
                crossings,
                ..OrderStats::default()
            },
        });
    };
    graph.set_ranks(ranks);
    graph.check_ranks()?;

    tracing::debug!(crossings, sweeps = history.len(), "crossing minimization done");
    Ok(Ordering {
        layering,
        stats: OrderStats {
            crossings,
            sweeps: history.len(),
            history,
        },
    })
}

/// One directional sweep over all ranks. The first rank keeps its order.
fn sweep(
    graph: &mut LayerGraph,
    direction: Direction,
    transpose: bool,
    cancel: &CancelToken,
) -> Result<Vec<Vec<Slot>>> {
    let rank_count = graph.rank_count();
    let mut containers = Containers::new(graph.segments().len());
    let mut layering: Vec<Vec<Slot>> = vec![Vec::new(); rank_count];

    let start = match direction {
        Direction::Down => 0,
        Direction::Up => rank_count - 1,
    };
    layering[start] = graph.rank(start).iter().map(|&v| Slot::Vertex(v)).collect();
    let mut current: Vec<Entry> = graph.rank(start).iter().map(|&v| Entry::Vertex(v)).collect();

    let mut r = start;
    while let Some(next) = direction.next(r, rank_count) {
        cancel.check()?;
        current = bilayer::reorder(graph, &mut containers, current, next, direction, transpose)?;
        layering[next] = flatten(&containers, &current)?;
        r = next;
    }
    Ok(layering)
}

/// The current rank order expanded into slots, with the segments passing through a rank after
/// its vertices.
fn rank_layering(graph: &LayerGraph) -> Vec<Vec<Slot>> {
    let mut layering: Vec<Vec<Slot>> = graph
        .ranks()
        .iter()
        .map(|vs| vs.iter().map(|&v| Slot::Vertex(v)).collect())
        .collect();
    for s in graph.segment_ids() {
        let seg = graph.segment(s);
        let (top, bottom) = (graph.vertex(seg.top).rank, graph.vertex(seg.bottom).rank);
        for r in top + 1..bottom {
            layering[r].push(Slot::Segment(s));
        }
    }
    layering
}

fn flatten(containers: &Containers, layer: &[Entry]) -> Result<Vec<Slot>> {
    let mut out: Vec<Slot> = Vec::with_capacity(layer.len());
    for entry in layer {
        match *entry {
            Entry::Vertex(v) => out.push(Slot::Vertex(v)),
            Entry::Container(c) => out.extend(containers.segments(c)?.into_iter().map(Slot::Segment)),
        }
    }
    Ok(out)
}
