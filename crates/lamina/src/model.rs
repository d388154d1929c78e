//! Working structures of one layout run: layered vertices, unit-span edges, segments and the rank
//! sequence.
//!
//! Everything here is created fresh per run. Handles are dense arena indices, so two synthetic
//! vertices are distinct by construction even when every attribute matches.

use crate::error::InvariantViolation;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size::new(0.0, 0.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }
        }
    };
}

arena_id!(
    /// Handle of a [`LayerVertex`]. Real vertices share their index with the input vertex.
    VertexId
);
arena_id!(EdgeId);
arena_id!(SegmentId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    /// An input vertex, by input index.
    Real(usize),
    /// Intermediate vertex of a long edge, by input edge index.
    Synthetic(usize),
    /// Upper endpoint (P) of a segment.
    SegmentTop(SegmentId),
    /// Lower endpoint (Q) of a segment.
    SegmentBottom(SegmentId),
}

impl VertexKind {
    pub fn is_real(self) -> bool {
        matches!(self, VertexKind::Real(_))
    }

    pub fn segment(self) -> Option<SegmentId> {
        match self {
            VertexKind::SegmentTop(s) | VertexKind::SegmentBottom(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerVertex {
    pub kind: VertexKind,
    pub rank: usize,
    /// Position inside `ranks[rank]`, rewritten whenever the rank is reordered.
    pub index: usize,
    /// Order-statistic position while merging a bilayer.
    pub pos: usize,
    pub measure: f64,
    pub point: Point,
    pub size: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerEdge {
    pub source: VertexId,
    pub target: VertexId,
    /// Input edge this piece belongs to.
    pub origin: usize,
}

/// Compact stand-in for the inner run of a long edge: P at `source.rank + 1`, Q at
/// `target.rank - 1`. The P-Q link is implicit and never a [`LayerEdge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub top: VertexId,
    pub bottom: VertexId,
    pub origin: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LayerGraph {
    vertices: Vec<LayerVertex>,
    edges: Vec<LayerEdge>,
    segments: Vec<Segment>,
    out_edges: Vec<Vec<EdgeId>>,
    in_edges: Vec<Vec<EdgeId>>,
    ranks: Vec<Vec<VertexId>>,
}

impl LayerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, kind: VertexKind, rank: usize, size: Size) -> VertexId {
        let id = VertexId::from_index(self.vertices.len());
        self.vertices.push(LayerVertex {
            kind,
            rank,
            index: 0,
            pos: 0,
            measure: 0.0,
            point: Point::default(),
            size,
        });
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        id
    }

    pub fn add_edge(&mut self, source: VertexId, target: VertexId, origin: usize) -> EdgeId {
        let id = EdgeId::from_index(self.edges.len());
        self.edges.push(LayerEdge {
            source,
            target,
            origin,
        });
        self.out_edges[source.index()].push(id);
        self.in_edges[target.index()].push(id);
        id
    }

    pub fn add_segment(&mut self, top: VertexId, bottom: VertexId, origin: usize) -> SegmentId {
        let id = SegmentId::from_index(self.segments.len());
        self.segments.push(Segment {
            top,
            bottom,
            origin,
        });
        id
    }

    pub fn vertex(&self, v: VertexId) -> &LayerVertex {
        &self.vertices[v.index()]
    }

    pub fn vertex_mut(&mut self, v: VertexId) -> &mut LayerVertex {
        &mut self.vertices[v.index()]
    }

    pub fn segment(&self, s: SegmentId) -> &Segment {
        &self.segments[s.index()]
    }

    pub fn vertices(&self) -> &[LayerVertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[LayerEdge] {
        &self.edges
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::from_index)
    }

    pub fn segment_ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        (0..self.segments.len()).map(SegmentId::from_index)
    }

    pub fn successors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.out_edges[v.index()]
            .iter()
            .map(|&e| self.edges[e.index()].target)
    }

    pub fn predecessors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.in_edges[v.index()]
            .iter()
            .map(|&e| self.edges[e.index()].source)
    }

    pub fn rank_count(&self) -> usize {
        self.ranks.len()
    }

    pub fn ranks(&self) -> &[Vec<VertexId>] {
        &self.ranks
    }

    pub fn rank(&self, r: usize) -> &[VertexId] {
        &self.ranks[r]
    }

    /// Replaces the whole rank sequence and renumbers every rank.
    pub fn set_ranks(&mut self, ranks: Vec<Vec<VertexId>>) {
        self.ranks = ranks;
        for r in 0..self.ranks.len() {
            self.renumber(r);
        }
    }

    /// Replaces the order of one rank and renumbers it.
    pub fn set_rank_order(&mut self, r: usize, order: Vec<VertexId>) {
        self.ranks[r] = order;
        self.renumber(r);
    }

    /// Writes every vertex's array position into its `index`.
    fn renumber(&mut self, r: usize) {
        for (i, &v) in self.ranks[r].iter().enumerate() {
            self.vertices[v.index()].index = i;
        }
    }

    /// Every vertex appears in the row of its rank, at the position its `index` names.
    pub fn check_ranks(&self) -> Result<(), InvariantViolation> {
        for (row, vs) in self.ranks.iter().enumerate() {
            for (position, &v) in vs.iter().enumerate() {
                let lv = self.vertex(v);
                if lv.rank != row {
                    return Err(InvariantViolation::RankMismatch {
                        vertex: v.0,
                        row,
                        rank: lv.rank,
                    });
                }
                if lv.index != position {
                    return Err(InvariantViolation::IndexMismatch {
                        vertex: v.0,
                        rank: row,
                        position,
                        index: lv.index,
                    });
                }
            }
        }
        Ok(())
    }

    /// Every layer edge connects adjacent ranks, pointing down.
    pub fn check_spans(&self) -> Result<(), InvariantViolation> {
        for (i, e) in self.edges.iter().enumerate() {
            let from = self.vertex(e.source).rank;
            let to = self.vertex(e.target).rank;
            if to != from + 1 {
                return Err(InvariantViolation::LongSpan {
                    edge: i as u32,
                    span: to.abs_diff(from),
                });
            }
        }
        Ok(())
    }

    pub fn is_dummy(&self, v: VertexId) -> bool {
        !self.vertex(v).kind.is_real()
    }
}
