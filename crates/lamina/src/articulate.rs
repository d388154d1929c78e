//! Fold synthetic structure back into the caller's edges.
//!
//! Every input edge gets the points of its synthetic vertices as bend points, ordered from the
//! edge's own source to its own target, so feedback edges come out in their original direction.

use crate::acyclic::Orientation;
use crate::input::LayoutInput;
use crate::model::{LayerGraph, Point, Size, VertexId};
use crate::normalize::Normalized;
use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;
use std::hash::Hash;

/// Relative tolerance under which three points count as collinear.
const COLLINEAR_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult<V, E>
where
    V: Eq + Hash,
    E: Eq + Hash,
{
    /// Centre of every vertex.
    pub positions: HashMap<V, Point>,
    pub bends: HashMap<E, Vec<Point>>,
    pub size: Size,
    pub crossings: usize,
    pub ranks: HashMap<V, usize>,
}

impl<V, E> Default for LayoutResult<V, E>
where
    V: Eq + Hash,
    E: Eq + Hash,
{
    fn default() -> Self {
        Self {
            positions: HashMap::default(),
            bends: HashMap::default(),
            size: Size::ZERO,
            crossings: 0,
            ranks: HashMap::default(),
        }
    }
}

pub fn articulate<V, E>(
    input: &LayoutInput<V, E>,
    orientation: &Orientation,
    normalized: &Normalized,
    size: Size,
    crossings: usize,
    post_straighten: bool,
) -> LayoutResult<V, E>
where
    V: Clone + Eq + Hash,
    E: Clone + Eq + Hash,
{
    let graph: &LayerGraph = &normalized.graph;
    let point_of = |v: usize| graph.vertex(VertexId::from_index(v)).point;

    let mut result = LayoutResult {
        size,
        crossings,
        ..LayoutResult::default()
    };
    for (i, v) in input.vertices().iter().enumerate() {
        result.positions.insert(v.clone(), point_of(i));
        result
            .ranks
            .insert(v.clone(), graph.vertex(VertexId::from_index(i)).rank);
    }

    let mut straightened = 0usize;
    for (e, id) in input.edges().iter().enumerate() {
        let mut points: Vec<Point> = normalized.chains[e]
            .iter()
            .map(|&s| graph.vertex(s).point)
            .collect();
        if orientation.is_reversed(e) {
            points.reverse();
        }
        if post_straighten && !points.is_empty() {
            let (from, to) = input.endpoints(e);
            let before = points.len();
            straighten(&mut points, point_of(from), point_of(to));
            straightened += before - points.len();
        }
        result.bends.insert(id.clone(), points);
    }

    tracing::debug!(
        vertices = result.positions.len(),
        edges = result.bends.len(),
        straightened,
        "articulation done"
    );
    result
}

fn collinear(a: Point, b: Point, c: Point) -> bool {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    let scale = (c.x - a.x).abs() + (c.y - a.y).abs() + 1.0;
    cross.abs() <= COLLINEAR_EPSILON * scale * scale
}

/// Drops the bend points lying on the straight line between their neighbours on the polyline
/// `from, bends.., to`.
pub fn straighten(bends: &mut Vec<Point>, from: Point, to: Point) {
    let mut kept: Vec<Point> = Vec::with_capacity(bends.len());
    for (i, &p) in bends.iter().enumerate() {
        let prev = kept.last().copied().unwrap_or(from);
        let next = bends.get(i + 1).copied().unwrap_or(to);
        if !collinear(prev, p, next) {
            kept.push(p);
        }
    }
    *bends = kept;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straighten_keeps_real_bends_only() {
        let mut bends = vec![
            Point::new(0.0, 50.0),
            Point::new(0.0, 100.0),
            Point::new(30.0, 130.0),
        ];
        straighten(&mut bends, Point::new(0.0, 0.0), Point::new(60.0, 160.0));
        assert_eq!(bends, vec![Point::new(0.0, 100.0)]);
    }

    #[test]
    fn straighten_empties_a_straight_edge() {
        let mut bends = vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)];
        straighten(&mut bends, Point::new(0.0, 0.0), Point::new(30.0, 30.0));
        assert!(bends.is_empty());
    }
}
