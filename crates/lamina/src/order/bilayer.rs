//! One bilayer step of a sweep: reorders the downstream rank against the already fixed current
//! rank, treating every run of segments as a single container.

use super::container::Containers;
use super::cross_count::pair_crossings;
use super::{Direction, Entry};
use crate::data::splay::SeqId;
use crate::error::{Error, InvariantViolation, Result};
use crate::model::{LayerGraph, SegmentId, VertexId};
use rustc_hash::FxHashMap as HashMap;
use std::collections::VecDeque;

/// A downstream entry together with the sorted current-rank positions of its edges. Split
/// vertices carry the single position their segment had in its container.
#[derive(Debug, Clone)]
struct Placed {
    entry: Entry,
    uppers: Vec<usize>,
}

impl Placed {
    fn container(seq: SeqId) -> Self {
        Self {
            entry: Entry::Container(seq),
            uppers: Vec::new(),
        }
    }

    fn vertex(v: VertexId, uppers: Vec<usize>) -> Self {
        Self {
            entry: Entry::Vertex(v),
            uppers,
        }
    }

    fn is_vertex(&self) -> bool {
        matches!(self.entry, Entry::Vertex(_))
    }
}

/// Runs the six steps for the bilayer `current -> downstream` and returns the alternating entry
/// sequence of `downstream`, which becomes the next current layer.
pub(super) fn reorder(
    graph: &mut LayerGraph,
    containers: &mut Containers,
    current: Vec<Entry>,
    downstream: usize,
    direction: Direction,
    transpose: bool,
) -> Result<Vec<Entry>> {
    let current = collapse(graph, containers, current, direction)?;
    assign_positions(graph, containers, &current)?;

    let old_order: Vec<VertexId> = graph.rank(downstream).to_vec();
    let (splits, plain): (Vec<VertexId>, Vec<VertexId>) = old_order
        .iter()
        .copied()
        .partition(|&v| direction.split_segment(graph.vertex(v).kind).is_some());
    let vertices = measure(graph, direction, plain);

    let mut queue: VecDeque<SeqId> = VecDeque::new();
    for entry in &current {
        if let Entry::Container(c) = *entry {
            if !containers.is_empty(c)? {
                queue.push_back(c);
            }
        }
    }

    let merged = merge(graph, containers, vertices, queue)?;
    let mut placed = insert_split_vertices(graph, containers, direction, merged, &splits)?;
    if transpose {
        let swaps = transpose_pass(&mut placed);
        if swaps > 0 {
            tracing::trace!(rank = downstream, swaps, "transposed neighbours");
        }
    }

    let layer = rescan(containers, placed)?;
    check_alternation(&layer, downstream)?;

    let order: Vec<VertexId> = layer
        .iter()
        .filter_map(|e| match *e {
            Entry::Vertex(v) => Some(v),
            Entry::Container(_) => None,
        })
        .collect();
    if order.len() != old_order.len() {
        return Err(Error::invariant(InvariantViolation::LostVertices {
            rank: downstream,
            expected: old_order.len(),
            found: order.len(),
        }));
    }
    graph.set_rank_order(downstream, order);
    Ok(layer)
}

/// Step 1: join vertices leave the sequence and their segments move into the nearest preceding
/// container; neighbouring containers are joined so containers and vertices alternate.
fn collapse(
    graph: &LayerGraph,
    containers: &mut Containers,
    layer: Vec<Entry>,
    direction: Direction,
) -> Result<Vec<Entry>> {
    let mut out: Vec<Entry> = Vec::with_capacity(layer.len() + 1);
    let mut open = containers.create();
    for entry in layer {
        match entry {
            Entry::Container(c) => open = containers.join(open, c)?,
            Entry::Vertex(v) => match direction.join_segment(graph.vertex(v).kind) {
                Some(s) => containers.append(open, s)?,
                None => {
                    out.push(Entry::Container(open));
                    out.push(Entry::Vertex(v));
                    open = containers.create();
                }
            },
        }
    }
    out.push(Entry::Container(open));
    Ok(out)
}

/// Step 2, first half: consecutive positions, a container taking one per segment.
fn assign_positions(
    graph: &mut LayerGraph,
    containers: &mut Containers,
    layer: &[Entry],
) -> Result<()> {
    let mut next = 0usize;
    for entry in layer {
        match *entry {
            Entry::Vertex(v) => {
                graph.vertex_mut(v).pos = next;
                next += 1;
            }
            Entry::Container(c) => {
                containers.set_pos(c, next);
                next += containers.len(c)?;
            }
        }
    }
    Ok(())
}

fn uppers(graph: &LayerGraph, direction: Direction, v: VertexId) -> Vec<usize> {
    let mut positions: Vec<usize> = direction
        .neighbors(graph, v)
        .into_iter()
        .map(|u| graph.vertex(u).pos)
        .collect();
    positions.sort_unstable();
    positions
}

/// Weighted median of sorted positions.
fn weighted_median(positions: &[usize]) -> Option<f64> {
    let len = positions.len();
    let m = len / 2;
    let p = |i: usize| positions[i] as f64;
    match len {
        0 => None,
        _ if len % 2 == 1 => Some(p(m)),
        2 => Some((p(0) + p(1)) / 2.0),
        _ => {
            let left = p(m - 1) - p(0);
            let right = p(len - 1) - p(m);
            if left + right == 0.0 {
                Some((p(m - 1) + p(m)) / 2.0)
            } else {
                Some((p(m - 1) * right + p(m) * left) / (left + right))
            }
        }
    }
}

/// Step 2, second half: measures of the plain downstream vertices, returned sorted by measure.
/// A vertex without neighbours keeps the measure of the vertex before it.
fn measure(graph: &mut LayerGraph, direction: Direction, plain: Vec<VertexId>) -> Vec<VertexId> {
    let mut last = 0.0;
    for &v in &plain {
        let m = weighted_median(&uppers(graph, direction, v)).unwrap_or(last);
        graph.vertex_mut(v).measure = m;
        last = m;
    }
    let mut sorted = plain;
    sorted.sort_by(|a, b| graph.vertex(*a).measure.total_cmp(&graph.vertex(*b).measure));
    sorted
}

/// Step 3: merges measure-sorted vertices with position-sorted containers, splitting a container
/// whose occupied range strictly contains a vertex's measure.
fn merge(
    graph: &LayerGraph,
    containers: &mut Containers,
    vertices: Vec<VertexId>,
    mut queue: VecDeque<SeqId>,
) -> Result<Vec<Entry>> {
    let mut out: Vec<Entry> = Vec::with_capacity(vertices.len() + queue.len());
    let mut vertices = vertices.into_iter().peekable();

    while let (Some(&v), Some(&c)) = (vertices.peek(), queue.front()) {
        let m = graph.vertex(v).measure;
        let start = containers.pos(c);
        let end = start + containers.len(c)? - 1;
        if m <= start as f64 {
            out.push(Entry::Vertex(v));
            vertices.next();
        } else if m >= end as f64 {
            out.push(Entry::Container(c));
            queue.pop_front();
        } else {
            let k = (m - start as f64).ceil() as usize;
            let right = containers.split_at(c, k)?;
            out.push(Entry::Container(c));
            queue.pop_front();
            queue.push_front(right);
        }
    }
    out.extend(vertices.map(Entry::Vertex));
    out.extend(queue.into_iter().map(Entry::Container));
    Ok(out)
}

/// Step 4: every split vertex is cut out of the container holding its segment and placed between
/// the two fragments.
fn insert_split_vertices(
    graph: &LayerGraph,
    containers: &mut Containers,
    direction: Direction,
    merged: Vec<Entry>,
    splits: &[VertexId],
) -> Result<Vec<Placed>> {
    let mut groups: HashMap<SeqId, Vec<(usize, VertexId, SegmentId)>> = HashMap::default();
    for &v in splits {
        let Some(s) = direction.split_segment(graph.vertex(v).kind) else {
            continue;
        };
        let (seq, offset) = containers.locate(s)?;
        groups.entry(seq).or_default().push((offset, v, s));
    }

    let mut out: Vec<Placed> = Vec::with_capacity(merged.len() + 2 * splits.len());
    for entry in merged {
        match entry {
            Entry::Vertex(v) => out.push(Placed::vertex(v, uppers(graph, direction, v))),
            Entry::Container(c) => {
                let Some(mut group) = groups.remove(&c) else {
                    out.push(Placed::container(c));
                    continue;
                };
                group.sort_unstable_by_key(|&(offset, ..)| offset);
                let mut fragment = c;
                for (_, v, s) in group {
                    let (left, offset, right) = containers.split_around(s)?;
                    let upper = containers.pos(left) + offset;
                    out.push(Placed::container(left));
                    out.push(Placed::vertex(v, vec![upper]));
                    fragment = right;
                }
                out.push(Placed::container(fragment));
            }
        }
    }

    if let Some((_, _, s)) = groups.into_values().flatten().next() {
        return Err(Error::invariant(
            InvariantViolation::SegmentWithoutContainer { segment: s.0 },
        ));
    }
    Ok(out)
}

/// Step 5: swaps neighbouring vertices while that strictly lowers their crossings. Pairs touching
/// a container are left alone.
fn transpose_pass(placed: &mut [Placed]) -> usize {
    let mut swaps = 0usize;
    let mut improved = true;
    let mut passes = 0usize;
    while improved && passes < placed.len() {
        improved = false;
        passes += 1;
        for i in 1..placed.len() {
            let (a, b) = (&placed[i - 1], &placed[i]);
            if !(a.is_vertex() && b.is_vertex()) {
                continue;
            }
            if pair_crossings(&b.uppers, &a.uppers) < pair_crossings(&a.uppers, &b.uppers) {
                placed.swap(i - 1, i);
                improved = true;
                swaps += 1;
            }
        }
    }
    swaps
}

/// Step 6: joins neighbouring containers and puts an empty container between neighbouring
/// vertices and at both ends.
fn rescan(containers: &mut Containers, placed: Vec<Placed>) -> Result<Vec<Entry>> {
    let mut out: Vec<Entry> = Vec::with_capacity(placed.len() + 2);
    for p in placed {
        match (p.entry, out.last().copied()) {
            (Entry::Container(c), Some(Entry::Container(prev))) => {
                let joined = containers.join(prev, c)?;
                if let Some(last) = out.last_mut() {
                    *last = Entry::Container(joined);
                }
            }
            (Entry::Container(c), _) => out.push(Entry::Container(c)),
            (Entry::Vertex(v), Some(Entry::Container(_))) => out.push(Entry::Vertex(v)),
            (Entry::Vertex(v), _) => {
                out.push(Entry::Container(containers.create()));
                out.push(Entry::Vertex(v));
            }
        }
    }
    if !matches!(out.last(), Some(Entry::Container(_))) {
        out.push(Entry::Container(containers.create()));
    }

    if cfg!(debug_assertions) {
        for entry in &out {
            if let Entry::Container(c) = *entry {
                containers.validate(c)?;
            }
        }
    }
    Ok(out)
}

/// Containers sit at even indices, vertices at odd ones, and the sequence ends with a container.
fn check_alternation(layer: &[Entry], rank: usize) -> Result<()> {
    for (at, entry) in layer.iter().enumerate() {
        let expects_container = at % 2 == 0;
        if matches!(entry, Entry::Container(_)) != expects_container {
            return Err(Error::invariant(InvariantViolation::Alternation { rank, at }));
        }
    }
    if layer.len() % 2 == 0 {
        return Err(Error::invariant(InvariantViolation::Alternation {
            rank,
            at: layer.len(),
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_median_follows_the_denser_side() {
        assert_eq!(weighted_median(&[]), None);
        assert_eq!(weighted_median(&[4]), Some(4.0));
        assert_eq!(weighted_median(&[1, 5, 9]), Some(5.0));
        assert_eq!(weighted_median(&[2, 6]), Some(4.0));
        // left spread 1, right spread 6: pulled toward the tight left pair
        let m = weighted_median(&[0, 1, 4, 10]).unwrap();
        assert!((m - (1.0 * 6.0 + 4.0 * 1.0) / 7.0).abs() < 1e-9);
        assert_eq!(weighted_median(&[3, 3, 3, 3]), Some(3.0));
    }

    #[test]
    fn reorder_splits_a_container_around_an_inner_measure() {
        use crate::model::{Size, VertexKind};

        // rank 1: x, P0, P1, y; rank 2: w below x and y; the segments end at rank 3
        let mut graph = LayerGraph::new();
        let x = graph.add_vertex(VertexKind::Real(0), 1, Size::ZERO);
        let y = graph.add_vertex(VertexKind::Real(1), 1, Size::ZERO);
        let w = graph.add_vertex(VertexKind::Real(2), 2, Size::ZERO);
        let mut tops = Vec::new();
        let mut bottoms = Vec::new();
        for k in 0..2 {
            let s = SegmentId::from_index(k);
            let p = graph.add_vertex(VertexKind::SegmentTop(s), 1, Size::ZERO);
            let q = graph.add_vertex(VertexKind::SegmentBottom(s), 3, Size::ZERO);
            graph.add_segment(p, q, k);
            tops.push(p);
            bottoms.push(q);
        }
        graph.add_edge(x, w, 2);
        graph.add_edge(y, w, 3);
        graph.set_ranks(vec![vec![], vec![x, tops[0], tops[1], y], vec![w], bottoms]);

        let mut containers = Containers::new(2);
        let current: Vec<Entry> = graph.rank(1).iter().map(|&v| Entry::Vertex(v)).collect();
        let layer =
            reorder(&mut graph, &mut containers, current, 2, Direction::Down, false).unwrap();

        // x and y take positions 0 and 3, so w measures 1.5 inside the container at 1..=2
        assert_eq!(graph.vertex(w).measure, 1.5);
        assert_eq!(layer.len(), 3);
        assert_eq!(layer[1], Entry::Vertex(w));
        let segments = |e: &Entry| match *e {
            Entry::Container(c) => containers.segments(c).unwrap(),
            Entry::Vertex(_) => panic!("expected a container, got {e:?}"),
        };
        assert_eq!(segments(&layer[0]), vec![SegmentId(0)]);
        assert_eq!(segments(&layer[2]), vec![SegmentId(1)]);
        assert_eq!(graph.rank(2), &[w][..]);
    }

    #[test]
    fn alternation_rejects_adjacent_vertices() {
        let c = |i| Entry::Container(SeqId(i));
        let v = |i| Entry::Vertex(VertexId(i));
        assert!(check_alternation(&[c(0)], 0).is_ok());
        assert!(check_alternation(&[c(0), v(0), c(1)], 0).is_ok());
        assert!(matches!(
            check_alternation(&[c(0), v(0), v(1), c(1)], 3),
            Err(Error::Invariant(InvariantViolation::Alternation { rank: 3, at: 2 }))
        ));
        assert!(check_alternation(&[c(0), v(0)], 0).is_err());
    }
}
