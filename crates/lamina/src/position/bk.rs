//! Brandes & Köpf (BK) horizontal coordinate assignment.
//!
//! Works on the expanded layering: every vertex and every segment slot is one item. The links of
//! a segment run (P, its slots, Q) are always aligned into a single block so the whole run ends
//! up vertical.

use crate::config::{Alignment, LayoutConfig};
use crate::error::{Error, InvariantViolation, Result};
use crate::model::{LayerGraph, SegmentId};
use crate::order::Slot;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub slot: Slot,
    pub width: f64,
    pub dummy: bool,
}

/// Items of the expanded layering with their links between neighbouring ranks.
#[derive(Debug, Clone, Default)]
pub struct ItemGraph {
    items: Vec<Item>,
    layering: Vec<Vec<usize>>,
    preds: Vec<Vec<usize>>,
    succs: Vec<Vec<usize>>,
    /// Next item of the same segment run, above and below.
    chain_up: Vec<Option<usize>>,
    chain_down: Vec<Option<usize>>,
}

impl ItemGraph {
    pub fn build(graph: &LayerGraph, layering: &[Vec<Slot>]) -> Result<Self> {
        let mut ig = ItemGraph::default();
        let mut vertex_item: Vec<usize> = vec![usize::MAX; graph.vertices().len()];
        let mut segment_item: HashMap<(SegmentId, usize), usize> = HashMap::default();

        for (r, slots) in layering.iter().enumerate() {
            let mut layer: Vec<usize> = Vec::with_capacity(slots.len());
            let mut vertex_count = 0usize;
            for &slot in slots {
                let id = ig.items.len();
                let item = match slot {
                    Slot::Vertex(v) => {
                        vertex_item[v.index()] = id;
                        vertex_count += 1;
                        let lv = graph.vertex(v);
                        Item {
                            slot,
                            width: lv.size.width,
                            dummy: !lv.kind.is_real(),
                        }
                    }
                    Slot::Segment(s) => {
                        segment_item.insert((s, r), id);
                        Item {
                            slot,
                            width: 0.0,
                            dummy: true,
                        }
                    }
                };
                ig.items.push(item);
                layer.push(id);
            }
            let expected = graph.ranks().get(r).map_or(0, Vec::len);
            if vertex_count != expected {
                return Err(Error::invariant(InvariantViolation::LostVertices {
                    rank: r,
                    expected,
                    found: vertex_count,
                }));
            }
            ig.layering.push(layer);
        }

        let n = ig.items.len();
        ig.preds = vec![Vec::new(); n];
        ig.succs = vec![Vec::new(); n];
        ig.chain_up = vec![None; n];
        ig.chain_down = vec![None; n];

        for e in graph.edges() {
            ig.link(vertex_item[e.source.index()], vertex_item[e.target.index()]);
        }
        for s in graph.segment_ids() {
            let segment = graph.segment(s);
            let top_rank = graph.vertex(segment.top).rank;
            let bottom_rank = graph.vertex(segment.bottom).rank;
            let mut prev = vertex_item[segment.top.index()];
            for r in top_rank + 1..bottom_rank {
                let Some(&slot) = segment_item.get(&(s, r)) else {
                    return Err(Error::invariant(
                        InvariantViolation::SegmentWithoutContainer { segment: s.0 },
                    ));
                };
                ig.link_chain(prev, slot);
                prev = slot;
            }
            ig.link_chain(prev, vertex_item[segment.bottom.index()]);
        }
        Ok(ig)
    }

    fn link(&mut self, upper: usize, lower: usize) {
        self.succs[upper].push(lower);
        self.preds[lower].push(upper);
    }

    fn link_chain(&mut self, upper: usize, lower: usize) {
        self.link(upper, lower);
        self.chain_down[upper] = Some(lower);
        self.chain_up[lower] = Some(upper);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn layering(&self) -> &[Vec<usize>] {
        &self.layering
    }

    pub fn predecessors(&self, item: usize) -> &[usize] {
        &self.preds[item]
    }

    pub fn successors(&self, item: usize) -> &[usize] {
        &self.succs[item]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub type Conflicts = HashSet<(usize, usize)>;

pub fn add_conflict(conflicts: &mut Conflicts, v: usize, w: usize) {
    conflicts.insert((v.min(w), v.max(w)));
}

pub fn has_conflict(conflicts: &Conflicts, v: usize, w: usize) -> bool {
    conflicts.contains(&(v.min(w), v.max(w)))
}

/// Marks the non-inner links crossing an inner one. Inner links join two dummy items.
pub fn find_type1_conflicts(ig: &ItemGraph) -> Conflicts {
    let mut conflicts = Conflicts::default();
    let layering = ig.layering();
    let mut order: Vec<usize> = vec![0; ig.len()];
    for layer in layering {
        for (i, &v) in layer.iter().enumerate() {
            order[v] = i;
        }
    }

    for i in 1..layering.len() {
        let prev_layer_len = layering[i - 1].len();
        let layer = &layering[i];
        let mut k0 = 0usize;
        let mut scan_pos = 0usize;

        for (idx, &v) in layer.iter().enumerate() {
            let w = if ig.items[v].dummy {
                ig.preds[v].iter().copied().find(|&u| ig.items[u].dummy)
            } else {
                None
            };
            let k1 = w.map_or(prev_layer_len, |w| order[w]);

            if w.is_some() || idx + 1 == layer.len() {
                for &scan_node in &layer[scan_pos..=idx] {
                    for &u in &ig.preds[scan_node] {
                        let u_pos = order[u];
                        if (u_pos < k0 || k1 < u_pos)
                            && !(ig.items[u].dummy && ig.items[scan_node].dummy)
                        {
                            add_conflict(&mut conflicts, u, scan_node);
                        }
                    }
                }
                scan_pos = idx + 1;
                k0 = k1;
            }
        }
    }
    conflicts
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockAlignment {
    pub root: Vec<usize>,
    /// Next item of the block, cycling back to the root.
    pub align: Vec<usize>,
}

/// Aligns every item with a median neighbour of the previous layer of `layering`. An item
/// continuing a segment run always aligns with the run.
pub fn vertical_alignment(
    item_count: usize,
    layering: &[Vec<usize>],
    conflicts: &Conflicts,
    neighbors: &[Vec<usize>],
    chain: &[Option<usize>],
) -> BlockAlignment {
    let mut root: Vec<usize> = (0..item_count).collect();
    let mut align: Vec<usize> = (0..item_count).collect();
    let mut pos: Vec<usize> = vec![0; item_count];
    for layer in layering {
        for (order, &v) in layer.iter().enumerate() {
            pos[v] = order;
        }
    }

    for layer in layering {
        let mut prev_idx: isize = -1;
        for &v in layer {
            if let Some(w) = chain[v] {
                align[w] = v;
                align[v] = root[w];
                root[v] = root[w];
                prev_idx = pos[w] as isize;
                continue;
            }

            let mut ws = neighbors[v].clone();
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|&w| pos[w]);

            let mp = (ws.len() - 1) as f64 / 2.0;
            let i0 = mp.floor() as usize;
            let i1 = mp.ceil() as usize;
            for &w in ws.iter().take(i1 + 1).skip(i0) {
                let w_pos = pos[w] as isize;
                if align[v] == v && prev_idx < w_pos && !has_conflict(conflicts, v, w) {
                    align[w] = v;
                    align[v] = root[w];
                    root[v] = root[w];
                    prev_idx = w_pos;
                }
            }
        }
    }
    BlockAlignment { root, align }
}

/// Minimum distance between the centres of two neighbouring items.
pub fn sep(a: &Item, b: &Item, config: &LayoutConfig) -> f64 {
    let gap = |item: &Item| {
        if item.dummy {
            config.edge_spacing
        } else {
            config.horizontal_spacing
        }
    };
    a.width / 2.0 + gap(a) / 2.0 + gap(b) / 2.0 + b.width / 2.0
}

/// Places blocks as far left as the layering allows, then pulls each one right toward its
/// successors where there is room.
pub fn horizontal_compaction(
    ig: &ItemGraph,
    layering: &[Vec<usize>],
    root: &[usize],
    config: &LayoutConfig,
) -> Vec<f64> {
    let n = ig.len();
    let mut weights: HashMap<(usize, usize), f64> = HashMap::default();
    let mut nodes: Vec<usize> = Vec::new();
    let mut seen = vec![false; n];
    for layer in layering {
        let mut u: Option<usize> = None;
        for &v in layer {
            let v_root = root[v];
            if !seen[v_root] {
                seen[v_root] = true;
                nodes.push(v_root);
            }
            if let Some(u) = u {
                let s = sep(&ig.items[u], &ig.items[v], config);
                let w = weights.entry((root[u], v_root)).or_insert(0.0);
                *w = w.max(s);
            }
            u = Some(v);
        }
    }

    let mut block_preds: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    let mut block_succs: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    let mut edges: Vec<((usize, usize), f64)> = weights.into_iter().collect();
    edges.sort_by_key(|&(key, _)| key);
    for ((u, v), w) in edges {
        block_succs[u].push((v, w));
        block_preds[v].push((u, w));
    }

    let mut xs: Vec<f64> = vec![0.0; n];

    iterate(&nodes, &block_preds, n, |elem| {
        let best = block_preds[elem]
            .iter()
            .map(|&(u, w)| xs[u] + w)
            .fold(0.0, f64::max);
        xs[elem] = best;
    });

    iterate(&nodes, &block_succs, n, |elem| {
        let min = block_succs[elem]
            .iter()
            .map(|&(v, w)| xs[v] - w)
            .fold(f64::INFINITY, f64::min);
        if min.is_finite() {
            xs[elem] = xs[elem].max(min);
        }
    });

    (0..n).map(|v| xs[root[v]]).collect()
}

/// Calls `set` on every node after all of its `next` nodes.
fn iterate(nodes: &[usize], next: &[Vec<(usize, f64)>], n: usize, mut set: impl FnMut(usize)) {
    let mut stack: Vec<usize> = nodes.to_vec();
    let mut visited = vec![false; n];
    while let Some(elem) = stack.pop() {
        if visited[elem] {
            set(elem);
            continue;
        }
        visited[elem] = true;
        stack.push(elem);
        stack.extend(next[elem].iter().map(|&(w, _)| w));
    }
}

fn extent(ig: &ItemGraph, xs: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (item, &x) in ig.items.iter().zip(xs) {
        let half = item.width / 2.0;
        min = min.min(x - half);
        max = max.max(x + half);
    }
    (min, max)
}

/// Index of the narrowest of the four assignments; the first one wins ties.
pub fn find_smallest_width_alignment(ig: &ItemGraph, xss: &[Vec<f64>; 4]) -> usize {
    let mut best_width = f64::INFINITY;
    let mut best = 0;
    for (i, xs) in xss.iter().enumerate() {
        let (min, max) = extent(ig, xs);
        if max - min < best_width {
            best_width = max - min;
            best = i;
        }
    }
    best
}

/// Shifts left-biased assignments to the minimum of `xss[align_to]` and right-biased ones to its
/// maximum.
pub fn align_coordinates(xss: &mut [Vec<f64>; 4], align_to: usize) {
    let min_of = |xs: &[f64]| xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max_of = |xs: &[f64]| xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let to_min = min_of(&xss[align_to]);
    let to_max = max_of(&xss[align_to]);

    for (alignment, xs) in Alignment::ALL.iter().zip(xss.iter_mut()) {
        let delta = if alignment.is_right() {
            to_max - max_of(xs)
        } else {
            to_min - min_of(xs)
        };
        if delta != 0.0 && delta.is_finite() {
            for x in xs.iter_mut() {
                *x += delta;
            }
        }
    }
}

/// Mean of the two middle values of the four assignments, or the pinned one.
pub fn balance(xss: &[Vec<f64>; 4], align: Option<Alignment>) -> Vec<f64> {
    if let Some(pinned) = align {
        let i = Alignment::ALL.iter().position(|&a| a == pinned).unwrap_or(0);
        return xss[i].clone();
    }
    let n = xss[0].len();
    (0..n)
        .map(|v| {
            let mut vals = [xss[0][v], xss[1][v], xss[2][v], xss[3][v]];
            vals.sort_by(|a, b| a.total_cmp(b));
            (vals[1] + vals[2]) / 2.0
        })
        .collect()
}

/// Final x of every item of `ig`.
pub fn position_x(ig: &ItemGraph, config: &LayoutConfig) -> Vec<f64> {
    if ig.is_empty() {
        return Vec::new();
    }
    let conflicts = find_type1_conflicts(ig);

    let mut xss: [Vec<f64>; 4] = Default::default();
    for (i, alignment) in Alignment::ALL.into_iter().enumerate() {
        let mut adjusted: Vec<Vec<usize>> = if alignment.is_up() {
            ig.layering.clone()
        } else {
            ig.layering.iter().rev().cloned().collect()
        };
        if alignment.is_right() {
            for layer in &mut adjusted {
                layer.reverse();
            }
        }

        let (neighbors, chain) = if alignment.is_up() {
            (&ig.preds, &ig.chain_up)
        } else {
            (&ig.succs, &ig.chain_down)
        };
        let blocks = vertical_alignment(ig.len(), &adjusted, &conflicts, neighbors, chain);
        let mut xs = horizontal_compaction(ig, &adjusted, &blocks.root, config);
        if alignment.is_right() {
            for x in &mut xs {
                *x = -*x;
            }
        }
        xss[i] = xs;
    }

    let smallest = find_smallest_width_alignment(ig, &xss);
    align_coordinates(&mut xss, smallest);
    tracing::trace!(
        narrowest = ?Alignment::ALL[smallest],
        conflicts = conflicts.len(),
        "brandes-köpf passes done"
    );
    balance(&xss, config.align)
}
