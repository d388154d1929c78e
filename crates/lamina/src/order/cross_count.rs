use super::Slot;
use crate::error::{Error, InvariantViolation, Result};
use crate::model::{LayerGraph, VertexKind};

/// Total number of crossings of an expanded layering, where every segment occupies one slot in
/// each rank strictly between its endpoints.
pub fn cross_count(graph: &LayerGraph, layering: &[Vec<Slot>]) -> Result<usize> {
    let mut vertex_slot: Vec<usize> = vec![usize::MAX; graph.vertices().len()];
    let mut segment_slot: Vec<usize> = vec![usize::MAX; graph.segments().len()];

    let mut cc = 0usize;
    for r in 1..layering.len() {
        let (north, south) = (&layering[r - 1], &layering[r]);
        for (i, slot) in south.iter().enumerate() {
            match *slot {
                Slot::Vertex(v) => vertex_slot[v.index()] = i,
                Slot::Segment(s) => segment_slot[s.index()] = i,
            }
        }

        let mut links: Vec<Vec<usize>> = Vec::with_capacity(north.len());
        for slot in north {
            let mut targets: Vec<usize> = Vec::new();
            let through = match *slot {
                Slot::Vertex(v) => match graph.vertex(v).kind {
                    VertexKind::SegmentTop(s) => Some(s),
                    _ => {
                        targets.extend(graph.successors(v).map(|w| vertex_slot[w.index()]));
                        None
                    }
                },
                Slot::Segment(s) => Some(s),
            };
            if let Some(s) = through {
                let bottom = graph.segment(s).bottom;
                let at = if graph.vertex(bottom).rank == r {
                    vertex_slot[bottom.index()]
                } else {
                    segment_slot[s.index()]
                };
                if at == usize::MAX || at >= south.len() {
                    return Err(Error::invariant(
                        InvariantViolation::SegmentWithoutContainer { segment: s.0 },
                    ));
                }
                targets.push(at);
            }
            targets.sort_unstable();
            links.push(targets);
        }
        cc += two_layer_cross_count(&links, south.len());
    }
    Ok(cc)
}

/// Crossings between two layers given, for each north entry in order, the sorted south positions
/// it links to.
pub fn two_layer_cross_count(links: &[Vec<usize>], south_len: usize) -> usize {
    if south_len == 0 {
        return 0;
    }

    let mut first_index: usize = 1;
    while first_index < south_len {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<usize> = vec![0; tree_size];

    let mut cc = 0usize;
    for &pos in links.iter().flatten() {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum = 0usize;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }
    cc
}

/// Crossings between the edges of two neighbouring entries when `left` is placed before `right`:
/// the pairs `(a, b)` with `a > b`. Both slices must be sorted.
pub fn pair_crossings(left: &[usize], right: &[usize]) -> usize {
    let mut cc = 0usize;
    let mut j = 0usize;
    for &a in left {
        while j < right.len() && right[j] < a {
            j += 1;
        }
        cc += j;
    }
    cc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_crossings_counts_inversions_between_neighbours() {
        assert_eq!(pair_crossings(&[0, 1], &[2, 3]), 0);
        assert_eq!(pair_crossings(&[2, 3], &[0, 1]), 4);
        assert_eq!(pair_crossings(&[1, 3], &[1, 2]), 2);
        assert_eq!(pair_crossings(&[], &[0]), 0);
    }

    #[test]
    fn two_layer_count_matches_brute_force() {
        let links = vec![vec![2], vec![0, 3], vec![1], vec![0]];
        let mut brute = 0;
        let flat: Vec<(usize, usize)> = links
            .iter()
            .enumerate()
            .flat_map(|(i, ts)| ts.iter().map(move |&t| (i, t)))
            .collect();
        for (i, &(n1, s1)) in flat.iter().enumerate() {
            for &(n2, s2) in &flat[i + 1..] {
                if (n1 < n2 && s1 > s2) || (n1 > n2 && s1 < s2) {
                    brute += 1;
                }
            }
        }
        assert_eq!(two_layer_cross_count(&links, 4), brute);
    }
}
