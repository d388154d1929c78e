//! Break cycles by logically reversing a feedback arc set.
//!
//! The input edges are never rewritten; an [`Orientation`] records which edges run backwards for
//! layering so that the articulator can restore their direction afterwards.

use crate::greedy_fas::greedy_fas;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Orientation {
    reversed: Vec<bool>,
    oriented: Vec<(usize, usize)>,
}

pub fn run(vertex_count: usize, endpoints: &[(usize, usize)]) -> Orientation {
    let mut reversed = vec![false; endpoints.len()];
    for e in greedy_fas(vertex_count, endpoints) {
        reversed[e] = true;
    }
    let oriented = endpoints
        .iter()
        .zip(&reversed)
        .map(|(&(v, w), &rev)| if rev { (w, v) } else { (v, w) })
        .collect();
    let orientation = Orientation { reversed, oriented };
    tracing::debug!(
        feedback = orientation.feedback_count(),
        "cycle breaking done"
    );
    orientation
}

impl Orientation {
    pub fn is_reversed(&self, e: usize) -> bool {
        self.reversed[e]
    }

    /// Endpoints of edge `e` as used for layering.
    pub fn oriented(&self, e: usize) -> (usize, usize) {
        self.oriented[e]
    }

    pub fn feedback_count(&self) -> usize {
        self.reversed.iter().filter(|&&r| r).count()
    }

    pub fn feedback(&self) -> Vec<usize> {
        (0..self.reversed.len())
            .filter(|&e| self.reversed[e])
            .collect()
    }

    /// Layering edges as `(input edge, (tail, head))`, self-loops excluded.
    pub fn layered_edges(&self) -> impl Iterator<Item = (usize, (usize, usize))> + '_ {
        self.oriented
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, (v, w))| v != w)
    }
}
