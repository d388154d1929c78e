//! Cheap x-coordinates: every rank is packed left to right and centred on the widest rank.

use crate::config::LayoutConfig;
use crate::model::{LayerGraph, VertexId};

fn gap(graph: &LayerGraph, v: VertexId, config: &LayoutConfig) -> f64 {
    if graph.is_dummy(v) {
        config.edge_spacing
    } else {
        config.horizontal_spacing
    }
}

pub fn position_x(graph: &mut LayerGraph, config: &LayoutConfig) {
    let mut widths: Vec<f64> = Vec::with_capacity(graph.rank_count());
    for r in 0..graph.rank_count() {
        let order = graph.rank(r).to_vec();
        let mut cursor = 0.0;
        let mut prev: Option<VertexId> = None;
        for v in order {
            if let Some(u) = prev {
                cursor += gap(graph, u, config) / 2.0 + gap(graph, v, config) / 2.0;
            }
            let half = graph.vertex(v).size.width / 2.0;
            graph.vertex_mut(v).point.x = cursor + half;
            cursor += 2.0 * half;
            prev = Some(v);
        }
        widths.push(cursor);
    }

    let widest = widths.iter().copied().fold(0.0, f64::max);
    for (r, width) in widths.into_iter().enumerate() {
        let offset = (widest - width) / 2.0;
        if offset == 0.0 {
            continue;
        }
        for v in graph.rank(r).to_vec() {
            graph.vertex_mut(v).point.x += offset;
        }
    }
}
