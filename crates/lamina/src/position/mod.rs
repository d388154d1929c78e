//! Coordinate assignment.
//!
//! Ranks are stacked top-down, each row as tall as its tallest vertex. x comes from Brandes-Köpf
//! when straightening edges, from per-rank centring otherwise. The drawing is finally translated
//! so its bounding box starts at the origin.

pub mod bk;
pub mod center;

use crate::config::LayoutConfig;
use crate::error::{Error, InvariantViolation, Result};
use crate::model::{LayerGraph, SegmentId, Size};
use crate::order::Slot;

/// Writes `point` of every vertex of `graph` and returns the size of the drawing.
pub fn position(
    graph: &mut LayerGraph,
    layering: &[Vec<Slot>],
    config: &LayoutConfig,
) -> Result<Size> {
    if graph.vertices().is_empty() {
        return Ok(Size::ZERO);
    }

    position_y(graph, config.vertical_spacing);
    if config.straighten_edges {
        let items = bk::ItemGraph::build(graph, layering)?;
        let xs = bk::position_x(&items, config);
        for (item, x) in items.items().iter().zip(xs) {
            if let Slot::Vertex(v) = item.slot {
                graph.vertex_mut(v).point.x = x;
            }
        }
        for s in graph.segment_ids().collect::<Vec<_>>() {
            check_segment(graph, s)?;
        }
    } else {
        center::position_x(graph, config);
    }

    let size = translate(graph);
    tracing::debug!(
        width = size.width,
        height = size.height,
        straighten = config.straighten_edges,
        "coordinates assigned"
    );
    Ok(size)
}

pub fn position_y(graph: &mut LayerGraph, vertical_spacing: f64) {
    let mut prev_y = 0.0;
    for r in 0..graph.rank_count() {
        let row = graph.rank(r).to_vec();
        let max_h = row
            .iter()
            .map(|&v| graph.vertex(v).size.height)
            .fold(0.0, f64::max);
        for v in row {
            graph.vertex_mut(v).point.y = prev_y + max_h / 2.0;
        }
        prev_y += max_h + vertical_spacing;
    }
}

/// Both endpoints of a segment share one x.
pub fn check_segment(graph: &LayerGraph, segment: SegmentId) -> Result<()> {
    let s = graph.segment(segment);
    let top = graph.vertex(s.top).point.x;
    let bottom = graph.vertex(s.bottom).point.x;
    if top != bottom {
        return Err(Error::invariant(InvariantViolation::SegmentMisaligned {
            segment: segment.0,
            top,
            bottom,
        }));
    }
    Ok(())
}

/// Moves the drawing so its bounding box starts at (0, 0) and returns the box size. Real vertices
/// count with their boxes, synthetic ones as points.
fn translate(graph: &mut LayerGraph) -> Size {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for v in graph.vertices() {
        let (hw, hh) = if v.kind.is_real() {
            (v.size.width / 2.0, v.size.height / 2.0)
        } else {
            (0.0, 0.0)
        };
        min_x = min_x.min(v.point.x - hw);
        max_x = max_x.max(v.point.x + hw);
        min_y = min_y.min(v.point.y - hh);
        max_y = max_y.max(v.point.y + hh);
    }

    let ids: Vec<_> = graph.vertex_ids().collect();
    for v in ids {
        let p = &mut graph.vertex_mut(v).point;
        p.x -= min_x;
        p.y -= min_y;
    }
    Size::new(max_x - min_x, max_y - min_y)
}
