//! The layout pipeline from snapshot to articulated edges.

use crate::acyclic;
use crate::articulate::{LayoutResult, articulate};
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::graphlib::DirectedGraph;
use crate::input::{LayoutInput, VertexSizes};
use crate::normalize;
use crate::order;
use crate::position;
use crate::rank;
use crate::task::CancelToken;
use std::hash::Hash;

/// Lays out `graph` on the calling thread.
pub fn layout<G, S>(
    graph: &G,
    sizes: &S,
    config: &LayoutConfig,
) -> Result<LayoutResult<G::Vertex, G::Edge>>
where
    G: DirectedGraph,
    G::Vertex: Clone + Eq + Hash,
    G::Edge: Clone + Eq + Hash,
    S: VertexSizes<G::Vertex> + ?Sized,
{
    let input = LayoutInput::snapshot(graph, sizes);
    layout_input(&input, config, &CancelToken::new())
}

/// Lays out a snapshot, checking `cancel` between stages.
pub fn layout_input<V, E>(
    input: &LayoutInput<V, E>,
    config: &LayoutConfig,
    cancel: &CancelToken,
) -> Result<LayoutResult<V, E>>
where
    V: Clone + Eq + Hash,
    E: Clone + Eq + Hash,
{
    config.validate()?;
    if input.is_empty() {
        return Ok(LayoutResult::default());
    }
    let _span = tracing::debug_span!(
        "layout",
        vertices = input.vertex_count(),
        edges = input.edge_count()
    )
    .entered();

    cancel.check()?;
    let orientation = {
        let _stage = tracing::debug_span!("acyclic").entered();
        acyclic::run(input.vertex_count(), input.endpoint_list())
    };

    cancel.check()?;
    let ranks = {
        let _stage = tracing::debug_span!("rank").entered();
        let edges: Vec<(usize, usize)> = orientation.layered_edges().map(|(_, e)| e).collect();
        let ranks = rank::rank(input.vertex_count(), &edges, config.ranker);
        rank::check(&ranks, &edges)?;
        ranks
    };

    cancel.check()?;
    let mut normalized = {
        let _stage = tracing::debug_span!("normalize").entered();
        let compact = config.compacts(input.vertex_count(), input.edge_count());
        normalize::run(input, &orientation, &ranks, compact)?
    };

    cancel.check()?;
    let ordering = {
        let _stage = tracing::debug_span!("order").entered();
        order::order(&mut normalized.graph, config, cancel)?
    };

    cancel.check()?;
    let size = {
        let _stage = tracing::debug_span!("position").entered();
        position::position(&mut normalized.graph, &ordering.layering, config)?
    };

    cancel.check()?;
    let _stage = tracing::debug_span!("articulate").entered();
    Ok(articulate(
        input,
        &orientation,
        &normalized,
        size,
        ordering.stats.crossings,
        config.post_straighten,
    ))
}
