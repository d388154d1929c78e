//! Hierarchical (layered) graph layout.
//!
//! The pipeline breaks cycles, assigns ranks, replaces long edges by synthetic chains or compact
//! segments, minimizes crossings with segment containers, assigns Brandes-Köpf coordinates and
//! finally folds synthetic vertices back into per-edge bend points.
//!
//! ```no_run
//! use lamina::graphlib::DiGraph;
//! use lamina::{LayoutConfig, Size};
//!
//! let mut g: DiGraph<(), ()> = DiGraph::default();
//! g.set_path(&["a", "b", "c"]);
//! let result = lamina::layout(&g, &|_: &String| Size::new(40.0, 20.0), &LayoutConfig::default())?;
//! assert_eq!(result.ranks["c"], 2);
//! # Ok::<(), lamina::Error>(())
//! ```

#![forbid(unsafe_code)]

pub use lamina_graph as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod data {
    pub mod splay;
}

pub mod acyclic;
pub mod articulate;
pub mod config;
pub mod error;
pub mod greedy_fas;
pub mod input;
pub mod model;
pub mod normalize;
pub mod order;
pub mod pipeline;
pub mod position;
pub mod rank;
pub mod task;

pub use articulate::LayoutResult;
pub use config::{Alignment, LayoutConfig, Ranker};
pub use error::{Error, InvariantViolation, Result};
pub use input::{LayoutInput, VertexSizes};
pub use model::{Point, Size};
pub use pipeline::{layout, layout_input};
pub use task::{CancelToken, LayoutEvent, LayoutStore, LayoutTask};
