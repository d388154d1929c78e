//! Layout configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Layer assignment policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ranker {
    #[default]
    LongestPath,
    NetworkSimplex,
}

/// One of the four Brandes-Köpf passes, used to pin the final x-coordinates instead of balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Alignment {
    pub const ALL: [Alignment; 4] = [
        Alignment::UpLeft,
        Alignment::UpRight,
        Alignment::DownLeft,
        Alignment::DownRight,
    ];

    pub(crate) fn is_up(self) -> bool {
        matches!(self, Alignment::UpLeft | Alignment::UpRight)
    }

    pub(crate) fn is_right(self) -> bool {
        matches!(self, Alignment::UpRight | Alignment::DownRight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub ranker: Ranker,
    /// Upper bound on full (down + up) crossing-minimization sweeps.
    pub max_sweeps: usize,
    pub transpose: bool,
    pub horizontal_spacing: f64,
    pub edge_spacing: f64,
    pub vertical_spacing: f64,
    /// Brandes-Köpf coordinates when set, per-rank centering otherwise.
    pub straighten_edges: bool,
    /// Drop bend points lying on the straight line through their neighbours.
    pub post_straighten: bool,
    /// Graphs with at least this many vertices plus edges route long edges through segments;
    /// smaller graphs get one synthetic vertex per intermediate rank.
    pub compaction_threshold: usize,
    pub align: Option<Alignment>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ranker: Ranker::LongestPath,
            max_sweeps: 8,
            transpose: true,
            horizontal_spacing: 50.0,
            edge_spacing: 20.0,
            vertical_spacing: 50.0,
            straighten_edges: true,
            post_straighten: true,
            compaction_threshold: 0,
            align: None,
        }
    }
}

impl LayoutConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("horizontalSpacing", self.horizontal_spacing),
            ("edgeSpacing", self.edge_spacing),
            ("verticalSpacing", self.vertical_spacing),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig {
                    field,
                    reason: format!("expected a finite, non-negative spacing, got {value}"),
                });
            }
        }
        if self.max_sweeps == 0 {
            return Err(Error::InvalidConfig {
                field: "maxSweeps",
                reason: "at least one sweep is required".to_string(),
            });
        }
        Ok(())
    }

    /// Whether long edges become segments for a graph of this size.
    pub fn compacts(&self, vertex_count: usize, edge_count: usize) -> bool {
        vertex_count + edge_count >= self.compaction_threshold
    }
}
