//! Renderable graph built from an analysis result

pub mod builder;
pub mod classifier;
pub mod palette;
pub mod view;

pub use builder::{build_graph, GraphBuilder};
pub use classifier::PatternStats;
pub use palette::assign_ring_colors;

use crate::types::{LinkPattern, PatternCategory};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Graph construction settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Colours handed out to rings, reused cyclically
    pub ring_palette: Vec<String>,
    /// Size of accounts that are not suspicious
    pub base_node_size: f64,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            ring_palette: palette::default_palette(),
            base_node_size: 5.0,
        }
    }
}

/// One account in the graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "isSuspicious")]
    pub is_suspicious: bool,
    pub suspicion_score: f64,
    pub detected_patterns: Vec<String>,
    #[serde(rename = "ringId", skip_serializing_if = "Option::is_none")]
    pub ring_id: Option<String>,
    #[serde(rename = "patternCategory")]
    pub pattern_category: PatternCategory,
    #[serde(rename = "patternIcon")]
    pub pattern_icon: &'static str,
    pub color: String,
    pub size: f64,
    #[serde(rename = "borderWidth")]
    pub border_width: u8,
    pub glow: bool,
}

/// One directed transfer relationship in the graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub pattern: LinkPattern,
    pub color: String,
    #[serde(rename = "isSuspicious")]
    pub is_suspicious: bool,
    #[serde(rename = "sourceSuspicious")]
    pub source_suspicious: bool,
    #[serde(rename = "targetSuspicious")]
    pub target_suspicious: bool,
    pub width: u8,
    /// Transferred amount, for explicit edges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Originating ring, for synthesized edges
    #[serde(rename = "ringId", skip_serializing_if = "Option::is_none")]
    pub ring_id: Option<String>,
}

/// Nodes sorted by id plus deduplicated links
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    #[serde(rename = "ringColorMap")]
    pub ring_color_map: BTreeMap<String, String>,
    #[serde(rename = "patternStats")]
    pub pattern_stats: PatternStats,
}

impl GraphData {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes
            .binary_search_by(|node| node.id.as_str().cmp(id))
            .ok()
            .map(|index| &self.nodes[index])
    }

    pub fn suspicious_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_suspicious).count()
    }

    /// Links whose source or target is not a node. Renderers may skip these.
    pub fn dangling_links(&self) -> impl Iterator<Item = &GraphLink> {
        let ids: HashSet<&str> = self.nodes.iter().map(|node| node.id.as_str()).collect();
        self.links.iter().filter(move |link| {
            !ids.contains(link.source.as_str()) || !ids.contains(link.target.as_str())
        })
    }
}
