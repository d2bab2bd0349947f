//! Restricted views over a built graph

use crate::graph::{GraphData, GraphNode};
use std::collections::HashSet;

impl GraphData {
    /// Ghost mode: suspicious nodes only, and links between two of them
    pub fn ghost_view(&self) -> GraphData {
        self.restricted(|node| node.is_suspicious)
    }

    /// Focus on one ring: its nodes and the links among them
    pub fn ring_view(&self, ring_id: &str) -> GraphData {
        self.restricted(|node| node.ring_id.as_deref() == Some(ring_id))
    }

    fn restricted<F>(&self, keep: F) -> GraphData
    where
        F: Fn(&GraphNode) -> bool,
    {
        let nodes: Vec<GraphNode> = self
            .nodes
            .iter()
            .filter(|node| keep(*node))
            .cloned()
            .collect();
        let ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();

        let links = self
            .links
            .iter()
            .filter(|link| {
                ids.contains(link.source.as_str()) && ids.contains(link.target.as_str())
            })
            .cloned()
            .collect();

        GraphData {
            nodes,
            links,
            ring_color_map: self.ring_color_map.clone(),
            pattern_stats: self.pattern_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::build_graph;
    use crate::graph::palette::default_palette;
    use crate::types::{AnalysisResult, SuspiciousAccount, TransactionEdge};

    fn sample() -> AnalysisResult {
        AnalysisResult {
            suspicious_accounts: vec![
                SuspiciousAccount::new("ACC_A", 90.0, Vec::new(), Some("RING_001".to_string())),
                SuspiciousAccount::new("ACC_B", 80.0, Vec::new(), Some("RING_001".to_string())),
                SuspiciousAccount::new("ACC_C", 70.0, Vec::new(), Some("RING_002".to_string())),
            ],
            all_nodes: vec!["ACC_N".to_string()],
            all_edges: vec![
                TransactionEdge::new("ACC_A", "ACC_B", 10.0),
                TransactionEdge::new("ACC_B", "ACC_C", 10.0),
                TransactionEdge::new("ACC_N", "ACC_A", 10.0),
            ],
            ..AnalysisResult::default()
        }
    }

    #[test]
    fn test_ghost_view_keeps_only_suspicious() {
        let graph = build_graph(&sample(), &default_palette());
        let ghost = graph.ghost_view();

        assert_eq!(ghost.nodes.len(), 3);
        assert!(ghost.nodes.iter().all(|n| n.is_suspicious));
        assert_eq!(ghost.links.len(), 2);
        assert!(ghost.links.iter().all(|l| l.source != "ACC_N"));
    }

    #[test]
    fn test_ring_view() {
        let graph = build_graph(&sample(), &default_palette());
        let ring = graph.ring_view("RING_001");

        let ids: Vec<_> = ring.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["ACC_A", "ACC_B"]);
        assert_eq!(ring.links.len(), 1);
        assert!(graph.ring_view("RING_404").nodes.is_empty());
    }
}
