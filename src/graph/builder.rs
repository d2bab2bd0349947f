//! Graph construction.
//!
//! Nodes are the union of suspicious accounts, ring members and the explicit
//! node list, ordered by id. Links come from the explicit edge list when one
//! exists, otherwise they are synthesized from each ring's topology. Either
//! way, the first link for an ordered (source, target) pair wins.

use crate::graph::classifier::{classify_edge, classify_node, PatternStats};
use crate::graph::palette::assign_ring_colors;
use crate::graph::{GraphData, GraphLink, GraphNode, GraphSettings};
use crate::types::{AnalysisResult, FraudRing, RingPattern, SuspiciousAccount, TransactionEdge};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

const SUSPICIOUS_BASE_SIZE: f64 = 8.0;
const SCORE_PER_SIZE_UNIT: f64 = 25.0;
const GLOW_SCORE: f64 = 85.0;
const ID_PREFIX: &str = "ACC_";

/// Build a graph with the given ring palette and default sizing
pub fn build_graph(result: &AnalysisResult, ring_palette: &[String]) -> GraphData {
    GraphBuilder::new(GraphSettings {
        ring_palette: ring_palette.to_vec(),
        ..GraphSettings::default()
    })
    .build(result)
}

/// Converts an analysis result into renderable nodes and links
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    settings: GraphSettings,
}

impl GraphBuilder {
    pub fn new(settings: GraphSettings) -> Self {
        Self { settings }
    }

    pub fn build(&self, result: &AnalysisResult) -> GraphData {
        let suspicious = suspicious_lookup(&result.suspicious_accounts);

        let ring_color_map = assign_ring_colors(
            suspicious.values().filter_map(|acc| acc.ring_id.as_deref()),
            &self.settings.ring_palette,
        );

        let nodes = self.build_nodes(result, &suspicious, &ring_color_map);

        let links = if !result.all_edges.is_empty() {
            debug!(edges = result.all_edges.len(), "Building links from explicit edges");
            explicit_links(&result.all_edges, &suspicious)
        } else if !result.fraud_rings.is_empty() {
            debug!(rings = result.fraud_rings.len(), "Synthesizing links from fraud rings");
            result
                .fraud_rings
                .iter()
                .flat_map(|ring| ring_links(ring, &suspicious))
                .collect()
        } else {
            Vec::new()
        };
        let links = dedup_links(links);

        let graph = GraphData {
            nodes,
            links,
            ring_color_map,
            pattern_stats: PatternStats::from_accounts(&result.suspicious_accounts),
        };

        info!(
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            suspicious = graph.suspicious_count(),
            rings_colored = graph.ring_color_map.len(),
            "Graph built"
        );

        graph
    }

    fn build_nodes(
        &self,
        result: &AnalysisResult,
        suspicious: &HashMap<&str, &SuspiciousAccount>,
        ring_colors: &BTreeMap<String, String>,
    ) -> Vec<GraphNode> {
        let ids: BTreeSet<&str> = result
            .suspicious_accounts
            .iter()
            .map(|acc| acc.account_id.as_str())
            .chain(
                result
                    .fraud_rings
                    .iter()
                    .flat_map(|ring| ring.member_accounts.iter().map(String::as_str)),
            )
            .chain(result.all_nodes.iter().map(String::as_str))
            .collect();

        ids.into_iter()
            .map(|id| self.node(id, suspicious.get(id).copied(), ring_colors))
            .collect()
    }

    fn node(
        &self,
        id: &str,
        account: Option<&SuspiciousAccount>,
        ring_colors: &BTreeMap<String, String>,
    ) -> GraphNode {
        let category = classify_node(account);

        let color = account
            .and_then(|acc| acc.ring_id.as_ref())
            .and_then(|ring_id| ring_colors.get(ring_id))
            .cloned()
            .unwrap_or_else(|| category.color().to_string());

        let score = account.map_or(0.0, |acc| acc.suspicion_score);
        let size = match account {
            Some(_) => SUSPICIOUS_BASE_SIZE + score / SCORE_PER_SIZE_UNIT,
            None => self.settings.base_node_size,
        };

        GraphNode {
            id: id.to_string(),
            display_name: id.strip_prefix(ID_PREFIX).unwrap_or(id).to_string(),
            is_suspicious: account.is_some(),
            suspicion_score: score,
            detected_patterns: account.map(|acc| acc.detected_patterns.clone()).unwrap_or_default(),
            ring_id: account.and_then(|acc| acc.ring_id.clone()),
            pattern_category: category,
            pattern_icon: category.icon(),
            color,
            size,
            border_width: if account.is_some() { 2 } else { 1 },
            glow: account.is_some() && score > GLOW_SCORE,
        }
    }
}

/// Suspicious metadata by account id; the first record for an id wins
fn suspicious_lookup(accounts: &[SuspiciousAccount]) -> HashMap<&str, &SuspiciousAccount> {
    let mut lookup = HashMap::with_capacity(accounts.len());
    for account in accounts {
        lookup.entry(account.account_id.as_str()).or_insert(account);
    }
    lookup
}

fn explicit_links(
    edges: &[TransactionEdge],
    suspicious: &HashMap<&str, &SuspiciousAccount>,
) -> Vec<GraphLink> {
    edges
        .iter()
        .map(|edge| {
            let source = suspicious.get(edge.source.as_str()).copied();
            let target = suspicious.get(edge.target.as_str()).copied();
            let is_suspicious = source.is_some() || target.is_some();
            let pattern = classify_edge(source, target);

            GraphLink {
                source: edge.source.clone(),
                target: edge.target.clone(),
                pattern,
                color: pattern.color().to_string(),
                is_suspicious,
                source_suspicious: source.is_some(),
                target_suspicious: target.is_some(),
                width: if is_suspicious { 2 } else { 1 },
                amount: Some(edge.amount),
                ring_id: None,
            }
        })
        .collect()
}

/// Member index pairs implied by a ring's topology
fn ring_edge_indices(pattern: RingPattern, n: usize) -> Vec<(usize, usize)> {
    match pattern {
        RingPattern::Cycle => (0..n).map(|i| (i, (i + 1) % n)).collect(),
        RingPattern::FanIn if n >= 2 => (0..n - 1).map(|i| (i, n - 1)).collect(),
        RingPattern::FanOut if n >= 2 => (1..n).map(|i| (0, i)).collect(),
        RingPattern::FanIn | RingPattern::FanOut => Vec::new(),
        RingPattern::Shell | RingPattern::Unknown => {
            (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect()
        }
    }
}

fn ring_links(ring: &FraudRing, suspicious: &HashMap<&str, &SuspiciousAccount>) -> Vec<GraphLink> {
    let members = &ring.member_accounts;
    let pattern = ring.pattern.link_pattern();

    ring_edge_indices(ring.pattern, members.len())
        .into_iter()
        .map(|(from, to)| {
            let source = &members[from];
            let target = &members[to];

            GraphLink {
                source: source.clone(),
                target: target.clone(),
                pattern,
                color: pattern.color().to_string(),
                is_suspicious: true,
                source_suspicious: suspicious.contains_key(source.as_str()),
                target_suspicious: suspicious.contains_key(target.as_str()),
                width: 2,
                amount: None,
                ring_id: Some(ring.ring_id.clone()),
            }
        })
        .collect()
}

fn dedup_links(links: Vec<GraphLink>) -> Vec<GraphLink> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(links.len());
    links
        .into_iter()
        .filter(|link| seen.insert((link.source.clone(), link.target.clone())))
        .collect()
}
