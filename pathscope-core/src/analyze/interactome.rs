// Interactome builder: undirected gene graph over the top-priority genes.
//
// Edges are heuristic, not measured interactions: every selected gene is
// joined to the hub gene (weight 1.0), and genes sharing a mechanism other
// than the catch-all are joined pairwise (weight 0.5). A pair carries at
// most one edge and the hub edge wins.
#![allow(clippy::cast_precision_loss)]

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::{InteractomeSection, MAX_INTERACTOME_NODES};
use crate::error::AnalyzeError;
use crate::score::rank_by_priority;
use crate::types::{MechanismLabel, ScoredGene};

use super::traits::Analyzer;

/// Weight of an edge between the hub gene and another selected gene.
pub const HUB_EDGE_WEIGHT: f64 = 1.0;
/// Weight of an edge between two genes with the same mechanism.
pub const SAME_ROLE_EDGE_WEIGHT: f64 = 0.5;

// ── Graph data ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneNode {
    pub symbol: String,
    pub role: MechanismLabel,
    /// The gene's priority.
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Hub,
    SameRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub weight: f64,
    pub kind: EdgeKind,
}

/// Immutable gene graph with a symbol → `NodeIndex` mapping.
#[derive(Debug, Clone)]
pub struct Interactome {
    graph: UnGraph<GeneNode, EdgeData>,
    symbol_to_index: HashMap<String, NodeIndex>,
    hub: Option<String>,
}

impl Interactome {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The hub symbol, if it was part of the selection.
    pub fn hub(&self) -> Option<&str> {
        self.hub.as_deref()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbol_to_index.contains_key(symbol)
    }

    pub fn node(&self, symbol: &str) -> Option<&GeneNode> {
        self.symbol_to_index.get(symbol).map(|&idx| &self.graph[idx])
    }

    /// Nodes in selection order.
    pub fn nodes(&self) -> impl Iterator<Item = &GeneNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Edges in insertion order as `(source, target, data)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &EdgeData)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].symbol.as_str(),
                self.graph[edge.target()].symbol.as_str(),
                edge.weight(),
            )
        })
    }

    /// Weight of the edge joining two symbols, in either direction.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let a = *self.symbol_to_index.get(a)?;
        let b = *self.symbol_to_index.get(b)?;
        self.graph
            .find_edge(a, b)
            .and_then(|e| self.graph.edge_weight(e))
            .map(|data| data.weight)
    }

    pub fn degree(&self, symbol: &str) -> Option<usize> {
        self.symbol_to_index
            .get(symbol)
            .map(|&idx| self.graph.edges(idx).count())
    }

    /// `2E / (V (V - 1))`; zero for graphs with fewer than two nodes.
    pub fn density(&self) -> f64 {
        let v = self.node_count() as f64;
        if v < 2.0 {
            return 0.0;
        }
        2.0 * self.edge_count() as f64 / (v * (v - 1.0))
    }

    /// Structural metrics with the `top_k` highest-degree genes.
    pub fn metrics(&self, top_k: usize) -> InteractomeMetrics {
        let degrees: Vec<(&str, usize)> = self
            .graph
            .node_indices()
            .map(|idx| (self.graph[idx].symbol.as_str(), self.graph.edges(idx).count()))
            .collect();

        let mut by_degree = degrees.clone();
        // Stable: equal degrees keep selection order.
        by_degree.sort_by(|a, b| b.1.cmp(&a.1));
        let hub_genes = by_degree
            .into_iter()
            .take(top_k)
            .map(|(symbol, degree)| HubGene {
                symbol: symbol.to_string(),
                degree,
            })
            .collect();

        InteractomeMetrics {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            density: self.density(),
            degree: degrees
                .into_iter()
                .map(|(symbol, degree)| (symbol.to_string(), degree))
                .collect(),
            hub_genes,
        }
    }

    /// Serializable snapshot of nodes, edges and metrics.
    pub fn summary(&self, top_k: usize) -> InteractomeSummary {
        let metrics = self.metrics(top_k);
        let nodes = self
            .nodes()
            .map(|node| NodeSummary {
                symbol: node.symbol.clone(),
                role: node.role,
                score: node.score,
                degree: metrics.degree.get(&node.symbol).copied().unwrap_or(0),
            })
            .collect();
        let edges = self
            .edges()
            .map(|(source, target, data)| EdgeSummary {
                source: source.to_string(),
                target: target.to_string(),
                weight: data.weight,
                kind: data.kind,
            })
            .collect();
        InteractomeSummary {
            hub: self.hub.clone(),
            nodes,
            edges,
            metrics,
        }
    }
}

// ── Summary types ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubGene {
    pub symbol: String,
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractomeMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    /// Degree per symbol.
    pub degree: BTreeMap<String, usize>,
    /// Highest-degree genes; ties keep selection order.
    pub hub_genes: Vec<HubGene>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub symbol: String,
    pub role: MechanismLabel,
    pub score: f64,
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSummary {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractomeSummary {
    pub hub: Option<String>,
    pub nodes: Vec<NodeSummary>,
    pub edges: Vec<EdgeSummary>,
    pub metrics: InteractomeMetrics,
}

impl InteractomeSummary {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

// ── Builder ────────────────────────────────────────────────────────

/// Selects the top genes and wires the heuristic edges.
#[derive(Debug, Clone)]
pub struct InteractomeBuilder {
    pub top_n: usize,
    pub top_k: usize,
    pub hub: Option<String>,
    pub exclude_roles: Vec<MechanismLabel>,
}

impl Default for InteractomeBuilder {
    fn default() -> Self {
        Self::from_config(&InteractomeSection::default(), None)
    }
}

impl InteractomeBuilder {
    /// Builder from the `[interactome]` section. `default_hub` (usually the
    /// condition's hub gene) applies when the section names none.
    pub fn from_config(section: &InteractomeSection, default_hub: Option<&str>) -> Self {
        Self {
            top_n: section.top_n,
            top_k: section.top_k,
            hub: section
                .hub
                .clone()
                .or_else(|| default_hub.map(str::to_string)),
            exclude_roles: section.exclude_roles.clone(),
        }
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    #[must_use]
    pub fn with_hub(mut self, hub: impl Into<String>) -> Self {
        self.hub = Some(hub.into());
        self
    }

    #[must_use]
    pub fn excluding(mut self, role: MechanismLabel) -> Self {
        if !self.exclude_roles.contains(&role) {
            self.exclude_roles.push(role);
        }
        self
    }

    /// Build the graph from one snapshot of scored genes.
    ///
    /// Hub edges go in first and an existing edge is never replaced, so a
    /// pair joined to the hub keeps weight 1.0 and kind `Hub` even when both
    /// genes share a role. Hub–core pairs never carry weight 0.5.
    #[instrument(skip_all, name = "interactome")]
    pub fn build(&self, genes: &[ScoredGene]) -> crate::error::Result<Interactome> {
        if self.top_n == 0 || self.top_n > MAX_INTERACTOME_NODES {
            return Err(AnalyzeError::InvalidParameter(format!(
                "top_n must be in 1..={MAX_INTERACTOME_NODES}, got {}",
                self.top_n
            ))
            .into());
        }
        let start = Instant::now();

        let eligible = genes
            .iter()
            .filter(|g| !self.exclude_roles.contains(&g.role()));
        let selection: Vec<&ScoredGene> =
            rank_by_priority(eligible).into_iter().take(self.top_n).collect();

        let mut graph = UnGraph::<GeneNode, EdgeData>::new_undirected();
        let mut symbol_to_index: HashMap<String, NodeIndex> = HashMap::new();
        for gene in &selection {
            if symbol_to_index.contains_key(gene.symbol()) {
                continue;
            }
            let idx = graph.add_node(GeneNode {
                symbol: gene.symbol().to_string(),
                role: gene.role(),
                score: gene.priority,
            });
            symbol_to_index.insert(gene.symbol().to_string(), idx);
        }

        let hub_idx = self
            .hub
            .as_deref()
            .and_then(|hub| symbol_to_index.get(hub).copied());
        if let Some(hub_idx) = hub_idx {
            for idx in graph.node_indices().collect::<Vec<_>>() {
                if idx != hub_idx {
                    graph.add_edge(
                        hub_idx,
                        idx,
                        EdgeData {
                            weight: HUB_EDGE_WEIGHT,
                            kind: EdgeKind::Hub,
                        },
                    );
                }
            }
        }

        let indices: Vec<NodeIndex> = graph.node_indices().collect();
        for (i, &a) in indices.iter().enumerate() {
            let role = graph[a].role;
            if role == MechanismLabel::PathwayComponent {
                continue;
            }
            for &b in &indices[i + 1..] {
                if graph[b].role == role && graph.find_edge(a, b).is_none() {
                    graph.add_edge(
                        a,
                        b,
                        EdgeData {
                            weight: SAME_ROLE_EDGE_WEIGHT,
                            kind: EdgeKind::SameRole,
                        },
                    );
                }
            }
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            hub = hub_idx.is_some(),
            duration = ?start.elapsed(),
            "Built interactome"
        );

        Ok(Interactome {
            hub: hub_idx.map(|idx| graph[idx].symbol.clone()),
            graph,
            symbol_to_index,
        })
    }
}

impl Analyzer for InteractomeBuilder {
    type Output = Interactome;

    fn name(&self) -> &'static str {
        "interactome"
    }

    fn analyze(&self, genes: &[ScoredGene]) -> crate::error::Result<Interactome> {
        self.build(genes)
    }
}
