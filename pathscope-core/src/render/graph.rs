// Interactome output formats. Layout is left to the consumer; these only
// serialize nodes, edges and metrics.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analyze::InteractomeSummary;
use crate::analyze::interactome::EdgeKind;
use crate::error::ExportError;
use crate::pipeline::PathwayReport;

use super::traits::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    #[default]
    Text,
    Json,
    Dot,
    Mermaid,
}

impl FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "dot" | "graphviz" => Ok(Self::Dot),
            "mermaid" | "mmd" => Ok(Self::Mermaid),
            other => Err(format!(
                "Unknown graph format: {other}. Use: text, json, dot, mermaid"
            )),
        }
    }
}

/// Render an interactome in the requested format.
pub fn render_graph(graph: &InteractomeSummary, format: GraphFormat) -> crate::error::Result<String> {
    match format {
        GraphFormat::Text => Ok(to_text(graph)),
        GraphFormat::Json => {
            let mut json = serde_json::to_string_pretty(graph).map_err(ExportError::from)?;
            json.push('\n');
            Ok(json)
        }
        GraphFormat::Dot => Ok(to_dot(graph)),
        GraphFormat::Mermaid => Ok(to_mermaid(graph)),
    }
}

fn kind_name(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Hub => "hub",
        EdgeKind::SameRole => "same-role",
    }
}

fn to_text(graph: &InteractomeSummary) -> String {
    let mut out = String::new();
    let m = &graph.metrics;
    let _ = writeln!(
        out,
        "Interactome: {} nodes, {} edges, density {:.3}",
        m.node_count, m.edge_count, m.density
    );
    let _ = writeln!(out, "Hub: {}", graph.hub.as_deref().unwrap_or("none"));

    if !m.hub_genes.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Top genes by degree:");
        for hub in &m.hub_genes {
            let _ = writeln!(out, "  {:<12} {:>3}", hub.symbol, hub.degree);
        }
    }

    if !graph.edges.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Edges:");
        for edge in &graph.edges {
            let pair = format!("{} -- {}", edge.source, edge.target);
            let _ = writeln!(
                out,
                "  {pair:<24} {:.1}  {}",
                edge.weight,
                kind_name(edge.kind)
            );
        }
    }
    out
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn to_dot(graph: &InteractomeSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "graph interactome {{");
    let _ = writeln!(out, "  node [shape=ellipse];");
    for node in &graph.nodes {
        let symbol = dot_escape(&node.symbol);
        let _ = writeln!(
            out,
            "  \"{symbol}\" [label=\"{symbol}\\n{}\", role=\"{}\", score={:.2}];",
            node.role.display_name(),
            node.role,
            node.score
        );
    }
    for edge in &graph.edges {
        let style = match edge.kind {
            EdgeKind::Hub => "solid",
            EdgeKind::SameRole => "dashed",
        };
        let _ = writeln!(
            out,
            "  \"{}\" -- \"{}\" [weight={:.1}, style={style}];",
            dot_escape(&edge.source),
            dot_escape(&edge.target),
            edge.weight
        );
    }
    let _ = writeln!(out, "}}");
    out
}

fn to_mermaid(graph: &InteractomeSummary) -> String {
    let ids: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.symbol.as_str(), i))
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "graph LR");
    for (i, node) in graph.nodes.iter().enumerate() {
        let label = node.symbol.replace('"', "'");
        let _ = writeln!(out, "  N{i}[\"{label}<br/>{}\"]", node.role.display_name());
    }
    for edge in &graph.edges {
        let (Some(a), Some(b)) = (ids.get(edge.source.as_str()), ids.get(edge.target.as_str()))
        else {
            continue;
        };
        let link = match edge.kind {
            EdgeKind::Hub => "---",
            EdgeKind::SameRole => "-.-",
        };
        let _ = writeln!(out, "  N{a} {link}|{:.1}| N{b}", edge.weight);
    }
    out
}

/// Interactome file in one format.
#[derive(Debug, Clone)]
pub struct GraphRenderer {
    pub format: GraphFormat,
}

impl Renderer for GraphRenderer {
    fn name(&self) -> &'static str {
        "interactome"
    }

    fn file_name(&self) -> &'static str {
        match self.format {
            GraphFormat::Text => "interactome.txt",
            GraphFormat::Json => "interactome.json",
            GraphFormat::Dot => "interactome.dot",
            GraphFormat::Mermaid => "interactome.mmd",
        }
    }

    fn render(&self, report: &PathwayReport) -> crate::error::Result<String> {
        render_graph(&report.interactome, self.format)
    }
}
