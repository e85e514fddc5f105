// Markdown brief: one page summarizing a run for sharing.

use std::fmt::Write as _;

use tracing::{info, instrument};

use crate::pipeline::PathwayReport;

use super::text::LIT_SCORE_NOTE;
use super::traits::Renderer;

/// Rows shown in the brief's gene table.
const TOP_GENES: usize = 10;

#[derive(Debug, Clone)]
pub struct MarkdownBrief {
    pub decorate_roles: bool,
}

impl Renderer for MarkdownBrief {
    fn name(&self) -> &'static str {
        "brief"
    }

    fn file_name(&self) -> &'static str {
        "report.md"
    }

    #[instrument(skip_all, name = "brief_render")]
    fn render(&self, report: &PathwayReport) -> crate::error::Result<String> {
        let mut md = String::new();
        render_header(&mut md, report);
        render_top_genes(&mut md, report, self.decorate_roles);
        render_hubs(&mut md, report);
        render_enrichment(&mut md, report);
        info!(bytes = md.len(), "Brief rendered");
        Ok(md)
    }
}

fn render_header(md: &mut String, report: &PathwayReport) {
    let title = report.pathway_name.as_deref().unwrap_or(&report.pathway_id);
    let _ = writeln!(md, "# {}: {title} ({})", report.condition, report.pathway_id);
    let _ = writeln!(md);
    let _ = writeln!(
        md,
        "Generated {}. {} genes, {} skipped lines.",
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.genes.len(),
        report.skipped_lines
    );
}

fn render_top_genes(md: &mut String, report: &PathwayReport, decorate_roles: bool) {
    let _ = writeln!(md);
    let _ = writeln!(md, "## Top genes");
    let _ = writeln!(md);
    let _ = writeln!(md, "| # | Symbol | Role | Lit | Priority |");
    let _ = writeln!(md, "|---|--------|------|-----|----------|");
    for (i, gene) in report.genes.ranked().into_iter().take(TOP_GENES).enumerate() {
        let role = if decorate_roles {
            gene.role().decorated()
        } else {
            gene.role().display_name().to_string()
        };
        let _ = writeln!(
            md,
            "| {} | {} | {role} | {:.1} | {:.2} |",
            i + 1,
            gene.symbol(),
            gene.lit_score,
            gene.priority
        );
    }
    let _ = writeln!(md);
    let _ = writeln!(md, "_{LIT_SCORE_NOTE}_");
}

fn render_hubs(md: &mut String, report: &PathwayReport) {
    let graph = &report.interactome;
    let _ = writeln!(md);
    let _ = writeln!(md, "## Interactome");
    let _ = writeln!(md);
    let _ = writeln!(
        md,
        "{} nodes, {} edges, hub {}.",
        graph.node_count(),
        graph.edge_count(),
        graph.hub.as_deref().unwrap_or("none")
    );
    if !graph.metrics.hub_genes.is_empty() {
        let _ = writeln!(md);
        for hub in &graph.metrics.hub_genes {
            let _ = writeln!(md, "- {} (degree {})", hub.symbol, hub.degree);
        }
    }
}

fn render_enrichment(md: &mut String, report: &PathwayReport) {
    let enrichment = &report.enrichment;
    let _ = writeln!(md);
    let _ = writeln!(md, "## Enrichment");
    let _ = writeln!(md);
    if !enrichment.rows.is_empty() {
        let _ = writeln!(md, "| Mechanism | k | M | raw p | adj. p | fold |");
        let _ = writeln!(md, "|-----------|---|---|-------|--------|------|");
        for row in &enrichment.rows {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {:.2e} | {:.2e} | {:.2} |",
                row.mechanism.display_name(),
                row.overlap_count,
                row.background_count,
                row.raw_p,
                row.adj_p,
                row.fold_enrichment
            );
        }
        let _ = writeln!(md);
    }
    let _ = writeln!(md, "{}", enrichment.summary);
}
