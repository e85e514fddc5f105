// Fixed-width terminal tables for the CLI.

use std::fmt::Write as _;

use crate::analyze::EnrichmentReport;
use crate::analyze::enrichment::neg_log10;
use crate::types::ScoredGene;

/// Shown under every gene table.
pub const LIT_SCORE_NOTE: &str =
    "lit_score is a deterministic proxy derived from the gene symbol, not a literature lookup.";

/// Ranked gene table. Rows are numbered in the order given.
pub fn gene_table<'a>(genes: impl IntoIterator<Item = &'a ScoredGene>, decorate_roles: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<10} {:<28} {:>5} {:>8}  Description",
        "#", "Symbol", "Role", "Lit", "Priority"
    );
    let _ = writeln!(out, "{:-<80}", "");
    for (i, gene) in genes.into_iter().enumerate() {
        let role = if decorate_roles {
            gene.role().decorated()
        } else {
            gene.role().display_name().to_string()
        };
        let _ = writeln!(
            out,
            "{:<4} {:<10} {:<28} {:>5.1} {:>8.2}  {}",
            i + 1,
            gene.symbol(),
            role,
            gene.lit_score,
            gene.priority,
            truncate(gene.description(), 48)
        );
    }
    out
}

/// Enrichment rows followed by the summary line.
pub fn enrichment_table(report: &EnrichmentReport, p_floor: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Population {} genes, top {} sampled, {} mechanisms tested",
        report.population, report.sample_size, report.tested
    );
    if !report.rows.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<26} {:>4} {:>4} {:>10} {:>10} {:>6} {:>8}",
            "Mechanism", "k", "M", "raw p", "adj. p", "fold", "-log10"
        );
        let _ = writeln!(out, "{:-<74}", "");
        for row in &report.rows {
            let _ = writeln!(
                out,
                "{:<26} {:>4} {:>4} {:>10.3e} {:>10.3e} {:>6.2} {:>8.2}",
                row.mechanism.display_name(),
                row.overlap_count,
                row.background_count,
                row.raw_p,
                row.adj_p,
                row.fold_enrichment,
                neg_log10(row.adj_p, p_floor)
            );
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.summary);
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;

    #[test]
    fn gene_table_rows_in_given_order() {
        let report = fixtures::report();
        let out = gene_table(report.genes.ranked(), true);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[2].starts_with("1    HTT"));
        assert!(lines[2].contains("★ Core Gene"));
        assert!(lines[2].contains("98.00"));
        assert!(lines[5].contains("TP53"));
    }

    #[test]
    fn enrichment_table_ends_with_summary() {
        let report = fixtures::report();
        let out = enrichment_table(&report.enrichment, 1e-10);
        assert!(out.starts_with("Population 4 genes, top 4 sampled, 3 mechanisms tested"));
        assert!(out.contains("Core Gene"));
        assert_eq!(
            out.lines().last(),
            Some("Top mechanism: CoreGene (1 of top 4 genes, adj. p = 1.00e0)")
        );
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let long = "x".repeat(100);
        let t = truncate(&long, 48);
        assert_eq!(t.chars().count(), 48);
        assert!(t.ends_with("..."));
        assert_eq!(truncate("short", 48), "short");
    }
}
