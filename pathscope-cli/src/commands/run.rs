use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use pathscope_core::pipeline::PathwayReport;
use pathscope_core::render;

use super::TargetArgs;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Write every export (CSV, graph, Markdown, JSON) into this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Output format: text, json
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = super::load_config(args.target.config.as_deref())?;
    let report = super::analyze(&args.target, config.clone()).await?;

    if let Some(dir) = &args.out_dir {
        let written = render::write_all(&report, &config, dir)
            .with_context(|| format!("Cannot write exports to {}", dir.display()))?;
        for path in &written {
            eprintln!("Wrote {}", path.display());
        }
    }

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &PathwayReport) {
    let name = report.pathway_name.as_deref().unwrap_or("");
    println!("{}: {} {name}", report.condition, report.pathway_id);
    println!();
    println!(
        "  Genes:       {} ({} skipped lines)",
        report.genes.len(),
        report.skipped_lines
    );
    println!(
        "  Interactome: {} nodes, {} edges, hub {}",
        report.interactome.node_count(),
        report.interactome.edge_count(),
        report.interactome.hub.as_deref().unwrap_or("none")
    );
    println!();
    println!("  Top genes:");
    for gene in report.genes.ranked().into_iter().take(5) {
        println!(
            "    {:<10} {:<28} {:>6.2}",
            gene.symbol(),
            gene.role().decorated(),
            gene.priority
        );
    }
    println!();
    println!("  {}", report.enrichment.summary);
}
