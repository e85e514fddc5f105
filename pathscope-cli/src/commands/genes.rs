use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use pathscope_core::render::csv::genes_to_csv;
use pathscope_core::render::text::{LIT_SCORE_NOTE, gene_table};
use pathscope_core::score::rank_by_priority;

use super::TargetArgs;

#[derive(Args, Debug)]
pub struct GenesArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Case-insensitive filter on symbol, description or role
    #[arg(long)]
    pub search: Option<String>,

    /// Show only the top N genes
    #[arg(long)]
    pub top: Option<usize>,

    /// Also write the shown rows as CSV (UTF-8 with BOM)
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Output format: text, json
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

pub async fn run(args: GenesArgs) -> anyhow::Result<()> {
    let config = super::load_config(args.target.config.as_deref())?;
    let decorate = config.export.decorate_roles;
    let report = super::analyze(&args.target, config).await?;

    let matched = match args.search.as_deref() {
        Some(query) => report.genes.search(query),
        None => report.genes.rows().iter().collect(),
    };
    let rows: Vec<_> = rank_by_priority(matched)
        .into_iter()
        .take(args.top.unwrap_or(usize::MAX))
        .collect();

    if let Some(path) = &args.export {
        let csv = genes_to_csv(rows.iter().copied(), decorate)?;
        std::fs::write(path, csv)
            .with_context(|| format!("Cannot write export file: {}", path.display()))?;
        eprintln!("Wrote {} genes to {}", rows.len(), path.display());
    }

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", gene_table(rows.iter().copied(), decorate));
        println!();
        println!("{} of {} genes. {LIT_SCORE_NOTE}", rows.len(), report.genes.len());
    }
    Ok(())
}
