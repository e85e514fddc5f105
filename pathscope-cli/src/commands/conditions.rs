use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug)]
pub struct ConditionsArgs {
    /// Path to a pathscope.toml whose [[conditions]] extend the catalog
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format: text, json
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

pub fn run(args: &ConditionsArgs) -> anyhow::Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let catalog = config.catalog();

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(catalog.profiles())?);
        return Ok(());
    }

    println!("{:<16} {:<10} {:<6} Core genes", "Condition", "Pathway", "Hub");
    println!("{:-<72}", "");
    for profile in catalog.profiles() {
        println!(
            "{:<16} {:<10} {:<6} {}",
            profile.name,
            profile.pathway_id,
            profile.hub_gene.as_deref().unwrap_or("-"),
            profile.core_genes.join(", ")
        );
        if !profile.aliases.is_empty() {
            println!("{:<16} aliases: {}", "", profile.aliases.join(", "));
        }
    }
    Ok(())
}
