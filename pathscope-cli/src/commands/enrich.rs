use clap::Args;

use pathscope_core::render::csv::enrichment_to_csv;
use pathscope_core::render::text::enrichment_table;

use super::TargetArgs;

#[derive(Args, Debug)]
pub struct EnrichArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Number of top-ranked genes tested against the pathway
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Output format: text, json, csv
    #[arg(long, default_value = "text", value_parser = ["text", "json", "csv"])]
    pub format: String,
}

pub async fn run(args: EnrichArgs) -> anyhow::Result<()> {
    let mut config = super::load_config(args.target.config.as_deref())?;
    if let Some(n) = args.sample_size {
        config.enrichment.sample_size = n;
    }
    let p_floor = config.enrichment.p_floor;

    let report = super::analyze(&args.target, config).await?;
    let enrichment = &report.enrichment;
    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(enrichment)?),
        "csv" => print!("{}", enrichment_to_csv(enrichment, p_floor)?),
        _ => print!("{}", enrichment_table(enrichment, p_floor)),
    }
    Ok(())
}
