use clap::Args;

use pathscope_core::render::graph::{GraphFormat, render_graph};
use pathscope_core::types::MechanismLabel;

use super::TargetArgs;

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Number of top-priority genes in the graph (1-50)
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Hub gene symbol (default: the condition's hub gene)
    #[arg(long)]
    pub hub: Option<String>,

    /// Remove a role before ranking; repeatable
    #[arg(long = "exclude-role", value_parser = parse_role)]
    pub exclude_roles: Vec<MechanismLabel>,

    /// Output format: text, json, dot, mermaid
    #[arg(long, default_value = "text")]
    pub format: GraphFormat,
}

fn parse_role(s: &str) -> Result<MechanismLabel, String> {
    MechanismLabel::parse(s).ok_or_else(|| format!("unknown role: {s}"))
}

pub async fn run(args: GraphArgs) -> anyhow::Result<()> {
    let mut config = super::load_config(args.target.config.as_deref())?;
    if let Some(top_n) = args.top_n {
        config.interactome.top_n = top_n;
    }
    if args.hub.is_some() {
        config.interactome.hub.clone_from(&args.hub);
    }
    for role in &args.exclude_roles {
        if !config.interactome.exclude_roles.contains(role) {
            config.interactome.exclude_roles.push(*role);
        }
    }

    let report = super::analyze(&args.target, config).await?;
    print!("{}", render_graph(&report.interactome, args.format)?);
    Ok(())
}
