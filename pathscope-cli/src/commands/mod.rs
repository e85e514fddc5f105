pub mod conditions;
pub mod enrich;
pub mod genes;
pub mod graph;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use tracing::debug;

use pathscope_core::config::PathscopeConfig;
use pathscope_core::fetch::KeggClient;
use pathscope_core::pipeline::{self, PathwayAnalysis, PathwayPipeline, PathwayReport};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "pathscope.toml";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full pipeline and print a summary
    Run(run::RunArgs),
    /// Show the scored gene table
    Genes(genes::GenesArgs),
    /// Build and print the interactome
    Graph(graph::GraphArgs),
    /// Show mechanism enrichment
    Enrich(enrich::EnrichArgs),
    /// List known conditions
    Conditions(conditions::ConditionsArgs),
}

pub async fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Run(args) => run::run(args).await,
        Command::Genes(args) => genes::run(args).await,
        Command::Graph(args) => graph::run(args).await,
        Command::Enrich(args) => enrich::run(args).await,
        Command::Conditions(args) => conditions::run(&args),
    }
}

/// Flags shared by every command that analyzes a pathway.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Condition name or alias (e.g. "Huntington's", hd, als)
    #[arg(long, short = 'c', default_value = "Huntington's")]
    pub condition: String,

    /// Pathway identifier; overrides the condition's pathway
    #[arg(long, short = 'p')]
    pub pathway: Option<String>,

    /// Path to a pathscope.toml (default: ./pathscope.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read the pathway record from a file instead of fetching it
    #[arg(long)]
    pub record: Option<PathBuf>,
}

/// Load `--config`, else `./pathscope.toml` when present, else defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PathscopeConfig> {
    if let Some(path) = path {
        return PathscopeConfig::load(path)
            .with_context(|| format!("Cannot load config: {}", path.display()));
    }
    let local = Path::new(DEFAULT_CONFIG_FILE);
    if local.exists() {
        debug!(path = %local.display(), "Using config from working directory");
        return PathscopeConfig::load(local)
            .with_context(|| format!("Cannot load config: {}", local.display()));
    }
    Ok(PathscopeConfig::default())
}

/// Run the pipeline for `args` and return the report. A pathway with no
/// genes is an error here so the exit code reflects it.
pub async fn analyze(args: &TargetArgs, config: PathscopeConfig) -> anyhow::Result<PathwayReport> {
    config
        .validate()
        .context("Invalid config after applying command-line overrides")?;

    let analysis = if let Some(path) = &args.record {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read record file: {}", path.display()))?;
        let target = pipeline::resolve(&config.catalog(), &args.condition, args.pathway.as_deref())?;
        pipeline::analyze_record(&target, &raw, &config)?
    } else {
        let client = KeggClient::new(&config.fetch)?;
        let pipeline = PathwayPipeline::new(client, config);
        pipeline
            .run(&args.condition, args.pathway.as_deref())
            .await?
    };

    match analysis {
        PathwayAnalysis::Complete(report) => Ok(*report),
        PathwayAnalysis::NoGenes { pathway_id, .. } => {
            anyhow::bail!("No genes found for pathway {pathway_id}")
        }
    }
}
