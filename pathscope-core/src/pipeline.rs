// Pipeline orchestrator: Fetch → Parse → Classify → Score → Interactome → Enrichment.
//
// Only the fetch is async. Everything after it is a pure function of the raw
// record and the configuration, exposed as `analyze_record` so it can run
// without a network source.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::analyze::{
    Analyzer, EnrichmentAnalyzer, EnrichmentReport, InteractomeBuilder, InteractomeSummary,
};
use crate::classify::classify_all;
use crate::conditions::ConditionCatalog;
use crate::config::PathscopeConfig;
use crate::error::ConfigError;
use crate::fetch::RecordSource;
use crate::parse::{dedup_genes, parse_record};
use crate::score::score_all;
use crate::table::GeneTable;
use crate::types::ScoredGene;

/// Message shown when a pathway's GENE section yields nothing.
pub const NO_GENES_MESSAGE: &str = "no genes found for this pathway";

/// A condition resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Canonical condition name, or the caller's spelling when unknown.
    pub condition: String,
    pub pathway_id: String,
    pub core_genes: Vec<String>,
    pub hub_gene: Option<String>,
}

/// Full output of one successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayReport {
    pub condition: String,
    pub pathway_id: String,
    /// NAME field of the record, when present.
    pub pathway_name: Option<String>,
    pub genes: GeneTable,
    pub interactome: InteractomeSummary,
    pub enrichment: EnrichmentReport,
    /// Malformed GENE lines that were skipped.
    pub skipped_lines: usize,
    pub generated_at: DateTime<Utc>,
}

/// Result of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PathwayAnalysis {
    /// The record parsed but contained no genes; later stages were skipped.
    NoGenes {
        condition: String,
        pathway_id: String,
        skipped_lines: usize,
    },
    Complete(Box<PathwayReport>),
}

impl PathwayAnalysis {
    pub fn report(&self) -> Option<&PathwayReport> {
        match self {
            Self::Complete(report) => Some(report),
            Self::NoGenes { .. } => None,
        }
    }

    pub fn into_report(self) -> Option<PathwayReport> {
        match self {
            Self::Complete(report) => Some(*report),
            Self::NoGenes { .. } => None,
        }
    }
}

/// Runs the pipeline against one record source.
#[derive(Debug)]
pub struct PathwayPipeline<S> {
    source: S,
    config: PathscopeConfig,
    catalog: ConditionCatalog,
}

impl<S: RecordSource> PathwayPipeline<S> {
    pub fn new(source: S, config: PathscopeConfig) -> Self {
        let catalog = config.catalog();
        Self {
            source,
            config,
            catalog,
        }
    }

    pub fn config(&self) -> &PathscopeConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ConditionCatalog {
        &self.catalog
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve against this pipeline's catalog. See [`resolve`].
    pub fn resolve(&self, condition: &str, pathway_id: Option<&str>) -> Result<Target, ConfigError> {
        resolve(&self.catalog, condition, pathway_id)
    }

    /// Fetch and analyze one pathway. Fetch failures propagate; they are
    /// never reported as an empty gene list.
    #[instrument(skip(self), name = "pipeline")]
    pub async fn run(
        &self,
        condition: &str,
        pathway_id: Option<&str>,
    ) -> crate::error::Result<PathwayAnalysis> {
        let target = self.resolve(condition, pathway_id)?;
        let start = Instant::now();
        let raw = self.source.fetch(&target.pathway_id).await?;
        info!(
            source = self.source.name(),
            pathway_id = %target.pathway_id,
            duration = ?start.elapsed(),
            "Fetch complete"
        );
        analyze_record(&target, &raw, &self.config)
    }
}

/// Resolve a condition and optional explicit pathway id.
///
/// An explicit pathway id wins over the catalog's. An unknown condition
/// with an explicit pathway runs with no core genes and no hub; without
/// one it is a configuration error.
pub fn resolve(
    catalog: &ConditionCatalog,
    condition: &str,
    pathway_id: Option<&str>,
) -> Result<Target, ConfigError> {
    let explicit = pathway_id.map(str::trim).filter(|id| !id.is_empty());
    match (catalog.get(condition), explicit) {
        (Some(profile), explicit) => Ok(Target {
            condition: profile.name.clone(),
            pathway_id: explicit.unwrap_or(&profile.pathway_id).to_string(),
            core_genes: profile.core_genes.clone(),
            hub_gene: profile.hub_gene.clone(),
        }),
        (None, Some(id)) => {
            warn!(condition, "Unknown condition; running without core genes");
            Ok(Target {
                condition: condition.to_string(),
                pathway_id: id.to_string(),
                core_genes: Vec::new(),
                hub_gene: None,
            })
        }
        (None, None) => Err(ConfigError::UnknownCondition(condition.to_string())),
    }
}

/// Everything after the fetch, over an already-downloaded record.
#[instrument(skip_all, name = "analyze_record", fields(pathway_id = %target.pathway_id))]
pub fn analyze_record(
    target: &Target,
    raw: &str,
    config: &PathscopeConfig,
) -> crate::error::Result<PathwayAnalysis> {
    let start = Instant::now();
    let record = parse_record(raw);
    let parsed = record.genes.len();
    let genes = dedup_genes(record.genes, config.parse.dedup);

    if genes.is_empty() {
        info!(skipped = record.skipped_lines, "{NO_GENES_MESSAGE}");
        return Ok(PathwayAnalysis::NoGenes {
            condition: target.condition.clone(),
            pathway_id: target.pathway_id.clone(),
            skipped_lines: record.skipped_lines,
        });
    }

    let classified = classify_all(genes, &target.core_genes);
    let scored = score_all(classified, &config.scoring.effective_weights());

    let builder = InteractomeBuilder::from_config(&config.interactome, target.hub_gene.as_deref());
    let interactome = run_analyzer(&builder, &scored)?.summary(builder.top_k);
    let enrichment = run_analyzer(&EnrichmentAnalyzer::from_config(&config.enrichment), &scored)?;

    info!(
        parsed,
        genes = scored.len(),
        skipped = record.skipped_lines,
        nodes = interactome.node_count(),
        edges = interactome.edge_count(),
        tested = enrichment.tested,
        duration = ?start.elapsed(),
        "Pathway analysis complete"
    );

    Ok(PathwayAnalysis::Complete(Box::new(PathwayReport {
        condition: target.condition.clone(),
        pathway_id: record.entry.unwrap_or_else(|| target.pathway_id.clone()),
        pathway_name: record.name,
        genes: GeneTable::new(scored),
        interactome,
        enrichment,
        skipped_lines: record.skipped_lines,
        generated_at: Utc::now(),
    })))
}

/// Run one analyzer over the scored snapshot, logging its name and timing.
fn run_analyzer<A: Analyzer>(analyzer: &A, genes: &[ScoredGene]) -> crate::error::Result<A::Output> {
    let start = Instant::now();
    let output = analyzer.analyze(genes)?;
    debug!(analyzer = analyzer.name(), duration = ?start.elapsed(), "Analyzer complete");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, PathscopeError};
    use crate::types::MechanismLabel;

    const RECORD: &str = "\
ENTRY       hsa05016                    Pathway
NAME        Huntington disease - Homo sapiens (human)
GENE        3064  HTT; huntingtin [KO:K04533]
            627  BDNF; brain-derived neurotrophic factor, synaptic plasticity
            836  CASP3; caspase 3 [KO:K02187]
            4535  ND1; NADH dehydrogenase subunit 1, mitochondrial
            5682  PSMA1; proteasome 20S subunit alpha 1
            garbage line
COMPOUND    C00025  L-Glutamate
";

    #[derive(Debug)]
    struct Fixed(Result<&'static str, u16>);

    #[async_trait::async_trait]
    impl RecordSource for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch(&self, pathway_id: &str) -> crate::error::Result<String> {
            match self.0 {
                Ok(body) => Ok(body.to_string()),
                Err(status) => Err(FetchError::Status {
                    pathway_id: pathway_id.to_string(),
                    status,
                }
                .into()),
            }
        }
    }

    fn pipeline(source: Fixed) -> PathwayPipeline<Fixed> {
        PathwayPipeline::new(source, PathscopeConfig::default())
    }

    #[test]
    fn resolve_known_condition_and_aliases() {
        let p = pipeline(Fixed(Ok("")));
        let target = p.resolve("hd", None).unwrap();
        assert_eq!(target.condition, "Huntington's");
        assert_eq!(target.pathway_id, "hsa05016");
        assert_eq!(target.hub_gene.as_deref(), Some("HTT"));

        let target = p.resolve("Huntington's", Some("hsa99999")).unwrap();
        assert_eq!(target.pathway_id, "hsa99999");
    }

    #[test]
    fn resolve_unknown_condition() {
        let p = pipeline(Fixed(Ok("")));
        let target = p.resolve("Mystery", Some("hsa00001")).unwrap();
        assert!(target.core_genes.is_empty());
        assert!(target.hub_gene.is_none());
        assert!(matches!(
            p.resolve("Mystery", None),
            Err(ConfigError::UnknownCondition(_))
        ));
        assert!(p.resolve("Mystery", Some("   ")).is_err());
    }

    #[tokio::test]
    async fn full_run() {
        let p = pipeline(Fixed(Ok(RECORD)));
        let analysis = p.run("Huntington's", None).await.unwrap();
        let report = analysis.into_report().unwrap();

        assert_eq!(report.pathway_id, "hsa05016");
        assert_eq!(
            report.pathway_name.as_deref(),
            Some("Huntington disease - Homo sapiens (human)")
        );
        assert_eq!(report.genes.len(), 5);
        assert_eq!(report.skipped_lines, 1);

        let htt = report.genes.get("HTT").unwrap();
        let bdnf = report.genes.get("BDNF").unwrap();
        assert_eq!(htt.role(), MechanismLabel::CoreGene);
        assert_eq!(bdnf.role(), MechanismLabel::SynapticExcitotoxicity);
        assert!(htt.priority > bdnf.priority);
        assert_eq!(report.genes.ranked()[0].symbol(), "HTT");

        assert_eq!(report.interactome.hub.as_deref(), Some("HTT"));
        assert_eq!(report.interactome.node_count(), 5);
        assert_eq!(report.interactome.edge_count(), 4);
        assert_eq!(report.enrichment.sample_size, 5);
    }

    #[tokio::test]
    async fn empty_gene_section_is_no_genes() {
        let p = pipeline(Fixed(Ok("ENTRY       hsa00000\nGENE\nCOMPOUND    C00001\n")));
        let analysis = p.run("hd", None).await.unwrap();
        assert!(matches!(analysis, PathwayAnalysis::NoGenes { .. }));
        assert!(analysis.report().is_none());
    }

    #[tokio::test]
    async fn fetch_failure_is_an_error_not_zero_genes() {
        let p = pipeline(Fixed(Err(404)));
        let err = p.run("hd", None).await.unwrap_err();
        assert!(matches!(
            err,
            PathscopeError::Fetch(FetchError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn analyzers_run_through_the_shared_trait() {
        use crate::config::{EnrichmentSection, InteractomeSection};

        let target = resolve(&ConditionCatalog::builtin(), "hd", None).unwrap();
        let report = analyze_record(&target, RECORD, &PathscopeConfig::default())
            .unwrap()
            .into_report()
            .unwrap();
        let scored = report.genes.rows();

        let builder = InteractomeBuilder::from_config(&InteractomeSection::default(), Some("HTT"));
        let enrichment = EnrichmentAnalyzer::from_config(&EnrichmentSection::default());
        assert_eq!(builder.name(), "interactome");
        assert_eq!(enrichment.name(), "enrichment");

        let graph = run_analyzer(&builder, scored).unwrap();
        assert_eq!(graph.summary(builder.top_k), report.interactome);
        assert_eq!(run_analyzer(&enrichment, scored).unwrap(), report.enrichment);
    }

    #[test]
    fn analysis_serializes_with_status_tag() {
        let analysis = PathwayAnalysis::NoGenes {
            condition: "ALS".into(),
            pathway_id: "hsa05014".into(),
            skipped_lines: 0,
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["status"], "no_genes");
    }
}
