use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::conditions::{ConditionCatalog, ConditionProfile};
use crate::error::ConfigError;
use crate::score::ScoringWeights;
use crate::types::MechanismLabel;

/// Largest interactome selection the builder accepts.
pub const MAX_INTERACTOME_NODES: usize = 50;

/// Policy for gene symbols that appear more than once in one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Keep every parsed line.
    Keep,
    /// Keep the first occurrence of each symbol.
    #[default]
    FirstWins,
    /// Keep the last occurrence, at the position of the first.
    LastWins,
}

/// Named weighting preset for the priority scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoringScheme {
    /// Core genes 100, everything else 50.
    #[default]
    Simple,
    /// Core 100, mitochondrial and proteostasis 70, other roles 40.
    Tiered,
}

/// Top-level pathscope configuration, matching `pathscope.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathscopeConfig {
    #[serde(default)]
    pub fetch: FetchSection,
    #[serde(default)]
    pub parse: ParseSection,
    #[serde(default)]
    pub scoring: ScoringSection,
    #[serde(default)]
    pub interactome: InteractomeSection,
    #[serde(default)]
    pub enrichment: EnrichmentSection,
    #[serde(default)]
    pub export: ExportSection,
    /// Extra or overriding condition profiles.
    #[serde(default)]
    pub conditions: Vec<ConditionProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSection {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            base_url: "https://rest.kegg.jp".to_string(),
            timeout_secs: 10,
            user_agent: concat!("pathscope/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseSection {
    #[serde(default)]
    pub dedup: DedupPolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringSection {
    #[serde(default)]
    pub scheme: ScoringScheme,
    /// Explicit weights; overrides `scheme` when present.
    #[serde(default)]
    pub weights: Option<ScoringWeights>,
}

impl ScoringSection {
    /// The weights the scorer should use.
    pub fn effective_weights(&self) -> ScoringWeights {
        self.weights.clone().unwrap_or_else(|| match self.scheme {
            ScoringScheme::Simple => ScoringWeights::simple(),
            ScoringScheme::Tiered => ScoringWeights::tiered(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractomeSection {
    /// Number of top-priority genes placed in the graph.
    pub top_n: usize,
    /// Number of highest-degree nodes reported as hub genes.
    pub top_k: usize,
    /// Hub symbol; defaults to the condition's hub gene.
    #[serde(default)]
    pub hub: Option<String>,
    /// Roles removed before ranking.
    #[serde(default)]
    pub exclude_roles: Vec<MechanismLabel>,
}

impl Default for InteractomeSection {
    fn default() -> Self {
        Self {
            top_n: 25,
            top_k: 5,
            hub: None,
            exclude_roles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentSection {
    /// Size of the top-ranked sample tested against the background.
    pub sample_size: usize,
    /// Floor substituted for zero p-values before `-log10`.
    pub p_floor: f64,
}

impl Default for EnrichmentSection {
    fn default() -> Self {
        Self {
            sample_size: 30,
            p_floor: 1e-10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    /// Prefix role labels with their glyph in exported tables.
    pub decorate_roles: bool,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            decorate_roles: true,
        }
    }
}

impl PathscopeConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch.timeout_secs must be > 0".into()));
        }
        if self.fetch.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("fetch.base_url is empty".into()));
        }
        if self.interactome.top_n == 0 || self.interactome.top_n > MAX_INTERACTOME_NODES {
            return Err(ConfigError::Invalid(format!(
                "interactome.top_n must be in 1..={MAX_INTERACTOME_NODES}, got {}",
                self.interactome.top_n
            )));
        }
        if self.enrichment.sample_size == 0 {
            return Err(ConfigError::Invalid("enrichment.sample_size must be > 0".into()));
        }
        if !(self.enrichment.p_floor > 0.0 && self.enrichment.p_floor < 1.0) {
            return Err(ConfigError::Invalid(
                "enrichment.p_floor must be in (0, 1)".into(),
            ));
        }
        self.scoring.effective_weights().validate()?;
        for profile in &self.conditions {
            if profile.name.trim().is_empty() || profile.pathway_id.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "condition profiles need a name and a pathway_id".into(),
                ));
            }
        }
        Ok(())
    }

    /// Built-in catalog with configured profiles layered on top.
    pub fn catalog(&self) -> ConditionCatalog {
        let mut catalog = ConditionCatalog::builtin();
        for profile in &self.conditions {
            catalog.insert(profile.clone());
        }
        catalog
    }
}
