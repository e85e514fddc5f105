// Condition catalog: condition name → pathway id, curated core genes, hub gene.
//
// The built-in set is closed; configuration may add profiles or replace a
// built-in one by name.

use serde::{Deserialize, Serialize};

/// One supported condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionProfile {
    /// Canonical display name, e.g. `"Huntington's"`.
    pub name: String,
    /// Additional lookup keys (matched case-insensitively).
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Pathway identifier passed to the fetcher.
    pub pathway_id: String,
    /// Curated core-gene symbols (exact match).
    #[serde(default)]
    pub core_genes: Vec<String>,
    /// Principal gene used as the interactome hub.
    #[serde(default)]
    pub hub_gene: Option<String>,
}

impl ConditionProfile {
    fn matches(&self, key: &str) -> bool {
        let key = normalize(key);
        normalize(&self.name) == key || self.aliases.iter().any(|a| normalize(a) == key)
    }
}

/// Lower-case and drop apostrophes/whitespace so `"Huntington's"`,
/// `"huntingtons"` and `"HUNTINGTON S"` compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '\'' && *c != '’')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lookup table of condition profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionCatalog {
    profiles: Vec<ConditionProfile>,
}

impl Default for ConditionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ConditionCatalog {
    /// The built-in neurodegeneration catalog.
    pub fn builtin() -> Self {
        Self {
            profiles: vec![
                profile(
                    "Huntington's",
                    &["huntington", "hd", "huntington disease"],
                    "hsa05016",
                    &["HTT", "HAP1", "HIP1", "REST", "PPARGC1A"],
                    "HTT",
                ),
                profile(
                    "Alzheimer's",
                    &["alzheimer", "ad", "alzheimer disease"],
                    "hsa05010",
                    &["APP", "PSEN1", "PSEN2", "APOE", "MAPT", "BACE1"],
                    "APP",
                ),
                profile(
                    "Parkinson's",
                    &["parkinson", "pd", "parkinson disease"],
                    "hsa05012",
                    &["SNCA", "PRKN", "PINK1", "LRRK2", "PARK7", "UCHL1"],
                    "SNCA",
                ),
                profile(
                    "ALS",
                    &["amyotrophic lateral sclerosis", "lou gehrig"],
                    "hsa05014",
                    &["SOD1", "TARDBP", "FUS", "C9orf72", "OPTN"],
                    "SOD1",
                ),
            ],
        }
    }

    /// An empty catalog; every condition is unknown.
    pub fn empty() -> Self {
        Self {
            profiles: Vec::new(),
        }
    }

    /// Add a profile, replacing any existing profile with the same name.
    pub fn insert(&mut self, profile: ConditionProfile) {
        if let Some(existing) = self.profiles.iter_mut().find(|p| p.matches(&profile.name)) {
            *existing = profile;
        } else {
            self.profiles.push(profile);
        }
    }

    /// Resolve a condition by name or alias.
    pub fn get(&self, condition: &str) -> Option<&ConditionProfile> {
        self.profiles.iter().find(|p| p.matches(condition))
    }

    /// Core-gene set for a condition; unknown conditions yield an empty set.
    pub fn core_set(&self, condition: &str) -> &[String] {
        self.get(condition)
            .map(|p| p.core_genes.as_slice())
            .unwrap_or_default()
    }

    /// Hub gene for a condition, if any.
    pub fn hub_gene(&self, condition: &str) -> Option<&str> {
        self.get(condition).and_then(|p| p.hub_gene.as_deref())
    }

    pub fn profiles(&self) -> &[ConditionProfile] {
        &self.profiles
    }
}

fn profile(
    name: &str,
    aliases: &[&str],
    pathway_id: &str,
    core_genes: &[&str],
    hub: &str,
) -> ConditionProfile {
    ConditionProfile {
        name: name.to_string(),
        aliases: aliases.iter().map(ToString::to_string).collect(),
        pathway_id: pathway_id.to_string(),
        core_genes: core_genes.iter().map(ToString::to_string).collect(),
        hub_gene: Some(hub.to_string()),
    }
}
