use serde::{Deserialize, Serialize};

// ── Mechanism taxonomy ─────────────────────────────────────────────

/// Functional role assigned to every gene by the classifier.
///
/// The set is closed. `PathwayComponent` is the catch-all bucket and is
/// never tested for enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MechanismLabel {
    /// Member of the condition's curated core-gene set.
    CoreGene,
    /// Mitochondrial function or ATP metabolism.
    MitochondrialDysfunction,
    /// Apoptotic signalling, caspases.
    Apoptosis,
    /// Autophagy machinery.
    Autophagy,
    /// Synaptic transmission, glutamate signalling.
    SynapticExcitotoxicity,
    /// Proteasome subunits and protein quality control.
    Proteostasis,
    /// Everything else in the pathway.
    PathwayComponent,
}

impl MechanismLabel {
    /// Every label, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::CoreGene,
        Self::MitochondrialDysfunction,
        Self::Apoptosis,
        Self::Autophagy,
        Self::SynapticExcitotoxicity,
        Self::Proteostasis,
        Self::PathwayComponent,
    ];

    /// Labels eligible for enrichment testing (the catch-all excluded).
    pub const TESTABLE: [Self; 6] = [
        Self::CoreGene,
        Self::MitochondrialDysfunction,
        Self::Apoptosis,
        Self::Autophagy,
        Self::SynapticExcitotoxicity,
        Self::Proteostasis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoreGene => "CoreGene",
            Self::MitochondrialDysfunction => "MitochondrialDysfunction",
            Self::Apoptosis => "Apoptosis",
            Self::Autophagy => "Autophagy",
            Self::SynapticExcitotoxicity => "SynapticExcitotoxicity",
            Self::Proteostasis => "Proteostasis",
            Self::PathwayComponent => "PathwayComponent",
        }
    }

    /// Human-readable name used in tables and search.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CoreGene => "Core Gene",
            Self::MitochondrialDysfunction => "Mitochondrial Dysfunction",
            Self::Apoptosis => "Apoptosis",
            Self::Autophagy => "Autophagy",
            Self::SynapticExcitotoxicity => "Synaptic Excitotoxicity",
            Self::Proteostasis => "Proteostasis",
            Self::PathwayComponent => "Pathway Component",
        }
    }

    /// Decorative marker for presentation layers. Not part of the label's identity.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::CoreGene => "★",
            Self::MitochondrialDysfunction => "⚡",
            Self::Apoptosis => "✝",
            Self::Autophagy => "♻",
            Self::SynapticExcitotoxicity => "⚠",
            Self::Proteostasis => "⚙",
            Self::PathwayComponent => "•",
        }
    }

    /// `"<glyph> <display name>"`, e.g. `"★ Core Gene"`.
    pub fn decorated(&self) -> String {
        format!("{} {}", self.glyph(), self.display_name())
    }

    /// Parse a label from its identifier, display name, or a
    /// kebab/snake-case spelling (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().to_ascii_lowercase() == key)
            .or(match key.as_str() {
                "core" => Some(Self::CoreGene),
                "mitochondrial" => Some(Self::MitochondrialDysfunction),
                "synaptic" => Some(Self::SynapticExcitotoxicity),
                "other" | "unclassified" => Some(Self::PathwayComponent),
                _ => None,
            })
    }
}

impl std::fmt::Display for MechanismLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Gene records ───────────────────────────────────────────────────

/// One gene entry from a pathway record's GENE section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneRecord {
    /// Source identifier (e.g. an Entrez id).
    pub id: String,
    /// Gene symbol, the natural key within one pathway.
    pub symbol: String,
    /// Free text after the first `;` of the source line.
    pub description: String,
}

/// A gene with its assigned mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedGene {
    #[serde(flatten)]
    pub gene: GeneRecord,
    pub role: MechanismLabel,
}

/// A classified gene with its literature proxy and blended priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredGene {
    #[serde(flatten)]
    pub classified: ClassifiedGene,
    /// Literature-density proxy in `[0, 100]`. Not a literature lookup.
    pub lit_score: f64,
    /// Blended ranking score.
    pub priority: f64,
}

impl ScoredGene {
    pub fn id(&self) -> &str {
        &self.classified.gene.id
    }

    pub fn symbol(&self) -> &str {
        &self.classified.gene.symbol
    }

    pub fn description(&self) -> &str {
        &self.classified.gene.description
    }

    pub fn role(&self) -> MechanismLabel {
        self.classified.role
    }
}

// ── Enrichment ─────────────────────────────────────────────────────

/// Enrichment statistics for one mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRow {
    pub mechanism: MechanismLabel,
    /// Genes with this mechanism inside the top-n sample (`k`).
    pub overlap_count: u64,
    /// Genes with this mechanism in the whole population (`M`).
    pub background_count: u64,
    /// One-sided exact p-value (over-representation).
    pub raw_p: f64,
    /// Bonferroni-adjusted p-value.
    pub adj_p: f64,
    /// `(k / n) / (M / N)`.
    pub fold_enrichment: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testable_excludes_catch_all() {
        assert!(!MechanismLabel::TESTABLE.contains(&MechanismLabel::PathwayComponent));
        assert_eq!(MechanismLabel::TESTABLE.len() + 1, MechanismLabel::ALL.len());
    }

    #[test]
    fn decorated_label_is_non_ascii() {
        let label = MechanismLabel::CoreGene.decorated();
        assert_eq!(label, "★ Core Gene");
        assert!(!label.is_ascii());
    }

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!(MechanismLabel::parse("Apoptosis"), Some(MechanismLabel::Apoptosis));
        assert_eq!(
            MechanismLabel::parse("pathway-component"),
            Some(MechanismLabel::PathwayComponent)
        );
        assert_eq!(
            MechanismLabel::parse("Synaptic Excitotoxicity"),
            Some(MechanismLabel::SynapticExcitotoxicity)
        );
        assert_eq!(MechanismLabel::parse("core"), Some(MechanismLabel::CoreGene));
        assert_eq!(MechanismLabel::parse("nonsense"), None);
    }

    #[test]
    fn scored_gene_serializes_flat() {
        let gene = ScoredGene {
            classified: ClassifiedGene {
                gene: GeneRecord {
                    id: "3064".into(),
                    symbol: "HTT".into(),
                    description: "huntingtin".into(),
                },
                role: MechanismLabel::CoreGene,
            },
            lit_score: 95.0,
            priority: 98.0,
        };
        let json = serde_json::to_value(&gene).unwrap();
        assert_eq!(json["symbol"], "HTT");
        assert_eq!(json["role"], "CoreGene");
        assert_eq!(json["lit_score"], 95.0);
        let back: ScoredGene = serde_json::from_value(json).unwrap();
        assert_eq!(back, gene);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_label() -> impl Strategy<Value = MechanismLabel> {
            prop::sample::select(MechanismLabel::ALL.to_vec())
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn label_serde_roundtrip(label in arb_label()) {
                let json = serde_json::to_string(&label).unwrap();
                let back: MechanismLabel = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(back, label);
            }

            #[test]
            fn label_as_str_parses_back(label in arb_label()) {
                prop_assert_eq!(MechanismLabel::parse(label.as_str()), Some(label));
                prop_assert_eq!(MechanismLabel::parse(label.display_name()), Some(label));
                prop_assert_eq!(label.to_string(), label.as_str());
            }
        }
    }
}
