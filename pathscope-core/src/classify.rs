// Mechanism classifier: ordered rule table, first match wins.
//
// Core-set membership is checked before any description heuristic, so a
// core gene described as mitochondrial stays `CoreGene`.

use tracing::debug;

use crate::conditions::ConditionCatalog;
use crate::types::{ClassifiedGene, GeneRecord, MechanismLabel};

/// What a rule inspects.
#[derive(Debug, Clone, Copy)]
enum Matcher {
    /// Symbol is in the condition's core-gene set (exact match).
    CoreSet,
    /// Lowercased description contains any needle.
    Description(&'static [&'static str]),
    /// Symbol contains any case-sensitive needle, or the lowercased
    /// description contains any description needle.
    SymbolOrDescription {
        symbol: &'static [&'static str],
        description: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    label: MechanismLabel,
    matcher: Matcher,
}

/// Evaluation order is part of the contract; do not reorder.
const RULES: [Rule; 6] = [
    Rule {
        label: MechanismLabel::CoreGene,
        matcher: Matcher::CoreSet,
    },
    Rule {
        label: MechanismLabel::MitochondrialDysfunction,
        matcher: Matcher::Description(&["mitochond", "atp"]),
    },
    Rule {
        label: MechanismLabel::Apoptosis,
        matcher: Matcher::Description(&["apopt", "caspase"]),
    },
    Rule {
        label: MechanismLabel::Autophagy,
        matcher: Matcher::Description(&["autophagy"]),
    },
    Rule {
        label: MechanismLabel::SynapticExcitotoxicity,
        matcher: Matcher::Description(&["synap", "glutamate"]),
    },
    Rule {
        label: MechanismLabel::Proteostasis,
        matcher: Matcher::SymbolOrDescription {
            symbol: &["PSM"],
            description: &["proteasome"],
        },
    },
];

impl Matcher {
    fn matches(&self, symbol: &str, description_lower: &str, core_set: &[String]) -> bool {
        match self {
            Self::CoreSet => core_set.iter().any(|core| core == symbol),
            Self::Description(needles) => needles.iter().any(|n| description_lower.contains(n)),
            Self::SymbolOrDescription {
                symbol: symbol_needles,
                description,
            } => {
                symbol_needles.iter().any(|n| symbol.contains(n))
                    || description.iter().any(|n| description_lower.contains(n))
            }
        }
    }
}

/// Assign one mechanism to a gene. Total: falls back to `PathwayComponent`.
pub fn classify(symbol: &str, description: &str, core_set: &[String]) -> MechanismLabel {
    let description_lower = description.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matcher.matches(symbol, &description_lower, core_set))
        .map_or(MechanismLabel::PathwayComponent, |rule| rule.label)
}

/// Classify against a named condition; unknown conditions have no core genes.
pub fn classify_for_condition(
    symbol: &str,
    description: &str,
    condition: &str,
    catalog: &ConditionCatalog,
) -> MechanismLabel {
    classify(symbol, description, catalog.core_set(condition))
}

/// Classify every gene, preserving order.
pub fn classify_all(genes: Vec<GeneRecord>, core_set: &[String]) -> Vec<ClassifiedGene> {
    let classified: Vec<ClassifiedGene> = genes
        .into_iter()
        .map(|gene| {
            let role = classify(&gene.symbol, &gene.description, core_set);
            ClassifiedGene { gene, role }
        })
        .collect();
    debug!(
        genes = classified.len(),
        core = classified
            .iter()
            .filter(|g| g.role == MechanismLabel::CoreGene)
            .count(),
        "Classified genes"
    );
    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hd_core() -> Vec<String> {
        ConditionCatalog::builtin().core_set("Huntington's").to_vec()
    }

    #[test]
    fn core_status_dominates_description() {
        let core = hd_core();
        assert_eq!(
            classify("HTT", "huntingtin; associated with mitochondria", &core),
            MechanismLabel::CoreGene
        );
    }

    #[test]
    fn each_rule_fires() {
        let core = hd_core();
        let cases = [
            ("NDUFA1", "NADH dehydrogenase, mitochondrial complex I", MechanismLabel::MitochondrialDysfunction),
            ("ATP5F1A", "ATP synthase F1 subunit alpha", MechanismLabel::MitochondrialDysfunction),
            ("BAX", "BCL2 associated X, apoptosis regulator", MechanismLabel::Apoptosis),
            ("CASP9", "caspase 9", MechanismLabel::Apoptosis),
            ("ATG5", "autophagy related 5", MechanismLabel::Autophagy),
            ("GRIN1", "glutamate ionotropic receptor NMDA type subunit 1", MechanismLabel::SynapticExcitotoxicity),
            ("BDNF", "brain-derived neurotrophic factor, synaptic plasticity", MechanismLabel::SynapticExcitotoxicity),
            ("PSMD4", "26S regulatory subunit 4", MechanismLabel::Proteostasis),
            ("UBB", "ubiquitin B, proteasome targeting", MechanismLabel::Proteostasis),
            ("CREB1", "cAMP responsive element binding protein 1", MechanismLabel::PathwayComponent),
        ];
        for (symbol, description, expected) in cases {
            assert_eq!(classify(symbol, description, &core), expected, "{symbol}");
        }
    }

    #[test]
    fn earlier_rules_win() {
        // Mitochondrial beats apoptosis.
        assert_eq!(
            classify("CYCS", "cytochrome c, somatic; mitochondrial release triggers apoptosis", &[]),
            MechanismLabel::MitochondrialDysfunction
        );
        // Apoptosis beats proteostasis even for a PSM symbol.
        assert_eq!(
            classify("PSMX", "apoptotic proteasome subunit", &[]),
            MechanismLabel::Apoptosis
        );
    }

    #[test]
    fn description_match_is_case_insensitive() {
        assert_eq!(classify("X", "MITOCHONDRIAL", &[]), MechanismLabel::MitochondrialDysfunction);
        assert_eq!(classify("X", "Glutamate receptor", &[]), MechanismLabel::SynapticExcitotoxicity);
    }

    #[test]
    fn psm_symbol_match_is_case_sensitive() {
        assert_eq!(classify("psmb1", "subunit beta 1", &[]), MechanismLabel::PathwayComponent);
        assert_eq!(classify("PSMB1", "subunit beta 1", &[]), MechanismLabel::Proteostasis);
    }

    #[test]
    fn core_match_is_exact_symbol() {
        let core = hd_core();
        assert_ne!(classify("HTTX", "unknown", &core), MechanismLabel::CoreGene);
        assert_ne!(classify("htt", "unknown", &core), MechanismLabel::CoreGene);
    }

    #[test]
    fn unknown_condition_has_no_core_genes() {
        let catalog = ConditionCatalog::builtin();
        assert_eq!(
            classify_for_condition("HTT", "huntingtin", "Unknown Disorder", &catalog),
            MechanismLabel::PathwayComponent
        );
        assert_eq!(
            classify_for_condition("HTT", "huntingtin", "hd", &catalog),
            MechanismLabel::CoreGene
        );
    }

    #[test]
    fn classify_all_preserves_order() {
        let genes = vec![
            GeneRecord { id: "1".into(), symbol: "HTT".into(), description: "huntingtin".into() },
            GeneRecord { id: "2".into(), symbol: "CASP3".into(), description: "caspase 3".into() },
        ];
        let classified = classify_all(genes, &hd_core());
        assert_eq!(classified[0].gene.symbol, "HTT");
        assert_eq!(classified[0].role, MechanismLabel::CoreGene);
        assert_eq!(classified[1].role, MechanismLabel::Apoptosis);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn classification_is_total(symbol in "\\PC{0,12}", description in "\\PC{0,60}") {
                let label = classify(&symbol, &description, &hd_core());
                prop_assert!(MechanismLabel::ALL.contains(&label));
            }

            #[test]
            fn core_genes_always_core(description in "\\PC{0,60}") {
                for symbol in hd_core() {
                    prop_assert_eq!(classify(&symbol, &description, &hd_core()), MechanismLabel::CoreGene);
                }
            }
        }
    }
}
