// Priority scorer: role base weight blended with a literature-density proxy.
//
// `lit_score` is a deterministic stand-in, not a literature lookup: genes on
// a small high-evidence allowlist get 95, every other symbol is hashed into
// [20, 60). Same symbol, same score, on every platform and run.

#![allow(clippy::cast_precision_loss)]

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::types::{ClassifiedGene, MechanismLabel, ScoredGene};

/// Score given to allowlisted, heavily studied genes.
pub const HIGH_EVIDENCE_SCORE: f64 = 95.0;
/// Inclusive lower bound of the hashed proxy.
pub const PROXY_MIN: u64 = 20;
/// Exclusive upper bound of the hashed proxy.
pub const PROXY_MAX: u64 = 60;

const HIGH_EVIDENCE: [&str; 14] = [
    "HTT", "BDNF", "APP", "SNCA", "SOD1", "TP53", "CASP3", "APOE", "MAPT", "PSEN1", "LRRK2",
    "PINK1", "PRKN", "CREB1",
];

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Role weights and blend factors for `priority`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub core: f64,
    pub mitochondrial: f64,
    pub proteostasis: f64,
    pub other: f64,
    pub role_blend: f64,
    pub literature_blend: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::simple()
    }
}

impl ScoringWeights {
    /// Core genes 100, every other role 50; 0.6 / 0.4 blend.
    pub fn simple() -> Self {
        Self {
            core: 100.0,
            mitochondrial: 50.0,
            proteostasis: 50.0,
            other: 50.0,
            role_blend: 0.6,
            literature_blend: 0.4,
        }
    }

    /// Core 100, mitochondrial and proteostasis 70, other roles 40; 0.6 / 0.4 blend.
    pub fn tiered() -> Self {
        Self {
            core: 100.0,
            mitochondrial: 70.0,
            proteostasis: 70.0,
            other: 40.0,
            role_blend: 0.6,
            literature_blend: 0.4,
        }
    }

    pub fn base_weight(&self, role: MechanismLabel) -> f64 {
        match role {
            MechanismLabel::CoreGene => self.core,
            MechanismLabel::MitochondrialDysfunction => self.mitochondrial,
            MechanismLabel::Proteostasis => self.proteostasis,
            MechanismLabel::Apoptosis
            | MechanismLabel::Autophagy
            | MechanismLabel::SynapticExcitotoxicity
            | MechanismLabel::PathwayComponent => self.other,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = [
            ("core", self.core),
            ("mitochondrial", self.mitochondrial),
            ("proteostasis", self.proteostasis),
            ("other", self.other),
            ("role_blend", self.role_blend),
            ("literature_blend", self.literature_blend),
        ];
        for (name, value) in all {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "scoring weight {name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.role_blend + self.literature_blend <= 0.0 {
            return Err(ConfigError::Invalid(
                "role_blend + literature_blend must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// 64-bit FNV-1a over the symbol's UTF-8 bytes.
fn fnv1a(symbol: &str) -> u64 {
    symbol.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Literature-density proxy for a symbol.
pub fn lit_score(symbol: &str) -> f64 {
    if HIGH_EVIDENCE.contains(&symbol) {
        return HIGH_EVIDENCE_SCORE;
    }
    (PROXY_MIN + fnv1a(symbol) % (PROXY_MAX - PROXY_MIN)) as f64
}

/// `base_weight(role) × role_blend + lit_score × literature_blend`.
pub fn priority(role: MechanismLabel, lit_score: f64, weights: &ScoringWeights) -> f64 {
    weights.base_weight(role) * weights.role_blend + lit_score * weights.literature_blend
}

/// Score one classified gene.
pub fn score_gene(classified: ClassifiedGene, weights: &ScoringWeights) -> ScoredGene {
    let lit = lit_score(&classified.gene.symbol);
    let priority = priority(classified.role, lit, weights);
    ScoredGene {
        classified,
        lit_score: lit,
        priority,
    }
}

/// Score every gene, preserving order.
pub fn score_all(genes: Vec<ClassifiedGene>, weights: &ScoringWeights) -> Vec<ScoredGene> {
    let scored: Vec<ScoredGene> = genes.into_iter().map(|g| score_gene(g, weights)).collect();
    debug!(genes = scored.len(), "Scored genes");
    scored
}

/// Genes in descending priority; ties keep their input (parse) order.
pub fn rank_by_priority<'a>(genes: impl IntoIterator<Item = &'a ScoredGene>) -> Vec<&'a ScoredGene> {
    let mut ranked: Vec<&ScoredGene> = genes.into_iter().collect();
    ranked.sort_by(|a, b| b.priority.total_cmp(&a.priority));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeneRecord;

    fn classified(symbol: &str, role: MechanismLabel) -> ClassifiedGene {
        ClassifiedGene {
            gene: GeneRecord {
                id: "0".into(),
                symbol: symbol.into(),
                description: String::new(),
            },
            role,
        }
    }

    #[test]
    fn allowlisted_symbols_score_high() {
        assert!((lit_score("HTT") - HIGH_EVIDENCE_SCORE).abs() < f64::EPSILON);
        assert!((lit_score("BDNF") - HIGH_EVIDENCE_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn proxy_is_deterministic_and_bounded() {
        let first = lit_score("NDUFA1");
        for _ in 0..10 {
            assert!((lit_score("NDUFA1") - first).abs() < f64::EPSILON);
        }
        assert!((20.0..60.0).contains(&first));
    }

    #[test]
    fn fnv_reference_values() {
        assert_eq!(fnv1a(""), FNV_OFFSET);
        assert_eq!(fnv1a("a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn core_outranks_non_core_with_same_literature() {
        let weights = ScoringWeights::simple();
        let htt = score_gene(classified("HTT", MechanismLabel::CoreGene), &weights);
        let bdnf = score_gene(
            classified("BDNF", MechanismLabel::SynapticExcitotoxicity),
            &weights,
        );
        assert!((htt.priority - 98.0).abs() < 1e-9);
        assert!((bdnf.priority - 68.0).abs() < 1e-9);
        assert!(htt.priority > bdnf.priority);
    }

    #[test]
    fn tiered_weights_differentiate_roles() {
        let w = ScoringWeights::tiered();
        assert!(w.base_weight(MechanismLabel::MitochondrialDysfunction) > w.base_weight(MechanismLabel::Apoptosis));
        assert!((w.base_weight(MechanismLabel::Proteostasis) - 70.0).abs() < f64::EPSILON);
        assert!((w.base_weight(MechanismLabel::PathwayComponent) - 40.0).abs() < f64::EPSILON);
        let s = ScoringWeights::simple();
        assert!((s.base_weight(MechanismLabel::MitochondrialDysfunction) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn weights_validation() {
        ScoringWeights::simple().validate().unwrap();
        ScoringWeights::tiered().validate().unwrap();
        let bad = ScoringWeights {
            core: -1.0,
            ..ScoringWeights::simple()
        };
        assert!(bad.validate().is_err());
        let zero_blend = ScoringWeights {
            role_blend: 0.0,
            literature_blend: 0.0,
            ..ScoringWeights::simple()
        };
        assert!(zero_blend.validate().is_err());
    }

    #[test]
    fn ranking_is_stable_for_ties() {
        let weights = ScoringWeights::simple();
        let genes: Vec<ScoredGene> = ["TP53", "CASP3", "HTT"]
            .iter()
            .map(|s| score_gene(classified(s, MechanismLabel::PathwayComponent), &weights))
            .collect();
        let ranked: Vec<&str> = rank_by_priority(&genes).iter().map(|g| g.symbol()).collect();
        assert_eq!(ranked, ["TP53", "CASP3", "HTT"]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn lit_score_in_range(symbol in "\\PC{0,16}") {
                let score = lit_score(&symbol);
                prop_assert!((0.0..=100.0).contains(&score));
                prop_assert!(score == HIGH_EVIDENCE_SCORE || (20.0..60.0).contains(&score));
                prop_assert_eq!(score.fract(), 0.0);
            }

            #[test]
            fn priority_is_pure(symbol in "[A-Z][A-Z0-9]{0,7}", idx in 0usize..7) {
                let role = MechanismLabel::ALL[idx];
                let weights = ScoringWeights::tiered();
                let a = score_gene(classified(&symbol, role), &weights);
                let b = score_gene(classified(&symbol, role), &weights);
                prop_assert_eq!(a.priority.to_bits(), b.priority.to_bits());
            }
        }
    }
}
