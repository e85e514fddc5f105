// Mechanism enrichment: one-sided hypergeometric test of each mechanism's
// share of the top-ranked sample against the whole pathway, with
// Bonferroni correction over the mechanisms actually tested.
#![allow(clippy::cast_precision_loss)]

use std::time::Instant;

use serde::{Deserialize, Serialize};
use statrs::distribution::{Discrete, Hypergeometric};
use tracing::{debug, info, instrument};

use crate::config::EnrichmentSection;
use crate::error::AnalyzeError;
use crate::score::rank_by_priority;
use crate::types::{EnrichmentRow, MechanismLabel, ScoredGene};

use super::traits::Analyzer;

/// Summary used when no mechanism has any gene in the population.
pub const NOTHING_TESTED: &str = "No mechanism could be tested for enrichment";

/// 2×2 table `[[k, n−k], [M−k, N−M−(n−k)]]`.
pub type ContingencyTable = [[u64; 2]; 2];

/// Everything the enrichment stage produces for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentReport {
    /// Scored genes in the population (`N`).
    pub population: u64,
    /// Effective sample size after clamping to the population (`n`).
    pub sample_size: u64,
    /// Mechanisms tested; the Bonferroni multiplier.
    pub tested: usize,
    /// Rows sorted by adjusted p, then raw p, then label order.
    pub rows: Vec<EnrichmentRow>,
    pub summary: String,
}

impl EnrichmentReport {
    pub fn top(&self) -> Option<&EnrichmentRow> {
        self.rows.first()
    }

    pub fn row(&self, mechanism: MechanismLabel) -> Option<&EnrichmentRow> {
        self.rows.iter().find(|r| r.mechanism == mechanism)
    }
}

#[derive(Debug, Clone)]
pub struct EnrichmentAnalyzer {
    pub sample_size: usize,
    pub p_floor: f64,
}

impl Default for EnrichmentAnalyzer {
    fn default() -> Self {
        Self::from_config(&EnrichmentSection::default())
    }
}

impl EnrichmentAnalyzer {
    pub fn from_config(section: &EnrichmentSection) -> Self {
        Self {
            sample_size: section.sample_size,
            p_floor: section.p_floor,
        }
    }

    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// `-log10(p)` with this analyzer's floor.
    pub fn neg_log10(&self, p: f64) -> f64 {
        neg_log10(p, self.p_floor)
    }

    /// Test every mechanism except the catch-all against the population.
    #[instrument(skip_all, name = "enrichment")]
    pub fn run(&self, genes: &[ScoredGene]) -> crate::error::Result<EnrichmentReport> {
        if self.sample_size == 0 {
            return Err(
                AnalyzeError::InvalidParameter("sample_size must be > 0".into()).into(),
            );
        }
        let start = Instant::now();
        let population = genes.len() as u64;
        let sample_size = self.sample_size.min(genes.len());
        let sample: Vec<&ScoredGene> = rank_by_priority(genes)
            .into_iter()
            .take(sample_size)
            .collect();
        let n = sample_size as u64;

        let mut rows = Vec::new();
        for mechanism in MechanismLabel::TESTABLE {
            let m = genes.iter().filter(|g| g.role() == mechanism).count() as u64;
            if m == 0 {
                continue;
            }
            let k = sample.iter().filter(|g| g.role() == mechanism).count() as u64;
            let table = contingency_table(k, n, m, population)?;
            let raw_p = fisher_greater(&table)?;
            let fold_enrichment = if n == 0 {
                0.0
            } else {
                (k as f64 / n as f64) / (m as f64 / population as f64)
            };
            debug!(%mechanism, k, m, raw_p, "Tested mechanism");
            rows.push(EnrichmentRow {
                mechanism,
                overlap_count: k,
                background_count: m,
                raw_p,
                adj_p: raw_p,
                fold_enrichment,
            });
        }

        let tested = rows.len();
        for row in &mut rows {
            row.adj_p = bonferroni(row.raw_p, tested);
        }
        rows.sort_by(|a, b| {
            a.adj_p
                .total_cmp(&b.adj_p)
                .then(a.raw_p.total_cmp(&b.raw_p))
                .then(a.mechanism.cmp(&b.mechanism))
        });

        let summary = summary_line(rows.first(), n);
        info!(
            population,
            sample = n,
            tested,
            duration = ?start.elapsed(),
            "Enrichment analysis complete"
        );

        Ok(EnrichmentReport {
            population,
            sample_size: n,
            tested,
            rows,
            summary,
        })
    }
}

impl Analyzer for EnrichmentAnalyzer {
    type Output = EnrichmentReport;

    fn name(&self) -> &'static str {
        "enrichment"
    }

    fn analyze(&self, genes: &[ScoredGene]) -> crate::error::Result<EnrichmentReport> {
        self.run(genes)
    }
}

/// Contingency table for overlap `k`, sample `n`, mechanism total `m` and
/// population `total`. Counts that cannot come from one population are
/// rejected.
pub fn contingency_table(
    k: u64,
    n: u64,
    m: u64,
    total: u64,
) -> crate::error::Result<ContingencyTable> {
    if m > total || n > total || k > m.min(n) || n - k > total - m {
        return Err(AnalyzeError::InvalidParameter(format!(
            "inconsistent counts: k={k} n={n} M={m} N={total}"
        ))
        .into());
    }
    Ok([[k, n - k], [m - k, total - m - (n - k)]])
}

/// `P(X ≥ k)` for `X ~ Hypergeometric(N, M, n)` with every margin read off
/// `table`: the one-sided exact test for over-representation. Clamped to
/// `[0, 1]`.
pub fn fisher_greater(table: &ContingencyTable) -> crate::error::Result<f64> {
    let [[a, b], [c, d]] = *table;
    let (k, n, m, total) = (a, a + b, a + c, a + b + c + d);
    if k == 0 {
        return Ok(1.0);
    }
    let dist = Hypergeometric::new(total, m, n)
        .map_err(|e| AnalyzeError::Computation(e.to_string()))?;
    let p: f64 = (k..=m.min(n)).map(|x| dist.pmf(x)).sum();
    Ok(p.clamp(0.0, 1.0))
}

/// `min(1, p × tests)`.
pub fn bonferroni(p: f64, tests: usize) -> f64 {
    (p * tests as f64).min(1.0)
}

/// `-log10(max(p, floor))`, written as `log10(1 / p)` so `p = 1` gives `+0.0`.
pub fn neg_log10(p: f64, floor: f64) -> f64 {
    p.max(floor).recip().log10()
}

fn summary_line(top: Option<&EnrichmentRow>, sample_size: u64) -> String {
    match top {
        Some(row) => format!(
            "Top mechanism: {} ({} of top {} genes, adj. p = {:.2e})",
            row.mechanism, row.overlap_count, sample_size, row.adj_p
        ),
        None => NOTHING_TESTED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassifiedGene, GeneRecord};

    fn gene(i: usize, role: MechanismLabel, priority: f64) -> ScoredGene {
        ScoredGene {
            classified: ClassifiedGene {
                gene: GeneRecord {
                    id: i.to_string(),
                    symbol: format!("G{i}"),
                    description: String::new(),
                },
                role,
            },
            lit_score: 0.0,
            priority,
        }
    }

    /// 100 genes; 10 Apoptosis genes, 5 of them inside the top 30.
    fn population() -> Vec<ScoredGene> {
        (0..100)
            .map(|i| {
                let priority = 100.0 - i as f64;
                let role = if i < 5 || (50..55).contains(&i) {
                    MechanismLabel::Apoptosis
                } else {
                    MechanismLabel::PathwayComponent
                };
                gene(i, role, priority)
            })
            .collect()
    }

    #[test]
    fn reference_scenario() {
        let report = EnrichmentAnalyzer::default().run(&population()).unwrap();
        assert_eq!(report.population, 100);
        assert_eq!(report.sample_size, 30);
        assert_eq!(report.tested, 1);

        let row = report.row(MechanismLabel::Apoptosis).unwrap();
        assert_eq!(row.overlap_count, 5);
        assert_eq!(row.background_count, 10);
        assert!((row.raw_p - 0.138_402_349_139_269_08).abs() < 1e-9, "{}", row.raw_p);
        assert!((row.adj_p - row.raw_p).abs() < 1e-15);
        assert!((row.fold_enrichment - 5.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            report.summary,
            "Top mechanism: Apoptosis (5 of top 30 genes, adj. p = 1.38e-1)"
        );
    }

    #[test]
    fn bonferroni_uses_tested_count() {
        let mut genes = population();
        genes.push(gene(100, MechanismLabel::Autophagy, 0.5));
        genes.push(gene(101, MechanismLabel::Proteostasis, 0.4));
        let report = EnrichmentAnalyzer::default().run(&genes).unwrap();
        assert_eq!(report.tested, 3);
        let apoptosis = report.row(MechanismLabel::Apoptosis).unwrap();
        assert!((apoptosis.adj_p - (apoptosis.raw_p * 3.0).min(1.0)).abs() < 1e-12);
        // Zero overlap gives p = 1.
        let autophagy = report.row(MechanismLabel::Autophagy).unwrap();
        assert_eq!(autophagy.overlap_count, 0);
        assert!((autophagy.raw_p - 1.0).abs() < f64::EPSILON);
        assert_eq!(report.top().unwrap().mechanism, MechanismLabel::Apoptosis);
    }

    #[test]
    fn mechanisms_absent_from_population_are_omitted() {
        let report = EnrichmentAnalyzer::default().run(&population()).unwrap();
        assert!(report.row(MechanismLabel::CoreGene).is_none());
        assert!(report.row(MechanismLabel::PathwayComponent).is_none());
    }

    #[test]
    fn sample_size_clamped_to_population() {
        let genes: Vec<ScoredGene> = (0..4)
            .map(|i| gene(i, MechanismLabel::Apoptosis, 10.0))
            .collect();
        let report = EnrichmentAnalyzer::default().run(&genes).unwrap();
        assert_eq!(report.sample_size, 4);
        let row = &report.rows[0];
        assert_eq!(row.overlap_count, 4);
        assert!((row.raw_p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_population_tests_nothing() {
        let report = EnrichmentAnalyzer::default().run(&[]).unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.tested, 0);
        assert_eq!(report.summary, NOTHING_TESTED);
    }

    #[test]
    fn zero_sample_size_is_rejected() {
        let analyzer = EnrichmentAnalyzer::default().with_sample_size(0);
        assert!(analyzer.run(&population()).is_err());
    }

    #[test]
    fn contingency_cells() {
        let table = contingency_table(5, 30, 10, 100).unwrap();
        assert_eq!(table, [[5, 25], [5, 65]]);
        let [[a, b], [c, d]] = table;
        assert_eq!(a + b + c + d, 100);
    }

    #[test]
    fn fisher_greater_reads_margins_from_table() {
        let table = contingency_table(5, 30, 10, 100).unwrap();
        let p = fisher_greater(&table).unwrap();
        assert!((p - 0.138_402_349_139_269_08).abs() < 1e-9, "p = {p}");

        let none_drawn = contingency_table(0, 30, 10, 100).unwrap();
        assert!((fisher_greater(&none_drawn).unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn run_matches_table_driven_p_value() {
        let report = EnrichmentAnalyzer::default().run(&population()).unwrap();
        let row = report.row(MechanismLabel::Apoptosis).unwrap();
        let table = contingency_table(
            row.overlap_count,
            report.sample_size,
            row.background_count,
            report.population,
        )
        .unwrap();
        assert!((fisher_greater(&table).unwrap() - row.raw_p).abs() < f64::EPSILON);
    }

    #[test]
    fn neg_log10_applies_floor() {
        assert!((neg_log10(0.0, 1e-10) - 10.0).abs() < 1e-9);
        assert!((neg_log10(0.01, 1e-10) - 2.0).abs() < 1e-9);
        assert!(neg_log10(1.0, 1e-10).abs() < 1e-12);
        assert!(neg_log10(1.0, 1e-10).is_sign_positive());
    }

    #[test]
    fn contingency_table_rejects_inconsistent_counts() {
        assert!(contingency_table(1, 5, 20, 10).is_err());
        assert!(contingency_table(6, 5, 10, 100).is_err());
        assert!(contingency_table(3, 2, 10, 100).is_err());
        // n − k non-members drawn from only N − M = 2 of them
        assert!(contingency_table(0, 5, 8, 10).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_population() -> impl Strategy<Value = Vec<ScoredGene>> {
            prop::collection::vec(
                (prop::sample::select(MechanismLabel::ALL.to_vec()), 0.0f64..100.0),
                0..120,
            )
            .prop_map(|raw| {
                raw.into_iter()
                    .enumerate()
                    .map(|(i, (role, priority))| gene(i, role, priority))
                    .collect()
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn report_is_well_formed(genes in arb_population(), sample_size in 1usize..60) {
                let report = EnrichmentAnalyzer::default()
                    .with_sample_size(sample_size)
                    .run(&genes)
                    .unwrap();
                prop_assert_eq!(report.tested, report.rows.len());
                for row in &report.rows {
                    prop_assert_ne!(row.mechanism, MechanismLabel::PathwayComponent);
                    prop_assert!(row.background_count > 0);
                    prop_assert!(row.overlap_count <= row.background_count);
                    prop_assert!(row.overlap_count <= report.sample_size);
                    prop_assert!((0.0..=1.0).contains(&row.raw_p));
                    prop_assert!((0.0..=1.0).contains(&row.adj_p));
                    prop_assert!(row.adj_p >= row.raw_p);
                }
                for pair in report.rows.windows(2) {
                    prop_assert!(pair[0].adj_p <= pair[1].adj_p);
                }
            }
        }
    }
}
