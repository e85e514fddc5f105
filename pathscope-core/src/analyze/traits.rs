use crate::types::ScoredGene;

/// Common interface for analyses over one scored-gene snapshot.
pub trait Analyzer {
    /// What the analysis produces.
    type Output;

    /// Human-readable name for this analyzer.
    fn name(&self) -> &'static str;

    /// Run the analysis. The input is read-only; every call derives a fresh output.
    fn analyze(&self, genes: &[ScoredGene]) -> crate::error::Result<Self::Output>;
}
