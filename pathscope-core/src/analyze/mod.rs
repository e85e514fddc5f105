pub mod enrichment;
pub mod interactome;
pub mod traits;

pub use enrichment::{EnrichmentAnalyzer, EnrichmentReport};
pub use interactome::{Interactome, InteractomeBuilder, InteractomeSummary};
pub use traits::Analyzer;
