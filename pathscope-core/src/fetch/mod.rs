pub mod cache;
pub mod kegg;
pub mod traits;

pub use cache::CachedSource;
pub use kegg::KeggClient;
pub use traits::RecordSource;
