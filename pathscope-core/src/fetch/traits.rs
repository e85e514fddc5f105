/// Common interface for anything that can supply a raw pathway record.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable name for this source.
    fn name(&self) -> &'static str;

    /// Retrieve the raw flat-text record for `pathway_id`.
    ///
    /// A failed fetch is always an error, never an empty record.
    async fn fetch(&self, pathway_id: &str) -> crate::error::Result<String>;
}
