// Memoizing wrapper: successful fetches are kept by pathway id.
// Failures are never cached, so the next call retries from scratch.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::traits::RecordSource;

#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    memo: Mutex<HashMap<String, String>>,
}

impl<S: RecordSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            memo: Mutex::new(HashMap::new()),
        }
    }

    /// Number of memoized records.
    pub fn len(&self) -> usize {
        self.memo.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the memoized record for one id.
    pub fn invalidate(&self, pathway_id: &str) {
        self.memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(pathway_id);
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn lookup(&self, pathway_id: &str) -> Option<String> {
        self.memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pathway_id)
            .cloned()
    }
}

#[async_trait::async_trait]
impl<S: RecordSource> RecordSource for CachedSource<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn fetch(&self, pathway_id: &str) -> crate::error::Result<String> {
        if let Some(hit) = self.lookup(pathway_id) {
            debug!(pathway_id, "Pathway record cache hit");
            return Ok(hit);
        }

        let body = self.inner.fetch(pathway_id).await?;
        self.memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pathway_id.to_string(), body.clone());
        Ok(body)
    }
}
