// KEGG-style REST fetcher: one GET to `{base}/get/{id}`, no retry.

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

use crate::config::FetchSection;
use crate::error::FetchError;

use super::traits::RecordSource;

/// HTTP client for a flat-file pathway REST endpoint.
#[derive(Debug)]
pub struct KeggClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl KeggClient {
    /// Build a client from the `[fetch]` config section.
    pub fn new(config: &FetchSection) -> crate::error::Result<Self> {
        // reqwest is built without a bundled crypto provider; another caller
        // may already have installed one, which is fine.
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// URL of the record for `pathway_id`.
    pub fn record_url(&self, pathway_id: &str) -> String {
        format!("{}/get/{}", self.base_url, pathway_id.trim())
    }

    fn transport_error(&self, pathway_id: &str, err: &reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                pathway_id: pathway_id.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            FetchError::Network {
                pathway_id: pathway_id.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait::async_trait]
impl RecordSource for KeggClient {
    fn name(&self) -> &'static str {
        "kegg"
    }

    #[instrument(skip(self), name = "kegg_fetch")]
    async fn fetch(&self, pathway_id: &str) -> crate::error::Result<String> {
        let start = Instant::now();
        let url = self.record_url(pathway_id);
        debug!(url = %url, "Pathway record request");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(pathway_id, &e))?;

        let status = resp.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), url = %url, "Pathway record fetch failed");
            return Err(FetchError::Status {
                pathway_id: pathway_id.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let body = resp
            .text()
            .await
            .map_err(|e| self.transport_error(pathway_id, &e))?;

        info!(
            bytes = body.len(),
            duration = ?start.elapsed(),
            "Fetched pathway record"
        );
        Ok(body)
    }
}
