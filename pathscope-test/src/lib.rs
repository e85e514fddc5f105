// Integration test utilities and fixtures for pathscope.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use pathscope_core::config::PathscopeConfig;
use pathscope_core::error::FetchError;
use pathscope_core::fetch::RecordSource;

// ── Records ──────────────────────────────────────────────────────

/// Huntington disease record: 30 unique genes, one duplicate HTT line and
/// one malformed line.
pub const HD_RECORD: &str = "\
ENTRY       hsa05016                    Pathway
NAME        Huntington disease - Homo sapiens (human)
DESCRIPTION Huntington disease (HD) is an autosomal-dominant neurodegenerative disorder.
CLASS       Human Diseases; Neurodegenerative disease
GENE        3064  HTT; huntingtin [KO:K04533]
            9001  HAP1; huntingtin associated protein 1 [KO:K04647]
            3092  HIP1; huntingtin interacting protein 1 [KO:K04559]
            5978  REST; RE1 silencing transcription factor [KO:K09223]
            10891  PPARGC1A; PPARG coactivator 1 alpha [KO:K07202]
            627  BDNF; brain derived neurotrophic factor [KO:K04355]
            1385  CREB1; cAMP responsive element binding protein 1 [KO:K05870]
            7157  TP53; tumor protein p53 [KO:K04451]
            836  CASP3; caspase 3 [KO:K02187]
            842  CASP9; caspase 9 [KO:K04399]
            841  CASP8; caspase 8 [KO:K04398]
            54205  CYCS; cytochrome c, somatic [KO:K08738]
            317  APAF1; apoptotic peptidase activating factor 1 [KO:K02084]
            581  BAX; BCL2 associated X, apoptosis regulator [KO:K02159]
            4535  ND1; NADH dehydrogenase subunit 1, mitochondrially encoded [KO:K03878]
            4720  NDUFS1; NADH:ubiquinone oxidoreductase core subunit S1 [KO:K03934]
            509  ATP5F1C; ATP synthase F1 subunit gamma [KO:K02115]
            513  ATP5F1D; ATP synthase F1 subunit delta [KO:K02134]
            7416  VDAC1; voltage dependent anion channel 1 [KO:K05862]
            2902  GRIN1; glutamate ionotropic receptor NMDA type subunit 1 [KO:K05208]
            2904  GRIN2B; glutamate ionotropic receptor NMDA type subunit 2B [KO:K05210]
            2911  GRM1; glutamate metabotropic receptor 1 [KO:K04603]
            6616  SNAP25; synaptosome associated protein 25 [KO:K18211]
            5682  PSMA1; proteasome 20S subunit alpha 1 [KO:K02725]
            5683  PSMA2; proteasome 20S subunit alpha 2 [KO:K02726]
            5700  PSMC1; proteasome 26S subunit, ATPase 1 [KO:K03062]
            9140  ATG12; autophagy related 12 [KO:K08336]
            8678  BECN1; beclin 1 [KO:K08334]
            6647  SOD1; superoxide dismutase 1 [KO:K04565]
            10013  HDAC6; histone deacetylase 6 [KO:K11407]
            3064  HTT; huntingtin [KO:K04533]
            see map05016 for the full diagram
COMPOUND    C00025  L-Glutamate
REFERENCE   PMID:8458085
AUTHORS     The Huntington's Disease Collaborative Research Group
";

/// Unique genes in [`HD_RECORD`] after first-wins deduplication.
pub const HD_UNIQUE_GENES: usize = 30;

/// The two-gene record used throughout the scoring examples.
pub const TWO_GENE_RECORD: &str = "\
ENTRY       hsa05016                    Pathway
GENE        1234  HTT; huntingtin
            5678  BDNF; brain-derived neurotrophic factor, synaptic plasticity
COMPOUND    C00001  H2O
";

/// A record whose GENE section is present but empty.
pub const EMPTY_GENE_RECORD: &str = "\
ENTRY       hsa00000                    Pathway
NAME        Nothing to see
GENE
COMPOUND    C00001  H2O
";

/// Default config pointed at `base_url` with a short timeout.
pub fn config_for(base_url: &str) -> PathscopeConfig {
    let mut config = PathscopeConfig::default();
    config.fetch.base_url = base_url.to_string();
    config.fetch.timeout_secs = 5;
    config
}

// ── In-memory source ─────────────────────────────────────────────

/// Serves records from memory. Unknown ids answer like a 404.
#[derive(Debug, Default)]
pub struct StaticSource {
    records: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, pathway_id: &str, record: &str) -> Self {
        self.records
            .insert(pathway_id.to_string(), record.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RecordSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self, pathway_id: &str) -> pathscope_core::error::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records.get(pathway_id).cloned().ok_or_else(|| {
            FetchError::Status {
                pathway_id: pathway_id.to_string(),
                status: 404,
            }
            .into()
        })
    }
}

// ── Local HTTP responder ─────────────────────────────────────────

/// Minimal HTTP/1.1 server on 127.0.0.1 that answers every request with
/// one fixed status and body, and records the request paths it saw.
#[derive(Debug)]
pub struct LocalResponder {
    addr: SocketAddr,
    paths: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl LocalResponder {
    pub async fn start(status: u16, body: &str) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let paths = Arc::new(Mutex::new(Vec::new()));
        let response = http_response(status, body);

        let seen = Arc::clone(&paths);
        let task = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let Some(path) = read_request_path(&mut socket).await else {
                    continue;
                };
                seen.lock().unwrap_or_else(PoisonError::into_inner).push(path);
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Ok(Self { addr, paths, task })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request paths in arrival order.
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for LocalResponder {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn http_response(status: u16, body: &str) -> String {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Read the request head and return the path from its request line.
async fn read_request_path(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}
