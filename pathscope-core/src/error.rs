/// Top-level pathscope error type.
///
/// All fallible operations in `pathscope-core` return [`Result<T, PathscopeError>`](Result).
/// Each variant wraps a stage-specific error enum, allowing callers to
/// match on the error source without losing type information.
///
/// Parsing never fails: malformed record lines are skipped and counted,
/// and a record with no genes is a valid (empty) outcome.
#[derive(thiserror::Error, Debug)]
pub enum PathscopeError {
    /// The pathway record could not be retrieved.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error during analysis (interactome, enrichment).
    #[error("Analysis error: {0}")]
    Analyze(#[from] AnalyzeError),

    /// Error writing exports (CSV, JSON, Markdown).
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from the record fetcher. Any of these is fatal to a pipeline run
/// and must never be treated as "zero genes".
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// Connection-level failure (DNS, refused, reset, TLS).
    #[error("Network error fetching {pathway_id}: {message}")]
    Network {
        /// Identifier that was being fetched.
        pathway_id: String,
        /// Description of the transport failure.
        message: String,
    },

    /// The endpoint answered with a status other than 200.
    #[error("Pathway API returned HTTP {status} for {pathway_id}")]
    Status {
        /// Identifier that was being fetched.
        pathway_id: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request did not complete within the configured timeout.
    #[error("Timed out after {secs}s fetching {pathway_id}")]
    Timeout {
        /// Identifier that was being fetched.
        pathway_id: String,
        /// Configured timeout in seconds.
        secs: u64,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Errors during the analysis stages.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    /// A parameter is outside the range the analysis supports.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Algorithmic or numerical error during computation.
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Errors writing rendered output.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem I/O error writing rendered output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendered bytes were not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Errors in pathscope configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),

    /// The condition is not in the catalog and no pathway id was given.
    #[error("Unknown condition: {0}")]
    UnknownCondition(String),
}

/// Convenience alias for `Result<T, PathscopeError>`.
pub type Result<T> = std::result::Result<T, PathscopeError>;
