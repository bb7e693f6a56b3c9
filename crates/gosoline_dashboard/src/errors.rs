use gosoline_dashboard_config::config::Orchestrator;
use thiserror::Error;

/// Configuration errors, raised before any panel is built.
#[derive(Debug, Error)]
pub enum ResourceNamesError {
    #[error("Invalid {field} '{value}': it must not contain '{{' or '}}'.")]
    InvalidAppId { field: &'static str, value: String },
    #[error("{field} is required for orchestrator {orchestrator} but is empty.")]
    MissingName { field: &'static str, orchestrator: Orchestrator },
}

/// The outcome of a single metadata request that did not succeed.
#[derive(Debug, Error)]
pub enum MetadataFetchError {
    #[error("got response code 502: metadata not yet available")]
    NotYetAvailable,
    #[error("unexpected response code {0}")]
    UnexpectedStatus(u16),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("invalid metadata body: {0}")]
    InvalidBody(#[from] serde_json::Error),
    #[error("invalid metadata url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl MetadataFetchError {
    /// Only an upstream that is not ready yet is worth asking again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MetadataFetchError::NotYetAvailable)
    }
}

#[derive(Debug, Error)]
pub enum MetadataReaderError {
    #[error("can not read application metadata from {url}: {cause}")]
    Fetch {
        url: String,
        #[source]
        cause: MetadataFetchError,
    },
    #[error("reading application metadata from {url} was cancelled")]
    Cancelled { url: String },
    #[error("metadata.domain is required to read application metadata.")]
    MissingDomain,
}
