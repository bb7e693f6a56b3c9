//! Fetches the [`ApplicationMetadata`] an application serves about itself.
//!
//! A 502 means the application is not reachable behind its proxy yet, so it is retried with
//! exponential backoff until the configured time budget runs out. Everything else fails right
//! away.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use gosoline_dashboard_config::config::{DashboardProviderConfig, MetadataRetryConfig};
use reqwest::StatusCode;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::app_id::AppId;
use crate::augment::augment;
use crate::clock::Clock;
use crate::errors::{MetadataFetchError, MetadataReaderError};
use crate::metadata::ApplicationMetadata;

#[cfg(test)]
#[path = "metadata_reader_test.rs"]
mod metadata_reader_test;

/// Turns an application identity into the url of its metadata endpoint.
pub type HostBuilder = Box<dyn Fn(&AppId) -> String + Send + Sync>;

pub struct MetadataReader {
    host_builder: HostBuilder,
    client: reqwest::Client,
    retry: MetadataRetryConfig,
    clock: Arc<dyn Clock>,
}

impl MetadataReader {
    /// A reader whose url is `hostname_pattern` augmented with the identity and `replacements`.
    pub fn new(
        hostname_pattern: String,
        replacements: BTreeMap<String, String>,
        client: reqwest::Client,
        retry: MetadataRetryConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let host_builder: HostBuilder =
            Box::new(move |app_id| augment(&hostname_pattern, app_id, &[&replacements]));
        Self::with_host_builder(host_builder, client, retry, clock)
    }

    pub fn with_host_builder(
        host_builder: HostBuilder,
        client: reqwest::Client,
        retry: MetadataRetryConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { host_builder, client, retry, clock }
    }

    pub fn from_config(
        config: &DashboardProviderConfig,
        client: reqwest::Client,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, MetadataReaderError> {
        if config.metadata.domain.is_empty() {
            return Err(MetadataReaderError::MissingDomain);
        }

        Ok(Self::new(
            config.name_patterns.hostname.clone(),
            config.metadata.hostname_replacements(),
            client,
            config.metadata.retry.clone(),
            clock,
        ))
    }

    pub fn url_for(&self, app_id: &AppId) -> String {
        (self.host_builder)(app_id)
    }

    /// Reads the metadata of `app_id`. Only a 502 response is retried; cancelling the token aborts
    /// both a running request and a pending retry.
    #[instrument(skip_all, fields(application = %app_id.application))]
    pub async fn read_metadata(
        &self,
        app_id: &AppId,
        cancellation_token: &CancellationToken,
    ) -> Result<ApplicationMetadata, MetadataReaderError> {
        let url = self.url_for(app_id);
        let started_at = self.clock.now();
        let mut delays = backoff(&self.retry);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!("Requesting application metadata from {url} (attempt {attempt}).");

            let result = tokio::select! {
                biased;
                _ = cancellation_token.cancelled() => {
                    return Err(MetadataReaderError::Cancelled { url });
                }
                result = self.fetch(&url) => result,
            };

            let cause = match result {
                Ok(metadata) => {
                    info!("Read application metadata from {url} after {attempt} attempt(s).");
                    return Ok(metadata);
                }
                Err(cause) if !cause.is_retryable() => {
                    return Err(MetadataReaderError::Fetch { url, cause });
                }
                Err(cause) => cause,
            };

            let delay = delays.next().unwrap_or(self.retry.max_interval);
            let elapsed = self.clock.now().saturating_duration_since(started_at);
            if elapsed + delay > self.retry.max_elapsed_time {
                warn!(
                    "Giving up on application metadata from {url} after {attempt} attempt(s) and \
                     {elapsed:?}."
                );
                return Err(MetadataReaderError::Fetch { url, cause });
            }

            warn!("Application metadata at {url} is not available yet, retrying in {delay:?}.");
            tokio::select! {
                biased;
                _ = cancellation_token.cancelled() => {
                    return Err(MetadataReaderError::Cancelled { url });
                }
                _ = self.clock.sleep(delay) => {}
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<ApplicationMetadata, MetadataFetchError> {
        let response = self.client.get(Url::parse(url)?).send().await?;
        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                Ok(serde_json::from_str(&body)?)
            }
            StatusCode::BAD_GATEWAY => Err(MetadataFetchError::NotYetAvailable),
            status => Err(MetadataFetchError::UnexpectedStatus(status.as_u16())),
        }
    }
}

/// Doubling delays starting at the initial interval, capped at the max interval.
fn backoff(retry: &MetadataRetryConfig) -> impl Iterator<Item = Duration> {
    // The strategy yields `factor * 2^n` for n >= 1, so the initial interval itself comes first.
    let initial_millis = u64::try_from(retry.initial_interval.as_millis()).unwrap_or(u64::MAX);
    std::iter::once(retry.initial_interval.min(retry.max_interval)).chain(
        ExponentialBackoff::from_millis(2).factor(initial_millis).max_delay(retry.max_interval),
    )
}
