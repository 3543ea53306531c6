//! DAS fetcher with rate limiting
//!
//! This module provides the HTTP implementation of [`AnnotationTransport`]:
//! - Rate limiting with governor, shared by every source
//! - Optional retry with exponential backoff on 429/5xx
//! - DASGFF and DASSEQUENCE decoding

use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{header::ACCEPT, Client};
use std::num::NonZeroU32;
use url::Url;

use super::AnnotationTransport;
use crate::config::Config;
use crate::models::{AnnotationResponse, SequenceRecord, Source};
use crate::parser::{parse_features, parse_sequence};
use crate::utils::das_query_url;
use crate::utils::error::FetchError;
use crate::utils::retry::{with_retry_if, RetryConfig};

/// HTTP client for DAS feature and sequence endpoints
pub struct DasFetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Retry policy for transient failures
    retry: RetryConfig,

    /// DAS sequence endpoint
    sequence_url: String,
}

impl DasFetcher {
    /// Create a fetcher from the transport and sequence configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(&config.transport.user_agent)
            .timeout(config.request_timeout())
            .gzip(true)
            .build()?;

        let rate = NonZeroU32::new(config.transport.rate_limit).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        let retry = RetryConfig::with_delays(
            config.transport.max_retries,
            config.transport.base_delay_ms,
            RetryConfig::default().max_delay_ms,
        );

        Ok(Self {
            client,
            rate_limiter,
            retry,
            sequence_url: config.sequence.url.clone(),
        })
    }

    /// Point sequence lookups at another endpoint
    pub fn with_sequence_url(mut self, url: impl Into<String>) -> Self {
        self.sequence_url = url.into();
        self
    }

    fn query_url(endpoint: &str, accession: &str) -> Result<Url, FetchError> {
        das_query_url(endpoint, accession)
            .map_err(|e| FetchError::InvalidUrl(format!("{endpoint}: {e}")))
    }

    /// GET a DAS document, honouring the rate limit and retry policy
    async fn fetch_document(&self, url: &Url) -> Result<String, FetchError> {
        with_retry_if(
            &self.retry,
            move || async move {
                self.rate_limiter.until_ready().await;
                self.fetch_once(url).await
            },
            FetchError::is_recoverable,
        )
        .await
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, FetchError> {
        tracing::debug!(url = %url, "Fetching DAS document");

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/xml, text/xml")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl AnnotationTransport for DasFetcher {
    async fn fetch_annotations(
        &self,
        source: &Source,
        accession: &str,
    ) -> Result<AnnotationResponse, FetchError> {
        let url = Self::query_url(&source.url, accession)?;
        let body = self.fetch_document(&url).await?;
        Ok(parse_features(&body)?)
    }

    async fn fetch_sequence(&self, accession: &str) -> Result<SequenceRecord, FetchError> {
        let url = Self::query_url(&self.sequence_url, accession)?;
        let body = self.fetch_document(&url).await?;
        Ok(parse_sequence(&body)?)
    }
}
