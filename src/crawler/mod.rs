//! Annotation acquisition
//!
//! This module drives the remote lookups of a run:
//! - [`backfill`]: concurrent sequence lookups joined by a barrier
//! - [`serial`]: the one-request-at-a-time annotation crawl
//! - [`fetcher`]: the HTTP/DAS transport both of them use
//! - [`pipeline`]: backfill, crawl and rollup chained together

pub mod backfill;
pub mod fetcher;
pub mod pipeline;
pub mod serial;
pub mod status;

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::models::{AnnotationResponse, SequenceRecord, Source};
use crate::utils::error::FetchError;

pub use backfill::{BackfillReport, JoinBarrier, SequenceBackfill};
pub use fetcher::DasFetcher;
pub use pipeline::{Pipeline, PipelineOutput};
pub use serial::{CrawlReport, SerialCrawler};
pub use status::{StatusEvent, StatusSink};

/// Remote lookups the schedulers depend on
///
/// Retries, rate limiting and wire decoding are the implementor's business;
/// the schedulers only see a result or a failure.
#[async_trait]
pub trait AnnotationTransport: Send + Sync {
    /// Fetch every annotation `source` holds for `accession`
    async fn fetch_annotations(
        &self,
        source: &Source,
        accession: &str,
    ) -> Result<AnnotationResponse, FetchError>;

    /// Fetch the sequence of `accession`
    async fn fetch_sequence(&self, accession: &str) -> Result<SequenceRecord, FetchError>;
}

/// Await a query, turning an expired deadline into a timeout failure
pub(crate) async fn bounded<T, F>(timeout: Option<Duration>, query: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, query)
            .await
            .map_err(|_| FetchError::Timeout)?,
        None => query.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_without_limit() {
        let result = tokio_test::block_on(bounded(None, async { Ok::<_, FetchError>(7) }));
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_expires() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, FetchError>(())
        };
        let result = bounded(Some(Duration::from_secs(1)), slow).await;
        assert!(matches!(result, Err(FetchError::Timeout)));
    }
}
