//! Serial annotation crawl
//!
//! Visits the (source × entity) matrix source-major, entity-minor, with at
//! most one request outstanding. Every pair advances the schedule exactly
//! once, whether it succeeded, failed or was skipped; nothing is retried
//! here.

use serde::Serialize;
use std::time::Duration;

use super::status::{StatusEvent, StatusSink};
use super::{bounded, AnnotationTransport};
use crate::classifier::normalize;
use crate::models::{AnnotationResponse, Source};
use crate::store::AnnotationStore;
use crate::utils::error::PipelineError;

/// Outcome counts of one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,

    /// Records whose coordinates could not be read
    pub malformed: usize,
}

impl CrawlReport {
    pub fn visited(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

pub struct SerialCrawler<'a, T: ?Sized> {
    transport: &'a T,
    sources: &'a [Source],
    query_timeout: Option<Duration>,
    status: StatusSink,
}

impl<'a, T: AnnotationTransport + ?Sized> SerialCrawler<'a, T> {
    pub fn new(transport: &'a T, sources: &'a [Source]) -> Self {
        Self {
            transport,
            sources,
            query_timeout: None,
            status: StatusSink::disabled(),
        }
    }

    /// Fail queries that are still outstanding after `timeout`
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_status(mut self, status: StatusSink) -> Self {
        self.status = status;
        self
    }

    /// Crawl every source for every entity of the store
    pub async fn run(&self, store: &mut AnnotationStore) -> CrawlReport {
        let mut report = CrawlReport::default();

        tracing::info!(
            sources = self.sources.len(),
            entities = store.len(),
            "Starting annotation crawl"
        );

        for source in self.sources {
            for idx in 0..store.len() {
                let entity = &store.entities()[idx];
                let (id, name) = (entity.id.clone(), entity.name.clone());

                let Some(accession) = entity.queryable_accession().map(str::to_string) else {
                    tracing::debug!(
                        source = %source.name,
                        "{}",
                        PipelineError::MissingIdentifier {
                            id: id.clone(),
                            name: name.clone(),
                        }
                    );
                    self.status.emit(StatusEvent::Skipped { name, id });
                    report.skipped += 1;
                    continue;
                };

                self.status.emit(StatusEvent::Querying {
                    source: source.name.clone(),
                    accession: accession.clone(),
                    name: name.clone(),
                    id: id.clone(),
                });

                match self.query(source, &accession).await {
                    Ok(response) => {
                        if response.malformed > 0 {
                            let diagnostic = PipelineError::MalformedRecord {
                                source_name: source.name.clone(),
                                reason: format!(
                                    "{} record(s) with unreadable coordinates for {accession}",
                                    response.malformed
                                ),
                            };
                            tracing::warn!("{diagnostic}");
                            report.malformed += response.malformed;
                        }

                        let normalized = normalize(&source.name, &response);
                        tracing::debug!(
                            source = %source.name,
                            accession = %accession,
                            classified = normalized.classified,
                            ignored = normalized.ignored,
                            "Response classified"
                        );
                        store.attach_bundle(idx, &source.name, normalized.bundle);
                        report.succeeded += 1;
                    }
                    Err(e) => {
                        self.status.emit(StatusEvent::QueryFailed {
                            source: source.name.clone(),
                            accession,
                            name,
                            id,
                            reason: e.to_string(),
                        });
                        report.failed += 1;
                    }
                }
            }

            self.status.emit(StatusEvent::SourceComplete {
                source: source.name.clone(),
            });
        }

        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            "Annotation crawl finished"
        );
        self.status.emit(StatusEvent::CrawlComplete);

        report
    }

    async fn query(
        &self,
        source: &Source,
        accession: &str,
    ) -> Result<AnnotationResponse, PipelineError> {
        bounded(
            self.query_timeout,
            self.transport.fetch_annotations(source, accession),
        )
        .await
        .map_err(|error| PipelineError::SourceQueryFailed {
            source_name: source.name.clone(),
            accession: accession.to_string(),
            error,
        })
    }
}
