//! End-to-end annotation pipeline
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Sequence   │     │   Serial    │     │ Classifier  │     │   Rollup    │
//! │  backfill   │────▶│   crawl     │────▶│  + store    │────▶│  + menus    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!   fan-out/join        one request          per response        on terminal
//!                        at a time                                  event
//! ```

use serde::Serialize;

use super::backfill::{BackfillReport, SequenceBackfill};
use super::fetcher::DasFetcher;
use super::serial::{CrawlReport, SerialCrawler};
use super::status::StatusSink;
use super::AnnotationTransport;
use crate::config::Config;
use crate::models::Entity;
use crate::rollup::{AnnotationRollup, Menu};
use crate::store::AnnotationStore;

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub entities: Vec<Entity>,
    pub backfill: BackfillReport,
    pub crawl: CrawlReport,
    pub rollup: AnnotationRollup,
    pub positional_menu: Menu,
    pub keyword_menu: Menu,
}

impl PipelineOutput {
    /// Pretty-printed JSON report of the run
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct Pipeline<T> {
    transport: T,
    config: Config,
    status: StatusSink,
}

impl Pipeline<DasFetcher> {
    /// Pipeline over live DAS endpoints
    pub fn connect(config: Config) -> crate::error::Result<Self> {
        let fetcher = DasFetcher::new(&config)?;
        Ok(Self::new(fetcher, config))
    }
}

impl<T: AnnotationTransport> Pipeline<T> {
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
            config,
            status: StatusSink::disabled(),
        }
    }

    pub fn with_status(mut self, status: StatusSink) -> Self {
        self.status = status;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Backfill sequences, crawl every source, then build the rollup
    pub async fn run(&self, entities: Vec<Entity>) -> PipelineOutput {
        let mut store = AnnotationStore::new(entities);

        let backfill = SequenceBackfill::new(&self.transport)
            .with_fallback(self.config.sequence.fallback.clone())
            .with_query_timeout(self.config.query_timeout())
            .with_status(self.status.clone())
            .run(store.entities_mut())
            .await;

        let crawl = SerialCrawler::new(&self.transport, &self.config.sources)
            .with_query_timeout(self.config.query_timeout())
            .with_status(self.status.clone())
            .run(&mut store)
            .await;

        let rollup = AnnotationRollup::build(store.entities());
        tracing::info!(
            positional_sources = rollup.positional.len(),
            keyword_sources = rollup.keywords.len(),
            "Rollup rebuilt"
        );

        PipelineOutput {
            positional_menu: rollup.positional_menu(),
            keyword_menu: rollup.keyword_menu(),
            entities: store.into_entities(),
            backfill,
            crawl,
            rollup,
        }
    }
}
