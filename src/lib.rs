//! protanno - Protein annotation aggregator
//!
//! Collects annotations for a set of protein entities from several DAS
//! sources and normalizes them into keywords, positional features and notes.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Sequence backfill, serial annotation crawl and DAS transport
//! - [`classifier`] - Per-source classification of raw annotation records
//! - [`store`] - Entities and their per-source bundles
//! - [`rollup`] - Cross-entity category counts and selection menus
//! - [`highlight`] - Search-term markup for rendered text
//! - [`render`] - Annotation panel rendering
//! - [`parser`] - DAS XML and MI-JSON decoding
//! - [`models`] - Core data structures and types
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use protanno::config::Config;
//! use protanno::crawler::Pipeline;
//! use protanno::parser::read_entities;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let entities = read_entities(Path::new("interactors.json")).await?;
//!     let pipeline = Pipeline::connect(config)?;
//!     let output = pipeline.run(entities).await;
//!     println!("{} annotation lookups succeeded", output.crawl.succeeded);
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod crawler;
pub mod error;
pub mod highlight;
pub mod models;
pub mod parser;
pub mod render;
pub mod rollup;
pub mod store;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::classifier::{classify, normalize, Fragment};
    pub use crate::config::Config;
    pub use crate::crawler::{AnnotationTransport, DasFetcher, Pipeline, StatusEvent, StatusSink};
    pub use crate::error::{Error, ErrorCategory, ProtannoErrorTrait, Result};
    pub use crate::highlight::Highlighter;
    pub use crate::models::{Bundle, Entity, RawRecord, Source};
    pub use crate::rollup::AnnotationRollup;
    pub use crate::store::AnnotationStore;
}

// Direct re-exports for convenience
pub use models::{Bundle, Entity, Source};
