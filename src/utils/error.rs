//! Error types for the protanno pipeline
//!
//! This module defines the domain errors used by the transport, the DAS
//! decoders and the schedulers.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Response body could not be decoded
    #[error("Decoding error: {0}")]
    Decode(#[from] ParseError),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether a retry could plausibly succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::ServerError(status) => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Decode(_) | Self::InvalidUrl(_) => false,
        }
    }
}

/// Errors that can occur while decoding DAS documents or input files
#[derive(Error, Debug)]
pub enum ParseError {
    /// XML could not be deserialized
    #[error("Malformed {document} document: {reason}")]
    MalformedXml { document: &'static str, reason: String },

    /// Sequence document without a SEQUENCE element
    #[error("No sequence found in response")]
    SequenceNotFound,

    /// Input JSON could not be read
    #[error("Malformed interactor data: {0}")]
    MalformedInput(String),
}

/// Entity/source scoped pipeline failures
///
/// None of these abort a crawl; they are reported on the status stream and
/// scheduling moves on.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Entity has no queryable accession
    #[error("No accession number for {name} (id: {id})")]
    MissingIdentifier { id: String, name: String },

    /// Transport failure for one (entity, source) pair
    #[error("{source_name} lookup failed for {accession}: {error}")]
    SourceQueryFailed {
        source_name: String,
        accession: String,
        #[source]
        error: FetchError,
    },

    /// Sequence backfill failure for one entity
    #[error("Sequence lookup failed for {accession}: {error}")]
    SequenceLookupFailed {
        accession: String,
        #[source]
        error: FetchError,
    },

    /// Record with unreadable sub-fields, defaulted rather than rejected
    #[error("Malformed record from {source_name}: {reason}")]
    MalformedRecord { source_name: String, reason: String },
}

impl PipelineError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::SourceQueryFailed { error, .. } | Self::SequenceLookupFailed { error, .. } => {
                error.is_recoverable()
            }
            Self::MissingIdentifier { .. } | Self::MalformedRecord { .. } => false,
        }
    }
}
