//! Operator-facing progress messages
//!
//! Both schedulers report every step as a [`StatusEvent`], in scheduling
//! order. [`StatusEvent::CrawlComplete`] is the terminal event; consumers
//! rebuild the rollup and menus when they see it.

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StatusEvent {
    /// Sequence lookups still outstanding
    BackfillWaiting { pending: Vec<String> },

    /// A sequence lookup failed and the fallback was applied
    SequenceFailed { accession: String, reason: String },

    /// Every sequence lookup has returned
    BackfillComplete { fallbacks: usize },

    /// Annotation request issued for one (entity, source) pair
    Querying {
        source: String,
        accession: String,
        name: String,
        id: String,
    },

    /// Entity without a queryable accession
    Skipped { name: String, id: String },

    /// Annotation request failed
    QueryFailed {
        source: String,
        accession: String,
        name: String,
        id: String,
        reason: String,
    },

    /// Every entity has been visited for a source
    SourceComplete { source: String },

    /// Every (entity, source) pair has been visited
    CrawlComplete,
}

impl StatusEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::SequenceFailed { .. } | Self::QueryFailed { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CrawlComplete)
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackfillWaiting { pending } => {
                write!(f, "Waiting on sequence DAS response for: {}", pending.join(","))
            }
            Self::SequenceFailed { accession, reason } => {
                write!(f, "Sequence DAS lookup FAILED for {accession}: {reason}")
            }
            Self::BackfillComplete { fallbacks: 0 } => write!(f, "All sequences downloaded from DAS"),
            Self::BackfillComplete { .. } => write!(f, "All DAS sequence queries returned"),
            Self::Querying {
                source,
                accession,
                name,
                id,
            } => write!(f, "Waiting on {source} DAS for {accession} (name: {name} id:{id})"),
            Self::Skipped { name, id } => write!(
                f,
                "No accession number for {name} (id:{id}), hence no DAS annotations."
            ),
            Self::QueryFailed {
                source,
                accession,
                name,
                id,
                ..
            } => write!(f, "FAILED {source} DAS lookup {accession} (name: {name} id:{id})"),
            Self::SourceComplete { source } => write!(f, "{source} DAS complete."),
            Self::CrawlComplete => write!(f, "All DAS complete."),
        }
    }
}

/// Sending half of the status stream
///
/// Every event is mirrored to tracing; a disabled sink only logs.
#[derive(Debug, Clone, Default)]
pub struct StatusSink {
    tx: Option<mpsc::UnboundedSender<StatusEvent>>,
}

impl StatusSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StatusEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: StatusEvent) {
        match &event {
            StatusEvent::QueryFailed { reason, .. } => {
                tracing::warn!(reason = %reason, "{event}");
            }
            StatusEvent::SequenceFailed { .. } => tracing::warn!("{event}"),
            _ => tracing::info!("{event}"),
        }

        if let Some(tx) = &self.tx {
            // Receiver gone means nobody is listening any more
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let skipped = StatusEvent::Skipped {
            name: "orphan".to_string(),
            id: "7".to_string(),
        };
        assert_eq!(
            skipped.to_string(),
            "No accession number for orphan (id:7), hence no DAS annotations."
        );

        let done = StatusEvent::SourceComplete {
            source: "Pfam".to_string(),
        };
        assert_eq!(done.to_string(), "Pfam DAS complete.");
        assert_eq!(StatusEvent::CrawlComplete.to_string(), "All DAS complete.");
        assert!(StatusEvent::CrawlComplete.is_terminal());
    }

    #[test]
    fn test_backfill_completion_message_depends_on_fallbacks() {
        assert_eq!(
            StatusEvent::BackfillComplete { fallbacks: 0 }.to_string(),
            "All sequences downloaded from DAS"
        );
        assert_eq!(
            StatusEvent::BackfillComplete { fallbacks: 2 }.to_string(),
            "All DAS sequence queries returned"
        );
    }

    #[tokio::test]
    async fn test_sink_delivers_in_order() {
        let (sink, mut rx) = StatusSink::channel();
        sink.emit(StatusEvent::SourceComplete {
            source: "GO".to_string(),
        });
        sink.emit(StatusEvent::CrawlComplete);
        drop(sink);

        assert_eq!(
            rx.recv().await,
            Some(StatusEvent::SourceComplete {
                source: "GO".to_string()
            })
        );
        assert_eq!(rx.recv().await, Some(StatusEvent::CrawlComplete));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_disabled_sink_does_not_panic() {
        StatusSink::disabled().emit(StatusEvent::CrawlComplete);
    }
}
