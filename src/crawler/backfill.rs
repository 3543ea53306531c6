//! Concurrent sequence backfill
//!
//! Entities that arrive without a sequence are looked up all at once. Each
//! lookup owns the one entity it updates; the only shared state is the
//! [`JoinBarrier`] pending set, which releases its continuation exactly
//! once when the last lookup returns.
//!
//! Without a configured query timeout a lookup that never returns holds the
//! barrier forever.

use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;

use super::status::{StatusEvent, StatusSink};
use super::{bounded, AnnotationTransport};
use crate::models::{Entity, SequenceRecord, MISSING_SEQUENCE};
use crate::utils::error::PipelineError;

/// What one arrival at the barrier observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    /// Ids still pending after this arrival
    pub remaining: Vec<String>,

    /// True for the single arrival that emptied the pending set
    pub released: bool,
}

#[derive(Debug)]
struct BarrierState {
    pending: BTreeSet<String>,
    release: Option<oneshot::Sender<()>>,
}

/// Pending set plus a completion signal fired exactly once
#[derive(Debug)]
pub struct JoinBarrier {
    state: Mutex<BarrierState>,
}

impl JoinBarrier {
    /// Create a barrier over `ids` and the receiver of its completion
    ///
    /// An empty id set is released immediately.
    pub fn new<I, S>(ids: I) -> (Self, oneshot::Receiver<()>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, rx) = oneshot::channel();
        let pending: BTreeSet<String> = ids.into_iter().map(Into::into).collect();

        let release = if pending.is_empty() {
            let _ = tx.send(());
            None
        } else {
            Some(tx)
        };

        let barrier = Self {
            state: Mutex::new(BarrierState { pending, release }),
        };
        (barrier, rx)
    }

    /// Record that the lookup for `id` returned
    ///
    /// Unknown or repeated ids leave the pending set untouched and never
    /// release the barrier a second time.
    pub fn arrive(&self, id: &str) -> Arrival {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.pending.remove(id);

        let released = state.pending.is_empty()
            && match state.release.take() {
                Some(tx) => {
                    let _ = tx.send(());
                    true
                }
                None => false,
            };

        Arrival {
            remaining: state.pending.iter().cloned().collect(),
            released,
        }
    }

    pub fn pending(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .len()
    }
}

/// Outcome counts of one backfill
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    /// Sequences obtained from the transport
    pub fetched: usize,

    /// Lookups that failed and received the fallback
    pub fallbacks: usize,

    /// Entities without a queryable accession, given the fallback directly
    pub unqueryable: usize,
}

pub struct SequenceBackfill<'a, T: ?Sized> {
    transport: &'a T,
    fallback: String,
    query_timeout: Option<Duration>,
    status: StatusSink,
}

impl<'a, T: AnnotationTransport + ?Sized> SequenceBackfill<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self {
            transport,
            fallback: MISSING_SEQUENCE.to_string(),
            query_timeout: None,
            status: StatusSink::disabled(),
        }
    }

    /// Value stored for entities whose lookup failed
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_status(mut self, status: StatusSink) -> Self {
        self.status = status;
        self
    }

    /// Fill in every missing sequence, returning once all lookups are back
    pub async fn run(&self, entities: &mut [Entity]) -> BackfillReport {
        let mut report = BackfillReport::default();

        for entity in entities.iter_mut().filter(|e| e.sequence.is_none()) {
            if entity.queryable_accession().is_none() {
                entity.init_sequence(self.fallback.clone(), None);
                report.unqueryable += 1;
            }
        }

        let (barrier, released) = JoinBarrier::new(
            entities
                .iter()
                .filter(|e| e.sequence.is_none())
                .map(|e| e.id.clone()),
        );
        let pending = barrier.pending();
        if pending == 0 {
            return report;
        }

        tracing::info!(pending, "Starting sequence backfill");
        self.status.emit(StatusEvent::BackfillWaiting {
            pending: entities
                .iter()
                .filter(|e| e.sequence.is_none())
                .map(|e| e.id.clone())
                .collect(),
        });

        let barrier = &barrier;
        let lookups = entities
            .iter_mut()
            .filter(|e| e.sequence.is_none())
            .map(move |entity| async move {
                let fetched = match self.lookup(entity).await {
                    Ok(record) => {
                        entity.init_sequence(record.sequence, record.label.as_deref());
                        true
                    }
                    Err(e) => {
                        if let PipelineError::SequenceLookupFailed { accession, error } = &e {
                            self.status.emit(StatusEvent::SequenceFailed {
                                accession: accession.clone(),
                                reason: error.to_string(),
                            });
                        }
                        entity.init_sequence(self.fallback.clone(), None);
                        false
                    }
                };

                let arrival = barrier.arrive(&entity.id);
                if !arrival.released {
                    self.status.emit(StatusEvent::BackfillWaiting {
                        pending: arrival.remaining,
                    });
                }
                fetched
            });

        let outcomes = join_all(lookups).await;
        report.fetched = outcomes.iter().filter(|&&fetched| fetched).count();
        report.fallbacks = outcomes.len() - report.fetched;

        // Every lookup has arrived, so the barrier has fired
        let _ = released.await;
        self.status.emit(StatusEvent::BackfillComplete {
            fallbacks: report.fallbacks,
        });

        report
    }

    async fn lookup(&self, entity: &Entity) -> Result<SequenceRecord, PipelineError> {
        let accession = entity.queryable_accession().unwrap_or(&entity.id);
        bounded(self.query_timeout, self.transport.fetch_sequence(accession))
            .await
            .map_err(|error| PipelineError::SequenceLookupFailed {
                accession: accession.to_string(),
                error,
            })
    }
}
