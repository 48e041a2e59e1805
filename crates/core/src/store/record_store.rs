//! The record store.
//!
//! Holds the current [`Document`] as an immutable snapshot and funnels every
//! write through [`RecordStore::mutate`]: clone the snapshot, apply the
//! change, persist, swap the snapshot in, then notify subscribers. Writes are
//! serialised by an async mutex, so two mutations touching the same account
//! never lose each other's funding delta.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info, warn};

use super::document::Document;
use super::store_traits::DocumentRepositoryTrait;
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink, ReplaceReason};

pub type SubscriptionId = u64;

/// Outcome of a mutation closure: a value for the caller plus the events to
/// publish. A change without events is treated as a no-op and not persisted.
#[derive(Debug)]
pub struct Change<T> {
    pub value: T,
    pub events: Vec<DomainEvent>,
}

impl<T> Change<T> {
    pub fn new(value: T, events: Vec<DomainEvent>) -> Self {
        Self { value, events }
    }

    pub fn unchanged(value: T) -> Self {
        Self {
            value,
            events: Vec::new(),
        }
    }
}

/// Result of [`RecordStore::mutate`]: the closure's value and the snapshot
/// it produced.
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub snapshot: Arc<Document>,
}

pub struct RecordStore {
    repository: Arc<dyn DocumentRepositoryTrait>,
    document: RwLock<Arc<Document>>,
    write_gate: tokio::sync::Mutex<()>,
    subscribers: RwLock<Vec<(SubscriptionId, Arc<dyn DomainEventSink>)>>,
    next_subscription: AtomicU64,
    revision: AtomicU64,
}

impl RecordStore {
    /// Loads the stored document. A missing document starts from the seed;
    /// a malformed one is logged and replaced by the seed.
    pub fn open(repository: Arc<dyn DocumentRepositoryTrait>) -> Result<Self> {
        let document = match repository.load()? {
            Some(payload) => match Document::from_json(&payload) {
                Ok(document) => document,
                Err(e) => {
                    warn!("Stored document is malformed, starting from a fresh one: {}", e);
                    Document::seed()
                }
            },
            None => {
                info!("No stored document found, starting from a fresh one");
                Document::seed()
            }
        };

        Ok(Self {
            repository,
            document: RwLock::new(Arc::new(document)),
            write_gate: tokio::sync::Mutex::new(()),
            subscribers: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
            revision: AtomicU64::new(0),
        })
    }

    /// Current snapshot. Cheap; never blocks on writers.
    pub fn snapshot(&self) -> Arc<Document> {
        self.document
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of snapshots installed since the store was opened.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self, sink: Arc<dyn DomainEventSink>) -> SubscriptionId {
        let id = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, sink));
        id
    }

    /// Returns false when the subscription was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    /// Applies `f` to a copy of the current document and, if it reports
    /// events, persists and publishes the result.
    ///
    /// When `f` or the save fails, the current snapshot is left untouched.
    pub async fn mutate<T, F>(&self, f: F) -> Result<Mutation<T>>
    where
        F: FnOnce(&mut Document) -> Result<Change<T>>,
    {
        let _guard = self.write_gate.lock().await;
        let mut draft = Document::clone(&self.snapshot());
        let Change { value, events } = f(&mut draft)?;

        if events.is_empty() {
            return Ok(Mutation {
                value,
                snapshot: self.snapshot(),
            });
        }

        self.repository.save(draft.to_json()?).await?;
        let snapshot = self.install(draft);
        self.publish(events);
        Ok(Mutation { value, snapshot })
    }

    /// Persists `document` as a whole and makes it current.
    pub async fn replace(&self, document: Document, reason: ReplaceReason) -> Result<Arc<Document>> {
        let _guard = self.write_gate.lock().await;
        self.repository.save(document.to_json()?).await?;
        let snapshot = self.install(document);
        info!("Document replaced ({:?})", reason);
        self.publish(vec![DomainEvent::document_replaced(reason)]);
        Ok(snapshot)
    }

    /// Re-reads the persisted document after another writer changed it.
    ///
    /// A malformed payload is an error and keeps the current snapshot.
    pub async fn reload(&self) -> Result<Arc<Document>> {
        let _guard = self.write_gate.lock().await;
        let document = match self.repository.load()? {
            Some(payload) => Document::from_json(&payload)?,
            None => Document::seed(),
        };
        let snapshot = self.install(document);
        self.publish(vec![DomainEvent::document_replaced(ReplaceReason::Reload)]);
        Ok(snapshot)
    }

    fn install(&self, document: Document) -> Arc<Document> {
        let snapshot = Arc::new(document);
        *self
            .document
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Installed document revision {}", revision);
        snapshot
    }

    fn publish(&self, events: Vec<DomainEvent>) {
        let sinks: Vec<Arc<dyn DomainEventSink>> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, sink)| sink.clone())
            .collect();
        for sink in sinks {
            sink.emit_batch(events.clone());
        }
    }
}
