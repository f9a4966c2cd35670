//! One-to-many broadcast of published transactions.

use std::sync::{Arc, Mutex};

use crate::transaction::Transaction;

/// Receives every item written to an [`AnalysisPort`] it is connected to.
///
/// `write` runs on the publisher's task before the publish returns, so it
/// must finish promptly and must not block.
pub trait Subscriber<T>: Send + Sync {
    /// Handles one published item.
    fn write(&self, item: &T);
}

/// A broadcast port with a fixed subscriber list.
///
/// Subscribers are connected while the environment is being wired. The
/// publisher then owns the port, so the list cannot change during a run.
pub struct AnalysisPort<T> {
    name: String,
    subscribers: Vec<Arc<dyn Subscriber<T>>>,
}

impl<T> AnalysisPort<T> {
    /// Creates a port with no subscribers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subscribers: Vec::new(),
        }
    }

    /// Hierarchical name of the port.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a subscriber. Delivery follows connection order.
    pub fn connect(&mut self, subscriber: Arc<dyn Subscriber<T>>) {
        self.subscribers.push(subscriber);
    }

    /// Number of connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Delivers `item` to every subscriber, in connection order.
    pub fn write(&self, item: &T) {
        for subscriber in &self.subscribers {
            subscriber.write(item);
        }
    }
}

impl<T> std::fmt::Debug for AnalysisPort<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisPort")
            .field("name", &self.name)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Records every published transaction in order.
#[derive(Debug, Default)]
pub struct TransactionLog {
    entries: Mutex<Vec<Transaction>>,
}

impl TransactionLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out everything recorded so far.
    pub fn entries(&self) -> Vec<Transaction> {
        self.entries.lock().unwrap().clone()
    }

    /// Number of recorded transactions.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Subscriber<Transaction> for TransactionLog {
    fn write(&self, item: &Transaction) {
        self.entries.lock().unwrap().push(item.clone());
    }
}
