//! Change-feed types backing realtime subscriptions.
//!
//! Every document store publishes a [`ChangeEvent`] after each write.
//! Consumers call [`DocumentStore::subscribe`](crate::traits::DocumentStore::subscribe)
//! and own the returned [`Subscription`] handle: events flow until the
//! handle is unsubscribed or dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The document did not exist before this write.
    Created,
    /// An existing document was replaced, merged, or incremented.
    Updated,
    /// The document was removed.
    Deleted,
}

/// A single document change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    /// Collection the document belongs to.
    pub collection: String,
    /// Document ID within the collection.
    pub id: String,
    /// Kind of change.
    pub kind: ChangeKind,
    /// Document contents after the change (`None` for deletions).
    pub data: Option<serde_json::Value>,
    /// When the store observed the change.
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Builds an event stamped with the current time.
    pub fn new(
        collection: &str,
        id: &str,
        kind: ChangeKind,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            collection: collection.to_string(),
            id: id.to_string(),
            kind,
            data,
            at: Utc::now(),
        }
    }
}

/// Broadcast hub shared by a store and all of its subscriptions.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    /// Creates a feed buffering up to `capacity` events per lagging subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event. Having no subscribers is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }

    /// Opens a subscription filtered to one collection.
    pub fn subscribe(&self, collection: &str) -> Subscription {
        Subscription {
            collection: collection.to_string(),
            receiver: Some(self.sender.subscribe()),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Cancellable handle on a collection's change stream.
#[derive(Debug)]
pub struct Subscription {
    collection: String,
    receiver: Option<broadcast::Receiver<ChangeEvent>>,
}

impl Subscription {
    /// The collection this subscription watches.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Waits for the next change in the watched collection.
    ///
    /// Returns `None` once the subscription is cancelled or the store is
    /// gone. Events dropped because this consumer lagged are skipped.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            let receiver = self.receiver.as_mut()?;
            match receiver.recv().await {
                Ok(event) if event.collection == self.collection => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        collection = %self.collection,
                        skipped,
                        "Subscription lagged; change events dropped"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    self.receiver = None;
                    return None;
                }
            }
        }
    }

    /// Cancels the subscription. Subsequent `recv` calls return `None`.
    pub fn unsubscribe(&mut self) {
        self.receiver = None;
    }

    /// Whether the subscription is still live.
    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }
}
