use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::{DashMap, DashSet};
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use super::events::ServerEvent;

pub type ConnectionId = u64;

/// A named channel clients join to receive pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Kitchen display of one restaurant.
    Kitchen(Uuid),
    /// Ordering screen of one table.
    Table(Uuid),
    /// Customer tracking page of one order.
    Order(Uuid),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Kitchen(id) => write!(f, "kitchen-{id}"),
            Topic::Table(id) => write!(f, "table-{id}"),
            Topic::Order(id) => write!(f, "order-{id}"),
        }
    }
}

/// Receiving half handed to a connection task.
pub struct Subscription {
    pub id: ConnectionId,
    pub receiver: mpsc::Receiver<ServerEvent>,
}

struct Inner {
    connections: DashMap<ConnectionId, mpsc::Sender<ServerEvent>>,
    topics: DashMap<Topic, DashSet<ConnectionId>>,
    next_id: AtomicU64,
    buffer: usize,
}

/// In-process topic registry.
///
/// Cloning is cheap and every clone shares the same registry.
#[derive(Clone)]
pub struct NotificationHub {
    inner: Arc<Inner>,
}

impl NotificationHub {
    pub fn new(buffer: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                connections: DashMap::new(),
                topics: DashMap::new(),
                next_id: AtomicU64::new(1),
                buffer: buffer.max(1),
            }),
        }
    }

    /// Register a new connection. It belongs to no topic yet.
    pub fn connect(&self) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.inner.buffer);
        self.inner.connections.insert(id, tx);
        Subscription { id, receiver: rx }
    }

    /// Returns false when the connection is unknown (already disconnected).
    pub fn join(&self, id: ConnectionId, topic: Topic) -> bool {
        if !self.inner.connections.contains_key(&id) {
            return false;
        }
        self.inner.topics.entry(topic).or_default().insert(id);
        true
    }

    pub fn leave(&self, id: ConnectionId, topic: &Topic) {
        if let Some(members) = self.inner.topics.get(topic) {
            members.remove(&id);
        }
        self.inner.topics.remove_if(topic, |_, members| members.is_empty());
    }

    /// Drop the connection and all of its memberships.
    pub fn disconnect(&self, id: ConnectionId) {
        self.inner.connections.remove(&id);
        let joined: Vec<Topic> = self
            .inner
            .topics
            .iter()
            .filter(|entry| entry.value().contains(&id))
            .map(|entry| *entry.key())
            .collect();
        for topic in joined {
            self.leave(id, &topic);
        }
    }

    /// Push `event` to every member of `topic` without waiting.
    ///
    /// Returns how many connections accepted it. Members with a full queue
    /// skip this event; members whose receiver is gone are removed.
    pub fn publish(&self, topic: &Topic, event: ServerEvent) -> usize {
        let members: Vec<ConnectionId> = match self.inner.topics.get(topic) {
            Some(set) => set.iter().map(|id| *id).collect(),
            None => return 0,
        };

        let mut delivered = 0;
        let mut closed = Vec::new();
        for id in members {
            let Some(tx) = self.inner.connections.get(&id).map(|tx| tx.clone()) else {
                closed.push(id);
                continue;
            };
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::debug!(connection = id, topic = %topic, "subscriber queue full, event dropped");
                }
                Err(TrySendError::Closed(_)) => closed.push(id),
            }
        }

        for id in closed {
            self.disconnect(id);
        }
        delivered
    }

    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.inner
            .topics
            .get(topic)
            .map(|members| members.len())
            .unwrap_or(0)
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(64)
    }
}
