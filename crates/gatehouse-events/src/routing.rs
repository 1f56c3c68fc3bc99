//! Event bus routing helpers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::Sender;
use tokio_stream::wrappers::BroadcastStream;

use crate::listeners::{ListenerId, Listeners};
use crate::payloads::{DEFAULT_REPLAY_CAPACITY, EventEnvelope, EventId, WidgetEvent};
use crate::topics::EventKind;

/// Stream wrapper used by async subscribers.
pub type EventStream = BroadcastStream<EventEnvelope>;

/// Shared event bus built on top of `tokio::broadcast`, with synchronous
/// per-kind listeners layered on top.
#[derive(Clone)]
pub struct EventBus {
    sender: Sender<EventEnvelope>,
    replay: Arc<Mutex<VecDeque<EventEnvelope>>>,
    replay_capacity: usize,
    next_id: Arc<Mutex<EventId>>,
    listeners: Arc<Listeners>,
}

impl EventBus {
    /// Construct a bus with a custom replay capacity.
    ///
    /// # Panics
    ///
    /// Panics if `replay_capacity` is zero.
    #[must_use]
    pub fn with_capacity(replay_capacity: usize) -> Self {
        assert!(replay_capacity > 0, "event bus capacity must be positive");
        let (sender, _) = broadcast::channel(replay_capacity);
        Self {
            sender,
            replay: Arc::new(Mutex::new(VecDeque::with_capacity(replay_capacity))),
            replay_capacity,
            next_id: Arc::new(Mutex::new(1)),
            listeners: Arc::new(Listeners::default()),
        }
    }

    /// Construct a bus with the default replay capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REPLAY_CAPACITY)
    }

    /// Subscribe to live events as an async stream.
    #[must_use]
    pub fn subscribe(&self) -> EventStream {
        BroadcastStream::new(self.sender.subscribe())
    }

    /// Register a listener invoked for every event of `kind`.
    #[must_use]
    pub fn on(
        &self,
        kind: EventKind,
        callback: impl Fn(&EventEnvelope) + Send + Sync + 'static,
    ) -> ListenerId {
        self.listeners.on(kind, callback)
    }

    /// Register a listener invoked for the next event of `kind` only.
    #[must_use]
    pub fn once(
        &self,
        kind: EventKind,
        callback: impl FnOnce(&EventEnvelope) + Send + 'static,
    ) -> ListenerId {
        self.listeners.once(kind, callback)
    }

    /// Detach a listener. Returns `false` when it already fired or was removed.
    #[must_use]
    pub fn off(&self, id: ListenerId) -> bool {
        self.listeners.off(id)
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Publish an event to stream subscribers and matching listeners,
    /// returning the assigned id.
    #[must_use]
    pub fn publish(&self, event: WidgetEvent) -> EventId {
        let mut next = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
        let id = *next;
        *next = next.saturating_add(1);
        drop(next);

        let envelope = EventEnvelope {
            id,
            timestamp: Utc::now(),
            event,
        };
        {
            let mut replay = self.lock_replay();
            if replay.len() == self.replay_capacity {
                let _ = replay.pop_front();
            }
            replay.push_back(envelope.clone());
        }
        let _ = self.sender.send(envelope.clone());
        self.listeners.dispatch(&envelope);
        id
    }

    /// Last event id observed in the replay buffer.
    #[must_use]
    pub fn last_event_id(&self) -> Option<EventId> {
        self.lock_replay().back().map(|env| env.id)
    }

    /// Collect a backlog of events emitted after the specified id.
    #[must_use]
    pub fn backlog_since(&self, id: EventId) -> Vec<EventEnvelope> {
        let replay = self.lock_replay();
        replay.iter().filter(|env| env.id > id).cloned().collect()
    }

    /// Every buffered event payload, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<WidgetEvent> {
        self.lock_replay()
            .iter()
            .map(|env| env.event.clone())
            .collect()
    }

    fn lock_replay(&self) -> MutexGuard<'_, VecDeque<EventEnvelope>> {
        self.replay.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
