//! Per-kind listener registry.
//!
//! # Design
//! - Callbacks run synchronously on the publishing task, after the registry
//!   lock is released, so a listener may register or remove listeners.
//! - `once` listeners are detached before they run and never fire twice.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::payloads::EventEnvelope;
use crate::topics::EventKind;

/// Handle returned on registration, used to detach a listener.
pub type ListenerId = u64;

type EveryCallback = Arc<dyn Fn(&EventEnvelope) + Send + Sync>;
type OnceCallback = Box<dyn FnOnce(&EventEnvelope) + Send>;

enum Handler {
    Every(EveryCallback),
    Once(OnceCallback),
}

struct Entry {
    id: ListenerId,
    kind: EventKind,
    handler: Handler,
}

enum Ready {
    Every(EveryCallback),
    Once(OnceCallback),
}

/// Listener storage shared by bus clones.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<Entry>>,
}

impl Listeners {
    pub(crate) fn on(
        &self,
        kind: EventKind,
        callback: impl Fn(&EventEnvelope) + Send + Sync + 'static,
    ) -> ListenerId {
        self.register(kind, Handler::Every(Arc::new(callback)))
    }

    pub(crate) fn once(
        &self,
        kind: EventKind,
        callback: impl FnOnce(&EventEnvelope) + Send + 'static,
    ) -> ListenerId {
        self.register(kind, Handler::Once(Box::new(callback)))
    }

    pub(crate) fn off(&self, id: ListenerId) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    pub(crate) fn dispatch(&self, envelope: &EventEnvelope) {
        let kind = envelope.event.kind();
        let mut ready = Vec::new();
        {
            let mut entries = self.lock();
            let drained = std::mem::take(&mut *entries);
            for entry in drained {
                if entry.kind != kind {
                    entries.push(entry);
                    continue;
                }
                match entry.handler {
                    Handler::Every(callback) => {
                        ready.push(Ready::Every(Arc::clone(&callback)));
                        entries.push(Entry {
                            id: entry.id,
                            kind: entry.kind,
                            handler: Handler::Every(callback),
                        });
                    }
                    Handler::Once(callback) => ready.push(Ready::Once(callback)),
                }
            }
        }

        for callback in ready {
            match callback {
                Ready::Every(callback) => callback(envelope),
                Ready::Once(callback) => callback(envelope),
            }
        }
    }

    fn register(&self, kind: EventKind, handler: Handler) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.lock().push(Entry { id, kind, handler });
        id
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
