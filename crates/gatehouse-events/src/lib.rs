#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Typed event channel for the Gatehouse widget.
//!
//! Readiness signals, lifecycle notifications, and faults all travel through a
//! single [`EventBus`]. Each emitted event carries a sequential identifier and
//! is kept in a bounded replay ring so late subscribers can catch up.
//! Listeners register per [`EventKind`], either for every occurrence or once.
//!
//! Layout: `payloads.rs` (event types), `topics.rs` (kind discriminators),
//! `routing.rs` (bus + replay), `listeners.rs` (per-kind callbacks).

pub mod listeners;
pub mod payloads;
pub mod routing;
pub mod topics;

pub use listeners::ListenerId;
pub use payloads::{
    DEFAULT_REPLAY_CAPACITY, EventEnvelope, EventId, FaultKind, Operation, ViewKind, WidgetEvent,
};
pub use routing::{EventBus, EventStream};
pub use topics::{EventKind, event_kind};
