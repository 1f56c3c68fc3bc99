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
#![allow(clippy::redundant_pub_crate)]

//! Widget controller: the façade a host renders from.
//!
//! A [`WidgetController`] owns one widget instance. Each `show()` builds a
//! fresh session (catalog, SSO state, view) and `hide()` discards it. All
//! readiness signals and faults are published on the controller's
//! [`EventBus`](gatehouse_events::EventBus).
//!
//! Layout: `controller.rs` (lifecycle and actions), `session.rs` (per-show
//! state), `outcome.rs` (action results and render snapshots).

pub mod controller;
pub mod outcome;
mod session;

pub use controller::WidgetController;
pub use outcome::{Affordances, ShowOutcome, SubmitOutcome, WidgetSnapshot};
