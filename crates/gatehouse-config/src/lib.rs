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

//! Widget settings and per-`show()` options.
//!
//! Layout: `model.rs` (serde models as supplied by the host), `defaults.rs`
//! (fallback values), `validate.rs` (merge with defaults and validation into
//! resolved, typed settings).

pub mod defaults;
pub mod error;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{
    AuthParams, ResolvedOptions, ResolvedSettings, ResponseType, TransportSettings,
    WidgetOptions, WidgetSettings,
};
pub use validate::{derive_asset_locations, resolve_options, resolve_settings};
