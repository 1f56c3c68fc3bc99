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

//! DOM-free decision engine behind the authentication widget.
//!
//! Everything here is a pure function over immutable inputs, except the
//! [`view::ViewStateMachine`], which owns the single active view. Network
//! calls happen through the [`client::IdentityClient`] collaborator trait.
//!
//! Layout: `strategies.rs` (strategy registry), `catalog.rs` (connection
//! catalog), `sso.rs` (initial view resolution), `validation.rs` (form
//! validation collaborator), `request.rs` (request normalization), `view.rs`
//! (view state machine), `client.rs` (collaborator traits), `error.rs`
//! (fault types).

pub mod catalog;
pub mod client;
pub mod error;
pub mod request;
pub mod sso;
pub mod strategies;
pub mod validation;
pub mod view;

pub use catalog::{
    Catalog, ClientConfiguration, Connection, ConnectionRecord, Strategy, StrategyRecord,
};
pub use client::IdentityClient;
pub use error::{ClientError, ConfigurationFault, ValidationFault};
pub use request::{
    ChangePasswordRequest, CredentialForm, IdentitySelection, LoginRequest, RequestBuilder,
    ResetForm, SignupForm, SignupRequest,
};
pub use sso::{InitialView, LastUsedConnection, SsoDisplay, SsoResolver, SsoState};
pub use strategies::{StrategyKind, strategy_kind, strategy_title};
pub use validation::{DefaultValidator, FormValidator};
pub use view::{ViewEvent, ViewState, ViewStateMachine};
