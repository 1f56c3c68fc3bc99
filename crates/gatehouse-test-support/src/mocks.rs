//! Scriptable identity client for controller tests.
//!
//! The fake records every call it receives and can hold any operation behind
//! a [`Gate`] so tests can interleave `hide()` with an in-flight request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use gatehouse_config::TransportSettings;
use gatehouse_core::{
    ChangePasswordRequest, ClientConfiguration, ClientError, IdentityClient, LoginRequest,
    SignupRequest, SsoState,
};
use gatehouse_events::Operation;
use tokio::sync::Notify;

use crate::fixtures;

/// Pauses one operation until released.
#[derive(Clone, Default)]
pub struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl Gate {
    /// Wait until the gated operation has started.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the gated operation finish.
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

/// Collaborator call a [`Gate`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    /// `fetch_client_configuration`.
    Configuration,
    /// `fetch_sso_state`.
    Sso,
    /// `login`.
    Login,
    /// `signup`.
    Signup,
    /// `change_password`.
    ChangePassword,
}

impl Call {
    const fn operation(self) -> Operation {
        match self {
            Self::Configuration | Self::Sso => Operation::Show,
            Self::Login => Operation::Login,
            Self::Signup => Operation::Signup,
            Self::ChangePassword => Operation::ChangePassword,
        }
    }
}

#[derive(Default)]
struct Script {
    configuration: Option<ClientConfiguration>,
    sso: Option<SsoState>,
    rejections: HashMap<Operation, (String, String)>,
    gates: HashMap<Call, Gate>,
}

/// Calls observed by a [`FakeClient`].
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    /// Transport settings passed to `configure`.
    pub configured: Vec<TransportSettings>,
    /// Number of configuration fetches.
    pub configuration_fetches: usize,
    /// `use_directory_sso` flag of each SSO lookup.
    pub sso_requests: Vec<bool>,
    /// Login requests.
    pub logins: Vec<LoginRequest>,
    /// Signup requests.
    pub signups: Vec<SignupRequest>,
    /// Change-password requests.
    pub password_changes: Vec<ChangePasswordRequest>,
}

/// In-memory [`IdentityClient`].
#[derive(Clone)]
pub struct FakeClient {
    script: Arc<Mutex<Script>>,
    recorded: Arc<Mutex<Recorded>>,
}

impl Default for FakeClient {
    fn default() -> Self {
        Self::new(fixtures::sample_client_configuration())
    }
}

impl FakeClient {
    /// Client serving `configuration` with no SSO session.
    #[must_use]
    pub fn new(configuration: ClientConfiguration) -> Self {
        let script = Script {
            configuration: Some(configuration),
            sso: Some(fixtures::sso_unavailable()),
            ..Script::default()
        };
        Self {
            script: Arc::new(Mutex::new(script)),
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    /// Report `state` from SSO lookups.
    #[must_use]
    pub fn with_sso(self, state: SsoState) -> Self {
        lock(&self.script).sso = Some(state);
        self
    }

    /// Fail every SSO lookup.
    #[must_use]
    pub fn failing_sso(self) -> Self {
        lock(&self.script).sso = None;
        self
    }

    /// Fail every configuration fetch.
    #[must_use]
    pub fn failing_configuration(self) -> Self {
        lock(&self.script).configuration = None;
        self
    }

    /// Reject `operation` with a backend error payload.
    #[must_use]
    pub fn rejecting(self, operation: Operation, code: &str, description: &str) -> Self {
        lock(&self.script)
            .rejections
            .insert(operation, (code.to_string(), description.to_string()));
        self
    }

    /// Hold `call` until the returned gate is released.
    #[must_use]
    pub fn gate(&self, call: Call) -> Gate {
        let gate = Gate::default();
        lock(&self.script).gates.insert(call, gate.clone());
        gate
    }

    /// Snapshot of recorded calls.
    #[must_use]
    pub fn recorded(&self) -> Recorded {
        lock(&self.recorded).clone()
    }

    async fn checkpoint(&self, call: Call) -> Result<(), ClientError> {
        let gate = lock(&self.script).gates.get(&call).cloned();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        let operation = call.operation();
        let rejection = lock(&self.script).rejections.get(&operation).cloned();
        match rejection {
            Some((code, description)) => Err(ClientError::Rejected {
                operation: operation.as_str(),
                code,
                description,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityClient for FakeClient {
    fn configure(&self, settings: &TransportSettings) {
        lock(&self.recorded).configured.push(settings.clone());
    }

    async fn fetch_client_configuration(&self) -> Result<ClientConfiguration, ClientError> {
        lock(&self.recorded).configuration_fetches += 1;
        self.checkpoint(Call::Configuration).await?;
        lock(&self.script)
            .configuration
            .clone()
            .ok_or(ClientError::Unavailable {
                operation: "fetch_client_configuration",
            })
    }

    async fn fetch_sso_state(&self, use_directory_sso: bool) -> Result<SsoState, ClientError> {
        lock(&self.recorded).sso_requests.push(use_directory_sso);
        let gate = lock(&self.script).gates.get(&Call::Sso).cloned();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        lock(&self.script)
            .sso
            .clone()
            .ok_or(ClientError::Unavailable {
                operation: "fetch_sso_state",
            })
    }

    async fn login(&self, request: LoginRequest) -> Result<(), ClientError> {
        lock(&self.recorded).logins.push(request);
        self.checkpoint(Call::Login).await
    }

    async fn signup(&self, request: SignupRequest) -> Result<(), ClientError> {
        lock(&self.recorded).signups.push(request);
        self.checkpoint(Call::Signup).await
    }

    async fn change_password(&self, request: ChangePasswordRequest) -> Result<(), ClientError> {
        lock(&self.recorded).password_changes.push(request);
        self.checkpoint(Call::ChangePassword).await
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
