//! Widget lifecycle and user actions.
//!
//! # Design
//! - A generation counter identifies the live session. Every await point is
//!   followed by a generation check, so a completion that lands after
//!   `hide()` changes nothing and publishes nothing.
//! - The state mutex is never held across an `.await` or while events are
//!   published; listeners may call back into the controller.
//! - One submission may be in flight per session.

use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gatehouse_config::{
    ConfigResult, ResolvedSettings, WidgetOptions, WidgetSettings, resolve_options,
    resolve_settings,
};
use gatehouse_core::{
    Catalog, ClientError, ConfigurationFault, CredentialForm, DefaultValidator, FormValidator,
    IdentityClient, IdentitySelection, LoginRequest, RequestBuilder, ResetForm, SignupForm,
    SsoResolver, SsoState, StrategyKind, ValidationFault, ViewEvent, ViewState,
};
use gatehouse_events::{EventBus, FaultKind, Operation, WidgetEvent};
use gatehouse_telemetry::{record_view, session_span};
use tracing::{Instrument, Span, debug, info, warn};
use uuid::Uuid;

use crate::outcome::{ShowOutcome, SubmitOutcome, WidgetSnapshot};
use crate::session::Session;

enum Phase {
    Idle,
    Loading,
    Active(Box<Session>),
}

struct State {
    generation: u64,
    phase: Phase,
}

struct Inner {
    settings: ResolvedSettings,
    client: Arc<dyn IdentityClient>,
    validator: Arc<dyn FormValidator>,
    events: EventBus,
    state: Mutex<State>,
}

/// What happens to the session after an accepted submission.
#[derive(Clone, Copy)]
enum AfterSuccess {
    Release,
    KeepBusy,
    Fire(ViewEvent),
}

struct Ticket<R> {
    generation: u64,
    span: Span,
    request: R,
}

/// One widget instance.
///
/// Cloning yields another handle to the same instance.
#[derive(Clone)]
pub struct WidgetController {
    inner: Arc<Inner>,
}

impl WidgetController {
    /// Create a widget with the default form validator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the settings are incomplete or
    /// malformed.
    pub fn new(settings: &WidgetSettings, client: Arc<dyn IdentityClient>) -> ConfigResult<Self> {
        Self::with_validator(settings, client, Arc::new(DefaultValidator))
    }

    /// Create a widget with a custom form validator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the settings are incomplete or
    /// malformed.
    pub fn with_validator(
        settings: &WidgetSettings,
        client: Arc<dyn IdentityClient>,
        validator: Arc<dyn FormValidator>,
    ) -> ConfigResult<Self> {
        let settings = resolve_settings(settings)?;
        info!(
            client_id = %settings.client_id,
            domain = %settings.domain,
            assets_url = %settings.assets_url,
            "widget created"
        );
        Ok(Self {
            inner: Arc::new(Inner {
                settings,
                client,
                validator,
                events: EventBus::new(),
                state: Mutex::new(State {
                    generation: 0,
                    phase: Phase::Idle,
                }),
            }),
        })
    }

    /// Resolved construction settings, including asset locations.
    #[must_use]
    pub fn settings(&self) -> &ResolvedSettings {
        &self.inner.settings
    }

    /// Event channel for readiness signals and faults.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Active view.
    #[must_use]
    pub fn view(&self) -> ViewState {
        let state = self.lock();
        match &state.phase {
            Phase::Active(session) => session.machine.state(),
            Phase::Idle | Phase::Loading => ViewState::Hidden,
        }
    }

    /// Read-only state for the renderer.
    #[must_use]
    pub fn snapshot(&self) -> WidgetSnapshot {
        let state = self.lock();
        match &state.phase {
            Phase::Active(session) => session.snapshot(self.inner.validator.as_ref()),
            Phase::Idle | Phase::Loading => WidgetSnapshot::default(),
        }
    }

    /// Open the widget.
    ///
    /// Loads the client configuration and SSO state, then enters the initial
    /// view. Faults are published on [`events`](Self::events) and reported
    /// in the outcome.
    pub async fn show(&self, options: WidgetOptions) -> ShowOutcome {
        let generation = {
            let mut state = self.lock();
            if !matches!(state.phase, Phase::Idle) {
                debug!("show ignored: widget already loading or visible");
                return ShowOutcome::Ignored;
            }
            state.generation = state.generation.wrapping_add(1);
            state.phase = Phase::Loading;
            state.generation
        };
        let span = session_span(&self.inner.settings.client_id, &Uuid::new_v4().to_string());
        self.load(generation, options, span.clone())
            .instrument(span)
            .await
    }

    /// Close the widget, discarding the session.
    ///
    /// Any in-flight `show()` or submission is invalidated.
    pub fn hide(&self) {
        let events = self.teardown();
        self.publish(events);
    }

    /// Close the widget and run `callback` once the session is gone.
    pub fn hide_with(&self, callback: impl FnOnce()) {
        let events = self.teardown();
        self.publish(events);
        callback();
    }

    /// Follow a link or the close control.
    ///
    /// Returns the view after the event. Navigation is ignored while a
    /// submission is in flight.
    #[must_use]
    pub fn navigate(&self, event: ViewEvent) -> ViewState {
        if event == ViewEvent::Close {
            self.hide();
            return ViewState::Hidden;
        }
        let (events, view) = {
            let mut state = self.lock();
            match &mut state.phase {
                Phase::Active(session) if !session.submitting => {
                    let events = session.machine.fire(event);
                    let view = session.machine.state();
                    if let Some(kind) = view.kind() {
                        record_view(&session.span, kind.as_str());
                    }
                    (events, view)
                }
                Phase::Active(session) => (Vec::new(), session.machine.state()),
                Phase::Idle | Phase::Loading => (Vec::new(), ViewState::Hidden),
            }
        };
        self.publish(events);
        view
    }

    /// Sign in with a social connection or strategy from the sign-in view.
    pub async fn sign_in_with_social(&self, name: &str) -> SubmitOutcome {
        let selection = IdentitySelection::Social {
            name: name.to_string(),
        };
        self.login(&[ViewState::SignIn], &selection).await
    }

    /// Submit the credential form of the sign-in view.
    pub async fn sign_in_with_credentials(&self, form: CredentialForm) -> SubmitOutcome {
        self.login(&[ViewState::SignIn], &IdentitySelection::Credentials(form))
            .await
    }

    /// Continue as the previous session from the logged-in view.
    ///
    /// `password` is required when the previous session used a credential
    /// connection.
    pub async fn sign_in_as_last_user(&self, password: Option<String>) -> SubmitOutcome {
        let ticket = self.begin(&[ViewState::LoggedIn], Operation::Login, |session, builder| {
            let display = session.sso.as_ref();
            let connection = last_used_connection(session).ok_or_else(|| {
                ValidationFault::UnknownConnection {
                    name: display
                        .and_then(|display| display.strategy.clone())
                        .unwrap_or_default(),
                }
            })?;
            builder.login(&IdentitySelection::LastUsed {
                connection,
                username: display.and_then(|display| display.username.clone()),
                password,
            })
        });
        match ticket {
            Ok(ticket) => self.dispatch_login(ticket).await,
            Err(outcome) => outcome,
        }
    }

    /// Submit the signup form, then sign in with the new account.
    pub async fn sign_up(&self, form: SignupForm) -> SubmitOutcome {
        let ticket = self.begin(&[ViewState::SignUp], Operation::Signup, |_, builder| {
            let signup = builder.signup(&form)?;
            let login = builder.login(&IdentitySelection::Credentials(CredentialForm {
                email: signup.username.clone(),
                password: signup.password.clone(),
                connection: Some(signup.connection.clone()),
            }))?;
            Ok((signup, login))
        });
        let Ticket {
            generation,
            span,
            request: (signup, login),
        } = match ticket {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };

        let connection = signup.connection.clone();
        span.in_scope(|| info!(connection = %connection, "signup dispatched"));
        let result = self
            .inner
            .client
            .signup(signup)
            .instrument(span.clone())
            .await;
        let outcome = self.settle(
            generation,
            Operation::Signup,
            &connection,
            result,
            AfterSuccess::KeepBusy,
        );
        if outcome != SubmitOutcome::Dispatched {
            return outcome;
        }
        self.dispatch_login(Ticket {
            generation,
            span,
            request: login,
        })
        .await
    }

    /// Submit the reset form; an accepted change returns to the sign-in view.
    pub async fn change_password(&self, form: ResetForm) -> SubmitOutcome {
        let ticket = self.begin(&[ViewState::Reset], Operation::ChangePassword, |_, builder| {
            builder.change_password(&form)
        });
        let Ticket {
            generation,
            span,
            request,
        } = match ticket {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };

        let connection = request.connection.clone();
        span.in_scope(|| info!(connection = %connection, "password change dispatched"));
        let result = self
            .inner
            .client
            .change_password(request)
            .instrument(span)
            .await;
        self.settle(
            generation,
            Operation::ChangePassword,
            &connection,
            result,
            AfterSuccess::Fire(ViewEvent::ResetCompleted),
        )
    }

    async fn load(&self, generation: u64, options: WidgetOptions, span: Span) -> ShowOutcome {
        info!("widget show started");
        let options = match resolve_options(&options) {
            Ok(options) => options,
            Err(err) => {
                warn!(code = err.code(), detail = %err.detail(), "widget options rejected");
                return self.abort(generation, FaultKind::Configuration, err.code(), err.detail());
            }
        };
        self.inner.client.configure(&options.transport);

        let fetched = self.inner.client.fetch_client_configuration().await;
        if !self.is_current(generation) {
            debug!("show invalidated during configuration fetch");
            return ShowOutcome::Cancelled;
        }
        let configuration = match fetched {
            Ok(configuration) => configuration,
            Err(err) => {
                warn!(
                    code = err.code(),
                    detail = %err.detail(),
                    "client configuration fetch failed"
                );
                return self.abort(generation, FaultKind::Transport, err.code(), err.detail());
            }
        };

        let catalog = Catalog::build(&configuration.strategies, options.connections.as_deref());
        if catalog.is_empty() {
            let backend_has_connections = configuration
                .strategies
                .iter()
                .any(|strategy| !strategy.connections.is_empty());
            let fault = match &options.connections {
                Some(requested) if backend_has_connections => {
                    ConfigurationFault::NoRequestedConnections {
                        requested: requested.clone(),
                    }
                }
                _ => ConfigurationFault::NoConnections,
            };
            warn!(code = fault.code(), "no usable connections");
            return self.abort(generation, FaultKind::Configuration, fault.code(), fault.detail());
        }
        info!(strategies = catalog.strategies().len(), "catalog built");

        let sso = if options.sso {
            let use_directory_sso =
                options.integrated_windows_login && catalog.has_kind(StrategyKind::Directory);
            let fetched = self.inner.client.fetch_sso_state(use_directory_sso).await;
            if !self.is_current(generation) {
                debug!("show invalidated during sso lookup");
                return ShowOutcome::Cancelled;
            }
            fetched.unwrap_or_else(|err| {
                warn!(
                    code = err.code(),
                    detail = %err.detail(),
                    "sso lookup failed; continuing without sso"
                );
                SsoState::unavailable()
            })
        } else {
            SsoState::unavailable()
        };

        let initial = SsoResolver::resolve(&sso, &catalog);
        let view = initial.view();
        let events = {
            let mut state = self.lock();
            if state.generation != generation {
                debug!("show invalidated before initial view");
                return ShowOutcome::Cancelled;
            }
            let mut session = Session::new(span.clone(), options, catalog, &initial);
            let events = session.machine.enter(&initial);
            state.phase = Phase::Active(Box::new(session));
            events
        };
        record_view(&span, view.as_str());
        info!(view = view.as_str(), "widget ready");
        self.publish(events);
        ShowOutcome::Shown(view)
    }

    fn abort(&self, generation: u64, kind: FaultKind, code: &str, detail: String) -> ShowOutcome {
        {
            let mut state = self.lock();
            if state.generation != generation {
                return ShowOutcome::Cancelled;
            }
            state.phase = Phase::Idle;
        }
        self.publish_fault(kind, Operation::Show, code, detail);
        ShowOutcome::Faulted(kind)
    }

    fn teardown(&self) -> Vec<WidgetEvent> {
        let phase = {
            let mut state = self.lock();
            state.generation = state.generation.wrapping_add(1);
            mem::replace(&mut state.phase, Phase::Idle)
        };
        match phase {
            Phase::Active(mut session) => {
                session.span.in_scope(|| info!("widget hidden"));
                session.machine.hide()
            }
            Phase::Loading => {
                debug!("in-flight show invalidated");
                Vec::new()
            }
            Phase::Idle => Vec::new(),
        }
    }

    async fn login(&self, allowed: &[ViewState], selection: &IdentitySelection) -> SubmitOutcome {
        match self.begin(allowed, Operation::Login, |_, builder| builder.login(selection)) {
            Ok(ticket) => self.dispatch_login(ticket).await,
            Err(outcome) => outcome,
        }
    }

    async fn dispatch_login(&self, ticket: Ticket<LoginRequest>) -> SubmitOutcome {
        let Ticket {
            generation,
            span,
            request,
        } = ticket;
        let connection = request.connection.clone();
        span.in_scope(|| info!(connection = %connection, "login dispatched"));
        let result = self.inner.client.login(request).instrument(span).await;
        self.settle(
            generation,
            Operation::Login,
            &connection,
            result,
            AfterSuccess::Release,
        )
    }

    /// Validate and build a request for the active session, marking it busy.
    fn begin<R>(
        &self,
        allowed: &[ViewState],
        operation: Operation,
        build: impl FnOnce(&Session, &RequestBuilder<'_>) -> Result<R, ValidationFault>,
    ) -> Result<Ticket<R>, SubmitOutcome> {
        let mut state = self.lock();
        let generation = state.generation;
        let Phase::Active(session) = &mut state.phase else {
            debug!(operation = operation.as_str(), "action ignored: widget hidden");
            return Err(SubmitOutcome::Ignored);
        };
        if session.submitting || !allowed.contains(&session.machine.state()) {
            debug!(operation = operation.as_str(), "action ignored in current view");
            return Err(SubmitOutcome::Ignored);
        }

        let built = build(session, &session.builder(self.inner.validator.as_ref()));
        match built {
            Ok(request) => {
                session.submitting = true;
                Ok(Ticket {
                    generation,
                    span: session.span.clone(),
                    request,
                })
            }
            Err(fault) => {
                drop(state);
                debug!(
                    operation = operation.as_str(),
                    code = fault.code(),
                    "submission rejected locally"
                );
                self.publish_fault(
                    FaultKind::Validation,
                    operation,
                    fault.code(),
                    fault.to_string(),
                );
                Err(SubmitOutcome::Invalid(fault))
            }
        }
    }

    fn settle(
        &self,
        generation: u64,
        operation: Operation,
        connection: &str,
        result: Result<(), ClientError>,
        after: AfterSuccess,
    ) -> SubmitOutcome {
        let events = {
            let mut state = self.lock();
            if state.generation != generation {
                debug!(operation = operation.as_str(), "late result discarded");
                return SubmitOutcome::Ignored;
            }
            let Phase::Active(session) = &mut state.phase else {
                return SubmitOutcome::Ignored;
            };
            match &result {
                Ok(()) => {
                    let mut events = vec![WidgetEvent::RequestCompleted {
                        operation,
                        connection: connection.to_string(),
                    }];
                    match after {
                        AfterSuccess::Release => session.submitting = false,
                        AfterSuccess::KeepBusy => {}
                        AfterSuccess::Fire(event) => {
                            session.submitting = false;
                            events.extend(session.machine.fire(event));
                            if let Some(kind) = session.machine.state().kind() {
                                record_view(&session.span, kind.as_str());
                            }
                        }
                    }
                    events
                }
                Err(err) => {
                    session.submitting = false;
                    vec![WidgetEvent::Fault {
                        kind: FaultKind::Transport,
                        operation,
                        code: err.code().to_string(),
                        detail: err.detail(),
                    }]
                }
            }
        };

        match result {
            Ok(()) => {
                info!(operation = operation.as_str(), connection, "request completed");
                self.publish(events);
                SubmitOutcome::Dispatched
            }
            Err(err) => {
                warn!(
                    operation = operation.as_str(),
                    code = err.code(),
                    detail = %err.detail(),
                    "request failed"
                );
                self.publish(events);
                SubmitOutcome::Failed(err.detail())
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    fn publish(&self, events: Vec<WidgetEvent>) {
        for event in events {
            let _ = self.inner.events.publish(event);
        }
    }

    fn publish_fault(&self, kind: FaultKind, operation: Operation, code: &str, detail: String) {
        let _ = self.inner.events.publish(WidgetEvent::Fault {
            kind,
            operation,
            code: code.to_string(),
            detail,
        });
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Connection to continue with from the logged-in view.
///
/// Falls back to the first catalog connection of the previous strategy, or
/// the strategy name itself when the strategy is not in the catalog.
fn last_used_connection(session: &Session) -> Option<String> {
    let display = session.sso.as_ref()?;
    if let Some(connection) = &display.connection {
        return Some(connection.clone());
    }
    let strategy = display.strategy.as_deref()?;
    let connection = session
        .catalog
        .find_strategy(strategy)
        .and_then(|found| found.connections().first())
        .map_or(strategy, |connection| connection.name());
    Some(connection.to_string())
}
