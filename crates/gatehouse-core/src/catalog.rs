//! Connection catalog built from the backend's client configuration.
//!
//! # Design
//! - The catalog is immutable once built; filtering returns a new catalog.
//! - Strategies without connections never enter a catalog.
//! - Filtering keeps source order for strategies and connections, drops
//!   strategies left empty, and ignores requested names that match nothing.
//! - Connections keep their strategy by name rather than by reference.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::strategies::{StrategyKind, strategy_kind, strategy_title};

/// Client configuration returned by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfiguration {
    /// Client identifier the configuration belongs to.
    pub id: String,
    /// Strategies enabled for the client, in display order.
    #[serde(default)]
    pub strategies: Vec<StrategyRecord>,
}

/// Strategy entry as delivered by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrategyRecord {
    /// Strategy identifier (e.g. `google-oauth2`).
    pub name: String,
    /// Connections configured for the strategy.
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

/// Connection entry as delivered by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    /// Connection identifier.
    pub name: String,
    /// Email domain served by the connection; empty means unrestricted.
    #[serde(default)]
    pub domain: Option<String>,
    /// Whether the signup link is offered.
    #[serde(default)]
    pub show_signup: bool,
    /// Whether the forgot-password link is offered.
    #[serde(default)]
    pub show_forgot: bool,
}

/// A connection inside a built catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    name: String,
    domain: Option<String>,
    show_signup: bool,
    show_forgot: bool,
    strategy: String,
}

impl Connection {
    /// Connection identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email domain restriction, if any.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Whether the signup link is offered.
    #[must_use]
    pub const fn show_signup(&self) -> bool {
        self.show_signup
    }

    /// Whether the forgot-password link is offered.
    #[must_use]
    pub const fn show_forgot(&self) -> bool {
        self.show_forgot
    }

    /// Name of the owning strategy.
    #[must_use]
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    fn serves_domain(&self, domain: &str) -> bool {
        self.domain
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(domain))
    }
}

/// A strategy inside a built catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strategy {
    name: String,
    kind: StrategyKind,
    connections: Vec<Connection>,
}

impl Strategy {
    /// Strategy identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Behavioural family.
    #[must_use]
    pub const fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        strategy_title(&self.name)
    }

    /// Connections in source order.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn from_record(record: &StrategyRecord) -> Self {
        let connections = record
            .connections
            .iter()
            .map(|connection| Connection {
                name: connection.name.clone(),
                domain: connection
                    .domain
                    .as_deref()
                    .map(str::trim)
                    .filter(|domain| !domain.is_empty())
                    .map(str::to_string),
                show_signup: connection.show_signup,
                show_forgot: connection.show_forgot,
                strategy: record.name.clone(),
            })
            .collect();
        Self {
            name: record.name.clone(),
            kind: strategy_kind(&record.name),
            connections,
        }
    }
}

/// Ordered, immutable set of strategies available to one widget session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    strategies: Vec<Strategy>,
}

impl Catalog {
    /// Build a catalog from backend records, optionally restricted to the
    /// requested connection names.
    ///
    /// Duplicate strategy identifiers keep their first occurrence. Strategies
    /// without connections are dropped.
    #[must_use]
    pub fn build(records: &[StrategyRecord], requested: Option<&[String]>) -> Self {
        let mut seen = HashSet::new();
        let mut strategies = Vec::with_capacity(records.len());
        for record in records {
            if record.connections.is_empty() {
                debug!(strategy = %record.name, "strategy without connections skipped");
                continue;
            }
            if !seen.insert(record.name.as_str()) {
                warn!(
                    strategy = %record.name,
                    "duplicate strategy in client configuration ignored"
                );
                continue;
            }
            strategies.push(Strategy::from_record(record));
        }

        let full = Self { strategies };
        match requested {
            Some(requested) => full.filter(requested),
            None => full,
        }
    }

    /// Restrict the catalog to the requested connection names.
    #[must_use]
    pub fn filter(&self, requested: &[String]) -> Self {
        let wanted: HashSet<&str> = requested.iter().map(String::as_str).collect();
        let strategies = self
            .strategies
            .iter()
            .filter_map(|strategy| {
                let connections: Vec<Connection> = strategy
                    .connections
                    .iter()
                    .filter(|connection| wanted.contains(connection.name.as_str()))
                    .cloned()
                    .collect();
                (!connections.is_empty()).then(|| Strategy {
                    name: strategy.name.clone(),
                    kind: strategy.kind,
                    connections,
                })
            })
            .collect();
        Self { strategies }
    }

    /// Strategies in display order.
    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Whether no usable connection remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Every connection paired with its strategy, in display order.
    pub fn connections(&self) -> impl Iterator<Item = (&Strategy, &Connection)> {
        self.strategies.iter().flat_map(|strategy| {
            strategy
                .connections
                .iter()
                .map(move |connection| (strategy, connection))
        })
    }

    /// Look up a connection by identifier.
    #[must_use]
    pub fn find_connection(&self, name: &str) -> Option<(&Strategy, &Connection)> {
        self.connections()
            .find(|(_, connection)| connection.name == name)
    }

    /// Look up a strategy by identifier.
    #[must_use]
    pub fn find_strategy(&self, name: &str) -> Option<&Strategy> {
        self.strategies.iter().find(|strategy| strategy.name == name)
    }

    /// Whether any strategy of `kind` is present.
    #[must_use]
    pub fn has_kind(&self, kind: StrategyKind) -> bool {
        self.strategies.iter().any(|strategy| strategy.kind == kind)
    }

    /// Connections belonging to strategies of `kind`, in display order.
    pub fn connections_of_kind(
        &self,
        kind: StrategyKind,
    ) -> impl Iterator<Item = (&Strategy, &Connection)> {
        self.connections()
            .filter(move |(strategy, _)| strategy.kind == kind)
    }

    /// First connection of a strategy of `kind`.
    #[must_use]
    pub fn first_connection_of_kind(&self, kind: StrategyKind) -> Option<(&Strategy, &Connection)> {
        self.connections_of_kind(kind).next()
    }

    /// Enterprise or directory connection serving an email domain.
    #[must_use]
    pub fn connection_for_domain(&self, domain: &str) -> Option<(&Strategy, &Connection)> {
        self.connections().find(|(strategy, connection)| {
            strategy.kind.routes_by_domain() && connection.serves_domain(domain)
        })
    }

    /// Strategies rendered as icon buttons.
    pub fn social_strategies(&self) -> impl Iterator<Item = &Strategy> {
        self.strategies
            .iter()
            .filter(|strategy| strategy.kind == StrategyKind::Social)
    }
}
