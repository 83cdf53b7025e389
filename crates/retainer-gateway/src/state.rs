//! Application state

use crate::auth::{JwtAuthenticator, ScopeAuthorizer};
use crate::config::GatewayConfig;
use crate::policy::Policies;
use retainer_store::{EventSink, MemoryRetainedStore, NoopEventSink, RetainedStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across handlers.
///
/// Holds only collaborators; the gateway keeps no per-request or
/// cross-request mutable state of its own.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Retained-message store
    pub store: Arc<dyn RetainedStore>,
    /// Observer notified after every successful write
    pub events: Arc<dyn EventSink>,
    /// Authentication and authorization strategies
    pub policies: Policies,
}

impl AppState {
    /// Create state with an in-memory store, no event observer, and the
    /// policies implied by the configuration
    pub fn new(config: GatewayConfig) -> Self {
        let policies = Self::policies_for(&config);

        Self {
            config,
            store: Arc::new(MemoryRetainedStore::new()),
            events: Arc::new(NoopEventSink),
            policies,
        }
    }

    /// Replace the retained store
    pub fn with_store(mut self, store: Arc<dyn RetainedStore>) -> Self {
        self.store = store;
        self
    }

    /// Replace the event sink
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Replace the policies
    pub fn with_policies(mut self, policies: Policies) -> Self {
        self.policies = policies;
        self
    }

    /// Access-token policies when auth is enabled, allow-all otherwise
    fn policies_for(config: &GatewayConfig) -> Policies {
        if !config.auth_enabled {
            warn!("Authentication is DISABLED - every request is allowed");
            return Policies::default();
        }

        if config.jwt_secret.is_none() {
            warn!("Authentication enabled without a JWT secret - resource requests will fail");
        } else {
            info!("Access-token authentication enabled");
        }

        Policies::default()
            .with_authenticator(JwtAuthenticator::new(config.jwt_secret.clone()))
            .with_read_authorizer(ScopeAuthorizer)
            .with_write_authorizer(ScopeAuthorizer)
    }
}
