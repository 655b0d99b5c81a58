//! Application state for the backend server.
//!
//! Holds the address of the match registry actor and the authenticator used to turn
//! bearer credentials into user ids. Shared with every HTTP/WebSocket handler.

use std::sync::Arc;

use actix::Addr;

use crate::server::auth::{Authenticator, OpaqueTokenAuthenticator};
use crate::server::registry::server::MatchRegistry;

/// Shared application state, injected into HTTP/WebSocket handlers.
#[derive(Clone)]
pub struct AppState {
    /// Address of the match registry actor (creation, listing, routing to matches).
    pub registry: Addr<MatchRegistry>,
    /// Resolves bearer tokens to user ids.
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    /// Create a new AppState using the opaque-token authenticator.
    pub fn new(registry: Addr<MatchRegistry>) -> Self {
        Self::with_authenticator(registry, Arc::new(OpaqueTokenAuthenticator))
    }

    pub fn with_authenticator(registry: Addr<MatchRegistry>, authenticator: Arc<dyn Authenticator>) -> Self {
        AppState { registry, authenticator }
    }
}
