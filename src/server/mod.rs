//! Server layer root module.
//!
//! This module organizes the backend server components:
//! - Application state and caller authentication
//! - HTTP/WebSocket routing and handlers
//! - The match registry (creation, lobby listing, routing)
//! - Match sessions (one actor per match, serializing its operations)
//! - The combat collaborator hand-off

pub mod api;
pub mod auth;
pub mod combat;
pub mod http_error;
pub mod match_session;
pub mod registry;
pub mod router;
pub mod state;
