//! Caller identity.
//!
//! Token issuance and claim parsing live elsewhere; this module only turns the bearer
//! credential of a request into an opaque user id through an `Authenticator`.
use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};

use crate::game::types::UserId;
use crate::server::http_error::ApiError;
use crate::server::state::AppState;

pub trait Authenticator: Send + Sync {
    /// Resolve a bearer token to a user id, or `None` when the token is not valid.
    fn authenticate(&self, token: &str) -> Option<UserId>;
}

/// Treats the token itself as the user id.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpaqueTokenAuthenticator;

impl Authenticator for OpaqueTokenAuthenticator {
    fn authenticate(&self, token: &str) -> Option<UserId> {
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub UserId);

impl Identity {
    pub fn user_id(&self) -> &str {
        &self.0
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}

/// Resolve `token` with the application's authenticator, or the opaque one when the
/// application state is not available.
pub fn resolve_token(req: &HttpRequest, token: &str) -> Option<UserId> {
    match req.app_data::<web::Data<AppState>>() {
        Some(state) => state.authenticator.authenticate(token),
        None => OpaqueTokenAuthenticator.authenticate(token),
    }
}

impl FromRequest for Identity {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .and_then(|token| resolve_token(req, token))
            .map(Identity)
            .ok_or(ApiError::Unauthenticated);
        ready(identity)
    }
}
