//! HTTP and WebSocket routing configuration.
//!
//! REST endpoints drive the match lifecycle; the WebSocket endpoint streams match
//! updates to connected clients.

use actix_web::web;

use crate::server::api;
use crate::server::http_error::ApiError;
use crate::server::match_session::feed::ws_feed;

/// Configure the application's HTTP/WebSocket routes.
///
/// Malformed JSON bodies and path parameters are answered with the same error body
/// as every other rejection.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/matches")
            // Registered before `/{match_id}` so it is not parsed as an id.
            .route("/available", web::get().to(api::available_matches))
            .route("", web::post().to(api::create_match))
            .route("/{match_id}", web::get().to(api::get_match))
            .route("/{match_id}/join", web::post().to(api::join_match))
            .route("/{match_id}/leave", web::post().to(api::leave_match))
            .route("/{match_id}/start", web::post().to(api::start_match))
            .route("/{match_id}/end", web::post().to(api::end_match))
            .route("/{match_id}/board", web::get().to(api::board))
            .route("/{match_id}/cells/{cell_id}/events", web::get().to(api::cell_events))
            .route("/{match_id}/move", web::post().to(api::move_character))
            .route("/{match_id}/actions", web::post().to(api::execute_actions)),
    )
    .service(web::resource("/ws/matches/{match_id}").to(ws_feed));
}
