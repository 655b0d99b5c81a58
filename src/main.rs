//! Main entry point for the backend server.
//!
//! Initializes the actor system, configures application state, and launches the HTTP server
//! with the REST and WebSocket endpoints.

use actix::Actor;
use actix_web::{App, HttpServer, web};
use log::info;

use grid_tactics::config::game::GameConfig;
use grid_tactics::config::server::ServerConfig;
use grid_tactics::server::combat::CombatArena;
use grid_tactics::server::registry::server::MatchRegistry;
use grid_tactics::server::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();

    // Start the combat collaborator stand-in.
    let arena = CombatArena::new(config.combat_timeout).start();

    // Start the MatchRegistry actor (creates matches and routes to them).
    let registry = MatchRegistry::new(GameConfig::default(), arena.recipient())
        .with_finished_retention(config.finished_retention)
        .start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(AppState::new(registry));

    info!("[Server] listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(grid_tactics::server::router::config)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
