//! Authoritative backend for a turn-based grid tactics game.
//!
//! `game` holds the rules (board, movement, events, turns, lobby) with no I/O;
//! `server` wraps each match in an actor and exposes it over HTTP and WebSocket.

pub mod config;
pub mod game;
pub mod server;
