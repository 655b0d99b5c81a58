//! One actor per match. Its mailbox serializes every read-then-write on the match.
pub mod feed;
pub mod messages;
pub mod server;

pub use server::MatchSession;
