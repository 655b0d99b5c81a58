//! Match registry: creates matches, lists joinable ones and routes requests to the
//! actor owning each match.

pub mod messages;
pub mod server;
