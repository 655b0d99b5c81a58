//! Game domain: board, movement rules, cell events, turn coordination and match state.
//!
//! Nothing here knows about actors or HTTP; the server layer owns one `MatchState`
//! per match actor.
pub mod board;
pub mod error;
pub mod events;
pub mod grid;
pub mod lobby;
pub mod movement;
pub mod state;
pub mod turn;
pub mod types;

pub use error::{ErrorKind, GameError};
pub use state::MatchState;
