//! Messages understood by the match registry.
use actix::prelude::*;

use crate::game::GameError;
use crate::game::grid::Blueprint;
use crate::game::lobby::MatchSummary;
use crate::game::types::{CharacterClass, MatchId, UserId};
use crate::server::match_session::server::MatchSession;

/// Message: create a match with its owner in the first seat.
#[derive(Message)]
#[rtype(result = "Result<MatchId, GameError>")]
pub struct CreateMatch {
    pub owner: UserId,
    pub turn_limit: u32,
    pub is_public: bool,
    pub password: Option<String>,
    pub class: Option<CharacterClass>,
    /// Board to play on; a random one is generated when absent.
    pub blueprint: Option<Blueprint>,
}

/// Message: list matches still accepting players, oldest first.
#[derive(Message)]
#[rtype(result = "Vec<MatchSummary>")]
pub struct ListJoinable;

/// Message: look up the actor owning a match.
#[derive(Message)]
#[rtype(result = "Result<Addr<MatchSession>, GameError>")]
pub struct GetMatch {
    pub match_id: MatchId,
}

/// Message (match -> registry): the lobby view of a match changed.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SummaryChanged {
    pub summary: MatchSummary,
}

/// Message (match -> registry): the match was abandoned and its actor is stopping.
#[derive(Message)]
#[rtype(result = "()")]
pub struct MatchClosed {
    pub match_id: MatchId,
}
