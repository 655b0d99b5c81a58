//! Match actor messages, plus the frames exchanged with feed clients.
use actix::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::feed::FeedSession;
use crate::game::GameError;
use crate::game::board::BoardSnapshot;
use crate::game::lobby::MatchSummary;
use crate::game::state::MatchView;
use crate::game::turn::{ActionReport, MoveReport};
use crate::game::types::{CellEvent, CellId, CharacterClass, CharacterId, CombatTicket, EventId, UserId};

#[derive(Message)]
#[rtype(result = "Result<JoinOutcome, GameError>")]
pub struct Join {
    pub user_id: UserId,
    pub password: Option<String>,
    pub class: Option<CharacterClass>,
}

#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub summary: MatchSummary,
    /// The seat just taken was the last one and the match started.
    pub started: bool,
}

#[derive(Message)]
#[rtype(result = "Result<(), GameError>")]
pub struct Leave {
    pub user_id: UserId,
}

#[derive(Message)]
#[rtype(result = "Result<(), GameError>")]
pub struct Start {
    pub user_id: UserId,
}

#[derive(Message)]
#[rtype(result = "Result<(), GameError>")]
pub struct End {
    pub user_id: UserId,
}

#[derive(Message)]
#[rtype(result = "MatchView")]
pub struct GetView;

#[derive(Message)]
#[rtype(result = "BoardSnapshot")]
pub struct GetBoard;

#[derive(Message)]
#[rtype(result = "Result<Vec<CellEvent>, GameError>")]
pub struct GetCellEvents {
    pub cell_id: CellId,
}

#[derive(Message)]
#[rtype(result = "Result<MoveReport, GameError>")]
pub struct Move {
    pub user_id: UserId,
    pub character_id: CharacterId,
    pub x: usize,
    pub y: usize,
}

#[derive(Message)]
#[rtype(result = "Result<ActionReport, GameError>")]
pub struct ExecuteActions {
    pub user_id: UserId,
    pub character_id: CharacterId,
    pub event_ids: Vec<EventId>,
}

/// Message: attach a feed connection to the match.
#[derive(Message)]
#[rtype(result = "MatchView")]
pub struct Subscribe {
    pub id: Uuid,
    pub addr: Addr<FeedSession>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Unsubscribe {
    pub id: Uuid,
}

// Match -> feed client
#[derive(Message, Serialize, Clone, Debug)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data")]
pub enum FeedMessage {
    MatchUpdate(MatchView),
    Messages { messages: Vec<String> },
    CombatStarted(CombatTicket),
    Closed { reason: String },
    Pong,
}

// Feed client -> server
#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "action", content = "data")]
pub enum FeedClientMessage {
    Ping,
}
