//! Domain errors raised by the match coordinator.
//!
//! Every rejection carries a stable code and a category so transports can map it
//! without inspecting messages. None of these errors leaves partial state behind.
use thiserror::Error;

use super::types::{CharacterId, EventId};

pub type Result<T> = std::result::Result<T, GameError>;

/// Broad category of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    Capacity,
    State,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Cell out of reach.")]
    OutOfReach,

    #[error("Movement blocked by an obstacle.")]
    BlockedByObstacle,

    #[error("Occupied cell.")]
    OccupiedCell,

    #[error("Cell cannot be entered.")]
    WrongCellType,

    #[error("Unknown or already resolved event {0}.")]
    UnknownEvent(EventId),

    #[error("Not enough actions left: {requested} selected, {available} available.")]
    NotEnoughActions { requested: usize, available: u32 },

    #[error("Action not allowed in the current phase.")]
    WrongPhase,

    #[error("Invalid match configuration: {0}")]
    InvalidConfig(String),

    #[error("Not your turn.")]
    NotYourTurn,

    #[error("Only the match owner can do this.")]
    NotMatchOwner,

    #[error("You are not seated in this match.")]
    NotSeated,

    #[error("Wrong password.")]
    BadPassword,

    #[error("The match is full.")]
    MatchFull,

    #[error("You already joined this match.")]
    AlreadyJoined,

    #[error("The match is not accepting players.")]
    MatchNotJoinable,

    #[error("The match has not started yet.")]
    MatchNotStarted,

    #[error("The match is already in progress.")]
    MatchInProgress,

    #[error("Not enough players to start the match.")]
    NotEnoughPlayers,

    #[error("The match is finished.")]
    MatchFinished,

    #[error("Match not found.")]
    MatchNotFound,

    #[error("Cell not found.")]
    CellNotFound,

    #[error("Character {0} not found.")]
    CharacterNotFound(CharacterId),
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::OutOfReach
            | GameError::BlockedByObstacle
            | GameError::OccupiedCell
            | GameError::WrongCellType
            | GameError::UnknownEvent(_)
            | GameError::NotEnoughActions { .. }
            | GameError::WrongPhase
            | GameError::InvalidConfig(_) => ErrorKind::Validation,
            GameError::NotYourTurn
            | GameError::NotMatchOwner
            | GameError::NotSeated
            | GameError::BadPassword => ErrorKind::Authorization,
            GameError::MatchFull => ErrorKind::Capacity,
            GameError::AlreadyJoined
            | GameError::MatchNotJoinable
            | GameError::MatchNotStarted
            | GameError::MatchInProgress
            | GameError::NotEnoughPlayers
            | GameError::MatchFinished => ErrorKind::State,
            GameError::MatchNotFound | GameError::CellNotFound | GameError::CharacterNotFound(_) => {
                ErrorKind::NotFound
            }
        }
    }

    /// Stable reason code exposed to clients.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::OutOfReach => "OUT_OF_REACH",
            GameError::BlockedByObstacle => "BLOCKED_BY_OBSTACLE",
            GameError::OccupiedCell => "OCCUPIED_CELL",
            GameError::WrongCellType => "WRONG_CELL_TYPE",
            GameError::UnknownEvent(_) => "UNKNOWN_EVENT",
            GameError::NotEnoughActions { .. } => "NOT_ENOUGH_ACTIONS",
            GameError::WrongPhase => "WRONG_PHASE",
            GameError::InvalidConfig(_) => "INVALID_CONFIG",
            GameError::NotYourTurn => "NOT_YOUR_TURN",
            GameError::NotMatchOwner => "NOT_MATCH_OWNER",
            GameError::NotSeated => "NOT_SEATED",
            GameError::BadPassword => "BAD_PASSWORD",
            GameError::MatchFull => "MATCH_FULL",
            GameError::AlreadyJoined => "ALREADY_JOINED",
            GameError::MatchNotJoinable => "MATCH_NOT_JOINABLE",
            GameError::MatchNotStarted => "MATCH_NOT_STARTED",
            GameError::MatchInProgress => "MATCH_IN_PROGRESS",
            GameError::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            GameError::MatchFinished => "MATCH_FINISHED",
            GameError::MatchNotFound => "MATCH_NOT_FOUND",
            GameError::CellNotFound => "CELL_NOT_FOUND",
            GameError::CharacterNotFound(_) => "CHARACTER_NOT_FOUND",
        }
    }
}
