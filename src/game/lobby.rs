//! Match records and seat admission.
use serde::Serialize;

use super::error::{GameError, Result};
use super::types::{CharacterClass, MatchId, MatchStatus, UserId};
use crate::config::matchmaking::{MAX_SEATS, MAX_TURN_LIMIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private { password: String },
}

impl Visibility {
    /// Build the visibility requested by a client; private matches need a password.
    pub fn from_request(is_public: bool, password: Option<String>) -> Result<Self> {
        if is_public {
            return Ok(Visibility::Public);
        }
        match password {
            Some(password) if !password.is_empty() => Ok(Visibility::Private { password }),
            _ => Err(GameError::InvalidConfig("a private match needs a password".to_string())),
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub user_id: UserId,
    pub class: CharacterClass,
}

#[derive(Debug, Clone)]
pub struct Match {
    pub id: MatchId,
    pub owner: UserId,
    pub turn_limit: u32,
    pub visibility: Visibility,
    pub status: MatchStatus,
    /// Join order.
    pub seats: Vec<Seat>,
}

/// Lobby listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub id: MatchId,
    #[serde(rename = "public")]
    pub is_public: bool,
    pub status: MatchStatus,
    pub users: Vec<UserId>,
    pub seats: usize,
    pub turn_limit: u32,
}

impl Match {
    /// A fresh waiting match with its owner in the first seat.
    pub fn new(
        id: MatchId,
        owner: UserId,
        owner_class: CharacterClass,
        turn_limit: u32,
        visibility: Visibility,
    ) -> Result<Self> {
        if turn_limit < 1 {
            return Err(GameError::InvalidConfig("turn limit must be at least 1".to_string()));
        }
        if turn_limit > MAX_TURN_LIMIT {
            return Err(GameError::InvalidConfig(format!(
                "turn limit must not exceed {}",
                MAX_TURN_LIMIT
            )));
        }
        Ok(Self {
            id,
            seats: vec![Seat {
                user_id: owner.clone(),
                class: owner_class,
            }],
            owner,
            turn_limit,
            visibility,
            status: MatchStatus::Waiting,
        })
    }

    pub fn is_seated(&self, user_id: &str) -> bool {
        self.seats.iter().any(|s| s.user_id == user_id)
    }

    pub fn is_full(&self) -> bool {
        self.seats.len() >= MAX_SEATS
    }

    pub fn is_joinable(&self) -> bool {
        self.status == MatchStatus::Waiting && !self.is_full()
    }

    /// Seat `user_id`. Checks run in a fixed order so that a full match reports
    /// `MatchFull` before its status or password are looked at.
    pub fn admit(&mut self, user_id: &str, password: Option<&str>, class: CharacterClass) -> Result<&Seat> {
        if self.is_seated(user_id) {
            return Err(GameError::AlreadyJoined);
        }
        if self.is_full() {
            return Err(GameError::MatchFull);
        }
        if self.status != MatchStatus::Waiting {
            return Err(GameError::MatchNotJoinable);
        }
        if let Visibility::Private { password: expected } = &self.visibility {
            if password != Some(expected.as_str()) {
                return Err(GameError::BadPassword);
            }
        }
        self.seats.push(Seat {
            user_id: user_id.to_string(),
            class,
        });
        Ok(&self.seats[self.seats.len() - 1])
    }

    /// Give up a seat before the match starts.
    pub fn vacate(&mut self, user_id: &str) -> Result<()> {
        let idx = self
            .seats
            .iter()
            .position(|s| s.user_id == user_id)
            .ok_or(GameError::NotSeated)?;
        if self.status != MatchStatus::Waiting {
            return Err(GameError::MatchInProgress);
        }
        self.seats.remove(idx);
        if let Some(first) = self.seats.first() {
            if self.owner == user_id {
                self.owner = first.user_id.clone();
            }
        } else {
            self.status = MatchStatus::Finished;
        }
        Ok(())
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            id: self.id,
            is_public: self.visibility.is_public(),
            status: self.status,
            users: self.seats.iter().map(|s| s.user_id.clone()).collect(),
            seats: self.seats.len(),
            turn_limit: self.turn_limit,
        }
    }
}
