//! Turn coordination.
//!
//! Owns whose turn it is and in which phase, and is the only place where character
//! positions and event resolution state change. Each transition validates everything
//! before mutating anything.
use log::{debug, info};
use serde::Serialize;
use uuid::Uuid;

use super::board::Board;
use super::error::{GameError, Result};
use super::events::{CombatTrigger, EventResolver};
use super::movement::can_move;
use super::types::{CellEvent, Character, CharacterId, CombatTicket, EventId, TurnPhase};
use crate::config::game::movement_budget;

/// What happened when a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TurnAdvance {
    /// Ownership passed to the given character.
    Next { owner: CharacterId, round_completed: bool },
    /// The turn limit was reached.
    Finished,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveReport {
    pub message: String,
    pub character: Character,
    /// Unresolved events on the destination cell, offered for the action phase.
    pub events: Vec<CellEvent>,
    /// Set when the destination had no events and the turn ended right away.
    pub advance: Option<TurnAdvance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReport {
    pub messages: Vec<String>,
    pub combats: Vec<CombatTicket>,
    pub advance: TurnAdvance,
}

#[derive(Debug, Clone)]
pub struct TurnCoordinator {
    phase: TurnPhase,
    /// Seat index of the current owner.
    owner_seat: usize,
    owner: CharacterId,
    rounds_completed: u32,
    turn_limit: u32,
    actions_per_turn: u32,
    finished: bool,
}

impl TurnCoordinator {
    /// Hand the first turn to the first seat.
    pub(crate) fn begin(board: &mut Board, turn_limit: u32, actions_per_turn: u32) -> Result<Self> {
        let first = board
            .character_at_seat_mut(0)
            .ok_or(GameError::NotEnoughPlayers)?;
        first.actions = actions_per_turn;
        let owner = first.id;
        Ok(Self {
            phase: TurnPhase::AwaitingMove,
            owner_seat: 0,
            owner,
            rounds_completed: 0,
            turn_limit,
            actions_per_turn,
            finished: false,
        })
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn owner(&self) -> CharacterId {
        self.owner
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Reject anyone but the user playing the current owner.
    fn authorize<'a>(&self, board: &'a Board, requester: &str, character_id: CharacterId) -> Result<&'a Character> {
        if self.finished {
            return Err(GameError::MatchFinished);
        }
        let character = board
            .character(character_id)
            .ok_or(GameError::CharacterNotFound(character_id))?;
        if character.user_id != requester || character.id != self.owner {
            return Err(GameError::NotYourTurn);
        }
        Ok(character)
    }

    /// Move the owner's character to (x, y) and open the action phase. When the
    /// destination holds no unresolved event the turn ends immediately.
    pub(crate) fn move_character(
        &mut self,
        board: &mut Board,
        events: &mut EventResolver,
        requester: &str,
        character_id: CharacterId,
        x: usize,
        y: usize,
    ) -> Result<MoveReport> {
        let character = self.authorize(board, requester, character_id)?;
        if self.phase != TurnPhase::AwaitingMove {
            return Err(GameError::WrongPhase);
        }
        let target = *board.cell_at(x, y).ok_or(GameError::CellNotFound)?;
        can_move(character, &target, board, movement_budget(character.class)).into_result()?;

        let character = board.relocate(character_id, target.id)?.clone();
        events.seed_on_first_entry(&target);
        let offered: Vec<CellEvent> = events.events_at(target.id).into_iter().cloned().collect();
        let message = format!("{} moved to ({}, {}).", character.name, x, y);
        debug!(
            "[Turn] match={} character={} moved to cell {} ({} events)",
            board.match_id(),
            character_id,
            target.id,
            offered.len()
        );

        let advance = if offered.is_empty() {
            Some(self.advance(board))
        } else {
            self.phase = TurnPhase::ActionPhase;
            None
        };
        Ok(MoveReport {
            message,
            character,
            events: offered,
            advance,
        })
    }

    /// Resolve the selected events on the owner's cell, close the action phase and
    /// pass the turn. An empty selection just closes the phase.
    pub(crate) fn execute_actions(
        &mut self,
        board: &mut Board,
        events: &mut EventResolver,
        trigger: &dyn CombatTrigger,
        requester: &str,
        character_id: CharacterId,
        selected: &[EventId],
    ) -> Result<ActionReport> {
        let character = self.authorize(board, requester, character_id)?;
        if self.phase != TurnPhase::ActionPhase {
            return Err(GameError::WrongPhase);
        }
        if selected.len() > character.actions as usize {
            return Err(GameError::NotEnoughActions {
                requested: selected.len(),
                available: character.actions,
            });
        }
        let (cell_id, name) = (character.cell_id, character.name.clone());
        let resolution = events.resolve(cell_id, selected, &name, trigger)?;

        if let Some(character) = board.character_mut(character_id) {
            character.actions -= selected.len() as u32;
        }
        let combats = resolution
            .combat_events
            .iter()
            .map(|event| CombatTicket {
                id: Uuid::new_v4(),
                match_id: board.match_id(),
                character_id,
                event_id: event.id,
                event_name: event.name.clone(),
            })
            .collect();
        let mut messages = resolution.messages;
        if messages.is_empty() {
            messages.push(format!("{} ended the turn.", name));
        }
        self.phase = TurnPhase::TurnComplete;
        let advance = self.advance(board);
        Ok(ActionReport {
            messages,
            combats,
            advance,
        })
    }

    /// Pass the turn to the next seat in join order, skipping (and clearing) stunned
    /// characters. Wrapping past the last seat completes a round; reaching the turn
    /// limit finishes the match.
    fn advance(&mut self, board: &mut Board) -> TurnAdvance {
        self.phase = TurnPhase::TurnComplete;
        let match_id = board.match_id();
        let seats = board.characters().len().max(1);
        let mut seat = self.owner_seat;
        let mut round_completed = false;
        for _ in 0..seats {
            seat = (seat + 1) % seats;
            if seat == 0 {
                self.rounds_completed += 1;
                round_completed = true;
                if self.rounds_completed >= self.turn_limit {
                    self.finished = true;
                    info!("[Turn] match={} finished after {} rounds", match_id, self.rounds_completed);
                    return TurnAdvance::Finished;
                }
            }
            match board.character_at_seat_mut(seat) {
                Some(next) if next.stunned => {
                    next.stunned = false;
                    debug!("[Turn] match={} character={} skips a turn", match_id, next.id);
                }
                _ => break,
            }
        }

        self.owner_seat = seat;
        self.phase = TurnPhase::AwaitingMove;
        if let Some(next) = board.character_at_seat_mut(seat) {
            next.actions = self.actions_per_turn;
            self.owner = next.id;
        }
        TurnAdvance::Next {
            owner: self.owner,
            round_completed,
        }
    }

    /// Stop accepting transitions.
    pub(crate) fn finish(&mut self) {
        self.finished = true;
        self.phase = TurnPhase::TurnComplete;
    }
}
