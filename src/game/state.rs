//! Complete state of one match: lobby record, board, events and turn coordination.
//!
//! A `MatchState` is owned by exactly one match actor, which serializes every call.
use std::collections::HashMap;

use log::{debug, info};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use uuid::Uuid;

use super::board::{Board, BoardSnapshot};
use super::error::{GameError, Result};
use super::events::{CombatTrigger, EventResolver, MonsterTrigger};
use super::grid::Blueprint;
use super::lobby::{Match, MatchSummary, Seat, Visibility};
use super::turn::{ActionReport, MoveReport, TurnAdvance, TurnCoordinator};
use super::types::{
    CellEvent, CellId, CellType, Character, CharacterClass, CharacterId, CombatOutcome, CombatTicket,
    EventId, MatchId, MatchStatus, TurnPhase, UserId,
};
use crate::config::game::GameConfig;
use crate::config::matchmaking::{MAX_SEATS, MIN_PLAYERS};

/// Match details as shown to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: MatchId,
    pub owner: UserId,
    pub turn_limit: u32,
    #[serde(rename = "public")]
    pub is_public: bool,
    pub status: MatchStatus,
    pub character_turn: Option<CharacterId>,
    pub phase: Option<TurnPhase>,
    /// Completed rounds.
    pub elapsed_turns: u32,
    pub users: Vec<UserId>,
}

pub struct MatchState {
    record: Match,
    board: Board,
    events: EventResolver,
    spawns: Vec<CellId>,
    config: GameConfig,
    turn: Option<TurnCoordinator>,
    trigger: Box<dyn CombatTrigger>,
    pending_combats: HashMap<Uuid, CombatTicket>,
}

impl MatchState {
    /// Create a waiting match on the board described by `blueprint`.
    pub fn new(record: Match, blueprint: Blueprint, config: GameConfig) -> Result<Self> {
        let (board, events, spawns) = blueprint.build(record.id)?;
        let state = Self {
            record,
            board,
            events,
            spawns,
            config,
            turn: None,
            trigger: Box::new(MonsterTrigger),
            pending_combats: HashMap::new(),
        };
        // Every seat must have somewhere to stand once the match fills up.
        state.starting_cells(MAX_SEATS)?;
        Ok(state)
    }

    /// Replace the predicate deciding which events start a combat session.
    pub fn with_combat_trigger(mut self, trigger: impl CombatTrigger + 'static) -> Self {
        self.trigger = Box::new(trigger);
        self
    }

    pub fn id(&self) -> MatchId {
        self.record.id
    }

    pub fn record(&self) -> &Match {
        &self.record
    }

    pub fn status(&self) -> MatchStatus {
        self.record.status
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Option<&TurnCoordinator> {
        self.turn.as_ref()
    }

    pub fn summary(&self) -> MatchSummary {
        self.record.summary()
    }

    pub fn view(&self) -> MatchView {
        MatchView {
            id: self.record.id,
            owner: self.record.owner.clone(),
            turn_limit: self.record.turn_limit,
            is_public: self.record.visibility.is_public(),
            status: self.record.status,
            character_turn: self
                .turn
                .as_ref()
                .filter(|_| self.record.status == MatchStatus::Active)
                .map(|t| t.owner()),
            phase: self
                .turn
                .as_ref()
                .filter(|_| self.record.status == MatchStatus::Active)
                .map(|t| t.phase()),
            elapsed_turns: self.turn.as_ref().map(|t| t.rounds_completed()).unwrap_or(0),
            users: self.record.seats.iter().map(|s| s.user_id.clone()).collect(),
        }
    }

    pub fn board_snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    /// Unresolved events bound to `cell_id`.
    pub fn events_at(&self, cell_id: CellId) -> Result<Vec<CellEvent>> {
        if self.board.cell(cell_id).is_none() {
            return Err(GameError::CellNotFound);
        }
        Ok(self.events.events_at(cell_id).into_iter().cloned().collect())
    }

    pub fn pending_combats(&self) -> impl Iterator<Item = &CombatTicket> {
        self.pending_combats.values()
    }

    /// Seat a user. The fourth seat activates the match. Returns whether it did.
    pub fn join<R: Rng + ?Sized>(
        &mut self,
        user_id: &str,
        password: Option<&str>,
        class: Option<CharacterClass>,
        rng: &mut R,
    ) -> Result<bool> {
        let class = class
            .or_else(|| CharacterClass::ALL.choose(rng).copied())
            .unwrap_or(CharacterClass::Knight);
        self.record.admit(user_id, password, class)?;
        info!(
            "[Match] match={} user={} joined as {} ({} seats)",
            self.record.id,
            user_id,
            class,
            self.record.seats.len()
        );
        if self.record.is_full() {
            if let Err(err) = self.activate() {
                self.record.seats.pop();
                return Err(err);
            }
            return Ok(true);
        }
        Ok(false)
    }

    pub fn leave(&mut self, user_id: &str) -> Result<()> {
        self.record.vacate(user_id)?;
        info!("[Match] match={} user={} left", self.record.id, user_id);
        Ok(())
    }

    /// Owner-triggered start with at least `MIN_PLAYERS` seats.
    pub fn start(&mut self, user_id: &str) -> Result<()> {
        if self.record.owner != user_id {
            return Err(GameError::NotMatchOwner);
        }
        if self.record.status != MatchStatus::Waiting {
            return Err(GameError::MatchNotJoinable);
        }
        if self.record.seats.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }
        self.activate()
    }

    /// Owner-triggered early end of an active match.
    pub fn end(&mut self, user_id: &str) -> Result<()> {
        if self.record.owner != user_id {
            return Err(GameError::NotMatchOwner);
        }
        match self.record.status {
            MatchStatus::Finished => Err(GameError::MatchFinished),
            MatchStatus::Waiting => Err(GameError::MatchNotStarted),
            MatchStatus::Active => {
                if let Some(turn) = self.turn.as_mut() {
                    turn.finish();
                }
                self.pending_combats.clear();
                self.record.status = MatchStatus::Finished;
                info!("[Match] match={} ended by its owner", self.record.id);
                Ok(())
            }
        }
    }

    /// Create one character per seat on the spawn cells and hand the first turn out.
    fn activate(&mut self) -> Result<()> {
        let cells = self.starting_cells(self.record.seats.len())?;
        let characters: Vec<Character> = self
            .record
            .seats
            .iter()
            .zip(cells)
            .enumerate()
            .map(|(i, (seat, cell_id))| new_character(i, seat, cell_id))
            .collect();
        self.board.place_characters(characters);
        let turn = TurnCoordinator::begin(
            &mut self.board,
            self.record.turn_limit,
            self.config.actions_per_turn,
        )?;
        self.turn = Some(turn);
        self.record.status = MatchStatus::Active;
        info!(
            "[Match] match={} started with {} players on a {} board",
            self.record.id,
            self.record.seats.len(),
            self.board.board_type()
        );
        Ok(())
    }

    /// Spawn cells first, then any free empty cell without events, row by row.
    fn starting_cells(&self, count: usize) -> Result<Vec<CellId>> {
        let mut cells: Vec<CellId> = self.spawns.iter().copied().take(count).collect();
        let fallback = self
            .board
            .cells_of_type(CellType::Empty)
            .map(|c| c.id)
            .filter(|id| !self.spawns.contains(id) && !self.events.has_unresolved(*id));
        for id in fallback {
            if cells.len() >= count {
                break;
            }
            cells.push(id);
        }
        if cells.len() < count {
            return Err(GameError::InvalidConfig("the board has no room for every player".to_string()));
        }
        Ok(cells)
    }

    fn ensure_active(&self) -> Result<()> {
        match self.record.status {
            MatchStatus::Waiting => Err(GameError::MatchNotStarted),
            MatchStatus::Finished => Err(GameError::MatchFinished),
            MatchStatus::Active => Ok(()),
        }
    }

    fn settle(&mut self, advance: Option<TurnAdvance>) {
        if advance == Some(TurnAdvance::Finished) {
            self.record.status = MatchStatus::Finished;
            self.pending_combats.clear();
        }
    }

    pub fn move_character(
        &mut self,
        requester: &str,
        character_id: CharacterId,
        x: usize,
        y: usize,
    ) -> Result<MoveReport> {
        self.ensure_active()?;
        let turn = self.turn.as_mut().ok_or(GameError::MatchNotStarted)?;
        let report = turn.move_character(&mut self.board, &mut self.events, requester, character_id, x, y)?;
        self.settle(report.advance);
        Ok(report)
    }

    pub fn execute_actions(
        &mut self,
        requester: &str,
        character_id: CharacterId,
        selected: &[EventId],
    ) -> Result<ActionReport> {
        self.ensure_active()?;
        let turn = self.turn.as_mut().ok_or(GameError::MatchNotStarted)?;
        let report = turn.execute_actions(
            &mut self.board,
            &mut self.events,
            self.trigger.as_ref(),
            requester,
            character_id,
            selected,
        )?;
        self.settle(Some(report.advance));
        if self.record.status == MatchStatus::Active {
            for ticket in &report.combats {
                self.pending_combats.insert(ticket.id, ticket.clone());
            }
        }
        Ok(report)
    }

    /// Apply the outcome of an external combat session. Unknown tickets (already
    /// applied, or dropped when the match ended) are ignored.
    pub fn apply_combat_outcome(&mut self, ticket_id: Uuid, outcome: CombatOutcome) -> Option<String> {
        if self.record.status != MatchStatus::Active {
            return None;
        }
        let ticket = self.pending_combats.remove(&ticket_id)?;
        let character = self.board.character_mut(ticket.character_id)?;
        let message = match outcome {
            CombatOutcome::Victory => format!("{} defeated {}.", character.name, ticket.event_name),
            CombatOutcome::Defeat => {
                character.stunned = true;
                format!("{} was defeated by {} and will miss a turn.", character.name, ticket.event_name)
            }
            CombatOutcome::Abandoned => format!("The fight against {} was abandoned.", ticket.event_name),
        };
        debug!("[Match] match={} combat {} resolved: {:?}", self.record.id, ticket_id, outcome);
        Some(message)
    }
}

fn new_character(seat_index: usize, seat: &Seat, cell_id: CellId) -> Character {
    Character {
        id: (seat_index + 1) as CharacterId,
        user_id: seat.user_id.clone(),
        name: format!("{} ({})", seat.class, seat.user_id),
        class: seat.class,
        cell_id,
        actions: 0,
        inventory_id: Uuid::new_v4(),
        stats_id: Uuid::new_v4(),
        stunned: false,
    }
}

/// Convenience for building a match straight from request parameters.
pub fn create_match<R: Rng + ?Sized>(
    owner: &str,
    turn_limit: u32,
    visibility: Visibility,
    class: Option<CharacterClass>,
    blueprint: Blueprint,
    config: GameConfig,
    rng: &mut R,
) -> Result<MatchState> {
    let class = class
        .or_else(|| CharacterClass::ALL.choose(rng).copied())
        .unwrap_or(CharacterClass::Knight);
    let record = Match::new(Uuid::new_v4(), owner.to_string(), class, turn_limit, visibility)?;
    MatchState::new(record, blueprint, config)
}
