//! Match registry actor.
//!
//! Creates matches and starts one `MatchSession` actor per match, keeps a cached
//! summary of each for the lobby listing, and hands out match addresses. Everything
//! that must be atomic for a match (joins included) runs inside that match's actor,
//! so matches never wait on each other.

use actix::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use log::{debug, info};

use super::messages::{CreateMatch, GetMatch, ListJoinable, MatchClosed, SummaryChanged};
use crate::config::game::GameConfig;
use crate::config::matchmaking::MAX_SEATS;
use crate::config::server::FINISHED_MATCH_RETENTION_SECS;
use crate::game::GameError;
use crate::game::grid::Blueprint;
use crate::game::lobby::{MatchSummary, Visibility};
use crate::game::state::create_match;
use crate::game::types::{CellEvent, MatchId, MatchStatus};
use crate::server::combat::StartCombat;
use crate::server::match_session::server::MatchSession;

struct RegistryEntry {
    addr: Addr<MatchSession>,
    summary: MatchSummary,
}

pub struct MatchRegistry {
    matches: HashMap<MatchId, RegistryEntry>,
    /// Creation order, used for listing.
    order: Vec<MatchId>,
    config: GameConfig,
    /// External combat collaborator handed to every match.
    combat: Recipient<StartCombat>,
    /// Which resolved events start a combat session; monsters when unset.
    trigger: Option<Arc<dyn Fn(&CellEvent) -> bool + Send + Sync>>,
    /// How long a finished match stays readable before its actor stops.
    retention: Duration,
    /// Fixed map used instead of a generated board.
    board: Option<Blueprint>,
}

impl MatchRegistry {
    pub fn new(config: GameConfig, combat: Recipient<StartCombat>) -> Self {
        Self {
            matches: HashMap::new(),
            order: Vec::new(),
            config,
            combat,
            trigger: None,
            retention: Duration::from_secs(FINISHED_MATCH_RETENTION_SECS),
            board: None,
        }
    }

    /// Play every match created afterwards on `board`.
    pub fn with_board(mut self, board: Blueprint) -> Self {
        self.board = Some(board);
        self
    }

    /// Install the combat predicate used by every match created afterwards.
    pub fn with_combat_trigger(mut self, trigger: impl Fn(&CellEvent) -> bool + Send + Sync + 'static) -> Self {
        self.trigger = Some(Arc::new(trigger));
        self
    }

    pub fn with_finished_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    fn joinable(&self) -> Vec<MatchSummary> {
        self.order
            .iter()
            .filter_map(|id| self.matches.get(id))
            .map(|entry| &entry.summary)
            .filter(|s| s.status == MatchStatus::Waiting && s.seats < MAX_SEATS)
            .cloned()
            .collect()
    }
}

impl Actor for MatchRegistry {
    type Context = Context<Self>;
}

impl Handler<CreateMatch> for MatchRegistry {
    type Result = Result<MatchId, GameError>;

    fn handle(&mut self, msg: CreateMatch, ctx: &mut Self::Context) -> Self::Result {
        let visibility = Visibility::from_request(msg.is_public, msg.password)?;
        let mut rng = rand::rng();
        let blueprint = msg
            .blueprint
            .or_else(|| self.board.clone())
            .unwrap_or_else(|| Blueprint::generate(&self.config, &mut rng));
        let state = create_match(
            &msg.owner,
            msg.turn_limit,
            visibility,
            msg.class,
            blueprint,
            self.config.clone(),
            &mut rng,
        )?;

        let state = match &self.trigger {
            Some(trigger) => {
                let trigger = Arc::clone(trigger);
                state.with_combat_trigger(move |event: &CellEvent| trigger(event))
            }
            None => state,
        };
        let match_id = state.id();
        let summary = state.summary();
        let addr = MatchSession::new(state, ctx.address(), self.combat.clone())
            .with_retention(self.retention)
            .start();
        self.matches.insert(match_id, RegistryEntry { addr, summary });
        self.order.push(match_id);
        info!(
            "[Registry] Match {} created by {} (turn limit {}, public={})",
            match_id, msg.owner, msg.turn_limit, msg.is_public
        );
        Ok(match_id)
    }
}

impl Handler<ListJoinable> for MatchRegistry {
    type Result = MessageResult<ListJoinable>;

    fn handle(&mut self, _msg: ListJoinable, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.joinable())
    }
}

impl Handler<GetMatch> for MatchRegistry {
    type Result = Result<Addr<MatchSession>, GameError>;

    fn handle(&mut self, msg: GetMatch, _ctx: &mut Self::Context) -> Self::Result {
        self.matches
            .get(&msg.match_id)
            .map(|entry| entry.addr.clone())
            .ok_or(GameError::MatchNotFound)
    }
}

impl Handler<SummaryChanged> for MatchRegistry {
    type Result = ();

    fn handle(&mut self, msg: SummaryChanged, _ctx: &mut Self::Context) -> Self::Result {
        if let Some(entry) = self.matches.get_mut(&msg.summary.id) {
            entry.summary = msg.summary;
        }
    }
}

impl Handler<MatchClosed> for MatchRegistry {
    type Result = ();

    fn handle(&mut self, msg: MatchClosed, _ctx: &mut Self::Context) -> Self::Result {
        if self.matches.remove(&msg.match_id).is_some() {
            self.order.retain(|id| *id != msg.match_id);
            debug!("[Registry] Match {} removed", msg.match_id);
        }
    }
}
