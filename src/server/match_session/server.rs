//! Match session actor.
//!
//! Owns the full state of one match. Requests on the match are handled here one
//! at a time, and each successful change is pushed to the registry and to the
//! feed subscribers.

use actix::prelude::*;
use std::collections::HashMap;
use std::time::Duration;
use log::{debug, info};
use uuid::Uuid;

use super::feed::FeedSession;
use super::messages::{
    End, ExecuteActions, FeedMessage, GetBoard, GetCellEvents, GetView, Join, JoinOutcome, Leave,
    Move, Start, Subscribe, Unsubscribe,
};
use crate::game::GameError;
use crate::game::MatchState;
use crate::game::turn::{ActionReport, MoveReport};
use crate::game::types::{CellEvent, CombatTicket, MatchId, MatchStatus};
use crate::config::server::FINISHED_MATCH_RETENTION_SECS;
use crate::server::combat::{CombatFinished, StartCombat};
use crate::server::registry::messages::{MatchClosed, SummaryChanged};
use crate::server::registry::server::MatchRegistry;

pub struct MatchSession {
    pub match_id: MatchId,
    state: MatchState,
    registry: Addr<MatchRegistry>,
    combat: Recipient<StartCombat>,
    subscribers: HashMap<Uuid, Addr<FeedSession>>,
    /// Delay between the match finishing and the actor stopping.
    retention: Duration,
    closing: bool,
}

impl MatchSession {
    pub fn new(state: MatchState, registry: Addr<MatchRegistry>, combat: Recipient<StartCombat>) -> Self {
        Self {
            match_id: state.id(),
            state,
            registry,
            combat,
            subscribers: HashMap::new(),
            retention: Duration::from_secs(FINISHED_MATCH_RETENTION_SECS),
            closing: false,
        }
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Send a message to every feed subscriber.
    fn broadcast(&self, msg: FeedMessage) {
        for addr in self.subscribers.values() {
            addr.do_send(msg.clone());
        }
    }

    /// Push the current state to the registry and the subscribers.
    fn publish(&self) {
        self.registry.do_send(SummaryChanged {
            summary: self.state.summary(),
        });
        self.broadcast(FeedMessage::MatchUpdate(self.state.view()));
    }

    fn publish_messages(&self, messages: Vec<String>) {
        if !messages.is_empty() {
            self.broadcast(FeedMessage::Messages { messages });
        }
    }

    /// Hand combat sessions to the external collaborator; outcomes come back as
    /// `CombatFinished` on this actor's mailbox.
    fn hand_off_combats(&self, tickets: &[CombatTicket], ctx: &mut Context<Self>) {
        for ticket in tickets {
            self.combat.do_send(StartCombat {
                ticket: ticket.clone(),
                reply_to: ctx.address().recipient(),
            });
            self.broadcast(FeedMessage::CombatStarted(ticket.clone()));
        }
    }

    /// Tell subscribers and the registry that the match is gone, then stop.
    fn close(&mut self, reason: &str, ctx: &mut Context<Self>) {
        self.broadcast(FeedMessage::Closed {
            reason: reason.to_string(),
        });
        self.registry.do_send(MatchClosed { match_id: self.match_id });
        ctx.stop();
    }

    /// Once finished, keep the match readable for `retention`, then close it.
    fn schedule_close_if_finished(&mut self, ctx: &mut Context<Self>) {
        if self.closing || self.state.status() != MatchStatus::Finished {
            return;
        }
        self.closing = true;
        info!(
            "[MatchSession] match={} finished, closing in {:?}",
            self.match_id, self.retention
        );
        ctx.run_later(self.retention, |act, ctx| act.close("Match finished.", ctx));
    }

    fn log_rejection(&self, action: &str, user_id: &str, err: &GameError) {
        debug!(
            "[MatchSession] match={} {} by {} rejected: {} ({})",
            self.match_id,
            action,
            user_id,
            err,
            err.code()
        );
    }
}

impl Actor for MatchSession {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("[MatchSession] match={} ready", self.match_id);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[MatchSession] match={} stopped", self.match_id);
    }
}

impl Handler<Join> for MatchSession {
    type Result = Result<JoinOutcome, GameError>;

    fn handle(&mut self, msg: Join, _ctx: &mut Self::Context) -> Self::Result {
        let joined = self
            .state
            .join(&msg.user_id, msg.password.as_deref(), msg.class, &mut rand::rng());
        match joined {
            Ok(started) => {
                self.publish();
                Ok(JoinOutcome {
                    summary: self.state.summary(),
                    started,
                })
            }
            Err(err) => {
                self.log_rejection("join", &msg.user_id, &err);
                Err(err)
            }
        }
    }
}

impl Handler<Leave> for MatchSession {
    type Result = Result<(), GameError>;

    fn handle(&mut self, msg: Leave, ctx: &mut Self::Context) -> Self::Result {
        if let Err(err) = self.state.leave(&msg.user_id) {
            self.log_rejection("leave", &msg.user_id, &err);
            return Err(err);
        }
        self.publish();
        if self.state.status() == MatchStatus::Finished {
            // Last seat gone: nobody can play this match any more.
            self.closing = true;
            self.close("Every player left the match.", ctx);
        }
        Ok(())
    }
}

impl Handler<Start> for MatchSession {
    type Result = Result<(), GameError>;

    fn handle(&mut self, msg: Start, _ctx: &mut Self::Context) -> Self::Result {
        self.state.start(&msg.user_id).inspect_err(|err| self.log_rejection("start", &msg.user_id, err))?;
        self.publish();
        Ok(())
    }
}

impl Handler<End> for MatchSession {
    type Result = Result<(), GameError>;

    fn handle(&mut self, msg: End, ctx: &mut Self::Context) -> Self::Result {
        self.state.end(&msg.user_id).inspect_err(|err| self.log_rejection("end", &msg.user_id, err))?;
        self.publish();
        self.schedule_close_if_finished(ctx);
        Ok(())
    }
}

impl Handler<GetView> for MatchSession {
    type Result = MessageResult<GetView>;

    fn handle(&mut self, _msg: GetView, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.state.view())
    }
}

impl Handler<GetBoard> for MatchSession {
    type Result = MessageResult<GetBoard>;

    fn handle(&mut self, _msg: GetBoard, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.state.board_snapshot())
    }
}

impl Handler<GetCellEvents> for MatchSession {
    type Result = Result<Vec<CellEvent>, GameError>;

    fn handle(&mut self, msg: GetCellEvents, _ctx: &mut Self::Context) -> Self::Result {
        self.state.events_at(msg.cell_id)
    }
}

impl Handler<Move> for MatchSession {
    type Result = Result<MoveReport, GameError>;

    fn handle(&mut self, msg: Move, ctx: &mut Self::Context) -> Self::Result {
        let report = self
            .state
            .move_character(&msg.user_id, msg.character_id, msg.x, msg.y)
            .inspect_err(|err| self.log_rejection("move", &msg.user_id, err))?;
        self.publish_messages(vec![report.message.clone()]);
        self.publish();
        self.schedule_close_if_finished(ctx);
        Ok(report)
    }
}

impl Handler<ExecuteActions> for MatchSession {
    type Result = Result<ActionReport, GameError>;

    fn handle(&mut self, msg: ExecuteActions, ctx: &mut Self::Context) -> Self::Result {
        let report = self
            .state
            .execute_actions(&msg.user_id, msg.character_id, &msg.event_ids)
            .inspect_err(|err| self.log_rejection("execute actions", &msg.user_id, err))?;
        self.publish_messages(report.messages.clone());
        if self.state.status() == MatchStatus::Active {
            self.hand_off_combats(&report.combats, ctx);
        }
        self.publish();
        self.schedule_close_if_finished(ctx);
        Ok(report)
    }
}

impl Handler<CombatFinished> for MatchSession {
    type Result = ();

    fn handle(&mut self, msg: CombatFinished, _ctx: &mut Self::Context) -> Self::Result {
        match self.state.apply_combat_outcome(msg.ticket_id, msg.outcome) {
            Some(message) => {
                self.publish_messages(vec![message]);
                self.publish();
            }
            None => debug!(
                "[MatchSession] match={} ignored outcome of ticket {}",
                self.match_id, msg.ticket_id
            ),
        }
    }
}

impl Handler<Subscribe> for MatchSession {
    type Result = MessageResult<Subscribe>;

    fn handle(&mut self, msg: Subscribe, _ctx: &mut Self::Context) -> Self::Result {
        self.subscribers.insert(msg.id, msg.addr);
        debug!("[MatchSession] match={} feed {} subscribed", self.match_id, msg.id);
        MessageResult(self.state.view())
    }
}

impl Handler<Unsubscribe> for MatchSession {
    type Result = ();

    fn handle(&mut self, msg: Unsubscribe, _ctx: &mut Self::Context) -> Self::Result {
        self.subscribers.remove(&msg.id);
    }
}
