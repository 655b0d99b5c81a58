//! Hand-off to the external combat collaborator.
//!
//! A match actor sends `StartCombat` and keeps serving other requests; the outcome
//! comes back later as a `CombatFinished` message on the match's mailbox. Any actor
//! handling `StartCombat` can stand in for the collaborator. `CombatArena` is the
//! built-in stand-in: it simulates a fight of random length and outcome.
use std::time::Duration;

use actix::prelude::*;
use log::{info, warn};
use rand::Rng;
use uuid::Uuid;

use crate::game::types::{CombatOutcome, CombatTicket};

/// Chance that the character wins a simulated fight.
const VICTORY_CHANCE: f64 = 0.6;

/// Message: run the combat session described by `ticket`, answer on `reply_to`.
#[derive(Message)]
#[rtype(result = "()")]
pub struct StartCombat {
    pub ticket: CombatTicket,
    pub reply_to: Recipient<CombatFinished>,
}

/// Message: outcome of a combat session.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
#[rtype(result = "()")]
pub struct CombatFinished {
    pub ticket_id: Uuid,
    pub outcome: CombatOutcome,
}

pub struct CombatArena {
    /// Sessions still running after this long are abandoned.
    timeout: Duration,
    /// Upper bound of a simulated fight.
    max_fight: Duration,
}

impl CombatArena {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            max_fight: Duration::from_secs(3),
        }
    }

    pub fn with_max_fight(mut self, max_fight: Duration) -> Self {
        self.max_fight = max_fight;
        self
    }
}

impl Actor for CombatArena {
    type Context = Context<Self>;
}

impl Handler<StartCombat> for CombatArena {
    type Result = ();

    fn handle(&mut self, msg: StartCombat, _ctx: &mut Self::Context) -> Self::Result {
        let mut rng = rand::rng();
        let max_ms = self.max_fight.as_millis().max(1) as u64;
        let fight = Duration::from_millis(rng.random_range(0..=max_ms));
        let outcome = if rng.random_bool(VICTORY_CHANCE) {
            CombatOutcome::Victory
        } else {
            CombatOutcome::Defeat
        };
        let timeout = self.timeout;
        info!(
            "[Combat] Character {} of match {} fights {} (ticket {})",
            msg.ticket.character_id, msg.ticket.match_id, msg.ticket.event_name, msg.ticket.id
        );

        actix::spawn(async move {
            let session = async {
                tokio::time::sleep(fight).await;
                outcome
            };
            let outcome = match tokio::time::timeout(timeout, session).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!("[Combat] Ticket {} timed out after {:?}", msg.ticket.id, timeout);
                    CombatOutcome::Abandoned
                }
            };
            msg.reply_to.do_send(CombatFinished {
                ticket_id: msg.ticket.id,
                outcome,
            });
        });
    }
}
