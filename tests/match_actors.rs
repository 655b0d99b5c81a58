//! Actor-level behaviour: serialized joins and the combat hand-off round trip.
use std::time::Duration;

use actix::prelude::*;
use grid_tactics::config::game::GameConfig;
use grid_tactics::game::GameError;
use grid_tactics::game::grid::Blueprint;
use grid_tactics::game::types::{CharacterClass, CombatOutcome, EventKind, MatchStatus};
use grid_tactics::server::combat::{CombatArena, CombatFinished, StartCombat};
use grid_tactics::server::match_session::messages::{End, ExecuteActions, GetBoard, GetView, Join, Move, Start};
use grid_tactics::server::match_session::server::MatchSession;
use grid_tactics::server::registry::messages::{CreateMatch, GetMatch, ListJoinable};
use grid_tactics::server::registry::server::MatchRegistry;

/// Answers every combat request with a fixed outcome, right away.
struct FixedOutcome(CombatOutcome);

impl Actor for FixedOutcome {
    type Context = Context<Self>;
}

impl Handler<StartCombat> for FixedOutcome {
    type Result = ();

    fn handle(&mut self, msg: StartCombat, _ctx: &mut Self::Context) {
        msg.reply_to.do_send(CombatFinished {
            ticket_id: msg.ticket.id,
            outcome: self.0,
        });
    }
}

fn layout() -> Blueprint {
    Blueprint::from_layout("cave", &["1-X-2", "-----", "3-X-4"])
        .unwrap()
        .with_event(1, 0, "Goblin ambush", EventKind::Monster)
}

async fn open_match(registry: &Addr<MatchRegistry>, owner: &str) -> Addr<MatchSession> {
    let match_id = registry
        .send(CreateMatch {
            owner: owner.to_string(),
            turn_limit: 5,
            is_public: true,
            password: None,
            class: Some(CharacterClass::Knight),
            blueprint: Some(layout()),
        })
        .await
        .unwrap()
        .unwrap();
    registry.send(GetMatch { match_id }).await.unwrap().unwrap()
}

fn join(user: &str) -> Join {
    Join {
        user_id: user.to_string(),
        password: None,
        class: Some(CharacterClass::Knight),
    }
}

#[actix_web::test]
async fn only_one_of_many_racing_joins_gets_the_last_seat() {
    let arena = CombatArena::new(Duration::from_secs(1)).start();
    let registry = MatchRegistry::new(GameConfig::default(), arena.recipient()).start();
    let session = open_match(&registry, "owner").await;
    session.send(join("bob")).await.unwrap().unwrap();
    session.send(join("carol")).await.unwrap().unwrap();

    // All requests are queued before any of them is answered.
    let racing: Vec<_> = (0..5).map(|i| session.send(join(&format!("racer-{}", i)))).collect();
    let mut admitted = 0;
    for request in racing {
        match request.await.unwrap() {
            Ok(outcome) => {
                assert!(outcome.started);
                admitted += 1;
            }
            Err(err) => assert_eq!(err, GameError::MatchFull),
        }
    }
    assert_eq!(admitted, 1);

    let view = session.send(GetView).await.unwrap();
    assert_eq!(view.status, MatchStatus::Active);
    assert_eq!(view.users.len(), 4);

    // The registry hears about it and stops listing the match.
    actix::clock::sleep(Duration::from_millis(20)).await;
    assert!(registry.send(ListJoinable).await.unwrap().is_empty());
}

#[actix_web::test]
async fn combat_outcome_comes_back_to_the_match() {
    let arena = FixedOutcome(CombatOutcome::Defeat).start();
    let registry = MatchRegistry::new(GameConfig::default(), arena.recipient()).start();
    let session = open_match(&registry, "alice").await;
    session.send(join("bob")).await.unwrap().unwrap();
    session
        .send(Start {
            user_id: "alice".to_string(),
        })
        .await
        .unwrap()
        .unwrap();

    let report = session
        .send(Move {
            user_id: "alice".to_string(),
            character_id: 1,
            x: 1,
            y: 0,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.events.len(), 1);

    let report = session
        .send(ExecuteActions {
            user_id: "alice".to_string(),
            character_id: 1,
            event_ids: vec![report.events[0].id],
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.combats.len(), 1);

    let mut stunned = false;
    for _ in 0..50 {
        let board = session.send(GetBoard).await.unwrap();
        stunned = board.characters.iter().any(|c| c.id == 1 && c.stunned);
        if stunned {
            break;
        }
        actix::clock::sleep(Duration::from_millis(10)).await;
    }
    assert!(stunned);
}

#[actix_web::test]
async fn unknown_match_is_not_found() {
    let arena = CombatArena::new(Duration::from_secs(1)).start();
    let registry = MatchRegistry::new(GameConfig::default(), arena.recipient()).start();
    let found = registry
        .send(GetMatch {
            match_id: uuid::Uuid::new_v4(),
        })
        .await
        .unwrap();
    assert!(matches!(found, Err(GameError::MatchNotFound)));
}

/// Collects combat outcomes addressed to it.
#[derive(Default)]
struct Outcomes(std::sync::Arc<std::sync::Mutex<Vec<CombatFinished>>>);

impl Actor for Outcomes {
    type Context = Context<Self>;
}

impl Handler<CombatFinished> for Outcomes {
    type Result = ();

    fn handle(&mut self, msg: CombatFinished, _ctx: &mut Self::Context) {
        self.0.lock().unwrap().push(msg);
    }
}

async fn started_duel(registry: &Addr<MatchRegistry>) -> Addr<MatchSession> {
    let session = open_match(registry, "alice").await;
    session.send(join("bob")).await.unwrap().unwrap();
    session
        .send(Start {
            user_id: "alice".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    session
}

#[actix_web::test]
async fn registry_installs_the_combat_trigger_on_new_matches() {
    let arena = FixedOutcome(CombatOutcome::Victory).start();
    let registry = MatchRegistry::new(GameConfig::default(), arena.recipient())
        .with_combat_trigger(|event| event.kind == EventKind::Trap)
        .start();
    let board = Blueprint::from_layout("cave", &["1-X-2", "-----", "3-X-4"])
        .unwrap()
        .with_event(1, 0, "Goblin ambush", EventKind::Monster)
        .with_event(1, 0, "Spike pit", EventKind::Trap);
    let match_id = registry
        .send(CreateMatch {
            owner: "alice".to_string(),
            turn_limit: 5,
            is_public: true,
            password: None,
            class: Some(CharacterClass::Knight),
            blueprint: Some(board),
        })
        .await
        .unwrap()
        .unwrap();
    let session = registry.send(GetMatch { match_id }).await.unwrap().unwrap();
    session.send(join("bob")).await.unwrap().unwrap();
    session
        .send(Start {
            user_id: "alice".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    session
        .send(Move {
            user_id: "alice".to_string(),
            character_id: 1,
            x: 1,
            y: 0,
        })
        .await
        .unwrap()
        .unwrap();

    let report = session
        .send(ExecuteActions {
            user_id: "alice".to_string(),
            character_id: 1,
            event_ids: vec![1, 2],
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.combats.len(), 1);
    assert_eq!(report.combats[0].event_name, "Spike pit");
}

#[actix_web::test]
async fn arena_settles_fights_within_the_timeout() {
    let arena = CombatArena::new(Duration::from_secs(1))
        .with_max_fight(Duration::from_millis(5))
        .start();
    let outcomes = Outcomes::default();
    let seen = outcomes.0.clone();
    let reply_to = outcomes.start().recipient();

    let registry = MatchRegistry::new(GameConfig::default(), arena.clone().recipient()).start();
    let session = started_duel(&registry).await;
    session
        .send(Move {
            user_id: "alice".to_string(),
            character_id: 1,
            x: 1,
            y: 0,
        })
        .await
        .unwrap()
        .unwrap();
    let ticket = session
        .send(ExecuteActions {
            user_id: "alice".to_string(),
            character_id: 1,
            event_ids: vec![1],
        })
        .await
        .unwrap()
        .unwrap()
        .combats
        .remove(0);

    arena.send(StartCombat { ticket: ticket.clone(), reply_to }).await.unwrap();
    for _ in 0..100 {
        if !seen.lock().unwrap().is_empty() {
            break;
        }
        actix::clock::sleep(Duration::from_millis(10)).await;
    }
    let outcomes = seen.lock().unwrap();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].ticket_id, ticket.id);
    assert_ne!(outcomes[0].outcome, CombatOutcome::Abandoned);
}

#[actix_web::test]
async fn finished_matches_are_dropped_after_retention() {
    let arena = FixedOutcome(CombatOutcome::Victory).start();
    let registry = MatchRegistry::new(GameConfig::default(), arena.recipient())
        .with_finished_retention(Duration::from_millis(20))
        .start();
    let session = started_duel(&registry).await;
    let match_id = session.send(GetView).await.unwrap().id;

    session
        .send(End {
            user_id: "alice".to_string(),
        })
        .await
        .unwrap()
        .unwrap();
    // Still readable right after the end.
    assert_eq!(session.send(GetView).await.unwrap().status, MatchStatus::Finished);
    assert!(registry.send(GetMatch { match_id }).await.unwrap().is_ok());

    let mut gone = false;
    for _ in 0..50 {
        actix::clock::sleep(Duration::from_millis(10)).await;
        if matches!(
            registry.send(GetMatch { match_id }).await.unwrap(),
            Err(GameError::MatchNotFound)
        ) {
            gone = true;
            break;
        }
    }
    assert!(gone);
}
