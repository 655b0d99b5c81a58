//! WebSocket feed: snapshot on connect, Ping/Pong, live updates and close.
use std::time::Duration;

use actix::Actor;
use actix_web::{App, web};
use awc::ws;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;

use grid_tactics::config::game::GameConfig;
use grid_tactics::game::grid::Blueprint;
use grid_tactics::game::types::CharacterClass;
use grid_tactics::server::combat::CombatArena;
use grid_tactics::server::match_session::messages::{Join, Leave};
use grid_tactics::server::registry::messages::{CreateMatch, GetMatch};
use grid_tactics::server::registry::server::MatchRegistry;
use grid_tactics::server::router;
use grid_tactics::server::state::AppState;

async fn next_json<S>(framed: &mut S) -> Value
where
    S: futures_util::Stream<Item = Result<ws::Frame, actix_web_actors::ws::ProtocolError>> + Unpin,
{
    loop {
        let frame = actix::clock::timeout(Duration::from_secs(5), framed.next())
            .await
            .expect("feed went quiet")
            .expect("feed ended")
            .unwrap();
        if let ws::Frame::Text(bytes) = frame {
            return serde_json::from_slice(&bytes).unwrap();
        }
    }
}

#[actix_web::test]
async fn feed_streams_match_updates_until_the_match_closes() {
    let arena = CombatArena::new(Duration::from_secs(1)).start();
    let registry = MatchRegistry::new(GameConfig::default(), arena.recipient()).start();
    let state = web::Data::new(AppState::new(registry.clone()));
    let mut srv = actix_test::start(move || App::new().app_data(state.clone()).configure(router::config));

    let match_id = registry
        .send(CreateMatch {
            owner: "alice".to_string(),
            turn_limit: 5,
            is_public: true,
            password: None,
            class: Some(CharacterClass::Mage),
            blueprint: Some(Blueprint::from_layout("cave", &["1-X-2", "-----", "3-X-4"]).unwrap()),
        })
        .await
        .unwrap()
        .unwrap();
    let session = registry.send(GetMatch { match_id }).await.unwrap().unwrap();

    // Without a token the handshake is refused.
    assert!(srv.ws_at(&format!("/ws/matches/{}", match_id)).await.is_err());

    let mut framed = srv
        .ws_at(&format!("/ws/matches/{}?token=alice", match_id))
        .await
        .unwrap();

    let frame = next_json(&mut framed).await;
    assert_eq!(frame["action"], "MatchUpdate");
    assert_eq!(frame["data"]["status"], "waiting");
    assert_eq!(frame["data"]["users"], serde_json::json!(["alice"]));

    framed
        .send(ws::Message::Text(r#"{"action":"Ping"}"#.into()))
        .await
        .unwrap();
    assert_eq!(next_json(&mut framed).await["action"], "Pong");

    framed.send(ws::Message::Text("move please".into())).await.unwrap();
    let frame = next_json(&mut framed).await;
    assert_eq!(frame["action"], "Error");
    assert_eq!(frame["data"]["code"], "INVALID_MESSAGE");

    session
        .send(Join {
            user_id: "bob".to_string(),
            password: None,
            class: None,
        })
        .await
        .unwrap()
        .unwrap();
    let frame = next_json(&mut framed).await;
    assert_eq!(frame["action"], "MatchUpdate");
    assert_eq!(frame["data"]["users"], serde_json::json!(["alice", "bob"]));

    for user in ["bob", "alice"] {
        session
            .send(Leave {
                user_id: user.to_string(),
            })
            .await
            .unwrap()
            .unwrap();
    }
    let mut closed = None;
    for _ in 0..5 {
        let frame = next_json(&mut framed).await;
        if frame["action"] == "Closed" {
            closed = Some(frame);
            break;
        }
    }
    assert_eq!(closed.unwrap()["data"]["reason"], "Every player left the match.");
}
