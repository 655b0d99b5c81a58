//! REST surface: authentication, status codes and the client-facing error bodies.
use std::time::Duration;

use actix::Actor;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use grid_tactics::config::game::GameConfig;
use grid_tactics::game::grid::Blueprint;
use grid_tactics::game::types::EventKind;
use grid_tactics::server::combat::CombatArena;
use grid_tactics::server::registry::server::MatchRegistry;
use grid_tactics::server::router;
use grid_tactics::server::state::AppState;

fn app_state() -> web::Data<AppState> {
    let arena = CombatArena::new(Duration::from_secs(1)).start();
    let registry = MatchRegistry::new(GameConfig::default(), arena.recipient()).start();
    web::Data::new(AppState::new(registry))
}

/// Every match is played on the same small map.
fn scripted_state() -> web::Data<AppState> {
    let board = Blueprint::from_layout("forest", &["1-X-2", "-----", "3-X-4"])
        .unwrap()
        .with_event(1, 0, "Goblin ambush", EventKind::Monster)
        .with_event(1, 0, "Treasure chest", EventKind::Treasure);
    let arena = CombatArena::new(Duration::from_secs(1)).start();
    let registry = MatchRegistry::new(GameConfig::default(), arena.recipient())
        .with_board(board)
        .start();
    web::Data::new(AppState::new(registry))
}

fn bearer(user: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", user))
}

#[actix_web::test]
async fn requests_without_credentials_are_rejected() {
    let app = test::init_service(App::new().app_data(app_state()).configure(router::config)).await;

    let req = test::TestRequest::get().uri("/matches/available").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[actix_web::test]
async fn malformed_input_is_a_bad_request() {
    let app = test::init_service(App::new().app_data(app_state()).configure(router::config)).await;

    let req = test::TestRequest::get()
        .uri("/matches/not-a-match")
        .insert_header(bearer("alice"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/matches")
        .insert_header(bearer("alice"))
        .set_json(json!({ "turnLimit": "ten" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "BAD_REQUEST");

    let req = test::TestRequest::post()
        .uri("/matches")
        .insert_header(bearer("alice"))
        .set_json(json!({ "isPublic": false }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn match_lifecycle_over_http() {
    let app = test::init_service(App::new().app_data(app_state()).configure(router::config)).await;

    let req = test::TestRequest::post()
        .uri("/matches")
        .insert_header(bearer("alice"))
        .set_json(json!({ "turnLimit": 5, "isPublic": true, "class": "knight" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    let match_id = body["matchId"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/matches/available")
        .insert_header(bearer("bob"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["availableMatches"][0]["id"], match_id.as_str());
    assert_eq!(body["availableMatches"][0]["public"], true);

    let req = test::TestRequest::post()
        .uri(&format!("/matches/{}/join", match_id))
        .insert_header(bearer("bob"))
        .set_json(json!({ "class": "archer" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let move_body = json!({ "characterId": 2, "x": 0, "y": 0 });
    let req = test::TestRequest::post()
        .uri(&format!("/matches/{}/move", match_id))
        .insert_header(bearer("bob"))
        .set_json(&move_body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "MATCH_NOT_STARTED");

    let req = test::TestRequest::post()
        .uri(&format!("/matches/{}/start", match_id))
        .insert_header(bearer("alice"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/matches/{}", match_id))
        .insert_header(bearer("bob"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["match"]["status"], "active");
    assert_eq!(body["match"]["characterTurn"], 1);

    let req = test::TestRequest::post()
        .uri(&format!("/matches/{}/move", match_id))
        .insert_header(bearer("bob"))
        .set_json(&move_body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Not your turn.");

    // Pick an enterable free cell beyond a knight's reach of alice.
    let req = test::TestRequest::get()
        .uri(&format!("/matches/{}/board", match_id))
        .insert_header(bearer("alice"))
        .to_request();
    let board: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(board["status"], "success");
    let cells = board["cells"].as_array().unwrap();
    let characters = board["characters"].as_array().unwrap();
    let alice_cell = characters[0]["cellId"].as_u64().unwrap();
    let coords = |cell: &Value| (cell["x"].as_i64().unwrap(), cell["y"].as_i64().unwrap());
    let (ax, ay) = coords(cells.iter().find(|c| c["id"].as_u64() == Some(alice_cell)).unwrap());
    let occupied: Vec<u64> = characters.iter().filter_map(|c| c["cellId"].as_u64()).collect();
    let far = cells
        .iter()
        .filter(|c| c["type"] == "-" || c["type"] == "B")
        .filter(|c| !occupied.contains(&c["id"].as_u64().unwrap()))
        .find(|c| {
            let (x, y) = coords(c);
            (x - ax).abs() + (y - ay).abs() > 3
        })
        .unwrap();
    let (fx, fy) = coords(far);

    let req = test::TestRequest::post()
        .uri(&format!("/matches/{}/move", match_id))
        .insert_header(bearer("alice"))
        .set_json(json!({ "characterId": 1, "x": fx, "y": fy }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "OUT_OF_REACH");
    assert_eq!(body["message"], "Cell out of reach.");
}

#[actix_web::test]
async fn scripted_match_over_http() {
    let app = test::init_service(App::new().app_data(scripted_state()).configure(router::config)).await;

    let req = test::TestRequest::post()
        .uri("/matches")
        .insert_header(bearer("alice"))
        .set_json(json!({ "isPublic": true, "class": "knight" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let base = format!("/matches/{}", body["matchId"].as_str().unwrap());

    let post = |user: &str, path: &str, body: Value| {
        test::TestRequest::post()
            .uri(&format!("{}{}", base, path))
            .insert_header(bearer(user))
            .set_json(body)
            .to_request()
    };

    let resp = test::call_service(&app, post("bob", "/join", json!({ "class": "knight" }))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = test::call_service(&app, post("alice", "/start", json!({}))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Cell 2 is (1, 0).
    let req = test::TestRequest::get()
        .uri(&format!("{}/cells/2/events", base))
        .insert_header(bearer("bob"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["events"], json!([{ "id": 1, "name": "Goblin ambush" }, { "id": 2, "name": "Treasure chest" }]));

    let resp = test::call_service(&app, post("alice", "/actions", json!({ "characterId": 1, "eventIds": [2] }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "WRONG_PHASE");

    let req = post("alice", "/move", json!({ "characterId": 1, "x": 1, "y": 0 }));
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["turnComplete"], false);
    assert_eq!(body["character"]["cellId"], 2);
    assert_eq!(body["events"].as_array().unwrap().len(), 2);

    let req = post("alice", "/actions", json!({ "characterId": 1, "eventIds": [2] }));
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["combat"], json!([]));

    let req = post("bob", "/move", json!({ "characterId": 2, "x": 4, "y": 1 }));
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["turnComplete"], true);
    assert_eq!(body["events"], json!([]));

    let req = post("alice", "/move", json!({ "characterId": 1, "x": 1, "y": 0 }));
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["events"], json!([{ "id": 1, "name": "Goblin ambush" }]));
    let req = post("alice", "/actions", json!({ "characterId": 1, "eventIds": [1] }));
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["combat"][0]["eventName"], "Goblin ambush");
    assert_eq!(body["combat"][0]["characterId"], 1);

    let resp = test::call_service(&app, post("bob", "/end", json!({}))).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = test::call_service(&app, post("alice", "/end", json!({}))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, post("bob", "/actions", json!({ "characterId": 2, "eventIds": [] }))).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "MATCH_FINISHED");

    let req = test::TestRequest::get().uri(&base).insert_header(bearer("bob")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["match"]["status"], "finished");
    assert_eq!(body["match"]["elapsedTurns"], 1);
}

#[actix_web::test]
async fn leaving_a_waiting_match_over_http() {
    let app = test::init_service(App::new().app_data(scripted_state()).configure(router::config)).await;

    let req = test::TestRequest::post()
        .uri("/matches")
        .insert_header(bearer("carol"))
        .set_json(json!({ "isPublic": false, "password": "p1" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let base = format!("/matches/{}", body["matchId"].as_str().unwrap());

    let join = |password: &str| {
        test::TestRequest::post()
            .uri(&format!("{}/join", base))
            .insert_header(bearer("dave"))
            .set_json(json!({ "password": password }))
            .to_request()
    };
    let resp = test::call_service(&app, join("nope")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(test::call_service(&app, join("p1")).await.status(), StatusCode::OK);

    let leave = || {
        test::TestRequest::post()
            .uri(&format!("{}/leave", base))
            .insert_header(bearer("dave"))
            .to_request()
    };
    let body: Value = test::call_and_read_body_json(&app, leave()).await;
    assert_eq!(body["status"], "success");
    let resp = test::call_service(&app, leave()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NOT_SEATED");

    let req = test::TestRequest::get().uri(&base).insert_header(bearer("dave")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["match"]["users"], json!(["carol"]));
}
