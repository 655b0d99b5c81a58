//! HTTP handlers.
//!
//! Each handler authenticates the caller, forwards one message to the registry or to
//! the match actor and shapes the reply. Every rejection is an `ApiError`.
use actix::Addr;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::config::matchmaking::DEFAULT_TURN_LIMIT;
use crate::game::board::BoardSnapshot;
use crate::game::lobby::MatchSummary;
use crate::game::state::MatchView;
use crate::game::turn::TurnAdvance;
use crate::game::types::{
    CellId, Character, CharacterClass, CharacterId, CombatTicket, EventId, MatchId,
};
use crate::server::auth::Identity;
use crate::server::http_error::ApiError;
use crate::server::match_session::messages::{
    End, ExecuteActions, GetBoard, GetCellEvents, GetView, Join, Leave, Move, Start,
};
use crate::server::match_session::server::MatchSession;
use crate::server::registry::messages::{CreateMatch, GetMatch, ListJoinable};
use crate::server::state::AppState;

const OK: &str = "success";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    #[serde(default = "default_turn_limit")]
    pub turn_limit: u32,
    #[serde(default)]
    pub is_public: bool,
    pub password: Option<String>,
    pub class: Option<CharacterClass>,
}

fn default_turn_limit() -> u32 {
    DEFAULT_TURN_LIMIT
}

#[derive(Debug, Default, Deserialize)]
pub struct JoinRequest {
    pub password: Option<String>,
    pub class: Option<CharacterClass>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub character_id: CharacterId,
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionsRequest {
    pub character_id: CharacterId,
    #[serde(default)]
    pub event_ids: Vec<EventId>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AvailableMatchesResponse {
    status: &'static str,
    available_matches: Vec<MatchSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedResponse {
    status: &'static str,
    message: String,
    match_id: MatchId,
}

#[derive(Serialize)]
struct MatchResponse {
    status: &'static str,
    #[serde(rename = "match")]
    view: MatchView,
}

#[derive(Serialize)]
struct MessageResponse {
    status: &'static str,
    message: String,
}

#[derive(Serialize)]
struct BoardResponse {
    status: &'static str,
    #[serde(flatten)]
    snapshot: BoardSnapshot,
}

#[derive(Serialize)]
struct EventEntry {
    id: EventId,
    name: String,
}

#[derive(Serialize)]
struct EventsResponse {
    status: &'static str,
    events: Vec<EventEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveResponse {
    status: &'static str,
    message: String,
    character: Character,
    events: Vec<EventEntry>,
    turn_complete: bool,
    match_finished: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionsResponse {
    status: &'static str,
    messages: Vec<String>,
    combat: Vec<CombatTicket>,
    match_finished: bool,
}

fn message(text: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        status: OK,
        message: text.into(),
    })
}

async fn session(data: &AppState, match_id: MatchId) -> Result<Addr<MatchSession>, ApiError> {
    Ok(data.registry.send(GetMatch { match_id }).await??)
}

/// GET /matches/available
pub async fn available_matches(
    _identity: Identity,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let available_matches = data.registry.send(ListJoinable).await?;
    Ok(HttpResponse::Ok().json(AvailableMatchesResponse {
        status: OK,
        available_matches,
    }))
}

/// POST /matches
pub async fn create_match(
    identity: Identity,
    data: web::Data<AppState>,
    body: web::Json<CreateMatchRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    let match_id = data
        .registry
        .send(CreateMatch {
            owner: identity.0,
            turn_limit: req.turn_limit,
            is_public: req.is_public,
            password: req.password,
            class: req.class,
            blueprint: None,
        })
        .await??;
    Ok(HttpResponse::Created().json(CreatedResponse {
        status: OK,
        message: "Match created.".to_string(),
        match_id,
    }))
}

/// GET /matches/{match_id}
pub async fn get_match(
    _identity: Identity,
    data: web::Data<AppState>,
    path: web::Path<MatchId>,
) -> Result<HttpResponse, ApiError> {
    let addr = session(&data, path.into_inner()).await?;
    let view = addr.send(GetView).await?;
    Ok(HttpResponse::Ok().json(MatchResponse { status: OK, view }))
}

/// POST /matches/{match_id}/join
pub async fn join_match(
    identity: Identity,
    data: web::Data<AppState>,
    path: web::Path<MatchId>,
    body: Option<web::Json<JoinRequest>>,
) -> Result<HttpResponse, ApiError> {
    let req = body.map(web::Json::into_inner).unwrap_or_default();
    let addr = session(&data, path.into_inner()).await?;
    let outcome = addr
        .send(Join {
            user_id: identity.0,
            password: req.password,
            class: req.class,
        })
        .await??;
    if outcome.started {
        Ok(message("Joined the match. The match has started."))
    } else {
        Ok(message("Joined the match."))
    }
}

/// POST /matches/{match_id}/leave
pub async fn leave_match(
    identity: Identity,
    data: web::Data<AppState>,
    path: web::Path<MatchId>,
) -> Result<HttpResponse, ApiError> {
    let addr = session(&data, path.into_inner()).await?;
    addr.send(Leave { user_id: identity.0 }).await??;
    Ok(message("Left the match."))
}

/// POST /matches/{match_id}/start
pub async fn start_match(
    identity: Identity,
    data: web::Data<AppState>,
    path: web::Path<MatchId>,
) -> Result<HttpResponse, ApiError> {
    let addr = session(&data, path.into_inner()).await?;
    addr.send(Start { user_id: identity.0 }).await??;
    Ok(message("Match started."))
}

/// POST /matches/{match_id}/end
pub async fn end_match(
    identity: Identity,
    data: web::Data<AppState>,
    path: web::Path<MatchId>,
) -> Result<HttpResponse, ApiError> {
    let addr = session(&data, path.into_inner()).await?;
    addr.send(End { user_id: identity.0 }).await??;
    Ok(message("Match ended."))
}

/// GET /matches/{match_id}/board
pub async fn board(
    _identity: Identity,
    data: web::Data<AppState>,
    path: web::Path<MatchId>,
) -> Result<HttpResponse, ApiError> {
    let addr = session(&data, path.into_inner()).await?;
    let snapshot = addr.send(GetBoard).await?;
    Ok(HttpResponse::Ok().json(BoardResponse { status: OK, snapshot }))
}

/// GET /matches/{match_id}/cells/{cell_id}/events
pub async fn cell_events(
    _identity: Identity,
    data: web::Data<AppState>,
    path: web::Path<(MatchId, CellId)>,
) -> Result<HttpResponse, ApiError> {
    let (match_id, cell_id) = path.into_inner();
    let addr = session(&data, match_id).await?;
    let events = addr.send(GetCellEvents { cell_id }).await??;
    Ok(HttpResponse::Ok().json(EventsResponse {
        status: OK,
        events: events
            .into_iter()
            .map(|event| EventEntry {
                id: event.id,
                name: event.name,
            })
            .collect(),
    }))
}

/// POST /matches/{match_id}/move
pub async fn move_character(
    identity: Identity,
    data: web::Data<AppState>,
    path: web::Path<MatchId>,
    body: web::Json<MoveRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    let addr = session(&data, path.into_inner()).await?;
    let report = addr
        .send(Move {
            user_id: identity.0,
            character_id: req.character_id,
            x: req.x,
            y: req.y,
        })
        .await??;
    Ok(HttpResponse::Ok().json(MoveResponse {
        status: OK,
        message: report.message,
        character: report.character,
        events: report
            .events
            .into_iter()
            .map(|event| EventEntry {
                id: event.id,
                name: event.name,
            })
            .collect(),
        turn_complete: report.advance.is_some(),
        match_finished: report.advance == Some(TurnAdvance::Finished),
    }))
}

/// POST /matches/{match_id}/actions
pub async fn execute_actions(
    identity: Identity,
    data: web::Data<AppState>,
    path: web::Path<MatchId>,
    body: web::Json<ActionsRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    let addr = session(&data, path.into_inner()).await?;
    let report = addr
        .send(ExecuteActions {
            user_id: identity.0,
            character_id: req.character_id,
            event_ids: req.event_ids,
        })
        .await??;
    Ok(HttpResponse::Ok().json(ActionsResponse {
        status: OK,
        messages: report.messages,
        combat: report.combats,
        match_finished: report.advance == TurnAdvance::Finished,
    }))
}
