//! Read-only WebSocket feed of one match.
//!
//! A connected client receives the match view on connect and every later update
//! (state changes, resolution messages, combat hand-offs). Commands go through the
//! HTTP API; the only client frame understood here is a `Ping`.
use actix::{Actor, ActorContext, ActorFutureExt, Addr, AsyncContext, Handler, StreamHandler, WrapFuture};
use actix_web::{Error, HttpRequest, HttpResponse, web};
use actix_web_actors::ws;
use log::{debug, warn};
use uuid::Uuid;

use super::messages::{FeedClientMessage, FeedMessage, Subscribe, Unsubscribe};
use super::server::MatchSession;
use crate::game::types::{MatchId, UserId};
use crate::server::auth::resolve_token;
use crate::server::http_error::{ApiError, ws_error_message};
use crate::server::registry::messages::GetMatch;
use crate::server::state::AppState;

pub struct FeedSession {
    pub id: Uuid,
    pub match_id: MatchId,
    pub user_id: UserId,
    pub session_addr: Addr<MatchSession>,
}

impl FeedSession {
    fn send(&self, msg: &FeedMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(msg) {
            Ok(text) => ctx.text(text),
            Err(_) => ctx.text(ws_error_message("SERIALIZATION", "Failed to serialize match update.")),
        }
    }
}

impl Actor for FeedSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let subscribe = self
            .session_addr
            .send(Subscribe {
                id: self.id,
                addr: ctx.address(),
            })
            .into_actor(self);
        ctx.spawn(subscribe.map(|res, act, ctx| match res {
            Ok(view) => act.send(&FeedMessage::MatchUpdate(view), ctx),
            Err(_) => {
                // The match actor is gone.
                act.send(
                    &FeedMessage::Closed {
                        reason: "Match is no longer available.".to_string(),
                    },
                    ctx,
                );
                ctx.stop();
            }
        }));
        debug!("[Feed] user={} connected to match={}", self.user_id, self.match_id);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.session_addr.do_send(Unsubscribe { id: self.id });
        debug!("[Feed] user={} left match={}", self.user_id, self.match_id);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for FeedSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<FeedClientMessage>(&text) {
                Ok(FeedClientMessage::Ping) => self.send(&FeedMessage::Pong, ctx),
                Err(_) => ctx.text(ws_error_message(
                    "INVALID_MESSAGE",
                    "Commands are sent over HTTP; this feed only accepts Ping.",
                )),
            },
            Ok(ws::Message::Ping(bytes)) => ctx.pong(&bytes),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(err) => {
                warn!("[Feed] protocol error on match={}: {}", self.match_id, err);
                ctx.stop();
            }
            _ => (),
        }
    }
}

impl Handler<FeedMessage> for FeedSession {
    type Result = ();

    fn handle(&mut self, msg: FeedMessage, ctx: &mut Self::Context) -> Self::Result {
        let closing = matches!(msg, FeedMessage::Closed { .. });
        self.send(&msg, ctx);
        if closing {
            ctx.close(None);
            ctx.stop();
        }
    }
}

/// `GET /ws/matches/{match_id}?token=<bearer>`
///
/// Browsers cannot set headers on a WebSocket handshake, so the credential travels
/// in the query string (URL-encoded).
pub async fn ws_feed(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<MatchId>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let match_id = path.into_inner();
    let token = req
        .query_string()
        .split('&')
        .find_map(|pair| pair.strip_prefix("token="))
        .and_then(|raw| urlencoding::decode(raw).ok())
        .map(|token| token.into_owned())
        .ok_or(ApiError::Unauthenticated)?;
    let user_id = resolve_token(&req, &token).ok_or(ApiError::Unauthenticated)?;

    let session_addr = data
        .registry
        .send(GetMatch { match_id })
        .await
        .map_err(ApiError::from)?
        .map_err(ApiError::from)?;

    ws::start(
        FeedSession {
            id: Uuid::new_v4(),
            match_id,
            user_id,
            session_addr,
        },
        &req,
        stream,
    )
}
