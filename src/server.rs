//! HTTP surface of the authority.
//!
//! Every route is a JSON POST. Refusals map to `{"error": message}` with a
//! 400 or 404 status.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::routing::post;
use axum::{Json, Router};
use strictly_duet::Snapshot;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::{debug, info, instrument};

use crate::authority::MemoryLog;
use crate::error::AuthorityError;
use crate::protocol::{
    ChatRequest, GuessRequest, JoinRequest, LeaveRequest, NewGameRequest, PollRequest,
    SnapshotRequest, Update,
};

/// Builds the router over a shared memory log.
#[instrument(skip(log))]
pub fn router(log: MemoryLog) -> Router {
    Router::new()
        .route("/game-state", post(game_state))
        .route("/events", post(events))
        .route("/guess", post(guess))
        .route("/join", post(join))
        .route("/leave", post(leave))
        .route("/chat", post(chat))
        .route("/new-game", post(new_game))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(log)
}

/// Serves the authority on an already-bound listener until the task is dropped.
#[instrument(skip(listener, log))]
pub async fn serve(listener: TcpListener, log: MemoryLog) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "Authority server ready");
    axum::serve(listener, router(log)).await
}

async fn game_state(
    State(log): State<MemoryLog>,
    Json(req): Json<SnapshotRequest>,
) -> Result<Json<Snapshot>, AuthorityError> {
    log.game_state(&req.game_id).await.map(Json)
}

async fn events(
    State(log): State<MemoryLog>,
    Json(req): Json<PollRequest>,
) -> Result<Json<Update>, AuthorityError> {
    log.events(&req).await.map(Json)
}

async fn guess(
    State(log): State<MemoryLog>,
    Json(req): Json<GuessRequest>,
) -> Result<Json<Update>, AuthorityError> {
    log.guess(&req).await.map(Json)
}

async fn join(
    State(log): State<MemoryLog>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<Update>, AuthorityError> {
    log.join(&req).await.map(Json)
}

async fn leave(
    State(log): State<MemoryLog>,
    Json(req): Json<LeaveRequest>,
) -> Result<Json<Update>, AuthorityError> {
    log.leave(&req).await.map(Json)
}

async fn chat(
    State(log): State<MemoryLog>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<Update>, AuthorityError> {
    log.chat(&req).await.map(Json)
}

async fn new_game(
    State(log): State<MemoryLog>,
    Json(req): Json<NewGameRequest>,
) -> Result<Json<Snapshot>, AuthorityError> {
    log.create(req).await.map(Json)
}
