//! Building outgoing submissions from the local session.
//!
//! Submissions are never applied locally. Their responses come back as
//! updates and merge through the sync client like any poll result.

use strictly_duet::{CellIndex, GameSession, Side};
use tracing::{debug, instrument};

use crate::protocol::{ChatRequest, GuessRequest, JoinRequest, LeaveRequest};

/// Builds a guess request, or `None` when the guess is redundant or impossible.
///
/// No request is built when the local player holds no side, when the index is
/// off the board, or when the local side already guessed the cell and so has
/// discovered the opposing keycard's entry for it.
#[instrument(skip(session), fields(game_id = %session.id()))]
pub fn submit_guess(session: &GameSession, index: i64) -> Option<GuessRequest> {
    let Some(side) = session.local_side() else {
        debug!("Local player has no side, not guessing");
        return None;
    };
    let Some(cell_index) = CellIndex::from_raw(index) else {
        debug!("Index off the board, not guessing");
        return None;
    };
    if session.board().cell(cell_index).exposed(side) {
        debug!(%side, "Cell already resolved for this side, not guessing");
        return None;
    }

    Some(GuessRequest {
        game_id: session.id().clone(),
        seed: session.seed().clone(),
        player_id: session.local_player().player_id().clone(),
        index,
        last_applied: session.last_applied(),
    })
}

/// Builds a request to take `side`.
#[instrument(skip(session), fields(game_id = %session.id()))]
pub fn submit_join(session: &GameSession, side: Side) -> JoinRequest {
    JoinRequest {
        game_id: session.id().clone(),
        seed: session.seed().clone(),
        player_id: session.local_player().player_id().clone(),
        side,
        last_applied: session.last_applied(),
    }
}

/// Builds a request to give up the local side, or `None` when no side is held.
#[instrument(skip(session), fields(game_id = %session.id()))]
pub fn submit_leave(session: &GameSession) -> Option<LeaveRequest> {
    if session.local_side().is_none() {
        debug!("Local player has no side, nothing to leave");
        return None;
    }
    Some(LeaveRequest {
        game_id: session.id().clone(),
        seed: session.seed().clone(),
        player_id: session.local_player().player_id().clone(),
        last_applied: session.last_applied(),
    })
}

/// Builds a chat request, or `None` for a blank message.
#[instrument(skip(session, message), fields(game_id = %session.id()))]
pub fn submit_chat(session: &GameSession, message: &str) -> Option<ChatRequest> {
    let message = message.trim();
    if message.is_empty() {
        return None;
    }
    Some(ChatRequest {
        game_id: session.id().clone(),
        seed: session.seed().clone(),
        player_id: session.local_player().player_id().clone(),
        name: session.local_player().name().clone(),
        message: message.to_string(),
        last_applied: session.last_applied(),
    })
}
