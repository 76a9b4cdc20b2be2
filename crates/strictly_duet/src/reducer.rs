//! The event reducer: the only state transition a session has.

use crate::accounting::account_guess;
use crate::{Event, EventKind, GameSession};
use tracing::{debug, instrument, warn};

#[cfg(debug_assertions)]
use crate::invariants::{InvariantSet, SessionInvariants, TokenMonotonicContract, TransitionContract};

impl GameSession {
    /// Applies one event, returning the next session.
    ///
    /// Total: an event at or below [`GameSession::last_applied`] returns the
    /// session unchanged, and a malformed guess is recorded without touching
    /// the board, turn or tokens.
    #[instrument(
        skip(self, event),
        fields(game_id = %self.id, number = event.number, kind = event.kind.tag())
    )]
    pub fn apply(self, event: &Event) -> Self {
        if event.number <= self.last_applied {
            debug!(last_applied = self.last_applied, "Skipping already-applied event");
            return self;
        }

        #[cfg(debug_assertions)]
        let before = self.clone();

        let mut next = self;
        match &event.kind {
            EventKind::JoinSide { player_id, side } => {
                debug!(player_id = %player_id, %side, "Player joined side");
                next.players.insert(player_id.clone(), *side);
            }
            EventKind::PlayerLeft { player_id, .. } => {
                debug!(player_id = %player_id, "Player left");
                next.players.remove(player_id);
            }
            EventKind::Guess { .. } => match event.guess_target() {
                Some((index, side)) => {
                    let accounting =
                        account_guess(next.turn, next.tokens_consumed, next.board.cell(index), side);
                    next.board = next.board.with_cell(accounting.cell);
                    next.turn = accounting.turn;
                    next.tokens_consumed = accounting.tokens_consumed;
                }
                None => {
                    warn!(event = %event, "Recording malformed guess without board change");
                }
            },
            EventKind::Chat { .. } => {}
            EventKind::Unrecognized { kind } => {
                warn!(kind = %kind, "Recording unrecognized event");
            }
        }

        next.events.push(event.clone());
        next.last_applied = event.number;

        #[cfg(debug_assertions)]
        report_violations(&before, &next);

        next
    }

    /// Folds events in arrival order. The reducer never reorders.
    pub fn apply_all<'a>(self, events: impl IntoIterator<Item = &'a Event>) -> Self {
        events.into_iter().fold(self, |session, event| session.apply(event))
    }
}

#[cfg(debug_assertions)]
fn report_violations(before: &GameSession, after: &GameSession) {
    let mut violations = SessionInvariants::check_all(after).err().unwrap_or_default();
    if let Err(v) = TokenMonotonicContract::post(before, after) {
        violations.push(v);
    }
    for violation in violations {
        tracing::error!(
            game_id = %after.id,
            last_applied = after.last_applied,
            description = %violation.description,
            "Session invariant violated"
        );
    }
}
