//! Turn invariant: a turn exists exactly when a valid guess has been applied.

use super::Invariant;
use crate::GameSession;

/// Invariant: `turn` is `None` until the first structurally valid guess and
/// `Some` afterwards.
pub struct TurnAfterGuessInvariant;

impl Invariant<GameSession> for TurnAfterGuessInvariant {
    fn holds(session: &GameSession) -> bool {
        let any_valid_guess = session.events().iter().any(|e| e.guess_target().is_some());
        session.turn().is_some() == any_valid_guess
    }

    fn description() -> &'static str {
        "Turn is set exactly when a valid guess has been applied"
    }
}
