//! Green bound invariant: remaining green stays within 0..=15.

use super::Invariant;
use crate::{GameSession, GREEN_TOTAL};

/// Invariant: the count of green cells still to find never exceeds the total.
pub struct GreenBoundInvariant;

impl Invariant<GameSession> for GreenBoundInvariant {
    fn holds(session: &GameSession) -> bool {
        session.board().remaining_green() <= GREEN_TOTAL
    }

    fn description() -> &'static str {
        "Remaining green is between 0 and 15"
    }
}
