//! History ordering invariant: event numbers strictly increase.

use super::Invariant;
use crate::GameSession;

/// Invariant: applied events are strictly increasing by number, and the
/// newest one is the session's `last_applied`.
pub struct HistoryOrderedInvariant;

impl Invariant<GameSession> for HistoryOrderedInvariant {
    fn holds(session: &GameSession) -> bool {
        let events = session.events();
        let increasing = events.windows(2).all(|w| w[0].number < w[1].number);
        let newest = events.last().map(|e| e.number).unwrap_or(0);
        increasing && newest == session.last_applied()
    }

    fn description() -> &'static str {
        "Event history is strictly increasing and ends at last_applied"
    }
}
