//! Token monotonicity: a transition never gives tokens back.

use super::{InvariantViolation, TransitionContract};
use crate::GameSession;

/// Contract: `tokens_consumed` after a transition is at least what it was before.
pub struct TokenMonotonicContract;

impl TransitionContract<GameSession> for TokenMonotonicContract {
    fn post(before: &GameSession, after: &GameSession) -> Result<(), InvariantViolation> {
        if after.tokens_consumed() >= before.tokens_consumed() {
            Ok(())
        } else {
            Err(InvariantViolation::new(format!(
                "Tokens decreased from {} to {}",
                before.tokens_consumed(),
                after.tokens_consumed()
            )))
        }
    }
}
