//! First-class invariants for game sessions.
//!
//! Invariants are logical properties that must hold after every reducer
//! transition. They are testable independently and are checked in debug
//! builds, where a violation is logged rather than raised.

mod green_bound;
mod history_ordered;
mod token_monotonic;
mod turn_after_guess;

pub use green_bound::GreenBoundInvariant;
pub use history_ordered::HistoryOrderedInvariant;
pub use token_monotonic::TokenMonotonicContract;
pub use turn_after_guess::TurnAfterGuessInvariant;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// A property relating the states before and after one transition.
pub trait TransitionContract<S> {
    /// Checks the transition from `before` to `after`.
    fn post(before: &S, after: &S) -> Result<(), InvariantViolation>;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{description}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect(checks: &[(bool, &'static str)]) -> Result<(), Vec<InvariantViolation>> {
    let violations: Vec<_> = checks
        .iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(*description))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        collect(&[
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
        ])
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        collect(&[
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
            (I3::holds(state), I3::description()),
        ])
    }
}

/// All session invariants as a composable set.
pub type SessionInvariants = (
    GreenBoundInvariant,
    HistoryOrderedInvariant,
    TurnAfterGuessInvariant,
);
