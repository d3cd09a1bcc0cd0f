//! First-class invariants for a round.
//!
//! Invariants are logical properties that must hold at every observation
//! point. They are checked in debug builds after each transition and can be
//! tested independently.

use crate::round::RoundState;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invariant violated: {}", description)]
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
/// Implemented for tuples of [`Invariant`]s.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn check<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn finish(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
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
        let mut violations = Vec::new();
        check::<S, I1>(state, &mut violations);
        check::<S, I2>(state, &mut violations);
        finish(violations)
    }
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check::<S, I1>(state, &mut violations);
        check::<S, I2>(state, &mut violations);
        check::<S, I3>(state, &mut violations);
        check::<S, I4>(state, &mut violations);
        finish(violations)
    }
}

/// At most two cards are face up and unmatched.
pub struct RevealedAtMostTwo;

impl Invariant<RoundState> for RevealedAtMostTwo {
    fn holds(round: &RoundState) -> bool {
        round.revealed().len() <= 2
    }

    fn description() -> &'static str {
        "At most two cards are revealed"
    }
}

/// Matched cards come in pairs of equal symbols.
pub struct MatchedIsEven;

impl Invariant<RoundState> for MatchedIsEven {
    fn holds(round: &RoundState) -> bool {
        let matched = round.matched();
        matched.len() % 2 == 0
            && matched.iter().all(|&index| {
                round
                    .deck()
                    .symbol_at(index)
                    .map(|symbol| {
                        round
                            .deck()
                            .positions_of(symbol)
                            .iter()
                            .all(|p| matched.contains(p))
                    })
                    .unwrap_or(false)
            })
    }

    fn description() -> &'static str {
        "Matched cards form complete pairs"
    }
}

/// No card is both revealed and matched.
pub struct RevealedDisjointFromMatched;

impl Invariant<RoundState> for RevealedDisjointFromMatched {
    fn holds(round: &RoundState) -> bool {
        round
            .revealed()
            .iter()
            .all(|index| !round.matched().contains(index))
    }

    fn description() -> &'static str {
        "Revealed and matched cards are disjoint"
    }
}

/// The match counter agrees with the matched set.
pub struct MatchCountConsistent;

impl Invariant<RoundState> for MatchCountConsistent {
    fn holds(round: &RoundState) -> bool {
        round.matched().len() == round.matched_count() * 2
            && round.matched_count() <= round.move_count()
    }

    fn description() -> &'static str {
        "Match count equals half the matched cards and never exceeds moves"
    }
}

/// All round invariants as a composable set.
pub type RoundInvariants = (
    RevealedAtMostTwo,
    MatchedIsEven,
    RevealedDisjointFromMatched,
    MatchCountConsistent,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::symbol::Symbol;
    use std::time::Instant;

    fn round() -> RoundState {
        let a = Symbol::from_slot(0).unwrap();
        let b = Symbol::from_slot(1).unwrap();
        RoundState::new(Deck::from_cards(vec![a, b, a, b]).unwrap())
    }

    #[test]
    fn test_invariants_hold_for_fresh_round() {
        assert!(RoundInvariants::check_all(&round()).is_ok());
    }

    #[test]
    fn test_invariants_hold_after_play() {
        let mut round = round();
        let now = Instant::now();
        round.select(0, now);
        round.select(1, now);
        assert!(RoundInvariants::check_all(&round).is_ok());
        round.hide_mismatch();
        round.select(0, now);
        round.select(2, now);
        assert!(RoundInvariants::check_all(&round).is_ok());
    }

    #[test]
    fn test_detects_half_pair() {
        let mut round = round();
        round.matched.insert(0);
        round.matched_count = 1;

        let violations = RoundInvariants::check_all(&round).unwrap_err();
        let descriptions: Vec<_> = violations.iter().map(|v| v.description.as_str()).collect();
        assert!(descriptions.contains(&MatchedIsEven::description()));
        assert!(descriptions.contains(&MatchCountConsistent::description()));
    }

    #[test]
    fn test_detects_overlap() {
        let mut round = round();
        round.matched.extend([0, 2]);
        round.matched_count = 1;
        round.move_count = 1;
        round.revealed.push(0);

        type Overlap = (RevealedDisjointFromMatched, RevealedAtMostTwo);
        let violations = Overlap::check_all(&round).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].description,
            RevealedDisjointFromMatched::description()
        );
    }
}
