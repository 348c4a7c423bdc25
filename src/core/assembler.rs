use std::collections::BTreeSet;

use crate::core::deferred_acceptance::{MatchState, ProposerStatus};
use crate::error::{MatchingError, MatchingResult};
use crate::models::{MatchPair, Matching};

/// Freeze the final loop state into a [`Matching`]
///
/// Each engaged receiver contributes one pair with its holder. Proposers that
/// ran out of candidates and receivers nobody proposed to are reported as
/// unmatched. The result is checked before it is returned: no id may appear
/// twice and every member must be either paired or unmatched.
pub fn assemble(member_count: usize, state: &MatchState) -> MatchingResult<Matching> {
    let mut matching = Matching::default();
    let mut paired: BTreeSet<usize> = BTreeSet::new();

    for (&receiver, holding) in &state.holdings {
        if state.status_of(holding.proposer) != Some(ProposerStatus::Engaged) {
            return Err(MatchingError::InvariantViolation(format!(
                "receiver {} holds proposer {} which is not engaged",
                receiver, holding.proposer
            )));
        }
        if !paired.insert(holding.proposer) || !paired.insert(receiver) {
            return Err(MatchingError::InvariantViolation(format!(
                "pair ({}, {}) reuses an already paired member",
                holding.proposer, receiver
            )));
        }
        matching.pairs.insert(MatchPair {
            proposer: holding.proposer,
            receiver,
        });
    }

    matching.unmatched = (0..member_count).filter(|id| !paired.contains(id)).collect();

    let accounted = paired.len() + matching.unmatched.len();
    if accounted != member_count || paired.iter().any(|&id| id >= member_count) {
        return Err(MatchingError::InvariantViolation(format!(
            "matching accounts for {} ids but population has {}",
            accounted, member_count
        )));
    }

    Ok(matching)
}
