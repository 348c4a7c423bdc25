//! Lume Pairing - stable pairing engine for Lume matchmaking rounds
//!
//! This library pairs up a whole population at once. Members are split into
//! proposers and receivers, each proposer ranks the compatible receivers by
//! score, and a generalized Gale-Shapley deferred-acceptance loop produces a
//! monogamous matching that is stable over all compatible pairs.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use core::{run_matching, Matcher, MatchingInput, MatchOutcome, QueueDiscipline, PartitionKind};
pub use error::{MatchingError, MatchingResult};
pub use models::{
    GenderIdentity, MatchPair, MatchStats, Matching, Member, Orientation, ScoringWeights,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let matching = run_matching(Vec::new(), &[] as &[&str], &[], None).unwrap();
        assert!(matching.is_empty());
        assert!(matching.unmatched.is_empty());
    }
}
