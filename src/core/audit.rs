use serde::Serialize;

use crate::core::ranking::RankingBuilder;
use crate::models::Matching;

/// A proposer and receiver that would both rather be with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockingPair {
    pub proposer: usize,
    pub receiver: usize,
}

/// Find every blocking pair of `matching` among compatible, positively scored pairs
///
/// A proposer prefers a receiver when it is unmatched or the receiver sits
/// earlier in its preference list than its partner. A receiver prefers a
/// proposer when it is unmatched or values that proposer strictly more than
/// its partner. Incompatible pairs never appear in a preference list and are
/// not checked: the pairing is only stable with respect to compatible pairs.
pub fn find_blocking_pairs(
    rankings: &RankingBuilder<'_>,
    matching: &Matching,
) -> Vec<BlockingPair> {
    let partners = partner_index(rankings.sides().member_count(), matching);
    let partner_of = |id: usize| partners.get(id).copied().flatten();
    let mut blocking = Vec::new();

    for &proposer in rankings.sides().proposers() {
        let preferences = rankings.build(proposer);
        let partner = partner_of(proposer);

        let acceptable_len = match partner {
            Some(partner) => preferences
                .iter()
                .position(|&r| r == partner)
                .unwrap_or(preferences.len()),
            None => preferences.len(),
        };

        for &receiver in &preferences[..acceptable_len] {
            let receiver_prefers = match partner_of(receiver) {
                None => true,
                Some(current) => {
                    rankings.receiver_value(receiver, proposer)
                        > rankings.receiver_value(receiver, current)
                }
            };

            if receiver_prefers {
                blocking.push(BlockingPair { proposer, receiver });
            }
        }
    }

    blocking
}

/// Partner of every member, indexed by id
fn partner_index(member_count: usize, matching: &Matching) -> Vec<Option<usize>> {
    let mut partners = vec![None; member_count];
    for pair in &matching.pairs {
        if let Some(slot) = partners.get_mut(pair.proposer) {
            *slot = Some(pair.receiver);
        }
        if let Some(slot) = partners.get_mut(pair.receiver) {
            *slot = Some(pair.proposer);
        }
    }
    partners
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::partition::SideAssignment;
    use crate::core::ranking::ScoreMatrix;
    use crate::models::{GenderIdentity, MatchPair, Member, Orientation};

    fn bisexual_population(n: usize) -> Vec<Member> {
        (0..n)
            .map(|id| Member::new(id, GenderIdentity::NonBinary, Orientation::Bisexual))
            .collect()
    }

    fn scores() -> ScoreMatrix {
        ScoreMatrix::new(vec![
            vec![0.0, 0.0, 0.9, 0.1],
            vec![0.0, 0.0, 0.1, 0.9],
            vec![0.9, 0.1, 0.0, 0.0],
            vec![0.1, 0.9, 0.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_swapped_pairing_is_blocked() {
        let members = bisexual_population(4);
        let sides = SideAssignment::with_proposers(4, &[0, 1]).unwrap();
        let scores = scores();
        let rankings = RankingBuilder::new(&members, &sides, &scores);

        let mut matching = Matching::empty(0);
        matching.pairs.insert(MatchPair { proposer: 0, receiver: 3 });
        matching.pairs.insert(MatchPair { proposer: 1, receiver: 2 });

        let blocking = find_blocking_pairs(&rankings, &matching);
        assert!(blocking.contains(&BlockingPair { proposer: 0, receiver: 2 }));
        assert!(blocking.contains(&BlockingPair { proposer: 1, receiver: 3 }));
    }

    #[test]
    fn test_best_pairing_has_no_blocking_pairs() {
        let members = bisexual_population(4);
        let sides = SideAssignment::with_proposers(4, &[0, 1]).unwrap();
        let scores = scores();
        let rankings = RankingBuilder::new(&members, &sides, &scores);

        let mut matching = Matching::empty(0);
        matching.pairs.insert(MatchPair { proposer: 0, receiver: 2 });
        matching.pairs.insert(MatchPair { proposer: 1, receiver: 3 });

        assert!(find_blocking_pairs(&rankings, &matching).is_empty());
    }

    #[test]
    fn test_unmatched_pair_left_apart_is_blocking() {
        let members = bisexual_population(2);
        let sides = SideAssignment::with_proposers(2, &[0]).unwrap();
        let scores = ScoreMatrix::new(vec![vec![0.0, 0.5], vec![0.5, 0.0]]).unwrap();
        let rankings = RankingBuilder::new(&members, &sides, &scores);

        let blocking = find_blocking_pairs(&rankings, &Matching::empty(2));
        assert_eq!(blocking, vec![BlockingPair { proposer: 0, receiver: 1 }]);
    }

    #[test]
    fn test_partner_index_covers_both_sides() {
        let mut matching = Matching::empty(0);
        matching.pairs.insert(MatchPair { proposer: 0, receiver: 3 });
        matching.pairs.insert(MatchPair { proposer: 1, receiver: 2 });

        assert_eq!(partner_index(5, &matching), vec![Some(3), Some(2), Some(1), Some(0), None]);
    }

    #[test]
    fn test_large_uniform_population_is_stable() {
        let n = 400;
        let members = bisexual_population(n);
        let proposers: Vec<usize> = (0..n / 2).collect();
        let sides = SideAssignment::with_proposers(n, &proposers).unwrap();
        let scores = ScoreMatrix::new(
            (0..n)
                .map(|i| (0..n).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
                .collect(),
        )
        .unwrap();
        let rankings = RankingBuilder::new(&members, &sides, &scores);

        // Everyone ties, so each proposer takes its lowest-id receiver
        let mut matching = Matching::empty(0);
        for (offset, &proposer) in proposers.iter().enumerate() {
            matching.pairs.insert(MatchPair { proposer, receiver: n / 2 + offset });
        }

        assert!(find_blocking_pairs(&rankings, &matching).is_empty());
    }

    #[test]
    fn test_incompatible_pairs_are_out_of_scope() {
        let members = vec![
            Member::new(0, GenderIdentity::Male, Orientation::PrefersWomen),
            Member::new(1, GenderIdentity::Male, Orientation::PrefersWomen),
        ];
        let sides = SideAssignment::with_proposers(2, &[0]).unwrap();
        let scores = ScoreMatrix::new(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let rankings = RankingBuilder::new(&members, &sides, &scores);

        // Both unmatched and both score each other highly, yet nothing blocks
        assert!(find_blocking_pairs(&rankings, &Matching::empty(2)).is_empty());
    }
}
