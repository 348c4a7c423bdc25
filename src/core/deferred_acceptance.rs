use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::core::ranking::{PreferenceList, RankingBuilder};
use crate::models::MatchStats;

/// Order in which free proposers are taken off the work queue
///
/// Both orders terminate and produce a stable pairing; they can produce
/// different stable pairings for the same input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueDiscipline {
    /// Rejected and displaced proposers wait behind everyone already queued
    #[default]
    Fifo,
    /// Rejected and displaced proposers go again immediately
    Lifo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposerStatus {
    Free,
    Engaged,
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct ProposerState {
    pub preferences: PreferenceList,
    /// Index of the next receiver to approach; never moves backwards
    pub cursor: usize,
    pub status: ProposerStatus,
}

impl ProposerState {
    fn next_candidate(&self) -> Option<usize> {
        self.preferences.get(self.cursor).copied()
    }
}

/// Proposer currently held by a receiver, with the receiver's valuation of them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Holding {
    pub proposer: usize,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalOutcome {
    /// Receiver was unengaged and accepted
    Accepted,
    /// Receiver dropped `previous` for the proposer
    Displaced { previous: usize },
    /// Receiver kept its current holder
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Proposal {
    pub proposer: usize,
    pub receiver: usize,
    pub outcome: ProposalOutcome,
}

/// All mutable state of one pairing round
///
/// Each run builds its own instance; nothing is shared between runs.
#[derive(Debug, Clone, Default)]
pub struct MatchState {
    pub proposers: BTreeMap<usize, ProposerState>,
    /// Receiver id -> current holder. Receivers absent from the map are unengaged.
    pub holdings: BTreeMap<usize, Holding>,
    pub receivers: Vec<usize>,
    /// Every evaluated proposal, in order
    pub log: Vec<Proposal>,
}

impl MatchState {
    pub fn new(rankings: BTreeMap<usize, PreferenceList>, receivers: Vec<usize>) -> Self {
        let proposers = rankings
            .into_iter()
            .map(|(id, preferences)| {
                (
                    id,
                    ProposerState {
                        preferences,
                        cursor: 0,
                        status: ProposerStatus::Free,
                    },
                )
            })
            .collect();

        Self {
            proposers,
            holdings: BTreeMap::new(),
            receivers,
            log: Vec::new(),
        }
    }

    pub fn status_of(&self, proposer: usize) -> Option<ProposerStatus> {
        self.proposers.get(&proposer).map(|p| p.status)
    }

    pub fn holder_of(&self, receiver: usize) -> Option<usize> {
        self.holdings.get(&receiver).map(|h| h.proposer)
    }

    pub fn stats(&self) -> MatchStats {
        let mut stats = MatchStats {
            proposals: self.log.len(),
            exhausted: self
                .proposers
                .values()
                .filter(|p| p.status == ProposerStatus::Exhausted)
                .count(),
            ..MatchStats::default()
        };

        for proposal in &self.log {
            match proposal.outcome {
                ProposalOutcome::Accepted => stats.acceptances += 1,
                ProposalOutcome::Displaced { .. } => stats.displacements += 1,
                ProposalOutcome::Rejected => stats.rejections += 1,
            }
        }

        stats
    }
}

/// Runs generalized Gale-Shapley deferred acceptance over prepared rankings
///
/// Receivers provisionally hold the best proposer seen so far and trade up
/// only for a strictly higher valuation; on a tie the incumbent stays. Every
/// proposer walks its own list at most once, so the loop evaluates at most
/// `|proposers| * |receivers|` proposals.
#[derive(Debug, Clone, Copy)]
pub struct StableMatcher<'a> {
    rankings: RankingBuilder<'a>,
    discipline: QueueDiscipline,
}

impl<'a> StableMatcher<'a> {
    pub fn new(rankings: RankingBuilder<'a>, discipline: QueueDiscipline) -> Self {
        Self {
            rankings,
            discipline,
        }
    }

    /// Run the loop to completion and hand back the final state
    pub fn run(&self) -> MatchState {
        let sides = self.rankings.sides();
        let mut state = MatchState::new(self.rankings.build_all(), sides.receivers().to_vec());

        let mut queue: VecDeque<usize> = sides.proposers().iter().copied().collect();

        while let Some(proposer) = self.pop(&mut queue) {
            for freed in self.step(&mut state, proposer) {
                queue.push_back(freed);
            }
        }

        tracing::debug!(
            proposers = state.proposers.len(),
            receivers = state.receivers.len(),
            proposals = state.log.len(),
            "Deferred acceptance finished"
        );

        state
    }

    fn pop(&self, queue: &mut VecDeque<usize>) -> Option<usize> {
        match self.discipline {
            QueueDiscipline::Fifo => queue.pop_front(),
            QueueDiscipline::Lifo => queue.pop_back(),
        }
    }

    /// Let `proposer` make its next proposal
    ///
    /// Returns the proposers that are free again afterwards and must go back
    /// on the queue.
    pub fn step(&self, state: &mut MatchState, proposer: usize) -> Vec<usize> {
        let Some(entry) = state.proposers.get_mut(&proposer) else {
            return Vec::new();
        };

        let Some(receiver) = entry.next_candidate() else {
            entry.status = ProposerStatus::Exhausted;
            tracing::trace!(proposer, "Proposer exhausted its preference list");
            return Vec::new();
        };

        // A candidate is never reconsidered once evaluated
        entry.cursor += 1;

        let offer = self.rankings.receiver_value(receiver, proposer);

        let (outcome, freed) = match state.holdings.get(&receiver).copied() {
            None => (ProposalOutcome::Accepted, None),
            Some(current) if offer > current.score => (
                ProposalOutcome::Displaced {
                    previous: current.proposer,
                },
                Some(current.proposer),
            ),
            Some(_) => (ProposalOutcome::Rejected, Some(proposer)),
        };

        if outcome != ProposalOutcome::Rejected {
            state.holdings.insert(
                receiver,
                Holding {
                    proposer,
                    score: offer,
                },
            );
            self.set_status(state, proposer, ProposerStatus::Engaged);
        }

        if let Some(freed) = freed {
            self.set_status(state, freed, ProposerStatus::Free);
        }

        tracing::trace!(proposer, receiver, offer, ?outcome, "Proposal evaluated");

        state.log.push(Proposal {
            proposer,
            receiver,
            outcome,
        });

        freed.into_iter().collect()
    }

    fn set_status(&self, state: &mut MatchState, proposer: usize, status: ProposerStatus) {
        if let Some(entry) = state.proposers.get_mut(&proposer) {
            entry.status = status;
        }
    }
}
