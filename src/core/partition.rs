use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MatchingError, MatchingResult};
use crate::models::{Member, Side};

/// Split of the population into proposers and receivers
///
/// Every member id appears on exactly one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideAssignment {
    sides: Vec<Side>,
    proposers: Vec<usize>,
    receivers: Vec<usize>,
}

impl SideAssignment {
    /// Build an assignment from an ordering of all member ids
    ///
    /// The first ⌈N/2⌉ ids of `order` propose, the rest receive.
    pub fn from_order(order: &[usize]) -> MatchingResult<Self> {
        let member_count = order.len();
        let proposer_count = member_count.div_ceil(2);

        let mut sides: Vec<Option<Side>> = vec![None; member_count];
        for (position, &id) in order.iter().enumerate() {
            let slot = sides.get_mut(id).ok_or_else(|| {
                MatchingError::invalid_input(format!(
                    "member id {} out of range for population of {}",
                    id, member_count
                ))
            })?;
            if slot.is_some() {
                return Err(MatchingError::invalid_input(format!(
                    "member id {} assigned to a side twice",
                    id
                )));
            }
            *slot = Some(if position < proposer_count {
                Side::Proposer
            } else {
                Side::Receiver
            });
        }

        // Length matches and no duplicates, so every slot is filled
        let sides: Vec<Side> = sides.into_iter().flatten().collect();

        let mut proposers = order[..proposer_count].to_vec();
        let mut receivers = order[proposer_count..].to_vec();
        proposers.sort_unstable();
        receivers.sort_unstable();

        Ok(Self {
            sides,
            proposers,
            receivers,
        })
    }

    /// Build an assignment where exactly `proposers` propose
    ///
    /// Useful for replaying a known split. Side sizes are not required to be
    /// balanced here.
    pub fn with_proposers(member_count: usize, proposers: &[usize]) -> MatchingResult<Self> {
        let mut sides = vec![Side::Receiver; member_count];
        for &id in proposers {
            match sides.get(id).copied() {
                Some(Side::Receiver) => sides[id] = Side::Proposer,
                Some(Side::Proposer) => {
                    return Err(MatchingError::invalid_input(format!(
                        "member id {} listed as proposer twice",
                        id
                    )))
                }
                None => {
                    return Err(MatchingError::invalid_input(format!(
                        "member id {} out of range for population of {}",
                        id, member_count
                    )))
                }
            }
        }

        let proposers = (0..member_count).filter(|&id| sides[id] == Side::Proposer).collect();
        let receivers = (0..member_count).filter(|&id| sides[id] == Side::Receiver).collect();

        Ok(Self {
            sides,
            proposers,
            receivers,
        })
    }

    pub fn side_of(&self, id: usize) -> Option<Side> {
        self.sides.get(id).copied()
    }

    pub fn is_receiver(&self, id: usize) -> bool {
        self.side_of(id) == Some(Side::Receiver)
    }

    /// Proposer ids in ascending order
    pub fn proposers(&self) -> &[usize] {
        &self.proposers
    }

    /// Receiver ids in ascending order
    pub fn receivers(&self) -> &[usize] {
        &self.receivers
    }

    pub fn member_count(&self) -> usize {
        self.sides.len()
    }
}

/// Decides which members propose and which receive
///
/// Implementations can balance the split however they like; the pairing loop
/// only sees the resulting [`SideAssignment`].
pub trait PartitionStrategy: fmt::Debug + Send + Sync {
    fn partition(&self, members: &[Member]) -> MatchingResult<SideAssignment>;
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn shuffled_ids(members: &[Member], seed: Option<u64>) -> Vec<usize> {
    let mut order: Vec<usize> = members.iter().map(|m| m.id).collect();
    order.shuffle(&mut seeded_rng(seed));
    order
}

/// Uniformly random split, oblivious to identity and orientation
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPartition {
    pub seed: Option<u64>,
}

impl RandomPartition {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }
}

impl PartitionStrategy for RandomPartition {
    fn partition(&self, members: &[Member]) -> MatchingResult<SideAssignment> {
        SideAssignment::from_order(&shuffled_ids(members, self.seed))
    }
}

/// Random split that spreads each orientation evenly across both sides
///
/// Members are shuffled, grouped by orientation (keeping the shuffled order
/// inside each group) and dealt alternately to proposer and receiver.
#[derive(Debug, Clone, Copy, Default)]
pub struct StratifiedPartition {
    pub seed: Option<u64>,
}

impl StratifiedPartition {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }
}

impl PartitionStrategy for StratifiedPartition {
    fn partition(&self, members: &[Member]) -> MatchingResult<SideAssignment> {
        let mut order = shuffled_ids(members, self.seed);
        order.sort_by_key(|&id| members.get(id).map(|m| m.orientation));

        let (proposers, receivers): (Vec<(usize, usize)>, Vec<(usize, usize)>) =
            order.into_iter().enumerate().partition(|(i, _)| i % 2 == 0);

        let dealt: Vec<usize> = proposers
            .into_iter()
            .chain(receivers)
            .map(|(_, id)| id)
            .collect();

        SideAssignment::from_order(&dealt)
    }
}

/// A split decided ahead of time by the caller
#[derive(Debug, Clone)]
pub struct FixedPartition {
    assignment: SideAssignment,
}

impl FixedPartition {
    pub fn new(assignment: SideAssignment) -> Self {
        Self { assignment }
    }
}

impl PartitionStrategy for FixedPartition {
    fn partition(&self, members: &[Member]) -> MatchingResult<SideAssignment> {
        if self.assignment.member_count() != members.len() {
            return Err(MatchingError::invalid_input(format!(
                "fixed partition covers {} members but population has {}",
                self.assignment.member_count(),
                members.len()
            )));
        }
        Ok(self.assignment.clone())
    }
}

/// Partition strategy names accepted in configuration and requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionKind {
    #[default]
    Random,
    Stratified,
}

impl PartitionKind {
    pub fn strategy(self, seed: Option<u64>) -> Box<dyn PartitionStrategy> {
        match self {
            Self::Random => Box::new(RandomPartition::new(seed)),
            Self::Stratified => Box::new(StratifiedPartition::new(seed)),
        }
    }
}

/// Randomly split `members` into proposers and receivers
pub fn partition(members: &[Member], seed: Option<u64>) -> MatchingResult<SideAssignment> {
    RandomPartition::new(seed).partition(members)
}
