use crate::core::{
    assembler::assemble,
    audit::{find_blocking_pairs, BlockingPair},
    deferred_acceptance::{MatchState, QueueDiscipline, StableMatcher},
    partition::{PartitionKind, PartitionStrategy, SideAssignment},
    ranking::{RankingBuilder, ScoreMatrix},
};
use crate::error::{MatchingError, MatchingResult};
use crate::models::{GenderIdentity, MatchStats, Matching, Member, Orientation};

/// Validated input of a pairing round
#[derive(Debug, Clone)]
pub struct MatchingInput {
    members: Vec<Member>,
    scores: ScoreMatrix,
}

impl MatchingInput {
    /// Check shapes and wrap typed inputs
    ///
    /// `scores` must be N×N with non-negative finite entries, and both the
    /// identity and orientation vectors must have length N.
    pub fn new(
        scores: Vec<Vec<f64>>,
        gender_identities: Vec<GenderIdentity>,
        orientations: Vec<Orientation>,
    ) -> MatchingResult<Self> {
        let scores = ScoreMatrix::new(scores)?;
        let size = scores.size();

        if gender_identities.len() != size {
            return Err(MatchingError::invalid_input(format!(
                "expected {} gender identities, got {}",
                size,
                gender_identities.len()
            )));
        }
        if orientations.len() != size {
            return Err(MatchingError::invalid_input(format!(
                "expected {} orientations, got {}",
                size,
                orientations.len()
            )));
        }

        let members = gender_identities
            .into_iter()
            .zip(orientations)
            .enumerate()
            .map(|(id, (identity, orientation))| Member::new(id, identity, orientation))
            .collect();

        Ok(Self { members, scores })
    }

    /// Like [`MatchingInput::new`], parsing identity and orientation labels first
    pub fn parse<S: AsRef<str>>(
        scores: Vec<Vec<f64>>,
        gender_identities: &[S],
        orientations: &[S],
    ) -> MatchingResult<Self> {
        let gender_identities = gender_identities
            .iter()
            .map(|s| s.as_ref().parse())
            .collect::<MatchingResult<Vec<GenderIdentity>>>()?;
        let orientations = orientations
            .iter()
            .map(|s| s.as_ref().parse())
            .collect::<MatchingResult<Vec<Orientation>>>()?;

        Self::new(scores, gender_identities, orientations)
    }

    /// Build from already constructed members
    ///
    /// Member ids must be exactly `0..N` in order, matching the matrix rows.
    pub fn from_members(members: Vec<Member>, scores: ScoreMatrix) -> MatchingResult<Self> {
        if members.len() != scores.size() {
            return Err(MatchingError::invalid_input(format!(
                "score matrix covers {} members but {} were given",
                scores.size(),
                members.len()
            )));
        }
        if let Some((position, member)) = members.iter().enumerate().find(|(i, m)| m.id != *i) {
            return Err(MatchingError::invalid_input(format!(
                "member at position {} has id {}, ids must be 0..{}",
                position,
                member.id,
                members.len()
            )));
        }
        Ok(Self { members, scores })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn scores(&self) -> &ScoreMatrix {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Everything a pairing round produced
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub matching: Matching,
    pub sides: SideAssignment,
    pub stats: MatchStats,
    pub blocking_pairs: Vec<BlockingPair>,
    pub state: MatchState,
}

impl MatchOutcome {
    /// No blocking pair exists among compatible pairs
    pub fn is_stable(&self) -> bool {
        self.blocking_pairs.is_empty()
    }
}

/// Main pairing orchestrator
///
/// # Pipeline Stages
/// 1. Split the population into proposers and receivers
/// 2. Rank compatible receivers for every proposer
/// 3. Run deferred acceptance
/// 4. Assemble and audit the matching
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    discipline: QueueDiscipline,
    partition: PartitionKind,
}

impl Matcher {
    pub fn new(discipline: QueueDiscipline, partition: PartitionKind) -> Self {
        Self {
            discipline,
            partition,
        }
    }

    pub fn discipline(&self) -> QueueDiscipline {
        self.discipline
    }

    pub fn partition_kind(&self) -> PartitionKind {
        self.partition
    }

    /// Run a pairing round using the configured partition strategy
    ///
    /// The same input and seed always produce the same outcome.
    pub fn run(&self, input: &MatchingInput, seed: Option<u64>) -> MatchingResult<MatchOutcome> {
        let strategy = self.partition.strategy(seed);
        self.run_with(input, strategy.as_ref())
    }

    /// Run a pairing round with an explicit partition strategy
    pub fn run_with(
        &self,
        input: &MatchingInput,
        strategy: &dyn PartitionStrategy,
    ) -> MatchingResult<MatchOutcome> {
        let sides = strategy.partition(input.members())?;
        if sides.member_count() != input.len() {
            return Err(MatchingError::invalid_input(format!(
                "partition covers {} members but population has {}",
                sides.member_count(),
                input.len()
            )));
        }

        tracing::debug!(
            members = input.len(),
            proposers = sides.proposers().len(),
            receivers = sides.receivers().len(),
            ?strategy,
            "Population partitioned"
        );

        let rankings = RankingBuilder::new(input.members(), &sides, input.scores());
        let state = StableMatcher::new(rankings, self.discipline).run();
        let matching = assemble(input.len(), &state)?;
        let blocking_pairs = find_blocking_pairs(&rankings, &matching);
        let stats = state.stats();

        if !blocking_pairs.is_empty() {
            tracing::warn!(count = blocking_pairs.len(), "Matching has blocking pairs");
        }

        tracing::debug!(
            pairs = matching.len(),
            unmatched = matching.unmatched.len(),
            proposals = stats.proposals,
            displacements = stats.displacements,
            "Pairing round complete"
        );

        Ok(MatchOutcome {
            matching,
            sides,
            stats,
            blocking_pairs,
            state,
        })
    }
}

/// Pair up a population in one call
///
/// Identity and orientation labels are parsed first, so unknown labels fail
/// with [`MatchingError::InvalidEnumValue`] before anything else runs.
pub fn run_matching<S: AsRef<str>>(
    scores: Vec<Vec<f64>>,
    gender_identities: &[S],
    orientations: &[S],
    seed: Option<u64>,
) -> MatchingResult<Matching> {
    let input = MatchingInput::parse(scores, gender_identities, orientations)?;
    Ok(Matcher::default().run(&input, seed)?.matching)
}
