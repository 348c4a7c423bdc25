// Core algorithm exports
pub mod assembler;
pub mod audit;
pub mod compatibility;
pub mod deferred_acceptance;
pub mod matcher;
pub mod partition;
pub mod ranking;
pub mod scoring;

pub use assembler::assemble;
pub use audit::{find_blocking_pairs, BlockingPair};
pub use compatibility::{accepts, compatible};
pub use deferred_acceptance::{MatchState, ProposerStatus, QueueDiscipline, StableMatcher};
pub use matcher::{run_matching, MatchOutcome, Matcher, MatchingInput};
pub use partition::{
    partition, FixedPartition, PartitionKind, PartitionStrategy, RandomPartition, SideAssignment,
    StratifiedPartition,
};
pub use ranking::{PreferenceList, RankingBuilder, ScoreMatrix};
pub use scoring::{compute_score_matrix, AnswerDistribution, QuestionnaireProfile};
