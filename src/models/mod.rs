// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    GenderIdentity, MatchPair, MatchStats, Matching, Member, Orientation, ScoringWeights, Side,
};
pub use requests::{RunMatchingRequest, ComputeScoresRequest, QuestionnaireMatchingRequest};
pub use responses::{RunMatchingResponse, ComputeScoresResponse, HealthResponse, ErrorResponse};
