use serde::{Deserialize, Serialize};
use crate::core::{BlockingPair, MatchOutcome};
use crate::models::domain::{MatchPair, MatchStats};

/// Response for the run matching endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RunMatchingResponse {
    #[serde(rename = "runId")]
    pub run_id: uuid::Uuid,
    pub pairs: Vec<MatchPair>,
    pub unmatched: Vec<usize>,
    pub stats: MatchStats,
    pub stable: bool,
    #[serde(rename = "blockingPairs")]
    pub blocking_pairs: Vec<BlockingPair>,
    #[serde(rename = "completedAt")]
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl From<MatchOutcome> for RunMatchingResponse {
    fn from(outcome: MatchOutcome) -> Self {
        let stable = outcome.is_stable();
        Self {
            run_id: uuid::Uuid::new_v4(),
            pairs: outcome.matching.pairs.into_iter().collect(),
            unmatched: outcome.matching.unmatched.into_iter().collect(),
            stats: outcome.stats,
            stable,
            blocking_pairs: outcome.blocking_pairs,
            completed_at: chrono::Utc::now(),
        }
    }
}

/// Response for the score computation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeScoresResponse {
    pub scores: Vec<Vec<f64>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
