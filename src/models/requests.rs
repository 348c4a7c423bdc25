use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::{PartitionKind, QueueDiscipline, QuestionnaireProfile};

/// Request to pair up a population from a precomputed score matrix
///
/// Identity and orientation labels are kept as strings here so that unknown
/// labels are reported by the engine rather than by JSON decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMatchingRequest {
    pub scores: Vec<Vec<f64>>,
    #[serde(alias = "gender_identities", rename = "genderIdentities")]
    pub gender_identities: Vec<String>,
    pub orientations: Vec<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub queue: Option<QueueDiscipline>,
    #[serde(default)]
    pub partition: Option<PartitionKind>,
}

impl RunMatchingRequest {
    pub fn member_count(&self) -> usize {
        self.scores
            .len()
            .max(self.gender_identities.len())
            .max(self.orientations.len())
    }
}

/// Request to compute a score matrix from questionnaire submissions
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ComputeScoresRequest {
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub members: Vec<QuestionnaireProfile>,
}

/// Request to score questionnaire submissions and pair them in one go
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionnaireMatchingRequest {
    #[validate(nested)]
    pub members: Vec<QuestionnaireProfile>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub queue: Option<QueueDiscipline>,
    #[serde(default)]
    pub partition: Option<PartitionKind>,
}
