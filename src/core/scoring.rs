use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::compatibility::compatible;
use crate::core::ranking::ScoreMatrix;
use crate::error::{MatchingError, MatchingResult};
use crate::models::{GenderIdentity, Member, Orientation, ScoringWeights};

/// Number of answer options per questionnaire question
pub const ANSWER_OPTIONS: usize = 6;

/// Flat cohort factor for members sharing a gender identity
const SAME_IDENTITY_COHORT: f64 = 0.3;
/// Penalty per year of graduation-year gap
const YEAR_GAP_PENALTY: f64 = 0.1;
/// Extra per-year penalty when the Male member has the earlier graduation year
const MALE_EARLIER_PENALTY: f64 = 0.2;

/// Questionnaire submission for one member
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionnaireProfile {
    #[serde(rename = "genderIdentity")]
    pub gender_identity: GenderIdentity,
    pub orientation: Orientation,
    #[serde(rename = "gradYear")]
    #[validate(range(min = 1900, max = 2200))]
    pub grad_year: i32,
    #[validate(length(min = 1))]
    pub responses: Vec<u8>,
}

impl QuestionnaireProfile {
    pub fn member(&self, id: usize) -> Member {
        Member::new(id, self.gender_identity, self.orientation)
    }
}

/// Share of the population choosing each answer, per question
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerDistribution {
    shares: Vec<[f64; ANSWER_OPTIONS]>,
}

impl AnswerDistribution {
    /// Tally every profile's answers
    ///
    /// Profiles must answer the same number of questions and every answer
    /// must be below [`ANSWER_OPTIONS`]. Shares are rounded to three decimals.
    pub fn from_profiles(profiles: &[QuestionnaireProfile]) -> MatchingResult<Self> {
        let questions = profiles.first().map_or(0, |p| p.responses.len());
        let mut counts = vec![[0usize; ANSWER_OPTIONS]; questions];

        for (id, profile) in profiles.iter().enumerate() {
            if profile.responses.len() != questions {
                return Err(MatchingError::invalid_input(format!(
                    "member {} answered {} questions, expected {}",
                    id,
                    profile.responses.len(),
                    questions
                )));
            }
            for (question, &answer) in profile.responses.iter().enumerate() {
                let slot = counts[question].get_mut(answer as usize).ok_or_else(|| {
                    MatchingError::invalid_input(format!(
                        "member {} gave answer {} to question {}, answers must be below {}",
                        id, answer, question, ANSWER_OPTIONS
                    ))
                })?;
                *slot += 1;
            }
        }

        let shares = counts
            .into_iter()
            .map(|tally| {
                let total: usize = tally.iter().sum();
                let mut shares = [0.0; ANSWER_OPTIONS];
                if total > 0 {
                    for (share, count) in shares.iter_mut().zip(tally) {
                        *share = (count as f64 / total as f64 * 1000.0).round() / 1000.0;
                    }
                }
                shares
            })
            .collect();

        Ok(Self { shares })
    }

    pub fn share(&self, question: usize, answer: u8) -> f64 {
        self.shares
            .get(question)
            .and_then(|row| row.get(answer as usize))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn question_count(&self) -> usize {
        self.shares.len()
    }
}

/// Fraction of questions both members answered identically (0-1)
pub fn agreement(a: &QuestionnaireProfile, b: &QuestionnaireProfile) -> f64 {
    let total = a.responses.len().min(b.responses.len());
    if total == 0 {
        return 0.0;
    }
    let same = a
        .responses
        .iter()
        .zip(&b.responses)
        .filter(|(x, y)| x == y)
        .count();
    same as f64 / total as f64
}

/// Mean rarity of the answers two members share
///
/// Each identical answer contributes `1 / (1 + share)`, so agreeing on an
/// uncommon answer counts more than agreeing on a popular one.
pub fn rarity_agreement(
    a: &QuestionnaireProfile,
    b: &QuestionnaireProfile,
    distribution: &AnswerDistribution,
) -> f64 {
    let (total, same) = a
        .responses
        .iter()
        .zip(&b.responses)
        .enumerate()
        .filter(|(_, (x, y))| x == y)
        .fold((0.0, 0usize), |(total, same), (question, (&answer, _))| {
            (total + 1.0 / (1.0 + distribution.share(question, answer)), same + 1)
        });

    if same == 0 {
        0.0
    } else {
        total / same as f64
    }
}

/// Graduation-year closeness term (0-1)
pub fn cohort_factor(a: &QuestionnaireProfile, b: &QuestionnaireProfile) -> f64 {
    if a.gender_identity == b.gender_identity {
        return SAME_IDENTITY_COHORT;
    }

    let gap = a.grad_year.abs_diff(b.grad_year) as f64;
    let male_earlier = (a.grad_year < b.grad_year && a.gender_identity == GenderIdentity::Male)
        || (b.grad_year < a.grad_year && b.gender_identity == GenderIdentity::Male);

    if male_earlier {
        1.0 / (1.0 + YEAR_GAP_PENALTY * gap + MALE_EARLIER_PENALTY * gap)
    } else {
        1.0 / (1.0 + YEAR_GAP_PENALTY * gap)
    }
}

/// Score between two questionnaire profiles
///
/// Incompatible pairs always score zero.
pub fn compute_score(
    a: (usize, &QuestionnaireProfile),
    b: (usize, &QuestionnaireProfile),
    distribution: &AnswerDistribution,
    weights: &ScoringWeights,
) -> f64 {
    let (a_id, a) = a;
    let (b_id, b) = b;
    if a_id == b_id || !compatible(&a.member(a_id), &b.member(b_id)) {
        return 0.0;
    }

    let score = agreement(a, b) * weights.agreement
        + rarity_agreement(a, b, distribution) * weights.rarity
        + cohort_factor(a, b) * weights.cohort;

    score.max(0.0)
}

/// Score every ordered pair of profiles
pub fn compute_score_matrix(
    profiles: &[QuestionnaireProfile],
    weights: &ScoringWeights,
) -> MatchingResult<ScoreMatrix> {
    let distribution = AnswerDistribution::from_profiles(profiles)?;
    let mut scores = ScoreMatrix::zeros(profiles.len());

    for (i, a) in profiles.iter().enumerate() {
        for (j, b) in profiles.iter().enumerate().skip(i + 1) {
            let score = compute_score((i, a), (j, b), &distribution, weights);
            scores.set(i, j, score);
            scores.set(j, i, score);
        }
    }

    tracing::debug!(
        members = profiles.len(),
        questions = distribution.question_count(),
        "Computed questionnaire score matrix"
    );

    Ok(scores)
}
