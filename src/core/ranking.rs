use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::core::compatibility::compatible;
use crate::core::partition::SideAssignment;
use crate::error::{MatchingError, MatchingResult};
use crate::models::Member;

/// Square matrix of pairwise valuations
///
/// `get(i, j)` is member `i`'s valuation of member `j`. The matrix is not
/// assumed to be symmetric. A zero entry means `i` never proposes to or
/// accepts `j`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreMatrix {
    rows: Vec<Vec<f64>>,
}

impl ScoreMatrix {
    /// Validate and wrap a row-major matrix
    ///
    /// Rejects non-square shapes and any negative, NaN or infinite entry.
    pub fn new(rows: Vec<Vec<f64>>) -> MatchingResult<Self> {
        let size = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(MatchingError::invalid_input(format!(
                    "score matrix must be {size}x{size}, row {i} has {} columns",
                    row.len()
                )));
            }
            if let Some((j, value)) = row
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(MatchingError::invalid_input(format!(
                    "score[{i}][{j}] = {value} is not a non-negative finite number"
                )));
            }
        }
        Ok(Self { rows })
    }

    pub fn zeros(size: usize) -> Self {
        Self {
            rows: vec![vec![0.0; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Valuation of `candidate` by `subject`
    #[inline]
    pub fn get(&self, subject: usize, candidate: usize) -> f64 {
        self.rows[subject][candidate]
    }

    pub(crate) fn set(&mut self, subject: usize, candidate: usize, value: f64) {
        self.rows[subject][candidate] = value;
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }
}

/// Receivers a proposer is willing to approach, best first
pub type PreferenceList = Vec<usize>;

/// Derives per-proposer rankings from the score matrix
///
/// Only receivers that are mutually compatible with the proposer and that the
/// proposer scores above zero are ranked.
#[derive(Debug, Clone, Copy)]
pub struct RankingBuilder<'a> {
    members: &'a [Member],
    sides: &'a SideAssignment,
    scores: &'a ScoreMatrix,
}

impl<'a> RankingBuilder<'a> {
    pub fn new(members: &'a [Member], sides: &'a SideAssignment, scores: &'a ScoreMatrix) -> Self {
        Self {
            members,
            sides,
            scores,
        }
    }

    /// Preference list of `proposer_id`, descending by score, ascending id on ties
    pub fn build(&self, proposer_id: usize) -> PreferenceList {
        let proposer = &self.members[proposer_id];

        let mut candidates: Vec<(usize, f64)> = self
            .sides
            .receivers()
            .iter()
            .map(|&receiver_id| (receiver_id, self.scores.get(proposer_id, receiver_id)))
            .filter(|&(receiver_id, score)| {
                score > 0.0 && compatible(proposer, &self.members[receiver_id])
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        candidates.into_iter().map(|(receiver_id, _)| receiver_id).collect()
    }

    /// Preference lists of every proposer
    pub fn build_all(&self) -> BTreeMap<usize, PreferenceList> {
        self.sides
            .proposers()
            .iter()
            .map(|&proposer_id| (proposer_id, self.build(proposer_id)))
            .collect()
    }

    /// How much `receiver_id` values `proposer_id`, read from the receiver's own row
    #[inline]
    pub fn receiver_value(&self, receiver_id: usize, proposer_id: usize) -> f64 {
        self.scores.get(receiver_id, proposer_id)
    }

    pub fn members(&self) -> &'a [Member] {
        self.members
    }

    pub fn sides(&self) -> &'a SideAssignment {
        self.sides
    }

    pub fn scores(&self) -> &'a ScoreMatrix {
        self.scores
    }
}
