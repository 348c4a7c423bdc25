use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::MatchingError;

/// Gender identity a member reports about themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum GenderIdentity {
    Male,
    Female,
    NonBinary,
}

impl GenderIdentity {
    pub const ALL: [GenderIdentity; 3] = [Self::Male, Self::Female, Self::NonBinary];
}

impl fmt::Display for GenderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::NonBinary => "NonBinary",
        };
        f.write_str(label)
    }
}

impl FromStr for GenderIdentity {
    type Err = MatchingError;

    /// Accepts the enumerator names plus the spellings used by questionnaire exports
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "male" | "m" | "man" => Ok(Self::Male),
            "female" | "f" | "woman" => Ok(Self::Female),
            "nonbinary" | "nb" => Ok(Self::NonBinary),
            _ => Err(MatchingError::InvalidEnumValue {
                field: "gender identity",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for GenderIdentity {
    type Error = MatchingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which gender identities a member is open to being paired with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Orientation {
    PrefersMen,
    PrefersWomen,
    Bisexual,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [Self::PrefersMen, Self::PrefersWomen, Self::Bisexual];
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PrefersMen => "PrefersMen",
            Self::PrefersWomen => "PrefersWomen",
            Self::Bisexual => "Bisexual",
        };
        f.write_str(label)
    }
}

impl FromStr for Orientation {
    type Err = MatchingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "prefersmen" | "men" => Ok(Self::PrefersMen),
            "preferswomen" | "women" => Ok(Self::PrefersWomen),
            "bisexual" | "bi" => Ok(Self::Bisexual),
            _ => Err(MatchingError::InvalidEnumValue {
                field: "orientation",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Orientation {
    type Error = MatchingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A participant in a pairing round
///
/// `id` is the member's row/column index in the score matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: usize,
    #[serde(rename = "genderIdentity")]
    pub gender_identity: GenderIdentity,
    pub orientation: Orientation,
}

impl Member {
    pub fn new(id: usize, gender_identity: GenderIdentity, orientation: Orientation) -> Self {
        Self {
            id,
            gender_identity,
            orientation,
        }
    }
}

/// Which half of the population a member proposes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Proposer,
    Receiver,
}

/// A single monogamous pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchPair {
    pub proposer: usize,
    pub receiver: usize,
}

/// Final result of a pairing round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matching {
    pub pairs: BTreeSet<MatchPair>,
    pub unmatched: BTreeSet<usize>,
}

impl Matching {
    /// Every member unmatched, no pairs
    pub fn empty(member_count: usize) -> Self {
        Self {
            pairs: BTreeSet::new(),
            unmatched: (0..member_count).collect(),
        }
    }

    /// Partner of `id`, if it was paired
    pub fn partner_of(&self, id: usize) -> Option<usize> {
        self.pairs.iter().find_map(|pair| {
            if pair.proposer == id {
                Some(pair.receiver)
            } else if pair.receiver == id {
                Some(pair.proposer)
            } else {
                None
            }
        })
    }

    pub fn contains(&self, proposer: usize, receiver: usize) -> bool {
        self.pairs.contains(&MatchPair { proposer, receiver })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Counters collected while the deferred-acceptance loop runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub proposals: usize,
    pub acceptances: usize,
    pub displacements: usize,
    pub rejections: usize,
    pub exhausted: usize,
}

/// Weights of the questionnaire scoring terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub agreement: f64,
    pub rarity: f64,
    pub cohort: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            agreement: 1.0,
            rarity: 0.0,
            cohort: 0.5,
        }
    }
}
