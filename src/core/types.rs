use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::profile::GenotypeProfile;
use crate::error::TypingError;

/// Unique identifier for a typing scheme
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemeId(pub String);

impl SchemeId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SchemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Confidence of a sequence-type assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// No ST assigned
    None,
    /// Every resolved locus agrees, but some scheme loci are missing
    Partial,
    /// All scheme loci resolved and agree with the record
    Exact,
}

impl Confidence {
    /// Confidence for a match of `matched` loci in a scheme of `total` loci
    #[must_use]
    pub fn from_counts(matched: usize, total: usize) -> Self {
        if matched == 0 {
            Self::None
        } else if matched == total {
            Self::Exact
        } else {
            Self::Partial
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Partial => write!(f, "partial"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

/// A sequence type assigned from the reference table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StMatch {
    pub st: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clonal_complex: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,

    pub confidence: Confidence,

    /// Resolved loci that agree with the record (all of them, by construction)
    pub matched_loci: usize,

    /// Alleles copied from the record for loci the sample did not resolve.
    /// Empty for exact matches.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub predicted_alleles: BTreeMap<String, String>,

    /// Other STs that qualified with the same number of matched loci
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tied_sts: Vec<String>,
}

/// What happened when typing one sample against one scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TypingOutcome {
    Typed(StMatch),

    /// Enough loci were resolved but no reference record agreed with all of them
    NoMatch { reason: String },

    /// Too few loci resolved; matching was not attempted
    InsufficientLoci {
        resolved: usize,
        required: usize,
        reason: String,
    },

    /// Inputs or reference data were unusable
    Failed { reason: String },
}

impl From<TypingError> for TypingOutcome {
    fn from(err: TypingError) -> Self {
        let reason = err.to_string();
        match err {
            TypingError::InsufficientLoci {
                resolved, required, ..
            } => Self::InsufficientLoci {
                resolved,
                required,
                reason,
            },
            TypingError::NoQualifyingType { .. } => Self::NoMatch { reason },
            TypingError::MalformedRecord { .. }
            | TypingError::MissingInput { .. }
            | TypingError::Configuration { .. } => Self::Failed { reason },
        }
    }
}

/// Result record for one sample and one scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingResult {
    pub sample_id: String,
    pub scheme_id: SchemeId,
    pub total_loci: usize,

    /// Per-locus calls; absent when the hit file could not be read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<GenotypeProfile>,

    /// Hit lines dropped as malformed while parsing
    #[serde(default)]
    pub skipped_records: usize,

    #[serde(flatten)]
    pub outcome: TypingOutcome,
}

impl TypingResult {
    /// Result for a sample whose inputs never produced a profile
    pub fn failed(
        sample_id: impl Into<String>,
        scheme_id: SchemeId,
        total_loci: usize,
        err: TypingError,
    ) -> Self {
        Self {
            sample_id: sample_id.into(),
            scheme_id,
            total_loci,
            profile: None,
            skipped_records: 0,
            outcome: err.into(),
        }
    }

    #[must_use]
    pub fn st(&self) -> Option<&str> {
        self.st_match().map(|m| m.st.as_str())
    }

    #[must_use]
    pub fn st_match(&self) -> Option<&StMatch> {
        match &self.outcome {
            TypingOutcome::Typed(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn confidence(&self) -> Confidence {
        self.st_match().map_or(Confidence::None, |m| m.confidence)
    }

    #[must_use]
    pub fn matched_loci(&self) -> usize {
        self.st_match().map_or(0, |m| m.matched_loci)
    }

    #[must_use]
    pub fn is_typed(&self) -> bool {
        self.st_match().is_some()
    }

    /// Human-readable reason when no ST was assigned
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            TypingOutcome::Typed(_) => None,
            TypingOutcome::NoMatch { reason }
            | TypingOutcome::InsufficientLoci { reason, .. }
            | TypingOutcome::Failed { reason } => Some(reason),
        }
    }

    /// Allele predicted for `locus` by a partial match
    #[must_use]
    pub fn predicted_allele(&self, locus: &str) -> Option<&str> {
        self.st_match()
            .and_then(|m| m.predicted_alleles.get(locus))
            .map(String::as_str)
    }
}
