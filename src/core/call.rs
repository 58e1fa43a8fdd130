use serde::{Deserialize, Serialize};

/// Outcome of calling one locus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocusCall {
    /// Locus name from the scheme
    pub locus: String,

    /// Resolved allele or the reason no allele could be called
    pub status: CallStatus,
}

/// Whether a locus resolved to an allele
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CallStatus {
    Resolved(AlleleCall),
    Unresolved { reason: UnresolvedReason },
}

/// The allele chosen for a locus along with the quality of its supporting hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlleleCall {
    pub allele: String,
    pub identity: f64,
    pub coverage: f64,
    pub e_value: f64,

    /// 100% identity over at least 99% of the query
    pub is_perfect: bool,

    /// Other passing hits with identity >= 99%. An ambiguity signal only;
    /// it never changes the chosen allele.
    pub alternative_count: usize,
}

/// Why a locus has no call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No hit for this locus in the alignment results
    NoHits,

    /// Hits exist but none passed every threshold. `failed` lists every
    /// threshold missed by at least one hit, in identity, coverage, e-value order.
    BelowThresholds {
        hit_count: usize,
        failed: Vec<Threshold>,
    },
}

/// A single quality threshold with its configured limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "limit", rename_all = "snake_case")]
pub enum Threshold {
    MinIdentity(f64),
    MinCoverage(f64),
    MaxEValue(f64),
}

impl Threshold {
    /// Position in reports: identity, then coverage, then e-value
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::MinIdentity(_) => 0,
            Self::MinCoverage(_) => 1,
            Self::MaxEValue(_) => 2,
        }
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinIdentity(v) => write!(f, "identity >= {v}%"),
            Self::MinCoverage(v) => write!(f, "coverage >= {v}%"),
            Self::MaxEValue(v) => write!(f, "e-value <= {v:e}"),
        }
    }
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHits => write!(f, "no alignment hits"),
            Self::BelowThresholds { hit_count, failed } => {
                let failed: Vec<String> = failed.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "none of {hit_count} hit(s) passed quality thresholds; failed {}",
                    failed.join(", ")
                )
            }
        }
    }
}

impl LocusCall {
    #[must_use]
    pub fn resolved(locus: impl Into<String>, call: AlleleCall) -> Self {
        Self {
            locus: locus.into(),
            status: CallStatus::Resolved(call),
        }
    }

    #[must_use]
    pub fn unresolved(locus: impl Into<String>, reason: UnresolvedReason) -> Self {
        Self {
            locus: locus.into(),
            status: CallStatus::Unresolved { reason },
        }
    }

    /// The called allele, if resolved
    #[must_use]
    pub fn allele(&self) -> Option<&str> {
        self.allele_call().map(|c| c.allele.as_str())
    }

    #[must_use]
    pub fn allele_call(&self) -> Option<&AlleleCall> {
        match &self.status {
            CallStatus::Resolved(call) => Some(call),
            CallStatus::Unresolved { .. } => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.status, CallStatus::Resolved(_))
    }

    #[must_use]
    pub fn unresolved_reason(&self) -> Option<&UnresolvedReason> {
        match &self.status {
            CallStatus::Resolved(_) => None,
            CallStatus::Unresolved { reason } => Some(reason),
        }
    }
}
