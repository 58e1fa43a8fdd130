use serde::{Deserialize, Serialize};

use crate::core::call::{AlleleCall, LocusCall, Threshold, UnresolvedReason};
use crate::core::hit::{compare_hits, AlignmentHit};

/// Identity required for a call to count as perfect
pub const PERFECT_IDENTITY: f64 = 100.0;

/// Coverage required for a call to count as perfect
pub const PERFECT_MIN_COVERAGE: f64 = 99.0;

/// Passing hits at or above this identity count as near-tied alternatives
pub const ALTERNATIVE_MIN_IDENTITY: f64 = 99.0;

/// Default minimum percent identity
pub const DEFAULT_MIN_IDENTITY: f64 = 95.0;

/// Default minimum percent coverage
pub const DEFAULT_MIN_COVERAGE: f64 = 90.0;

/// Default maximum e-value
pub const DEFAULT_MAX_E_VALUE: f64 = 1e-10;

/// Quality thresholds a hit must meet to support a call. All are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub min_identity: f64,
    pub min_coverage: f64,
    pub max_e_value: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_identity: DEFAULT_MIN_IDENTITY,
            min_coverage: DEFAULT_MIN_COVERAGE,
            max_e_value: DEFAULT_MAX_E_VALUE,
        }
    }
}

impl Thresholds {
    #[must_use]
    pub fn passes(&self, hit: &AlignmentHit) -> bool {
        hit.identity >= self.min_identity
            && hit.coverage >= self.min_coverage
            && hit.e_value <= self.max_e_value
    }

    /// Thresholds `hit` does not meet
    #[must_use]
    pub fn failed_by(&self, hit: &AlignmentHit) -> Vec<Threshold> {
        let mut failed = Vec::new();
        if hit.identity < self.min_identity {
            failed.push(Threshold::MinIdentity(self.min_identity));
        }
        if hit.coverage < self.min_coverage {
            failed.push(Threshold::MinCoverage(self.min_coverage));
        }
        if hit.e_value > self.max_e_value {
            failed.push(Threshold::MaxEValue(self.max_e_value));
        }
        failed
    }
}

/// Calls the allele at one locus from its ranked hits
#[derive(Debug, Clone)]
pub struct LocusCaller {
    thresholds: Thresholds,
}

impl LocusCaller {
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Call `locus` from its hits.
    ///
    /// The call is the best passing hit under [`compare_hits`]; when several
    /// tie, the earliest in `hits` wins, so hits already in ranked order give
    /// the first passing hit.
    #[must_use]
    pub fn call(&self, locus: &str, hits: &[AlignmentHit]) -> LocusCall {
        let passing: Vec<(usize, &AlignmentHit)> = hits
            .iter()
            .enumerate()
            .filter(|(_, h)| self.thresholds.passes(h))
            .collect();

        let Some(&(best_idx, best)) = passing.iter().min_by(|a, b| compare_hits(a.1, b.1)) else {
            return LocusCall::unresolved(locus, self.unresolved_reason(hits));
        };

        let alternative_count = passing
            .iter()
            .filter(|(i, h)| *i != best_idx && h.identity >= ALTERNATIVE_MIN_IDENTITY)
            .count();

        #[allow(clippy::float_cmp)] // exact 100% identity is what "perfect" means
        let is_perfect = best.identity == PERFECT_IDENTITY && best.coverage >= PERFECT_MIN_COVERAGE;

        LocusCall::resolved(
            locus,
            AlleleCall {
                allele: best.allele.clone(),
                identity: best.identity,
                coverage: best.coverage,
                e_value: best.e_value,
                is_perfect,
                alternative_count,
            },
        )
    }

    fn unresolved_reason(&self, hits: &[AlignmentHit]) -> UnresolvedReason {
        if hits.is_empty() {
            return UnresolvedReason::NoHits;
        }
        let mut failed: Vec<Threshold> = Vec::new();
        for threshold in hits.iter().flat_map(|h| self.thresholds.failed_by(h)) {
            if !failed.contains(&threshold) {
                failed.push(threshold);
            }
        }
        failed.sort_by_key(Threshold::rank);
        UnresolvedReason::BelowThresholds {
            hit_count: hits.len(),
            failed,
        }
    }
}
