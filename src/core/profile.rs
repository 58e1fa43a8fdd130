use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::call::LocusCall;
use crate::core::types::SchemeId;

/// All locus calls for one sample under one scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenotypeProfile {
    pub sample_id: String,
    pub scheme_id: SchemeId,

    /// One call per scheme locus, in scheme order
    pub calls: Vec<LocusCall>,
}

impl GenotypeProfile {
    /// Build a profile from calls in scheme order.
    ///
    /// Later calls for a locus already present are dropped, so a profile never
    /// holds more than one call per locus.
    pub fn new(
        sample_id: impl Into<String>,
        scheme_id: SchemeId,
        calls: impl IntoIterator<Item = LocusCall>,
    ) -> Self {
        let mut unique: Vec<LocusCall> = Vec::new();
        for call in calls {
            if unique.iter().all(|c| c.locus != call.locus) {
                unique.push(call);
            }
        }
        Self {
            sample_id: sample_id.into(),
            scheme_id,
            calls: unique,
        }
    }

    #[must_use]
    pub fn call(&self, locus: &str) -> Option<&LocusCall> {
        self.calls.iter().find(|c| c.locus == locus)
    }

    /// Allele called at `locus`, if resolved
    #[must_use]
    pub fn allele(&self, locus: &str) -> Option<&str> {
        self.call(locus).and_then(LocusCall::allele)
    }

    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_resolved()).count()
    }

    /// Resolved locus -> allele pairs, in scheme order
    pub fn resolved_alleles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.calls
            .iter()
            .filter_map(|c| c.allele().map(|a| (c.locus.as_str(), a)))
    }

    /// Resolved alleles keyed by locus
    #[must_use]
    pub fn allele_map(&self) -> BTreeMap<String, String> {
        self.resolved_alleles()
            .map(|(l, a)| (l.to_string(), a.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::call::{AlleleCall, UnresolvedReason};

    fn resolved(locus: &str, allele: &str) -> LocusCall {
        LocusCall::resolved(
            locus,
            AlleleCall {
                allele: allele.to_string(),
                identity: 100.0,
                coverage: 100.0,
                e_value: 0.0,
                is_perfect: true,
                alternative_count: 0,
            },
        )
    }

    #[test]
    fn test_resolved_count_and_lookup() {
        let profile = GenotypeProfile::new(
            "AB01",
            SchemeId::new("oxford"),
            vec![
                resolved("gltA", "1"),
                LocusCall::unresolved("gyrB", UnresolvedReason::NoHits),
                resolved("gdhB", "3"),
            ],
        );
        assert_eq!(profile.resolved_count(), 2);
        assert_eq!(profile.allele("gdhB"), Some("3"));
        assert_eq!(profile.allele("gyrB"), None);
        assert!(profile.call("gyrB").is_some());
        assert!(profile.call("recA").is_none());

        let pairs: Vec<_> = profile.resolved_alleles().collect();
        assert_eq!(pairs, vec![("gltA", "1"), ("gdhB", "3")]);
    }

    #[test]
    fn test_duplicate_locus_keeps_first_call() {
        let profile = GenotypeProfile::new(
            "AB01",
            SchemeId::new("oxford"),
            vec![resolved("gltA", "1"), resolved("gltA", "2")],
        );
        assert_eq!(profile.calls.len(), 1);
        assert_eq!(profile.allele("gltA"), Some("1"));
    }
}
