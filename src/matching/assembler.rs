use crate::core::profile::GenotypeProfile;
use crate::core::scheme::Scheme;
use crate::error::TypingError;
use crate::matching::caller::{LocusCaller, Thresholds};
use crate::parsing::blast::ParsedHits;

/// Runs the [`LocusCaller`] over every locus of a scheme
#[derive(Debug, Clone)]
pub struct ProfileAssembler<'a> {
    scheme: &'a Scheme,
    caller: LocusCaller,
    min_genes_required: usize,
}

impl<'a> ProfileAssembler<'a> {
    #[must_use]
    pub fn new(scheme: &'a Scheme, thresholds: Thresholds, min_genes_required: usize) -> Self {
        Self {
            scheme,
            caller: LocusCaller::new(thresholds),
            min_genes_required,
        }
    }

    /// Call every scheme locus, in scheme order. Hits for loci outside the
    /// scheme are ignored.
    #[must_use]
    pub fn assemble(&self, sample_id: &str, hits: &ParsedHits) -> GenotypeProfile {
        let calls = self
            .scheme
            .loci
            .iter()
            .map(|locus| self.caller.call(locus, hits.hits(locus)));
        GenotypeProfile::new(sample_id, self.scheme.id.clone(), calls)
    }

    /// Check that `profile` resolved enough loci to attempt ST matching
    ///
    /// # Errors
    ///
    /// Returns `TypingError::InsufficientLoci` when fewer than the configured
    /// minimum loci were resolved.
    pub fn check_eligible(&self, profile: &GenotypeProfile) -> Result<(), TypingError> {
        let resolved = profile.resolved_count();
        if resolved < self.min_genes_required {
            return Err(TypingError::InsufficientLoci {
                scheme: self.scheme.id.clone(),
                resolved,
                required: self.min_genes_required,
                total: self.scheme.locus_count(),
            });
        }
        Ok(())
    }
}
