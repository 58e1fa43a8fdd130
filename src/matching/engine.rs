use std::collections::BTreeMap;

use crate::catalog::index::CandidateFinder;
use crate::catalog::store::ProfileTable;
use crate::core::profile::GenotypeProfile;
use crate::core::sequence_type::{compare_st_ids, StProfileRecord};
use crate::core::types::{Confidence, StMatch};
use crate::error::TypingError;

/// Agreement between a sample's resolved alleles and one reference record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordAgreement {
    /// Loci the sample resolved
    pub total_available: usize,

    /// Resolved loci where the record carries the same allele
    pub match_count: usize,
}

impl RecordAgreement {
    #[must_use]
    pub fn compute(resolved: &[(&str, &str)], record: &StProfileRecord) -> Self {
        let match_count = resolved
            .iter()
            .filter(|(locus, allele)| record.allele(locus) == Some(*allele))
            .count();
        Self {
            total_available: resolved.len(),
            match_count,
        }
    }

    /// A record qualifies only if it agrees at every resolved locus and at
    /// least `min_genes` of them. One disagreement disqualifies it.
    #[must_use]
    pub fn qualifies(&self, min_genes: usize) -> bool {
        self.match_count >= min_genes && self.match_count == self.total_available
    }
}

/// Matches genotype profiles against one scheme's ST table
pub struct MatchingEngine<'a> {
    table: &'a ProfileTable,
    min_genes: usize,
}

impl<'a> MatchingEngine<'a> {
    #[must_use]
    pub fn new(table: &'a ProfileTable, min_genes: usize) -> Self {
        Self { table, min_genes }
    }

    /// Find the sequence type for `profile`.
    ///
    /// Qualifying records are ranked by match count, then by ST id under
    /// [`compare_st_ids`]; the first wins and any others sharing its match
    /// count are reported in `tied_sts`. For a partial match, alleles for the
    /// loci the sample did not resolve are copied from the winning record.
    ///
    /// # Errors
    ///
    /// Returns `TypingError::NoQualifyingType` when no record qualifies.
    pub fn find_match(&self, profile: &GenotypeProfile) -> Result<StMatch, TypingError> {
        let resolved: Vec<(&str, &str)> = profile.resolved_alleles().collect();
        let mut qualifying = self.qualifying_records(&resolved);

        qualifying.sort_by(|(a, a_agree), (b, b_agree)| {
            b_agree
                .match_count
                .cmp(&a_agree.match_count)
                .then_with(|| compare_st_ids(&a.st, &b.st))
        });

        let Some(&(best, agreement)) = qualifying.first() else {
            return Err(TypingError::NoQualifyingType {
                scheme: self.table.scheme.id.clone(),
                resolved: resolved.len(),
                min_genes: self.min_genes,
            });
        };

        let tied_sts = qualifying[1..]
            .iter()
            .take_while(|(_, a)| a.match_count == agreement.match_count)
            .map(|(r, _)| r.st.clone())
            .collect();

        let confidence =
            Confidence::from_counts(agreement.match_count, self.table.scheme.locus_count());

        let predicted_alleles = if confidence == Confidence::Partial {
            self.predict_missing(profile, best)
        } else {
            BTreeMap::new()
        };

        Ok(StMatch {
            st: best.st.clone(),
            clonal_complex: best.clonal_complex.clone(),
            species: best.species.clone(),
            confidence,
            matched_loci: agreement.match_count,
            predicted_alleles,
            tied_sts,
        })
    }

    /// Qualifying records in table order. Only records agreeing at every
    /// resolved locus can qualify, so the allele index narrows the scan.
    fn qualifying_records(&self, resolved: &[(&str, &str)]) -> Vec<(&'a StProfileRecord, RecordAgreement)> {
        let table: &'a ProfileTable = self.table;
        CandidateFinder::new(table)
            .find_agreeing(resolved.iter().copied())
            .into_iter()
            .map(|idx| {
                let record = &table.records[idx];
                (record, RecordAgreement::compute(resolved, record))
            })
            .filter(|(_, agreement)| agreement.qualifies(self.min_genes))
            .collect()
    }

    fn predict_missing(
        &self,
        profile: &GenotypeProfile,
        record: &StProfileRecord,
    ) -> BTreeMap<String, String> {
        self.table
            .scheme
            .loci
            .iter()
            .filter(|locus| profile.allele(locus).is_none())
            .filter_map(|locus| {
                record
                    .allele(locus)
                    .map(|allele| (locus.clone(), allele.to_string()))
            })
            .collect()
    }

    /// Qualifying records found by comparing against every record
    #[cfg(test)]
    fn qualifying_by_scan(&self, resolved: &[(&str, &str)]) -> Vec<&'a StProfileRecord> {
        let table: &'a ProfileTable = self.table;
        table
            .records
            .iter()
            .filter(|r| RecordAgreement::compute(resolved, r).qualifies(self.min_genes))
            .collect()
    }
}
