use std::collections::HashSet;

use super::store::ProfileTable;

/// Finds reference records that could agree with a set of resolved alleles
pub struct CandidateFinder<'a> {
    table: &'a ProfileTable,
}

impl<'a> CandidateFinder<'a> {
    pub fn new(table: &'a ProfileTable) -> Self {
        Self { table }
    }

    /// Indices of records carrying every given `(locus, allele)` pair, in table order.
    ///
    /// With no pairs, every record is a candidate.
    pub fn find_agreeing<'p>(
        &self,
        alleles: impl IntoIterator<Item = (&'p str, &'p str)>,
    ) -> Vec<usize> {
        let mut candidates: Option<HashSet<usize>> = None;

        for (locus, allele) in alleles {
            let key = (locus.to_string(), allele.to_string());
            let Some(indices) = self.table.allele_to_records.get(&key) else {
                return Vec::new();
            };
            let indices: HashSet<usize> = indices.iter().copied().collect();
            candidates = Some(match candidates {
                None => indices,
                Some(current) => current.intersection(&indices).copied().collect(),
            });
            if candidates.as_ref().is_some_and(HashSet::is_empty) {
                return Vec::new();
            }
        }

        match candidates {
            None => (0..self.table.len()).collect(),
            Some(set) => {
                let mut result: Vec<usize> = set.into_iter().collect();
                result.sort_unstable();
                result
            }
        }
    }
}
