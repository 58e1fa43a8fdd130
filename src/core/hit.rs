use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A single alignment of a sample sequence against one reference allele.
///
/// Built by [`crate::parsing::blast`]; never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentHit {
    /// Sample sequence (contig) id
    pub query_id: String,

    /// Raw subject id, `<locus>_<allele>`
    pub subject_id: String,

    /// Locus parsed from the subject id
    pub locus: String,

    /// Allele parsed from the subject id (kept as text, not assumed numeric)
    pub allele: String,

    /// Percent identity, 0-100
    pub identity: f64,

    pub alignment_length: u64,

    /// Query length as reported; 0 when the tool left it empty or zero
    pub query_length: u64,

    /// Subject length as reported; 0 when missing
    pub subject_length: u64,

    pub query_start: u64,
    pub query_end: u64,
    pub subject_start: u64,
    pub subject_end: u64,

    pub bit_score: f64,
    pub e_value: f64,

    /// Derived coverage percent, see [`coverage_percent`]
    pub coverage: f64,
}

/// Helper function to convert u64 lengths to f64 with explicit precision loss allowance
#[inline]
fn length_to_f64(length: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        length as f64
    }
}

/// Compute alignment coverage as a percentage of the query length.
///
/// Alignment tools sometimes emit zero length fields, so the denominator
/// falls back in a fixed order:
///
/// 1. `query_length` when nonzero
/// 2. `|query_end - query_start| + 1` when both coordinates are nonzero
/// 3. `subject_length` when nonzero
/// 4. otherwise coverage is reported as 100%
///
/// # Examples
///
/// ```
/// use mlst_solver::core::hit::coverage_percent;
///
/// assert!((coverage_percent(450, 500, 0, 0, 0) - 90.0).abs() < f64::EPSILON);
/// // query length missing: 1..=400 spans 400 bases
/// assert!((coverage_percent(400, 0, 1, 400, 0) - 100.0).abs() < f64::EPSILON);
/// // nothing usable
/// assert!((coverage_percent(400, 0, 0, 0, 0) - 100.0).abs() < f64::EPSILON);
/// ```
#[must_use]
pub fn coverage_percent(
    alignment_length: u64,
    query_length: u64,
    query_start: u64,
    query_end: u64,
    subject_length: u64,
) -> f64 {
    let denominator = if query_length > 0 {
        query_length
    } else if query_start > 0 && query_end > 0 {
        query_end.abs_diff(query_start) + 1
    } else if subject_length > 0 {
        subject_length
    } else {
        return 100.0;
    };

    length_to_f64(alignment_length) / length_to_f64(denominator) * 100.0
}

/// Ranking order for hits at one locus: bit score descending, then e-value
/// ascending, then identity descending.
///
/// This is the only definition of "best hit". Hits that tie on all three keys
/// compare equal, so a stable sort keeps their input order.
#[must_use]
pub fn compare_hits(a: &AlignmentHit, b: &AlignmentHit) -> Ordering {
    b.bit_score
        .total_cmp(&a.bit_score)
        .then_with(|| a.e_value.total_cmp(&b.e_value))
        .then_with(|| b.identity.total_cmp(&a.identity))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::AlignmentHit;

    /// Minimal hit for tests: full-length 500bp alignment
    pub fn hit(locus: &str, allele: &str, identity: f64, bit_score: f64) -> AlignmentHit {
        AlignmentHit {
            query_id: "contig_1".to_string(),
            subject_id: format!("{locus}_{allele}"),
            locus: locus.to_string(),
            allele: allele.to_string(),
            identity,
            alignment_length: 500,
            query_length: 500,
            subject_length: 500,
            query_start: 1,
            query_end: 500,
            subject_start: 1,
            subject_end: 500,
            bit_score,
            e_value: 1e-100,
            coverage: 100.0,
        }
    }
}
