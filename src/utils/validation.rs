//! Centralized validation helpers.

use crate::core::scheme::Scheme;
use crate::matching::caller::Thresholds;

/// Maximum length of a sample id taken from the command line
pub const MAX_SAMPLE_ID_LENGTH: usize = 255;

/// Validation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("min_identity must be within 0-100, got {0}")]
    IdentityOutOfRange(f64),
    #[error("min_coverage must be within 0-100, got {0}")]
    CoverageOutOfRange(f64),
    #[error("max_e_value must be a non-negative number, got {0}")]
    InvalidEValue(f64),
    #[error("min_genes_required must be at least 1")]
    ZeroMinGenes,
    #[error("scheme {0} has no loci")]
    EmptyScheme(String),
    #[error("scheme {scheme} lists locus {locus} more than once")]
    DuplicateLocus { scheme: String, locus: String },
    #[error("scheme {scheme} has {loci} loci but {required} are required for a match")]
    MinGenesExceedsLoci {
        scheme: String,
        loci: usize,
        required: usize,
    },
    #[error("scheme id {0} is defined more than once")]
    DuplicateScheme(String),
    #[error("Empty sample id provided")]
    EmptySampleId,
    #[error("Sample id too long: exceeds {MAX_SAMPLE_ID_LENGTH} characters")]
    SampleIdTooLong,
    #[error("Invalid sample id '{0}': contains path separators or control characters")]
    InvalidSampleId(String),
}

/// Check that every threshold is a usable number in range.
///
/// # Examples
///
/// ```
/// use mlst_solver::matching::caller::Thresholds;
/// use mlst_solver::utils::validation::validate_thresholds;
///
/// assert!(validate_thresholds(&Thresholds::default()).is_ok());
///
/// let bad = Thresholds { min_identity: 120.0, ..Thresholds::default() };
/// assert!(validate_thresholds(&bad).is_err());
/// ```
///
/// # Errors
///
/// Returns the first `ValidationError` found.
pub fn validate_thresholds(thresholds: &Thresholds) -> Result<(), ValidationError> {
    if !(0.0..=100.0).contains(&thresholds.min_identity) {
        return Err(ValidationError::IdentityOutOfRange(thresholds.min_identity));
    }
    if !(0.0..=100.0).contains(&thresholds.min_coverage) {
        return Err(ValidationError::CoverageOutOfRange(thresholds.min_coverage));
    }
    if thresholds.max_e_value.is_nan() || thresholds.max_e_value < 0.0 {
        return Err(ValidationError::InvalidEValue(thresholds.max_e_value));
    }
    Ok(())
}

/// Check that a scheme's locus list is non-empty, unique, and large enough
/// for `min_genes_required`.
///
/// # Errors
///
/// Returns the first `ValidationError` found.
pub fn validate_scheme(scheme: &Scheme, min_genes_required: usize) -> Result<(), ValidationError> {
    if scheme.loci.is_empty() {
        return Err(ValidationError::EmptyScheme(scheme.id.to_string()));
    }
    if let Some(locus) = scheme.duplicate_loci().first() {
        return Err(ValidationError::DuplicateLocus {
            scheme: scheme.id.to_string(),
            locus: (*locus).to_string(),
        });
    }
    if min_genes_required > scheme.locus_count() {
        return Err(ValidationError::MinGenesExceedsLoci {
            scheme: scheme.id.to_string(),
            loci: scheme.locus_count(),
            required: min_genes_required,
        });
    }
    Ok(())
}

/// Validate a sample id before it is joined into a file path.
///
/// # Examples
///
/// ```
/// use mlst_solver::utils::validation::validate_sample_id;
///
/// assert!(validate_sample_id("AB_2024-01").is_ok());
/// assert!(validate_sample_id("../etc/passwd").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::EmptySampleId`, `ValidationError::SampleIdTooLong`,
/// or `ValidationError::InvalidSampleId`.
pub fn validate_sample_id(sample_id: &str) -> Result<(), ValidationError> {
    if sample_id.trim().is_empty() {
        return Err(ValidationError::EmptySampleId);
    }
    if sample_id.len() > MAX_SAMPLE_ID_LENGTH {
        return Err(ValidationError::SampleIdTooLong);
    }
    if sample_id.contains("..")
        || sample_id.contains('/')
        || sample_id.contains('\\')
        || sample_id.chars().any(char::is_control)
    {
        return Err(ValidationError::InvalidSampleId(sample_id.to_string()));
    }
    Ok(())
}
