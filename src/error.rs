//! Failure taxonomy for typing a sample against a scheme.
//!
//! Every variant ends up as data on the smallest affected unit: a skipped hit
//! line, an unresolved locus, or a [`TypingOutcome`](crate::core::types::TypingOutcome)
//! on one sample/scheme pair. None of them abort a batch.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::SchemeId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypingError {
    /// One hit line could not be parsed
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// A hit file or reference table expected for this sample/scheme is absent
    #[error("{what} not found: {}", path.display())]
    MissingInput { what: String, path: PathBuf },

    /// Too few loci resolved to attempt ST matching
    #[error(
        "insufficient loci for {scheme}: resolved {resolved}/{total}, at least {required} required"
    )]
    InsufficientLoci {
        scheme: SchemeId,
        resolved: usize,
        required: usize,
        total: usize,
    },

    /// No reference record agreed with every resolved locus
    #[error(
        "no {scheme} sequence type agrees with all {resolved} resolved loci (at least {min_genes} matching loci required)"
    )]
    NoQualifyingType {
        scheme: SchemeId,
        resolved: usize,
        min_genes: usize,
    },

    /// The scheme's reference data is unusable; fatal for the scheme only
    #[error("configuration error for {scheme}: {reason}")]
    Configuration { scheme: SchemeId, reason: String },
}
