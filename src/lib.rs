//! # mlst-solver
//!
//! A library for assigning multi-locus sequence types (MLST) to bacterial
//! isolates from allele alignment hits.
//!
//! Each sample's assembly is aligned (tabular BLAST, `-outfmt 6`) against the
//! allele database of a typing scheme. `mlst-solver` then calls one allele per
//! locus, assembles the sample's genotype profile, and matches it against the
//! scheme's table of known sequence types.
//!
//! ## Features
//!
//! - **Threshold-gated allele calls**: identity, coverage and e-value cut-offs, inclusive
//! - **Deterministic ranking**: bit score, then e-value, then identity
//! - **Partial matching**: STs assigned with as few as `min_genes_required` resolved loci,
//!   with the missing alleles predicted from the reference record
//! - **Failure capture**: every sample/scheme pair gets a result or a reason
//! - **Parallel batches**: samples typed concurrently on a rayon pool
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use mlst_solver::{BatchRunner, TypingConfig};
//! use mlst_solver::pipeline::batch::discover_samples;
//!
//! let config = TypingConfig::default();
//! let samples = discover_samples(Path::new("blast_out"), &config.schemes).unwrap();
//!
//! let runner = BatchRunner::new(config, "blast_out", Path::new("db"));
//! for report in runner.run(&samples) {
//!     for result in &report.results {
//!         println!("{} {}: {:?}", report.sample_id, result.scheme_id, result.st());
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: ST reference tables and their allele index
//! - [`core`]: Core data types for hits, calls, profiles and schemes
//! - [`matching`]: Locus calling, profile assembly and ST matching
//! - [`parsing`]: Parsers for hit files and profile tables
//! - [`pipeline`]: Per-sample typing and parallel batches
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod matching;
pub mod parsing;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::store::ProfileTable;
pub use config::TypingConfig;
pub use crate::core::profile::GenotypeProfile;
pub use crate::core::scheme::Scheme;
pub use crate::core::types::*;
pub use error::TypingError;
pub use matching::caller::{LocusCaller, Thresholds};
pub use matching::engine::MatchingEngine;
pub use pipeline::batch::BatchRunner;
