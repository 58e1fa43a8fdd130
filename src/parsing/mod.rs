//! Parsers for typing inputs.
//!
//! This module provides parsers for:
//!
//! - **BLAST tabular hits**: 12-column `-outfmt 6` records, grouped by locus and ranked
//! - **ST profile tables**: tab-separated PubMLST-style profile definitions
//!
//! ## Hit columns
//!
//! | # | Field | Required |
//! |---|-------|----------|
//! | 1 | query id | Yes |
//! | 2 | subject id (`<locus>_<allele>`) | Yes |
//! | 3 | percent identity | Yes |
//! | 4 | alignment length | Yes |
//! | 5 | query length | No (empty or 0) |
//! | 6 | subject length | No |
//! | 7-8 | query start/end | No |
//! | 9-10 | subject start/end | No |
//! | 11 | bit score | Yes |
//! | 12 | e-value | Yes |
//!
//! ## Example
//!
//! ```rust,no_run
//! use mlst_solver::parsing::blast::parse_hits_text;
//!
//! let hits = parse_hits_text("contig_1\tOxf_gltA_1\t100.0\t484\t484\t484\t1\t484\t1\t484\t894\t0.0\n");
//! assert_eq!(hits.hits("Oxf_gltA")[0].allele, "1");
//! ```

pub mod blast;
pub mod profiles;
