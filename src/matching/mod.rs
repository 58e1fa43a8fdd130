//! Allele calling and sequence-type matching.
//!
//! - [`LocusCaller`](caller::LocusCaller): picks the allele at one locus from its ranked hits
//! - [`ProfileAssembler`](assembler::ProfileAssembler): calls every locus of a scheme
//! - [`MatchingEngine`](engine::MatchingEngine): assigns a sequence type from the reference table
//!
//! ## Matching Algorithm
//!
//! For each reference record the engine counts the sample's resolved loci
//! (`total_available`) and how many of them carry the record's allele
//! (`match_count`). A record qualifies only when
//! `match_count >= min_genes && match_count == total_available`: a single
//! disagreeing locus rules a record out no matter how many others agree.
//!
//! Among qualifying records the highest `match_count` wins, with ties broken
//! by the numerically smallest ST id. The result is **exact** when every
//! scheme locus matched, otherwise **partial**, in which case the alleles of
//! the loci the sample did not resolve are predicted from the winning record.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mlst_solver::catalog::store::ProfileTable;
//! use mlst_solver::core::scheme::Scheme;
//! use mlst_solver::matching::assembler::ProfileAssembler;
//! use mlst_solver::matching::caller::Thresholds;
//! use mlst_solver::matching::engine::MatchingEngine;
//! use mlst_solver::parsing::blast::parse_hits_file;
//! use std::path::Path;
//!
//! let scheme = Scheme::oxford();
//! let table = ProfileTable::load(scheme.clone(), Path::new("profiles")).unwrap();
//! let hits = parse_hits_file(Path::new("AB01.oxford_vs_query.b6")).unwrap();
//!
//! let assembler = ProfileAssembler::new(&scheme, Thresholds::default(), 5);
//! let profile = assembler.assemble("AB01", &hits);
//! assembler.check_eligible(&profile).unwrap();
//!
//! let st = MatchingEngine::new(&table, 5).find_match(&profile).unwrap();
//! println!("ST-{} ({})", st.st, st.confidence);
//! ```

pub mod assembler;
pub mod caller;
pub mod engine;
