//! ST reference table storage and indexing.
//!
//! Each scheme has one [`ProfileTable`](store::ProfileTable): the curated list
//! of sequence types and the allele each carries at every scheme locus. Tables
//! are loaded once per run and never mutated afterwards, so all sample workers
//! can read them concurrently.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mlst_solver::catalog::store::ProfileTable;
//! use mlst_solver::core::scheme::Scheme;
//! use std::path::Path;
//!
//! // Reads <profiles>/Oxford/profiles_oxford.csv
//! let table = ProfileTable::load(Scheme::oxford(), Path::new("profiles")).unwrap();
//! println!("{} sequence types", table.len());
//! ```

pub mod index;
pub mod store;
