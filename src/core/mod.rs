//! Core data types for MLST typing.
//!
//! Data flows strictly forward through these types; nothing downstream
//! mutates an upstream value:
//!
//! - [`AlignmentHit`](hit::AlignmentHit): one alignment of a sample sequence against an allele
//! - [`LocusCall`](call::LocusCall): the allele called at one locus, or why none was
//! - [`GenotypeProfile`](profile::GenotypeProfile): all calls for a sample under a scheme
//! - [`Scheme`](scheme::Scheme): a fixed locus list and its input locations
//! - [`StProfileRecord`](sequence_type::StProfileRecord): one row of a reference ST table
//! - [`TypingResult`](types::TypingResult): the ST assigned to a sample, or why none was
//!
//! ## Subject ids
//!
//! Allele references name each sequence `<locus>_<allele>`, e.g. `Oxf_gltA_1`.
//! The split happens at the **last** underscore, so locus names may
//! themselves contain underscores.

pub mod call;
pub mod hit;
pub mod profile;
pub mod scheme;
pub mod sequence_type;
pub mod types;
