//! Per-sample typing and parallel batch execution.
//!
//! [`sample`] turns one sample's hit file into a [`TypingResult`](crate::core::types::TypingResult)
//! for one scheme. [`batch`] discovers samples in a hits directory and fans
//! them out over a rayon pool, sharing each scheme's reference table
//! read-only across workers.

pub mod batch;
pub mod sample;
