//! Command-line interface for mlst-solver.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **type**: Assign sequence types to every sample in a hits directory
//! - **schemes**: List the configured typing schemes and their loci
//!
//! ## Usage
//!
//! ```text
//! # Type every sample found in blast_out/ against Oxford and Pasteur
//! mlst-solver type --hits blast_out --profiles db
//!
//! # Only two samples, Pasteur only, stricter identity
//! mlst-solver type --hits blast_out --profiles db --samples AB01 AB02 \
//!     --scheme pasteur --min-identity 98
//!
//! # Summary table for a spreadsheet
//! mlst-solver type --hits blast_out --profiles db --format tsv > mlst.tsv
//!
//! # Allele profiles for one scheme, e.g. for GrapeTree
//! mlst-solver type --hits blast_out --profiles db --scheme oxford --format profiles
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::TypingConfig;

pub mod schemes;
pub mod typing;

#[derive(Parser)]
#[command(name = "mlst-solver")]
#[command(version)]
#[command(about = "Assign MLST sequence types from allele alignment hits")]
#[command(
    long_about = "mlst-solver assigns multi-locus sequence types to bacterial isolates.\n\nIt reads tabular BLAST hits of each sample's assembly against a scheme's allele database, calls one allele per locus, and matches the resulting profile against the scheme's ST table:\n- Exact matches when every locus is resolved\n- Partial matches with predicted alleles when a few loci are missing\n- A reason for every sample and scheme that could not be typed"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Type samples against the configured schemes
    Type(typing::TypeArgs),

    /// List the configured typing schemes
    Schemes(schemes::SchemesArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
    /// Called allele per locus, one row per sample
    Profiles,
}

/// Options shared by every command that needs a run configuration
#[derive(clap::Args, Debug, Default)]
pub struct ConfigArgs {
    /// JSON config file (thresholds, min genes, custom schemes)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Restrict to these scheme ids, in this order
    #[arg(long = "scheme", value_name = "ID")]
    pub schemes: Vec<String>,
}

impl ConfigArgs {
    /// Load the config file (or defaults) and apply the scheme selection
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is invalid or a scheme id is unknown.
    pub fn load(&self) -> anyhow::Result<TypingConfig> {
        let mut config = match &self.config {
            Some(path) => TypingConfig::load_from_file(path)?,
            None => TypingConfig::default(),
        };
        config.select_schemes(&self.schemes)?;
        Ok(config)
    }
}
