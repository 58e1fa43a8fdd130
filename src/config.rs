//! Run configuration.
//!
//! [`TypingConfig`] is built once per run and passed by reference into every
//! component; nothing reads global threshold state. Defaults encode the
//! policy for the *A. baumannii* Oxford and Pasteur schemes (identity >= 95%,
//! coverage >= 90%, e-value <= 1e-10, 5 of 7 loci).
//!
//! A JSON file may override any subset of fields:
//!
//! ```json
//! {
//!   "thresholds": { "min_identity": 97.0 },
//!   "min_genes_required": 6,
//!   "schemes": [
//!     {
//!       "id": "achtman",
//!       "display_name": "Achtman",
//!       "loci": ["adk", "fumC", "gyrB", "icd", "mdh", "purA", "recA"],
//!       "profiles": "Achtman/profiles.tsv"
//!     }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::scheme::Scheme;
use crate::matching::caller::Thresholds;
use crate::utils::validation::{validate_scheme, validate_thresholds, ValidationError};

/// Default number of resolved loci required before ST matching is attempted
pub const DEFAULT_MIN_GENES: usize = 5;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Unknown scheme '{0}'")]
    UnknownScheme(String),
}

/// Everything the typing core needs to know about a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingConfig {
    pub thresholds: Thresholds,
    pub min_genes_required: usize,
    pub schemes: Vec<Scheme>,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            min_genes_required: DEFAULT_MIN_GENES,
            schemes: Scheme::builtin(),
        }
    }
}

/// On-disk form; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    thresholds: Option<ThresholdsFile>,
    min_genes_required: Option<usize>,
    schemes: Option<Vec<SchemeFile>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThresholdsFile {
    min_identity: Option<f64>,
    min_coverage: Option<f64>,
    max_e_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemeFile {
    id: String,
    display_name: Option<String>,
    loci: Vec<String>,
    hits_suffix: Option<String>,
    profiles: Option<PathBuf>,
}

impl From<SchemeFile> for Scheme {
    fn from(file: SchemeFile) -> Self {
        let display_name = file.display_name.unwrap_or_else(|| file.id.clone());
        let mut scheme = Scheme::new(file.id, display_name, file.loci);
        if let Some(suffix) = file.hits_suffix {
            scheme = scheme.with_hits_suffix(suffix);
        }
        if let Some(profiles) = file.profiles {
            scheme = scheme.with_profiles(profiles);
        }
        scheme
    }
}

impl TypingConfig {
    /// Load a config file, filling unspecified fields from the defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a config from JSON, filling unspecified fields from the defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the JSON is invalid or the result fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let mut config = Self::default();

        if let Some(t) = file.thresholds {
            config.thresholds = Thresholds {
                min_identity: t.min_identity.unwrap_or(config.thresholds.min_identity),
                min_coverage: t.min_coverage.unwrap_or(config.thresholds.min_coverage),
                max_e_value: t.max_e_value.unwrap_or(config.thresholds.max_e_value),
            };
        }
        if let Some(min_genes) = file.min_genes_required {
            config.min_genes_required = min_genes;
        }
        if let Some(schemes) = file.schemes {
            config.schemes = schemes.into_iter().map(Scheme::from).collect();
        }

        config.validate()?;
        Ok(config)
    }

    /// Keep only the schemes whose ids are listed, in the listed order
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownScheme` for the first id that names no
    /// configured scheme.
    pub fn select_schemes(&mut self, ids: &[String]) -> Result<(), ConfigError> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut selected = Vec::with_capacity(ids.len());
        for id in ids {
            let scheme = self
                .schemes
                .iter()
                .find(|s| s.id.as_str() == id)
                .ok_or_else(|| ConfigError::UnknownScheme(id.clone()))?;
            selected.push(scheme.clone());
        }
        self.schemes = selected;
        Ok(())
    }

    /// Check thresholds and schemes
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_thresholds(&self.thresholds)?;
        if self.min_genes_required == 0 {
            return Err(ValidationError::ZeroMinGenes);
        }
        for (i, scheme) in self.schemes.iter().enumerate() {
            validate_scheme(scheme, self.min_genes_required)?;
            if self.schemes[..i].iter().any(|s| s.id == scheme.id) {
                return Err(ValidationError::DuplicateScheme(scheme.id.to_string()));
            }
        }
        Ok(())
    }
}
