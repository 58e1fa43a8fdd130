use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::types::SchemeId;

/// Oxford scheme loci for *Acinetobacter baumannii*
pub const OXFORD_LOCI: [&str; 7] = [
    "Oxf_gltA", "Oxf_gyrB", "Oxf_gdhB", "Oxf_recA", "Oxf_cpn60", "Oxf_gpi", "Oxf_rpoD",
];

/// Pasteur scheme loci for *Acinetobacter baumannii*
pub const PASTEUR_LOCI: [&str; 7] = [
    "Pas_cpn60", "Pas_fusA", "Pas_gltA", "Pas_pyrG", "Pas_recA", "Pas_rplB", "Pas_rpoB",
];

/// A typing scheme: a fixed, ordered locus list plus where its inputs live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: SchemeId,

    /// Human-readable name used in reports (e.g. "Oxford")
    pub display_name: String,

    /// Loci in report order
    pub loci: Vec<String>,

    /// Hit files for a sample are named `<sample>.<hits_suffix>`
    pub hits_suffix: String,

    /// ST profile table, relative to the profiles root directory
    pub profiles: PathBuf,
}

impl Scheme {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        loci: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let id = SchemeId::new(id);
        let hits_suffix = format!("{id}_vs_query.b6");
        let profiles = PathBuf::from(format!("{id}.tsv"));
        Self {
            id,
            display_name: display_name.into(),
            loci: loci.into_iter().map(Into::into).collect(),
            hits_suffix,
            profiles,
        }
    }

    #[must_use]
    pub fn with_hits_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.hits_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_profiles(mut self, path: impl Into<PathBuf>) -> Self {
        self.profiles = path.into();
        self
    }

    /// Oxford scheme as distributed by PubMLST
    #[must_use]
    pub fn oxford() -> Self {
        Self::new("oxford", "Oxford", OXFORD_LOCI).with_profiles("Oxford/profiles_oxford.csv")
    }

    /// Pasteur scheme as distributed by PubMLST
    #[must_use]
    pub fn pasteur() -> Self {
        Self::new("pasteur", "Pasteur", PASTEUR_LOCI).with_profiles("Pasteur/profiles_pasteur.csv")
    }

    /// Both *A. baumannii* schemes
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![Self::oxford(), Self::pasteur()]
    }

    #[must_use]
    pub fn locus_count(&self) -> usize {
        self.loci.len()
    }

    #[must_use]
    pub fn has_locus(&self, locus: &str) -> bool {
        self.loci.iter().any(|l| l == locus)
    }

    /// Loci that appear more than once, in first-repeat order
    #[must_use]
    pub fn duplicate_loci(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.loci
            .iter()
            .filter(|l| !seen.insert(l.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Path of the hit file for `sample` inside `hits_dir`
    #[must_use]
    pub fn hits_path(&self, hits_dir: &Path, sample: &str) -> PathBuf {
        hits_dir.join(format!("{sample}.{}", self.hits_suffix))
    }

    /// Path of the ST profile table inside `profiles_dir`
    #[must_use]
    pub fn profiles_path(&self, profiles_dir: &Path) -> PathBuf {
        profiles_dir.join(&self.profiles)
    }
}
