use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::store::ProfileTable;
use crate::config::TypingConfig;
use crate::core::scheme::Scheme;
use crate::core::types::{TypingOutcome, TypingResult};
use crate::error::TypingError;
use crate::matching::assembler::ProfileAssembler;
use crate::matching::engine::MatchingEngine;
use crate::parsing::blast::{parse_hits_file, ParsedHits};

/// A scheme together with its loaded reference table.
///
/// A table that failed to load is kept as the error so every sample typed
/// against this scheme reports it, while other schemes carry on.
#[derive(Debug, Clone)]
pub struct SchemeContext {
    pub scheme: Scheme,
    pub table: Result<Arc<ProfileTable>, TypingError>,
}

impl SchemeContext {
    /// Load the scheme's table from `profiles_dir`
    #[must_use]
    pub fn load(scheme: Scheme, profiles_dir: &Path) -> Self {
        let table = ProfileTable::load(scheme.clone(), profiles_dir).map(Arc::new);
        if let Err(err) = &table {
            warn!("Scheme {} unavailable: {err}", scheme.id);
        }
        Self { scheme, table }
    }

    #[must_use]
    pub fn with_table(table: ProfileTable) -> Self {
        Self {
            scheme: table.scheme.clone(),
            table: Ok(Arc::new(table)),
        }
    }
}

/// Find the hit file for a sample, preferring the uncompressed name
#[must_use]
pub fn locate_hits(scheme: &Scheme, hits_dir: &Path, sample_id: &str) -> Option<PathBuf> {
    let plain = scheme.hits_path(hits_dir, sample_id);
    if plain.is_file() {
        return Some(plain);
    }
    let mut gz = plain.into_os_string();
    gz.push(".gz");
    let gz = PathBuf::from(gz);
    gz.is_file().then_some(gz)
}

/// Read a sample's hit file and type it against one scheme.
///
/// Never fails: problems are recorded on the returned result.
#[must_use]
pub fn type_sample(
    sample_id: &str,
    context: &SchemeContext,
    hits_dir: &Path,
    config: &TypingConfig,
) -> TypingResult {
    let scheme = &context.scheme;

    let Some(path) = locate_hits(scheme, hits_dir, sample_id) else {
        let err = TypingError::MissingInput {
            what: format!("{} hit file", scheme.display_name),
            path: scheme.hits_path(hits_dir, sample_id),
        };
        return TypingResult::failed(sample_id, scheme.id.clone(), scheme.locus_count(), err);
    };

    let hits = match parse_hits_file(&path) {
        Ok(hits) => hits,
        Err(err) => {
            warn!("{sample_id}: failed to read {}: {err}", path.display());
            return TypingResult {
                sample_id: sample_id.to_string(),
                scheme_id: scheme.id.clone(),
                total_loci: scheme.locus_count(),
                profile: None,
                skipped_records: 0,
                outcome: TypingOutcome::Failed {
                    reason: format!("failed to read {}: {err}", path.display()),
                },
            };
        }
    };

    type_hits(sample_id, context, &hits, config)
}

/// Type already-parsed hits against one scheme. Performs no I/O.
#[must_use]
pub fn type_hits(
    sample_id: &str,
    context: &SchemeContext,
    hits: &ParsedHits,
    config: &TypingConfig,
) -> TypingResult {
    let scheme = &context.scheme;
    let assembler = ProfileAssembler::new(scheme, config.thresholds, config.min_genes_required);
    let profile = assembler.assemble(sample_id, hits);

    debug!(
        "{sample_id}/{}: resolved {}/{} loci",
        scheme.id,
        profile.resolved_count(),
        scheme.locus_count()
    );

    let outcome = match assembler.check_eligible(&profile) {
        Err(err) => err.into(),
        Ok(()) => match &context.table {
            Err(err) => err.clone().into(),
            Ok(table) => match MatchingEngine::new(table, config.min_genes_required)
                .find_match(&profile)
            {
                Ok(st) => TypingOutcome::Typed(st),
                Err(err) => err.into(),
            },
        },
    };

    TypingResult {
        sample_id: sample_id.to_string(),
        scheme_id: scheme.id.clone(),
        total_loci: scheme.locus_count(),
        profile: Some(profile),
        skipped_records: hits.skipped.len(),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Confidence;
    use crate::parsing::blast::parse_hits_text;

    const TABLE: &str = "\
ST\tOxf_gltA\tOxf_gyrB\tOxf_gdhB\tOxf_recA\tOxf_cpn60\tOxf_gpi\tOxf_rpoD\tclonal_complex
208\t1\t3\t3\t2\t2\t97\t3\tCC92
231\t1\t3\t3\t2\t2\t96\t3\tCC92
";

    fn hit_line(locus: &str, allele: &str) -> String {
        format!("c1\t{locus}_{allele}\t100.0\t500\t500\t500\t1\t500\t1\t500\t900\t0.0\n")
    }

    fn context() -> SchemeContext {
        SchemeContext::with_table(ProfileTable::from_tsv(Scheme::oxford(), TABLE).unwrap())
    }

    fn st208_hits(skip: &[&str]) -> ParsedHits {
        let alleles = [
            ("Oxf_gltA", "1"),
            ("Oxf_gyrB", "3"),
            ("Oxf_gdhB", "3"),
            ("Oxf_recA", "2"),
            ("Oxf_cpn60", "2"),
            ("Oxf_gpi", "97"),
            ("Oxf_rpoD", "3"),
        ];
        let text: String = alleles
            .iter()
            .filter(|(l, _)| !skip.contains(l))
            .map(|(l, a)| hit_line(l, a))
            .collect();
        parse_hits_text(&text)
    }

    #[test]
    fn test_exact_typing() {
        let result = type_hits("AB01", &context(), &st208_hits(&[]), &TypingConfig::default());
        assert_eq!(result.st(), Some("208"));
        assert_eq!(result.confidence(), Confidence::Exact);
        assert_eq!(result.matched_loci(), 7);
        assert!(result.st_match().unwrap().predicted_alleles.is_empty());
    }

    #[test]
    fn test_partial_typing_is_ambiguous_between_tied_sts() {
        // without gpi, 208 and 231 both agree at the six resolved loci
        let result = type_hits(
            "AB01",
            &context(),
            &st208_hits(&["Oxf_gpi"]),
            &TypingConfig::default(),
        );
        let st = result.st_match().unwrap();
        assert_eq!(st.st, "208");
        assert_eq!(st.confidence, Confidence::Partial);
        assert_eq!(st.tied_sts, vec!["231"]);
        assert_eq!(result.predicted_allele("Oxf_gpi"), Some("97"));
    }

    #[test]
    fn test_insufficient_loci_skips_matching() {
        let result = type_hits(
            "AB01",
            &context(),
            &st208_hits(&["Oxf_gpi", "Oxf_rpoD", "Oxf_recA"]),
            &TypingConfig::default(),
        );
        assert!(matches!(
            result.outcome,
            TypingOutcome::InsufficientLoci {
                resolved: 4,
                required: 5,
                ..
            }
        ));
        assert!(result.profile.is_some());
    }

    #[test]
    fn test_broken_table_reports_configuration_error() {
        let context = SchemeContext {
            scheme: Scheme::oxford(),
            table: Err(TypingError::Configuration {
                scheme: Scheme::oxford().id,
                reason: "missing column Oxf_gpi".to_string(),
            }),
        };
        let result = type_hits("AB01", &context, &st208_hits(&[]), &TypingConfig::default());
        assert!(matches!(result.outcome, TypingOutcome::Failed { .. }));
        assert!(result.failure_reason().unwrap().contains("Oxf_gpi"));
    }

    #[test]
    fn test_missing_hit_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = type_sample("AB01", &context(), dir.path(), &TypingConfig::default());
        assert!(result.profile.is_none());
        assert!(result
            .failure_reason()
            .unwrap()
            .contains("AB01.oxford_vs_query.b6"));
    }

    #[test]
    fn test_reads_hit_file_and_counts_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut text = String::from("garbage line\n");
        for (l, a) in [("Oxf_gltA", "1"), ("Oxf_gyrB", "3"), ("Oxf_gdhB", "3")] {
            text.push_str(&hit_line(l, a));
        }
        std::fs::write(dir.path().join("AB01.oxford_vs_query.b6"), text).unwrap();

        let result = type_sample("AB01", &context(), dir.path(), &TypingConfig::default());
        assert_eq!(result.skipped_records, 1);
        assert_eq!(result.profile.as_ref().unwrap().resolved_count(), 3);
    }
}
