use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::TypingConfig;
use crate::core::scheme::Scheme;
use crate::core::types::TypingResult;
use crate::error::TypingError;
use crate::pipeline::sample::{type_sample, SchemeContext};
use crate::utils::validation::validate_sample_id;

/// All scheme results for one sample, in configured scheme order
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub sample_id: String,
    pub results: Vec<TypingResult>,
}

impl SampleReport {
    /// True when every scheme produced an ST
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(TypingResult::is_typed)
    }

    #[must_use]
    pub fn result_for(&self, scheme_id: &str) -> Option<&TypingResult> {
        self.results
            .iter()
            .find(|r| r.scheme_id.as_str() == scheme_id)
    }
}

/// Find sample ids by listing hit files named `<sample>.<hits_suffix>` for
/// any configured scheme, with or without a trailing `.gz`.
///
/// The result is sorted and free of duplicates.
///
/// # Errors
///
/// Returns an I/O error if `hits_dir` cannot be listed.
pub fn discover_samples(hits_dir: &Path, schemes: &[Scheme]) -> std::io::Result<Vec<String>> {
    let mut samples = BTreeSet::new();
    for entry in std::fs::read_dir(hits_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let name = name.strip_suffix(".gz").unwrap_or(name);
        for scheme in schemes {
            if let Some(sample) = name
                .strip_suffix(scheme.hits_suffix.as_str())
                .and_then(|s| s.strip_suffix('.'))
            {
                if !sample.is_empty() {
                    samples.insert(sample.to_string());
                }
            }
        }
    }
    Ok(samples.into_iter().collect())
}

/// Types a set of samples against every configured scheme.
///
/// Reference tables are loaded once at construction and shared read-only by
/// all workers. Samples are independent; a failure on one never affects
/// another.
pub struct BatchRunner {
    config: TypingConfig,
    contexts: Vec<SchemeContext>,
    hits_dir: PathBuf,
}

impl BatchRunner {
    /// Load every scheme's table from `profiles_dir`
    #[must_use]
    pub fn new(config: TypingConfig, hits_dir: impl Into<PathBuf>, profiles_dir: &Path) -> Self {
        let contexts = config
            .schemes
            .iter()
            .cloned()
            .map(|scheme| SchemeContext::load(scheme, profiles_dir))
            .collect();
        Self::with_contexts(config, hits_dir, contexts)
    }

    /// Use already-loaded scheme contexts
    #[must_use]
    pub fn with_contexts(
        config: TypingConfig,
        hits_dir: impl Into<PathBuf>,
        contexts: Vec<SchemeContext>,
    ) -> Self {
        Self {
            config,
            contexts,
            hits_dir: hits_dir.into(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &TypingConfig {
        &self.config
    }

    #[must_use]
    pub fn contexts(&self) -> &[SchemeContext] {
        &self.contexts
    }

    /// Type one sample against every scheme
    #[must_use]
    pub fn run_sample(&self, sample_id: &str) -> SampleReport {
        let results = match validate_sample_id(sample_id) {
            Ok(()) => self
                .contexts
                .iter()
                .map(|ctx| type_sample(sample_id, ctx, &self.hits_dir, &self.config))
                .collect(),
            Err(err) => self
                .contexts
                .iter()
                .map(|ctx| {
                    let err = TypingError::Configuration {
                        scheme: ctx.scheme.id.clone(),
                        reason: err.to_string(),
                    };
                    TypingResult::failed(
                        sample_id,
                        ctx.scheme.id.clone(),
                        ctx.scheme.locus_count(),
                        err,
                    )
                })
                .collect(),
        };

        let report = SampleReport {
            sample_id: sample_id.to_string(),
            results,
        };
        debug!(
            "{sample_id}: {}",
            report
                .results
                .iter()
                .map(|r| format!("{}={}", r.scheme_id, r.st().unwrap_or("-")))
                .collect::<Vec<_>>()
                .join(" ")
        );
        report
    }

    /// Type all samples in parallel on the current rayon pool.
    ///
    /// Reports come back sorted by sample id regardless of completion order.
    #[must_use]
    pub fn run(&self, samples: &[String]) -> Vec<SampleReport> {
        let mut reports: Vec<SampleReport> =
            samples.par_iter().map(|s| self.run_sample(s)).collect();
        reports.sort_by(|a, b| a.sample_id.cmp(&b.sample_id));

        let complete = reports.iter().filter(|r| r.is_complete()).count();
        info!(
            "Typed {} samples against {} schemes: {complete} complete, {} incomplete",
            reports.len(),
            self.contexts.len(),
            reports.len() - complete
        );
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::ProfileTable;
    use crate::core::types::TypingOutcome;

    const OXFORD_TABLE: &str = "\
ST\tOxf_gltA\tOxf_gyrB\tOxf_gdhB\tOxf_recA\tOxf_cpn60\tOxf_gpi\tOxf_rpoD
208\t1\t3\t3\t2\t2\t97\t3
";

    fn write_hits(dir: &Path, sample: &str, alleles: &[(&str, &str)]) {
        let text: String = alleles
            .iter()
            .map(|(l, a)| {
                format!("c1\t{l}_{a}\t100.0\t500\t500\t500\t1\t500\t1\t500\t900\t0.0\n")
            })
            .collect();
        std::fs::write(dir.join(format!("{sample}.oxford_vs_query.b6")), text).unwrap();
    }

    const ST208: [(&str, &str); 7] = [
        ("Oxf_gltA", "1"),
        ("Oxf_gyrB", "3"),
        ("Oxf_gdhB", "3"),
        ("Oxf_recA", "2"),
        ("Oxf_cpn60", "2"),
        ("Oxf_gpi", "97"),
        ("Oxf_rpoD", "3"),
    ];

    fn runner(dir: &Path) -> BatchRunner {
        let mut config = TypingConfig::default();
        config.schemes = vec![Scheme::oxford()];
        let table = ProfileTable::from_tsv(Scheme::oxford(), OXFORD_TABLE).unwrap();
        BatchRunner::with_contexts(config, dir, vec![SchemeContext::with_table(table)])
    }

    #[test]
    fn test_discover_samples() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "B.oxford_vs_query.b6",
            "A.pasteur_vs_query.b6",
            "A.oxford_vs_query.b6.gz",
            "notes.txt",
            ".oxford_vs_query.b6",
        ] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("C.oxford_vs_query.b6")).unwrap();

        let samples = discover_samples(dir.path(), &Scheme::builtin()).unwrap();
        assert_eq!(samples, vec!["A", "B"]);
    }

    #[test]
    fn test_run_sorts_by_sample_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        write_hits(dir.path(), "S2", &ST208);
        write_hits(dir.path(), "S1", &ST208[..3]);

        let samples = vec!["S2".to_string(), "S3".to_string(), "S1".to_string()];
        let reports = runner(dir.path()).run(&samples);

        let ids: Vec<_> = reports.iter().map(|r| r.sample_id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2", "S3"]);

        assert!(matches!(
            reports[0].results[0].outcome,
            TypingOutcome::InsufficientLoci { resolved: 3, .. }
        ));
        assert_eq!(reports[1].results[0].st(), Some("208"));
        assert!(reports[1].is_complete());
        assert!(matches!(
            reports[2].results[0].outcome,
            TypingOutcome::Failed { .. }
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = tempfile::tempdir().unwrap();
        let samples: Vec<String> = (0..20).map(|i| format!("S{i:02}")).collect();
        for (i, s) in samples.iter().enumerate() {
            write_hits(dir.path(), s, &ST208[..3 + i % 5]);
        }
        let runner = runner(dir.path());
        let parallel = runner.run(&samples);
        let sequential: Vec<_> = samples.iter().map(|s| runner.run_sample(s)).collect();
        for (p, s) in parallel.iter().zip(&sequential) {
            assert_eq!(p.sample_id, s.sample_id);
            assert_eq!(p.results, s.results);
        }
    }

    #[test]
    fn test_invalid_sample_id_is_reported_per_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let report = runner(dir.path()).run_sample("../escape");
        assert_eq!(report.results.len(), 1);
        assert!(report.results[0]
            .failure_reason()
            .unwrap()
            .contains("path separators"));
        assert!(!report.is_complete());
    }
}
