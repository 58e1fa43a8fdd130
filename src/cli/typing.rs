use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::cli::{ConfigArgs, OutputFormat};
use crate::config::TypingConfig;
use crate::core::call::CallStatus;
use crate::core::scheme::Scheme;
use crate::core::types::{SchemeId, TypingOutcome, TypingResult};
use crate::matching::caller::Thresholds;
use crate::pipeline::batch::{discover_samples, BatchRunner, SampleReport};

/// Placeholder for values a report cannot provide
const MISSING: &str = "N/A";

#[derive(Args)]
pub struct TypeArgs {
    /// Directory holding `<sample>.<scheme>_vs_query.b6` hit files
    #[arg(long, value_name = "DIR")]
    pub hits: PathBuf,

    /// Root directory of the scheme ST profile tables
    #[arg(long, value_name = "DIR")]
    pub profiles: PathBuf,

    /// Sample ids to type (discovered from the hits directory by default)
    #[arg(long, num_args = 1..)]
    pub samples: Vec<String>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Minimum percent identity for a hit to count
    #[arg(long)]
    pub min_identity: Option<f64>,

    /// Minimum percent query coverage for a hit to count
    #[arg(long)]
    pub min_coverage: Option<f64>,

    /// Maximum e-value for a hit to count
    #[arg(long = "max-evalue")]
    pub max_e_value: Option<f64>,

    /// Minimum resolved (and matching) loci required to assign an ST
    #[arg(long = "min-genes")]
    pub min_genes: Option<usize>,

    /// Worker threads (defaults to one per core)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,
}

impl TypeArgs {
    fn build_config(&self) -> anyhow::Result<TypingConfig> {
        let mut config = self.config.load()?;
        if let Some(v) = self.min_identity {
            config.thresholds.min_identity = v;
        }
        if let Some(v) = self.min_coverage {
            config.thresholds.min_coverage = v;
        }
        if let Some(v) = self.max_e_value {
            config.thresholds.max_e_value = v;
        }
        if let Some(v) = self.min_genes {
            config.min_genes_required = v;
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Serialized form of a whole run
#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub version: &'static str,
    pub thresholds: Thresholds,
    pub min_genes_required: usize,
    pub schemes: Vec<&'a SchemeId>,
    pub samples: &'a [SampleReport],
}

/// Execute type subcommand
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the hits directory is
/// missing, or no samples are found. Samples that fail to type do not cause
/// an error.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: TypeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.build_config()?;

    if !args.hits.is_dir() {
        bail!("Hits directory not found: {}", args.hits.display());
    }

    let samples = if args.samples.is_empty() {
        discover_samples(&args.hits, &config.schemes)
            .with_context(|| format!("Failed to list {}", args.hits.display()))?
    } else {
        args.samples.clone()
    };
    if samples.is_empty() {
        bail!("No samples found in {}", args.hits.display());
    }

    if verbose {
        eprintln!(
            "Typing {} samples against {} schemes",
            samples.len(),
            config.schemes.len()
        );
    }

    let runner = BatchRunner::new(config, &args.hits, &args.profiles);
    for ctx in runner.contexts() {
        if let Ok(table) = &ctx.table {
            info!("Loaded {} STs for {}", table.len(), ctx.scheme.id);
        }
    }

    let reports = match args.threads {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("Failed to start worker pool")?
            .install(|| runner.run(&samples)),
        None => runner.run(&samples),
    };

    let config = runner.config();
    match format {
        OutputFormat::Text => print!("{}", render_text(&reports, &config.schemes)),
        OutputFormat::Json => {
            let report = BatchReport {
                generated_at: Utc::now(),
                version: env!("CARGO_PKG_VERSION"),
                thresholds: config.thresholds,
                min_genes_required: config.min_genes_required,
                schemes: config.schemes.iter().map(|s| &s.id).collect(),
                samples: &reports,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Tsv => print!("{}", render_tsv(&reports, &config.schemes)),
        OutputFormat::Profiles => print!("{}", render_profiles(&reports, &config.schemes)),
    }

    Ok(())
}

fn format_st(st: Option<&str>) -> String {
    st.map_or_else(|| MISSING.to_string(), |st| format!("ST-{st}"))
}

fn render_text(reports: &[SampleReport], schemes: &[Scheme]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!("Sample: {}\n", report.sample_id));
        for result in &report.results {
            let name = schemes
                .iter()
                .find(|s| s.id == result.scheme_id)
                .map_or(result.scheme_id.as_str(), |s| s.display_name.as_str());
            render_result_text(&mut out, name, result);
        }
        out.push('\n');
    }
    out
}

fn render_result_text(out: &mut String, name: &str, result: &TypingResult) {
    match &result.outcome {
        TypingOutcome::Typed(m) => {
            out.push_str(&format!(
                "  {name}: ST-{} ({}, {}/{} loci)\n",
                m.st, m.confidence, m.matched_loci, result.total_loci
            ));
            out.push_str(&format!(
                "    Clonal complex: {}\n",
                m.clonal_complex.as_deref().unwrap_or(MISSING)
            ));
            out.push_str(&format!(
                "    Species: {}\n",
                m.species.as_deref().unwrap_or(MISSING)
            ));
            if !m.tied_sts.is_empty() {
                out.push_str(&format!("    Also consistent: ST-{}\n", m.tied_sts.join(", ST-")));
            }
        }
        TypingOutcome::NoMatch { reason }
        | TypingOutcome::InsufficientLoci { reason, .. }
        | TypingOutcome::Failed { reason } => {
            out.push_str(&format!("  {name}: not typed ({reason})\n"));
        }
    }

    if result.skipped_records > 0 {
        out.push_str(&format!(
            "    Skipped {} malformed hit line(s)\n",
            result.skipped_records
        ));
    }

    let Some(profile) = &result.profile else {
        return;
    };
    for call in &profile.calls {
        let line = match &call.status {
            CallStatus::Resolved(a) => {
                let perfect = if a.is_perfect { "" } else { " ~" };
                let alts = if a.alternative_count > 0 {
                    format!(" [{} near-identical alternative(s)]", a.alternative_count)
                } else {
                    String::new()
                };
                format!(
                    "{}{perfect} ({:.1}% id, {:.1}% cov){alts}",
                    a.allele, a.identity, a.coverage
                )
            }
            CallStatus::Unresolved { reason } => match result.predicted_allele(&call.locus) {
                Some(allele) => format!("{allele} (predicted; {reason})"),
                None => format!("- ({reason})"),
            },
        };
        out.push_str(&format!("    {:<12}{line}\n", call.locus));
    }
}

fn render_tsv(reports: &[SampleReport], schemes: &[Scheme]) -> String {
    let mut header = vec!["Sample".to_string()];
    for s in schemes {
        header.push(format!("{}_ST", s.display_name));
        header.push(format!("{}_CC", s.display_name));
        header.push(format!("{}_Species", s.display_name));
    }
    header.push("Status".to_string());

    let mut out = header.join("\t");
    out.push('\n');

    for report in reports {
        let mut row = vec![report.sample_id.clone()];
        for s in schemes {
            let m = report
                .result_for(s.id.as_str())
                .and_then(TypingResult::st_match);
            row.push(format_st(m.map(|m| m.st.as_str())));
            row.push(
                m.and_then(|m| m.clonal_complex.clone())
                    .unwrap_or_else(|| MISSING.to_string()),
            );
            row.push(
                m.and_then(|m| m.species.clone())
                    .unwrap_or_else(|| MISSING.to_string()),
            );
        }
        row.push(if report.is_complete() { "Complete" } else { "Incomplete" }.to_string());
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out
}

/// `Sample` then every scheme's loci in scheme order. Only called alleles are
/// written; predicted alleles are not.
fn render_profiles(reports: &[SampleReport], schemes: &[Scheme]) -> String {
    let mut header = vec!["Sample"];
    header.extend(schemes.iter().flat_map(|s| s.loci.iter().map(String::as_str)));

    let mut out = header.join("\t");
    out.push('\n');

    for report in reports {
        let mut row = vec![report.sample_id.as_str()];
        for s in schemes {
            let profile = report
                .result_for(s.id.as_str())
                .and_then(|r| r.profile.as_ref());
            row.extend(s.loci.iter().map(|locus| {
                profile
                    .and_then(|p| p.allele(locus))
                    .unwrap_or(MISSING)
            }));
        }
        out.push_str(&row.join("\t"));
        out.push('\n');
    }
    out
}
