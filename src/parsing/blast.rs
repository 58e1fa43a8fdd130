use std::collections::BTreeMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::warn;

use crate::core::hit::{compare_hits, coverage_percent, AlignmentHit};
use crate::error::TypingError;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Number of tab-separated fields in a hit record:
/// `qseqid sseqid pident length qlen slen qstart qend sstart send bitscore evalue`
pub const HIT_FIELD_COUNT: usize = 12;

/// Hits from one alignment file, grouped by locus and ranked with [`compare_hits`]
#[derive(Debug, Clone, Default)]
pub struct ParsedHits {
    /// Locus -> hits, best first
    pub by_locus: BTreeMap<String, Vec<AlignmentHit>>,

    /// Records dropped as malformed, each a [`TypingError::MalformedRecord`]
    pub skipped: Vec<TypingError>,
}

impl ParsedHits {
    /// Ranked hits for `locus`; empty if the locus had none
    #[must_use]
    pub fn hits(&self, locus: &str) -> &[AlignmentHit] {
        self.by_locus.get(locus).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn total_hits(&self) -> usize {
        self.by_locus.values().map(Vec::len).sum()
    }
}

/// Split a subject id into `(locus, allele)` at the last underscore.
///
/// A trailing `|dupN` marker left by allele de-duplication is removed from the
/// allele. Returns `None` when there is no underscore or either side is empty.
///
/// # Examples
///
/// ```
/// use mlst_solver::parsing::blast::split_subject_id;
///
/// assert_eq!(split_subject_id("Oxf_gltA_1"), Some(("Oxf_gltA", "1")));
/// assert_eq!(split_subject_id("Oxf_gltA_1|dup2"), Some(("Oxf_gltA", "1")));
/// assert_eq!(split_subject_id("gltA1"), None);
/// ```
#[must_use]
pub fn split_subject_id(subject_id: &str) -> Option<(&str, &str)> {
    let (locus, allele) = subject_id.rsplit_once('_')?;
    let allele = strip_dup_marker(allele);
    if locus.is_empty() || allele.is_empty() {
        return None;
    }
    Some((locus, allele))
}

fn strip_dup_marker(allele: &str) -> &str {
    match allele.split_once("|dup") {
        Some((base, n)) if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => base,
        _ => allele,
    }
}

/// Parse one hit line. `line_num` is 1-based and only used in errors.
///
/// # Errors
///
/// Returns `TypingError::MalformedRecord` when the line has fewer than
/// [`HIT_FIELD_COUNT`] fields, a numeric field does not parse, or the subject
/// id has no `<locus>_<allele>` split.
pub fn parse_hit_line(line: &str, line_num: usize) -> Result<AlignmentHit, TypingError> {
    let malformed = |reason: String| TypingError::MalformedRecord {
        line: line_num,
        reason,
    };

    let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
    if fields.len() < HIT_FIELD_COUNT {
        return Err(malformed(format!(
            "expected {HIT_FIELD_COUNT} fields, found {}",
            fields.len()
        )));
    }

    let subject_id = fields[1];
    let (locus, allele) = split_subject_id(subject_id)
        .ok_or_else(|| malformed(format!("subject id '{subject_id}' is not <locus>_<allele>")))?;

    let identity = float_field(fields[2], "percent identity").map_err(malformed)?;
    let alignment_length = count_field(fields[3], "alignment length").map_err(malformed)?;
    let query_length = optional_count_field(fields[4], "query length").map_err(malformed)?;
    let subject_length = optional_count_field(fields[5], "subject length").map_err(malformed)?;
    let query_start = optional_count_field(fields[6], "query start").map_err(malformed)?;
    let query_end = optional_count_field(fields[7], "query end").map_err(malformed)?;
    let subject_start = optional_count_field(fields[8], "subject start").map_err(malformed)?;
    let subject_end = optional_count_field(fields[9], "subject end").map_err(malformed)?;
    let bit_score = float_field(fields[10], "bit score").map_err(malformed)?;
    let e_value = float_field(fields[11], "e-value").map_err(malformed)?;

    let coverage = coverage_percent(
        alignment_length,
        query_length,
        query_start,
        query_end,
        subject_length,
    );

    Ok(AlignmentHit {
        query_id: fields[0].to_string(),
        subject_id: subject_id.to_string(),
        locus: locus.to_string(),
        allele: allele.to_string(),
        identity,
        alignment_length,
        query_length,
        subject_length,
        query_start,
        query_end,
        subject_start,
        subject_end,
        bit_score,
        e_value,
        coverage,
    })
}

fn float_field(value: &str, name: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("invalid {name}: '{value}'")),
    }
}

fn count_field(value: &str, name: &str) -> Result<u64, String> {
    value
        .parse::<u64>()
        .map_err(|_| format!("invalid {name}: '{value}'"))
}

/// Empty means the tool did not report the value
fn optional_count_field(value: &str, name: &str) -> Result<u64, String> {
    if value.is_empty() {
        Ok(0)
    } else {
        count_field(value, name)
    }
}

/// Parse hit records from text, skipping malformed lines.
///
/// Blank lines and `#` comment lines are ignored. Each locus group is sorted
/// with [`compare_hits`]; the sort is stable, so fully tied hits keep file order.
#[must_use]
pub fn parse_hits_text(text: &str) -> ParsedHits {
    let mut parsed = ParsedHits::default();
    for (i, line) in text.lines().enumerate() {
        parsed.push_line(line, i + 1);
    }
    parsed.rank();
    parsed
}

/// Parse a hit file; `.gz` files are decompressed on the fly
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened or read. Lines that
/// are not valid UTF-8 are skipped like any other malformed record.
pub fn parse_hits_file(path: &Path) -> Result<ParsedHits, ParseError> {
    let file = std::fs::File::open(path)?;
    let is_gzipped = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));

    if is_gzipped {
        parse_hits_reader(BufReader::new(GzDecoder::new(file)))
    } else {
        parse_hits_reader(BufReader::new(file))
    }
}

fn parse_hits_reader<R: BufRead>(reader: R) -> Result<ParsedHits, ParseError> {
    let mut parsed = ParsedHits::default();
    for (i, bytes) in reader.split(b'\n').enumerate() {
        let line_num = i + 1;
        let mut bytes = bytes?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        match String::from_utf8(bytes) {
            Ok(line) => parsed.push_line(&line, line_num),
            Err(_) => parsed.skip(TypingError::MalformedRecord {
                line: line_num,
                reason: "line is not valid UTF-8".to_string(),
            }),
        }
    }
    parsed.rank();
    Ok(parsed)
}

impl ParsedHits {
    fn push_line(&mut self, line: &str, line_num: usize) {
        if line.trim().is_empty() || line.starts_with('#') {
            return;
        }
        match parse_hit_line(line, line_num) {
            Ok(hit) => self.by_locus.entry(hit.locus.clone()).or_default().push(hit),
            Err(err) => self.skip(err),
        }
    }

    fn skip(&mut self, err: TypingError) {
        warn!("Skipping hit record: {err}");
        self.skipped.push(err);
    }

    fn rank(&mut self) {
        for hits in self.by_locus.values_mut() {
            hits.sort_by(compare_hits);
        }
    }
}
