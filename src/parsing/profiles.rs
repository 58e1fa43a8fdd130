use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::core::scheme::Scheme;
use crate::core::sequence_type::StProfileRecord;
use crate::parsing::blast::ParseError;

/// Column holding the sequence-type id
pub const ST_COLUMN: &str = "ST";
pub const CLONAL_COMPLEX_COLUMN: &str = "clonal_complex";
pub const SPECIES_COLUMN: &str = "species";

/// Parse a tab-separated ST profile table from a file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or the errors of
/// [`parse_profiles_text`].
pub fn parse_profiles_file(path: &Path, scheme: &Scheme) -> Result<Vec<StProfileRecord>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_profiles_text(&content, scheme)
}

/// Parse a tab-separated ST profile table.
///
/// The first non-empty, non-comment line is the header. It must name every
/// scheme locus and the `ST` column; `clonal_complex` and `species` are
/// optional. Rows missing an allele for any locus, or with a blank ST, are
/// skipped with a warning.
///
/// # Errors
///
/// Returns `ParseError::MissingColumns` listing every required column absent
/// from the header, or `ParseError::InvalidFormat` if the table has no header
/// or no usable rows.
pub fn parse_profiles_text(text: &str, scheme: &Scheme) -> Result<Vec<StProfileRecord>, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty() && !l.starts_with('#'));

    let (_, header) = lines
        .next()
        .ok_or_else(|| ParseError::InvalidFormat("Profile table is empty".to_string()))?;

    let columns: HashMap<&str, usize> = header
        .split('\t')
        .map(str::trim)
        .enumerate()
        .map(|(i, name)| (name, i))
        .collect();

    let missing: Vec<String> = scheme
        .loci
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(ST_COLUMN))
        .filter(|c| !columns.contains_key(c))
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::MissingColumns(missing));
    }

    let st_idx = columns[ST_COLUMN];
    let cc_idx = columns.get(CLONAL_COMPLEX_COLUMN).copied();
    let species_idx = columns.get(SPECIES_COLUMN).copied();
    let locus_idx: Vec<(&str, usize)> = scheme
        .loci
        .iter()
        .map(|l| (l.as_str(), columns[l.as_str()]))
        .collect();

    let mut records = Vec::new();
    for (i, line) in lines {
        let line_num = i + 1;
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        let cell = |idx: usize| fields.get(idx).copied().filter(|v| !v.is_empty());

        let Some(st) = cell(st_idx) else {
            warn!("Skipping profile row on line {line_num}: blank ST");
            continue;
        };

        let mut alleles = Vec::with_capacity(locus_idx.len());
        let mut incomplete = None;
        for &(locus, idx) in &locus_idx {
            match cell(idx) {
                Some(allele) => alleles.push((locus, allele)),
                None => {
                    incomplete = Some(locus);
                    break;
                }
            }
        }
        if let Some(locus) = incomplete {
            warn!("Skipping ST {st} on line {line_num}: no allele for {locus}");
            continue;
        }

        let mut record = StProfileRecord::new(scheme.id.clone(), st, alleles);
        record.clonal_complex = cc_idx.and_then(cell).map(ToString::to_string);
        record.species = species_idx.and_then(cell).map(ToString::to_string);
        records.push(record);
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No usable sequence types found in profile table".to_string(),
        ));
    }

    Ok(records)
}
