use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::core::scheme::Scheme;
use crate::core::sequence_type::StProfileRecord;
use crate::error::TypingError;
use crate::parsing::blast::ParseError;
use crate::parsing::profiles::{parse_profiles_file, parse_profiles_text};

/// The ST reference table for one scheme, with lookup indexes.
///
/// Read-only once built; share it between workers behind an `Arc`.
#[derive(Debug)]
pub struct ProfileTable {
    pub scheme: Scheme,

    /// Records in table order
    pub records: Vec<StProfileRecord>,

    /// Index: ST id -> index in records vec
    st_to_index: HashMap<String, usize>,

    /// Index: (locus, allele) -> indices of records carrying that allele
    pub allele_to_records: HashMap<(String, String), Vec<usize>>,
}

impl ProfileTable {
    /// Create an empty table for `scheme`
    #[must_use]
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            records: Vec::new(),
            st_to_index: HashMap::new(),
            allele_to_records: HashMap::new(),
        }
    }

    /// Build a table from already-parsed records
    #[must_use]
    pub fn from_records(scheme: Scheme, records: impl IntoIterator<Item = StProfileRecord>) -> Self {
        let mut table = Self::new(scheme);
        for record in records {
            table.add_record(record);
        }
        table
    }

    /// Load `<profiles_dir>/<scheme.profiles>`
    ///
    /// # Errors
    ///
    /// Returns `TypingError::MissingInput` if the table file does not exist and
    /// `TypingError::Configuration` if it cannot be read or lacks required columns.
    pub fn load(scheme: Scheme, profiles_dir: &Path) -> Result<Self, TypingError> {
        let path = scheme.profiles_path(profiles_dir);
        if !path.exists() {
            return Err(TypingError::MissingInput {
                what: format!("{} profile table", scheme.display_name),
                path,
            });
        }

        let records = parse_profiles_file(&path, &scheme)
            .map_err(|e| configuration_error(&scheme, &path, &e))?;
        let table = Self::from_records(scheme, records);
        debug!(
            "Loaded {} sequence types for {} from {}",
            table.len(),
            table.scheme.id,
            path.display()
        );
        Ok(table)
    }

    /// Parse a table from TSV text
    ///
    /// # Errors
    ///
    /// Returns `TypingError::Configuration` if the text lacks required columns
    /// or has no usable rows.
    pub fn from_tsv(scheme: Scheme, text: &str) -> Result<Self, TypingError> {
        let records = parse_profiles_text(text, &scheme).map_err(|e| TypingError::Configuration {
            scheme: scheme.id.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_records(scheme, records))
    }

    /// Add a record; a repeated ST id is ignored with a warning
    pub fn add_record(&mut self, record: StProfileRecord) {
        if self.st_to_index.contains_key(&record.st) {
            warn!(
                "Ignoring duplicate ST {} in {} profile table",
                record.st, self.scheme.id
            );
            return;
        }

        let index = self.records.len();
        self.st_to_index.insert(record.st.clone(), index);

        for (locus, allele) in &record.alleles {
            self.allele_to_records
                .entry((locus.clone(), allele.clone()))
                .or_default()
                .push(index);
        }

        self.records.push(record);
    }

    /// Get a record by ST id
    #[must_use]
    pub fn get(&self, st: &str) -> Option<&StProfileRecord> {
        self.st_to_index.get(st).map(|&idx| &self.records[idx])
    }

    /// Number of sequence types in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn configuration_error(scheme: &Scheme, path: &Path, err: &ParseError) -> TypingError {
    TypingError::Configuration {
        scheme: scheme.id.clone(),
        reason: format!("{}: {err}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY_TSV: &str = "\
ST\tgltA\tgyrB\tgdhB\tclonal_complex
1\t1\t1\t1\tCC1
2\t1\t2\t1\tCC1
3\t2\t2\t2\t
";

    fn toy_scheme() -> Scheme {
        Scheme::new("toy", "Toy", ["gltA", "gyrB", "gdhB"]).with_profiles("toy/profiles.tsv")
    }

    #[test]
    fn test_from_tsv_builds_indexes() {
        let table = ProfileTable::from_tsv(toy_scheme(), TOY_TSV).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("2").unwrap().allele("gyrB"), Some("2"));
        assert!(table.get("4").is_none());

        let with_glta_1 = &table.allele_to_records[&("gltA".to_string(), "1".to_string())];
        assert_eq!(with_glta_1, &vec![0, 1]);
    }

    #[test]
    fn test_duplicate_st_is_ignored() {
        let tsv = format!("{TOY_TSV}2\t9\t9\t9\t\n");
        let table = ProfileTable::from_tsv(toy_scheme(), &tsv).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("2").unwrap().allele("gltA"), Some("1"));
    }

    #[test]
    fn test_load_missing_table_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProfileTable::load(toy_scheme(), dir.path()).unwrap_err();
        assert!(matches!(err, TypingError::MissingInput { .. }));
    }

    #[test]
    fn test_load_missing_column_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("toy")).unwrap();
        std::fs::write(dir.path().join("toy/profiles.tsv"), "ST\tgltA\n1\t1\n").unwrap();

        let err = ProfileTable::load(toy_scheme(), dir.path()).unwrap_err();
        match err {
            TypingError::Configuration { reason, .. } => {
                assert!(reason.contains("gyrB"));
                assert!(reason.contains("gdhB"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("toy")).unwrap();
        std::fs::write(dir.path().join("toy/profiles.tsv"), TOY_TSV).unwrap();

        let table = ProfileTable::load(toy_scheme(), dir.path()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("1").unwrap().clonal_complex.as_deref(), Some("CC1"));
    }
}
