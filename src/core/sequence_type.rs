use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::SchemeId;

/// One row of a scheme's ST reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StProfileRecord {
    pub scheme_id: SchemeId,

    /// Sequence-type id as written in the table (usually numeric)
    pub st: String,

    /// Allele at every scheme locus
    pub alleles: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clonal_complex: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
}

impl StProfileRecord {
    pub fn new(
        scheme_id: SchemeId,
        st: impl Into<String>,
        alleles: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        Self {
            scheme_id,
            st: st.into(),
            alleles: alleles
                .into_iter()
                .map(|(l, a)| (l.into(), a.into()))
                .collect(),
            clonal_complex: None,
            species: None,
        }
    }

    #[must_use]
    pub fn with_clonal_complex(mut self, cc: impl Into<String>) -> Self {
        self.clonal_complex = Some(cc.into());
        self
    }

    #[must_use]
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    #[must_use]
    pub fn allele(&self, locus: &str) -> Option<&str> {
        self.alleles.get(locus).map(String::as_str)
    }
}

/// Order sequence-type ids numerically where possible.
///
/// Ids that parse as unsigned integers compare by value and sort before any
/// non-numeric id; non-numeric ids compare as strings.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use mlst_solver::core::sequence_type::compare_st_ids;
///
/// assert_eq!(compare_st_ids("2", "10"), Ordering::Less);
/// assert_eq!(compare_st_ids("10", "ST-A"), Ordering::Less);
/// assert_eq!(compare_st_ids("new_b", "new_a"), Ordering::Greater);
/// ```
#[must_use]
pub fn compare_st_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
