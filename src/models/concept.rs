use serde::{Deserialize, Serialize};

/// Result marker for a name that already exists in the dictionary.
pub const DUPLICATE: &str = "DUPLICATE";

/// Result marker for a row whose processing failed.
pub const ERROR: &str = "ERROR";

/// Result marker for a lookup that matched no rendered search result.
pub const NOT_FOUND: &str = "NOT_FOUND";

/// One spreadsheet row: a concept name plus the result columns filled in
/// during the run.
///
/// The input file only needs the `concept_name` column; `concept_id` and
/// `uuid` deserialize as `None` when absent and are written back on save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub concept_name: String,

    #[serde(default)]
    pub concept_id: Option<String>,

    #[serde(default)]
    pub uuid: Option<String>,
}

impl ConceptRecord {
    pub fn new(concept_name: impl Into<String>) -> Self {
        Self {
            concept_name: concept_name.into(),
            concept_id: None,
            uuid: None,
        }
    }

    /// Whether the result columns have been written for this row.
    pub fn is_processed(&self) -> bool {
        self.concept_id.is_some() && self.uuid.is_some()
    }
}
