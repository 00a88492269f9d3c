//! Concept table store
//!
//! Loads the input spreadsheet (CSV), exposes row-indexed access, and
//! persists the annotated table at the end of the run.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{AppError, AppResult, TableError};
use crate::models::concept::ConceptRecord;

/// In-memory concept table.
///
/// Row order is preserved from input to output; rows are mutated in place
/// during the run and written out exactly once at run end.
#[derive(Debug, Clone)]
pub struct ConceptTable {
    rows: Vec<ConceptRecord>,
}

impl ConceptTable {
    /// Load the table from a CSV file with at least a `concept_name` column.
    ///
    /// Fails when the file is missing, unparsable, lacks the required
    /// column, or contains a row with an empty name.
    pub fn load(path: &str) -> AppResult<Self> {
        if !Path::new(path).exists() {
            return Err(AppError::Table(TableError::NotFound {
                path: path.to_string(),
            }));
        }

        let mut reader =
            csv::Reader::from_path(path).map_err(|e| AppError::table_read_failed(path, e))?;

        let mut rows = Vec::new();
        for (index, result) in reader.deserialize().enumerate() {
            let record: ConceptRecord =
                result.map_err(|e| AppError::table_read_failed(path, e))?;
            if record.concept_name.trim().is_empty() {
                return Err(AppError::Table(TableError::EmptyConceptName { row: index }));
            }
            rows.push(record);
        }

        info!("Loaded {} rows from {}", rows.len(), path);
        Ok(Self { rows })
    }

    /// Write the full table, including unprocessed rows, overwriting any
    /// prior output at `path`.
    pub fn save(&self, path: &str) -> AppResult<()> {
        let mut writer =
            csv::Writer::from_path(path).map_err(|e| AppError::table_write_failed(path, e))?;

        for record in &self.rows {
            writer
                .serialize(record)
                .map_err(|e| AppError::table_write_failed(path, e))?;
        }
        writer
            .flush()
            .map_err(|e| AppError::table_write_failed(path, e))?;

        debug!("Wrote {} rows to {}", self.rows.len(), path);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ConceptRecord] {
        &self.rows
    }

    /// Concept name of the row at `index`.
    pub fn name(&self, index: usize) -> AppResult<&str> {
        self.rows
            .get(index)
            .map(|r| r.concept_name.as_str())
            .ok_or(AppError::Table(TableError::RowOutOfRange {
                index,
                len: self.rows.len(),
            }))
    }

    /// Write both result columns of the row at `index` together.
    ///
    /// The name column and everything else stay untouched; result fields
    /// are never written one at a time.
    pub fn set_result(&mut self, index: usize, concept_id: &str, uuid: &str) -> AppResult<()> {
        let len = self.rows.len();
        let record = self
            .rows
            .get_mut(index)
            .ok_or(AppError::Table(TableError::RowOutOfRange { index, len }))?;
        record.concept_id = Some(concept_id.to_string());
        record.uuid = Some(uuid.to_string());
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<ConceptRecord>) -> Self {
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, TableError};
    use crate::models::concept::{DUPLICATE, ERROR};
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("concept_batch_submit_{}_{}", std::process::id(), name));
        path
    }

    #[test]
    fn load_reads_names_and_leaves_results_unset() {
        let path = temp_path("load_basic.csv");
        fs::write(&path, "concept_name\nHeadache\nFever\n").unwrap();

        let table = ConceptTable::load(path.to_str().unwrap()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.name(0).unwrap(), "Headache");
        assert_eq!(table.name(1).unwrap(), "Fever");
        assert!(!table.rows()[0].is_processed());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let err = ConceptTable::load("/nonexistent/concepts.csv").unwrap_err();
        assert!(matches!(err, AppError::Table(TableError::NotFound { .. })));
    }

    #[test]
    fn load_rejects_missing_concept_name_column() {
        let path = temp_path("load_no_column.csv");
        fs::write(&path, "name\nHeadache\n").unwrap();

        let err = ConceptTable::load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AppError::Table(TableError::ReadFailed { .. })));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn load_rejects_empty_name_cell() {
        let path = temp_path("load_empty_name.csv");
        fs::write(&path, "concept_name\nHeadache\n  \n").unwrap();

        let err = ConceptTable::load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Table(TableError::EmptyConceptName { row: 1 })
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn set_result_writes_both_fields_together() {
        let mut table = ConceptTable::from_rows(vec![ConceptRecord::new("Headache")]);
        table.set_result(0, "1234", "abcd-ef01").unwrap();

        let row = &table.rows()[0];
        assert_eq!(row.concept_id.as_deref(), Some("1234"));
        assert_eq!(row.uuid.as_deref(), Some("abcd-ef01"));
        assert_eq!(row.concept_name, "Headache");
    }

    #[test]
    fn set_result_out_of_range_errors() {
        let mut table = ConceptTable::from_rows(vec![ConceptRecord::new("Headache")]);
        let err = table.set_result(5, DUPLICATE, DUPLICATE).unwrap_err();
        assert!(matches!(
            err,
            AppError::Table(TableError::RowOutOfRange { index: 5, len: 1 })
        ));
    }

    #[test]
    fn save_preserves_row_order_and_count() {
        let path = temp_path("save_order.csv");
        let mut table = ConceptTable::from_rows(vec![
            ConceptRecord::new("Headache"),
            ConceptRecord::new("Fever"),
            ConceptRecord::new("Cough"),
        ]);
        // Rows 1-2 processed, row 3 left untouched: partial results must
        // still round-trip.
        table.set_result(0, "100", "uuid-100").unwrap();
        table.set_result(1, DUPLICATE, DUPLICATE).unwrap();

        table.save(path.to_str().unwrap()).unwrap();
        let reloaded = ConceptTable::load(path.to_str().unwrap()).unwrap();

        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.name(0).unwrap(), "Headache");
        assert_eq!(reloaded.name(1).unwrap(), "Fever");
        assert_eq!(reloaded.name(2).unwrap(), "Cough");
        assert_eq!(reloaded.rows()[0].concept_id.as_deref(), Some("100"));
        assert_eq!(reloaded.rows()[1].uuid.as_deref(), Some(DUPLICATE));
        assert!(reloaded.rows()[2].concept_id.is_none());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn save_overwrites_prior_output() {
        let path = temp_path("save_overwrite.csv");
        let mut table = ConceptTable::from_rows(vec![ConceptRecord::new("Headache")]);
        table.set_result(0, ERROR, ERROR).unwrap();
        table.save(path.to_str().unwrap()).unwrap();
        table.set_result(0, "42", "uuid-42").unwrap();
        table.save(path.to_str().unwrap()).unwrap();

        let reloaded = ConceptTable::load(path.to_str().unwrap()).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.rows()[0].concept_id.as_deref(), Some("42"));

        fs::remove_file(&path).unwrap();
    }
}
