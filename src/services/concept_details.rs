//! Concept detail extraction - capability layer
//!
//! Reads the identifier pair off the confirmation / detail view. Shared by
//! both pipelines.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Config;
use crate::infrastructure::DomExecutor;

const ID_CELL_XPATH: &str = "//th[contains(text(), 'Id')]/following-sibling::td";
const UUID_CELL_XPATH: &str = "//th[contains(text(), 'UUID')]/following-sibling::td";

/// Concept detail reader
pub struct ConceptDetails {
    extract_wait: Duration,
}

impl ConceptDetails {
    pub fn new(config: &Config) -> Self {
        Self {
            extract_wait: config.extract_wait(),
        }
    }

    /// Wait for the Id cell to become visible, then read the identifier
    /// and UUID cells.
    pub async fn read_identifiers(&self, executor: &DomExecutor) -> Result<(String, String)> {
        executor
            .wait_until(
                &DomExecutor::xpath_visible_probe(ID_CELL_XPATH),
                self.extract_wait,
                "concept id cell",
            )
            .await
            .context("result identifiers never became visible")?;

        let concept_id = executor.text_of_xpath(ID_CELL_XPATH).await?;
        let uuid = executor.text_of_xpath(UUID_CELL_XPATH).await?;
        debug!("Extracted concept id {} / uuid {}", concept_id, uuid);
        Ok((concept_id, uuid))
    }
}
