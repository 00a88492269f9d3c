//! Concept creation form - capability layer
//!
//! Single-row capabilities against the creation form: open it, fill the
//! name, probe for the duplicate notice, pick the fixed classifications,
//! submit. Knows nothing about the table or the row loop.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::debug;

use crate::config::Config;
use crate::infrastructure::DomExecutor;

const NAME_INPUT_ID: &str = "namesByLocale[en].name";
const FORM_LANDMARK_XPATH: &str = "//th[contains(text(), 'Fully Specified Name')]";
const DUPLICATE_NOTICE_XPATH: &str =
    "//*[contains(text(), 'Fully specified name must be unique')]";
const CONCEPT_CLASS_SELECT_ID: &str = "conceptClass";
const DATATYPE_SELECT_ID: &str = "datatype";
// The form has other generic submit controls; this one is pinned down by
// its name and value attributes.
const SAVE_BUTTON_XPATH: &str =
    "//input[@type='submit' and @name='action' and @value='Save and Continue']";

/// Concept creation form
pub struct ConceptForm {
    form_url: String,
    concept_class: String,
    datatype: String,
    field_wait: Duration,
    probe_wait: Duration,
    settle: Duration,
}

impl ConceptForm {
    pub fn new(config: &Config) -> Self {
        Self {
            form_url: config.form_url.clone(),
            concept_class: config.concept_class.clone(),
            datatype: config.datatype.clone(),
            field_wait: config.field_wait(),
            probe_wait: config.probe_wait(),
            settle: config.settle(),
        }
    }

    /// Open the creation form and confirm its landmark heading.
    pub async fn open(&self, executor: &DomExecutor) -> Result<()> {
        executor.goto(&self.form_url).await?;
        executor
            .wait_until(
                &DomExecutor::xpath_visible_probe(FORM_LANDMARK_XPATH),
                self.field_wait,
                "concept form landmark",
            )
            .await
            .context("concept form page did not load as expected")?;
        debug!("Concept form loaded");
        Ok(())
    }

    /// Wait for the name input, clear any residual value, enter the name.
    pub async fn enter_name(&self, executor: &DomExecutor, name: &str) -> Result<()> {
        executor
            .wait_until(
                &DomExecutor::id_clickable_probe(NAME_INPUT_ID),
                self.field_wait,
                "concept name input",
            )
            .await?;
        executor.set_value_by_id(NAME_INPUT_ID, name).await?;
        debug!("Concept name entered");
        Ok(())
    }

    /// Best-effort probe for the "must be unique" notice.
    ///
    /// The window is deliberately brief: long enough for the notice to
    /// render, short enough not to tax the many non-duplicate rows. Absence
    /// within the window means proceed as non-duplicate.
    pub async fn duplicate_notice_shown(&self, executor: &DomExecutor) -> bool {
        executor
            .try_wait(
                &DomExecutor::xpath_visible_probe(DUPLICATE_NOTICE_XPATH),
                self.probe_wait,
            )
            .await
    }

    /// Apply the fixed classification and datatype selections. These are
    /// workflow constants, never derived from row data.
    pub async fn select_classification(&self, executor: &DomExecutor) -> Result<()> {
        executor
            .select_by_visible_text(CONCEPT_CLASS_SELECT_ID, &self.concept_class)
            .await?;
        executor
            .select_by_visible_text(DATATYPE_SELECT_ID, &self.datatype)
            .await?;
        debug!(
            "Selected class '{}' and datatype '{}'",
            self.concept_class, self.datatype
        );
        Ok(())
    }

    /// Click the save control, then settle. The form transition exposes no
    /// observable ready-signal, so a flat delay is the only option here.
    pub async fn submit(&self, executor: &DomExecutor) -> Result<()> {
        executor.click_xpath(SAVE_BUTTON_XPATH).await?;
        debug!("Save clicked");
        sleep(self.settle).await;
        Ok(())
    }
}
