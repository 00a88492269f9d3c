//! Create pipeline row flow
//!
//! One row, linear with a single branch:
//! navigate form → enter name → duplicate? → select classification →
//! submit → extract identifiers.

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::infrastructure::DomExecutor;
use crate::services::{ConceptDetails, ConceptForm};
use crate::workflow::row_ctx::RowCtx;
use crate::workflow::RowOutcome;

/// Create pipeline row flow
pub struct CreateFlow {
    form: ConceptForm,
    details: ConceptDetails,
}

impl CreateFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            form: ConceptForm::new(config),
            details: ConceptDetails::new(config),
        }
    }

    pub async fn run(
        &self,
        executor: &DomExecutor,
        name: &str,
        ctx: &RowCtx,
    ) -> Result<RowOutcome> {
        self.form.open(executor).await?;
        self.form.enter_name(executor, name).await?;

        // The duplicate notice is a recognized terminal state, not an
        // error: the row ends here without submitting the form.
        if self.form.duplicate_notice_shown(executor).await {
            info!("[{}] Duplicate name detected, skipping submit", ctx);
            return Ok(RowOutcome::Duplicate);
        }

        self.form.select_classification(executor).await?;
        self.form.submit(executor).await?;

        let (concept_id, uuid) = self.details.read_identifiers(executor).await?;
        info!("[{}] Created concept {}", ctx, concept_id);
        Ok(RowOutcome::Created { concept_id, uuid })
    }
}
