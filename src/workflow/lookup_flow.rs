//! Lookup pipeline row flow
//!
//! One row: open the dictionary search page, search the name, open the
//! exact-matching result, extract identifiers. A name with no exact match
//! is a named terminal state; extraction is skipped so a stale detail view
//! from an earlier row can never be read as this row's identifiers.

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::DomExecutor;
use crate::services::{ConceptDetails, ConceptSearch};
use crate::workflow::row_ctx::RowCtx;
use crate::workflow::RowOutcome;

/// Lookup pipeline row flow
pub struct LookupFlow {
    search: ConceptSearch,
    details: ConceptDetails,
}

impl LookupFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            search: ConceptSearch::new(config),
            details: ConceptDetails::new(config),
        }
    }

    pub async fn run(
        &self,
        executor: &DomExecutor,
        name: &str,
        ctx: &RowCtx,
    ) -> Result<RowOutcome> {
        self.search.open(executor).await?;
        self.search.search(executor, name).await?;

        if !self.search.open_matching_result(executor, name).await? {
            warn!("[{}] No exact match in search results", ctx);
            return Ok(RowOutcome::NotFound);
        }

        let (concept_id, uuid) = self.details.read_identifiers(executor).await?;
        info!("[{}] Found concept {}", ctx, concept_id);
        Ok(RowOutcome::Found { concept_id, uuid })
    }
}
