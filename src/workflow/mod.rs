//! Workflow layer
//!
//! Defines the complete processing flow for one table row. Flows hold no
//! resources; they depend only on capabilities (services) and report an
//! explicit [`RowOutcome`] that the run controller pattern-matches on —
//! row branching never rides on error handling.

pub mod create_flow;
pub mod lookup_flow;
pub mod row_ctx;

pub use create_flow::CreateFlow;
pub use lookup_flow::LookupFlow;
pub use row_ctx::RowCtx;

use anyhow::Result;

use crate::config::{Config, Workflow};
use crate::infrastructure::DomExecutor;
use crate::models::{DUPLICATE, NOT_FOUND};

/// Terminal state of one row's processing.
///
/// Row-level failures are not a variant here; they travel as the `Err` arm
/// of `Result<RowOutcome>` and the controller writes the `ERROR` sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// A new concept was created (Create pipeline).
    Created { concept_id: String, uuid: String },
    /// An existing concept was found and read (Lookup pipeline).
    Found { concept_id: String, uuid: String },
    /// The name already exists; the form was never submitted.
    Duplicate,
    /// No rendered search result matched the name (Lookup pipeline).
    NotFound,
}

impl RowOutcome {
    /// The values written into the row's result columns, always as a pair.
    pub fn result_fields(&self) -> (String, String) {
        match self {
            RowOutcome::Created { concept_id, uuid }
            | RowOutcome::Found { concept_id, uuid } => (concept_id.clone(), uuid.clone()),
            RowOutcome::Duplicate => (DUPLICATE.to_string(), DUPLICATE.to_string()),
            RowOutcome::NotFound => (NOT_FOUND.to_string(), NOT_FOUND.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RowOutcome::Created { .. } => "created",
            RowOutcome::Found { .. } => "found",
            RowOutcome::Duplicate => "duplicate",
            RowOutcome::NotFound => "not found",
        }
    }
}

/// The per-row flow for the configured pipeline.
pub enum RowFlow {
    Create(CreateFlow),
    Lookup(LookupFlow),
}

impl RowFlow {
    pub fn for_config(config: &Config) -> Self {
        match config.workflow {
            Workflow::Create => RowFlow::Create(CreateFlow::new(config)),
            Workflow::Lookup => RowFlow::Lookup(LookupFlow::new(config)),
        }
    }

    pub async fn run(
        &self,
        executor: &DomExecutor,
        name: &str,
        ctx: &RowCtx,
    ) -> Result<RowOutcome> {
        match self {
            RowFlow::Create(flow) => flow.run(executor, name, ctx).await,
            RowFlow::Lookup(flow) => flow.run(executor, name, ctx).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DUPLICATE, NOT_FOUND};

    #[test]
    fn created_and_found_carry_real_identifiers() {
        let outcome = RowOutcome::Created {
            concept_id: "1234".to_string(),
            uuid: "ab-cd".to_string(),
        };
        assert_eq!(
            outcome.result_fields(),
            ("1234".to_string(), "ab-cd".to_string())
        );

        let outcome = RowOutcome::Found {
            concept_id: "77".to_string(),
            uuid: "ef-01".to_string(),
        };
        assert_eq!(
            outcome.result_fields(),
            ("77".to_string(), "ef-01".to_string())
        );
    }

    #[test]
    fn duplicate_writes_the_sentinel_to_both_columns() {
        assert_eq!(
            RowOutcome::Duplicate.result_fields(),
            (DUPLICATE.to_string(), DUPLICATE.to_string())
        );
    }

    #[test]
    fn not_found_writes_the_sentinel_to_both_columns() {
        assert_eq!(
            RowOutcome::NotFound.result_fields(),
            (NOT_FOUND.to_string(), NOT_FOUND.to_string())
        );
    }
}
