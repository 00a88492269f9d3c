//! # Concept Batch Submit
//!
//! Bulk-populates or bulk-looks-up clinical concept records in an
//! OpenMRS-style medical dictionary by driving its browser UI. A CSV
//! table is both input (one concept name per row) and output (rows
//! annotated with extracted identifiers or sentinel markers).
//!
//! ## Architecture
//!
//! Four strict layers:
//!
//! ### Infrastructure
//! - [`infrastructure::DomExecutor`] - sole page owner; exposes eval,
//!   bounded waits, and DOM capabilities
//!
//! ### Services (capabilities)
//! - [`services::Authenticator`] - login flow
//! - [`services::ConceptForm`] - creation form interactions
//! - [`services::ConceptSearch`] - dictionary search interactions
//! - [`services::ConceptDetails`] - identifier extraction
//! - [`services::ErrorLog`] - append-only failure log
//!
//! ### Workflow
//! - [`workflow::RowFlow`] - one row's complete flow per pipeline,
//!   reporting an explicit [`workflow::RowOutcome`]
//!
//! ### Orchestration
//! - [`orchestrator::App`] - owns the browser session and the table,
//!   iterates rows, isolates failures, guarantees final save and cleanup

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// Re-export the common types
pub use config::{Config, Workflow};
pub use error::{AppError, AppResult};
pub use infrastructure::DomExecutor;
pub use models::{ConceptRecord, ConceptTable, DUPLICATE, ERROR, NOT_FOUND};
pub use orchestrator::{App, RunStats};
pub use workflow::{RowCtx, RowFlow, RowOutcome};
