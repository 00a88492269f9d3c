//! Orchestration layer
//!
//! ## Responsibilities
//!
//! The run controller is the system's command center:
//! - owns the scarce resources (Browser, DomExecutor, error log)
//! - loads the table, authenticates once, iterates rows in order
//! - isolates row-level failures and pattern-matches row outcomes
//! - guarantees finalization (save table, close browser) no matter how
//!   the run ended
//!
//! ## Layer relationships
//!
//! ```text
//! run_controller (whole table)
//!     ↓
//! workflow::RowFlow (one row)
//!     ↓
//! services (capabilities: auth / form / search / details / error log)
//!     ↓
//! infrastructure (DomExecutor)
//! ```

pub mod run_controller;

pub use run_controller::{App, RunStats};
