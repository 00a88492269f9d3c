//! Infrastructure layer
//!
//! Holds the scarce resource (the browser page) and exposes capabilities
//! only; knows nothing about concepts, tables, or workflows.

pub mod dom_executor;

pub use dom_executor::DomExecutor;
