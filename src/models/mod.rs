pub mod concept;
pub mod store;

pub use concept::{ConceptRecord, DUPLICATE, ERROR, NOT_FOUND};
pub use store::ConceptTable;
