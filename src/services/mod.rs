pub mod auth;
pub mod concept_details;
pub mod concept_form;
pub mod concept_search;
pub mod error_log;

pub use auth::Authenticator;
pub use concept_details::ConceptDetails;
pub use concept_form::ConceptForm;
pub use concept_search::ConceptSearch;
pub use error_log::ErrorLog;
