//! Ingestion pipeline: turning loosely shaped external JSON into persisted
//! jobs, and normalizing the analysis service's callback payloads.

pub mod callback;
pub mod importer;
pub mod normalize;
pub mod sanitize;

pub use callback::{normalize_classification, CallbackError};
pub use importer::{ImportReport, JobImporter};
