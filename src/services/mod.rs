// Service exports
pub mod catalog;
pub mod extraction;
pub mod formatter;

pub use catalog::{CatalogClient, CatalogError};
pub use extraction::{Extraction, ExtractionClient, ExtractionError, ExtractionOutcome, IntentKind};
