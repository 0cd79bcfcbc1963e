//! Read-only reference data for the check-in form: slider ranges, label choices, and
//! the mascot's encouragement lines.

pub mod router;
pub mod service;


pub use router::catalog_router;
pub use service::{CatalogError, CatalogRows, CatalogService, EncouragementWords};
