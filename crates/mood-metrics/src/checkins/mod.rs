//! Daily check-in workflow: creation with scoring, partial updates, listing, and same-day
//! lookups over the row store.

pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{columns, CreatedCheckIn, SameDayCheckIn, ScoringSnapshot, UpdatedCheckIn};
pub use router::checkin_router;
pub use service::{CheckInService, CheckInServiceError};
