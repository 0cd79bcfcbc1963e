//! Public user profiles: lookup, listing, and contact-field edits over the users table.

pub mod router;
pub mod service;


pub use router::profile_router;
pub use service::{ProfileError, ProfileService, PublicUser};
