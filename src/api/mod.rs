//! REST API module.
//!
//! Contains the HTTP handlers for both collections and the fixed queries.

mod courses;
mod queries;
mod videos;

pub use courses::*;
pub use queries::*;
pub use videos::*;
