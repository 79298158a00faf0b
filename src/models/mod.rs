//! Data models for the course catalog.
//!
//! Wire field names are camelCase to match the JSON contract.

mod course;
mod video;

pub use course::*;
pub use video::*;
