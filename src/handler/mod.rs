//! Request handler module
//!
//! Responsible for request routing dispatch and the student operations.

pub mod router;
pub mod students;

// Re-export main entry point
pub use router::{handle_request, Router};
