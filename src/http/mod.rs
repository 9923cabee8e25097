//! HTTP protocol layer module
//!
//! Response builders shared by the router and the student handlers.

pub mod response;

// Re-export commonly used functions
pub use response::{build_error_response, build_json_response, build_response, CONTENT_TYPE_JSON};
