//! HTTP protocol layer module
//!
//! Query string decoding and JSON response building, decoupled from the
//! endpoint handlers.

pub mod query;
pub mod response;

// Re-export commonly used types
pub use query::QueryParams;
pub use response::json_response;
